use crate::{
    point::{Point, PointCollection},
    region::Region,
};

/// A grid subdivision owning the points assigned to it.
#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    pub region: Region,
    pub points: PointCollection,
}

impl Cell {
    pub(crate) fn new(region: Region) -> Self {
        Self {
            region,
            points: vec![],
        }
    }

    pub fn count(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// A `height × width` matrix of cells tiling a parent region, stored row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Subdivides the region into `width × height` equal cells.
    /// Bounds are accumulated so that adjacent cells share the exact same boundary value,
    /// and the last row and column close on the parent bounds.
    /// Both dimensions must be at least 1.
    pub fn partition(region: &Region, width: usize, height: usize) -> Self {
        debug_assert!(width >= 1 && height >= 1, "empty grid {width}x{height}");
        let lat_step = (region.south - region.north) / height as f64;
        let lng_step = (region.east - region.west) / width as f64;
        let mut cells = Vec::with_capacity(width * height);
        let mut north = region.north;
        for i in 0..height {
            let south = if i + 1 == height {
                region.south
            } else {
                north + lat_step
            };
            let mut west = region.west;
            for j in 0..width {
                let east = if j + 1 == width {
                    region.east
                } else {
                    west + lng_step
                };
                cells.push(Cell::new(Region::new(north, south, east, west)));
                west = east;
            }
            north = south;
        }
        Self {
            width,
            height,
            cells,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        if row < self.height && col < self.width {
            self.cells.get(row * self.width + col)
        } else {
            None
        }
    }

    /// Gets an iterator over the cells, row-major.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Gets an iterator over the rows of the grid.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.width)
    }

    /// Total number of points placed in the grid.
    pub fn point_count(&self) -> usize {
        self.cells.iter().map(Cell::count).sum()
    }

    /// Places the point in the first cell, row-major, whose region contains it.
    /// The point is handed back when no cell claims it.
    pub fn place(&mut self, point: Point) -> Result<(), Point> {
        match self
            .cells
            .iter_mut()
            .find(|cell| cell.region.contains(&point.position))
        {
            Some(cell) => {
                cell.points.push(point);
                Ok(())
            }
            None => Err(point),
        }
    }
}
