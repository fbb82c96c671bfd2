use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    convert::Position,
    grid::Grid,
    point::{Cohort, PointCollection},
    region::Region,
};

/// Decides which cohort grid receives the points of a cohort.
///
/// `Direct` sends each point to the grid named after its own cohort.
/// `Inverted` swaps the two grids, which is how the first deployment of the service routed points.
/// Whether the inverted routing is intended is still an open product question.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CohortRouting {
    #[default]
    Direct,
    Inverted,
}

impl CohortRouting {
    /// The grid a point of the given cohort is placed in.
    pub fn target(self, cohort: Cohort) -> Cohort {
        match self {
            CohortRouting::Direct => cohort,
            CohortRouting::Inverted => cohort.opposite(),
        }
    }
}

/// Grid clustering parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Clusterer {
    width: usize,
    height: usize,
    excluded: Option<Position>,
    routing: CohortRouting,
}

/// The outcome of one clustering computation.
#[derive(Clone, Debug, PartialEq)]
pub struct ClusterRun {
    pub region: Region,
    pub present: Grid,
    pub disappeared: Grid,
    /// Points that passed the bounding box filter but were not placed in any cell.
    pub unplaced: PointCollection,
}

impl Clusterer {
    /// Builds a new clusterer. Both dimensions must be at least 1.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            excluded: None,
            routing: CohortRouting::default(),
        }
    }

    /// Points located exactly at `position` (internal units) are never placed.
    pub fn excluding(mut self, position: Position) -> Self {
        self.excluded = Some(position);
        self
    }

    pub fn with_routing(mut self, routing: CohortRouting) -> Self {
        self.routing = routing;
        self
    }

    /// Filters the points against the region, partitions the region once per cohort and populates both grids.
    pub fn run(&self, region: Region, points: PointCollection) -> ClusterRun {
        let total = points.len();
        let points = region.filter(points);
        let filtered = points.len();
        let mut run = ClusterRun {
            region,
            present: Grid::partition(&region, self.width, self.height),
            disappeared: Grid::partition(&region, self.width, self.height),
            unplaced: vec![],
        };
        self.populate(&mut run, points);
        debug!(
            total,
            filtered,
            present = run.present.point_count(),
            disappeared = run.disappeared.point_count(),
            unplaced = run.unplaced.len(),
            "cluster run populated"
        );
        run
    }

    /// Moves each point in the first cell, row-major, of its target grid.
    fn populate(&self, run: &mut ClusterRun, points: PointCollection) {
        for point in points {
            if self.excluded == Some(point.position) {
                run.unplaced.push(point);
                continue;
            }
            let grid = match self.routing.target(point.cohort) {
                Cohort::Present => &mut run.present,
                Cohort::Disappeared => &mut run.disappeared,
            };
            if let Err(point) = grid.place(point) {
                run.unplaced.push(point);
            }
        }
    }
}

impl ClusterRun {
    pub fn grid(&self, cohort: Cohort) -> &Grid {
        match cohort {
            Cohort::Present => &self.present,
            Cohort::Disappeared => &self.disappeared,
        }
    }
}
