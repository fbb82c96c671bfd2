use serde::{Deserialize, Serialize};

use crate::{
    convert::{lat_to_internal, lng_to_internal, Position},
    point::PointCollection,
};

/// A rectangle in internal units.
/// Internal latitude grows southward so a well formed region has `north <= south` and `west <= east`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Region {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

/// Map bounds in degrees, as sent by a map client.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl Region {
    pub fn new(north: f64, south: f64, east: f64, west: f64) -> Self {
        Self {
            north,
            south,
            east,
            west,
        }
    }

    /// Inclusive on all four bounds.
    /// Bounds are compared whatever their order, so a region given with `north > south` still contains its inner points.
    pub fn contains(&self, position: &Position) -> bool {
        between(position.lat, self.north, self.south) && between(position.lng, self.west, self.east)
    }

    /// Keeps the points that lie within the region.
    pub fn filter(&self, points: PointCollection) -> PointCollection {
        points
            .into_iter()
            .filter(|p| self.contains(&p.position))
            .collect()
    }

    /// The geometric middle of the region.
    pub fn midpoint(&self) -> Position {
        Position::new(
            (self.north + self.south) / 2.,
            (self.west + self.east) / 2.,
        )
    }
}

impl Bounds {
    pub fn to_region(&self) -> Region {
        Region::new(
            lat_to_internal(self.north),
            lat_to_internal(self.south),
            lng_to_internal(self.east),
            lng_to_internal(self.west),
        )
    }
}

fn between(value: f64, a: f64, b: f64) -> bool {
    value >= a.min(b) && value <= a.max(b)
}

#[cfg(test)]
mod tests {
    use crate::point::{Cohort, Point};
    use crate::region::*;

    fn point(id: i64, lat: f64, lng: f64) -> Point {
        Point::new(id, Position::new(lat, lng), Cohort::Present)
    }

    #[test]
    fn test_contains_inclusive() {
        let region = Region::new(1., 3., 4., 2.);
        assert!(region.contains(&Position::new(1., 2.)));
        assert!(region.contains(&Position::new(3., 4.)));
        assert!(region.contains(&Position::new(2., 3.)));
        assert!(!region.contains(&Position::new(0.999, 3.)));
        assert!(!region.contains(&Position::new(2., 4.001)));
    }

    #[test]
    fn test_contains_reversed_bounds() {
        let region = Region::new(0., -2., 2., 0.);
        assert!(region.contains(&Position::new(-0.5, 0.5)));
        assert!(!region.contains(&Position::new(0.5, 0.5)));
    }

    #[test]
    fn test_filter() {
        let region = Region::new(0., 10., 10., 0.);
        let points = vec![point(1, 5., 5.), point(2, 11., 5.), point(3, 10., 0.), point(4, 5., -1.)];
        let kept = region.filter(points);
        let ids: Vec<i64> = kept.iter().map(|p| p.id).collect();
        assert_eq!(vec![1, 3], ids);
    }

    #[test]
    fn test_filter_idempotent() {
        let region = Region::new(0., 10., 10., 0.);
        let points = vec![point(1, 5., 5.), point(2, 11., 5.), point(3, 0., 10.)];
        let once = region.filter(points);
        let twice = region.filter(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_filter_empty() {
        let region = Region::new(0., 1., 1., 0.);
        assert!(region.filter(vec![point(1, 5., 5.)]).is_empty());
    }

    #[test]
    fn test_midpoint() {
        let region = Region::new(2., 4., 10., 6.);
        assert_eq!(Position::new(3., 8.), region.midpoint());
    }

    #[test]
    fn test_bounds_to_region() {
        let bounds = Bounds {
            north: 48.,
            south: 47.,
            east: 3.,
            west: 2.,
        };
        let region = bounds.to_region();
        assert_eq!(Region::new(42., 43., 183., 182.), region);
        assert!(region.north <= region.south);
        assert!(region.west <= region.east);
    }
}
