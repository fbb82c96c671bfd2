use serde::{Deserialize, Serialize};

use crate::convert::{Coordinate, Position};

/// The two point categories tracked in parallel grids.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cohort {
    Present,
    Disappeared,
}

impl Cohort {
    pub fn from_disappeared(disappeared: bool) -> Self {
        if disappeared {
            Cohort::Disappeared
        } else {
            Cohort::Present
        }
    }

    /// The other cohort.
    pub fn opposite(self) -> Self {
        match self {
            Cohort::Present => Cohort::Disappeared,
            Cohort::Disappeared => Cohort::Present,
        }
    }
}

/// A point record as found in a point source, with its position in degrees.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointRecord {
    #[serde(alias = "pk")]
    pub id: i64,
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub disappeared: bool,
    #[serde(default, alias = "desc", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A point ready to be clustered, with its position in internal units.
#[derive(Clone, Debug, PartialEq)]
pub struct Point {
    pub id: i64,
    pub position: Position,
    pub cohort: Cohort,
    pub description: Option<String>,
}

/// Points are owned by whichever stage currently holds them.
pub type PointCollection = Vec<Point>;

impl Point {
    /// Builds a point from a position already expressed in internal units.
    pub fn new(id: i64, position: Position, cohort: Cohort) -> Self {
        Self {
            id,
            position,
            cohort,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// The point position in degrees.
    pub fn coordinate(&self) -> Coordinate {
        self.position.to_coordinate()
    }
}

impl From<PointRecord> for Point {
    fn from(record: PointRecord) -> Self {
        Self {
            id: record.id,
            position: Coordinate::new(record.lat, record.lng).to_position(),
            cohort: Cohort::from_disappeared(record.disappeared),
            description: record.description,
        }
    }
}
