//! This module turns a populated cluster run into the structure sent to map clients.

use serde::{Deserialize, Serialize};

use crate::{
    cluster::ClusterRun,
    grid::{Cell, Grid},
};

/// What a map client draws for a non empty cell.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub count: usize,
    pub lat: f64,
    pub lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Rows of markers; `None` marks an empty cell.
pub type MarkerGrid = Vec<Vec<Option<Marker>>>;

/// The serializable result of a clustering computation, one grid per cohort.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClusterOutput {
    pub present: MarkerGrid,
    pub disappeared: MarkerGrid,
}

impl Marker {
    /// A single point cell is drawn at the point itself, a crowded cell at the middle of the cell.
    /// The crowded marker is not a centroid of the contained points.
    pub fn from_cell(cell: &Cell) -> Option<Marker> {
        match cell.points.as_slice() {
            [] => None,
            [point] => {
                let coordinate = point.coordinate();
                Some(Marker {
                    count: 1,
                    lat: coordinate.lat,
                    lng: coordinate.lng,
                    id: Some(point.id),
                    description: point.description.clone(),
                })
            }
            points => {
                let coordinate = cell.region.midpoint().to_coordinate();
                Some(Marker {
                    count: points.len(),
                    lat: coordinate.lat,
                    lng: coordinate.lng,
                    id: None,
                    description: None,
                })
            }
        }
    }
}

fn aggregate(grid: &Grid) -> MarkerGrid {
    grid.rows()
        .map(|row| row.iter().map(Marker::from_cell).collect())
        .collect()
}

impl From<&ClusterRun> for ClusterOutput {
    fn from(run: &ClusterRun) -> Self {
        Self {
            present: aggregate(&run.present),
            disappeared: aggregate(&run.disappeared),
        }
    }
}
