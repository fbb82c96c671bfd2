use std::{sync::Arc, time::Instant};

use serde_json::json;
use tracing::{info, warn};

use crate::{
    cluster::{ClusterRun, CohortRouting},
    config::{Config, GridConfig},
    convert::Coordinate,
    marker::ClusterOutput,
    point::PointCollection,
    query::{ClusterQuery, QueryError},
};

/// Defaults applied to every query.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Settings {
    pub grid: GridConfig,
    pub excluded: Option<Coordinate>,
    pub routing: CohortRouting,
}

impl From<&Config> for Settings {
    fn from(config: &Config) -> Self {
        Self {
            grid: config.grid,
            excluded: config.excluded,
            routing: config.cohort_routing,
        }
    }
}

/// Answers clustering queries against a shared point collection.
/// Every query works on its own copy of the points so runs never affect each other.
#[derive(Clone, Debug)]
pub struct Responder {
    points: Arc<PointCollection>,
    settings: Settings,
}

impl Responder {
    pub fn new(points: Arc<PointCollection>, settings: Settings) -> Self {
        Self { points, settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Parses a query string with the configured defaults.
    pub fn parse(&self, query: &str) -> Result<ClusterQuery, QueryError> {
        ClusterQuery::parse(query, self.settings.grid, self.settings.excluded)
    }

    /// Runs the clustering for a validated query on a fresh snapshot of the points.
    pub fn compute(&self, query: &ClusterQuery) -> ClusterOutput {
        let begin = Instant::now();
        let snapshot: PointCollection = (*self.points).clone();
        let run: ClusterRun = query
            .clusterer(self.settings.routing)
            .run(query.bounds.to_region(), snapshot);
        let output = ClusterOutput::from(&run);
        info!(
            width = query.grid.width,
            height = query.grid.height,
            elapsed_ms = begin.elapsed().as_secs_f64() * 1000.,
            "computation done"
        );
        output
    }

    /// Parses then computes a raw query string. Rejections are logged.
    pub fn answer(&self, query: &str) -> Result<ClusterOutput, QueryError> {
        match self.parse(query) {
            Ok(parsed) => Ok(self.compute(&parsed)),
            Err(reason) => {
                warn!(%reason, query, "rejected query");
                Err(reason)
            }
        }
    }

    /// Answers a raw query string with the JSON text sent back to the client.
    /// A rejected query is answered with an `{"error": ...}` object.
    pub fn respond(&self, query: &str) -> Result<String, serde_json::Error> {
        match self.answer(query) {
            Ok(output) => serde_json::to_string(&output),
            Err(reason) => serde_json::to_string(&json!({ "error": reason.to_string() })),
        }
    }
}
