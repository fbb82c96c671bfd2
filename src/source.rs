use std::{
    fs::File,
    io::{BufReader, Read},
    path::{Path, PathBuf},
};

use crate::point::{Point, PointCollection, PointRecord};

/// Errors that can occur when fetching points.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("failed to read points: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("failed to parse points JSON: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
}

/// Something that supplies the points to cluster.
pub trait PointSource {
    fn fetch(&self) -> Result<PointCollection, SourceError>;
}

/// Reads points from a JSON array of point records.
pub fn read_points(reader: impl Read) -> Result<PointCollection, SourceError> {
    let records: Vec<PointRecord> = serde_json::from_reader(reader)?;
    Ok(records.into_iter().map(Point::from).collect())
}

/// Parses points from a JSON string.
pub fn parse_points(json: &str) -> Result<PointCollection, SourceError> {
    read_points(json.as_bytes())
}

/// A JSON file of point records.
#[derive(Clone, Debug, PartialEq)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl PointSource for JsonFileSource {
    fn fetch(&self) -> Result<PointCollection, SourceError> {
        let file = File::open(&self.path)?;
        read_points(BufReader::new(file))
    }
}
