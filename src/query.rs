//! Parsing and validation of clustering queries.
//!
//! A query is a URL encoded string such as `north=48.9&south=48.8&east=2.4&west=2.2&width=4`.
//! The four bounds are mandatory, the grid dimensions and the excluded coordinate
//! fall back to the configured defaults.

use url::form_urlencoded;

use crate::{
    cluster::{CohortRouting, Clusterer},
    config::GridConfig,
    convert::Coordinate,
    region::Bounds,
};

/// Largest accepted grid dimension.
pub const MAX_GRID_DIMENSION: usize = 255;

/// Reasons a query is rejected before any clustering happens.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QueryError {
    #[error("missing parameter `{0}`")]
    MissingParameter(&'static str),

    #[error("unknown parameter `{key}` with value `{value}`")]
    UnknownParameter { key: String, value: String },

    #[error("parameter `{key}` is not a valid number: `{value}`")]
    InvalidNumber { key: String, value: String },

    #[error("grid {name} must be between 1 and {max}, got {value}", max = MAX_GRID_DIMENSION)]
    InvalidDimension { name: &'static str, value: usize },

    #[error("bounds must satisfy north > south and east > west, got north={north} south={south} east={east} west={west}")]
    DegenerateBounds {
        north: f64,
        south: f64,
        east: f64,
        west: f64,
    },

    #[error("excluded_lat and excluded_lng must be given together")]
    PartialExclusion,
}

/// A validated clustering request.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClusterQuery {
    pub bounds: Bounds,
    pub grid: GridConfig,
    pub excluded: Option<Coordinate>,
}

#[derive(Default)]
struct RawQuery {
    north: Option<f64>,
    south: Option<f64>,
    east: Option<f64>,
    west: Option<f64>,
    width: Option<usize>,
    height: Option<usize>,
    excluded_lat: Option<f64>,
    excluded_lng: Option<f64>,
}

impl ClusterQuery {
    /// Parses and validates a query string. A leading `?` is ignored.
    pub fn parse(
        query: &str,
        grid: GridConfig,
        excluded: Option<Coordinate>,
    ) -> Result<Self, QueryError> {
        let query = query.trim().trim_start_matches('?');
        let mut raw = RawQuery::default();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match &*key {
                "north" => raw.north = Some(parse_float(&key, &value)?),
                "south" => raw.south = Some(parse_float(&key, &value)?),
                "east" => raw.east = Some(parse_float(&key, &value)?),
                "west" => raw.west = Some(parse_float(&key, &value)?),
                "width" => raw.width = Some(parse_dimension(&key, &value)?),
                "height" => raw.height = Some(parse_dimension(&key, &value)?),
                "excluded_lat" => raw.excluded_lat = Some(parse_float(&key, &value)?),
                "excluded_lng" => raw.excluded_lng = Some(parse_float(&key, &value)?),
                _ => {
                    return Err(QueryError::UnknownParameter {
                        key: key.into_owned(),
                        value: value.into_owned(),
                    })
                }
            }
        }
        let bounds = Bounds {
            north: raw.north.ok_or(QueryError::MissingParameter("north"))?,
            south: raw.south.ok_or(QueryError::MissingParameter("south"))?,
            east: raw.east.ok_or(QueryError::MissingParameter("east"))?,
            west: raw.west.ok_or(QueryError::MissingParameter("west"))?,
        };
        let grid = GridConfig {
            width: raw.width.unwrap_or(grid.width),
            height: raw.height.unwrap_or(grid.height),
        };
        let excluded = match (raw.excluded_lat, raw.excluded_lng) {
            (Some(lat), Some(lng)) => Some(Coordinate::new(lat, lng)),
            (None, None) => excluded,
            _ => return Err(QueryError::PartialExclusion),
        };
        let query = Self {
            bounds,
            grid,
            excluded,
        };
        query.validate()?;
        Ok(query)
    }

    /// Builds a query from configured values, validating it the same way.
    pub fn from_parts(
        bounds: Bounds,
        grid: GridConfig,
        excluded: Option<Coordinate>,
    ) -> Result<Self, QueryError> {
        let query = Self {
            bounds,
            grid,
            excluded,
        };
        query.validate()?;
        Ok(query)
    }

    fn validate(&self) -> Result<(), QueryError> {
        check_dimension("width", self.grid.width)?;
        check_dimension("height", self.grid.height)?;
        let Bounds {
            north,
            south,
            east,
            west,
        } = self.bounds;
        if north > south && east > west {
            Ok(())
        } else {
            Err(QueryError::DegenerateBounds {
                north,
                south,
                east,
                west,
            })
        }
    }

    /// The clusterer matching this query.
    pub fn clusterer(&self, routing: CohortRouting) -> Clusterer {
        let clusterer = Clusterer::new(self.grid.width, self.grid.height).with_routing(routing);
        match self.excluded {
            Some(coordinate) => clusterer.excluding(coordinate.to_position()),
            None => clusterer,
        }
    }
}

fn parse_float(key: &str, value: &str) -> Result<f64, QueryError> {
    match value.trim().parse::<f64>() {
        Ok(number) if number.is_finite() => Ok(number),
        _ => Err(QueryError::InvalidNumber {
            key: key.into(),
            value: value.into(),
        }),
    }
}

fn parse_dimension(key: &str, value: &str) -> Result<usize, QueryError> {
    value
        .trim()
        .parse::<usize>()
        .map_err(|_| QueryError::InvalidNumber {
            key: key.into(),
            value: value.into(),
        })
}

fn check_dimension(name: &'static str, value: usize) -> Result<(), QueryError> {
    if (1..=MAX_GRID_DIMENSION).contains(&value) {
        Ok(())
    } else {
        Err(QueryError::InvalidDimension { name, value })
    }
}

#[cfg(test)]
mod tests {
    use crate::query::*;

    const GRID: GridConfig = GridConfig {
        width: 4,
        height: 3,
    };

    #[test]
    fn test_parse_bounds() {
        let query = ClusterQuery::parse("north=48.9&south=48.8&east=2.4&west=2.2", GRID, None).unwrap();
        assert_eq!(48.9, query.bounds.north);
        assert_eq!(48.8, query.bounds.south);
        assert_eq!(2.4, query.bounds.east);
        assert_eq!(2.2, query.bounds.west);
        assert_eq!(GRID, query.grid);
        assert_eq!(None, query.excluded);
    }

    #[test]
    fn test_parse_overrides() {
        let default_excluded = Some(Coordinate::new(0., 0.));
        let query = ClusterQuery::parse(
            "?north=1&south=-1&east=1&west=-1&width=2&height=5&excluded_lat=0.5&excluded_lng=0.25",
            GRID,
            default_excluded,
        )
        .unwrap();
        assert_eq!(GridConfig { width: 2, height: 5 }, query.grid);
        assert_eq!(Some(Coordinate::new(0.5, 0.25)), query.excluded);
    }

    #[test]
    fn test_default_exclusion() {
        let excluded = Some(Coordinate::new(0., 0.));
        let query = ClusterQuery::parse("north=1&south=-1&east=1&west=-1", GRID, excluded).unwrap();
        assert_eq!(excluded, query.excluded);
    }

    #[test]
    fn test_missing_parameter() {
        let result = ClusterQuery::parse("north=1&south=-1&east=1", GRID, None);
        assert_eq!(Err(QueryError::MissingParameter("west")), result);
    }

    #[test]
    fn test_unknown_parameter() {
        let result = ClusterQuery::parse("north=1&zoom=12", GRID, None);
        assert_eq!(
            Err(QueryError::UnknownParameter {
                key: "zoom".into(),
                value: "12".into()
            }),
            result
        );
    }

    #[test]
    fn test_invalid_numbers() {
        let result = ClusterQuery::parse("north=abc", GRID, None);
        assert!(matches!(result, Err(QueryError::InvalidNumber { .. })));
        let result = ClusterQuery::parse("north=NaN", GRID, None);
        assert!(matches!(result, Err(QueryError::InvalidNumber { .. })));
        let result = ClusterQuery::parse("width=-2", GRID, None);
        assert!(matches!(result, Err(QueryError::InvalidNumber { .. })));
    }

    #[test]
    fn test_invalid_dimensions() {
        let result = ClusterQuery::parse("north=1&south=-1&east=1&west=-1&width=0", GRID, None);
        assert_eq!(
            Err(QueryError::InvalidDimension {
                name: "width",
                value: 0
            }),
            result
        );
        let result = ClusterQuery::parse("north=1&south=-1&east=1&west=-1&height=1000", GRID, None);
        assert!(matches!(result, Err(QueryError::InvalidDimension { name: "height", .. })));
    }

    #[test]
    fn test_degenerate_bounds() {
        let result = ClusterQuery::parse("north=1&south=1&east=1&west=-1", GRID, None);
        assert!(matches!(result, Err(QueryError::DegenerateBounds { .. })));
        let result = ClusterQuery::parse("north=1&south=-1&east=-1&west=1", GRID, None);
        assert!(matches!(result, Err(QueryError::DegenerateBounds { .. })));
    }

    #[test]
    fn test_partial_exclusion() {
        let result = ClusterQuery::parse("north=1&south=-1&east=1&west=-1&excluded_lat=0", GRID, None);
        assert_eq!(Err(QueryError::PartialExclusion), result);
    }

    #[test]
    fn test_clusterer_excludes_in_internal_units() {
        let query = ClusterQuery::parse(
            "north=1&south=-1&east=1&west=-1&width=1&height=1&excluded_lat=0.5&excluded_lng=0.5",
            GRID,
            None,
        )
        .unwrap();
        let expected = Clusterer::new(1, 1)
            .with_routing(CohortRouting::Direct)
            .excluding(Coordinate::new(0.5, 0.5).to_position());
        assert_eq!(expected, query.clusterer(CohortRouting::Direct));
    }
}
