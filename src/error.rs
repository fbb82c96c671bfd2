//! Top-level error type, wrapping the failure modes of every subsystem so `main` can propagate with `?`.

use crate::{config::ConfigError, query::QueryError, service::ServiceError, source::SourceError};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("point source error: {source}")]
    Source {
        #[from]
        source: SourceError,
    },

    #[error("invalid query: {source}")]
    Query {
        #[from]
        source: QueryError,
    },

    #[error("service error: {source}")]
    Service {
        #[from]
        source: ServiceError,
    },

    #[error("failed to serialize clusters: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    #[error("http service error: {source}")]
    Http { source: std::io::Error },

    /// The stdio streamer reports its failures as boxed errors.
    #[error("streamer failed: {message}")]
    Stream { message: String },

    #[error("logging setup failed: {source}")]
    Logging {
        #[from]
        source: std::io::Error,
    },

    /// The file mode clusters the configured bounds, which are optional in the config file.
    #[error("no bounds configured")]
    MissingBounds,
}
