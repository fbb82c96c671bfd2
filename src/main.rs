use std::{
    path::{Path, PathBuf},
    sync::Arc,
    thread,
};

use clap::Parser;
use tokio::net::TcpListener;
use tracing::{error, info};

use geocluster::{
    config::{Config, DEFAULT_CONFIG_PATH},
    error::Error,
    http, logging,
    query::ClusterQuery,
    responder::{Responder, Settings},
    service::Service,
    source::{JsonFileSource, PointSource},
    streamer::{self, Streamer},
};

/// Clusters geolocated points into a grid of map markers.
#[derive(Parser, Debug)]
#[clap(name = "geocluster", version, about)]
struct Args {
    /// YAML configuration file
    #[clap(short, long, value_parser)]
    config: Option<PathBuf>,

    /// Cluster this JSON point file against the configured bounds, print the result and exit
    #[clap(short, long, value_parser)]
    file: Option<PathBuf>,

    /// Answer queries read from stdin, one per line, instead of serving
    #[clap(long)]
    stdio: bool,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;
    logging::init(config.logfile.as_deref())?;
    let settings = Settings::from(&config);

    if let Some(file) = args.file {
        info!(file = %file.display(), "clustering a single file");
        let responder = load_responder(&JsonFileSource::new(file), settings)?;
        let bounds = config.bounds.ok_or(Error::MissingBounds)?;
        let query = ClusterQuery::from_parts(bounds, settings.grid, settings.excluded)?;
        let output = responder.compute(&query);
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    let responder = match &config.points {
        Some(path) => load_responder(&JsonFileSource::new(path), settings)?,
        None => Responder::new(Arc::new(vec![]), settings),
    };

    if args.stdio {
        info!("answering queries from stdin");
        let (queries, write) = streamer::stdio();
        Streamer::run(Streamer::new(queries, write), &responder).map_err(|e| Error::Stream {
            message: e.to_string(),
        })?;
    } else {
        let service = Service::bind(&config.server.socket_address(), responder.clone())?;
        thread::spawn(move || {
            if let Err(reason) = service.run() {
                error!(%reason, "websocket service stopped");
            }
        });
        let listener = TcpListener::bind(config.server.http_address())
            .await
            .map_err(|source| Error::Http { source })?;
        http::serve(listener, responder)
            .await
            .map_err(|source| Error::Http { source })?;
    }
    info!("shutting down");
    Ok(())
}

/// Fetches the points once; every query then works on a snapshot of them.
fn load_responder(source: &dyn PointSource, settings: Settings) -> Result<Responder, Error> {
    let points = source.fetch()?;
    info!(count = points.len(), "points loaded");
    Ok(Responder::new(Arc::new(points), settings))
}

/// An explicit config path must exist; the default one is optional.
fn load_config(path: Option<&Path>) -> Result<Config, Error> {
    match path {
        Some(path) => Ok(Config::from_file(path)?),
        None => {
            let path = Path::new(DEFAULT_CONFIG_PATH);
            if path.exists() {
                Ok(Config::from_file(path)?)
            } else {
                Ok(Config::default())
            }
        }
    }
}
