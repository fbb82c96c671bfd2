//! HTTP front end: `GET /?north=..&south=..` answers with the cluster JSON.
//!
//! The query string is handed to the [`Responder`] untouched, so the HTTP route
//! and the websocket service accept the same queries and return the same bodies.

use axum::{
    extract::{RawQuery, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::{marker::ClusterOutput, query::QueryError, responder::Responder};

/// Path of the clustering route.
pub const HTTP_CLUSTER_PATH: &str = "/";

/// Rejected queries become `400 Bad Request` with an `{"error": ...}` body.
impl IntoResponse for QueryError {
    fn into_response(self) -> Response {
        let body = json!({ "error": self.to_string() });
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}

pub fn build_router(responder: Responder) -> Router {
    Router::new()
        .route(HTTP_CLUSTER_PATH, get(cluster))
        .layer(TraceLayer::new_for_http())
        .with_state(responder)
}

async fn cluster(
    State(responder): State<Responder>,
    RawQuery(query): RawQuery,
) -> Result<Json<ClusterOutput>, QueryError> {
    let output = responder.answer(query.as_deref().unwrap_or_default())?;
    Ok(Json(output))
}

/// Serves the router on an already bound listener until the process stops.
pub async fn serve(listener: TcpListener, responder: Responder) -> std::io::Result<()> {
    info!(address = %listener.local_addr()?, "http service listening");
    axum::serve(listener, build_router(responder)).await
}
