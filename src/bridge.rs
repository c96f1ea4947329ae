use std::sync::Arc;

use anyhow::Result;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;

use crate::health::HealthMonitor;

/// Run the bridge REST server until the shutdown token fires.
///
/// This is the endpoint Home Assistant itself can call via `rest_command`,
/// so it stays deliberately tiny: an uptime probe and the health diagnostic.
pub async fn serve(addr: &str, monitor: HealthMonitor, shutdown: CancellationToken) -> Result<()> {
    let app = router(Arc::new(monitor));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("bridge listening on {addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;
    Ok(())
}

fn router(monitor: Arc<HealthMonitor>) -> Router {
    Router::new()
        .route("/ping", get(ping))
        .route("/health", get(health))
        .with_state(monitor)
}

/// Uptime check.
async fn ping() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Run the health diagnostic and return its structured summary.
async fn health(State(monitor): State<Arc<HealthMonitor>>) -> Response {
    match monitor.generate().await {
        Ok(report) => Json(report.summary()).into_response(),
        Err(error) => {
            tracing::error!(%error, "health check failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "status": "error", "summary": "Health check failed" })),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ping_always_answers_ok() {
        let Json(body) = ping().await;
        assert_eq!(body["status"], "ok");
    }
}
