use super::config::Config;
use super::error::RelayError;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Liveness only: always 200, whatever the poll loop has been doing.
pub fn router(config: Arc<Config>) -> Router {
    Router::new().route("/", get(status)).with_state(config)
}

async fn status(State(config): State<Arc<Config>>) -> (StatusCode, String) {
    (StatusCode::OK, format!("{} TikTok relay running.", config.username))
}

pub async fn serve(listener: TcpListener, config: Arc<Config>) -> Result<(), RelayError> {
    axum::serve(listener, router(config)).await?;
    Ok(())
}
