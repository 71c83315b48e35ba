//! Celo Quiz · Question Generation Backend
//!
//! - Axum HTTP API for the quiz mini-app
//! - AI question generation via Segmind, with answer-distribution balancing
//! - Per-topic memory of recent questions to discourage repeats
//!
//! Important env variables:
//!   PORT                 : u16 (default 3000)
//!   SEGMIND_API_KEY      : credential for the generation service
//!   SEGMIND_API_URL      : default "https://api.segmind.com/v1/claude-3.7-sonnet"
//!   SEGMIND_TIMEOUT_SECS : optional client timeout
//!   QUIZ_CONFIG_PATH     : path to TOML config (system prompt, generation knobs, history sizing)
//!   LOG_LEVEL            : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT           : "pretty" (default) or "json"

mod balance;
mod config;
mod domain;
mod error;
mod generator;
mod history;
mod parse;
mod prompt;
mod protocol;
mod routes;
mod segmind;
mod state;
mod telemetry;
mod util;
mod validate;

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::info;

use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  let state = Arc::new(AppState::from_env()?);
  let app = build_router(state);

  let addr: SocketAddr = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
    .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

  let listener = TcpListener::bind(addr).await?;
  info!(target: "celo_quiz_backend", %addr, "HTTP server listening");
  axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!(target: "celo_quiz_backend", error = %e, "Failed to listen for shutdown signal");
    std::future::pending::<()>().await;
  }
  info!(target: "celo_quiz_backend", "Shutdown signal received");
}
