//! SCORM AI · Course Generator Backend
//!
//! - Axum HTTP API for generating SCORM 1.2 packages from a content brief
//! - Optional OpenAI integration (via environment variables)
//! - Optional SCORM Cloud upload/hosting integration
//! - Static authoring page fallback (./static/index.html)
//!
//! Important env variables:
//!   PORT                   : u16 (default 3000)
//!   OPENAI_API_KEY         : enables OpenAI integration if present
//!   OPENAI_BASE_URL        : default "https://api.openai.com/v1"
//!   OPENAI_MODEL           : default "gpt-3.5-turbo"
//!   SCORM_CLOUD_APP_ID     : enables SCORM Cloud integration (with secret)
//!   SCORM_CLOUD_SECRET_KEY : enables SCORM Cloud integration (with app id)
//!   SCORM_CLOUD_API_URL    : default "https://cloud.scorm.com/api/v2/"
//!   SCORMAI_CONFIG_PATH    : path to TOML config (prompt overrides)
//!   LOG_LEVEL              : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT             : "pretty" (default) or "json"

mod telemetry;
mod util;
mod domain;
mod config;
mod content;
mod bridge;
mod package;
mod openai;
mod cloud;
mod state;
mod protocol;
mod routes;

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{info, instrument};

use crate::routes::build_router;
use crate::state::AppState;

#[instrument(level = "info", skip_all)]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  // Build shared application state (prompts, OpenAI client, SCORM Cloud client).
  let state = Arc::new(AppState::new());

  // Build the HTTP router with routes, CORS and tracing layers.
  let app = build_router(state.clone());

  // Read port from env or default to 3000.
  let addr: SocketAddr = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
    .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

  let listener = TcpListener::bind(addr).await?;
  info!(target: "scormai_backend", %addr, "HTTP server listening");
  axum::serve(listener, app).await?;
  Ok(())
}
