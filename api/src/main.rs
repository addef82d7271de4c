mod api_error;
mod auth;
mod config;
mod grade_handler;
mod grade_request;
mod grade_response;
mod routes;

use anyhow::{Context, Result};
use config::ServerConfig;
use grader::{GeminiService, GradingService};
use routes::AppState;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize environment variables and logging
    dotenv::dotenv().ok();
    env_logger::init();

    let config = ServerConfig::from_env()?;
    log::info!(
        "Using model {} (timeout {}s)",
        config.gemini.model,
        config.gemini.timeout.as_secs()
    );

    let gemini = GeminiService::new(config.gemini.clone())?;
    let state = AppState {
        grading: Arc::new(GradingService::new(Arc::new(gemini))),
    };
    let app = routes::app(state, config.max_body_bytes);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    log::info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
