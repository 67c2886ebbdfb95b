use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use appointment_agent::config::{AppConfig, BookingSettings};
use appointment_agent::handlers;
use appointment_agent::services::booking::BookingTool;
use appointment_agent::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();
    let settings = BookingSettings::from_config(&config)?;

    if settings.base_url.resolve().is_none() {
        tracing::warn!("APPOINTMENTS_API_BASE_URL is not set; bookings fail until it is");
    }
    tracing::info!(
        timezone = settings.timezone.name(),
        max_attempts = settings.max_attempts,
        "booking tool configured"
    );

    let booking = BookingTool::with_client(settings, reqwest::Client::new());

    let state = Arc::new(AppState {
        config: config.clone(),
        booking,
    });

    let app = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/api/tools", get(handlers::tools::list_tools))
        .route(
            "/api/tools/book_appointment",
            post(handlers::tools::book_appointment),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
