//! # byom-server
//!
//! BYOM forecasting service binary. Wires the default seasonal-trend
//! engine into the HTTP app and serves it.

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use byom_server::{app, AppState};
use forecaster_core::SeasonalTrendForecaster;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file (optional - won't fail if missing)
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "byom_server=info,tower_http=info".into()),
        )
        .init();

    let state = AppState::new(Arc::new(SeasonalTrendForecaster::default()));
    let app = app(state);

    // Server configuration from environment
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .unwrap_or_else(|_| "8082".to_string())
        .parse()?;
    let addr: SocketAddr = format!("{host}:{port}").parse()?;

    tracing::info!("byom-server v{} listening on {}", env!("CARGO_PKG_VERSION"), addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
