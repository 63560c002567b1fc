//! # byom-server
//!
//! HTTP service implementing the BYOM forecasting contract: a history of
//! timestamped values comes in over `POST /predict`, a forecasting
//! engine is fitted fresh for the request, and the predicted values for
//! the requested horizon go back out. `GET /healthz` reports liveness.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod error;
pub mod orchestrator;
pub mod routes;
pub mod state;
pub mod validation;

pub use state::AppState;

/// Build the application router with middleware
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/healthz", get(routes::healthz))
        .route("/predict", post(routes::predict))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
