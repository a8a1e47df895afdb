//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Reference data
        .route("/timezones", get(handlers::list_timezones))
        .route("/messages/{locale}", get(handlers::get_messages))
        // Computation
        .route("/fate/single", post(handlers::compute_single))
        .route("/fate/couple", post(handlers::compute_couple))
        // Side channels
        .route("/feedback", post(handlers::submit_feedback))
        .route("/chat", post(handlers::chat))
        .route("/payment-link", get(handlers::get_payment_link));

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        // Forms are small; anything larger is not a form.
        .layer(DefaultBodyLimit::max(64 * 1024))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ephemeris::AnalyticEphemeris;
    use crate::fate::{FateCalculator, LocalTimePolicy};
    use crate::i18n::Catalog;
    use crate::submission::SubmissionSinkFactory;
    use std::sync::Arc;

    #[test]
    fn test_router_creation() {
        let calculator =
            FateCalculator::new(Arc::new(AnalyticEphemeris::new()), LocalTimePolicy::Reject);
        let state = AppState::new(
            calculator,
            SubmissionSinkFactory::create_local(),
            Catalog::builtin().unwrap(),
        );
        let _router = create_router(state);
    }
}
