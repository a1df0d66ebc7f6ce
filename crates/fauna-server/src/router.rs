use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handler;
use crate::state::AppState;

/// Build the axum router with all fauna endpoints.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/v1/health", get(handler::health))
        .route("/v1/info", get(handler::info))
        .route("/v1/changes", post(handler::submit_change))
        .route("/v1/changes/mine", get(handler::my_history))
        .route("/v1/reports/matrix", get(handler::settlement_matrix))
        .route(
            "/v1/reports/municipality-total",
            get(handler::municipality_total),
        )
        .route("/v1/reports/species-total", get(handler::species_total))
        .route("/v1/reports/endangered", get(handler::endangered_species))
        .route("/v1/reports/growth", get(handler::growth))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
