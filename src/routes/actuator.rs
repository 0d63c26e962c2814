use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Actuator Router Module
///
/// Health and ops endpoints, nested under `/actuator` by `create_router`.
/// The whole subtree is public via the policy's `/actuator/**` rule so that
/// monitoring probes never need credentials.
pub fn actuator_routes() -> Router<AppState> {
    Router::new()
        // GET /actuator/health
        // Liveness probe for load balancers and uptime checks.
        .route("/health", get(handlers::health))
        // GET /actuator/info
        // Build name and version, for ops identification.
        .route("/info", get(handlers::info))
}
