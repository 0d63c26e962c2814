use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Privileged Router Module
///
/// Routes nested under `/privileged`, the role-restricted subtree of the
/// access policy.
///
/// Access Control:
/// The policy middleware admits requests into this subtree only when the
/// session holds the DOG or ADMIN role; anonymous callers are redirected to
/// the login flow and role-less sessions receive 403. Handlers here can
/// therefore assume an authorized caller.
pub fn privileged_routes() -> Router<AppState> {
    Router::new()
        // GET /privileged/treats
        // Demonstration endpoint; echoes the caller's username.
        .route("/treats", get(handlers::privileged_treats))
}
