use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Defines the endpoints the access policy's public block points at. Every
/// route registered here must have a matching Public rule in the policy
/// table; a route without one would be reachable only by authenticated
/// callers through the catch-all rule.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /
        // The landing page. The exact "/" pattern in the policy admits it.
        .route("/", get(handlers::index_page))
        // GET /index.html and GET /indie_cats.htm
        // Top-level pages admitted by the "/ind*" prefix rule.
        .route("/index.html", get(handlers::index_page))
        .route("/indie_cats.htm", get(handlers::indie_cats_page))
        // GET /about.html
        .route("/about.html", get(handlers::about_page))
        // GET /favicon.png
        // Referenced from index.html, so it must load without a session.
        .route("/favicon.png", get(handlers::favicon))
        // GET /cats?page=...&size=...
        // The REST collection endpoint. "/cats" is an *exact* public match;
        // anything beneath it falls through to the authenticated catch-all.
        .route("/cats", get(handlers::get_cats))
        // GET /login, POST /login, POST /logout
        // The form-login flow, the only authentication entry point.
        .route("/login", get(handlers::login_page).post(handlers::login_submit))
        .route("/logout", post(handlers::logout))
}
