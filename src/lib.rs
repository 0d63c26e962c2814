use axum::{
    Router,
    extract::{FromRef, Request, State},
    http::{HeaderName, StatusCode, header},
    middleware::{self, Next},
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Core application services and components.
pub mod auth;
pub mod config;
pub mod handlers;
pub mod models;
pub mod policy;
pub mod repository;
pub mod seed;

// Module for routing segregation (Public, Actuator, Privileged).
pub mod routes;
use auth::{SessionLookup, SessionStore};
use policy::{AccessPolicy, PolicyDecision};
use routes::{actuator, privileged, public};

// --- Public Re-exports ---

// Makes core state types easily accessible to the main application entry point (main.rs).
pub use config::AppConfig;
pub use repository::{InMemoryCatRepository, RepositoryState};

/// ApiDoc
///
/// Auto-generates the OpenAPI documentation (Swagger JSON) for the
/// application, served at `/api-docs/openapi.json`. The Swagger UI lives
/// under `/swagger-ui`, which sits behind the policy's authenticated
/// catch-all rule.
#[derive(OpenApi)]
#[openapi(
    paths(handlers::get_cats, handlers::health, handlers::privileged_treats),
    components(schemas(models::Cat, models::CatPage, models::TreatsResponse)),
    tags(
        (name = "cat-realm", description = "Cat Realm demonstration API")
    )
)]
struct ApiDoc;

/// AppState
///
/// The single, thread-safe container holding all shared application services
/// and configuration, cloned into every request.
#[derive(Clone)]
pub struct AppState {
    /// Repository Layer: the persistence contract behind `Arc<dyn CatRepository>`.
    pub repo: RepositoryState,
    /// Session Layer: the in-memory session id to identity registry.
    pub sessions: SessionStore,
    /// Access Policy: the ordered rule table gating every request.
    pub policy: AccessPolicy,
    /// Configuration: the loaded, immutable environment configuration.
    pub config: AppConfig,
}

// --- Axum FromRef Extractor Implementations ---

// These allow extractors and handlers to selectively pull components from the
// shared AppState.

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for SessionStore {
    fn from_ref(app_state: &AppState) -> SessionStore {
        app_state.sessions.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// access_policy_middleware
///
/// Applies the access policy to every request, fallback included.
///
/// *Mechanism*: the session cookie is resolved first. An **invalid** session
/// (cookie present but naming no live session) is redirected to `/` with the
/// cookie cleared, before any rule is consulted. Otherwise the policy
/// evaluates `(path, optional identity)` and the decision is mapped onto the
/// HTTP layer: `Permit` runs the inner handler, `Forbidden` returns 403, and
/// `RequireLogin` redirects into the form-login flow.
async fn access_policy_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let identity = match state.sessions.lookup(request.headers()).await {
        SessionLookup::Invalid => {
            tracing::debug!(path = %request.uri().path(), "invalid session presented");
            return (
                AppendHeaders([(header::SET_COOKIE, auth::clear_session_cookie())]),
                Redirect::to("/"),
            )
                .into_response();
        }
        SessionLookup::Authenticated(identity) => Some(identity),
        SessionLookup::Anonymous => None,
    };

    match state.policy.evaluate(request.uri().path(), identity.as_ref()) {
        PolicyDecision::Permit => next.run(request).await,
        PolicyDecision::Forbidden => StatusCode::FORBIDDEN.into_response(),
        PolicyDecision::RequireLogin => Redirect::to("/login").into_response(),
    }
}

/// Fallback for paths no route matches. Runs behind the policy layer, so an
/// unauthenticated probe of an unknown path is redirected to login before any
/// 404 is revealed.
async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}

/// create_router
///
/// Assembles the application's entire routing structure, applies global and
/// scoped middleware, and registers the application state.
pub fn create_router(state: AppState) -> Router {
    // 1. CORS Configuration
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    // Header name constant for Request Correlation.
    let x_request_id = HeaderName::from_static("x-request-id");

    // 2. Base Router Assembly
    let base_router = Router::new()
        // Documentation: Serve the auto-generated Swagger UI.
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Public block: pages, /cats, and the login flow.
        .merge(public::public_routes())
        // Ops surface, nested under /actuator.
        .nest("/actuator", actuator::actuator_routes())
        // Role-restricted subtree, nested under /privileged.
        .nest("/privileged", privileged::privileged_routes())
        // Unknown paths still pass through the policy before 404ing.
        .fallback(not_found)
        // Access Policy: one middleware gates every route above, applying the
        // ordered rule table to (path, resolved identity).
        .layer(middleware::from_fn_with_state(
            state.clone(),
            access_policy_middleware,
        ))
        // Apply the Unified State to all routes.
        .with_state(state);

    // 3. Observability and Correlation Layers (Applied outermost/first)
    base_router
        .layer(
            ServiceBuilder::new()
                // 3a. Request ID Generation: a unique UUID for every incoming request.
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                // 3b. Request Tracing: wraps the request/response lifecycle in a
                // tracing span correlated by the generated request ID.
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                // 3c. Request ID Propagation: returns the x-request-id header to
                // the client.
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        // 4. CORS Layer
        .layer(cors)
}

/// trace_span_logger
///
/// Helper used by `TraceLayer` to customize span creation: includes the
/// `x-request-id` header (if present) alongside the HTTP method and URI, so
/// every log line for a single request is correlated by a unique ID.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
