use crate::{
    AppState,
    auth::{self, CurrentUser},
    models::{CatPage, LoginForm, PageFilter, TreatsResponse},
};
use axum::{
    Json,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{AppendHeaders, Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;

/// Default page size of the listing endpoint when none is requested.
const DEFAULT_PAGE_SIZE: usize = 20;

// --- Cat Listing ---

/// get_cats
///
/// [Public Route] Lists the cat collection, one page at a time.
///
/// The page metadata (`total_elements` in particular) is returned as explicit
/// structured fields so clients can read the collection size directly.
#[utoipa::path(
    get,
    path = "/cats",
    params(PageFilter),
    responses((status = 200, description = "One page of cats", body = CatPage))
)]
pub async fn get_cats(
    State(state): State<AppState>,
    Query(filter): Query<PageFilter>,
) -> Result<Json<CatPage>, StatusCode> {
    let cats = state.repo.find_all().await.map_err(|e| {
        tracing::error!("find_all error: {:?}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let size = filter.size.unwrap_or(DEFAULT_PAGE_SIZE).max(1);
    let page = filter.page.unwrap_or(0);
    let total_elements = cats.len();
    let total_pages = total_elements.div_ceil(size);

    let cats = cats
        .into_iter()
        .skip(page.saturating_mul(size))
        .take(size)
        .collect();

    Ok(Json(CatPage {
        cats,
        page,
        size,
        total_elements,
        total_pages,
    }))
}

// --- Static Pages ---

// The public pages are embedded at compile time; there is no content to serve
// beyond these fixed files, so a filesystem-backed static layer would be
// overkill.

/// [Public Route] GET / and GET /index.html — the landing page.
pub async fn index_page() -> Html<&'static str> {
    Html(include_str!("../static/index.html"))
}

/// [Public Route] GET /about.html
pub async fn about_page() -> Html<&'static str> {
    Html(include_str!("../static/about.html"))
}

/// [Public Route] GET /indie_cats.htm — the other top-level "ind*" page.
pub async fn indie_cats_page() -> Html<&'static str> {
    Html(include_str!("../static/indie_cats.htm"))
}

/// [Public Route] GET /favicon.png — referenced by the landing page, so it
/// must be readable without authentication.
pub async fn favicon() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "image/png")],
        include_bytes!("../static/favicon.png").as_slice(),
    )
}

// --- Actuator (ops surface) ---

/// health
///
/// [Public Route] GET /actuator/health — liveness probe for monitoring and
/// load balancer checks.
#[utoipa::path(
    get,
    path = "/actuator/health",
    responses((status = 200, description = "Service is up"))
)]
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "UP" }))
}

/// [Public Route] GET /actuator/info — build identification.
pub async fn info() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "app": {
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
        }
    }))
}

// --- Privileged ---

/// privileged_treats
///
/// [Role-Restricted Route] GET /privileged/treats — demonstration endpoint of
/// the `/privileged/**` subtree. The access policy has already verified the
/// DOG-or-ADMIN requirement before this handler runs; the `CurrentUser`
/// extractor is used here only to address the caller by name.
#[utoipa::path(
    get,
    path = "/privileged/treats",
    responses(
        (status = 200, description = "Treats served", body = TreatsResponse),
        (status = 403, description = "Caller lacks the DOG or ADMIN role")
    )
)]
pub async fn privileged_treats(CurrentUser(identity): CurrentUser) -> Json<TreatsResponse> {
    Json(TreatsResponse {
        message: "A bowl of premium treats, freshly served.".to_string(),
        served_to: identity.username,
    })
}

// --- Form Login ---

/// Query flags the login page renders hints for (`/login?error`,
/// `/login?logout`).
#[derive(Debug, Deserialize)]
pub struct LoginPageQuery {
    pub error: Option<String>,
    pub logout: Option<String>,
}

/// login_page
///
/// [Public Route] GET /login — serves the HTML login form, the only
/// authentication entry point of the application.
pub async fn login_page(Query(query): Query<LoginPageQuery>) -> Html<String> {
    let notice = if query.error.is_some() {
        "<p>Invalid username or password.</p>"
    } else if query.logout.is_some() {
        "<p>You have been logged out.</p>"
    } else {
        ""
    };
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><title>Log in - The Cat Realm</title></head>
<body>
<h1>Log in</h1>
{notice}
<form method="post" action="/login">
    <label>Username <input type="text" name="username"></label><br>
    <label>Password <input type="password" name="password"></label><br>
    <button type="submit">Log in</button>
</form>
</body>
</html>
"#
    ))
}

/// login_submit
///
/// [Public Route] POST /login — verifies the submitted credentials against
/// the configured accounts. Success creates a session, sets the session
/// cookie, and redirects to `/`; failure redirects back to the form with an
/// error flag. The username is logged, the password never is.
pub async fn login_submit(
    State(state): State<AppState>,
    axum::extract::Form(form): axum::extract::Form<LoginForm>,
) -> Response {
    match state.config.authenticate(&form.username, &form.password) {
        Some(account) => {
            let identity = auth::Identity::new(account.username.clone(), account.roles.clone());
            let session_id = state.sessions.create(identity).await;
            tracing::info!(username = %form.username, "login succeeded");
            (
                AppendHeaders([(header::SET_COOKIE, auth::session_cookie(session_id))]),
                Redirect::to("/"),
            )
                .into_response()
        }
        None => {
            tracing::info!(username = %form.username, "login failed");
            Redirect::to("/login?error").into_response()
        }
    }
}

/// logout
///
/// [Public Route] POST /logout — drops the caller's session (if one is live)
/// and clears the cookie. Safe to call anonymously.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(session_id) = auth::session_id(&headers) {
        state.sessions.remove(session_id).await;
    }
    (
        AppendHeaders([(header::SET_COOKIE, auth::clear_session_cookie())]),
        Redirect::to("/login?logout"),
    )
        .into_response()
}
