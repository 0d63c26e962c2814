use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, Method, Request, StatusCode, Uri, header, request::Parts},
};
use cat_realm::{
    AppState,
    auth::{CurrentUser, Identity, Role, SESSION_COOKIE, SessionLookup, SessionStore},
    config::{AppConfig, parse_accounts},
    policy::AccessPolicy,
    repository::InMemoryCatRepository,
};
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

// --- Helper Functions ---

fn create_app_state(sessions: SessionStore) -> AppState {
    AppState {
        repo: Arc::new(InMemoryCatRepository::new()),
        sessions,
        policy: AccessPolicy::realm_defaults(),
        config: AppConfig::default(),
    }
}

/// Helper to get the Parts struct from a generated Request.
fn get_request_parts(method: Method, uri: Uri) -> Parts {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap();
    let (parts, _) = request.into_parts();
    parts
}

fn cookie_headers(value: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::COOKIE, value.parse().unwrap());
    headers
}

// --- SessionStore ---

#[tokio::test]
async fn lookup_without_cookie_is_anonymous() {
    let store = SessionStore::new();
    assert_eq!(store.lookup(&HeaderMap::new()).await, SessionLookup::Anonymous);
}

#[tokio::test]
async fn lookup_with_unknown_session_id_is_invalid() {
    let store = SessionStore::new();
    let headers = cookie_headers(&format!("{}={}", SESSION_COOKIE, Uuid::new_v4()));
    assert_eq!(store.lookup(&headers).await, SessionLookup::Invalid);
}

#[tokio::test]
async fn lookup_with_garbled_session_id_is_invalid() {
    let store = SessionStore::new();
    let headers = cookie_headers(&format!("{}=not-a-uuid", SESSION_COOKIE));
    assert_eq!(store.lookup(&headers).await, SessionLookup::Invalid);
}

#[tokio::test]
async fn lookup_resolves_a_live_session() {
    let store = SessionStore::new();
    let identity = Identity::new("rex", vec![Role::Dog]);
    let id = store.create(identity.clone()).await;

    // The session cookie may sit among others in the header.
    let headers = cookie_headers(&format!("other=1; {}={}; theme=dark", SESSION_COOKIE, id));
    assert_eq!(
        store.lookup(&headers).await,
        SessionLookup::Authenticated(identity)
    );
}

#[tokio::test]
async fn removed_sessions_no_longer_resolve() {
    let store = SessionStore::new();
    let id = store.create(Identity::new("rex", vec![Role::Dog])).await;
    assert!(store.remove(id).await);
    assert!(!store.remove(id).await);

    let headers = cookie_headers(&format!("{}={}", SESSION_COOKIE, id));
    assert_eq!(store.lookup(&headers).await, SessionLookup::Invalid);
}

// --- CurrentUser Extractor ---

#[tokio::test]
async fn extractor_resolves_identity_from_session_cookie() {
    let sessions = SessionStore::new();
    let id = sessions
        .create(Identity::new("garfield", vec![Role::Admin]))
        .await;
    let app_state = create_app_state(sessions);

    let mut parts = get_request_parts(Method::GET, "/privileged/treats".parse().unwrap());
    parts.headers.insert(
        header::COOKIE,
        format!("{SESSION_COOKIE}={id}").parse().unwrap(),
    );

    let current = CurrentUser::from_request_parts(&mut parts, &app_state).await;
    assert!(current.is_ok());
    let CurrentUser(identity) = current.unwrap();
    assert_eq!(identity.username, "garfield");
    assert_eq!(identity.roles, vec![Role::Admin]);
}

#[tokio::test]
async fn extractor_rejects_missing_session_with_unauthorized() {
    let app_state = create_app_state(SessionStore::new());
    let mut parts = get_request_parts(Method::GET, "/privileged/treats".parse().unwrap());

    let current = CurrentUser::from_request_parts(&mut parts, &app_state).await;
    assert!(current.is_err());
    assert_eq!(current.unwrap_err(), StatusCode::UNAUTHORIZED);
}

// --- Roles & Identity ---

#[test]
fn roles_parse_case_insensitively() {
    assert_eq!(Role::from_str("DOG").unwrap(), Role::Dog);
    assert_eq!(Role::from_str("admin").unwrap(), Role::Admin);
    assert!(Role::from_str("CAT").is_err());
}

#[test]
fn has_any_role_checks_intersection() {
    let id = Identity::new("rex", vec![Role::Dog]);
    assert!(id.has_any_role(&[Role::Dog, Role::Admin]));
    assert!(!id.has_any_role(&[Role::Admin]));
    assert!(!Identity::new("mouse", vec![]).has_any_role(&[Role::Dog, Role::Admin]));
}

// --- Account Specification Parsing ---

#[test]
fn parses_account_specification() {
    let accounts = parse_accounts("rex:woof:DOG;root:s3cret:DOG+ADMIN;mouse:squeak:").unwrap();
    assert_eq!(accounts.len(), 3);
    assert_eq!(accounts[0].username, "rex");
    assert_eq!(accounts[0].roles, vec![Role::Dog]);
    assert_eq!(accounts[1].roles, vec![Role::Dog, Role::Admin]);
    assert!(accounts[2].roles.is_empty());
}

#[test]
fn rejects_malformed_account_specifications() {
    assert!(parse_accounts("").is_err());
    assert!(parse_accounts("no-fields").is_err());
    assert!(parse_accounts("rex:woof").is_err());
    assert!(parse_accounts(":woof:DOG").is_err());
    assert!(parse_accounts("rex:woof:WOLF").is_err());
}

#[test]
fn authenticate_matches_full_credentials_only() {
    let config = AppConfig::default();
    assert!(config.authenticate("rex", "woof").is_some());
    assert!(config.authenticate("rex", "wrong").is_none());
    assert!(config.authenticate("nobody", "woof").is_none());
}
