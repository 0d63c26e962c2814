use axum::{
    extract::{FromRef, FromRequestParts},
    http::{HeaderMap, StatusCode, header, request::Parts},
};
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fmt, str::FromStr, sync::Arc};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Name of the session cookie carrying the session id.
pub const SESSION_COOKIE: &str = "CATSESSION";

/// Role
///
/// The two roles recognized by the access policy. Serialized in their
/// uppercase wire form (`DOG`, `ADMIN`) and parsed case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "DOG")]
    Dog,
    #[serde(rename = "ADMIN")]
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Dog => write!(f, "DOG"),
            Role::Admin => write!(f, "ADMIN"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "DOG" => Ok(Role::Dog),
            "ADMIN" => Ok(Role::Admin),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// Identity
///
/// The resolved identity of an authenticated caller: who they are and which
/// roles they hold. This is the only authentication output the access policy
/// consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub username: String,
    pub roles: Vec<Role>,
}

impl Identity {
    pub fn new(username: impl Into<String>, roles: Vec<Role>) -> Self {
        Self {
            username: username.into(),
            roles,
        }
    }

    /// True if the identity holds at least one of the given roles.
    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        self.roles.iter().any(|r| roles.contains(r))
    }
}

/// SessionLookup
///
/// The three-way outcome of resolving a request's session cookie. The
/// distinction between `Anonymous` and `Invalid` matters: an anonymous caller
/// may still reach public routes, while a caller presenting a stale or garbled
/// session id is redirected back to `/` and has the cookie cleared.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionLookup {
    /// No session cookie was presented.
    Anonymous,
    /// A session cookie was presented but does not name a live session.
    Invalid,
    /// The cookie resolved to a live session.
    Authenticated(Identity),
}

/// SessionStore
///
/// In-memory session registry mapping session id (UUID) to resolved identity.
/// Cloning is cheap; all clones share the same map. Sessions live for the
/// lifetime of the process, which is all this demonstration service needs.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Identity>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a session for the identity and returns its id.
    pub async fn create(&self, identity: Identity) -> Uuid {
        let id = Uuid::new_v4();
        self.sessions.write().await.insert(id, identity);
        id
    }

    pub async fn get(&self, id: Uuid) -> Option<Identity> {
        self.sessions.read().await.get(&id).cloned()
    }

    /// Drops a session. Returns true if it existed.
    pub async fn remove(&self, id: Uuid) -> bool {
        self.sessions.write().await.remove(&id).is_some()
    }

    /// Resolves the session cookie (if any) from request headers.
    pub async fn lookup(&self, headers: &HeaderMap) -> SessionLookup {
        if session_cookie_value(headers).is_none() {
            return SessionLookup::Anonymous;
        }
        let Some(id) = session_id(headers) else {
            return SessionLookup::Invalid;
        };
        match self.get(id).await {
            Some(identity) => SessionLookup::Authenticated(identity),
            None => SessionLookup::Invalid,
        }
    }
}

/// The session id presented in the request's session cookie, if one parses.
pub fn session_id(headers: &HeaderMap) -> Option<Uuid> {
    session_cookie_value(headers).and_then(|raw| Uuid::parse_str(&raw).ok())
}

/// Extracts the raw value of the session cookie from the `Cookie` header.
fn session_cookie_value(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').map(str::trim).find_map(|pair| {
        pair.strip_prefix(SESSION_COOKIE)
            .and_then(|rest| rest.strip_prefix('='))
            .map(str::to_owned)
    })
}

/// The `Set-Cookie` value establishing a session.
pub fn session_cookie(id: Uuid) -> String {
    format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly")
}

/// The `Set-Cookie` value clearing the session cookie on the client.
pub fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; Max-Age=0")
}

/// CurrentUser Extractor
///
/// Resolves the authenticated identity for handlers that need it, by looking
/// up the request's session cookie in the shared `SessionStore`. The access
/// policy middleware has already gated the request by the time a handler runs;
/// this extractor exists so handlers can address the caller by name.
///
/// Rejection: 401 Unauthorized when no live session is presented.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Identity);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
    SessionStore: FromRef<S>,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let sessions = SessionStore::from_ref(state);
        match sessions.lookup(&parts.headers).await {
            SessionLookup::Authenticated(identity) => Ok(CurrentUser(identity)),
            _ => Err(StatusCode::UNAUTHORIZED),
        }
    }
}
