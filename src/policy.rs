use crate::auth::{Identity, Role};

/// PathPattern
///
/// The pattern vocabulary of the access policy. Each variant corresponds to one
/// matcher shape used by the rule table: exact paths, whole subtrees, and
/// top-level filename prefixes. Patterns are plain data so the policy can be
/// evaluated (and tested) without any HTTP request type in sight.
#[derive(Debug, Clone, PartialEq)]
pub enum PathPattern {
    /// Matches the path exactly. `Exact("/cats")` does NOT match `/cats/1`.
    Exact(String),
    /// Matches the base path itself and anything below it.
    /// `Subtree("/actuator")` matches `/actuator`, `/actuator/health`, ...
    Subtree(String),
    /// Matches top-level paths starting with the prefix.
    /// `TopLevelPrefix("/ind")` matches `/index.html` and `/indie_cats.htm`,
    /// but not `/ind/nested` (a further `/` disqualifies the path).
    TopLevelPrefix(String),
    /// Matches every path. Used as the terminating catch-all rule.
    Any,
}

impl PathPattern {
    pub fn matches(&self, path: &str) -> bool {
        match self {
            PathPattern::Exact(p) => path == p,
            PathPattern::Subtree(base) => {
                path == base || (path.starts_with(base) && path.as_bytes().get(base.len()) == Some(&b'/'))
            }
            PathPattern::TopLevelPrefix(prefix) => {
                path.starts_with(prefix.as_str()) && !path[prefix.len()..].contains('/')
            }
            PathPattern::Any => true,
        }
    }
}

/// Access
///
/// The level of access a matched rule grants.
#[derive(Debug, Clone, PartialEq)]
pub enum Access {
    /// No authentication, no authorization.
    Public,
    /// Requires an authenticated caller holding at least one of the listed roles.
    AnyRole(Vec<Role>),
    /// Requires any authenticated caller, regardless of role.
    Authenticated,
}

/// AccessRule
///
/// One `(pattern, access)` entry of the ordered rule table.
#[derive(Debug, Clone, PartialEq)]
pub struct AccessRule {
    pub pattern: PathPattern,
    pub access: Access,
}

impl AccessRule {
    pub fn new(pattern: PathPattern, access: Access) -> Self {
        Self { pattern, access }
    }
}

/// PolicyDecision
///
/// The three authorization outcomes. The hosting HTTP layer maps these onto
/// responses: `Permit` lets the request through, `Forbidden` becomes a 403,
/// and `RequireLogin` becomes a redirect into the form-login flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyDecision {
    Permit,
    Forbidden,
    RequireLogin,
}

/// AccessPolicy
///
/// An ordered list of access rules evaluated **first-match-wins**. The policy
/// is deliberately a pure value: `evaluate` takes the request path and the
/// caller's resolved identity (if any) and returns a decision, carrying no
/// state between requests. Session resolution and response shaping belong to
/// the surrounding HTTP layer.
#[derive(Debug, Clone, PartialEq)]
pub struct AccessPolicy {
    rules: Vec<AccessRule>,
}

impl AccessPolicy {
    /// Builds a policy from an explicit rule list. The caller is responsible
    /// for terminating the list with a catch-all; `evaluate` treats an
    /// unmatched path as requiring authentication, the safe default.
    pub fn new(rules: Vec<AccessRule>) -> Self {
        Self { rules }
    }

    /// The application's rule table. Order is significant: the public block
    /// first, then the role-restricted subtree, then the authenticated
    /// catch-all. `/login` and `/logout` are listed explicitly so the login
    /// flow itself stays reachable for anonymous callers.
    pub fn realm_defaults() -> Self {
        use Access::*;
        use PathPattern::*;
        Self::new(vec![
            // -------- Public block: no authentication, no authorization
            AccessRule::new(Subtree("/actuator".into()), Public),
            AccessRule::new(Exact("/cats".into()), Public),
            AccessRule::new(Exact("/favicon.png".into()), Public),
            AccessRule::new(Exact("/about.html".into()), Public),
            // /index.html, /indie_cats.htm and any other top-level "ind" file
            AccessRule::new(TopLevelPrefix("/ind".into()), Public),
            AccessRule::new(Exact("/".into()), Public),
            AccessRule::new(Exact("/login".into()), Public),
            AccessRule::new(Exact("/logout".into()), Public),
            // -------- Role-restricted subtree
            AccessRule::new(
                Subtree("/privileged".into()),
                AnyRole(vec![Role::Dog, Role::Admin]),
            ),
            // -------- Everything else requires an authenticated session
            AccessRule::new(Any, Authenticated),
        ])
    }

    pub fn rules(&self) -> &[AccessRule] {
        &self.rules
    }

    /// Evaluates a request path against the rule table, first match wins.
    pub fn evaluate(&self, path: &str, identity: Option<&Identity>) -> PolicyDecision {
        for rule in &self.rules {
            if !rule.pattern.matches(path) {
                continue;
            }
            return match &rule.access {
                Access::Public => PolicyDecision::Permit,
                Access::AnyRole(roles) => match identity {
                    None => PolicyDecision::RequireLogin,
                    Some(id) if id.has_any_role(roles) => PolicyDecision::Permit,
                    Some(_) => PolicyDecision::Forbidden,
                },
                Access::Authenticated => match identity {
                    Some(_) => PolicyDecision::Permit,
                    None => PolicyDecision::RequireLogin,
                },
            };
        }
        // No rule matched: the default table ends in a catch-all, so this only
        // happens with a custom table. Fall back to requiring authentication.
        match identity {
            Some(_) => PolicyDecision::Permit,
            None => PolicyDecision::RequireLogin,
        }
    }
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self::realm_defaults()
    }
}
