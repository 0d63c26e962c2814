use crate::auth::Role;
use std::env;
use std::str::FromStr;

/// UserAccount
///
/// One configured login account: credentials plus the roles the resulting
/// session carries. Plain-text passwords are acceptable here because the
/// account set is demonstration data, not a user database.
#[derive(Debug, Clone, PartialEq)]
pub struct UserAccount {
    pub username: String,
    pub password: String,
    pub roles: Vec<Role>,
}

impl UserAccount {
    pub fn new(username: &str, password: &str, roles: Vec<Role>) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
            roles,
        }
    }
}

/// Env
///
/// Runtime context marker. Controls log formatting (pretty vs JSON) and
/// whether login accounts come from built-in demo data or from a mandatory
/// environment variable.
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

/// AppConfig
///
/// The application's immutable configuration, loaded once at startup and
/// shared through the application state via FromRef.
#[derive(Clone)]
pub struct AppConfig {
    // Runtime environment marker.
    pub env: Env,
    // Listen address for the HTTP server.
    pub bind_addr: String,
    // Accounts accepted by the form-login endpoint.
    pub accounts: Vec<UserAccount>,
}

impl Default for AppConfig {
    /// Provides a safe, non-panicking AppConfig instance primarily used for
    /// test setup, with the same demo accounts a local run gets.
    fn default() -> Self {
        Self {
            env: Env::Local,
            bind_addr: "127.0.0.1:0".to_string(),
            accounts: demo_accounts(),
        }
    }
}

impl AppConfig {
    /// The canonical function for initializing configuration at startup.
    /// Reads all parameters from environment variables and implements the
    /// **fail-fast** principle.
    ///
    /// # Panics
    /// Panics in Production when `CATREALM_USERS` is missing or malformed,
    /// preventing a start with no usable login accounts.
    pub fn load() -> Self {
        let env_str = env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());
        let env = match env_str.as_str() {
            "production" => Env::Production,
            _ => Env::Local,
        };

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        let accounts = match env {
            Env::Local => match env::var("CATREALM_USERS") {
                Ok(spec) => parse_accounts(&spec)
                    .expect("FATAL: CATREALM_USERS is set but could not be parsed"),
                Err(_) => demo_accounts(),
            },
            Env::Production => {
                let spec = env::var("CATREALM_USERS")
                    .expect("FATAL: CATREALM_USERS must be set in production.");
                parse_accounts(&spec).expect("FATAL: CATREALM_USERS could not be parsed")
            }
        };

        Self {
            env,
            bind_addr,
            accounts,
        }
    }

    /// Looks up an account by credentials. Returns the matching account only
    /// when both username and password match.
    pub fn authenticate(&self, username: &str, password: &str) -> Option<&UserAccount> {
        self.accounts
            .iter()
            .find(|a| a.username == username && a.password == password)
    }
}

/// Built-in accounts for local runs and tests: one per authorization tier.
fn demo_accounts() -> Vec<UserAccount> {
    vec![
        UserAccount::new("rex", "woof", vec![Role::Dog]),
        UserAccount::new("garfield", "lasagna", vec![Role::Admin]),
        UserAccount::new("mouse", "squeak", vec![]),
    ]
}

/// Parses the `CATREALM_USERS` account specification.
///
/// Format: `name:password:ROLE+ROLE;name2:password2:` — accounts separated by
/// `;`, fields by `:`, roles by `+`. The roles field may be empty.
pub fn parse_accounts(spec: &str) -> Result<Vec<UserAccount>, String> {
    let mut accounts = Vec::new();
    for entry in spec.split(';').filter(|e| !e.trim().is_empty()) {
        let mut fields = entry.trim().splitn(3, ':');
        let (Some(username), Some(password), Some(roles_str)) =
            (fields.next(), fields.next(), fields.next())
        else {
            return Err(format!("malformed account entry: {entry:?}"));
        };
        if username.is_empty() {
            return Err(format!("empty username in entry: {entry:?}"));
        }
        let roles = roles_str
            .split('+')
            .filter(|r| !r.is_empty())
            .map(Role::from_str)
            .collect::<Result<Vec<_>, _>>()?;
        accounts.push(UserAccount::new(username, password, roles));
    }
    if accounts.is_empty() {
        return Err("no accounts in specification".to_string());
    }
    Ok(accounts)
}
