//! Account registration, login sessions and request gating.

use std::collections::HashMap;
use std::path::Path;
use std::time::{Duration, Instant};

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use lotto_db::db::{find_user_by_username, insert_user, migrate, open_db};
use lotto_db::models::NewUser;
use lotto_db::rusqlite::Connection;
use parking_lot::{Mutex, RwLock};
use rand::RngExt;
use thiserror::Error;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "lotto_session";
/// Header carrying the API key when the api-key policy is active.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Authentication errors, mapped to HTTP statuses at the REST boundary.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("username already exists: {0}")]
    DuplicateUser(String),

    #[error("passwords do not match")]
    PasswordMismatch,

    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// No session or API key presented.
    #[error("authentication required")]
    Unauthorized,

    /// An API key was presented but does not match.
    #[error("invalid API key")]
    Forbidden,

    #[error("storage error: {0}")]
    Storage(String),
}

/// Who may call the generation endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum AuthPolicy {
    /// No credentials required.
    #[default]
    Open,
    /// A valid session cookie is required.
    Session,
    /// The configured API key must be sent in `x-api-key`.
    ApiKey,
}

/// Profile fields stored alongside the credentials.
#[derive(Debug, Clone)]
pub struct Profile {
    pub name: String,
    pub age: u32,
    pub gender: String,
}

#[derive(Debug, Clone)]
pub struct SessionInfo {
    pub user_id: i64,
    pub username: String,
}

#[derive(Debug)]
struct Session {
    info: SessionInfo,
    created: Instant,
}

/// In-memory session table keyed by opaque random tokens.
#[derive(Debug)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Open a session and return its token.
    pub fn create(&self, user_id: i64, username: &str) -> String {
        let token = new_token();
        let session = Session {
            info: SessionInfo {
                user_id,
                username: username.to_string(),
            },
            created: Instant::now(),
        };
        let mut sessions = self.sessions.write();
        sessions.retain(|_, s| s.created.elapsed() < self.ttl);
        sessions.insert(token.clone(), session);
        token
    }

    /// Session for `token`, unless unknown or expired.
    pub fn get(&self, token: &str) -> Option<SessionInfo> {
        let sessions = self.sessions.read();
        sessions
            .get(token)
            .filter(|s| s.created.elapsed() < self.ttl)
            .map(|s| s.info.clone())
    }

    pub fn remove(&self, token: &str) -> bool {
        self.sessions.write().remove(token).is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn new_token() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    hex::encode(bytes)
}

/// Hash a password into a salted Argon2 PHC string.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt_bytes: [u8; 16] = rand::rng().random();
    let salt = SaltString::encode_b64(&salt_bytes).map_err(|e| AuthError::Storage(e.to_string()))?;
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Storage(e.to_string()))
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok())
        .unwrap_or(false)
}

/// Registration, login and session lookup over the user table.
pub struct AuthService {
    conn: Mutex<Connection>,
    sessions: SessionStore,
}

impl AuthService {
    pub fn new(conn: Connection, session_ttl: Duration) -> anyhow::Result<Self> {
        migrate(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            sessions: SessionStore::new(session_ttl),
        })
    }

    pub fn open(path: &Path, session_ttl: Duration) -> anyhow::Result<Self> {
        Self::new(open_db(path)?, session_ttl)
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Create an account. Returns the new user id.
    pub fn register(
        &self,
        username: &str,
        password: &str,
        confirm_password: &str,
        profile: Profile,
    ) -> Result<i64, AuthError> {
        if password != confirm_password {
            return Err(AuthError::PasswordMismatch);
        }
        let username = username.trim();
        if username.is_empty() {
            return Err(AuthError::InvalidInput("username must not be empty".to_string()));
        }
        if password.is_empty() {
            return Err(AuthError::InvalidInput("password must not be empty".to_string()));
        }

        let user = NewUser {
            username: username.to_string(),
            password_hash: hash_password(password)?,
            name: profile.name,
            age: profile.age,
            gender: profile.gender,
        };

        let conn = self.conn.lock();
        match insert_user(&conn, &user) {
            Ok(Some(id)) => {
                log::info!("Registered user '{}' (id={})", user.username, id);
                Ok(id)
            }
            Ok(None) => Err(AuthError::DuplicateUser(user.username)),
            Err(e) => Err(AuthError::Storage(format!("{e:#}"))),
        }
    }

    /// Check credentials and open a session. Returns the session token.
    pub fn login(&self, username: &str, password: &str) -> Result<String, AuthError> {
        let user = {
            let conn = self.conn.lock();
            find_user_by_username(&conn, username.trim()).map_err(|e| AuthError::Storage(format!("{e:#}")))?
        };
        match user {
            Some(user) if verify_password(password, &user.password_hash) => {
                log::info!("User '{}' logged in", user.username);
                Ok(self.sessions.create(user.id, &user.username))
            }
            _ => {
                log::warn!("Failed login for '{}'", username);
                Err(AuthError::InvalidCredentials)
            }
        }
    }

    /// Close the session, if any. Unknown tokens are ignored.
    pub fn logout(&self, token: Option<&str>) {
        if let Some(token) = token {
            if self.sessions.remove(token) {
                log::info!("Session closed");
            }
        }
    }

    pub fn session(&self, token: &str) -> Option<SessionInfo> {
        self.sessions.get(token)
    }

    /// Apply `policy` to the credentials presented with a request.
    pub fn authorize(
        &self,
        policy: AuthPolicy,
        expected_api_key: Option<&str>,
        session_token: Option<&str>,
        api_key: Option<&str>,
    ) -> Result<(), AuthError> {
        match policy {
            AuthPolicy::Open => Ok(()),
            AuthPolicy::Session => match session_token.and_then(|t| self.session(t)) {
                Some(_) => Ok(()),
                None => Err(AuthError::Unauthorized),
            },
            AuthPolicy::ApiKey => match (api_key, expected_api_key) {
                (None, _) => Err(AuthError::Unauthorized),
                (Some(given), Some(expected)) if given == expected => Ok(()),
                (Some(_), _) => Err(AuthError::Forbidden),
            },
        }
    }
}
