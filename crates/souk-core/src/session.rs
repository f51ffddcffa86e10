//! Session port
//!
//! The pipeline only reads the current session to decide whether a write may be
//! attempted. The backing identity service implements [`SessionProvider`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// An authenticated credential context.
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: String,
    pub access_token: String,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| at <= Utc::now())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Session lookup failed: {0}")]
pub struct SessionError(pub String);

/// Read access to the current session.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Returns the active session, `None` when signed out.
    async fn get_session(&self) -> Result<Option<Session>, SessionError>;
}

/// Session provider holding a fixed session (or none).
///
/// Used by the CLI, which receives its credentials from the environment.
pub struct StaticSessionProvider {
    session: Option<Session>,
}

impl StaticSessionProvider {
    pub fn new(session: Option<Session>) -> Self {
        Self { session }
    }

    pub fn signed_out() -> Self {
        Self { session: None }
    }

    /// Build from `SOUK_ACCESS_TOKEN` / `SOUK_USER_ID`. Missing token means signed out.
    pub fn from_env() -> Self {
        let token = std::env::var("SOUK_ACCESS_TOKEN")
            .ok()
            .filter(|s| !s.trim().is_empty());
        let session = token.map(|access_token| Session {
            user_id: std::env::var("SOUK_USER_ID").unwrap_or_default(),
            access_token,
            expires_at: None,
        });
        Self { session }
    }
}

#[async_trait]
impl SessionProvider for StaticSessionProvider {
    async fn get_session(&self) -> Result<Option<Session>, SessionError> {
        Ok(self.session.clone())
    }
}
