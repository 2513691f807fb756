use std::sync::Arc;

use crate::application::forms_auth::{FormsAuthentication, SessionChange, SessionTicket};
use crate::domain::error::DomainError;
use crate::infrastructure::jwt::JwtService;

pub(crate) struct CookieFormsAuthentication {
    jwt: Arc<JwtService>,
    session_ttl_seconds: i64,
    persistent_ttl_seconds: i64,
}

impl CookieFormsAuthentication {
    const DEFAULT_SESSION_TTL_SECONDS: i64 = 30 * 60;

    pub(crate) fn new(
        jwt: Arc<JwtService>,
        session_ttl_seconds: i64,
        persistent_ttl_seconds: i64,
    ) -> Self {
        let session_ttl_seconds = if session_ttl_seconds > 0 {
            session_ttl_seconds
        } else {
            Self::DEFAULT_SESSION_TTL_SECONDS
        };
        Self {
            jwt,
            session_ttl_seconds,
            persistent_ttl_seconds: persistent_ttl_seconds.max(session_ttl_seconds),
        }
    }
}

impl FormsAuthentication for CookieFormsAuthentication {
    fn sign_in(&self, username: &str, persistent: bool) -> Result<SessionChange, DomainError> {
        let ttl_seconds = if persistent {
            self.persistent_ttl_seconds
        } else {
            self.session_ttl_seconds
        };
        let token = self
            .jwt
            .generate_token(username, ttl_seconds)
            .map_err(|err| DomainError::Unexpected(err.to_string()))?;

        Ok(SessionChange::SignedIn(SessionTicket {
            token,
            max_age_seconds: persistent.then_some(ttl_seconds),
        }))
    }

    fn sign_out(&self) -> SessionChange {
        SessionChange::SignedOut
    }
}
