//! Authentication gate
//!
//! Login for the admin account and per-request bearer verification.

use chrono::Utc;
use log::info;
use std::time::Duration;

use crate::auth::results::{Identity, LoginResult};
use crate::auth::token::{issue_token, verify_token};
use crate::auth::validator::validate_credentials;
use crate::config::ServerConfig;
use crate::error::AuthError;

const BEARER_PREFIX: &str = "Bearer ";

#[derive(Debug, Clone)]
pub struct AuthGate {
    admin_username: String,
    admin_password: String,
    secret: String,
    ttl: Duration,
}

impl AuthGate {
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            admin_username: config.admin_username.clone(),
            admin_password: config.admin_password.clone(),
            secret: config.jwt_secret.clone(),
            ttl: config.token_ttl(),
        }
    }

    /// Checks the credentials and issues a token on success.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<LoginResult, AuthError> {
        validate_credentials(
            username,
            password,
            &self.admin_username,
            &self.admin_password,
        )?;

        let (token, expires_at) = issue_token(username, &self.secret, self.ttl, Utc::now())?;
        info!("User {} logged in, token expires at {}", username, expires_at);

        Ok(LoginResult { token, expires_at })
    }

    /// Verifies an `Authorization` header value of the form `Bearer <token>`.
    pub fn authorize(&self, header: Option<&str>) -> Result<Identity, AuthError> {
        let header = header.ok_or(AuthError::MissingToken)?;
        let token = header
            .strip_prefix(BEARER_PREFIX)
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::MissingToken)?;

        let claims = verify_token(token, &self.secret)?;
        Ok(Identity {
            username: claims.username,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate() -> AuthGate {
        AuthGate::new(&ServerConfig {
            jwt_secret: "gate-secret".into(),
            ..ServerConfig::default()
        })
    }

    #[test]
    fn test_login_then_authorize() {
        let gate = gate();
        let login = gate.authenticate("admin", "admin123").unwrap();

        let remaining = login.expires_at - Utc::now();
        assert!(remaining > chrono::Duration::hours(23));
        assert!(remaining <= chrono::Duration::hours(24));

        let header = format!("Bearer {}", login.token);
        let identity = gate.authorize(Some(&header)).unwrap();
        assert_eq!(identity.username, "admin");
    }

    #[test]
    fn test_authorize_requires_bearer() {
        let gate = gate();
        let login = gate.authenticate("admin", "admin123").unwrap();

        assert!(matches!(gate.authorize(None), Err(AuthError::MissingToken)));
        assert!(matches!(
            gate.authorize(Some(&login.token)),
            Err(AuthError::MissingToken)
        ));
        assert!(matches!(
            gate.authorize(Some("Bearer ")),
            Err(AuthError::MissingToken)
        ));
        assert!(matches!(
            gate.authorize(Some("Bearer forged.token.value")),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_bad_login() {
        assert!(matches!(
            gate().authenticate("admin", "nope"),
            Err(AuthError::InvalidCredentials(_))
        ));
    }
}
