//! Minimal auth surface backing the WebSocket handshake and HTTP control API.
//!
//! Grounded on `original_source/websocket/hub.go`'s `AuthService` interface
//! (`ValidateToken(token string) (*models.User, error)`). This crate has no
//! user/session model to return, so the Rust trait narrows to a yes/no check
//! against the configured token.

use crate::error::HandshakeError;

pub trait AuthService: Send + Sync {
    fn validate_token(&self, token: &str) -> Result<(), HandshakeError>;
}

/// Compares the presented token against a single configured secret
/// (`AUTH_TOKEN`). Good enough for a single-operator control plane; a
/// multi-tenant deployment would swap this for a real session store without
/// touching call sites, since they only depend on `AuthService`.
pub struct StaticTokenAuth {
    token: String,
}

impl StaticTokenAuth {
    pub fn new(token: impl Into<String>) -> Self {
        StaticTokenAuth { token: token.into() }
    }
}

impl AuthService for StaticTokenAuth {
    fn validate_token(&self, token: &str) -> Result<(), HandshakeError> {
        if token.is_empty() || token != self.token {
            return Err(HandshakeError::Unauthorized);
        }
        Ok(())
    }
}
