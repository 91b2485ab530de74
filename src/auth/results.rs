//! Authentication result types
//!
//! Defines result structures returned by authentication operations.

use chrono::{DateTime, Utc};

/// The principal attached to an authorized request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub username: String,
}

/// Result of a successful login
#[derive(Debug, Clone)]
pub struct LoginResult {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}
