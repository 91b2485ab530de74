//! Server middleware
//!
//! Provides request logging and bearer-token authentication.

pub mod auth;
pub mod logging;

pub use auth::require_auth;
pub use logging::log_requests;
