//! Authentication system
//!
//! Handles credential validation, token issuance and bearer verification.

pub mod gate;
pub mod results;
pub mod token;
pub mod validator;

pub use gate::AuthGate;
pub use results::{Identity, LoginResult};
