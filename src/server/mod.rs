//! Server core functionality
//!
//! This module contains the listener lifecycle and the state shared by all
//! request handlers.

pub mod core;
pub mod state;

pub use self::core::Server;
pub use state::AppState;
