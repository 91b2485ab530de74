//! Shared request state
//!
//! Everything a handler needs, built once at startup and cloned per request.

use std::sync::Arc;

use crate::auth::AuthGate;
use crate::config::ServerConfig;
use crate::error::StorageError;
use crate::storage::StorageRoot;

#[derive(Debug, Clone)]
pub struct AppState {
    pub root: Arc<StorageRoot>,
    pub auth: Arc<AuthGate>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Opens the storage root named by `config` and builds the auth gate.
    pub fn new(config: ServerConfig) -> Result<Self, StorageError> {
        let root = StorageRoot::open(config.storage_root_path())?;
        let auth = AuthGate::new(&config);

        Ok(Self {
            root: Arc::new(root),
            auth: Arc::new(auth),
            config: Arc::new(config),
        })
    }
}
