use axum::Router;
use log::{info, warn};
use tokio::net::TcpListener;

use crate::api;
use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::server::state::AppState;

pub struct Server {
    listener: TcpListener,
    router: Router,
}

impl Server {
    /// Opens the storage root and binds the listener.
    pub async fn new(config: ServerConfig) -> Result<Self, ServerError> {
        let listen_addr = config.listen_addr.clone();
        let state = AppState::new(config)?;
        info!("Storage root: {}", state.root.path().display());

        if let Some(dir) = &state.config.static_dir {
            info!("Serving frontend from {}", dir);
        }

        let router = api::router(state);

        let listener = TcpListener::bind(&listen_addr).await.map_err(|e| {
            warn!("Failed to bind to {}: {}", listen_addr, e);
            ServerError::IoError(e)
        })?;
        info!("Server bound to {}", listen_addr);

        Ok(Self { listener, router })
    }

    pub async fn start(self) -> Result<(), ServerError> {
        info!("Starting RAX file server on {}", self.listener.local_addr()?);

        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
