//! RAX File Server - Entry Point
//!
//! A single-tenant HTTP file server confined to one storage root.

use clap::Parser;
use log::{error, info};
use std::process;

use rax_file_server::Server;
use rax_file_server::config::{Args, ServerConfig};
use rax_file_server::error::ServerError;

#[tokio::main]
async fn main() {
    // Initialize the logger (env_logger picks up RUST_LOG environment variable)
    env_logger::init();

    let args = Args::parse();
    if let Err(e) = run(args).await {
        error!("{}", e);
        process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), ServerError> {
    let config = ServerConfig::load(args.config.as_deref())?;

    info!("Launching file server...");

    let server = Server::new(config).await?;
    server.start().await
}
