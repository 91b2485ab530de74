//! HTTP API
//!
//! Thin adapters between axum and the storage/auth core: they parse the
//! request, call one core operation and encode the result.

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::Method;
use axum::http::header::{ACCEPT, AUTHORIZATION, CACHE_CONTROL, CONTENT_LENGTH, CONTENT_TYPE, ORIGIN};
use axum::middleware;
use axum::routing::{delete, get, post};
use std::path::PathBuf;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};

pub mod directories;
pub mod extract;
pub mod files;
pub mod login;
pub mod responses;

use crate::middleware::{log_requests, require_auth};
use crate::server::AppState;

const API_PREFIX: &str = "/api";

/// Builds the complete application router.
pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/upload", post(files::upload))
        .route("/download/:filename", get(files::download))
        .route("/delete/:filename", delete(files::remove))
        .route("/list", get(files::list))
        .route("/mkdir", post(directories::create))
        .route("/rmdir/:dirname", delete(directories::remove))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    let api = Router::new()
        .route("/login", post(login::handler))
        .route("/health", get(responses::health))
        .merge(protected)
        .fallback(responses::not_found);

    let cors_layer = CorsLayer::new()
        .allow_methods(vec![
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(vec![
            ACCEPT,
            AUTHORIZATION,
            CACHE_CONTROL,
            CONTENT_LENGTH,
            CONTENT_TYPE,
            ORIGIN,
        ])
        .allow_origin(Any)
        .allow_credentials(false);

    let app = Router::new().nest(API_PREFIX, api);
    let app = match &state.config.static_dir {
        Some(dir) => {
            let dir = PathBuf::from(dir);
            // Unknown paths get index.html so client-side routing works.
            let index = ServeFile::new(dir.join("index.html"));
            app.fallback_service(ServeDir::new(dir).fallback(index))
        }
        None => app.fallback(responses::not_found),
    };

    app.layer(DefaultBodyLimit::max(state.config.max_upload_size_bytes()))
        .layer(cors_layer)
        .layer(middleware::from_fn(log_requests))
        .with_state(state)
}
