//! Authentication middleware
//!
//! Rejects requests without a valid bearer token before any handler runs.

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use log::debug;

use crate::error::ApiError;
use crate::server::AppState;

/// Verifies the `Authorization` header and attaches the resulting
/// [`Identity`](crate::auth::Identity) to the request extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let identity = state.auth.authorize(header)?;
    debug!(
        "Authorized {} for {}",
        identity.username,
        request.uri().path()
    );

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}
