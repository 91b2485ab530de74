use axum::Json;
use axum::extract::State;
use log::info;
use serde::Deserialize;

use crate::api::extract::JsonOrForm;
use crate::api::responses::TokenResponse;
use crate::error::ApiError;
use crate::server::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

pub async fn handler(
    State(state): State<AppState>,
    JsonOrForm(req): JsonOrForm<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    info!("Login attempt for user {}", req.username);

    let login = state.auth.authenticate(&req.username, &req.password)?;
    Ok(Json(TokenResponse { token: login.token }))
}
