//! Directory endpoints: mkdir and recursive rmdir.

use axum::Extension;
use axum::Json;
use axum::extract::{Path, Query, State};
use log::info;
use serde::Deserialize;

use crate::api::extract::JsonOrForm;
use crate::api::files::PathQuery;
use crate::api::responses::MessageResponse;
use crate::auth::Identity;
use crate::error::ApiError;
use crate::server::AppState;
use crate::storage;

#[derive(Debug, Deserialize)]
pub struct MkdirRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub path: String,
}

pub async fn create(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    JsonOrForm(req): JsonOrForm<MkdirRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let created = storage::create_directory(&state.root, &req.path, &req.name).await?;
    info!("{} created directory {}", identity.username, created.display_path());

    Ok(MessageResponse::new("Directory created successfully"))
}

pub async fn remove(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(dirname): Path<String>,
    Query(query): Query<PathQuery>,
) -> Result<Json<MessageResponse>, ApiError> {
    let removed = storage::remove_directory(&state.root, &query.path, &dirname).await?;
    info!("{} removed directory {}", identity.username, removed.display_path());

    Ok(MessageResponse::new("Directory deleted successfully"))
}
