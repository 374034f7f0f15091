use std::sync::Arc;

use axum::{extract::State, Json};

use crate::dto::ArtifactStatusResponse;
use crate::state::AppState;

/// Report which artifact bundle the process is serving with
pub async fn artifact_status(State(state): State<Arc<AppState>>) -> Json<ArtifactStatusResponse> {
    let manifest = &state.artifacts.manifest;

    Json(ArtifactStatusResponse {
        version: manifest.version.clone(),
        built_at: manifest.built_at,
        feature_dim: manifest.feature_dim,
        crop_count: manifest.crop_count,
    })
}
