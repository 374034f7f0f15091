use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use krishi_core::models::FarmerId;

use crate::dto::SoilRecordsResponse;
use crate::error::ApiError;
use crate::state::AppState;

/// List a farmer's soil records so the caller can disambiguate survey
/// numbers before asking for advice
pub async fn list_soil_records(
    State(state): State<Arc<AppState>>,
    Path(farmer_id): Path<String>,
) -> Result<Json<SoilRecordsResponse>, ApiError> {
    let id = FarmerId(farmer_id.clone());

    if state.profile_store.get_profile(&id).await?.is_none() {
        return Err(ApiError::not_found(format!("No farmer found with id {}", farmer_id)));
    }

    let records = state.profile_store.soil_records(&id).await?;

    Ok(Json(SoilRecordsResponse { farmer_id, records }))
}
