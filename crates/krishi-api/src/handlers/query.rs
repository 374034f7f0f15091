use std::sync::Arc;

use axum::{extract::State, Json};

use crate::dto::{QueryRequest, QueryResponse};
use crate::error::ApiError;
use crate::services::QueryService;
use crate::state::AppState;

pub async fn handle_query(
    State(state): State<Arc<AppState>>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<QueryResponse>, ApiError> {
    if request.farmer_id.trim().is_empty() || request.query.trim().is_empty() {
        return Err(ApiError::bad_request("farmer_id and query are required"));
    }

    let request_id = uuid::Uuid::new_v4();
    tracing::info!(
        %request_id,
        farmer_id = %request.farmer_id,
        survey_no = ?request.survey_no,
        "Processing advisory query"
    );

    let result = QueryService::execute(&state, &request).await?;

    Ok(Json(result))
}
