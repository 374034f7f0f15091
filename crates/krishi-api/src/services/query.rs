use krishi_advisor::models::AdvisoryQuery;

use crate::dto::{QueryRequest, QueryResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// Service for executing advisory queries
pub struct QueryService;

impl QueryService {
    /// Run a request through the advisory pipeline
    pub async fn execute(state: &AppState, request: &QueryRequest) -> Result<QueryResponse, ApiError> {
        let mut query = AdvisoryQuery::new(request.farmer_id.clone(), request.query.clone());
        if let Some(survey_no) = &request.survey_no {
            query = query.with_survey_no(survey_no.clone());
        }
        if let Some(hint) = &request.irrigation_hint {
            query = query.with_irrigation_hint(hint.clone());
        }

        let response = state.pipeline.handle(&query).await.map_err(|e| {
            tracing::error!(error = %e, "Advisory pipeline failed");
            ApiError::internal("Advisory pipeline failed").with_details(e.to_string())
        })?;

        Ok(QueryResponse {
            farmer_id: request.farmer_id.clone(),
            query: request.query.clone(),
            intent: response.intent,
            crop_name: response.crop_name,
            reply: response.reply,
        })
    }
}
