use chrono::{DateTime, Utc};
use serde::Serialize;

use krishi_core::models::{AdvisoryReply, Intent, SoilRecord};

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self { status: "ok" }
    }
}

/// Advisory query response
#[derive(Debug, Serialize)]
pub struct QueryResponse {
    pub farmer_id: String,
    pub query: String,
    pub intent: Intent,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crop_name: Option<String>,
    pub reply: AdvisoryReply,
}

/// Soil records listing, for survey-number disambiguation
#[derive(Debug, Serialize)]
pub struct SoilRecordsResponse {
    pub farmer_id: String,
    pub records: Vec<SoilRecord>,
}

/// Artifact bundle status
#[derive(Debug, Serialize)]
pub struct ArtifactStatusResponse {
    pub version: String,
    pub built_at: DateTime<Utc>,
    pub feature_dim: usize,
    pub crop_count: usize,
}
