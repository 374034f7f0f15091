use serde::Deserialize;

/// Query request body
#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub farmer_id: String,
    pub query: String,

    /// Soil-record selection when the farmer has several
    #[serde(default)]
    pub survey_no: Option<String>,

    /// Irrigation hint for the recommendation flow
    #[serde(default)]
    pub irrigation_hint: Option<String>,
}
