use serde::{Deserialize, Serialize};

use krishi_core::models::{AdvisoryReply, FarmerId, Intent, Season};

/// One advisory request as the pipeline sees it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisoryQuery {
    pub farmer_id: FarmerId,

    /// The farmer's free-text question
    pub text: String,

    /// Soil-record selection, when the caller has already disambiguated
    #[serde(default)]
    pub survey_no: Option<String>,

    /// Caller-supplied irrigation hint ("canal", "borewell", ...)
    #[serde(default)]
    pub irrigation_hint: Option<String>,
}

impl AdvisoryQuery {
    pub fn new(farmer_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            farmer_id: FarmerId(farmer_id.into()),
            text: text.into(),
            survey_no: None,
            irrigation_hint: None,
        }
    }

    pub fn with_survey_no(mut self, survey_no: impl Into<String>) -> Self {
        self.survey_no = Some(survey_no.into());
        self
    }

    pub fn with_irrigation_hint(mut self, hint: impl Into<String>) -> Self {
        self.irrigation_hint = Some(hint.into());
        self
    }
}

/// Per-request retrieval context merged with the soil record before
/// encoding. Derived from the current date plus caller hints.
#[derive(Debug, Clone)]
pub struct QueryContext {
    pub season: Season,
    pub crop_type_hint: Option<String>,
    pub water_source_hint: Option<String>,
}

/// What the pipeline hands back: the routed intent plus the reply
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisoryResponse {
    pub intent: Intent,

    /// Crop name the classifier extracted, when any
    #[serde(default)]
    pub crop_name: Option<String>,

    pub reply: AdvisoryReply,
}
