use serde::{Deserialize, Serialize};

use super::crop::{CropRecord, Season};

/// Query intent recognized by the router
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    #[serde(rename = "pre-sowing")]
    PreSowing,
    #[serde(rename = "sowing")]
    Sowing,
    #[serde(rename = "scheme")]
    Scheme,
    #[serde(rename = "general")]
    General,
}

impl Intent {
    /// Parse a classifier label. Returns `None` for anything outside the
    /// four recognized labels; the router is responsible for coercing that
    /// case to `General` before dispatch.
    pub fn from_label(label: &str) -> Option<Intent> {
        match label.trim().to_lowercase().as_str() {
            "pre-sowing" | "presowing" => Some(Intent::PreSowing),
            "sowing" => Some(Intent::Sowing),
            "scheme" => Some(Intent::Scheme),
            "general" => Some(Intent::General),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::PreSowing => "pre-sowing",
            Intent::Sowing => "sowing",
            Intent::Scheme => "scheme",
            Intent::General => "general",
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw classification result as returned by the classifier port.
///
/// The label is kept as a string on purpose: the external service may return
/// anything, and coercion to a known [`Intent`] happens in the router.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifiedIntent {
    pub label: String,

    /// Crop name, only when the query mentions one explicitly
    #[serde(default)]
    pub crop_name: Option<String>,
}

/// Nutrient axis a deficiency finding refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Nutrient {
    #[serde(rename = "N")]
    Nitrogen,
    #[serde(rename = "P")]
    Phosphorus,
    #[serde(rename = "K")]
    Potassium,
    #[serde(rename = "pH")]
    Ph,
}

/// Qualitative status of one nutrient reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NutrientStatus {
    Low,
    Sufficient,
    Acidic,
    Alkaline,
    Balanced,
    Error,
}

/// One diagnostic statement from the soil-deficiency evaluator.
///
/// `nutrient` is `None` only for the all-readings-missing fallback finding,
/// which is not about any single nutrient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeficiencyFinding {
    pub nutrient: Option<Nutrient>,
    pub status: NutrientStatus,
    pub message: String,
}

/// One ranked crop suggestion from the similarity search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub crop: CropRecord,

    /// Catalog/index row this suggestion came from
    pub row_index: usize,

    /// Squared-L2 distance to the query vector; smaller is more similar
    pub distance: f32,
}

/// Forecast digest attached to replies when weather enrichment succeeded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherSummary {
    pub avg_temp_c: Option<f64>,
    pub avg_humidity_pct: Option<f64>,
    pub rain_expected: bool,
}

/// Eligibility decision in a scheme-guidance block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EligibilityStatus {
    Eligible,
    NotEligible,
    NeedsMoreInformation,
}

/// One government scheme in a guidance reply
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemeBlock {
    pub name: String,
    pub eligibility: EligibilityStatus,
    pub required_documents: Vec<String>,
    pub application_method: String,
    pub further_help: String,
}

/// Structured scheme guidance from the external scheme flow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemeGuidance {
    pub schemes: Vec<SchemeBlock>,

    /// Missing profile fields the decision needs, when any
    #[serde(default)]
    pub missing_fields: Vec<String>,
}

/// Structured, user-presentable outcome of one advisory request.
///
/// Every per-request failure mode is a variant here, never a propagated
/// fault: the flow boundary converts errors into replies the caller can
/// show to a farmer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AdvisoryReply {
    /// Pre-sowing flow: ranked crop recommendations
    CropRecommendations {
        season: Season,
        survey_no: String,
        recommendations: Vec<Recommendation>,
        weather: Option<WeatherSummary>,
        text: String,
        /// False when the refinement service was unavailable and `text`
        /// is the plain structured draft
        refined: bool,
    },

    /// Sowing flow: crop guidance plus soil-deficiency findings
    SowingAdvice {
        crop: CropRecord,
        season: Season,
        survey_no: String,
        findings: Vec<DeficiencyFinding>,
        weather: Option<WeatherSummary>,
        text: String,
        refined: bool,
    },

    /// Scheme flow: structured eligibility blocks from the external flow
    SchemeGuidance { guidance: SchemeGuidance },

    /// The query did not map to a handled flow
    NotHandled { intent: Intent, message: String },

    /// No profile exists for the requested farmer
    MissingProfile { farmer_id: String, message: String },

    /// Profile exists but carries no soil records
    NoSoilData { message: String },

    /// Several soil records exist and the caller must pick one
    ChooseSoilRecord {
        survey_nos: Vec<String>,
        message: String,
    },

    /// Sowing query without a recognizable crop name
    CropNotRecognized { query: String, message: String },

    /// Sowing query that never named a crop at all
    AskCrop { message: String },

    /// The soil profile could not be encoded for retrieval
    InsufficientData { message: String },
}

impl AdvisoryReply {
    /// Short label used in logs and CLI output
    pub fn kind(&self) -> &'static str {
        match self {
            AdvisoryReply::CropRecommendations { .. } => "crop_recommendations",
            AdvisoryReply::SowingAdvice { .. } => "sowing_advice",
            AdvisoryReply::SchemeGuidance { .. } => "scheme_guidance",
            AdvisoryReply::NotHandled { .. } => "not_handled",
            AdvisoryReply::MissingProfile { .. } => "missing_profile",
            AdvisoryReply::NoSoilData { .. } => "no_soil_data",
            AdvisoryReply::ChooseSoilRecord { .. } => "choose_soil_record",
            AdvisoryReply::CropNotRecognized { .. } => "crop_not_recognized",
            AdvisoryReply::AskCrop { .. } => "ask_crop",
            AdvisoryReply::InsufficientData { .. } => "insufficient_data",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_from_label() {
        assert_eq!(Intent::from_label("pre-sowing"), Some(Intent::PreSowing));
        assert_eq!(Intent::from_label(" Sowing "), Some(Intent::Sowing));
        assert_eq!(Intent::from_label("scheme"), Some(Intent::Scheme));
        assert_eq!(Intent::from_label("general"), Some(Intent::General));
        assert_eq!(Intent::from_label("banter"), None);
        assert_eq!(Intent::from_label(""), None);
    }

    #[test]
    fn test_intent_serde_labels() {
        assert_eq!(serde_json::to_string(&Intent::PreSowing).unwrap(), "\"pre-sowing\"");
        let intent: Intent = serde_json::from_str("\"scheme\"").unwrap();
        assert_eq!(intent, Intent::Scheme);
    }

    #[test]
    fn test_reply_serializes_with_kind_tag() {
        let reply = AdvisoryReply::NoSoilData {
            message: "no records".to_string(),
        };
        let value = serde_json::to_value(&reply).unwrap();
        assert_eq!(value["kind"], "no_soil_data");
    }
}
