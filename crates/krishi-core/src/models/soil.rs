use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::farmer::{raw_number, raw_string};
use crate::error::{KrishiError, Result};

/// A soil-health-card (SHC) record for one surveyed plot.
///
/// Immutable once fetched; numeric readings may be absent. `None` means the
/// laboratory did not report the value, which downstream rules treat as
/// "skip", never as zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoilRecord {
    /// Survey number identifying the plot this card belongs to
    pub survey_no: String,

    pub ph: Option<f64>,
    pub nitrogen_kg_ha: Option<f64>,
    pub phosphorus_kg_ha: Option<f64>,
    pub potassium_kg_ha: Option<f64>,

    pub soil_type: Option<String>,
}

impl SoilRecord {
    /// Build a typed record from a loosely-keyed source document.
    ///
    /// The source uses keys like `N_(KG/HA)` and stores readings as numbers,
    /// numeric strings, or NaN; non-finite readings become `None` here so the
    /// rest of the system never sees a NaN.
    pub fn from_raw(raw: &Value) -> Result<Self> {
        let survey_no = raw_string(raw, &["SURVEY_NO", "survey_no"]).ok_or_else(|| {
            KrishiError::Serialization("soil record has no SURVEY_NO field".to_string())
        })?;

        Ok(Self {
            survey_no,
            ph: raw_number(raw, &["PH", "ph", "SOIL_PH"]),
            nitrogen_kg_ha: raw_number(raw, &["N_(KG/HA)", "N", "n_kg_ha"]),
            phosphorus_kg_ha: raw_number(raw, &["P_(KG/HA)", "P", "p_kg_ha"]),
            potassium_kg_ha: raw_number(raw, &["K_(KG/HA)", "K", "k_kg_ha"]),
            soil_type: raw_string(raw, &["SOIL_TYPE", "soil_type", "SOIL"]),
        })
    }

    /// True when every nutrient reading (N, P, K, pH) is absent
    pub fn all_readings_missing(&self) -> bool {
        self.ph.is_none()
            && self.nitrogen_kg_ha.is_none()
            && self.phosphorus_kg_ha.is_none()
            && self.potassium_kg_ha.is_none()
    }
}
