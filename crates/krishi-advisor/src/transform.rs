//! Fitted feature transform.
//!
//! The transform is a persisted artifact describing exactly how soil/context
//! records were turned into vectors when the crop index was built: which
//! numeric features exist (with their imputation mean and scale) and which
//! categorical features exist (with their fitted levels). The encoder
//! replays that recipe; it never invents its own imputation policy.

use serde::{Deserialize, Serialize};

use krishi_core::error::{KrishiError, Result};
use krishi_core::models::{Season, SoilRecord};

use crate::models::QueryContext;

/// A numeric feature with its fitted imputation and scaling parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumericFeature {
    pub name: String,

    /// Fitted mean, used both as the imputation value and the centering term
    pub mean: f64,

    /// Fitted standard deviation
    pub scale: f64,
}

/// A categorical feature with its fitted one-hot levels
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoricalFeature {
    pub name: String,
    pub levels: Vec<String>,
}

/// The fitted preprocessing transform loaded from the artifact bundle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FittedTransform {
    numeric: Vec<NumericFeature>,
    categorical: Vec<CategoricalFeature>,
}

/// Flat record fed to the encoder: one soil record merged with the
/// per-request query context. Built once per request, never mutated.
#[derive(Debug, Clone)]
pub struct FeatureRecord {
    pub soil_ph: Option<f64>,
    pub nitrogen_kg_ha: Option<f64>,
    pub phosphorus_kg_ha: Option<f64>,
    pub potassium_kg_ha: Option<f64>,
    pub soil_type: Option<String>,
    pub season: Season,
    pub crop_type: Option<String>,
    pub water_source: Option<String>,
}

impl FeatureRecord {
    /// Merge a soil record with the request context
    pub fn merge(soil: &SoilRecord, context: &QueryContext) -> Self {
        Self {
            soil_ph: soil.ph,
            nitrogen_kg_ha: soil.nitrogen_kg_ha,
            phosphorus_kg_ha: soil.phosphorus_kg_ha,
            potassium_kg_ha: soil.potassium_kg_ha,
            soil_type: soil.soil_type.clone(),
            season: context.season,
            crop_type: context.crop_type_hint.clone(),
            water_source: context.water_source_hint.clone(),
        }
    }

    fn numeric(&self, name: &str) -> Result<Option<f64>> {
        match name {
            "soil_ph" => Ok(self.soil_ph),
            "nitrogen_kg_ha" => Ok(self.nitrogen_kg_ha),
            "phosphorus_kg_ha" => Ok(self.phosphorus_kg_ha),
            "potassium_kg_ha" => Ok(self.potassium_kg_ha),
            other => Err(KrishiError::Encoding {
                reason: format!("transform references unknown numeric feature '{}'", other),
            }),
        }
    }

    fn categorical(&self, name: &str) -> Result<Option<&str>> {
        match name {
            "soil_type" => Ok(self.soil_type.as_deref()),
            "season" => Ok(Some(self.season.as_str())),
            "crop_type" => Ok(self.crop_type.as_deref()),
            "water_source" => Ok(self.water_source.as_deref()),
            other => Err(KrishiError::Encoding {
                reason: format!("transform references unknown categorical feature '{}'", other),
            }),
        }
    }
}

impl FittedTransform {
    pub fn new(numeric: Vec<NumericFeature>, categorical: Vec<CategoricalFeature>) -> Self {
        Self { numeric, categorical }
    }

    /// Width of the encoded vector
    pub fn output_dim(&self) -> usize {
        self.numeric.len() + self.categorical.iter().map(|c| c.levels.len()).sum::<usize>()
    }

    /// Check the transform is internally usable and only references known
    /// features. Called at bundle load; a schema drift between the artifact
    /// and this crate fails here, before any request is served.
    pub fn validate(&self) -> Result<()> {
        let probe = FeatureRecord {
            soil_ph: None,
            nitrogen_kg_ha: None,
            phosphorus_kg_ha: None,
            potassium_kg_ha: None,
            soil_type: None,
            season: Season::Kharif,
            crop_type: None,
            water_source: None,
        };

        for feature in &self.numeric {
            probe.numeric(&feature.name)?;
            if !(feature.scale.is_finite() && feature.scale > 0.0) {
                return Err(KrishiError::ArtifactMismatch {
                    reason: format!("numeric feature '{}' has invalid scale", feature.name),
                });
            }
            if !feature.mean.is_finite() {
                return Err(KrishiError::ArtifactMismatch {
                    reason: format!("numeric feature '{}' has invalid mean", feature.name),
                });
            }
        }

        for feature in &self.categorical {
            probe.categorical(&feature.name)?;
            if feature.levels.is_empty() {
                return Err(KrishiError::ArtifactMismatch {
                    reason: format!("categorical feature '{}' has no levels", feature.name),
                });
            }
        }

        Ok(())
    }

    /// Encode a merged record into the fixed-width feature vector.
    ///
    /// Missing numeric readings (None or NaN) are imputed with the fitted
    /// mean, which scales to exactly 0. A missing categorical value encodes
    /// as an all-zero block; a present value outside the fitted levels is an
    /// `EncodingError` and the caller treats the request as lacking a usable
    /// profile.
    pub fn encode(&self, record: &FeatureRecord) -> Result<Vec<f32>> {
        let mut vector = Vec::with_capacity(self.output_dim());

        for feature in &self.numeric {
            let raw = record.numeric(&feature.name)?.filter(|v| !v.is_nan());
            let value = raw.unwrap_or(feature.mean);
            vector.push(((value - feature.mean) / feature.scale) as f32);
        }

        for feature in &self.categorical {
            let value = record.categorical(&feature.name)?;
            let hot = match value {
                None => None,
                Some(level) => {
                    let position = feature
                        .levels
                        .iter()
                        .position(|known| known.eq_ignore_ascii_case(level));
                    match position {
                        Some(position) => Some(position),
                        None => {
                            return Err(KrishiError::Encoding {
                                reason: format!(
                                    "unknown {} level '{}' (fitted levels: {:?})",
                                    feature.name, level, feature.levels
                                ),
                            })
                        }
                    }
                }
            };

            for position in 0..feature.levels.len() {
                vector.push(if hot == Some(position) { 1.0 } else { 0.0 });
            }
        }

        Ok(vector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transform() -> FittedTransform {
        FittedTransform::new(
            vec![
                NumericFeature { name: "soil_ph".to_string(), mean: 7.0, scale: 0.5 },
                NumericFeature { name: "nitrogen_kg_ha".to_string(), mean: 250.0, scale: 50.0 },
            ],
            vec![
                CategoricalFeature {
                    name: "season".to_string(),
                    levels: vec!["kharif".to_string(), "rabi".to_string(), "zaid".to_string()],
                },
                CategoricalFeature {
                    name: "soil_type".to_string(),
                    levels: vec!["black".to_string(), "red".to_string()],
                },
            ],
        )
    }

    fn record() -> FeatureRecord {
        FeatureRecord {
            soil_ph: Some(7.5),
            nitrogen_kg_ha: None,
            phosphorus_kg_ha: None,
            potassium_kg_ha: None,
            soil_type: Some("Black".to_string()),
            season: Season::Rabi,
            crop_type: None,
            water_source: None,
        }
    }

    #[test]
    fn test_output_dim() {
        assert_eq!(transform().output_dim(), 2 + 3 + 2);
    }

    #[test]
    fn test_encode_scales_and_one_hots() {
        let vector = transform().encode(&record()).unwrap();
        assert_eq!(vector.len(), 7);
        // (7.5 - 7.0) / 0.5
        assert!((vector[0] - 1.0).abs() < 1e-6);
        // Missing nitrogen imputes to the mean, scaling to zero
        assert_eq!(vector[1], 0.0);
        // season = rabi
        assert_eq!(&vector[2..5], &[0.0, 1.0, 0.0]);
        // soil_type matches case-insensitively
        assert_eq!(&vector[5..7], &[1.0, 0.0]);
    }

    #[test]
    fn test_encode_nan_counts_as_missing() {
        let mut r = record();
        r.soil_ph = Some(f64::NAN);
        let vector = transform().encode(&r).unwrap();
        assert_eq!(vector[0], 0.0);
    }

    #[test]
    fn test_encode_missing_categorical_is_all_zero() {
        let mut r = record();
        r.soil_type = None;
        let vector = transform().encode(&r).unwrap();
        assert_eq!(&vector[5..7], &[0.0, 0.0]);
    }

    #[test]
    fn test_encode_unknown_level_is_an_error() {
        let mut r = record();
        r.soil_type = Some("volcanic".to_string());
        let err = transform().encode(&r).unwrap_err();
        assert!(matches!(err, KrishiError::Encoding { .. }));
    }

    #[test]
    fn test_validate_rejects_unknown_feature_names() {
        let bad = FittedTransform::new(
            vec![NumericFeature { name: "rainfall_mm".to_string(), mean: 0.0, scale: 1.0 }],
            vec![],
        );
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_scale() {
        let bad = FittedTransform::new(
            vec![NumericFeature { name: "soil_ph".to_string(), mean: 7.0, scale: 0.0 }],
            vec![],
        );
        assert!(matches!(bad.validate(), Err(KrishiError::ArtifactMismatch { .. })));
    }
}
