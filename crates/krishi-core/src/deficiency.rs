//! Soil-deficiency evaluation.
//!
//! Rule-based classification of N/P/K/pH readings against the fixed
//! soil-health-card thresholds, producing one diagnostic finding per
//! available reading. Messages are fixed templates; prose rewriting happens
//! later, in the refinement layer.

use crate::models::{DeficiencyFinding, Nutrient, NutrientStatus, SoilRecord};

/// Nitrogen at or above this is sufficient (kg/ha)
pub const NITROGEN_SUFFICIENT_KG_HA: f64 = 280.0;

/// Phosphorus at or above this is sufficient (kg/ha)
pub const PHOSPHORUS_SUFFICIENT_KG_HA: f64 = 10.0;

/// Potassium at or above this is sufficient (kg/ha)
pub const POTASSIUM_SUFFICIENT_KG_HA: f64 = 110.0;

/// pH strictly below this is acidic
pub const PH_ACIDIC_BELOW: f64 = 6.0;

/// pH strictly above this is alkaline
pub const PH_ALKALINE_ABOVE: f64 = 8.0;

/// Evaluate a soil record against the fixed thresholds.
///
/// Each nutrient is judged independently; missing readings are skipped
/// without a finding. When every reading is missing, a single fallback
/// "appear balanced" finding is emitted instead of nothing. That fallback
/// reports absence of data as a positive signal and is kept for
/// compatibility with existing card summaries.
///
/// `rain_expected` appends a delay-application advisory to a low-nitrogen
/// finding, since urea washes out in rain.
pub fn evaluate(record: &SoilRecord, rain_expected: bool) -> Vec<DeficiencyFinding> {
    let mut findings = Vec::new();

    if let Some(finding) = nitrogen_finding(record.nitrogen_kg_ha, rain_expected) {
        findings.push(finding);
    }
    if let Some(finding) = phosphorus_finding(record.phosphorus_kg_ha) {
        findings.push(finding);
    }
    if let Some(finding) = potassium_finding(record.potassium_kg_ha) {
        findings.push(finding);
    }
    if let Some(finding) = ph_finding(record.ph) {
        findings.push(finding);
    }

    if findings.is_empty() {
        findings.push(DeficiencyFinding {
            nutrient: None,
            status: NutrientStatus::Balanced,
            message: "Soil nutrient readings appear balanced.".to_string(),
        });
    }

    findings
}

/// A reading is usable when present and finite; NaN is the missing sentinel.
/// An infinite value is a corrupt reading and gets an error finding.
enum Reading {
    Missing,
    Corrupt,
    Value(f64),
}

fn reading(value: Option<f64>) -> Reading {
    match value {
        None => Reading::Missing,
        Some(v) if v.is_nan() => Reading::Missing,
        Some(v) if v.is_infinite() => Reading::Corrupt,
        Some(v) => Reading::Value(v),
    }
}

fn corrupt_finding(nutrient: Nutrient, label: &str) -> DeficiencyFinding {
    DeficiencyFinding {
        nutrient: Some(nutrient),
        status: NutrientStatus::Error,
        message: format!("Could not evaluate the {} reading.", label),
    }
}

fn nitrogen_finding(value: Option<f64>, rain_expected: bool) -> Option<DeficiencyFinding> {
    match reading(value) {
        Reading::Missing => None,
        Reading::Corrupt => Some(corrupt_finding(Nutrient::Nitrogen, "nitrogen")),
        Reading::Value(n) if n < NITROGEN_SUFFICIENT_KG_HA => {
            let mut message = format!("Nitrogen low ({} kg/ha). Apply urea or compost.", n);
            if rain_expected {
                message.push_str(" Delay urea application until the expected rain passes.");
            }
            Some(DeficiencyFinding {
                nutrient: Some(Nutrient::Nitrogen),
                status: NutrientStatus::Low,
                message,
            })
        }
        Reading::Value(n) => Some(DeficiencyFinding {
            nutrient: Some(Nutrient::Nitrogen),
            status: NutrientStatus::Sufficient,
            message: format!("Nitrogen sufficient ({} kg/ha).", n),
        }),
    }
}

fn phosphorus_finding(value: Option<f64>) -> Option<DeficiencyFinding> {
    match reading(value) {
        Reading::Missing => None,
        Reading::Corrupt => Some(corrupt_finding(Nutrient::Phosphorus, "phosphorus")),
        Reading::Value(p) if p < PHOSPHORUS_SUFFICIENT_KG_HA => Some(DeficiencyFinding {
            nutrient: Some(Nutrient::Phosphorus),
            status: NutrientStatus::Low,
            message: format!("Phosphorus low ({} kg/ha). Apply DAP or SSP.", p),
        }),
        Reading::Value(p) => Some(DeficiencyFinding {
            nutrient: Some(Nutrient::Phosphorus),
            status: NutrientStatus::Sufficient,
            message: format!("Phosphorus sufficient ({} kg/ha).", p),
        }),
    }
}

fn potassium_finding(value: Option<f64>) -> Option<DeficiencyFinding> {
    match reading(value) {
        Reading::Missing => None,
        Reading::Corrupt => Some(corrupt_finding(Nutrient::Potassium, "potassium")),
        Reading::Value(k) if k < POTASSIUM_SUFFICIENT_KG_HA => Some(DeficiencyFinding {
            nutrient: Some(Nutrient::Potassium),
            status: NutrientStatus::Low,
            message: format!("Potassium low ({} kg/ha). Apply MOP or recycle crop residues.", k),
        }),
        Reading::Value(k) => Some(DeficiencyFinding {
            nutrient: Some(Nutrient::Potassium),
            status: NutrientStatus::Sufficient,
            message: format!("Potassium sufficient ({} kg/ha).", k),
        }),
    }
}

fn ph_finding(value: Option<f64>) -> Option<DeficiencyFinding> {
    match reading(value) {
        Reading::Missing => None,
        Reading::Corrupt => Some(corrupt_finding(Nutrient::Ph, "pH")),
        Reading::Value(ph) if ph < PH_ACIDIC_BELOW => Some(DeficiencyFinding {
            nutrient: Some(Nutrient::Ph),
            status: NutrientStatus::Acidic,
            message: format!("Acidic soil (pH {}). Apply lime.", ph),
        }),
        Reading::Value(ph) if ph > PH_ALKALINE_ABOVE => Some(DeficiencyFinding {
            nutrient: Some(Nutrient::Ph),
            status: NutrientStatus::Alkaline,
            message: format!("Alkaline soil (pH {}). Apply gypsum or manure.", ph),
        }),
        Reading::Value(ph) => Some(DeficiencyFinding {
            nutrient: Some(Nutrient::Ph),
            status: NutrientStatus::Balanced,
            message: format!("Soil pH balanced ({}).", ph),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(
        n: Option<f64>,
        p: Option<f64>,
        k: Option<f64>,
        ph: Option<f64>,
    ) -> SoilRecord {
        SoilRecord {
            survey_no: "SN-1".to_string(),
            ph,
            nitrogen_kg_ha: n,
            phosphorus_kg_ha: p,
            potassium_kg_ha: k,
            soil_type: None,
        }
    }

    fn status_for(findings: &[DeficiencyFinding], nutrient: Nutrient) -> NutrientStatus {
        findings
            .iter()
            .find(|f| f.nutrient == Some(nutrient))
            .map(|f| f.status)
            .expect("finding missing")
    }

    #[test]
    fn test_nitrogen_boundary_inclusive_at_280() {
        let low = evaluate(&record(Some(279.0), None, None, None), false);
        assert_eq!(status_for(&low, Nutrient::Nitrogen), NutrientStatus::Low);

        let sufficient = evaluate(&record(Some(280.0), None, None, None), false);
        assert_eq!(status_for(&sufficient, Nutrient::Nitrogen), NutrientStatus::Sufficient);
    }

    #[test]
    fn test_low_nitrogen_rain_advisory() {
        let with_rain = evaluate(&record(Some(150.0), None, None, None), true);
        assert!(with_rain[0].message.contains("Delay urea application"));

        let without_rain = evaluate(&record(Some(150.0), None, None, None), false);
        assert!(!without_rain[0].message.contains("Delay"));
    }

    #[test]
    fn test_rain_does_not_touch_sufficient_nitrogen() {
        let findings = evaluate(&record(Some(300.0), None, None, None), true);
        assert!(!findings[0].message.contains("Delay"));
    }

    #[test]
    fn test_phosphorus_and_potassium_thresholds() {
        let findings = evaluate(&record(None, Some(9.9), Some(110.0), None), false);
        assert_eq!(status_for(&findings, Nutrient::Phosphorus), NutrientStatus::Low);
        assert_eq!(status_for(&findings, Nutrient::Potassium), NutrientStatus::Sufficient);
    }

    #[test]
    fn test_ph_bands() {
        let cases = [
            (5.9, NutrientStatus::Acidic),
            (6.0, NutrientStatus::Balanced),
            (8.0, NutrientStatus::Balanced),
            (8.1, NutrientStatus::Alkaline),
        ];
        for (ph, expected) in cases {
            let findings = evaluate(&record(None, None, None, Some(ph)), false);
            assert_eq!(status_for(&findings, Nutrient::Ph), expected, "pH {}", ph);
        }
    }

    #[test]
    fn test_missing_reading_is_skipped() {
        let findings = evaluate(&record(Some(300.0), None, None, Some(7.0)), false);
        assert_eq!(findings.len(), 2);
        assert!(findings.iter().all(|f| f.nutrient != Some(Nutrient::Phosphorus)));
    }

    #[test]
    fn test_nan_reading_counts_as_missing() {
        let findings = evaluate(&record(Some(f64::NAN), None, None, Some(7.0)), false);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].nutrient, Some(Nutrient::Ph));
    }

    #[test]
    fn test_all_missing_emits_single_balanced_fallback() {
        let findings = evaluate(&record(None, None, None, None), false);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].nutrient, None);
        assert_eq!(findings[0].status, NutrientStatus::Balanced);
        assert!(findings[0].message.contains("appear balanced"));
    }

    #[test]
    fn test_infinite_reading_yields_error_finding() {
        let findings = evaluate(&record(Some(f64::INFINITY), None, None, None), false);
        assert_eq!(findings[0].status, NutrientStatus::Error);
    }
}
