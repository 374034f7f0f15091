use anyhow::{Context, Result};
use tabled::Tabled;

use krishi_core::models::FarmerId;
use krishi_store::memory::MemoryProfileStore;
use krishi_store::ports::ProfileStore;

use crate::cli::SoilArgs;
use crate::output::OutputWriter;

#[derive(Tabled, serde::Serialize)]
struct SoilRow {
    #[tabled(rename = "Survey")]
    survey_no: String,
    #[tabled(rename = "pH")]
    ph: String,
    #[tabled(rename = "N (kg/ha)")]
    nitrogen: String,
    #[tabled(rename = "P (kg/ha)")]
    phosphorus: String,
    #[tabled(rename = "K (kg/ha)")]
    potassium: String,
    #[tabled(rename = "Soil type")]
    soil_type: String,
}

fn reading(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

pub async fn execute(args: SoilArgs, output: &OutputWriter) -> Result<()> {
    let store = MemoryProfileStore::load_seed_file(&args.profiles)
        .with_context(|| format!("Failed to load profiles from {}", args.profiles.display()))?;

    let farmer_id = FarmerId(args.farmer_id.clone());
    let Some(profile) = store.get_profile(&farmer_id).await? else {
        anyhow::bail!("No farmer found with id {}", args.farmer_id);
    };

    let records = store.soil_records(&farmer_id).await?;

    let rows: Vec<SoilRow> = records
        .iter()
        .map(|record| SoilRow {
            survey_no: record.survey_no.clone(),
            ph: reading(record.ph),
            nitrogen: reading(record.nitrogen_kg_ha),
            phosphorus: reading(record.phosphorus_kg_ha),
            potassium: reading(record.potassium_kg_ha),
            soil_type: record.soil_type.clone().unwrap_or_else(|| "-".to_string()),
        })
        .collect();

    if output.is_json() {
        return output.result(&rows);
    }

    output.section(format!(
        "Soil records for {}",
        profile.name.as_deref().unwrap_or(&args.farmer_id)
    ));
    output.table(rows);
    Ok(())
}
