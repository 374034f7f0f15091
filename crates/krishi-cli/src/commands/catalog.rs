use anyhow::{Context, Result};
use tabled::Tabled;

use krishi_advisor::bundle::ArtifactBundle;
use krishi_core::config::LayeredConfig;
use krishi_core::models::Season;

use crate::cli::CatalogArgs;
use crate::output::OutputWriter;

#[derive(Tabled, serde::Serialize)]
struct CropRow {
    #[tabled(rename = "Row")]
    row: usize,
    #[tabled(rename = "Crop")]
    name: String,
    #[tabled(rename = "Season")]
    season: String,
    #[tabled(rename = "Type")]
    crop_type: String,
    #[tabled(rename = "Water source")]
    water_source: String,
}

pub fn execute(args: CatalogArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let bundle = ArtifactBundle::load(&config.artifact_dir.value).with_context(|| {
        format!(
            "Failed to load advisory artifacts from {}",
            config.artifact_dir.value.display()
        )
    })?;

    let season_filter: Option<Season> = match &args.season {
        Some(season) => Some(season.parse().map_err(|e: String| anyhow::anyhow!(e))?),
        None => None,
    };

    let rows: Vec<CropRow> = bundle
        .catalog
        .iter()
        .enumerate()
        .filter(|(_, crop)| season_filter.map(|season| crop.season == season).unwrap_or(true))
        .map(|(row, crop)| CropRow {
            row,
            name: crop.name.clone(),
            season: crop.season.to_string(),
            crop_type: crop.crop_type.clone(),
            water_source: crop.water_source.clone().unwrap_or_else(|| "-".to_string()),
        })
        .collect();

    if output.is_json() {
        return output.result(&rows);
    }

    output.section(format!("Crop catalog ({})", bundle.manifest.version));
    output.table(rows);
    Ok(())
}
