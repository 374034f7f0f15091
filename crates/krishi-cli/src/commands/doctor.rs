use anyhow::Result;

use krishi_advisor::bundle::{
    ArtifactBundle, CATALOG_FILE, INDEX_FILE, MANIFEST_FILE, TRANSFORM_FILE,
};
use krishi_core::config::LayeredConfig;

use crate::cli::DoctorArgs;
use crate::output::OutputWriter;

pub fn execute(args: DoctorArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let dir = &config.artifact_dir.value;

    output.section("Artifact bundle");
    output.kv("Directory", dir.display());

    if !dir.is_dir() {
        output.error(format!("Artifact directory {} does not exist", dir.display()));
        return Ok(());
    }

    let mut all_present = true;
    for file in [MANIFEST_FILE, TRANSFORM_FILE, INDEX_FILE, CATALOG_FILE] {
        if dir.join(file).is_file() {
            output.success(format!("{} present", file));
        } else {
            output.error(format!("{} missing", file));
            all_present = false;
        }
    }

    if all_present {
        match ArtifactBundle::load(dir) {
            Ok(bundle) => {
                output.success("Bundle loads and artifacts are mutually consistent");
                if args.verbose {
                    output.kv("Version", &bundle.manifest.version);
                    output.kv("Built at", bundle.manifest.built_at);
                    output.kv("Crops", bundle.catalog.len());
                    output.kv("Feature dimension", bundle.index.dim());
                }
            }
            Err(e) => {
                output.error(format!("Bundle failed to load: {}", e));
                output.info("Rebuild the transform, index, and catalog together");
            }
        }
    }

    output.section("Configuration");
    for (key, (value, source)) in config.to_inspection_map() {
        output.kv(key, format!("{} ({:?})", value, source));
    }

    output.section("Collaborators");
    if std::env::var("OPENAI_API_KEY").is_ok() {
        output.success("OPENAI_API_KEY is set");
    } else {
        output.warning("OPENAI_API_KEY not set; classification and refinement need it");
    }
    if std::env::var("OPENWEATHER_API_KEY").is_ok() {
        output.success("OPENWEATHER_API_KEY is set");
    } else {
        output.warning("OPENWEATHER_API_KEY not set; weather enrichment is disabled");
    }
    if std::env::var("DATABASE_URL").is_ok() {
        output.success("DATABASE_URL is set (PostgreSQL profile store)");
    } else {
        output.info("DATABASE_URL not set; the API falls back to in-memory storage");
    }

    Ok(())
}
