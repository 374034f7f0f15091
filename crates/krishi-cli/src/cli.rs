use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// KrishiMitra - Farmer advisory assistant
#[derive(Parser, Debug)]
#[command(name = "krishi")]
#[command(about = "Farmer advisory assistant", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Artifact bundle directory (overrides KRISHI_ARTIFACT_DIR)
    #[arg(long, global = true)]
    pub artifacts: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ask an advisory question for a farmer
    Query(QueryArgs),

    /// List the crops in the catalog
    Catalog(CatalogArgs),

    /// Show the agricultural season for a date
    Season(SeasonArgs),

    /// List a farmer's soil records
    Soil(SoilArgs),

    /// Run health checks on artifacts and configuration
    Doctor(DoctorArgs),
}

#[derive(Parser, Debug)]
pub struct QueryArgs {
    /// Farmer id (Aadhaar number)
    pub farmer_id: String,

    /// The question to ask
    pub query: String,

    /// Soil record to use when the farmer has several
    #[arg(long)]
    pub survey_no: Option<String>,

    /// Irrigation hint for the recommendation flow ("canal", "borewell", ...)
    #[arg(long)]
    pub irrigation: Option<String>,

    /// Number of crop recommendations to return
    #[arg(long, short = 'k', default_value = "5")]
    pub top_k: usize,

    /// Profile seed file (JSON) standing in for the profile database
    #[arg(long)]
    pub profiles: PathBuf,

    /// Skip the classifier and force an intent
    /// (pre-sowing, sowing, scheme, general)
    #[arg(long)]
    pub intent: Option<String>,

    /// Crop name to pair with --intent sowing
    #[arg(long)]
    pub crop: Option<String>,
}

#[derive(Parser, Debug)]
pub struct CatalogArgs {
    /// Only show crops sown in this season (kharif, rabi, zaid)
    #[arg(long)]
    pub season: Option<String>,
}

#[derive(Parser, Debug)]
pub struct SeasonArgs {
    /// Date to look up (YYYY-MM-DD, defaults to today)
    pub date: Option<String>,
}

#[derive(Parser, Debug)]
pub struct SoilArgs {
    /// Farmer id (Aadhaar number)
    pub farmer_id: String,

    /// Profile seed file (JSON) standing in for the profile database
    #[arg(long)]
    pub profiles: PathBuf,
}

#[derive(Parser, Debug)]
pub struct DoctorArgs {
    /// Show detailed diagnostic information
    #[arg(long)]
    pub verbose: bool,
}
