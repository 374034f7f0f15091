//! Error types for KrishiMitra

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum KrishiError {
    // Profile errors
    #[error("No farmer found with id {farmer_id}")]
    ProfileNotFound { farmer_id: String },

    #[error("No soil record {survey_no} for farmer {farmer_id}")]
    SoilRecordNotFound {
        farmer_id: String,
        survey_no: String,
    },

    #[error("Multiple soil records found; choose one of {survey_nos:?}")]
    AmbiguousSoilRecord { survey_nos: Vec<String> },

    // Encoding errors
    #[error("Could not encode soil profile: {reason}")]
    Encoding { reason: String },

    // Matching errors
    #[error("No crop in the catalog matches '{query}'")]
    CropNotFound { query: String },

    // Artifact errors (startup-time, fatal)
    #[error("Advisory artifact missing at {path}")]
    ArtifactMissing { path: PathBuf },

    #[error("Advisory artifacts are inconsistent: {reason}. Rebuild the transform, index, and catalog together")]
    ArtifactMismatch { reason: String },

    // Collaborator errors
    #[error("Language model unavailable: {reason}. Try: {remediation}")]
    LlmUnavailable { reason: String, remediation: String },

    #[error("Weather service unavailable: {reason}")]
    WeatherUnavailable { reason: String },

    #[error("Profile storage unavailable: {reason}")]
    StorageUnavailable { reason: String },

    // Configuration errors
    #[error("Missing required configuration: {key}")]
    ConfigMissing { key: String },

    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, KrishiError>;
