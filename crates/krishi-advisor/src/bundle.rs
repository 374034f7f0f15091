//! Artifact bundle loading and validation.
//!
//! The fitted transform, the similarity index, and the crop catalog are one
//! logical artifact built in a single offline job; serving any mix of
//! versions silently corrupts every recommendation. The bundle loader
//! enforces that: all three files load together and must agree on row count
//! and vector width before the process accepts traffic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use krishi_core::error::{KrishiError, Result};

use crate::catalog::CropCatalog;
use crate::index::CropEmbeddingIndex;
use crate::transform::FittedTransform;

pub const MANIFEST_FILE: &str = "manifest.json";
pub const TRANSFORM_FILE: &str = "transform.json";
pub const INDEX_FILE: &str = "index.json";
pub const CATALOG_FILE: &str = "catalog.json";

/// Manifest written by the offline build job alongside the three artifacts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactManifest {
    /// Version tag shared by transform, index, and catalog
    pub version: String,

    pub built_at: DateTime<Utc>,

    /// Vector width the transform and index were built with
    pub feature_dim: usize,

    /// Number of catalog entries / index rows
    pub crop_count: usize,
}

/// On-disk shape of the index file
#[derive(Debug, Serialize, Deserialize)]
struct IndexFile {
    vectors: Vec<Vec<f32>>,
}

/// On-disk shape of the catalog file
#[derive(Debug, Serialize, Deserialize)]
struct CatalogFile {
    crops: Vec<krishi_core::models::CropRecord>,
}

/// The loaded, validated advisory artifacts; read-only for the process
/// lifetime and shared across concurrent requests
#[derive(Debug)]
pub struct ArtifactBundle {
    pub manifest: ArtifactManifest,
    pub transform: FittedTransform,
    pub index: CropEmbeddingIndex,
    pub catalog: CropCatalog,
}

impl ArtifactBundle {
    /// Assemble and cross-validate a bundle
    pub fn new(
        manifest: ArtifactManifest,
        transform: FittedTransform,
        index: CropEmbeddingIndex,
        catalog: CropCatalog,
    ) -> Result<Self> {
        let bundle = Self { manifest, transform, index, catalog };
        bundle.validate()?;
        Ok(bundle)
    }

    /// Load the bundle from a directory. Any missing file, parse failure,
    /// or cross-artifact disagreement is a startup-fatal error.
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();

        let manifest: ArtifactManifest = read_json(&dir.join(MANIFEST_FILE))?;
        let transform: FittedTransform = read_json(&dir.join(TRANSFORM_FILE))?;
        let index_file: IndexFile = read_json(&dir.join(INDEX_FILE))?;
        let catalog_file: CatalogFile = read_json(&dir.join(CATALOG_FILE))?;

        let index = CropEmbeddingIndex::new(index_file.vectors)?;
        let catalog = CropCatalog::new(catalog_file.crops);

        Self::new(manifest, transform, index, catalog)
    }

    fn validate(&self) -> Result<()> {
        self.transform.validate()?;

        if self.catalog.is_empty() {
            return Err(KrishiError::ArtifactMismatch {
                reason: "catalog has no crops".to_string(),
            });
        }

        if self.catalog.len() != self.index.len() {
            return Err(KrishiError::ArtifactMismatch {
                reason: format!(
                    "catalog has {} crops but index has {} rows",
                    self.catalog.len(),
                    self.index.len()
                ),
            });
        }

        if self.transform.output_dim() != self.index.dim() {
            return Err(KrishiError::ArtifactMismatch {
                reason: format!(
                    "transform encodes {} dimensions but index was built with {}",
                    self.transform.output_dim(),
                    self.index.dim()
                ),
            });
        }

        if self.manifest.feature_dim != self.index.dim() {
            return Err(KrishiError::ArtifactMismatch {
                reason: format!(
                    "manifest declares feature_dim {} but index has {}",
                    self.manifest.feature_dim,
                    self.index.dim()
                ),
            });
        }

        if self.manifest.crop_count != self.catalog.len() {
            return Err(KrishiError::ArtifactMismatch {
                reason: format!(
                    "manifest declares {} crops but catalog has {}",
                    self.manifest.crop_count,
                    self.catalog.len()
                ),
            });
        }

        Ok(())
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Err(KrishiError::ArtifactMissing { path: path.to_path_buf() });
    }

    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| {
        KrishiError::Serialization(format!("Failed to parse {}: {}", path.display(), e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::{CategoricalFeature, NumericFeature};
    use krishi_core::models::{CropRecord, Season};
    use std::fs;
    use tempfile::TempDir;

    fn crop(name: &str, season: Season) -> CropRecord {
        CropRecord {
            name: name.to_string(),
            season,
            crop_type: "cereal".to_string(),
            water_source: None,
        }
    }

    fn write_bundle_files(dir: &Path, feature_dim: usize, crop_count: usize) {
        let manifest = serde_json::json!({
            "version": "2024.11",
            "built_at": "2024-11-02T06:30:00Z",
            "feature_dim": feature_dim,
            "crop_count": crop_count,
        });
        fs::write(dir.join(MANIFEST_FILE), manifest.to_string()).unwrap();

        let transform = FittedTransform::new(
            vec![NumericFeature { name: "soil_ph".to_string(), mean: 7.0, scale: 0.5 }],
            vec![CategoricalFeature {
                name: "season".to_string(),
                levels: vec!["kharif".to_string(), "rabi".to_string(), "zaid".to_string()],
            }],
        );
        fs::write(dir.join(TRANSFORM_FILE), serde_json::to_string(&transform).unwrap()).unwrap();

        let index = serde_json::json!({
            "vectors": [[0.0, 1.0, 0.0, 0.0], [1.0, 0.0, 1.0, 0.0]],
        });
        fs::write(dir.join(INDEX_FILE), index.to_string()).unwrap();

        let catalog = serde_json::json!({
            "crops": [crop("Rice", Season::Kharif), crop("Wheat", Season::Rabi)],
        });
        fs::write(dir.join(CATALOG_FILE), catalog.to_string()).unwrap();
    }

    #[test]
    fn test_load_valid_bundle() {
        let dir = TempDir::new().unwrap();
        write_bundle_files(dir.path(), 4, 2);

        let bundle = ArtifactBundle::load(dir.path()).unwrap();
        assert_eq!(bundle.manifest.version, "2024.11");
        assert_eq!(bundle.index.len(), 2);
        assert_eq!(bundle.catalog.len(), 2);
        assert_eq!(bundle.transform.output_dim(), 4);
    }

    #[test]
    fn test_missing_file_is_artifact_missing() {
        let dir = TempDir::new().unwrap();
        write_bundle_files(dir.path(), 4, 2);
        fs::remove_file(dir.path().join(INDEX_FILE)).unwrap();

        let err = ArtifactBundle::load(dir.path()).unwrap_err();
        assert!(matches!(err, KrishiError::ArtifactMissing { .. }));
    }

    #[test]
    fn test_manifest_row_disagreement_is_fatal() {
        let dir = TempDir::new().unwrap();
        write_bundle_files(dir.path(), 4, 3); // manifest claims 3 crops

        let err = ArtifactBundle::load(dir.path()).unwrap_err();
        assert!(matches!(err, KrishiError::ArtifactMismatch { .. }));
    }

    #[test]
    fn test_catalog_index_row_mismatch_is_fatal() {
        let dir = TempDir::new().unwrap();
        write_bundle_files(dir.path(), 4, 2);

        // Re-write the catalog with an extra crop the index knows nothing about
        let catalog = serde_json::json!({
            "crops": [
                crop("Rice", Season::Kharif),
                crop("Wheat", Season::Rabi),
                crop("Maize", Season::Kharif),
            ],
        });
        fs::write(dir.path().join(CATALOG_FILE), catalog.to_string()).unwrap();
        let manifest = serde_json::json!({
            "version": "2024.11",
            "built_at": "2024-11-02T06:30:00Z",
            "feature_dim": 4,
            "crop_count": 3,
        });
        fs::write(dir.path().join(MANIFEST_FILE), manifest.to_string()).unwrap();

        let err = ArtifactBundle::load(dir.path()).unwrap_err();
        assert!(matches!(err, KrishiError::ArtifactMismatch { .. }));
    }

    #[test]
    fn test_transform_width_mismatch_is_fatal() {
        let dir = TempDir::new().unwrap();
        write_bundle_files(dir.path(), 4, 2);

        // A transform that encodes a different width than the index rows
        let transform = FittedTransform::new(
            vec![NumericFeature { name: "soil_ph".to_string(), mean: 7.0, scale: 0.5 }],
            vec![],
        );
        fs::write(dir.path().join(TRANSFORM_FILE), serde_json::to_string(&transform).unwrap())
            .unwrap();

        let err = ArtifactBundle::load(dir.path()).unwrap_err();
        assert!(matches!(err, KrishiError::ArtifactMismatch { .. }));
    }
}
