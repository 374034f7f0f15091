//! KrishiMitra advisory core.
//!
//! Everything between an intent label and a structured reply lives here:
//! the fitted feature transform, the crop similarity index and catalog, the
//! fuzzy crop-name matcher, and the pipeline that routes a classified query
//! through the matching flow.

pub mod bundle;
pub mod catalog;
pub mod fuzzy;
pub mod index;
pub mod models;
pub mod pipeline;
pub mod transform;

pub use bundle::{ArtifactBundle, ArtifactManifest};
pub use catalog::CropCatalog;
pub use fuzzy::{best_match, FuzzyMatch};
pub use index::CropEmbeddingIndex;
pub use models::{AdvisoryQuery, AdvisoryResponse, QueryContext};
pub use pipeline::AdvisoryPipeline;
pub use transform::{FeatureRecord, FittedTransform};
