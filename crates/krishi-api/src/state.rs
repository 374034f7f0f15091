use krishi_advisor::pipeline::AdvisoryPipeline;
use krishi_advisor::ArtifactBundle;
use krishi_store::ports::ProfileStore;
use std::sync::Arc;

/// Shared application state.
///
/// Everything here is read-only after startup, so one instance is shared
/// across all request handlers without locking.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<AdvisoryPipeline>,
    pub profile_store: Arc<dyn ProfileStore>,
    pub artifacts: Arc<ArtifactBundle>,
}

impl AppState {
    pub fn new(
        pipeline: Arc<AdvisoryPipeline>,
        profile_store: Arc<dyn ProfileStore>,
        artifacts: Arc<ArtifactBundle>,
    ) -> Self {
        Self {
            pipeline,
            profile_store,
            artifacts,
        }
    }
}
