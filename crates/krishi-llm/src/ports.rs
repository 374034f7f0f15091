//! LLM port definitions

use async_trait::async_trait;
use krishi_core::error::Result;
use krishi_core::models::{ClassifiedIntent, FarmerProfile, SchemeGuidance};

/// Port for classifying a farmer query into an intent label.
///
/// The structured-output contract asks the service for exactly one of the
/// four recognized labels, but the return type deliberately carries the raw
/// label string: coercing unknown labels to `general` is the router's job.
#[async_trait]
pub trait IntentClassifier: Send + Sync {
    /// Classify a free-text query
    async fn classify(&self, query: &str) -> Result<ClassifiedIntent>;
}

/// Port for rewriting a structured draft into farmer-friendly prose.
///
/// Refinement is cosmetic: callers must fall back to the draft when this
/// port fails.
#[async_trait]
pub trait TextRefiner: Send + Sync {
    /// Rewrite `draft` in the context of the original `query`
    async fn refine(&self, query: &str, draft: &str) -> Result<String>;
}

/// Port for the external government-scheme guidance flow
#[async_trait]
pub trait SchemeGuide: Send + Sync {
    /// Produce structured scheme-eligibility guidance for a query
    async fn guide(
        &self,
        query: &str,
        profile: Option<&FarmerProfile>,
    ) -> Result<SchemeGuidance>;
}
