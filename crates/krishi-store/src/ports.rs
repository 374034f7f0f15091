use async_trait::async_trait;
use krishi_core::error::Result;
use krishi_core::models::{FarmerId, FarmerProfile, SoilRecord};

/// Port for farmer profile and soil-record storage.
///
/// Absence is modeled as `Ok(None)` / empty vectors, not as errors: whether
/// a missing profile aborts a flow is the pipeline's decision.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Retrieve a farmer profile by id
    async fn get_profile(&self, farmer_id: &FarmerId) -> Result<Option<FarmerProfile>>;

    /// List all soil records for a farmer, in stable storage order
    async fn soil_records(&self, farmer_id: &FarmerId) -> Result<Vec<SoilRecord>>;

    /// Retrieve one soil record by survey number
    async fn soil_record(
        &self,
        farmer_id: &FarmerId,
        survey_no: &str,
    ) -> Result<Option<SoilRecord>>;
}
