//! In-memory storage implementation for development and testing.
//!
//! This implementation uses `RwLock::unwrap()` intentionally. Lock poisoning
//! only occurs when another thread panicked while holding the lock, which is
//! an unrecoverable state. For production workloads, use the PostgreSQL
//! backend.

use async_trait::async_trait;
use krishi_core::error::Result;
use krishi_core::models::{FarmerId, FarmerProfile, SoilRecord};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, RwLock};

use crate::ports::ProfileStore;

/// In-memory implementation of ProfileStore
#[derive(Debug, Clone, Default)]
pub struct MemoryProfileStore {
    profiles: Arc<RwLock<HashMap<FarmerId, FarmerProfile>>>,
    soil_records: Arc<RwLock<HashMap<FarmerId, Vec<SoilRecord>>>>,
}

impl MemoryProfileStore {
    /// Create a new in-memory profile store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a farmer profile
    pub fn insert_profile(&self, profile: FarmerProfile) {
        let mut profiles = self.profiles.write().unwrap();
        profiles.insert(profile.id.clone(), profile);
    }

    /// Append a soil record for a farmer, preserving insertion order
    pub fn insert_soil_record(&self, farmer_id: FarmerId, record: SoilRecord) {
        let mut soil_records = self.soil_records.write().unwrap();
        soil_records.entry(farmer_id).or_default().push(record);
    }

    /// Load a seed file of profiles and soil records.
    ///
    /// The seed format mirrors the raw source documents, so the same
    /// `from_raw` ingestion path is exercised that production records go
    /// through.
    pub fn load_seed_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let seed: SeedFile = serde_json::from_str(&content)
            .map_err(|e| krishi_core::KrishiError::Serialization(e.to_string()))?;

        let store = Self::new();
        for raw in &seed.farmers {
            store.insert_profile(FarmerProfile::from_raw(raw)?);
        }
        for raw in &seed.soil_records {
            let record = SoilRecord::from_raw(raw)?;
            let farmer_id = krishi_core::models::farmer::raw_field_as_id(raw).ok_or_else(|| {
                krishi_core::KrishiError::Serialization(
                    "soil record has no AADHAAR_NO field".to_string(),
                )
            })?;
            store.insert_soil_record(farmer_id, record);
        }

        Ok(store)
    }
}

/// Seed file shape: raw documents keyed the way the source system keys them
#[derive(Debug, Deserialize)]
struct SeedFile {
    #[serde(default)]
    farmers: Vec<serde_json::Value>,
    #[serde(default)]
    soil_records: Vec<serde_json::Value>,
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn get_profile(&self, farmer_id: &FarmerId) -> Result<Option<FarmerProfile>> {
        let profiles = self.profiles.read().unwrap();
        Ok(profiles.get(farmer_id).cloned())
    }

    async fn soil_records(&self, farmer_id: &FarmerId) -> Result<Vec<SoilRecord>> {
        let soil_records = self.soil_records.read().unwrap();
        Ok(soil_records.get(farmer_id).cloned().unwrap_or_default())
    }

    async fn soil_record(
        &self,
        farmer_id: &FarmerId,
        survey_no: &str,
    ) -> Result<Option<SoilRecord>> {
        let soil_records = self.soil_records.read().unwrap();
        Ok(soil_records
            .get(farmer_id)
            .and_then(|records| records.iter().find(|r| r.survey_no == survey_no).cloned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(id: &str) -> FarmerProfile {
        FarmerProfile {
            id: FarmerId(id.to_string()),
            name: Some("Test Farmer".to_string()),
            district: None,
            state: None,
            coordinates: None,
        }
    }

    fn record(survey_no: &str) -> SoilRecord {
        SoilRecord {
            survey_no: survey_no.to_string(),
            ph: Some(6.8),
            nitrogen_kg_ha: Some(250.0),
            phosphorus_kg_ha: None,
            potassium_kg_ha: Some(130.0),
            soil_type: Some("black".to_string()),
        }
    }

    #[tokio::test]
    async fn test_profile_round_trip() {
        let store = MemoryProfileStore::new();
        store.insert_profile(profile("111"));

        let found = store.get_profile(&FarmerId("111".to_string())).await.unwrap();
        assert!(found.is_some());
        assert_eq!(found.unwrap().name.as_deref(), Some("Test Farmer"));

        let missing = store.get_profile(&FarmerId("222".to_string())).await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_soil_records_preserve_order() {
        let store = MemoryProfileStore::new();
        let id = FarmerId("111".to_string());
        store.insert_soil_record(id.clone(), record("SN-1"));
        store.insert_soil_record(id.clone(), record("SN-2"));

        let records = store.soil_records(&id).await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].survey_no, "SN-1");
        assert_eq!(records[1].survey_no, "SN-2");
    }

    #[tokio::test]
    async fn test_soil_record_by_survey_no() {
        let store = MemoryProfileStore::new();
        let id = FarmerId("111".to_string());
        store.insert_soil_record(id.clone(), record("SN-1"));

        let found = store.soil_record(&id, "SN-1").await.unwrap();
        assert!(found.is_some());

        let missing = store.soil_record(&id, "SN-9").await.unwrap();
        assert!(missing.is_none());
    }
}
