use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{KrishiError, Result};

/// Unique identifier for a farmer (the Aadhaar number in the source data)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FarmerId(pub String);

impl std::fmt::Display for FarmerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Geographic coordinates (WGS 84)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// Farmer profile resolved from storage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FarmerProfile {
    pub id: FarmerId,
    pub name: Option<String>,
    pub district: Option<String>,
    pub state: Option<String>,

    /// Resolved location, either stored directly or geocoded from
    /// district/state by the enrichment layer
    pub coordinates: Option<Coordinates>,
}

impl FarmerProfile {
    /// Build a typed profile from a loosely-keyed source document.
    ///
    /// Upstream records use inconsistent uppercase keys (`AADHAAR_NO`,
    /// `NAME`, `LAT`) and store numbers as either numbers or strings; the
    /// conversion happens once here, at the storage boundary.
    pub fn from_raw(raw: &Value) -> Result<Self> {
        let id = raw_string(raw, &["AADHAAR_NO", "aadhaar_no"]).ok_or_else(|| {
            KrishiError::Serialization("farmer record has no AADHAAR_NO field".to_string())
        })?;

        let lat = raw_number(raw, &["LAT", "lat"]);
        let lon = raw_number(raw, &["LON", "lon"]);
        let coordinates = match (lat, lon) {
            (Some(lat), Some(lon)) => Some(Coordinates { lat, lon }),
            _ => None,
        };

        Ok(Self {
            id: FarmerId(id),
            name: raw_string(raw, &["NAME", "name"]),
            district: raw_string(raw, &["DISTRICT", "district"]),
            state: raw_string(raw, &["STATE", "state"]),
            coordinates,
        })
    }
}

/// Read the farmer id out of a raw source document (profile or soil record)
pub fn raw_field_as_id(raw: &Value) -> Option<FarmerId> {
    raw_string(raw, &["AADHAAR_NO", "aadhaar_no"]).map(FarmerId)
}

/// Read a string field trying each key in order
pub(crate) fn raw_string(raw: &Value, keys: &[&str]) -> Option<String> {
    for key in keys {
        match raw.get(key) {
            Some(Value::String(s)) if !s.trim().is_empty() => return Some(s.trim().to_string()),
            Some(Value::Number(n)) => return Some(n.to_string()),
            _ => continue,
        }
    }
    None
}

/// Read a numeric field trying each key in order; numeric strings count
pub(crate) fn raw_number(raw: &Value, keys: &[&str]) -> Option<f64> {
    for key in keys {
        match raw.get(key) {
            Some(Value::Number(n)) => return n.as_f64().filter(|v| v.is_finite()),
            Some(Value::String(s)) => {
                if let Ok(v) = s.trim().parse::<f64>() {
                    if v.is_finite() {
                        return Some(v);
                    }
                }
            }
            _ => continue,
        }
    }
    None
}
