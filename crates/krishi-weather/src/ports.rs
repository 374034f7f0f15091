//! Enrichment port definitions

use async_trait::async_trait;
use krishi_core::error::Result;
use krishi_core::models::Coordinates;

use crate::models::WeatherReport;

/// Port for fetching current conditions and a short-term forecast.
///
/// Implementations perform the outbound I/O; callers treat every failure as
/// missing enrichment, never as a request failure.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Fetch a weather report for the given coordinates
    async fn fetch(&self, coordinates: Coordinates) -> Result<WeatherReport>;
}

/// Port for resolving a district/state pair to coordinates
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolve coordinates, `None` when the location is unknown
    async fn geocode(&self, district: Option<&str>, state: Option<&str>)
        -> Result<Option<Coordinates>>;
}
