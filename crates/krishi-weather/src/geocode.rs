use async_trait::async_trait;
use krishi_core::error::{KrishiError, Result};
use krishi_core::models::Coordinates;
use serde::Deserialize;

use crate::ports::Geocoder;

/// Nominatim (OpenStreetMap) geocoder for district/state lookups.
///
/// Nominatim requires an identifying User-Agent on every request.
pub struct NominatimClient {
    base_url: String,
    client: reqwest::Client,
}

const USER_AGENT: &str = "krishimitra/0.1";

impl NominatimClient {
    /// Create a new geocoder client
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Create with the public Nominatim instance
    pub fn public() -> Self {
        Self::new("https://nominatim.openstreetmap.org")
    }
}

/// Build the free-text search query from the available location parts
pub(crate) fn search_query(district: Option<&str>, state: Option<&str>) -> Option<String> {
    let parts: Vec<&str> = district
        .iter()
        .chain(state.iter())
        .copied()
        .filter(|p| !p.trim().is_empty())
        .collect();

    if parts.is_empty() {
        return None;
    }

    let mut query = parts.join(", ");
    query.push_str(", India");
    Some(query)
}

#[async_trait]
impl Geocoder for NominatimClient {
    async fn geocode(
        &self,
        district: Option<&str>,
        state: Option<&str>,
    ) -> Result<Option<Coordinates>> {
        let Some(query) = search_query(district, state) else {
            return Ok(None);
        };

        let response = self
            .client
            .get(format!("{}/search", self.base_url))
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .query(&[("q", query.as_str()), ("format", "json"), ("limit", "1")])
            .send()
            .await
            .map_err(|e| KrishiError::WeatherUnavailable {
                reason: format!("Failed to reach Nominatim: {}", e),
            })?;

        if !response.status().is_success() {
            return Err(KrishiError::WeatherUnavailable {
                reason: format!("Nominatim API error ({})", response.status()),
            });
        }

        let hits: Vec<NominatimHit> =
            response.json().await.map_err(|e| KrishiError::WeatherUnavailable {
                reason: format!("Failed to parse Nominatim response: {}", e),
            })?;

        let Some(hit) = hits.into_iter().next() else {
            return Ok(None);
        };

        match (hit.lat.parse::<f64>(), hit.lon.parse::<f64>()) {
            (Ok(lat), Ok(lon)) => Ok(Some(Coordinates { lat, lon })),
            _ => Ok(None),
        }
    }
}

/// Nominatim returns coordinates as strings
#[derive(Debug, Deserialize)]
struct NominatimHit {
    lat: String,
    lon: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_query_joins_available_parts() {
        assert_eq!(
            search_query(Some("Nashik"), Some("Maharashtra")).as_deref(),
            Some("Nashik, Maharashtra, India")
        );
        assert_eq!(search_query(None, Some("Punjab")).as_deref(), Some("Punjab, India"));
        assert_eq!(search_query(Some("Salem"), None).as_deref(), Some("Salem, India"));
    }

    #[test]
    fn test_search_query_empty_location() {
        assert_eq!(search_query(None, None), None);
        assert_eq!(search_query(Some("  "), None), None);
    }

    #[test]
    fn test_parse_hit_coordinates() {
        let hits: Vec<NominatimHit> =
            serde_json::from_str(r#"[{"lat": "19.99", "lon": "73.78"}]"#).unwrap();
        assert_eq!(hits[0].lat, "19.99");
    }
}
