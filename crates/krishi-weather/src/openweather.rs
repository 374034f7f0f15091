use async_trait::async_trait;
use krishi_core::error::{KrishiError, Result};
use krishi_core::models::Coordinates;
use serde::Deserialize;

use crate::models::{CurrentConditions, ForecastStep, WeatherReport};
use crate::ports::WeatherProvider;

/// OpenWeather client implementation
pub struct OpenWeatherClient {
    /// Base URL for the OpenWeather API (e.g., "https://api.openweathermap.org")
    base_url: String,

    /// API key
    api_key: String,

    /// HTTP client
    client: reqwest::Client,
}

impl OpenWeatherClient {
    /// Create a new OpenWeather client
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Create with the production OpenWeather URL
    pub fn production(api_key: impl Into<String>) -> Self {
        Self::new("https://api.openweathermap.org", api_key)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        coordinates: Coordinates,
    ) -> Result<T> {
        let response = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .query(&[
                ("lat", coordinates.lat.to_string()),
                ("lon", coordinates.lon.to_string()),
                ("appid", self.api_key.clone()),
                ("units", "metric".to_string()),
            ])
            .send()
            .await
            .map_err(|e| KrishiError::WeatherUnavailable {
                reason: format!("Failed to reach OpenWeather: {}", e),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(KrishiError::WeatherUnavailable {
                reason: format!("OpenWeather API error ({})", status),
            });
        }

        response.json().await.map_err(|e| KrishiError::WeatherUnavailable {
            reason: format!("Failed to parse OpenWeather response: {}", e),
        })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    async fn fetch(&self, coordinates: Coordinates) -> Result<WeatherReport> {
        let current: OwmCurrent = self.get_json("/data/2.5/weather", coordinates).await?;
        let forecast: OwmForecast = self.get_json("/data/2.5/forecast", coordinates).await?;

        Ok(WeatherReport {
            current: Some(current.into()),
            forecast: forecast.list.into_iter().map(ForecastStep::from).collect(),
        })
    }
}

/// Subset of the OpenWeather "current weather" payload
#[derive(Debug, Deserialize)]
struct OwmCurrent {
    main: Option<OwmMain>,
    #[serde(default)]
    weather: Vec<OwmCondition>,
}

/// Subset of the OpenWeather 5-day/3-hour forecast payload
#[derive(Debug, Deserialize)]
struct OwmForecast {
    #[serde(default)]
    list: Vec<OwmStep>,
}

#[derive(Debug, Deserialize)]
struct OwmStep {
    main: Option<OwmMain>,
    #[serde(default)]
    weather: Vec<OwmCondition>,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: Option<f64>,
    humidity: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwmCondition {
    main: String,
}

impl From<OwmCurrent> for CurrentConditions {
    fn from(raw: OwmCurrent) -> Self {
        CurrentConditions {
            temp_c: raw.main.as_ref().and_then(|m| m.temp),
            humidity_pct: raw.main.as_ref().and_then(|m| m.humidity),
            conditions: raw.weather.into_iter().next().map(|w| w.main),
        }
    }
}

impl From<OwmStep> for ForecastStep {
    fn from(raw: OwmStep) -> Self {
        ForecastStep {
            temp_c: raw.main.as_ref().and_then(|m| m.temp),
            humidity_pct: raw.main.as_ref().and_then(|m| m.humidity),
            conditions: raw.weather.into_iter().next().map(|w| w.main).unwrap_or_default(),
        }
    }
}
