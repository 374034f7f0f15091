use serde::{Deserialize, Serialize};

use krishi_core::models::WeatherSummary;

/// Forecast steps scanned for rain when deciding the urea advisory.
/// The upstream forecast is 3-hourly, so this covers roughly 15 hours.
pub const RAIN_SCAN_STEPS: usize = 5;

/// Current conditions at the farmer's location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temp_c: Option<f64>,
    pub humidity_pct: Option<f64>,
    pub conditions: Option<String>,
}

/// One 3-hourly forecast step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastStep {
    pub temp_c: Option<f64>,
    pub humidity_pct: Option<f64>,

    /// Condition group as reported upstream ("Rain", "Clouds", ...)
    pub conditions: String,
}

/// Weather report combining current conditions and a short-term forecast
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherReport {
    pub current: Option<CurrentConditions>,
    pub forecast: Vec<ForecastStep>,
}

impl WeatherReport {
    /// Digest the report into the summary attached to advisory replies.
    ///
    /// Averages temperature and humidity over the first
    /// `window_hours / 3` forecast steps (at least one), matching the
    /// 3-hourly cadence of the upstream forecast.
    pub fn summarize(&self, window_hours: u32) -> WeatherSummary {
        let steps = (window_hours as usize / 3).max(1).min(self.forecast.len());
        let window = &self.forecast[..steps];

        WeatherSummary {
            avg_temp_c: mean(window.iter().filter_map(|s| s.temp_c)),
            avg_humidity_pct: mean(window.iter().filter_map(|s| s.humidity_pct)),
            rain_expected: self.rain_expected(),
        }
    }

    /// True when rain shows up in the near-term forecast window
    pub fn rain_expected(&self) -> bool {
        self.forecast
            .iter()
            .take(RAIN_SCAN_STEPS)
            .any(|step| step.conditions.to_lowercase().contains("rain"))
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let collected: Vec<f64> = values.collect();
    if collected.is_empty() {
        return None;
    }
    Some(collected.iter().sum::<f64>() / collected.len() as f64)
}
