//! Weather and geocoding enrichment for advisory replies.
//!
//! Weather is optional context: every provider failure is survivable and the
//! pipeline must produce an answer without it.

pub mod geocode;
pub mod models;
pub mod openweather;
pub mod ports;

pub use geocode::NominatimClient;
pub use models::{CurrentConditions, ForecastStep, WeatherReport};
pub use openweather::OpenWeatherClient;
pub use ports::{Geocoder, WeatherProvider};
