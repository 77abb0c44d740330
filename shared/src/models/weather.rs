//! Weather data models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Above this temperature a sunny day calls for irrigation management
const HOT_DAY_CELSIUS: i64 = 32;

/// Coarse sky condition reported to the farmer
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum WeatherCondition {
    Sunny,
    Rainy,
    Cloudy,
    Storm,
}

impl WeatherCondition {
    /// Rain or storm: drainage and crop protection come first
    pub fn is_severe(&self) -> bool {
        matches!(self, WeatherCondition::Rainy | WeatherCondition::Storm)
    }
}

impl std::fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WeatherCondition::Sunny => write!(f, "Sunny"),
            WeatherCondition::Rainy => write!(f, "Rainy"),
            WeatherCondition::Cloudy => write!(f, "Cloudy"),
            WeatherCondition::Storm => write!(f, "Storm"),
        }
    }
}

/// Local weather at the time of the advisory request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate)]
pub struct WeatherSnapshot {
    pub condition: WeatherCondition,
    #[serde(
        rename = "temperatureC",
        alias = "temp",
        with = "rust_decimal::serde::float"
    )]
    pub temperature_celsius: Decimal,
    #[serde(rename = "humidityPct", alias = "humidity")]
    #[validate(range(min = 0, max = 100))]
    pub humidity_percent: i32,
    #[serde(rename = "forecastText", alias = "forecast")]
    pub forecast: String,
}

impl WeatherSnapshot {
    /// Sunny and hot enough that irrigation needs attention
    pub fn needs_irrigation_focus(&self) -> bool {
        self.condition == WeatherCondition::Sunny
            && self.temperature_celsius >= Decimal::from(HOT_DAY_CELSIUS)
    }
}
