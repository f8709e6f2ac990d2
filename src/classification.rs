//! Categorical labels derived from raw daily measurements
//!
//! All classifiers are pure functions of their inputs. Thresholds use strict
//! comparisons, so a value sitting exactly on a boundary belongs to the
//! next band up (wind, severity) or fails the test (weather).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Weather condition classifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WeatherCondition {
    Sunny,
    PartlyCloudy,
    Cloudy,
    Overcast,
    Rainy,
}

impl WeatherCondition {
    /// Canonical ordering; per-condition breakdowns list equal counts in this order
    pub const ALL: [WeatherCondition; 5] = [
        WeatherCondition::Sunny,
        WeatherCondition::PartlyCloudy,
        WeatherCondition::Cloudy,
        WeatherCondition::Overcast,
        WeatherCondition::Rainy,
    ];
}

impl fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WeatherCondition::Sunny => "Sunny",
            WeatherCondition::PartlyCloudy => "Partly cloudy",
            WeatherCondition::Cloudy => "Cloudy",
            WeatherCondition::Overcast => "Overcast",
            WeatherCondition::Rainy => "Rainy",
        };
        f.write_str(name)
    }
}

/// Wind classifications by average wind speed (km/h)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WindCondition {
    Calm,
    Light,
    Moderate,
    Strong,
    Gale,
}

/// Anomaly severity levels, ordered `None < Low < Medium < High`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AnomalySeverity {
    None,
    Low,
    Medium,
    High,
}

impl AnomalySeverity {
    pub const ALL: [AnomalySeverity; 4] = [
        AnomalySeverity::None,
        AnomalySeverity::Low,
        AnomalySeverity::Medium,
        AnomalySeverity::High,
    ];
}

impl fmt::Display for AnomalySeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AnomalySeverity::None => "none",
            AnomalySeverity::Low => "low",
            AnomalySeverity::Medium => "medium",
            AnomalySeverity::High => "high",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown severity '{0}' (expected none, low, medium or high)")]
pub struct ParseSeverityError(pub String);

impl FromStr for AnomalySeverity {
    type Err = ParseSeverityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(AnomalySeverity::None),
            "low" => Ok(AnomalySeverity::Low),
            "medium" => Ok(AnomalySeverity::Medium),
            "high" => Ok(AnomalySeverity::High),
            _ => Err(ParseSeverityError(s.to_string())),
        }
    }
}

/// Classify the day's weather from precipitation (mm) and sunshine (hours)
///
/// This is a decision list: the first matching rule wins.
pub fn classify_weather(precipitation: f64, sunshine_hours: f64) -> WeatherCondition {
    if precipitation > 5.0 {
        WeatherCondition::Rainy
    } else if precipitation > 0.0 && sunshine_hours < 2.0 {
        WeatherCondition::Overcast
    } else if precipitation == 0.0 && sunshine_hours > 8.0 {
        WeatherCondition::Sunny
    } else if precipitation == 0.0 && sunshine_hours > 4.0 {
        WeatherCondition::PartlyCloudy
    } else {
        WeatherCondition::Cloudy
    }
}

pub fn classify_wind(wind_speed: f64) -> WindCondition {
    if wind_speed < 5.0 {
        WindCondition::Calm
    } else if wind_speed < 15.0 {
        WindCondition::Light
    } else if wind_speed < 25.0 {
        WindCondition::Moderate
    } else if wind_speed < 35.0 {
        WindCondition::Strong
    } else {
        WindCondition::Gale
    }
}

/// Map a total anomaly score to a severity level
pub fn classify_severity(total_anomaly_score: f64) -> AnomalySeverity {
    if total_anomaly_score < 1.0 {
        AnomalySeverity::None
    } else if total_anomaly_score < 5.0 {
        AnomalySeverity::Low
    } else if total_anomaly_score < 10.0 {
        AnomalySeverity::Medium
    } else {
        AnomalySeverity::High
    }
}
