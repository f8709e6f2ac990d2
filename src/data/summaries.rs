use serde::Serialize;
use std::fmt;

use crate::classification::{AnomalySeverity, WeatherCondition};

// Aggregate value objects. Computed fresh per query, no link back to the
// records they were built from.

/// Totals and averages over one bucket of days (a 30-day "month" or a 7-day week)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodAggregate {
    /// 1-based bucket number
    pub period: u32,
    pub day_count: usize,
    pub total_production: f64,
    pub total_consumption: f64,
    pub total_injection: f64,
    pub average_temperature: f64,
    pub total_precipitation: f64,
    pub total_sunshine_hours: f64,
    /// Days whose upstream `has_anomaly` flag is set
    pub anomaly_count: usize,
}

pub type MonthlyAggregate = PeriodAggregate;
pub type WeeklyAggregate = PeriodAggregate;

impl PeriodAggregate {
    pub fn average_production_per_day(&self) -> f64 {
        ratio(self.total_production, self.day_count)
    }

    pub fn average_consumption_per_day(&self) -> f64 {
        ratio(self.total_consumption, self.day_count)
    }

    pub fn energy_balance(&self) -> f64 {
        self.total_production - self.total_consumption
    }

    /// Share of days flagged anomalous, in percent
    pub fn anomaly_rate(&self) -> f64 {
        ratio(self.anomaly_count as f64, self.day_count) * 100.0
    }
}

/// Production, consumption and injection summed over a year or all years (kWh)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct EnergyTotals {
    pub production: f64,
    pub consumption: f64,
    pub injection: f64,
}

impl EnergyTotals {
    pub fn energy_balance(&self) -> f64 {
        self.production - self.consumption
    }

    /// Share of production used on site rather than injected, in percent
    ///
    /// 0 when nothing was produced.
    pub fn self_consumption(&self) -> f64 {
        if self.production <= 0.0 {
            return 0.0;
        }
        (self.production - self.injection) / self.production * 100.0
    }
}

/// Weather factors correlated against production
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum WeatherFactor {
    Sunshine,
    Temperature,
    Precipitation,
    Wind,
}

impl WeatherFactor {
    /// Canonical order; earlier factors win ties
    pub const ALL: [WeatherFactor; 4] = [
        WeatherFactor::Sunshine,
        WeatherFactor::Temperature,
        WeatherFactor::Precipitation,
        WeatherFactor::Wind,
    ];
}

impl fmt::Display for WeatherFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WeatherFactor::Sunshine => "Sunshine Hours",
            WeatherFactor::Temperature => "Temperature",
            WeatherFactor::Precipitation => "Precipitation",
            WeatherFactor::Wind => "Wind Speed",
        };
        f.write_str(name)
    }
}

/// Pearson coefficients of each weather factor against production
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CorrelationResult {
    pub sunshine: f64,
    pub temperature: f64,
    pub precipitation: f64,
    pub wind: f64,
    /// Number of days that qualified for the sample
    pub sample_size: usize,
}

impl CorrelationResult {
    pub fn coefficient(&self, factor: WeatherFactor) -> f64 {
        match factor {
            WeatherFactor::Sunshine => self.sunshine,
            WeatherFactor::Temperature => self.temperature,
            WeatherFactor::Precipitation => self.precipitation,
            WeatherFactor::Wind => self.wind,
        }
    }

    /// Factor with the largest absolute coefficient
    pub fn strongest(&self) -> WeatherFactor {
        let mut best = WeatherFactor::Sunshine;
        for factor in WeatherFactor::ALL {
            if self.coefficient(factor).abs() > self.coefficient(best).abs() {
                best = factor;
            }
        }
        best
    }
}

/// How many days fell into a weather condition and what they produced
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConditionBreakdown {
    pub condition: WeatherCondition,
    pub days: usize,
    /// Share of all days in the input, in percent
    pub percentage: f64,
    pub total_production: f64,
    pub average_production: f64,
}

/// Upstream-flagged anomalous days grouped by weather condition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnomalyPattern {
    pub condition: WeatherCondition,
    pub count: usize,
    pub average_score: f64,
    pub average_production: f64,
    pub average_temperature: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeverityCount {
    pub severity: AnomalySeverity,
    pub count: usize,
}

/// Weather overview for a set of days
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WeatherSummary {
    pub day_count: usize,
    pub average_temperature: f64,
    pub min_temperature: f64,
    pub max_temperature: f64,
    pub total_precipitation: f64,
    pub total_sunshine_hours: f64,
    pub average_wind_speed: f64,
    pub max_wind_speed: f64,
    pub sunny_days: usize,
}

/// Daily production statistics for a set of days
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProductionSummary {
    pub day_count: usize,
    pub total_production: f64,
    pub average_production: f64,
    pub max_production: f64,
    pub min_production: f64,
    /// Population standard deviation of daily production
    pub std_dev_production: f64,
    /// Mean of the per-day efficiency, zero-production days count as 0
    pub average_efficiency: f64,
    /// Coefficient of variation in percent, 0 when mean production is 0
    pub variability: f64,
}

/// Per-day efficiency statistics
///
/// `best` and `worst` are the first and last day when ordered by descending
/// efficiency (stable, so ties keep input order).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EfficiencyAnalysis<R> {
    pub day_count: usize,
    pub average_efficiency: f64,
    /// Days above 90%
    pub high_efficiency_days: usize,
    /// Days below 50%
    pub low_efficiency_days: usize,
    pub best: Option<R>,
    pub worst: Option<R>,
}

impl<R> Default for EfficiencyAnalysis<R> {
    fn default() -> Self {
        Self {
            day_count: 0,
            average_efficiency: 0.0,
            high_efficiency_days: 0,
            low_efficiency_days: 0,
            best: None,
            worst: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Spring, Season::Summer, Season::Autumn, Season::Winter];

    /// Season of a 30-day month bucket; the year-end tail (13) is winter
    pub fn from_month_bucket(bucket: u32) -> Season {
        match bucket {
            3..=5 => Season::Spring,
            6..=8 => Season::Summer,
            9..=11 => Season::Autumn,
            _ => Season::Winter,
        }
    }
}

/// Season built from its month buckets
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonSummary {
    pub season: Season,
    pub month_count: usize,
    /// Mean of the monthly mean temperatures
    pub average_temperature: f64,
    pub total_precipitation: f64,
    pub total_sunshine_hours: f64,
    /// Mean of the monthly mean daily production
    pub average_production: f64,
}

pub(crate) fn ratio(total: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        total / count as f64
    }
}
