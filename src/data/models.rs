use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::classification::{
    classify_severity, classify_weather, classify_wind, AnomalySeverity, WeatherCondition,
    WindCondition,
};
use crate::utils::day_of_year_to_date;

/// Sub-daily readings are sampled every 15 minutes
pub const READING_INTERVAL_HOURS: f64 = 0.25;

/// One calendar day of solar, grid and weather data
///
/// Field names on the wire are the compact keys used by the upstream
/// snapshot producer. Energy quantities are kWh, including `injection`:
/// the engine never rescales it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    /// Day of year, 1..=366
    #[serde(rename = "D")]
    pub day: u32,
    #[serde(rename = "P")]
    pub production: f64,
    #[serde(rename = "U")]
    pub consumption: f64,
    /// Grid injection (kWh)
    #[serde(rename = "I")]
    pub injection: f64,
    // Upstream flags, carried through unchanged
    #[serde(rename = "J", default)]
    pub has_january: bool,
    #[serde(rename = "S", default)]
    pub has_summer: bool,
    #[serde(rename = "M", default)]
    pub has_measurements: bool,
    #[serde(rename = "MS")]
    pub weather: WeatherStats,
    #[serde(rename = "AS")]
    pub anomaly: AnomalyStats,
    #[serde(rename = "Q")]
    pub sub_daily: SubDailyReadings,
    #[serde(rename = "C", default)]
    pub is_complete: bool,
    #[serde(rename = "SRS", default, skip_serializing_if = "Option::is_none")]
    pub sun_times: Option<SunTimes>,
}

impl AsRef<DailyRecord> for DailyRecord {
    fn as_ref(&self) -> &DailyRecord {
        self
    }
}

impl DailyRecord {
    /// Consumption as a percentage of production
    ///
    /// Returns 0 when production is zero or negative. That 0 is a sentinel,
    /// not a measured efficiency.
    pub fn efficiency(&self) -> f64 {
        if self.production > 0.0 {
            self.consumption / self.production * 100.0
        } else {
            0.0
        }
    }

    pub fn energy_balance(&self) -> f64 {
        self.production - self.consumption
    }

    pub fn is_energy_positive(&self) -> bool {
        self.energy_balance() > 0.0
    }

    pub fn peak_sub_daily_production(&self) -> f64 {
        self.sub_daily.peak_production()
    }

    pub fn average_sub_daily_production(&self) -> f64 {
        self.sub_daily.average_production()
    }

    pub fn total_anomaly_score(&self) -> f64 {
        self.anomaly.total_score()
    }

    /// Severity derived from the anomaly score alone (ignores `has_anomaly`)
    pub fn severity(&self) -> AnomalySeverity {
        self.anomaly.severity()
    }

    pub fn weather_condition(&self) -> WeatherCondition {
        self.weather.condition()
    }

    pub fn wind_condition(&self) -> WindCondition {
        self.weather.wind_condition()
    }

    /// Calendar date of this record within `year`
    pub fn date(&self, year: i32) -> Option<NaiveDate> {
        day_of_year_to_date(year, self.day)
    }
}

/// Daily weather statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherStats {
    #[serde(rename = "tavg")]
    pub average_temp: f64,
    #[serde(rename = "tmin")]
    pub min_temp: f64,
    #[serde(rename = "tmax")]
    pub max_temp: f64,
    /// Precipitation (mm)
    #[serde(rename = "prcp")]
    pub precipitation: f64,
    #[serde(rename = "snow")]
    pub snow: f64,
    #[serde(rename = "wdir")]
    pub wind_direction: f64,
    /// Average wind speed (km/h)
    #[serde(rename = "wspd")]
    pub wind_speed: f64,
    #[serde(rename = "wpgt")]
    pub wind_peak_gust: f64,
    #[serde(rename = "pres")]
    pub pressure: f64,
    #[serde(rename = "tsun")]
    pub sunshine_hours: f64,
}

impl WeatherStats {
    pub fn temperature_range(&self) -> f64 {
        self.max_temp - self.min_temp
    }

    pub fn condition(&self) -> WeatherCondition {
        classify_weather(self.precipitation, self.sunshine_hours)
    }

    pub fn wind_condition(&self) -> WindCondition {
        classify_wind(self.wind_speed)
    }
}

/// Deviation scores produced by the upstream anomaly detector
///
/// `has_anomaly` is the detector's own verdict and is kept independent of
/// the score-derived [`AnomalySeverity`]; the two can disagree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnomalyStats {
    #[serde(rename = "P")]
    pub production_anomaly: f64,
    #[serde(rename = "U")]
    pub consumption_anomaly: f64,
    #[serde(rename = "I")]
    pub injection_anomaly: f64,
    #[serde(rename = "A")]
    pub has_anomaly: bool,
}

impl AnomalyStats {
    pub fn total_score(&self) -> f64 {
        self.production_anomaly.abs() + self.consumption_anomaly.abs() + self.injection_anomaly.abs()
    }

    pub fn severity(&self) -> AnomalySeverity {
        classify_severity(self.total_score())
    }
}

/// Quarter-hourly readings within one day
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubDailyReadings {
    #[serde(rename = "C", default)]
    pub consumption: Vec<f64>,
    #[serde(rename = "I", default)]
    pub injection: Vec<f64>,
    #[serde(rename = "G", default)]
    pub generation: Vec<f64>,
    #[serde(rename = "P", default)]
    pub production: Vec<f64>,
    // Water-loop channels, absent on installations without one
    #[serde(rename = "WRT", default, skip_serializing_if = "Option::is_none")]
    pub water_return_temp: Option<Vec<f64>>,
    #[serde(rename = "WOT", default, skip_serializing_if = "Option::is_none")]
    pub water_outlet_temp: Option<Vec<f64>>,
    #[serde(rename = "WP", default, skip_serializing_if = "Option::is_none")]
    pub water_pressure: Option<Vec<f64>>,
}

impl SubDailyReadings {
    /// Number of quarter-hour slots, counted on the consumption channel
    pub fn total_readings(&self) -> usize {
        self.consumption.len()
    }

    pub fn time_span_hours(&self) -> f64 {
        self.total_readings() as f64 * READING_INTERVAL_HOURS
    }

    pub fn has_water_loop(&self) -> bool {
        self.water_return_temp.is_some()
            || self.water_outlet_temp.is_some()
            || self.water_pressure.is_some()
    }

    pub fn peak_production(&self) -> f64 {
        max_value(&self.production).unwrap_or(0.0)
    }

    pub fn average_production(&self) -> f64 {
        if self.production.is_empty() {
            return 0.0;
        }
        self.production.iter().sum::<f64>() / self.production.len() as f64
    }

    /// Hour of day at which consumption peaked (first maximum wins)
    pub fn peak_demand_hour(&self) -> f64 {
        peak_hour(&self.consumption)
    }

    /// Hour of day at which generation peaked (first maximum wins)
    pub fn peak_generation_hour(&self) -> f64 {
        peak_hour(&self.generation)
    }
}

fn max_value(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::max)
}

fn peak_hour(values: &[f64]) -> f64 {
    let Some(max) = max_value(values) else {
        return 0.0;
    };
    values
        .iter()
        .position(|v| *v == max)
        .map(|idx| idx as f64 * READING_INTERVAL_HOURS)
        .unwrap_or(0.0)
}

/// Local sunrise and sunset for the day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SunTimes {
    #[serde(rename = "R", with = "crate::data::serialize_local_time")]
    pub sunrise: NaiveDateTime,
    #[serde(rename = "S", with = "crate::data::serialize_local_time")]
    pub sunset: NaiveDateTime,
}

impl SunTimes {
    pub fn daylight_hours(&self) -> f64 {
        (self.sunset - self.sunrise).num_seconds() as f64 / 3600.0
    }

    pub fn is_daylight(&self, at: NaiveDateTime) -> bool {
        at >= self.sunrise && at <= self.sunset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(production: f64, consumption: f64) -> DailyRecord {
        DailyRecord {
            day: 1,
            production,
            consumption,
            injection: 5.0,
            has_january: true,
            has_summer: false,
            has_measurements: true,
            weather: WeatherStats {
                average_temp: 25.0,
                min_temp: 20.0,
                max_temp: 30.0,
                wind_direction: 180.0,
                wind_speed: 10.0,
                wind_peak_gust: 20.0,
                pressure: 1013.0,
                sunshine_hours: 8.0,
                ..Default::default()
            },
            anomaly: AnomalyStats::default(),
            sub_daily: SubDailyReadings {
                production: vec![0.5, 1.0, 1.5],
                ..Default::default()
            },
            is_complete: true,
            sun_times: None,
        }
    }

    #[test]
    fn test_derived_properties() {
        let r = record(20.0, 15.0);
        assert!((r.efficiency() - 75.0).abs() < 1e-9);
        assert!((r.energy_balance() - 5.0).abs() < 1e-9);
        assert!(r.is_energy_positive());
        assert!((r.peak_sub_daily_production() - 1.5).abs() < 1e-9);
        assert!((r.average_sub_daily_production() - 1.0).abs() < 1e-9);
        assert!((r.weather.temperature_range() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_efficiency_is_zero_without_production() {
        let r = record(0.0, 10.0);
        assert_eq!(r.efficiency(), 0.0);
        assert!(r.efficiency().is_finite());

        let negative = record(-1.0, 10.0);
        assert_eq!(negative.efficiency(), 0.0);
    }

    #[test]
    fn test_balance_not_positive_when_equal() {
        assert!(!record(10.0, 10.0).is_energy_positive());
    }

    #[test]
    fn test_empty_sub_daily_sequences() {
        let readings = SubDailyReadings::default();
        assert_eq!(readings.peak_production(), 0.0);
        assert_eq!(readings.average_production(), 0.0);
        assert_eq!(readings.peak_demand_hour(), 0.0);
        assert_eq!(readings.time_span_hours(), 0.0);
        assert!(!readings.has_water_loop());
    }

    #[test]
    fn test_peak_hours_use_first_maximum() {
        let readings = SubDailyReadings {
            consumption: vec![0.1, 0.9, 0.3, 0.9],
            generation: vec![0.0, 0.0, 0.0, 0.0, 2.0],
            ..Default::default()
        };
        assert_eq!(readings.total_readings(), 4);
        assert_eq!(readings.time_span_hours(), 1.0);
        assert_eq!(readings.peak_demand_hour(), 0.25);
        assert_eq!(readings.peak_generation_hour(), 1.0);
    }

    #[test]
    fn test_anomaly_score_uses_absolute_values() {
        let stats = AnomalyStats {
            production_anomaly: -2.5,
            consumption_anomaly: 1.5,
            injection_anomaly: -1.0,
            has_anomaly: false,
        };
        assert!((stats.total_score() - 5.0).abs() < 1e-9);
        assert_eq!(stats.severity(), AnomalySeverity::Medium);
    }

    #[test]
    fn test_deserialize_compact_record() {
        let json = r#"{
            "D": 1, "P": 15.5, "U": 12.3, "I": 3.2, "J": true, "S": false, "M": true,
            "MS": {"tavg": 8.6, "tmin": 7.5, "tmax": 10.1, "prcp": 0.2, "snow": 0,
                   "wdir": 242, "wspd": 29.7, "wpgt": 57.4, "pres": 1010, "tsun": 0},
            "AS": {"P": 0, "U": 0, "I": 0, "A": false},
            "Q": {"C": [], "I": [], "G": [], "P": [], "WRT": null, "WOT": null, "WP": null},
            "C": true,
            "SRS": {"R": "2023-01-01T07:37:48", "S": "2023-01-01T16:02:37"}
        }"#;

        let record: DailyRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.day, 1);
        assert_eq!(record.production, 15.5);
        assert!(record.is_complete);
        assert!(!record.sub_daily.has_water_loop());
        assert_eq!(record.wind_condition(), WindCondition::Strong);
        assert_eq!(record.weather_condition(), WeatherCondition::Overcast);

        let sun = record.sun_times.unwrap();
        assert!((sun.daylight_hours() - 8.413_611).abs() < 1e-3);
    }

    #[test]
    fn test_completeness_defaults_to_false() {
        let json = r#"{
            "D": 2, "P": 1, "U": 1, "I": 0,
            "MS": {"tavg": 0, "tmin": 0, "tmax": 0, "prcp": 0, "snow": 0,
                   "wdir": 0, "wspd": 0, "wpgt": 0, "pres": 0, "tsun": 0},
            "AS": {"P": 0, "U": 0, "I": 0, "A": false},
            "Q": {"C": [], "I": [], "G": [], "P": []}
        }"#;

        let record: DailyRecord = serde_json::from_str(json).unwrap();
        assert!(!record.is_complete);
        assert!(record.sun_times.is_none());
    }

    #[test]
    fn test_sun_times_with_utc_offset() {
        let json = r#"{
            "D": 1, "P": 3.0, "U": 9.0, "I": 0.5,
            "MS": {"tavg": 2.0, "tmin": -3.0, "tmax": 5.0, "prcp": 0.0, "snow": 0.0,
                   "wdir": 0.0, "wspd": 6.0, "wpgt": 12.0, "pres": 1020.0, "tsun": 3.0},
            "AS": {"P": 0.0, "U": 0.0, "I": 0.0, "A": false},
            "Q": {"C": [], "I": [], "G": [], "P": []},
            "SRS": {"R": "2023-01-01T07:37:48+01:00", "S": "2023-01-01T16:37:48Z"}
        }"#;
        let record: DailyRecord = serde_json::from_str(json).unwrap();
        let sun = record.sun_times.unwrap();

        assert_eq!(
            sun.sunrise,
            NaiveDate::from_ymd_opt(2023, 1, 1)
                .unwrap()
                .and_hms_opt(7, 37, 48)
                .unwrap()
        );
        assert_eq!(sun.daylight_hours(), 9.0);
    }

    #[test]
    fn test_is_daylight_inclusive() {
        let sunrise = NaiveDate::from_ymd_opt(2023, 6, 21)
            .unwrap()
            .and_hms_opt(5, 30, 0)
            .unwrap();
        let sunset = NaiveDate::from_ymd_opt(2023, 6, 21)
            .unwrap()
            .and_hms_opt(22, 0, 0)
            .unwrap();
        let sun = SunTimes { sunrise, sunset };

        assert!(sun.is_daylight(sunrise));
        assert!(sun.is_daylight(sunset));
        assert!(!sun.is_daylight(sunset + chrono::Duration::seconds(1)));
        assert_eq!(sun.daylight_hours(), 16.5);
    }
}
