#![allow(dead_code)]

use solar_analytics::data::{AnomalyStats, DailyRecord, YearCollection};

/// Floating-point tolerance for aggregate assertions
pub const EPSILON: f64 = 1e-9;

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < EPSILON,
        "expected {expected}, got {actual}"
    );
}

/// Builder for test records; everything not set stays zero/empty
pub struct RecordBuilder {
    record: DailyRecord,
}

impl RecordBuilder {
    pub fn new(day: u32) -> Self {
        Self {
            record: DailyRecord {
                day,
                has_measurements: true,
                is_complete: true,
                ..Default::default()
            },
        }
    }

    pub fn production(mut self, value: f64) -> Self {
        self.record.production = value;
        self
    }

    pub fn consumption(mut self, value: f64) -> Self {
        self.record.consumption = value;
        self
    }

    pub fn injection(mut self, value: f64) -> Self {
        self.record.injection = value;
        self
    }

    pub fn sunshine(mut self, hours: f64) -> Self {
        self.record.weather.sunshine_hours = hours;
        self
    }

    pub fn precipitation(mut self, mm: f64) -> Self {
        self.record.weather.precipitation = mm;
        self
    }

    pub fn temperature(mut self, celsius: f64) -> Self {
        self.record.weather.average_temp = celsius;
        self
    }

    pub fn wind(mut self, speed: f64) -> Self {
        self.record.weather.wind_speed = speed;
        self
    }

    /// Anomaly score split entirely onto production
    pub fn anomaly_score(mut self, score: f64) -> Self {
        self.record.anomaly = AnomalyStats {
            production_anomaly: score,
            ..self.record.anomaly
        };
        self
    }

    pub fn flagged(mut self) -> Self {
        self.record.anomaly.has_anomaly = true;
        self
    }

    pub fn build(self) -> DailyRecord {
        self.record
    }
}

/// The three-day scenario: a sunny day, a rainy day without production,
/// and another sunny day
pub fn three_day_scenario() -> Vec<DailyRecord> {
    vec![
        RecordBuilder::new(1)
            .production(20.0)
            .consumption(15.0)
            .sunshine(9.0)
            .precipitation(0.0)
            .build(),
        RecordBuilder::new(2)
            .production(0.0)
            .consumption(10.0)
            .sunshine(1.0)
            .precipitation(6.0)
            .build(),
        RecordBuilder::new(3)
            .production(18.0)
            .consumption(14.0)
            .sunshine(8.5)
            .precipitation(0.0)
            .build(),
    ]
}

pub fn single_year(year: i32, records: Vec<DailyRecord>) -> YearCollection {
    YearCollection::from_iter([(year, records)])
}

/// A two-year snapshot in the upstream wire format
pub fn sample_snapshot_json() -> String {
    r#"{
        "2022": [
            {
                "D": 1, "P": 12.5, "U": 10.0, "I": 4.0,
                "J": true, "S": false, "M": true, "C": true,
                "MS": {"tavg": 3.5, "tmin": -1.0, "tmax": 7.0, "prcp": 0.0, "snow": 0.0,
                       "wdir": 180.0, "wspd": 8.0, "wpgt": 20.0, "pres": 1015.0, "tsun": 6.0},
                "AS": {"P": 0.5, "U": -0.2, "I": 0.1, "A": false},
                "Q": {"C": [0.5, 0.7], "I": [0.0, 0.2], "G": [0.4, 1.1], "P": [0.4, 1.1],
                      "WRT": null, "WOT": null, "WP": null}
            }
        ],
        "2023": [
            {
                "D": 123, "P": 30.0, "U": 18.0, "I": 15.0,
                "J": false, "S": true, "M": true, "C": true,
                "MS": {"tavg": 21.0, "tmin": 12.0, "tmax": 27.0, "prcp": 0.0, "snow": 0.0,
                       "wdir": 90.0, "wspd": 12.0, "wpgt": 30.0, "pres": 1020.0, "tsun": 11.0},
                "AS": {"P": 4.0, "U": -3.0, "I": 1.0, "A": true},
                "Q": {"C": [0.3, 0.9, 1.2], "I": [0.1, 2.0, 0.4], "G": [0.2, 3.1, 1.0],
                      "P": [0.2, 3.1, 1.0], "WRT": [41.0, 42.5, 43.0], "WOT": [35.0, 36.0, 36.5],
                      "WP": [1.4, 1.5, 1.5]},
                "SRS": {"R": "2023-05-03T06:12:00", "S": "2023-05-03T20:48:00"}
            },
            {
                "D": 124, "P": 8.0, "U": 20.0, "I": 1.0,
                "C": false,
                "MS": {"tavg": 14.0, "tmin": 10.0, "tmax": 16.0, "prcp": 9.5, "snow": 0.0,
                       "wdir": 250.0, "wspd": 28.0, "wpgt": 55.0, "pres": 1002.0, "tsun": 0.5},
                "AS": {"P": -6.0, "U": 3.0, "I": -2.0, "A": true},
                "Q": {"C": [], "I": [], "G": [], "P": []}
            }
        ]
    }"#
    .to_string()
}
