//! Pearson correlation between weather factors and daily production

use thiserror::Error;

use crate::data::{CorrelationResult, DailyRecord, WeatherStats};

/// Minimum number of producing days needed for a meaningful coefficient
pub const MIN_SAMPLE_SIZE: usize = 2;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CorrelationError {
    #[error("Sequences differ in length: x has {x} values, y has {y}")]
    LengthMismatch { x: usize, y: usize },
}

/// Pearson product-moment correlation of two equal-length sequences
///
/// Returns 0 for empty input and when either sequence has zero variance.
/// The result is not clamped, so floating-point error can push it
/// marginally outside [-1, 1].
pub fn pearson_correlation(x: &[f64], y: &[f64]) -> Result<f64, CorrelationError> {
    if x.len() != y.len() {
        return Err(CorrelationError::LengthMismatch {
            x: x.len(),
            y: y.len(),
        });
    }
    if x.is_empty() {
        return Ok(0.0);
    }

    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let numerator: f64 = x
        .iter()
        .zip(y)
        .map(|(xi, yi)| (xi - mean_x) * (yi - mean_y))
        .sum();
    let sum_sq_x: f64 = x.iter().map(|xi| (xi - mean_x).powi(2)).sum();
    let sum_sq_y: f64 = y.iter().map(|yi| (yi - mean_y).powi(2)).sum();
    let denominator = (sum_sq_x * sum_sq_y).sqrt();

    if denominator == 0.0 {
        Ok(0.0)
    } else {
        Ok(numerator / denominator)
    }
}

/// Correlate sunshine, temperature, precipitation and wind with production
///
/// Only days with `production > 0` are sampled; zero-production days are
/// usually data gaps. With fewer than [`MIN_SAMPLE_SIZE`] such days every
/// coefficient is 0.
pub fn analyze_weather_correlation<R: AsRef<DailyRecord>>(
    records: impl IntoIterator<Item = R>,
) -> Result<CorrelationResult, CorrelationError> {
    let sample: Vec<R> = records
        .into_iter()
        .filter(|item| item.as_ref().production > 0.0)
        .collect();

    if sample.len() < MIN_SAMPLE_SIZE {
        return Ok(CorrelationResult {
            sample_size: sample.len(),
            ..Default::default()
        });
    }

    let production: Vec<f64> = sample.iter().map(|item| item.as_ref().production).collect();
    let factor = |select: fn(&WeatherStats) -> f64| -> Vec<f64> {
        sample
            .iter()
            .map(|item| select(&item.as_ref().weather))
            .collect()
    };

    Ok(CorrelationResult {
        sunshine: pearson_correlation(&factor(|w| w.sunshine_hours), &production)?,
        temperature: pearson_correlation(&factor(|w| w.average_temp), &production)?,
        precipitation: pearson_correlation(&factor(|w| w.precipitation), &production)?,
        wind: pearson_correlation(&factor(|w| w.wind_speed), &production)?,
        sample_size: sample.len(),
    })
}
