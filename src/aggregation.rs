//! Calendar aggregation and ranking over daily records
//!
//! Every function accepts any iterator of items that can be viewed as a
//! [`DailyRecord`] (owned records, `&DailyRecord`, or [`DatedRecord`]) and
//! returns freshly built values. Input records are never modified, and
//! selection functions hand back the same items they were given, so a
//! caller passing `DatedRecord`s keeps the year attached.
//!
//! Sorting is stable throughout: items with equal sort keys keep their input
//! order. Averages over an empty set are 0, never NaN.
//!
//! [`DatedRecord`]: crate::data::DatedRecord

use std::collections::BTreeMap;

use crate::classification::{AnomalySeverity, WeatherCondition};
use crate::data::summaries::ratio;
use crate::data::{
    AnomalyPattern, ConditionBreakdown, DailyRecord, EfficiencyAnalysis, EnergyTotals,
    MonthlyAggregate, PeriodAggregate, ProductionSummary, Season, SeasonSummary, SeverityCount,
    WeatherSummary, WeeklyAggregate,
};

/// 30-day "month" bucket for a day of year: days 1-30 are bucket 1, day 361+
/// lands in bucket 13. This is not a calendar month.
pub fn month_bucket(day: u32) -> u32 {
    day.saturating_sub(1) / 30 + 1
}

/// 7-day week bucket for a day of year
pub fn week_bucket(day: u32) -> u32 {
    day.saturating_sub(1) / 7 + 1
}

/// Sum production, consumption and injection
pub fn totals<R: AsRef<DailyRecord>>(records: impl IntoIterator<Item = R>) -> EnergyTotals {
    records
        .into_iter()
        .fold(EnergyTotals::default(), |mut acc, item| {
            let r = item.as_ref();
            acc.production += r.production;
            acc.consumption += r.consumption;
            acc.injection += r.injection;
            acc
        })
}

/// The `count` highest-production days, highest first
pub fn top_by_production<R: AsRef<DailyRecord>>(
    records: impl IntoIterator<Item = R>,
    count: usize,
) -> Vec<R> {
    let mut items: Vec<R> = records.into_iter().collect();
    items.sort_by(|a, b| b.as_ref().production.total_cmp(&a.as_ref().production));
    items.truncate(count);
    items
}

/// The `count` lowest-production days, lowest first
pub fn bottom_by_production<R: AsRef<DailyRecord>>(
    records: impl IntoIterator<Item = R>,
    count: usize,
) -> Vec<R> {
    let mut items: Vec<R> = records.into_iter().collect();
    items.sort_by(|a, b| a.as_ref().production.total_cmp(&b.as_ref().production));
    items.truncate(count);
    items
}

/// The `count` worst-weather days: least sunshine first, then most precipitation
pub fn worst_weather<R: AsRef<DailyRecord>>(
    records: impl IntoIterator<Item = R>,
    count: usize,
) -> Vec<R> {
    let mut items: Vec<R> = records.into_iter().collect();
    items.sort_by(|a, b| {
        let (a, b) = (&a.as_ref().weather, &b.as_ref().weather);
        a.sunshine_hours
            .total_cmp(&b.sunshine_hours)
            .then_with(|| b.precipitation.total_cmp(&a.precipitation))
    });
    items.truncate(count);
    items
}

/// Days whose derived severity is at least `min_severity`, highest score first
pub fn filter_by_severity<R: AsRef<DailyRecord>>(
    records: impl IntoIterator<Item = R>,
    min_severity: AnomalySeverity,
) -> Vec<R> {
    let mut items: Vec<R> = records
        .into_iter()
        .filter(|item| item.as_ref().severity() >= min_severity)
        .collect();
    items.sort_by(|a, b| {
        b.as_ref()
            .total_anomaly_score()
            .total_cmp(&a.as_ref().total_anomaly_score())
    });
    items
}

/// Days with `start <= day <= end`, ascending by day
pub fn day_range<R: AsRef<DailyRecord>>(
    records: impl IntoIterator<Item = R>,
    start: u32,
    end: u32,
) -> Vec<R> {
    let mut items: Vec<R> = records
        .into_iter()
        .filter(|item| (start..=end).contains(&item.as_ref().day))
        .collect();
    items.sort_by_key(|item| item.as_ref().day);
    items
}

#[derive(Default)]
struct PeriodAccumulator {
    day_count: usize,
    production: f64,
    consumption: f64,
    injection: f64,
    temperature_sum: f64,
    precipitation: f64,
    sunshine_hours: f64,
    anomaly_count: usize,
}

impl PeriodAccumulator {
    fn add(&mut self, r: &DailyRecord) {
        self.day_count += 1;
        self.production += r.production;
        self.consumption += r.consumption;
        self.injection += r.injection;
        self.temperature_sum += r.weather.average_temp;
        self.precipitation += r.weather.precipitation;
        self.sunshine_hours += r.weather.sunshine_hours;
        if r.anomaly.has_anomaly {
            self.anomaly_count += 1;
        }
    }

    fn finish(self, period: u32) -> PeriodAggregate {
        PeriodAggregate {
            period,
            day_count: self.day_count,
            total_production: self.production,
            total_consumption: self.consumption,
            total_injection: self.injection,
            average_temperature: ratio(self.temperature_sum, self.day_count),
            total_precipitation: self.precipitation,
            total_sunshine_hours: self.sunshine_hours,
            anomaly_count: self.anomaly_count,
        }
    }
}

/// Group days into buckets chosen by `bucket_of(day)` and aggregate each one
pub fn aggregate_periods<R, F>(
    records: impl IntoIterator<Item = R>,
    bucket_of: F,
) -> BTreeMap<u32, PeriodAggregate>
where
    R: AsRef<DailyRecord>,
    F: Fn(u32) -> u32,
{
    let mut buckets: BTreeMap<u32, PeriodAccumulator> = BTreeMap::new();
    for item in records {
        let r = item.as_ref();
        buckets.entry(bucket_of(r.day)).or_default().add(r);
    }

    buckets
        .into_iter()
        .map(|(period, acc)| (period, acc.finish(period)))
        .collect()
}

/// Aggregates keyed by 30-day month bucket (see [`month_bucket`])
pub fn monthly_aggregates<R: AsRef<DailyRecord>>(
    records: impl IntoIterator<Item = R>,
) -> BTreeMap<u32, MonthlyAggregate> {
    aggregate_periods(records, month_bucket)
}

pub fn weekly_aggregates<R: AsRef<DailyRecord>>(
    records: impl IntoIterator<Item = R>,
) -> BTreeMap<u32, WeeklyAggregate> {
    aggregate_periods(records, week_bucket)
}

/// Split records by weather condition, in [`WeatherCondition::ALL`] order
///
/// Conditions with no records are dropped.
fn group_by_condition<R: AsRef<DailyRecord>>(
    records: impl IntoIterator<Item = R>,
) -> Vec<(WeatherCondition, Vec<R>)> {
    let mut groups: Vec<(WeatherCondition, Vec<R>)> = WeatherCondition::ALL
        .into_iter()
        .map(|condition| (condition, Vec::new()))
        .collect();
    for item in records {
        let condition = item.as_ref().weather_condition();
        if let Some((_, group)) = groups.iter_mut().find(|(c, _)| *c == condition) {
            group.push(item);
        }
    }
    groups.retain(|(_, group)| !group.is_empty());
    groups
}

/// Days and production per weather condition
///
/// Ordered by descending day count; equal counts follow the canonical
/// condition order. Conditions with no days are left out.
pub fn condition_breakdown<R: AsRef<DailyRecord>>(
    records: impl IntoIterator<Item = R>,
) -> Vec<ConditionBreakdown> {
    let groups = group_by_condition(records);
    let total_days: usize = groups.iter().map(|(_, group)| group.len()).sum();

    let mut breakdown: Vec<ConditionBreakdown> = groups
        .into_iter()
        .map(|(condition, group)| {
            let days = group.len();
            let production: f64 = group.iter().map(|item| item.as_ref().production).sum();
            ConditionBreakdown {
                condition,
                days,
                percentage: ratio(days as f64, total_days) * 100.0,
                total_production: production,
                average_production: ratio(production, days),
            }
        })
        .collect();
    breakdown.sort_by(|a, b| b.days.cmp(&a.days));
    breakdown
}

/// Days flagged `has_anomaly` upstream, grouped by weather condition
///
/// Ordered by descending count, ties in canonical condition order. The
/// score-derived severity plays no part in the selection.
pub fn anomaly_patterns<R: AsRef<DailyRecord>>(
    records: impl IntoIterator<Item = R>,
) -> Vec<AnomalyPattern> {
    let flagged = records
        .into_iter()
        .filter(|item| item.as_ref().anomaly.has_anomaly);

    let mut patterns: Vec<AnomalyPattern> = group_by_condition(flagged)
        .into_iter()
        .map(|(condition, group)| {
            let count = group.len();
            let mean = |value: fn(&DailyRecord) -> f64| {
                ratio(group.iter().map(|item| value(item.as_ref())).sum(), count)
            };
            AnomalyPattern {
                condition,
                count,
                average_score: mean(DailyRecord::total_anomaly_score),
                average_production: mean(|r| r.production),
                average_temperature: mean(|r| r.weather.average_temp),
            }
        })
        .collect();
    patterns.sort_by(|a, b| b.count.cmp(&a.count));
    patterns
}

/// Production used on site as a percentage of production, over all records
pub fn self_consumption<R: AsRef<DailyRecord>>(records: impl IntoIterator<Item = R>) -> f64 {
    totals(records).self_consumption()
}

/// Efficiency above this percentage counts as a high-efficiency day
pub const HIGH_EFFICIENCY_PERCENT: f64 = 90.0;
/// Efficiency below this percentage counts as a low-efficiency day
pub const LOW_EFFICIENCY_PERCENT: f64 = 50.0;

/// Mean efficiency, high/low day counts and the best and worst day
pub fn efficiency_analysis<R>(records: impl IntoIterator<Item = R>) -> EfficiencyAnalysis<R>
where
    R: AsRef<DailyRecord> + Clone,
{
    let mut items: Vec<R> = records.into_iter().collect();
    if items.is_empty() {
        return EfficiencyAnalysis::default();
    }
    items.sort_by(|a, b| b.as_ref().efficiency().total_cmp(&a.as_ref().efficiency()));

    let efficiencies: Vec<f64> = items.iter().map(|item| item.as_ref().efficiency()).collect();
    let day_count = items.len();

    EfficiencyAnalysis {
        day_count,
        average_efficiency: ratio(efficiencies.iter().sum(), day_count),
        high_efficiency_days: efficiencies
            .iter()
            .filter(|e| **e > HIGH_EFFICIENCY_PERCENT)
            .count(),
        low_efficiency_days: efficiencies
            .iter()
            .filter(|e| **e < LOW_EFFICIENCY_PERCENT)
            .count(),
        best: items.first().cloned(),
        worst: items.last().cloned(),
    }
}

/// Number of days at each severity level, `None` through `High`
pub fn severity_breakdown<R: AsRef<DailyRecord>>(
    records: impl IntoIterator<Item = R>,
) -> Vec<SeverityCount> {
    let mut counts = [0usize; 4];
    for item in records {
        counts[item.as_ref().severity() as usize] += 1;
    }

    AnomalySeverity::ALL
        .into_iter()
        .zip(counts)
        .map(|(severity, count)| SeverityCount { severity, count })
        .collect()
}

pub fn weather_summary<R: AsRef<DailyRecord>>(
    records: impl IntoIterator<Item = R>,
) -> WeatherSummary {
    let items: Vec<R> = records.into_iter().collect();
    if items.is_empty() {
        return WeatherSummary::default();
    }

    let weather = items.iter().map(|item| &item.as_ref().weather);
    let day_count = items.len();

    WeatherSummary {
        day_count,
        average_temperature: ratio(weather.clone().map(|w| w.average_temp).sum(), day_count),
        min_temperature: weather.clone().map(|w| w.min_temp).fold(f64::INFINITY, f64::min),
        max_temperature: weather
            .clone()
            .map(|w| w.max_temp)
            .fold(f64::NEG_INFINITY, f64::max),
        total_precipitation: weather.clone().map(|w| w.precipitation).sum(),
        total_sunshine_hours: weather.clone().map(|w| w.sunshine_hours).sum(),
        average_wind_speed: ratio(weather.clone().map(|w| w.wind_speed).sum(), day_count),
        max_wind_speed: weather
            .clone()
            .map(|w| w.wind_speed)
            .fold(f64::NEG_INFINITY, f64::max),
        sunny_days: weather
            .filter(|w| w.condition() == WeatherCondition::Sunny)
            .count(),
    }
}

pub fn production_summary<R: AsRef<DailyRecord>>(
    records: impl IntoIterator<Item = R>,
) -> ProductionSummary {
    let items: Vec<R> = records.into_iter().collect();
    if items.is_empty() {
        return ProductionSummary::default();
    }

    let day_count = items.len();
    let production: Vec<f64> = items.iter().map(|item| item.as_ref().production).collect();
    let total: f64 = production.iter().sum();
    let average = ratio(total, day_count);
    let variance = ratio(
        production.iter().map(|p| (p - average).powi(2)).sum(),
        day_count,
    );
    let std_dev = variance.sqrt();
    let efficiency_sum: f64 = items.iter().map(|item| item.as_ref().efficiency()).sum();

    ProductionSummary {
        day_count,
        total_production: total,
        average_production: average,
        max_production: production.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        min_production: production.iter().copied().fold(f64::INFINITY, f64::min),
        std_dev_production: std_dev,
        average_efficiency: ratio(efficiency_sum, day_count),
        variability: if average == 0.0 {
            0.0
        } else {
            std_dev / average * 100.0
        },
    }
}

/// Roll monthly buckets up into seasons
///
/// Seasons without any bucket are omitted.
pub fn seasonal_summary(monthly: &BTreeMap<u32, MonthlyAggregate>) -> Vec<SeasonSummary> {
    Season::ALL
        .into_iter()
        .filter_map(|season| {
            let months: Vec<&MonthlyAggregate> = monthly
                .values()
                .filter(|m| Season::from_month_bucket(m.period) == season)
                .collect();
            if months.is_empty() {
                return None;
            }

            let month_count = months.len();
            Some(SeasonSummary {
                season,
                month_count,
                average_temperature: ratio(
                    months.iter().map(|m| m.average_temperature).sum(),
                    month_count,
                ),
                total_precipitation: months.iter().map(|m| m.total_precipitation).sum(),
                total_sunshine_hours: months.iter().map(|m| m.total_sunshine_hours).sum(),
                average_production: ratio(
                    months.iter().map(|m| m.average_production_per_day()).sum(),
                    month_count,
                ),
            })
        })
        .collect()
}
