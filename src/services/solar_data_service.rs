use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::aggregation;
use crate::classification::AnomalySeverity;
use crate::correlation::{self, CorrelationError};
use crate::data::{
    AnomalyPattern, ConditionBreakdown, CorrelationResult, DatedRecord, EfficiencyAnalysis,
    EnergyTotals, MonthlyAggregate, ProductionSummary, SeasonSummary, SeverityCount,
    WeatherSummary, WeeklyAggregate, YearCollection, YearScope,
};
use crate::load_error::LoadError;
use crate::loader::SnapshotLoader;

/// Read-only query surface over one loaded snapshot
///
/// Cloning is cheap; every clone shares the same immutable collection.
#[derive(Clone)]
pub struct SolarDataService {
    collection: Arc<YearCollection>,
}

impl SolarDataService {
    pub fn new(collection: YearCollection) -> Self {
        Self {
            collection: Arc::new(collection),
        }
    }

    /// Load the snapshot once and wrap it
    pub async fn load(loader: &SnapshotLoader) -> Result<Self, LoadError> {
        let collection = loader.load().await?;
        Ok(Self::new(collection))
    }

    pub fn collection(&self) -> &YearCollection {
        &self.collection
    }

    pub fn available_years(&self) -> Vec<i32> {
        self.collection.available_years()
    }

    pub fn latest_year(&self) -> Option<i32> {
        self.collection.latest_year()
    }

    pub fn total_days(&self) -> usize {
        self.collection.total_days()
    }

    /// Requested year, or the latest year when none is given
    ///
    /// `None` only when no year was requested and the collection is empty.
    pub fn resolve_scope(&self, year: Option<i32>) -> Option<YearScope> {
        match year {
            Some(year) => Some(YearScope::Year(year)),
            None => self.latest_year().map(YearScope::Year),
        }
    }

    pub fn records(&self, scope: YearScope) -> Vec<DatedRecord<'_>> {
        self.collection.scoped(scope)
    }

    #[instrument(skip(self))]
    pub fn top_production_days(&self, scope: YearScope, count: usize) -> Vec<DatedRecord<'_>> {
        let top = aggregation::top_by_production(self.records(scope), count);
        debug!("Selected {} top production days", top.len());
        top
    }

    #[instrument(skip(self))]
    pub fn bottom_production_days(&self, scope: YearScope, count: usize) -> Vec<DatedRecord<'_>> {
        aggregation::bottom_by_production(self.records(scope), count)
    }

    #[instrument(skip(self))]
    pub fn worst_weather_days(&self, scope: YearScope, count: usize) -> Vec<DatedRecord<'_>> {
        aggregation::worst_weather(self.records(scope), count)
    }

    /// Records at or above `min_severity`, highest anomaly score first
    #[instrument(skip(self))]
    pub fn anomalous_days(
        &self,
        scope: YearScope,
        min_severity: AnomalySeverity,
    ) -> Vec<DatedRecord<'_>> {
        let anomalies = aggregation::filter_by_severity(self.records(scope), min_severity);
        debug!(
            "Found {} days at or above {} severity",
            anomalies.len(),
            min_severity
        );
        anomalies
    }

    pub fn day_range(&self, scope: YearScope, start: u32, end: u32) -> Vec<DatedRecord<'_>> {
        aggregation::day_range(self.records(scope), start, end)
    }

    /// 30-day buckets; across all years the same bucket of every year is merged
    #[instrument(skip(self))]
    pub fn monthly_statistics(&self, scope: YearScope) -> BTreeMap<u32, MonthlyAggregate> {
        let monthly = aggregation::monthly_aggregates(self.records(scope));
        debug!("Aggregated {} monthly buckets", monthly.len());
        monthly
    }

    pub fn weekly_statistics(&self, scope: YearScope) -> BTreeMap<u32, WeeklyAggregate> {
        aggregation::weekly_aggregates(self.records(scope))
    }

    pub fn totals(&self, scope: YearScope) -> EnergyTotals {
        aggregation::totals(self.records(scope))
    }

    /// Percentage of production used on site, 0 without production
    pub fn self_consumption(&self, scope: YearScope) -> f64 {
        aggregation::self_consumption(self.records(scope))
    }

    pub fn efficiency_analysis(&self, scope: YearScope) -> EfficiencyAnalysis<DatedRecord<'_>> {
        aggregation::efficiency_analysis(self.records(scope))
    }

    #[instrument(skip(self))]
    pub fn anomaly_patterns(&self, scope: YearScope) -> Vec<AnomalyPattern> {
        let patterns = aggregation::anomaly_patterns(self.records(scope));
        debug!("Flagged anomalies span {} weather conditions", patterns.len());
        patterns
    }

    pub fn condition_breakdown(&self, scope: YearScope) -> Vec<ConditionBreakdown> {
        aggregation::condition_breakdown(self.records(scope))
    }

    pub fn severity_breakdown(&self, scope: YearScope) -> Vec<SeverityCount> {
        aggregation::severity_breakdown(self.records(scope))
    }

    pub fn weather_summary(&self, scope: YearScope) -> WeatherSummary {
        aggregation::weather_summary(self.records(scope))
    }

    pub fn production_summary(&self, scope: YearScope) -> ProductionSummary {
        aggregation::production_summary(self.records(scope))
    }

    pub fn seasonal_summary(&self, scope: YearScope) -> Vec<SeasonSummary> {
        aggregation::seasonal_summary(&self.monthly_statistics(scope))
    }

    #[instrument(skip(self))]
    pub fn weather_correlation(
        &self,
        scope: YearScope,
    ) -> Result<CorrelationResult, CorrelationError> {
        let result = correlation::analyze_weather_correlation(self.records(scope))?;
        debug!(
            "Correlation over {} producing days, strongest factor {}",
            result.sample_size,
            result.strongest()
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DailyRecord;

    fn record(day: u32, production: f64) -> DailyRecord {
        DailyRecord {
            day,
            production,
            ..Default::default()
        }
    }

    fn service() -> SolarDataService {
        SolarDataService::new(YearCollection::from_iter([
            (2022, vec![record(1, 5.0), record(2, 7.0)]),
            (2023, vec![record(1, 9.0)]),
        ]))
    }

    #[test]
    fn test_resolve_scope_defaults_to_latest_year() {
        let service = service();
        assert_eq!(service.resolve_scope(None), Some(YearScope::Year(2023)));
        assert_eq!(service.resolve_scope(Some(2022)), Some(YearScope::Year(2022)));
    }

    #[test]
    fn test_resolve_scope_empty_collection() {
        let service = SolarDataService::new(YearCollection::default());
        assert_eq!(service.resolve_scope(None), None);
        assert_eq!(service.resolve_scope(Some(2020)), Some(YearScope::Year(2020)));
    }

    #[test]
    fn test_all_years_totals() {
        let service = service();
        assert_eq!(service.totals(YearScope::AllYears).production, 21.0);
        assert_eq!(service.totals(YearScope::Year(2022)).production, 12.0);
        assert_eq!(service.totals(YearScope::Year(1999)).production, 0.0);
    }

    #[test]
    fn test_top_days_keep_their_year() {
        let service = service();
        let top = service.top_production_days(YearScope::AllYears, 2);
        assert_eq!(top.len(), 2);
        assert_eq!((top[0].year, top[0].record.day), (2023, 1));
        assert_eq!((top[1].year, top[1].record.day), (2022, 2));
    }

    #[test]
    fn test_all_years_monthly_merges_same_bucket() {
        let service = service();
        let monthly = service.monthly_statistics(YearScope::AllYears);

        assert_eq!(monthly.len(), 1);
        assert_eq!(monthly[&1].day_count, 3);
        assert_eq!(monthly[&1].total_production, 21.0);
        assert_eq!(service.monthly_statistics(YearScope::Year(2022))[&1].day_count, 2);
    }

    #[test]
    fn test_efficiency_analysis_keeps_year() {
        let mut best = record(5, 10.0);
        best.consumption = 9.5;
        let service = SolarDataService::new(YearCollection::from_iter([
            (2022, vec![best]),
            (2023, vec![record(1, 9.0)]),
        ]));

        let analysis = service.efficiency_analysis(YearScope::AllYears);
        assert_eq!(analysis.high_efficiency_days, 1);
        let best = analysis.best.unwrap();
        assert_eq!((best.year, best.record.day), (2022, 5));
        let worst = analysis.worst.unwrap();
        assert_eq!((worst.year, worst.record.day), (2023, 1));
    }

    #[test]
    fn test_self_consumption_and_anomaly_patterns() {
        let mut flagged = record(3, 8.0);
        flagged.injection = 2.0;
        flagged.anomaly.has_anomaly = true;
        let service = SolarDataService::new(YearCollection::from_iter([(2024, vec![flagged])]));
        let scope = YearScope::Year(2024);

        assert_eq!(service.self_consumption(scope), 75.0);
        let patterns = service.anomaly_patterns(scope);
        assert_eq!(patterns.len(), 1);
        assert_eq!(patterns[0].count, 1);
        assert_eq!(service.self_consumption(YearScope::Year(1999)), 0.0);
    }

    #[test]
    fn test_clones_share_collection() {
        let service = service();
        let clone = service.clone();
        assert!(Arc::ptr_eq(&service.collection, &clone.collection));
    }
}
