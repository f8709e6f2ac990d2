use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::data::models::DailyRecord;

/// Which slice of the collection a query runs over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearScope {
    Year(i32),
    AllYears,
}

/// A borrowed record together with the year it belongs to
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DatedRecord<'a> {
    pub year: i32,
    /// Calendar date, when `record.day` is valid for `year`
    pub date: Option<NaiveDate>,
    #[serde(flatten)]
    pub record: &'a DailyRecord,
}

impl<'a> DatedRecord<'a> {
    pub fn new(year: i32, record: &'a DailyRecord) -> Self {
        Self {
            year,
            date: record.date(year),
            record,
        }
    }
}

impl AsRef<DailyRecord> for DatedRecord<'_> {
    fn as_ref(&self) -> &DailyRecord {
        self.record
    }
}

/// All loaded records, keyed by calendar year
///
/// Owns every [`DailyRecord`]. Built once from the snapshot and read-only
/// afterwards. Records within a year keep their input order, which is not
/// necessarily sorted by day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct YearCollection {
    years: BTreeMap<i32, Vec<DailyRecord>>,
}

impl YearCollection {
    pub fn new(years: BTreeMap<i32, Vec<DailyRecord>>) -> Self {
        Self { years }
    }

    /// Records for `year`, or an empty slice when the year is absent
    pub fn year_records(&self, year: i32) -> &[DailyRecord] {
        self.years.get(&year).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains_year(&self, year: i32) -> bool {
        self.years.contains_key(&year)
    }

    /// Most recent year present, `None` for an empty collection
    pub fn latest_year(&self) -> Option<i32> {
        self.years.keys().next_back().copied()
    }

    pub fn latest_year_records(&self) -> &[DailyRecord] {
        self.latest_year()
            .map(|year| self.year_records(year))
            .unwrap_or(&[])
    }

    /// Years present, ascending
    pub fn available_years(&self) -> Vec<i32> {
        self.years.keys().copied().collect()
    }

    pub fn total_days(&self) -> usize {
        self.years.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    /// Every record, years ascending, input order within a year
    pub fn iter_all(&self) -> impl Iterator<Item = DatedRecord<'_>> {
        self.years
            .iter()
            .flat_map(|(year, records)| records.iter().map(move |r| DatedRecord::new(*year, r)))
    }

    /// Records selected by `scope`; an absent year yields an empty list
    pub fn scoped(&self, scope: YearScope) -> Vec<DatedRecord<'_>> {
        match scope {
            YearScope::Year(year) => self
                .year_records(year)
                .iter()
                .map(|r| DatedRecord::new(year, r))
                .collect(),
            YearScope::AllYears => self.iter_all().collect(),
        }
    }
}

impl FromIterator<(i32, Vec<DailyRecord>)> for YearCollection {
    fn from_iter<T: IntoIterator<Item = (i32, Vec<DailyRecord>)>>(iter: T) -> Self {
        Self {
            years: iter.into_iter().collect(),
        }
    }
}
