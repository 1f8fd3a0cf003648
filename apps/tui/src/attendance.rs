//! Attendance statistics.
//!
//! Scoping (batch, date range) is a separate step from aggregation: callers
//! narrow the records with [`AttendanceScope`] and hand the survivors to
//! [`aggregate`]. Statuses other than present/absent/late are counted in
//! `total_records` and in none of the per-status counts.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::db::models::AttendanceRecord;
use crate::domain::AttendanceStatus;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Anything carrying a raw attendance status.
pub trait StatusEntry {
    fn status(&self) -> &str;
}

impl StatusEntry for AttendanceRecord {
    fn status(&self) -> &str {
        &self.status
    }
}

impl StatusEntry for AttendanceStatus {
    fn status(&self) -> &str {
        self.as_str()
    }
}

impl StatusEntry for str {
    fn status(&self) -> &str {
        self
    }
}

impl<T: StatusEntry + ?Sized> StatusEntry for &T {
    fn status(&self) -> &str {
        (**self).status()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AttendanceStats {
    pub total_records: usize,
    pub present_count: usize,
    pub absent_count: usize,
    pub late_count: usize,
    /// Percentage of `total_records` marked present; 0 when there are none.
    pub attendance_rate: f64,
}

impl AttendanceStats {
    pub const fn count_for(&self, status: AttendanceStatus) -> usize {
        match status {
            AttendanceStatus::Present => self.present_count,
            AttendanceStatus::Absent => self.absent_count,
            AttendanceStatus::Late => self.late_count,
        }
    }

    /// Records whose status was not one of the three known values.
    pub const fn unrecognized_count(&self) -> usize {
        self.total_records - self.present_count - self.absent_count - self.late_count
    }

    fn add(&mut self, status: &str) {
        self.total_records += 1;
        match AttendanceStatus::parse(status) {
            Some(AttendanceStatus::Present) => self.present_count += 1,
            Some(AttendanceStatus::Absent) => self.absent_count += 1,
            Some(AttendanceStatus::Late) => self.late_count += 1,
            None => {}
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn finish(mut self) -> Self {
        self.attendance_rate = if self.total_records > 0 {
            self.present_count as f64 / self.total_records as f64 * 100.0
        } else {
            0.0
        };
        self
    }
}

/// Counts per status and the attendance rate over `entries`.
pub fn aggregate<I>(entries: I) -> AttendanceStats
where
    I: IntoIterator,
    I::Item: StatusEntry,
{
    let mut stats = AttendanceStats::default();
    for entry in entries {
        stats.add(entry.status());
    }
    stats.finish()
}

/// Optional batch and inclusive date bounds applied before aggregation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttendanceScope {
    pub batch_id: Option<i64>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl AttendanceScope {
    pub const fn for_batch(batch_id: i64) -> Self {
        Self {
            batch_id: Some(batch_id),
            start: None,
            end: None,
        }
    }

    pub const fn on_day(mut self, day: NaiveDate) -> Self {
        self.start = Some(day);
        self.end = Some(day);
        self
    }

    pub const fn between(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    /// Records with an unparsable date never match once a bound is set.
    pub fn matches(&self, record: &AttendanceRecord) -> bool {
        if let Some(batch_id) = self.batch_id {
            if record.batch_id != Some(batch_id) {
                return false;
            }
        }

        if self.start.is_none() && self.end.is_none() {
            return true;
        }

        let Some(date) = parse_date(&record.date) else {
            return false;
        };
        self.start.map_or(true, |start| date >= start) && self.end.map_or(true, |end| date <= end)
    }

    pub fn apply<'a>(&self, records: &'a [AttendanceRecord]) -> Vec<&'a AttendanceRecord> {
        records.iter().filter(|record| self.matches(record)).collect()
    }
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

/// Convenience for the common "scope then aggregate" call.
pub fn scoped_stats(records: &[AttendanceRecord], scope: &AttendanceScope) -> AttendanceStats {
    aggregate(scope.apply(records))
}

/// Stats per student id.
pub fn aggregate_by_student<'a, I>(records: I) -> BTreeMap<i64, AttendanceStats>
where
    I: IntoIterator<Item = &'a AttendanceRecord>,
{
    let mut per_student: BTreeMap<i64, AttendanceStats> = BTreeMap::new();
    for record in records {
        per_student
            .entry(record.student_id)
            .or_default()
            .add(&record.status);
    }
    per_student
        .into_iter()
        .map(|(student_id, stats)| (student_id, stats.finish()))
        .collect()
}

/// Stats per calendar day, oldest first. Records with unparsable dates are skipped.
pub fn daily_breakdown<'a, I>(records: I) -> Vec<(NaiveDate, AttendanceStats)>
where
    I: IntoIterator<Item = &'a AttendanceRecord>,
{
    let mut per_day: BTreeMap<NaiveDate, AttendanceStats> = BTreeMap::new();
    for record in records {
        if let Some(date) = parse_date(&record.date) {
            per_day.entry(date).or_default().add(&record.status);
        }
    }
    per_day
        .into_iter()
        .map(|(date, stats)| (date, stats.finish()))
        .collect()
}
