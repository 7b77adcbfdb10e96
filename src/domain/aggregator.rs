//! Sales aggregation: coverage summary, period buckets and selection ranges.
//!
//! Everything here is recomputed from raw records on each call and performs
//! no I/O. Malformed dates exclude a row from bucketing; malformed unit
//! counts contribute zero.

use crate::domain::date_interval::DateInterval;
use crate::domain::sales_record::SalesRecord;
use chrono::{Datelike, Days, Month, NaiveDate};

const LAST_THIRTY_DAYS: u64 = 30;

/// Reporting granularity offered to the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum ReportingPeriod {
    LastThirtyDays,
    Monthly,
    Yearly,
}

impl ReportingPeriod {
    pub const ALL: [ReportingPeriod; 3] = [
        ReportingPeriod::Yearly,
        ReportingPeriod::Monthly,
        ReportingPeriod::LastThirtyDays,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            ReportingPeriod::LastThirtyDays => "Last 30 days",
            ReportingPeriod::Monthly => "Monthly",
            ReportingPeriod::Yearly => "Yearly",
        }
    }

    /// Label of the bucket axis.
    pub fn axis_label(&self) -> &'static str {
        match self {
            ReportingPeriod::Yearly => "Month",
            ReportingPeriod::LastThirtyDays | ReportingPeriod::Monthly => "Day",
        }
    }
}

/// A period together with the year/month it needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodSelection {
    LastThirtyDays,
    Monthly { year: i32, month: u32 },
    Yearly { year: i32 },
}

impl PeriodSelection {
    /// `None` when the period needs a year or month that was not supplied.
    pub fn resolve(period: ReportingPeriod, year: Option<i32>, month: Option<u32>) -> Option<Self> {
        match period {
            ReportingPeriod::LastThirtyDays => Some(PeriodSelection::LastThirtyDays),
            ReportingPeriod::Monthly => Some(PeriodSelection::Monthly {
                year: year?,
                month: month?,
            }),
            ReportingPeriod::Yearly => Some(PeriodSelection::Yearly { year: year? }),
        }
    }

    pub fn period(&self) -> ReportingPeriod {
        match self {
            PeriodSelection::LastThirtyDays => ReportingPeriod::LastThirtyDays,
            PeriodSelection::Monthly { .. } => ReportingPeriod::Monthly,
            PeriodSelection::Yearly { .. } => ReportingPeriod::Yearly,
        }
    }
}

/// Date bounds and unit total over every record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoverageSummary {
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    pub total_units: i64,
}

impl CoverageSummary {
    pub fn interval(&self) -> DateInterval {
        DateInterval::new(self.first_date, self.last_date)
            .unwrap_or_else(|_| DateInterval::single_day(self.first_date))
    }

    /// `Total sales between Jan 15, 2024 and Mar 10, 2024: 42`
    pub fn describe(&self) -> String {
        format!(
            "Total sales between {} and {}: {}",
            medium_date(self.first_date),
            medium_date(self.last_date),
            self.total_units
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregationBucket {
    pub label: String,
    pub total_units: i64,
}

/// Ordered, zero-filled buckets for one period selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketSeries {
    pub axis_label: &'static str,
    pub buckets: Vec<AggregationBucket>,
}

impl BucketSeries {
    pub fn total_units(&self) -> i64 {
        self.buckets.iter().map(|b| b.total_units).sum()
    }
}

/// Min/max `Begin Date` and the sum of `Units` across `records`.
///
/// Both dates fall back to `today` when no record carries a readable date.
pub fn coverage(records: &[SalesRecord], today: NaiveDate) -> CoverageSummary {
    let mut first: Option<NaiveDate> = None;
    let mut last: Option<NaiveDate> = None;
    let mut total_units = 0i64;

    for record in records {
        total_units += record.units();
        if let Some(date) = record.begin_date() {
            first = Some(first.map_or(date, |d| d.min(date)));
            last = Some(last.map_or(date, |d| d.max(date)));
        }
    }

    CoverageSummary {
        first_date: first.unwrap_or(today),
        last_date: last.unwrap_or(today),
        total_units,
    }
}

/// Bucketed unit totals for `selection`, oldest bucket first.
///
/// `today` anchors the last-thirty-days window and should be the current UTC
/// date.
pub fn bucket_series(
    records: &[SalesRecord],
    selection: PeriodSelection,
    today: NaiveDate,
) -> BucketSeries {
    let dated: Vec<(NaiveDate, i64)> = records
        .iter()
        .filter_map(|r| r.begin_date().map(|d| (d, r.units())))
        .collect();

    let buckets = match selection {
        PeriodSelection::LastThirtyDays => last_thirty_days(today)
            .map(|day| AggregationBucket {
                label: day.format("%b %-d").to_string(),
                total_units: sum_where(&dated, |d| d == day),
            })
            .collect(),
        PeriodSelection::Monthly { year, month } => days_in_month(year, month)
            .into_iter()
            .map(|day| AggregationBucket {
                label: day.format("%d").to_string(),
                total_units: sum_where(&dated, |d| d.year() == year && d == day),
            })
            .collect(),
        PeriodSelection::Yearly { year } => (1..=12u32)
            .map(|month| AggregationBucket {
                label: month_name(month).to_string(),
                total_units: sum_where(&dated, |d| d.year() == year && d.month() == month),
            })
            .collect(),
    };

    BucketSeries {
        axis_label: selection.period().axis_label(),
        buckets,
    }
}

/// Years that can be selected: first through last covered year.
pub fn selectable_years(coverage: &CoverageSummary) -> Vec<i32> {
    coverage.interval().years().collect()
}

/// Months of `year` that overlap the coverage interval, as 1-based numbers.
///
/// Empty when `year` lies entirely outside coverage.
pub fn selectable_months(year: i32, coverage: &CoverageSummary) -> Vec<u32> {
    let Some(calendar) = DateInterval::calendar_year(year) else {
        return Vec::new();
    };
    match calendar.intersect(&coverage.interval()) {
        Some(overlap) => (overlap.start().month()..=overlap.end().month()).collect(),
        None => Vec::new(),
    }
}

/// Every day of `month` in `year`, or nothing for an invalid month.
pub fn days_in_month(year: i32, month: u32) -> Vec<NaiveDate> {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return Vec::new();
    };
    first
        .iter_days()
        .take_while(|d| d.month() == month)
        .collect()
}

/// English month name for a 1-based month number.
pub fn month_name(month: u32) -> &'static str {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map(|m| m.name())
        .unwrap_or("")
}

fn last_thirty_days(today: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    (0..LAST_THIRTY_DAYS)
        .rev()
        .filter_map(move |offset| today.checked_sub_days(Days::new(offset)))
}

fn sum_where(dated: &[(NaiveDate, i64)], matches: impl Fn(NaiveDate) -> bool) -> i64 {
    dated
        .iter()
        .filter(|(d, _)| matches(*d))
        .map(|(_, units)| *units)
        .sum()
}

fn medium_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}
