//! Cadence-aware lookups across reporting periods.
//!
//! Statement lists are most-recent-first. Comparisons such as "year ago"
//! are resolved from report dates when available, and from the detected
//! cadence otherwise, instead of assuming a fixed quarterly offset.

use analysis_core::{BalanceSheet, CashFlowStatement, IncomeStatement, PeriodCadence, PriceBar};
use chrono::NaiveDate;

/// Longest gap between consecutive rows still considered quarterly
const MAX_QUARTERLY_GAP_DAYS: i64 = 120;
/// Shortest gap between consecutive rows considered annual
const MIN_ANNUAL_GAP_DAYS: i64 = 300;
/// Window in which a row counts as "one year earlier"
const YEAR_AGO_MIN_DAYS: i64 = 300;
const YEAR_AGO_MAX_DAYS: i64 = 430;

/// Offset used when neither dates nor cadence labels are available
const LEGACY_YEAR_OFFSET: usize = 4;

/// A row that belongs to a reporting period.
pub trait Dated {
    fn report_date(&self) -> Option<NaiveDate>;

    fn cadence_label(&self) -> Option<PeriodCadence> {
        None
    }
}

impl Dated for IncomeStatement {
    fn report_date(&self) -> Option<NaiveDate> {
        self.report_period
    }

    fn cadence_label(&self) -> Option<PeriodCadence> {
        self.period
    }
}

impl Dated for BalanceSheet {
    fn report_date(&self) -> Option<NaiveDate> {
        self.report_period
    }

    fn cadence_label(&self) -> Option<PeriodCadence> {
        self.period
    }
}

impl Dated for CashFlowStatement {
    fn report_date(&self) -> Option<NaiveDate> {
        self.report_period
    }

    fn cadence_label(&self) -> Option<PeriodCadence> {
        self.period
    }
}

impl Dated for PriceBar {
    fn report_date(&self) -> Option<NaiveDate> {
        self.date
    }
}

/// Cadence of a most-recent-first list of rows.
pub fn detect_cadence<T: Dated>(rows: &[T]) -> PeriodCadence {
    if let Some(label) = rows.first().and_then(|r| r.cadence_label()) {
        if label != PeriodCadence::Unknown {
            return label;
        }
    }

    match (
        rows.first().and_then(|r| r.report_date()),
        rows.get(1).and_then(|r| r.report_date()),
    ) {
        (Some(latest), Some(previous)) => {
            let gap = (latest - previous).num_days().abs();
            if gap <= MAX_QUARTERLY_GAP_DAYS {
                PeriodCadence::Quarterly
            } else if gap >= MIN_ANNUAL_GAP_DAYS {
                PeriodCadence::Annual
            } else {
                PeriodCadence::Unknown
            }
        }
        _ => PeriodCadence::Unknown,
    }
}

/// Index of the row one year before the latest one.
///
/// With dated rows, picks the row 300-430 days older than the latest,
/// closest to 365; None when no such row exists. Undated rows use the
/// cadence offset (4 for quarterly, 1 for annual).
pub fn year_ago_index<T: Dated>(rows: &[T]) -> Option<usize> {
    if rows.len() < 2 {
        return None;
    }

    let latest = rows[0].report_date();
    let has_older_dates = rows[1..].iter().any(|r| r.report_date().is_some());

    if let (Some(latest), true) = (latest, has_older_dates) {
        return rows
            .iter()
            .enumerate()
            .skip(1)
            .filter_map(|(i, r)| {
                let days = (latest - r.report_date()?).num_days();
                (YEAR_AGO_MIN_DAYS..=YEAR_AGO_MAX_DAYS)
                    .contains(&days)
                    .then_some((i, (days - 365).abs()))
            })
            .min_by_key(|(_, distance)| *distance)
            .map(|(i, _)| i);
    }

    let offset = match detect_cadence(rows).periods_per_year() {
        Some(offset) => offset,
        None => {
            tracing::debug!(
                "No report dates or cadence labels; assuming quarterly rows for year-ago lookup"
            );
            LEGACY_YEAR_OFFSET
        }
    };

    (offset < rows.len()).then_some(offset)
}

/// True when every pair of dated rows runs newest to oldest.
/// Undated rows are ignored.
pub fn is_reverse_chronological<T: Dated>(rows: &[T]) -> bool {
    let dates: Vec<NaiveDate> = rows.iter().filter_map(|r| r.report_date()).collect();
    dates.windows(2).all(|w| w[0] >= w[1])
}
