//! Financial metrics over monetary observations.
//!
//! Every function here is pure: no I/O, no shared state. Edge cases are
//! encoded in the return value rather than raised:
//!
//! - [`evolution`] returns `None` when the baseline is zero.
//! - [`sold_ratio`] returns `0.0` when both values are zero.
//!
//! Amounts are integer minor units (cents), the same representation the store
//! uses. Percentages are `f64`.
//!
//! # Examples
//!
//! ```rust
//! use engine::metrics::{evolution, sold_ratio};
//!
//! assert_eq!(evolution(100.0, 150.0), Some(50.0));
//! assert_eq!(evolution(0.0, 150.0), None);
//! assert_eq!(sold_ratio(-100.0, 100.0), 200.0);
//! ```
use core::fmt;
use std::{collections::BTreeMap, str::FromStr};

use chrono::{Datelike, NaiveDate};

use crate::{EngineError, ResultEngine};

/// A calendar month, written `YYYY-MM`.
///
/// Ordering is chronological.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PeriodKey {
    year: i32,
    month: u32,
}

impl PeriodKey {
    /// Builds a key, validating `month` in `[1, 12]` and a four digit year.
    pub fn new(year: i32, month: u32) -> ResultEngine<Self> {
        if !(1..=12).contains(&month) {
            return Err(EngineError::InvalidPeriodKey(format!(
                "month must be in 1..=12, got {month}"
            )));
        }
        if !(0..=9999).contains(&year) {
            return Err(EngineError::InvalidPeriodKey(format!(
                "year must have four digits, got {year}"
            )));
        }
        Ok(Self { year, month })
    }

    /// The period containing `date`.
    pub fn of<D: Datelike>(date: &D) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    #[must_use]
    pub const fn year(self) -> i32 {
        self.year
    }

    #[must_use]
    pub const fn month(self) -> u32 {
        self.month
    }

    /// The calendar month before this one.
    #[must_use]
    pub const fn previous(self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// Short month name and year, e.g. `Jan 2024`.
    #[must_use]
    pub fn label(self) -> String {
        match NaiveDate::from_ymd_opt(self.year, self.month, 1) {
            Some(date) => date.format("%b %Y").to_string(),
            None => self.to_string(),
        }
    }
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for PeriodKey {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::InvalidPeriodKey(format!("expected YYYY-MM, got '{s}'"));

        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let all_digits = |part: &str, len: usize| {
            part.len() == len && part.bytes().all(|b| b.is_ascii_digit())
        };
        if !all_digits(year, 4) || !all_digits(month, 2) {
            return Err(invalid());
        }

        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month)
    }
}

/// A monetary amount, optionally tagged with the period it belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Observation {
    pub amount_minor: i64,
    pub period: Option<PeriodKey>,
}

impl Observation {
    #[must_use]
    pub const fn new(amount_minor: i64, period: Option<PeriodKey>) -> Self {
        Self {
            amount_minor,
            period,
        }
    }

    /// An observation not tied to any calendar period.
    #[must_use]
    pub const fn untagged(amount_minor: i64) -> Self {
        Self::new(amount_minor, None)
    }
}

/// Totals of one period compared with the calendar month before it.
#[derive(Clone, Debug, PartialEq)]
pub struct PeriodSummary {
    pub period: PeriodKey,
    pub label: String,
    pub total_minor: i64,
    pub previous_total_minor: i64,
    pub evolution: Option<f64>,
    pub sold_ratio: f64,
}

/// Narrows an `i128` total to `i64`, saturating at the bounds.
fn saturate(sum: i128) -> i64 {
    i64::try_from(sum).unwrap_or(if sum < 0 { i64::MIN } else { i64::MAX })
}

/// Sums in `i128` so totals never overflow, then saturates to `i64`.
fn saturating_sum(amounts: impl Iterator<Item = i64>) -> i64 {
    saturate(amounts.map(i128::from).sum())
}

/// Sum of all amounts. Does not filter by period.
///
/// Saturates at `i64::MIN` / `i64::MAX` instead of overflowing.
#[must_use]
pub fn total(observations: &[Observation]) -> i64 {
    saturating_sum(observations.iter().map(|obs| obs.amount_minor))
}

/// Sum of the amounts tagged with `period`. Untagged observations never match.
#[must_use]
pub fn total_for_period(observations: &[Observation], period: PeriodKey) -> i64 {
    saturating_sum(
        observations
            .iter()
            .filter(|obs| obs.period == Some(period))
            .map(|obs| obs.amount_minor),
    )
}

/// Per-month totals in chronological order. Untagged observations are skipped.
#[must_use]
pub fn monthly_totals(observations: &[Observation]) -> BTreeMap<PeriodKey, i64> {
    observations
        .iter()
        .filter_map(|obs| obs.period.map(|period| (period, obs.amount_minor)))
        .fold(BTreeMap::new(), |mut acc: BTreeMap<PeriodKey, i128>, (period, amount)| {
            *acc.entry(period).or_insert(0) += i128::from(amount);
            acc
        })
        .into_iter()
        .map(|(period, sum)| (period, saturate(sum)))
        .collect()
}

/// Signed percentage change from `previous` to `current`.
///
/// Returns `None` when `previous` is zero: relative change against a zero
/// baseline is undefined. The result is not bounded, see [`sold_ratio`] for a
/// bounded variant.
#[must_use]
pub fn evolution(previous: f64, current: f64) -> Option<f64> {
    if previous == 0.0 {
        return None;
    }
    Some((current - previous) / previous * 100.0)
}

/// Symmetric percentage change, bounded to `[-200, 200]`.
///
/// The difference is divided by `|current| + |previous|`, so either side may
/// be zero or negative. Both zero yields `0.0`.
#[must_use]
pub fn sold_ratio(previous: f64, current: f64) -> f64 {
    let mut denom = current.abs() + previous.abs();
    if denom == 0.0 || denom.is_nan() {
        return 0.0;
    }
    let (mut previous, mut current) = (previous, current);
    if denom.is_infinite() {
        // Large finite inputs overflow the sum; the ratio is scale invariant.
        let scale = current.abs().max(previous.abs());
        (previous, current) = (previous / scale, current / scale);
        denom = current.abs() + previous.abs();
    }

    let ratio = ((current - previous) / denom).clamp(-1.0, 1.0);
    ratio * 200.0
}

/// Formats a `YYYY-MM` key as a short label, e.g. `"2024-01"` gives `"Jan 2024"`.
pub fn format_month(key: &str) -> ResultEngine<String> {
    key.parse::<PeriodKey>().map(PeriodKey::label)
}

/// Summarizes `period` against the month before it.
#[must_use]
pub fn period_summary(observations: &[Observation], period: PeriodKey) -> PeriodSummary {
    let total_minor = total_for_period(observations, period);
    let previous_total_minor = total_for_period(observations, period.previous());
    let (previous, current) = (previous_total_minor as f64, total_minor as f64);

    PeriodSummary {
        period,
        label: period.label(),
        total_minor,
        previous_total_minor,
        evolution: evolution(previous, current),
        sold_ratio: sold_ratio(previous, current),
    }
}
