//! # Temporal Arithmetic
//!
//! UTC-only calendar arithmetic for the doctoral stack. Doctorate duration
//! is measured in whole calendar months; regulatory thresholds (the
//! 36-month dérogation ceiling, the eligibility duration bound) compare
//! against the value computed here, so the month-boundary semantics live in
//! exactly one function.

use chrono::{DateTime, Datelike, Utc};

/// Whole calendar months elapsed between two UTC instants, saturating at
/// zero when `to` precedes `from`.
///
/// A month is counted once the same day-of-month is reached: from
/// January 15th, March 14th is one month and March 15th is two. This is the
/// convention enrollment offices apply when measuring doctorate duration
/// against the 36-month ceiling — a doctorate begun on 2022-10-01 reaches
/// 36 months on 2025-10-01, not during September.
pub fn elapsed_months(from: DateTime<Utc>, to: DateTime<Utc>) -> u32 {
    if to <= from {
        return 0;
    }
    let years = to.year() - from.year();
    let months = years * 12 + (to.month() as i32 - from.month() as i32);
    let full = if to.day() < from.day() {
        months - 1
    } else {
        months
    };
    full.max(0) as u32
}
