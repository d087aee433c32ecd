//! Calendar-day arithmetic that ignores time-of-day and zone suffixes.
//!
//! Every function here degrades to a safe default (0 days, not expired) on
//! malformed input instead of failing.

use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveTime, Utc};

/// Hour (UTC) at which an option is treated as expired on its expiry date.
/// 20:00 UTC is 4:00 PM US Eastern during daylight time.
pub const MARKET_CLOSE_HOUR_UTC: u32 = 20;

/// Source of "now" for computations on still-open positions.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Local calendar date used as the end of an open holding period.
    fn today(&self) -> NaiveDate;
}

/// Wall clock; `today` follows the process's local calendar.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Frozen clock for tests and replays.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now: DateTime<Utc>,
    today: NaiveDate,
}

impl FixedClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        FixedClock {
            now,
            today: now.date_naive(),
        }
    }

    /// Clock frozen at midnight UTC of `today`.
    pub fn on(today: NaiveDate) -> Self {
        FixedClock {
            now: today.and_time(NaiveTime::MIN).and_utc(),
            today,
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn today(&self) -> NaiveDate {
        self.today
    }
}

/// Parse the calendar date of a `YYYY-MM-DD` string or ISO timestamp.
///
/// Only the leading date is read; the clock time and any zone suffix are
/// ignored so `2024-03-15T23:30:00-05:00` is still March 15th.
pub fn parse_calendar_date(input: &str) -> Option<NaiveDate> {
    let trimmed = input.trim();
    let date_part = trimmed.get(..10)?;
    let rest = &trimmed[10..];
    if !(rest.is_empty() || rest.starts_with('T') || rest.starts_with(' ')) {
        return None;
    }
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// Whole calendar days between open and close (or `today` while open),
/// clamped at zero. Unparseable input yields 0.
pub fn days_held(open: &str, close: Option<&str>, today: NaiveDate) -> i64 {
    let Some(open) = parse_calendar_date(open) else {
        return 0;
    };
    let close = match close.map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => match parse_calendar_date(raw) {
            Some(date) => date,
            None => return 0,
        },
        None => today,
    };
    (close - open).num_days().max(0)
}

/// Whole calendar days from `today` until expiry, clamped at zero.
pub fn days_to_expiry(expiry: &str, today: NaiveDate) -> i64 {
    parse_calendar_date(expiry)
        .map(|expiry| (expiry - today).num_days().max(0))
        .unwrap_or(0)
}

/// True once market close (20:00 UTC) on the expiry date has passed.
pub fn is_expired(expiry: &str, now: DateTime<Utc>) -> bool {
    let Some(expiry) = parse_calendar_date(expiry) else {
        return false;
    };
    match expiry.and_hms_opt(MARKET_CLOSE_HOUR_UTC, 0, 0) {
        Some(close) => now >= close.and_utc(),
        None => false,
    }
}

/// Number of days in the calendar month containing `date`.
pub fn days_in_month(date: NaiveDate) -> i64 {
    let first = date.with_day(1).unwrap_or(date);
    let next_month = if first.month() == 12 {
        NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
    };
    next_month
        .map(|next| (next - first).num_days())
        .unwrap_or(30)
}
