// Date utility functions
// Calendar unit boundaries computed against an explicit locale context

use chrono::{
    DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone,
    Weekday,
};

use crate::models::locale::LocaleContext;

/// A timezone-adjusted point in time.
pub type Instant = DateTime<FixedOffset>;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Naive formats accepted for string timestamps, tried after RFC 3339.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Calendar unit used to derive period boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeUnit {
    Day,
    Week,
    Month,
    Year,
}

pub fn is_same_day(date1: Instant, date2: Instant) -> bool {
    date1.date_naive() == date2.with_timezone(date1.offset()).date_naive()
}

/// Attach an offset to a wall-clock time.
pub fn localize(naive: NaiveDateTime, offset: FixedOffset) -> Instant {
    let utc = naive - Duration::seconds(i64::from(offset.local_minus_utc()));
    DateTime::from_naive_utc_and_offset(utc, offset)
}

/// Midnight at the start of `date` in the given offset.
pub fn at_midnight(date: NaiveDate, offset: FixedOffset) -> Instant {
    localize(date.and_time(NaiveTime::default()), offset)
}

pub fn start_of_day(date: Instant) -> Instant {
    at_midnight(date.date_naive(), *date.offset())
}

/// Last millisecond of the day (`23:59:59.999`).
pub fn end_of_day(date: Instant) -> Instant {
    let next = date.date_naive() + Duration::days(1);
    at_midnight(next, *date.offset()) - Duration::milliseconds(1)
}

/// Calculate the start of the week containing the given date.
pub fn week_start(date: NaiveDate, first_day_of_week: Weekday) -> NaiveDate {
    let weekday = i64::from(date.weekday().num_days_from_sunday());
    let first = i64::from(first_day_of_week.num_days_from_sunday());
    let offset = (weekday - first + 7) % 7;
    date - Duration::days(offset)
}

/// Start of the `unit` containing `date`, evaluated in the locale's offset.
pub fn start_of(date: Instant, unit: TimeUnit, locale: &LocaleContext) -> Instant {
    let local = date.with_timezone(&locale.offset).date_naive();
    let first = match unit {
        TimeUnit::Day => local,
        TimeUnit::Week => week_start(local, locale.first_day_of_week),
        TimeUnit::Month => first_of_month(local),
        TimeUnit::Year => NaiveDate::from_ymd_opt(local.year(), 1, 1).expect("January 1st exists"),
    };
    at_midnight(first, locale.offset)
}

/// Last millisecond of the `unit` containing `date`.
pub fn end_of(date: Instant, unit: TimeUnit, locale: &LocaleContext) -> Instant {
    let first = start_of(date, unit, locale).date_naive();
    let next = match unit {
        TimeUnit::Day => first + Duration::days(1),
        TimeUnit::Week => first + Duration::days(7),
        TimeUnit::Month => shift_months(first, 1),
        TimeUnit::Year => shift_months(first, 12),
    };
    at_midnight(next, locale.offset) - Duration::milliseconds(1)
}

/// Arithmetic mean of two instants.
pub fn middle(from: Instant, to: Instant) -> Instant {
    from + (to - from) / 2
}

/// Canonical `YYYY-MM-DD` key for a calendar cell.
pub fn day_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn from_epoch_millis(millis: i64, offset: FixedOffset) -> Option<Instant> {
    offset.timestamp_millis_opt(millis).single()
}

/// Parse a timestamp string: RFC 3339 first, then naive ISO-like formats
/// interpreted in `offset`, then a bare date at midnight.
pub fn parse_instant(value: &str, offset: FixedOffset) -> Option<Instant> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&offset));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| localize(naive, offset))
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .map(|date| at_midnight(date, offset))
        })
}

/// Number of calendar days touched by `[start, end]`, counting partial days
/// fully. Never less than one, so inverted intervals collapse to the start day.
pub fn span_days(start: Instant, end: Instant) -> i64 {
    let end = end.with_timezone(start.offset());
    let millis = (end_of_day(end) - start_of_day(start)).num_milliseconds();
    let days = (millis as f64 / MILLIS_PER_DAY).ceil() as i64;
    days.max(1)
}

/// Move by whole months, keeping the day of month where the target month allows it.
pub fn shift_months(current: NaiveDate, delta_months: i32) -> NaiveDate {
    let total_months = (current.year() * 12) + (current.month() as i32 - 1) + delta_months;
    let new_year = total_months.div_euclid(12);
    let new_month = total_months.rem_euclid(12) + 1;
    clamp_day(new_year, new_month as u32, current.day())
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).expect("every month has a first day")
}

fn clamp_day(year: i32, month: u32, desired_day: u32) -> NaiveDate {
    let max_day = last_day_of_month(year, month);
    let day = desired_day.min(max_day);
    NaiveDate::from_ymd_opt(year, month, day)
        .or_else(|| NaiveDate::from_ymd_opt(year, month, max_day))
        .expect("valid calendar date")
}

fn last_day_of_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let first_of_next =
        NaiveDate::from_ymd_opt(next_year, next_month, 1).expect("valid next month");
    first_of_next.pred_opt().expect("previous day exists").day()
}
