//! Calendar dates, canonical keys and the date-like input conversions.
//!
//! ## Usage
//!
//! Normalize loosely-typed inputs (dates, strings, millisecond timestamps)
//! into [`CalendarDate`] values and compare, shift or key them.
use std::{fmt, str::FromStr};

use chrono::{DateTime, Datelike, Days, Local, NaiveDate, NaiveDateTime, TimeZone, Weekday};
use thiserror::Error;
use tracing::trace;

const NAIVE_DATE_TIME_PATTERNS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const LOOSE_DATE_PATTERNS: [&str; 2] = ["%Y/%m/%d", "%m/%d/%Y"];

/// Errors produced while turning text or numbers into a [`CalendarDate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateParseError {
    /// The input was empty or only whitespace.
    #[error("date input is empty")]
    Empty,
    /// No supported date format matched the input.
    #[error("unrecognized date input `{0}`")]
    Unrecognized(String),
    /// The timestamp cannot be represented as a local date.
    #[error("timestamp {0} ms is out of range")]
    TimestampOutOfRange(i64),
}

/// Errors produced while parsing a [`DateKey`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateKeyError {
    /// The key is not shaped like `YYYY-MM-DD`.
    #[error("date key `{0}` is not in YYYY-MM-DD form")]
    Malformed(String),
    /// The key is well formed but names a day that does not exist.
    #[error("date key `{0}` names a nonexistent day")]
    InvalidDay(String),
}

/// A date with its time of day normalized away.
///
/// Equality and ordering only consider year, month and day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    /// Creates a calendar date if the values are valid (month 1-12).
    pub fn new(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Wraps a `chrono` date.
    pub fn from_naive(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Returns the underlying `chrono` date.
    pub fn naive(&self) -> NaiveDate {
        self.0
    }

    /// Returns the current local date.
    pub fn today() -> Self {
        Self(Local::now().date_naive())
    }

    /// Returns the year.
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Returns the month (1-12).
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Returns the zero-based month (0-11).
    pub fn month0(&self) -> u32 {
        self.0.month0()
    }

    /// Returns the day of the month (1-31).
    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// Returns the day of the week.
    pub fn weekday(&self) -> Weekday {
        self.0.weekday()
    }

    /// Returns the canonical `YYYY-MM-DD` key.
    pub fn key(&self) -> DateKey {
        DateKey::from(*self)
    }

    /// Returns the first day of this date's month.
    pub fn start_of_month(&self) -> Self {
        // Day 1 exists in every month, so `with_day` cannot fail here.
        Self(self.0.with_day(1).unwrap_or(self.0))
    }

    /// Returns true when both dates fall in the same month of the same year.
    pub fn is_same_month(&self, other: CalendarDate) -> bool {
        self.year() == other.year() && self.month() == other.month()
    }

    /// Adds (or subtracts) whole calendar days.
    pub fn shift_days(&self, offset: i64) -> Option<Self> {
        let days = Days::new(offset.unsigned_abs());
        let shifted = if offset >= 0 {
            self.0.checked_add_days(days)
        } else {
            self.0.checked_sub_days(days)
        };
        shifted.map(Self)
    }

    /// Returns the first day of the month `count` months away.
    pub fn add_months(&self, count: i32) -> Option<Self> {
        let (year, month) = roll_month(self.year(), i64::from(self.month0()) + i64::from(count))?;
        Self::new(year, month, 1)
    }

    /// Moves by `count` months keeping the day of month, letting days past
    /// the end of the target month spill into the month after it.
    ///
    /// January 31 plus one month is March 2 (or March 3 in a common year).
    pub fn add_months_overflowing(&self, count: i32) -> Option<Self> {
        let first = self.add_months(count)?;
        first.shift_days(i64::from(self.day()) - 1)
    }
}

impl From<NaiveDate> for CalendarDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_key(f, self.year(), self.month(), self.day())
    }
}

/// Converts a zero-based month index relative to `year` into a valid
/// `(year, month)` pair with the month 1-12.
pub(crate) fn roll_month(year: i32, month0: i64) -> Option<(i32, u32)> {
    let total = i64::from(year) * 12 + month0;
    let year = i32::try_from(total.div_euclid(12)).ok()?;
    let month = u32::try_from(total.rem_euclid(12) + 1).ok()?;
    Some((year, month))
}

fn write_key(f: &mut impl fmt::Write, year: i32, month: u32, day: u32) -> fmt::Result {
    write!(f, "{year:04}-{month:02}-{day:02}")
}

/// Canonical `YYYY-MM-DD` identity of a [`CalendarDate`].
///
/// Used as the lookup key for disabled and highlighted dates.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateKey(String);

impl DateKey {
    /// Returns the key text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parses the key back into the date it names.
    pub fn to_date(&self) -> Result<CalendarDate, DateKeyError> {
        parse_key(&self.0)
    }
}

impl From<CalendarDate> for DateKey {
    fn from(date: CalendarDate) -> Self {
        let mut key = String::with_capacity(10);
        // Writing into a String never fails.
        let _ = write_key(&mut key, date.year(), date.month(), date.day());
        Self(key)
    }
}

impl FromStr for DateKey {
    type Err = DateKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_key(s).map(DateKey::from)
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DateKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn parse_key(key: &str) -> Result<CalendarDate, DateKeyError> {
    let malformed = || DateKeyError::Malformed(key.to_string());
    // Split from the right so a negative year keeps its sign.
    let mut parts = key.rsplitn(3, '-');
    let day = parts.next().ok_or_else(malformed)?;
    let month = parts.next().ok_or_else(malformed)?;
    let year = parts.next().ok_or_else(malformed)?;
    if day.len() != 2 || month.len() != 2 || year.len() < 4 {
        return Err(malformed());
    }
    let year: i32 = year.parse().map_err(|_| malformed())?;
    let month: u32 = month.parse().map_err(|_| malformed())?;
    let day: u32 = day.parse().map_err(|_| malformed())?;
    CalendarDate::new(year, month, day).ok_or_else(|| DateKeyError::InvalidDay(key.to_string()))
}

/// A value that may resolve to a calendar date.
///
/// Implemented for concrete dates, `chrono` values, strings, millisecond
/// timestamps and `Option`s of those. Resolution never mutates the input.
pub trait DateLike {
    /// Resolves the value to a local calendar date, if possible.
    fn to_calendar_date(&self) -> Option<CalendarDate>;
}

impl DateLike for CalendarDate {
    fn to_calendar_date(&self) -> Option<CalendarDate> {
        Some(*self)
    }
}

impl DateLike for NaiveDate {
    fn to_calendar_date(&self) -> Option<CalendarDate> {
        Some(CalendarDate(*self))
    }
}

impl DateLike for NaiveDateTime {
    fn to_calendar_date(&self) -> Option<CalendarDate> {
        Some(CalendarDate(self.date()))
    }
}

impl<Tz: TimeZone> DateLike for DateTime<Tz> {
    fn to_calendar_date(&self) -> Option<CalendarDate> {
        Some(CalendarDate(self.with_timezone(&Local).date_naive()))
    }
}

impl DateLike for str {
    fn to_calendar_date(&self) -> Option<CalendarDate> {
        parse_date_str(self)
            .inspect_err(|err| trace!("ignoring date input: {err}"))
            .ok()
    }
}

impl DateLike for String {
    fn to_calendar_date(&self) -> Option<CalendarDate> {
        self.as_str().to_calendar_date()
    }
}

impl DateLike for i64 {
    fn to_calendar_date(&self) -> Option<CalendarDate> {
        date_from_timestamp_millis(*self)
            .inspect_err(|err| trace!("ignoring date input: {err}"))
            .ok()
    }
}

impl<T: DateLike> DateLike for Option<T> {
    fn to_calendar_date(&self) -> Option<CalendarDate> {
        self.as_ref().and_then(DateLike::to_calendar_date)
    }
}

impl<T: DateLike + ?Sized> DateLike for &T {
    fn to_calendar_date(&self) -> Option<CalendarDate> {
        (**self).to_calendar_date()
    }
}

/// An owned date-like value, as accepted by calendar configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateInput {
    /// An already normalized date.
    Date(CalendarDate),
    /// Text in one of the formats accepted by [`parse_date_str`].
    Text(String),
    /// Milliseconds since the Unix epoch.
    Timestamp(i64),
}

impl DateLike for DateInput {
    fn to_calendar_date(&self) -> Option<CalendarDate> {
        match self {
            DateInput::Date(date) => Some(*date),
            DateInput::Text(text) => text.to_calendar_date(),
            DateInput::Timestamp(millis) => millis.to_calendar_date(),
        }
    }
}

impl From<CalendarDate> for DateInput {
    fn from(date: CalendarDate) -> Self {
        DateInput::Date(date)
    }
}

impl From<NaiveDate> for DateInput {
    fn from(date: NaiveDate) -> Self {
        DateInput::Date(CalendarDate(date))
    }
}

impl From<NaiveDateTime> for DateInput {
    fn from(date_time: NaiveDateTime) -> Self {
        DateInput::Date(CalendarDate(date_time.date()))
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for DateInput {
    fn from(date_time: DateTime<Tz>) -> Self {
        DateInput::Date(CalendarDate(date_time.with_timezone(&Local).date_naive()))
    }
}

impl From<&str> for DateInput {
    fn from(text: &str) -> Self {
        DateInput::Text(text.to_string())
    }
}

impl From<String> for DateInput {
    fn from(text: String) -> Self {
        DateInput::Text(text)
    }
}

impl From<i64> for DateInput {
    fn from(millis: i64) -> Self {
        DateInput::Timestamp(millis)
    }
}

/// Parses date text into a local calendar date.
///
/// Plain `YYYY-MM-DD` text names a local calendar day. Text carrying an
/// offset (RFC 3339, RFC 2822) is converted to the local day of that instant.
pub fn parse_date_str(input: &str) -> Result<CalendarDate, DateParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(DateParseError::Empty);
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(CalendarDate(date));
    }
    if let Ok(date_time) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(CalendarDate(date_time.with_timezone(&Local).date_naive()));
    }
    for pattern in NAIVE_DATE_TIME_PATTERNS {
        if let Ok(date_time) = NaiveDateTime::parse_from_str(trimmed, pattern) {
            return Ok(CalendarDate(date_time.date()));
        }
    }
    for pattern in LOOSE_DATE_PATTERNS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, pattern) {
            return Ok(CalendarDate(date));
        }
    }
    if let Ok(date_time) = DateTime::parse_from_rfc2822(trimmed) {
        return Ok(CalendarDate(date_time.with_timezone(&Local).date_naive()));
    }
    Err(DateParseError::Unrecognized(trimmed.to_string()))
}

/// Resolves a millisecond Unix timestamp to its local calendar date.
pub fn date_from_timestamp_millis(millis: i64) -> Result<CalendarDate, DateParseError> {
    Local
        .timestamp_millis_opt(millis)
        .single()
        .map(|date_time| CalendarDate(date_time.date_naive()))
        .ok_or(DateParseError::TimestampOutOfRange(millis))
}

/// Returns the current local date.
pub fn today() -> CalendarDate {
    CalendarDate::today()
}

/// Normalizes a date-like value to a calendar date, or `None` when it
/// cannot be resolved.
pub fn normalize_date<D: DateLike + ?Sized>(value: &D) -> Option<CalendarDate> {
    value.to_calendar_date()
}

/// Returns the first day of the value's month.
pub fn start_of_month<D: DateLike + ?Sized>(value: &D) -> Option<CalendarDate> {
    normalize_date(value).map(|date| date.start_of_month())
}

/// Returns the `YYYY-MM-DD` key of a date-like value.
pub fn date_key<D: DateLike + ?Sized>(value: &D) -> Option<DateKey> {
    normalize_date(value).map(DateKey::from)
}

/// True when both dates are present and name the same day.
pub fn is_same_day(a: impl Into<Option<CalendarDate>>, b: impl Into<Option<CalendarDate>>) -> bool {
    matches!((a.into(), b.into()), (Some(a), Some(b)) if a == b)
}

/// True when both dates are present and `a` is strictly earlier.
pub fn is_before(a: impl Into<Option<CalendarDate>>, b: impl Into<Option<CalendarDate>>) -> bool {
    matches!((a.into(), b.into()), (Some(a), Some(b)) if a < b)
}

/// True when both dates are present and `a` is strictly later.
pub fn is_after(a: impl Into<Option<CalendarDate>>, b: impl Into<Option<CalendarDate>>) -> bool {
    matches!((a.into(), b.into()), (Some(a), Some(b)) if a > b)
}

/// Adds `offset_days` calendar days to a date-like value.
pub fn shift_date<D: DateLike + ?Sized>(value: &D, offset_days: i64) -> Option<CalendarDate> {
    normalize_date(value)?.shift_days(offset_days)
}

/// Returns the start of the month `count` months after the value's month.
pub fn add_months<D: DateLike + ?Sized>(value: &D, count: i32) -> Option<CalendarDate> {
    normalize_date(value)?.add_months(count)
}

/// Inclusive range check. Absent bounds do not constrain; an unresolvable
/// date is never within range.
pub fn is_within_range<D: DateLike + ?Sized>(
    value: &D,
    min: Option<CalendarDate>,
    max: Option<CalendarDate>,
) -> bool {
    let Some(date) = normalize_date(value) else {
        return false;
    };
    !is_before(date, min) && !is_after(date, max)
}

/// Clamps a date-like value into `[min, max]`.
pub fn clamp_date_to_range<D: DateLike + ?Sized>(
    value: &D,
    min: Option<CalendarDate>,
    max: Option<CalendarDate>,
) -> Option<CalendarDate> {
    let date = normalize_date(value)?;
    match (min, max) {
        (Some(min), _) if date < min => Some(min),
        (_, Some(max)) if date > max => Some(max),
        _ => Some(date),
    }
}
