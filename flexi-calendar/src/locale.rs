//! Locale-aware month and weekday labels.
//!
//! ## Usage
//!
//! Produce the header and column labels of a calendar in the user's locale.
use std::borrow::Cow;

use chrono::{
    DateTime, Locale, NaiveTime, TimeZone, Utc, Weekday,
    format::{Item, StrftimeItems},
};
use tracing::{debug, warn};

use crate::date::CalendarDate;

/// Locale used when a tag is unknown or set to `"default"`.
pub const FALLBACK_LOCALE: Locale = Locale::en_US;

/// Default month label pattern: full month name and numeric year.
pub const DEFAULT_MONTH_LABEL_PATTERN: &str = "%B %Y";

/// Pattern for the long, accessible label of a single day.
pub const FULL_DATE_PATTERN: &str = "%A, %B %-d, %Y";

/// Width of a rendered weekday name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WeekdayStyle {
    /// A single letter.
    Narrow,
    /// Abbreviated name.
    #[default]
    Short,
    /// Full name.
    Long,
}

/// Overrides for weekday label formatting.
///
/// A `style` override applies to both the short and long label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WeekdayFormatOptions {
    /// Style forced onto both labels, when set.
    pub style: Option<WeekdayStyle>,
}

/// Formatting options for the month header label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthLabelOptions {
    /// A strftime pattern, formatted in the calendar locale.
    pub pattern: Cow<'static, str>,
}

impl MonthLabelOptions {
    /// Creates options with a custom strftime pattern.
    pub fn new(pattern: impl Into<Cow<'static, str>>) -> Self {
        Self {
            pattern: pattern.into(),
        }
    }
}

impl Default for MonthLabelOptions {
    fn default() -> Self {
        Self::new(DEFAULT_MONTH_LABEL_PATTERN)
    }
}

/// Short and long names of one weekday column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekdayLabel {
    /// Name shown in the column header.
    pub short: String,
    /// Full name, suitable for a tooltip or accessible label.
    pub long: String,
}

/// Resolves a BCP 47 style tag (`en-US`, `fr_FR`, `de`) to a locale.
///
/// Unknown tags fall back to [`FALLBACK_LOCALE`].
pub fn resolve_locale(tag: &str) -> Locale {
    let normalized = tag.trim().replace('-', "_");
    if normalized.is_empty() || normalized.eq_ignore_ascii_case("default") {
        return FALLBACK_LOCALE;
    }
    if let Ok(locale) = Locale::try_from(normalized.as_str()) {
        return locale;
    }
    if !normalized.contains('_') {
        let regional = format!(
            "{}_{}",
            normalized.to_ascii_lowercase(),
            normalized.to_ascii_uppercase()
        );
        if let Ok(locale) = Locale::try_from(regional.as_str()) {
            return locale;
        }
    }
    debug!("unknown locale `{tag}`, falling back to {FALLBACK_LOCALE:?}");
    FALLBACK_LOCALE
}

fn midnight_utc(date: CalendarDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.naive().and_time(NaiveTime::MIN))
}

fn is_valid_pattern(pattern: &str) -> bool {
    !StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error))
}

fn format_with(date: CalendarDate, locale: Locale, pattern: &str) -> String {
    midnight_utc(date).format_localized(pattern, locale).to_string()
}

/// Formats the month header label, e.g. `March 2024`.
///
/// An invalid pattern falls back to [`DEFAULT_MONTH_LABEL_PATTERN`].
pub fn format_month_label(date: CalendarDate, locale: &str, options: &MonthLabelOptions) -> String {
    let locale = resolve_locale(locale);
    let pattern = if is_valid_pattern(&options.pattern) {
        options.pattern.as_ref()
    } else {
        warn!(
            "invalid month label pattern `{}`, using default",
            options.pattern
        );
        DEFAULT_MONTH_LABEL_PATTERN
    };
    format_with(date, locale, pattern)
}

/// Formats the full label of a day, e.g. `Friday, March 15, 2024`.
pub fn format_full_date(date: CalendarDate, locale: &str) -> String {
    format_with(date, resolve_locale(locale), FULL_DATE_PATTERN)
}

fn format_weekday(date: CalendarDate, locale: Locale, style: WeekdayStyle) -> String {
    match style {
        WeekdayStyle::Long => format_with(date, locale, "%A"),
        WeekdayStyle::Short => format_with(date, locale, "%a"),
        WeekdayStyle::Narrow => format_with(date, locale, "%A").chars().take(1).collect(),
    }
}

/// Returns the seven weekday labels in display order, starting at
/// `week_starts_on`.
///
/// Labels come from a fixed reference week (2020-02-02 was a Sunday), so
/// the result never depends on the locale's own first day of the week.
pub fn get_weekday_labels(
    locale: &str,
    week_starts_on: Weekday,
    options: &WeekdayFormatOptions,
) -> Vec<WeekdayLabel> {
    let locale = resolve_locale(locale);
    let short_style = options.style.unwrap_or(WeekdayStyle::Short);
    let long_style = options.style.unwrap_or(WeekdayStyle::Long);
    let Some(reference_sunday) = CalendarDate::new(2020, 2, 2) else {
        return Vec::new();
    };
    (0..7)
        .filter_map(|index| {
            let day = (week_starts_on.num_days_from_sunday() + index) % 7;
            reference_sunday.shift_days(i64::from(day))
        })
        .map(|date| WeekdayLabel {
            short: format_weekday(date, locale, short_style),
            long: format_weekday(date, locale, long_style),
        })
        .collect()
}
