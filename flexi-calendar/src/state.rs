//! The displayed-month engine: anchor, navigation and derived grid data.
//!
//! ## Usage
//!
//! Owns which month is on screen and everything derived from it. Focus and
//! selection live in [`crate::focus`].
use chrono::Weekday;
use tracing::{debug, warn};

use crate::{
    args::CalendarArgs,
    date::{
        CalendarDate, DateInput, DateLike, clamp_date_to_range, is_within_range, normalize_date,
        roll_month,
    },
    grid::{MonthMatrix, generate_month_matrix},
    locale::{
        MonthLabelOptions, WeekdayFormatOptions, WeekdayLabel, format_month_label,
        get_weekday_labels,
    },
    marks::{DisabledSet, HighlightInput, HighlightedMap, build_date_set, build_highlighted_map},
    prop::CallbackWith,
};

/// Month navigation state and its derived data.
#[derive(Debug, Clone)]
pub struct CalendarState {
    anchor: CalendarDate,
    matrix: MonthMatrix,
    min_date: Option<CalendarDate>,
    max_date: Option<CalendarDate>,
    disabled_set: DisabledSet,
    highlighted_map: HighlightedMap,
    locale: String,
    week_starts_on: Weekday,
    month_label_options: MonthLabelOptions,
    weekday_format_options: WeekdayFormatOptions,
    on_month_change: Option<CallbackWith<CalendarDate>>,
}

impl CalendarState {
    /// Creates the engine from calendar configuration.
    ///
    /// The anchor is the month of `initial_date` (today when absent), clamped
    /// into the configured range. The month-change observer is called once
    /// with this initial anchor.
    pub fn new(args: &CalendarArgs) -> Self {
        let min_date = args.min_date.as_ref().and_then(DateLike::to_calendar_date);
        let max_date = args.max_date.as_ref().and_then(DateLike::to_calendar_date);
        let initial = args
            .initial_date
            .as_ref()
            .and_then(DateLike::to_calendar_date)
            .unwrap_or_else(CalendarDate::today);
        let anchor = clamp_to_month(initial, min_date, max_date);
        let (anchor, matrix) = month_layout(anchor, args.week_starts_on)
            .or_else(|| {
                warn!("month of {anchor} cannot be laid out, starting on the current month");
                month_layout(CalendarDate::today().start_of_month(), args.week_starts_on)
            })
            .unwrap_or_else(|| (CalendarDate::default(), MonthMatrix::default()));
        debug!("calendar anchored on {anchor}");

        let state = Self {
            anchor,
            matrix,
            min_date,
            max_date,
            disabled_set: build_date_set(&args.disabled_dates),
            highlighted_map: build_highlighted_map(args.highlighted_dates.iter().cloned()),
            locale: args.locale.clone(),
            week_starts_on: args.week_starts_on,
            month_label_options: args.month_label_options.clone(),
            weekday_format_options: args.weekday_format_options,
            on_month_change: args.on_month_change.clone(),
        };
        if let Some(on_month_change) = &state.on_month_change {
            on_month_change.call(state.anchor);
        }
        state
    }

    /// Returns the first day of the displayed month.
    pub fn anchor(&self) -> CalendarDate {
        self.anchor
    }

    /// Returns the displayed year.
    pub fn active_year(&self) -> i32 {
        self.anchor.year()
    }

    /// Returns the displayed month (1-12).
    pub fn active_month(&self) -> u32 {
        self.anchor.month()
    }

    /// Returns the 6 × 7 grid of the displayed month.
    pub fn weeks(&self) -> &MonthMatrix {
        &self.matrix
    }

    /// Returns the localized label of the displayed month.
    pub fn month_label(&self) -> String {
        format_month_label(self.anchor, &self.locale, &self.month_label_options)
    }

    /// Returns the weekday column labels in display order.
    pub fn weekday_labels(&self) -> Vec<WeekdayLabel> {
        get_weekday_labels(&self.locale, self.week_starts_on, &self.weekday_format_options)
    }

    /// Returns the disabled dates.
    pub fn disabled_set(&self) -> &DisabledSet {
        &self.disabled_set
    }

    /// Returns the highlighted dates.
    pub fn highlighted_map(&self) -> &HighlightedMap {
        &self.highlighted_map
    }

    /// Returns the lower bound of the selectable range.
    pub fn normalized_min_date(&self) -> Option<CalendarDate> {
        self.min_date
    }

    /// Returns the upper bound of the selectable range.
    pub fn normalized_max_date(&self) -> Option<CalendarDate> {
        self.max_date
    }

    /// Returns the locale tag.
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Returns the first weekday of every grid row.
    pub fn week_starts_on(&self) -> Weekday {
        self.week_starts_on
    }

    /// True when the date is outside the selectable range or disabled.
    pub fn is_date_disabled(&self, date: CalendarDate) -> bool {
        !is_within_range(&date, self.min_date, self.max_date) || self.disabled_set.contains(date)
    }

    /// Like [`CalendarState::is_date_disabled`] for any date-like value;
    /// unparseable values count as disabled.
    pub fn is_value_disabled<D: DateLike + ?Sized>(&self, value: &D) -> bool {
        normalize_date(value).is_none_or(|date| self.is_date_disabled(date))
    }

    /// True when the date belongs to the displayed month.
    pub fn is_in_active_month(&self, date: CalendarDate) -> bool {
        self.anchor.is_same_month(date)
    }

    /// Shows the next month.
    pub fn go_to_next_month(&mut self) {
        self.shift_anchor(1);
    }

    /// Shows the previous month.
    pub fn go_to_previous_month(&mut self) {
        self.shift_anchor(-1);
    }

    /// Shows the same month of the next year.
    pub fn go_to_next_year(&mut self) {
        self.shift_anchor(12);
    }

    /// Shows the same month of the previous year.
    pub fn go_to_previous_year(&mut self) {
        self.shift_anchor(-12);
    }

    /// Shows `month` (1-12) of `year`. Months outside 1-12 roll over into
    /// neighbouring years.
    ///
    /// The min/max range is not applied.
    pub fn go_to_month(&mut self, year: i32, month: u32) {
        let anchor = roll_month(year, i64::from(month) - 1)
            .and_then(|(year, month)| CalendarDate::new(year, month, 1));
        match anchor {
            Some(anchor) => self.set_anchor(anchor),
            None => debug!("ignoring navigation to unrepresentable month {year}-{month}"),
        }
    }

    /// Shows the month of a date-like value. Unparseable values are ignored.
    ///
    /// Like [`CalendarState::go_to_month`] this ignores the min/max range;
    /// only the initial anchor is clamped.
    pub fn go_to_date<D: DateLike + ?Sized>(&mut self, value: &D) {
        match normalize_date(value) {
            Some(date) => self.set_anchor(date.start_of_month()),
            None => debug!("ignoring navigation to unparseable date"),
        }
    }

    /// Shows the current month.
    pub fn go_to_today(&mut self) {
        self.set_anchor(CalendarDate::today().start_of_month());
    }

    /// Replaces the disabled dates.
    pub fn set_disabled_dates<I>(&mut self, dates: I)
    where
        I: IntoIterator,
        I::Item: Into<DateInput>,
    {
        self.disabled_set = build_date_set(dates.into_iter().map(Into::<DateInput>::into));
    }

    /// Replaces the highlighted dates.
    pub fn set_highlighted_dates<I>(&mut self, dates: I)
    where
        I: IntoIterator,
        I::Item: Into<HighlightInput>,
    {
        self.highlighted_map = build_highlighted_map(dates);
    }

    /// Replaces the selectable range. The displayed month is kept.
    pub fn set_date_range(&mut self, min: Option<DateInput>, max: Option<DateInput>) {
        self.min_date = min.as_ref().and_then(DateLike::to_calendar_date);
        self.max_date = max.as_ref().and_then(DateLike::to_calendar_date);
    }

    /// Replaces the locale tag.
    pub fn set_locale(&mut self, locale: impl Into<String>) {
        self.locale = locale.into();
    }

    /// Replaces the first weekday and rebuilds the grid.
    pub fn set_week_starts_on(&mut self, week_starts_on: Weekday) {
        if let Some(matrix) = generate_month_matrix(self.anchor.year(), self.anchor.month(), week_starts_on) {
            self.week_starts_on = week_starts_on;
            self.matrix = matrix;
        }
    }

    fn shift_anchor(&mut self, months: i32) {
        match self.anchor.add_months(months) {
            Some(anchor) => self.set_anchor(anchor),
            None => debug!("ignoring navigation past the representable range"),
        }
    }

    fn set_anchor(&mut self, anchor: CalendarDate) {
        let anchor = anchor.start_of_month();
        let Some(matrix) = generate_month_matrix(anchor.year(), anchor.month(), self.week_starts_on) else {
            debug!("ignoring navigation to {anchor}, grid out of range");
            return;
        };
        self.anchor = anchor;
        self.matrix = matrix;
        if let Some(on_month_change) = &self.on_month_change {
            on_month_change.call(anchor);
        }
    }
}

fn clamp_to_month(date: CalendarDate, min: Option<CalendarDate>, max: Option<CalendarDate>) -> CalendarDate {
    let start = date.start_of_month();
    clamp_date_to_range(&start, min, max)
        .unwrap_or(start)
        .start_of_month()
}

fn month_layout(anchor: CalendarDate, week_starts_on: Weekday) -> Option<(CalendarDate, MonthMatrix)> {
    generate_month_matrix(anchor.year(), anchor.month(), week_starts_on).map(|matrix| (anchor, matrix))
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use parking_lot::Mutex;

    use super::*;

    fn date(year: i32, month: u32, day: u32) -> CalendarDate {
        CalendarDate::new(year, month, day).expect("valid test date")
    }

    fn state_at(initial: &str) -> CalendarState {
        CalendarState::new(&CalendarArgs::default().initial_date(initial))
    }

    #[test]
    fn test_grid_for_march_2024_monday_start() {
        let state = CalendarState::new(
            &CalendarArgs::default()
                .initial_date("2024-03-15")
                .week_starts_on(Weekday::Mon),
        );
        assert_eq!(state.anchor(), date(2024, 3, 1));
        assert_eq!(state.weeks().first(), date(2024, 2, 26));
        assert_eq!(state.weeks().last(), date(2024, 4, 7));
    }

    #[test]
    fn test_initial_anchor_defaults_to_today() {
        let state = CalendarState::new(&CalendarArgs::default());
        assert_eq!(state.anchor(), CalendarDate::today().start_of_month());
        let garbage = state_at("not a date");
        assert_eq!(garbage.anchor(), CalendarDate::today().start_of_month());
    }

    #[test]
    fn test_initial_anchor_is_clamped() {
        let after_max = CalendarState::new(
            &CalendarArgs::default()
                .initial_date("2025-06-10")
                .min_date("2024-01-10")
                .max_date("2024-12-20"),
        );
        assert_eq!(after_max.anchor(), date(2024, 12, 1));

        let before_min = CalendarState::new(
            &CalendarArgs::default()
                .initial_date("2023-06-10")
                .min_date("2024-01-10"),
        );
        assert_eq!(before_min.anchor(), date(2024, 1, 1));

        let same_month_as_min = CalendarState::new(
            &CalendarArgs::default()
                .initial_date("2024-01-02")
                .min_date("2024-01-10"),
        );
        assert_eq!(same_month_as_min.anchor(), date(2024, 1, 1));
    }

    #[test]
    fn test_month_and_year_navigation() {
        let mut state = state_at("2024-12-31");
        state.go_to_next_month();
        assert_eq!(state.anchor(), date(2025, 1, 1));
        state.go_to_previous_month();
        state.go_to_previous_month();
        assert_eq!(state.anchor(), date(2024, 11, 1));
        state.go_to_next_year();
        assert_eq!(state.anchor(), date(2025, 11, 1));
        state.go_to_previous_year();
        state.go_to_previous_year();
        assert_eq!((state.active_year(), state.active_month()), (2023, 11));
    }

    #[test]
    fn test_go_to_month_rolls_over_and_ignores_range() {
        let mut state = CalendarState::new(
            &CalendarArgs::default()
                .initial_date("2024-03-01")
                .min_date("2024-01-01")
                .max_date("2024-12-31"),
        );
        state.go_to_month(2030, 2);
        assert_eq!(state.anchor(), date(2030, 2, 1));
        state.go_to_month(2024, 13);
        assert_eq!(state.anchor(), date(2025, 1, 1));
        state.go_to_month(2024, 0);
        assert_eq!(state.anchor(), date(2023, 12, 1));
    }

    #[test]
    fn test_go_to_date_ignores_range_and_garbage() {
        let mut state = CalendarState::new(
            &CalendarArgs::default()
                .initial_date("2024-03-01")
                .max_date("2024-12-31"),
        );
        state.go_to_date("2024-07-19T10:00:00");
        assert_eq!(state.anchor(), date(2024, 7, 1));
        state.go_to_date("2031-01-01");
        assert_eq!(state.anchor(), date(2031, 1, 1));
        assert!(state.is_date_disabled(date(2031, 1, 15)));
        state.go_to_date("whenever");
        assert_eq!(state.anchor(), date(2031, 1, 1));
        state.go_to_today();
        assert_eq!(state.anchor(), CalendarDate::today().start_of_month());
    }

    #[test]
    fn test_month_change_observer() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let calls = Arc::new(AtomicUsize::new(0));
        let sink = Arc::clone(&seen);
        let counter = Arc::clone(&calls);
        let mut state = CalendarState::new(
            &CalendarArgs::default()
                .initial_date("2024-03-15")
                .on_month_change(move |anchor: CalendarDate| {
                    counter.fetch_add(1, Ordering::SeqCst);
                    sink.lock().push(anchor);
                }),
        );
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        state.go_to_next_month();
        state.go_to_month(2020, 5);
        state.go_to_date("nope");
        assert_eq!(
            *seen.lock(),
            vec![date(2024, 3, 1), date(2024, 4, 1), date(2020, 5, 1)]
        );
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_disabled_checks() {
        let mut state = CalendarState::new(
            &CalendarArgs::default()
                .initial_date("2024-03-01")
                .min_date("2024-03-05")
                .max_date("2024-03-25")
                .disabled_dates(["2024-03-10"]),
        );
        assert!(state.is_date_disabled(date(2024, 3, 4)));
        assert!(!state.is_date_disabled(date(2024, 3, 5)));
        assert!(state.is_date_disabled(date(2024, 3, 10)));
        assert!(!state.is_date_disabled(date(2024, 3, 25)));
        assert!(state.is_date_disabled(date(2024, 3, 26)));
        assert!(state.is_value_disabled("garbage"));
        assert!(!state.is_value_disabled("2024-03-11"));

        state.set_disabled_dates(["2024-03-11"]);
        assert!(!state.is_date_disabled(date(2024, 3, 10)));
        assert!(state.is_date_disabled(date(2024, 3, 11)));

        state.set_date_range(None, None);
        assert!(!state.is_date_disabled(date(2024, 3, 4)));
    }

    #[test]
    fn test_labels_and_week_start() {
        let mut state = CalendarState::new(
            &CalendarArgs::default()
                .initial_date("2024-03-15")
                .locale("en-US"),
        );
        assert_eq!(state.month_label(), "March 2024");
        assert_eq!(state.weekday_labels()[0].short, "Sun");
        assert_eq!(state.weeks().first(), date(2024, 2, 25));

        state.set_week_starts_on(Weekday::Mon);
        assert_eq!(state.weekday_labels()[0].short, "Mon");
        assert_eq!(state.weeks().first(), date(2024, 2, 26));
        assert!(state.is_in_active_month(date(2024, 3, 31)));
        assert!(!state.is_in_active_month(date(2024, 4, 1)));
    }
}
