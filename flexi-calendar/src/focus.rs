//! Keyboard focus and selection ownership.
//!
//! ## Usage
//!
//! Drive roving focus across the day grid and commit selections, skipping
//! disabled days and moving the displayed month when focus leaves it.
use tracing::{debug, trace};

use crate::{
    args::CalendarArgs,
    date::{CalendarDate, DateLike, normalize_date},
    grid::weekday_position,
    prop::CallbackWith,
    state::CalendarState,
};

/// Default number of days scanned past a disabled candidate before giving up.
pub const DEFAULT_FOCUS_SCAN_LIMIT: u32 = 120;

/// Direction in which disabled days are skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanDirection {
    /// Towards later dates.
    #[default]
    Forward,
    /// Towards earlier dates.
    Backward,
}

impl ScanDirection {
    /// Forward for non-negative offsets, backward otherwise.
    pub fn from_offset(offset: i64) -> Self {
        if offset >= 0 {
            ScanDirection::Forward
        } else {
            ScanDirection::Backward
        }
    }

    fn step(self) -> i64 {
        match self {
            ScanDirection::Forward => 1,
            ScanDirection::Backward => -1,
        }
    }
}

/// Edge of the displayed week.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeekEdge {
    /// The first column.
    Start,
    /// The last column.
    End,
}

/// Selected date, owned either by the caller or by the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectionState {
    controlled: Option<CalendarDate>,
    internal: Option<CalendarDate>,
}

impl SelectionState {
    /// Creates a selection from a controlled value and an internal seed.
    pub fn new(controlled: Option<CalendarDate>, internal: Option<CalendarDate>) -> Self {
        Self {
            controlled,
            internal,
        }
    }

    /// True while the caller owns the selection.
    pub fn is_controlled(&self) -> bool {
        self.controlled.is_some()
    }

    /// The selection in effect: the controlled value, else the internal one.
    pub fn effective(&self) -> Option<CalendarDate> {
        self.controlled.or(self.internal)
    }

    /// The internally stored selection.
    pub fn internal(&self) -> Option<CalendarDate> {
        self.internal
    }

    /// Replaces the controlled value. `None` hands ownership back to the
    /// calendar.
    pub fn set_controlled(&mut self, controlled: Option<CalendarDate>) {
        self.controlled = controlled;
    }

    /// Stores `date` unless the selection is controlled.
    fn commit(&mut self, date: CalendarDate) {
        if !self.is_controlled() {
            self.internal = Some(date);
        }
    }
}

/// Roving focus over the day grid plus selection commits.
///
/// Every operation that can change the selection or the displayed month
/// reconciles focus before returning.
#[derive(Debug, Clone)]
pub struct FocusController {
    focused: Option<CalendarDate>,
    selection: SelectionState,
    scan_limit: u32,
    show_adjacent_days: bool,
    allow_outside_days_navigation: bool,
    on_date_select: Option<CallbackWith<CalendarDate>>,
    observed_anchor: CalendarDate,
    observed_selection: Option<CalendarDate>,
}

impl FocusController {
    /// Creates the controller and derives the initial focus from the
    /// selection, else the displayed month.
    pub fn new(args: &CalendarArgs, state: &CalendarState) -> Self {
        let selection = SelectionState::new(
            args.selected_date.as_ref().and_then(DateLike::to_calendar_date),
            args.default_selected_date
                .as_ref()
                .and_then(DateLike::to_calendar_date),
        );
        let mut controller = Self {
            focused: None,
            selection,
            scan_limit: args.focus_scan_limit,
            show_adjacent_days: args.show_adjacent_days,
            allow_outside_days_navigation: args.allow_outside_days_navigation,
            on_date_select: args.on_date_select.clone(),
            observed_anchor: state.anchor(),
            observed_selection: selection.effective(),
        };
        let start = selection.effective().unwrap_or_else(|| state.anchor());
        controller.focused = controller.find_focusable_date(state, start, ScanDirection::Forward);
        controller
    }

    /// Returns the focused date.
    pub fn focused_date(&self) -> Option<CalendarDate> {
        self.focused
    }

    /// Returns the selection in effect.
    pub fn selected_date(&self) -> Option<CalendarDate> {
        self.selection.effective()
    }

    /// Returns the selection ownership state.
    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// Returns the scan limit.
    pub fn scan_limit(&self) -> u32 {
        self.scan_limit
    }

    /// Returns `candidate` if it is enabled, else the nearest enabled date
    /// in `direction` within the scan limit.
    pub fn find_focusable_date(
        &self,
        state: &CalendarState,
        candidate: CalendarDate,
        direction: ScanDirection,
    ) -> Option<CalendarDate> {
        if !state.is_date_disabled(candidate) {
            return Some(candidate);
        }
        let mut cursor = candidate;
        for _ in 0..self.scan_limit {
            cursor = cursor.shift_days(direction.step())?;
            if !state.is_date_disabled(cursor) {
                return Some(cursor);
            }
        }
        trace!(
            "no focusable date within {} days of {candidate}",
            self.scan_limit
        );
        None
    }

    /// Focuses the nearest enabled date to `candidate`.
    ///
    /// When the result lies outside the displayed month, the calendar
    /// navigates to it only if adjacent days are shown and outside-day
    /// navigation is allowed. Returns the new focus, or `None` when nothing
    /// was focusable and focus is unchanged.
    pub fn move_focus_to_date(
        &mut self,
        state: &mut CalendarState,
        candidate: CalendarDate,
        direction: ScanDirection,
    ) -> Option<CalendarDate> {
        let next = self.find_focusable_date(state, candidate, direction)?;
        self.focused = Some(next);
        if !state.is_in_active_month(next)
            && self.show_adjacent_days
            && self.allow_outside_days_navigation
        {
            state.go_to_date(&next);
        }
        self.reconcile(state);
        Some(next)
    }

    /// Moves focus by whole days from `base`, else the focused date, the
    /// selection or the displayed month. An offset of zero does nothing.
    pub fn move_focus_by_days(
        &mut self,
        state: &mut CalendarState,
        offset: i64,
        base: Option<CalendarDate>,
    ) -> Option<CalendarDate> {
        if offset == 0 {
            return None;
        }
        let candidate = self.reference_date(state, base).shift_days(offset)?;
        self.move_focus_to_date(state, candidate, ScanDirection::from_offset(offset))
    }

    /// Moves focus by whole months, keeping the day of month and letting it
    /// spill into the following month when the target month is shorter.
    pub fn move_focus_by_months(
        &mut self,
        state: &mut CalendarState,
        delta: i32,
        base: Option<CalendarDate>,
    ) -> Option<CalendarDate> {
        let candidate = self
            .reference_date(state, base)
            .add_months_overflowing(delta)?;
        self.move_focus_to_date(state, candidate, ScanDirection::from_offset(i64::from(delta)))
    }

    /// Moves focus to the first or last column of the reference date's week.
    pub fn focus_week_edge(
        &mut self,
        state: &mut CalendarState,
        edge: WeekEdge,
        base: Option<CalendarDate>,
    ) -> Option<CalendarDate> {
        let reference = self.reference_date(state, base);
        let position = i64::from(weekday_position(reference.weekday(), state.week_starts_on()));
        let offset = match edge {
            WeekEdge::Start => -position,
            WeekEdge::End => 6 - position,
        };
        self.move_focus_by_days(state, offset, Some(reference))
    }

    /// Focuses today, or the next enabled day after it.
    pub fn focus_today(&mut self, state: &mut CalendarState) -> Option<CalendarDate> {
        self.move_focus_to_date(state, CalendarDate::today(), ScanDirection::Forward)
    }

    /// Accepts focus reported by the presentation layer. Disabled and
    /// unparseable dates are refused.
    pub fn handle_focus<D: DateLike + ?Sized>(&mut self, state: &CalendarState, value: &D) -> bool {
        match normalize_date(value) {
            Some(date) if !state.is_date_disabled(date) => {
                self.focused = Some(date);
                true
            }
            _ => false,
        }
    }

    /// Commits a selection.
    ///
    /// Absent, unparseable and disabled dates are ignored. An uncontrolled
    /// calendar stores the date; the select callback runs either way. Focus
    /// is not moved here.
    pub fn handle_select<D: DateLike + ?Sized>(&mut self, state: &CalendarState, value: &D) -> bool {
        let Some(date) = normalize_date(value) else {
            return false;
        };
        if state.is_date_disabled(date) {
            debug!("ignoring selection of disabled date {date}");
            return false;
        }
        self.selection.commit(date);
        if let Some(on_date_select) = &self.on_date_select {
            on_date_select.call(date);
        }
        self.reconcile(state);
        true
    }

    /// Handles a click on a day cell: focuses it, shows its month when it is
    /// an adjacent day and outside-day navigation is allowed, then selects.
    pub fn handle_click<D: DateLike + ?Sized>(&mut self, state: &mut CalendarState, value: &D) -> bool {
        let Some(date) = normalize_date(value) else {
            return false;
        };
        if state.is_date_disabled(date) {
            return false;
        }
        self.focused = Some(date);
        if !state.is_in_active_month(date) && self.allow_outside_days_navigation {
            state.go_to_date(&date);
        }
        self.handle_select(state, &date)
    }

    /// Replaces the caller-controlled selection. Unparseable values and
    /// `None` hand ownership back to the calendar.
    pub fn set_selected_date<D: DateLike>(&mut self, state: &CalendarState, value: Option<D>) {
        self.selection
            .set_controlled(value.as_ref().and_then(DateLike::to_calendar_date));
        self.reconcile(state);
    }

    /// Re-derives focus after the selection or displayed month changed.
    ///
    /// A focused date that became disabled is moved to the next enabled day.
    pub fn reconcile(&mut self, state: &CalendarState) {
        if let Some(focused) = self.focused.filter(|date| state.is_date_disabled(*date)) {
            self.focused = self.find_focusable_date(state, focused, ScanDirection::Forward);
        }

        let anchor = state.anchor();
        let selection = self.selection.effective();
        let selection_changed = selection != self.observed_selection;
        let month_changed = anchor != self.observed_anchor;
        self.observed_selection = selection;
        self.observed_anchor = anchor;

        if selection_changed
            && let Some(selected) = selection
            && self.focused != Some(selected)
            && let Some(next) = self.find_focusable_date(state, selected, ScanDirection::Forward)
        {
            self.focused = Some(next);
        }

        if !(selection_changed || month_changed) {
            return;
        }
        if self.focused.is_some_and(|date| state.is_in_active_month(date)) {
            return;
        }
        let baseline = selection
            .filter(|date| state.is_in_active_month(*date))
            .unwrap_or(anchor);
        if let Some(next) = self.find_focusable_date(state, baseline, ScanDirection::Forward) {
            self.focused = Some(next);
        }
    }

    /// Replaces the select callback.
    pub fn set_on_date_select(&mut self, on_date_select: Option<CallbackWith<CalendarDate>>) {
        self.on_date_select = on_date_select;
    }

    fn reference_date(&self, state: &CalendarState, base: Option<CalendarDate>) -> CalendarDate {
        base.or(self.focused)
            .or(self.selection.effective())
            .unwrap_or_else(|| state.anchor())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use super::*;
    use crate::date::DateInput;

    fn date(year: i32, month: u32, day: u32) -> CalendarDate {
        CalendarDate::new(year, month, day).expect("valid test date")
    }

    fn setup(args: CalendarArgs) -> (CalendarState, FocusController) {
        let state = CalendarState::new(&args);
        let focus = FocusController::new(&args, &state);
        (state, focus)
    }

    fn days_from(start: CalendarDate, count: i64) -> Vec<DateInput> {
        (0..count)
            .filter_map(|offset| start.shift_days(offset))
            .map(DateInput::from)
            .collect()
    }

    #[test]
    fn test_only_enabled_day_in_range_is_found() {
        let today = CalendarDate::today();
        let keep = today.shift_days(3).expect("date");
        let disabled: Vec<DateInput> = (0..=5)
            .filter_map(|offset| today.shift_days(offset))
            .filter(|day| *day != keep)
            .map(DateInput::from)
            .collect();
        let (state, focus) = setup(
            CalendarArgs::default()
                .min_date(today)
                .max_date(today.shift_days(5).expect("date"))
                .disabled_dates(disabled),
        );
        assert_eq!(
            focus.find_focusable_date(&state, today, ScanDirection::Forward),
            Some(keep)
        );
        assert_eq!(
            focus.find_focusable_date(&state, today.shift_days(5).expect("date"), ScanDirection::Backward),
            Some(keep)
        );
    }

    #[test]
    fn test_scan_gives_up_after_limit() {
        let start = date(2024, 1, 1);
        let disabled = days_from(start, 200);
        let (state, focus) = setup(
            CalendarArgs::default()
                .initial_date(start)
                .disabled_dates(disabled.clone()),
        );
        assert_eq!(focus.focused_date(), None);
        assert_eq!(focus.find_focusable_date(&state, start, ScanDirection::Forward), None);

        let (state, focus) = setup(
            CalendarArgs::default()
                .initial_date(start)
                .disabled_dates(disabled)
                .focus_scan_limit(250),
        );
        assert_eq!(
            focus.find_focusable_date(&state, start, ScanDirection::Forward),
            start.shift_days(200)
        );
    }

    #[test]
    fn test_initial_focus_prefers_selection() {
        let (_, focus) = setup(
            CalendarArgs::default()
                .initial_date("2024-03-01")
                .default_selected_date("2024-03-20"),
        );
        assert_eq!(focus.focused_date(), Some(date(2024, 3, 20)));

        let (_, focus) = setup(CalendarArgs::default().initial_date("2024-03-15"));
        assert_eq!(focus.focused_date(), Some(date(2024, 3, 1)));
    }

    #[test]
    fn test_move_by_week_keeps_weekday() {
        let (mut state, mut focus) = setup(CalendarArgs::default().initial_date("2024-03-13"));
        let wednesday = date(2024, 3, 13);
        assert_eq!(
            focus.move_focus_by_days(&mut state, -7, Some(wednesday)),
            Some(date(2024, 3, 6))
        );
        assert_eq!(focus.focused_date(), Some(date(2024, 3, 6)));
        assert_eq!(focus.move_focus_by_days(&mut state, 7, None), Some(wednesday));
        assert_eq!(focus.move_focus_by_days(&mut state, 0, None), None);
        assert_eq!(focus.focused_date(), Some(wednesday));
    }

    #[test]
    fn test_move_skips_disabled_days_in_direction() {
        let (mut state, mut focus) = setup(
            CalendarArgs::default()
                .initial_date("2024-03-01")
                .disabled_dates(["2024-03-11", "2024-03-12", "2024-03-08"]),
        );
        let base = date(2024, 3, 10);
        assert_eq!(focus.move_focus_by_days(&mut state, 1, Some(base)), Some(date(2024, 3, 13)));
        assert_eq!(
            focus.move_focus_by_days(&mut state, -1, Some(date(2024, 3, 9))),
            Some(date(2024, 3, 7))
        );
    }

    #[test]
    fn test_focus_leaving_month_navigates() {
        let (mut state, mut focus) = setup(CalendarArgs::default().initial_date("2024-03-01"));
        focus.move_focus_by_days(&mut state, 1, Some(date(2024, 3, 31)));
        assert_eq!(state.anchor(), date(2024, 4, 1));
        assert_eq!(focus.focused_date(), Some(date(2024, 4, 1)));
    }

    #[test]
    fn test_focus_leaving_month_without_outside_navigation() {
        let (mut state, mut focus) = setup(
            CalendarArgs::default()
                .initial_date("2024-03-01")
                .allow_outside_days_navigation(false),
        );
        focus.move_focus_by_days(&mut state, 1, Some(date(2024, 3, 31)));
        assert_eq!(state.anchor(), date(2024, 3, 1));
        assert_eq!(focus.focused_date(), Some(date(2024, 4, 1)));

        let (mut state, mut focus) = setup(
            CalendarArgs::default()
                .initial_date("2024-03-01")
                .show_adjacent_days(false),
        );
        focus.move_focus_by_days(&mut state, -1, Some(date(2024, 3, 1)));
        assert_eq!(state.anchor(), date(2024, 3, 1));
        assert_eq!(focus.focused_date(), Some(date(2024, 2, 29)));
    }

    #[test]
    fn test_move_by_months_overflows_day() {
        let (mut state, mut focus) = setup(CalendarArgs::default().initial_date("2024-01-01"));
        assert_eq!(
            focus.move_focus_by_months(&mut state, 1, Some(date(2024, 1, 31))),
            Some(date(2024, 3, 2))
        );
        assert_eq!(state.anchor(), date(2024, 3, 1));
        assert_eq!(
            focus.move_focus_by_months(&mut state, -12, None),
            Some(date(2023, 3, 2))
        );
        assert_eq!(state.anchor(), date(2023, 3, 1));
    }

    #[test]
    fn test_week_edges() {
        let (mut state, mut focus) = setup(CalendarArgs::default().initial_date("2024-03-01"));
        let wednesday = date(2024, 3, 13);
        assert_eq!(
            focus.focus_week_edge(&mut state, WeekEdge::Start, Some(wednesday)),
            Some(date(2024, 3, 10))
        );
        assert_eq!(
            focus.focus_week_edge(&mut state, WeekEdge::End, None),
            Some(date(2024, 3, 16))
        );
        assert_eq!(focus.focus_week_edge(&mut state, WeekEdge::End, None), None);

        state.set_week_starts_on(chrono::Weekday::Mon);
        assert_eq!(
            focus.focus_week_edge(&mut state, WeekEdge::Start, Some(wednesday)),
            Some(date(2024, 3, 11))
        );
    }

    #[test]
    fn test_focus_today() {
        let (mut state, mut focus) = setup(CalendarArgs::default().initial_date("2001-01-01"));
        let today = CalendarDate::today();
        assert_eq!(focus.focus_today(&mut state), Some(today));
        assert!(state.is_in_active_month(today));
    }

    #[test]
    fn test_select_disabled_date_is_ignored() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let (state, mut focus) = setup(
            CalendarArgs::default()
                .initial_date("2024-03-01")
                .disabled_dates(["2024-03-10"])
                .on_date_select(move |_: CalendarDate| {
                    counter.fetch_add(1, Ordering::SeqCst);
                }),
        );
        assert!(!focus.handle_select(&state, "2024-03-10"));
        assert!(!focus.handle_select(&state, "nonsense"));
        assert_eq!(focus.selected_date(), None);
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        assert!(focus.handle_select(&state, "2024-03-12"));
        assert_eq!(focus.selected_date(), Some(date(2024, 3, 12)));
        assert_eq!(focus.focused_date(), Some(date(2024, 3, 12)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_controlled_selection_is_not_stored() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let (state, mut focus) = setup(
            CalendarArgs::default()
                .initial_date("2024-03-01")
                .selected_date("2024-03-05")
                .on_date_select(move |_: CalendarDate| {
                    counter.fetch_add(1, Ordering::SeqCst);
                }),
        );
        assert!(focus.selection().is_controlled());
        assert!(focus.handle_select(&state, "2024-03-07"));
        assert_eq!(focus.selected_date(), Some(date(2024, 3, 5)));
        assert_eq!(focus.selection().internal(), None);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        focus.set_selected_date(&state, Some("2024-03-07"));
        assert_eq!(focus.selected_date(), Some(date(2024, 3, 7)));
        assert_eq!(focus.focused_date(), Some(date(2024, 3, 7)));

        focus.set_selected_date::<&str>(&state, None);
        assert!(!focus.selection().is_controlled());
        assert_eq!(focus.selected_date(), None);
    }

    #[test]
    fn test_month_change_rederives_focus() {
        let (mut state, mut focus) = setup(
            CalendarArgs::default()
                .initial_date("2024-04-01")
                .default_selected_date("2024-04-18")
                .disabled_dates(["2024-05-01"]),
        );
        assert_eq!(focus.focused_date(), Some(date(2024, 4, 18)));

        state.go_to_previous_month();
        focus.reconcile(&state);
        assert_eq!(focus.focused_date(), Some(date(2024, 3, 1)));

        state.go_to_next_month();
        focus.reconcile(&state);
        assert_eq!(focus.focused_date(), Some(date(2024, 4, 18)));

        state.go_to_next_month();
        focus.reconcile(&state);
        assert_eq!(focus.focused_date(), Some(date(2024, 5, 2)));
    }

    #[test]
    fn test_click_on_adjacent_day_navigates_and_selects() {
        let (mut state, mut focus) = setup(CalendarArgs::default().initial_date("2024-03-01"));
        assert!(focus.handle_click(&mut state, &date(2024, 4, 2)));
        assert_eq!(state.anchor(), date(2024, 4, 1));
        assert_eq!(focus.selected_date(), Some(date(2024, 4, 2)));
        assert_eq!(focus.focused_date(), Some(date(2024, 4, 2)));
    }

    #[test]
    fn test_handle_focus_refuses_disabled() {
        let (state, mut focus) = setup(
            CalendarArgs::default()
                .initial_date("2024-03-01")
                .disabled_dates(["2024-03-09"]),
        );
        assert!(!focus.handle_focus(&state, "2024-03-09"));
        assert_eq!(focus.focused_date(), Some(date(2024, 3, 1)));
        assert!(focus.handle_focus(&state, "2024-03-08"));
        assert_eq!(focus.focused_date(), Some(date(2024, 3, 8)));
    }

    #[test]
    fn test_disabling_focused_date_moves_focus() {
        let (mut state, mut focus) = setup(CalendarArgs::default().initial_date("2024-03-01"));
        state.set_disabled_dates(["2024-03-01", "2024-03-02"]);
        focus.reconcile(&state);
        assert_eq!(focus.focused_date(), Some(date(2024, 3, 3)));
    }
}
