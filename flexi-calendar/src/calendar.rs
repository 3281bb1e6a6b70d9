//! The calendar component: state, focus, theme and per-cell view models.
//!
//! ## Usage
//!
//! Build a [`Calendar`] from [`CalendarArgs`], render [`Calendar::day_cells`]
//! and [`Calendar::header`], and forward key presses and clicks back to it.
use std::sync::Arc;

use tracing::debug;

use crate::{
    args::CalendarArgs,
    color_scheme::{ColorSchemePreference, ColorSchemeState, StaticPreference},
    date::{CalendarDate, DateKey, DateLike},
    focus::{FocusController, ScanDirection, WeekEdge},
    keyboard::{CalendarKey, KeyAction, KeyModifiers, map_key_to_action},
    locale::{WeekdayLabel, format_full_date},
    marks::Highlight,
    prop::RenderSlotWith,
    state::CalendarState,
    theme::{
        CalendarSize, CalendarTheme, ColorMode, ColorScheme, build_class_name, resolve_themes,
    },
};

/// Root class name of the calendar.
pub const ROOT_CLASS: &str = "flexi-calendar";
/// Base class name of a day cell.
pub const DAY_CLASS: &str = "flexi-calendar__day";

/// Input to a custom day renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayRenderContext {
    /// The day.
    pub date: CalendarDate,
    /// True when the day belongs to the displayed month.
    pub is_current_month: bool,
    /// True when the day is selected.
    pub is_selected: bool,
    /// True when the day is today.
    pub is_today: bool,
    /// True when the day cannot be selected.
    pub is_disabled: bool,
    /// True when the day is highlighted.
    pub is_highlighted: bool,
}

/// Input to a custom header renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderContext {
    /// First day of the displayed month.
    pub anchor: CalendarDate,
    /// Localized month label.
    pub month_label: String,
    /// Whether year controls are shown.
    pub show_year_controls: bool,
}

/// View model of one grid cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCell {
    /// Canonical key, stable across renders.
    pub key: DateKey,
    /// The day.
    pub date: CalendarDate,
    /// True when the day belongs to the displayed month.
    pub is_current_month: bool,
    /// True for a hidden neighbouring-month day. All other flags are false.
    pub is_placeholder: bool,
    /// True when outside the range or explicitly disabled.
    pub is_disabled: bool,
    /// True when the day is the selection.
    pub is_selected: bool,
    /// True when the day is today.
    pub is_today: bool,
    /// True when the day has highlight metadata.
    pub is_highlighted: bool,
    /// True when the day holds keyboard focus.
    pub is_focused: bool,
    /// Highlight metadata.
    pub highlight: Option<Highlight>,
    /// `0` for the focused, enabled cell; `-1` otherwise.
    pub tab_index: i8,
    /// Full, localized accessible label.
    pub aria_label: String,
    /// Day of month.
    pub day_number: u32,
    /// Class names for the cell, including the highlight's class.
    pub class_name: String,
    /// Output of the custom day renderer.
    pub content: Option<String>,
    /// Badge text when a badge is rendered.
    pub badge: Option<String>,
    /// True when a highlight dot is rendered.
    pub show_dot: bool,
}

/// A complete calendar component.
pub struct Calendar {
    state: CalendarState,
    focus: FocusController,
    color: ColorSchemeState,
    light_theme: CalendarTheme,
    dark_theme: CalendarTheme,
    size: CalendarSize,
    show_weekdays: bool,
    show_adjacent_days: bool,
    show_year_controls: bool,
    render_day: Option<RenderSlotWith<DayRenderContext, String>>,
    render_header: Option<RenderSlotWith<HeaderContext, String>>,
}

impl Calendar {
    /// Creates a calendar that follows `preference` while its color scheme
    /// is [`ColorScheme::System`].
    pub fn new(args: CalendarArgs, preference: Arc<dyn ColorSchemePreference>) -> Self {
        let state = CalendarState::new(&args);
        let focus = FocusController::new(&args, &state);
        let mut color = ColorSchemeState::new(args.color_scheme, preference);
        color.activate();
        let (light_theme, dark_theme) = resolve_themes(&args.theme, &args.dark_theme);
        debug!(
            "calendar created on {} in {} mode",
            state.anchor(),
            color.resolved_mode().as_str()
        );

        Self {
            state,
            focus,
            color,
            light_theme,
            dark_theme,
            size: args.size,
            show_weekdays: args.show_weekdays,
            show_adjacent_days: args.show_adjacent_days,
            show_year_controls: args.show_year_controls,
            render_day: args.render_day,
            render_header: args.render_header,
        }
    }

    /// Creates a calendar for a host without an ambient preference, which
    /// resolves the system scheme to light.
    pub fn headless(args: CalendarArgs) -> Self {
        Self::new(args, Arc::new(StaticPreference::light()))
    }

    /// Returns the month engine.
    pub fn state(&self) -> &CalendarState {
        &self.state
    }

    /// Returns the focus controller.
    pub fn focus(&self) -> &FocusController {
        &self.focus
    }

    /// Returns the first day of the displayed month.
    pub fn anchor(&self) -> CalendarDate {
        self.state.anchor()
    }

    /// Returns the focused date.
    pub fn focused_date(&self) -> Option<CalendarDate> {
        self.focus.focused_date()
    }

    /// Returns the selection in effect.
    pub fn selected_date(&self) -> Option<CalendarDate> {
        self.focus.selected_date()
    }

    /// Returns the localized month label.
    pub fn month_label(&self) -> String {
        self.state.month_label()
    }

    /// Returns the weekday header labels, or nothing when the row is hidden.
    pub fn weekday_labels(&self) -> Vec<WeekdayLabel> {
        if self.show_weekdays {
            self.state.weekday_labels()
        } else {
            Vec::new()
        }
    }

    /// Shows the next month.
    pub fn go_to_next_month(&mut self) {
        self.state.go_to_next_month();
        self.focus.reconcile(&self.state);
    }

    /// Shows the previous month.
    pub fn go_to_previous_month(&mut self) {
        self.state.go_to_previous_month();
        self.focus.reconcile(&self.state);
    }

    /// Shows the same month of the next year.
    pub fn go_to_next_year(&mut self) {
        self.state.go_to_next_year();
        self.focus.reconcile(&self.state);
    }

    /// Shows the same month of the previous year.
    pub fn go_to_previous_year(&mut self) {
        self.state.go_to_previous_year();
        self.focus.reconcile(&self.state);
    }

    /// Shows `month` (1-12) of `year`, ignoring the selectable range.
    pub fn go_to_month(&mut self, year: i32, month: u32) {
        self.state.go_to_month(year, month);
        self.focus.reconcile(&self.state);
    }

    /// Shows the month of a date-like value, ignoring the selectable range.
    pub fn go_to_date<D: DateLike + ?Sized>(&mut self, value: &D) {
        self.state.go_to_date(value);
        self.focus.reconcile(&self.state);
    }

    /// Shows the current month.
    pub fn go_to_today(&mut self) {
        self.state.go_to_today();
        self.focus.reconcile(&self.state);
    }

    /// Handles a key press on the cell showing `cell`.
    ///
    /// Returns true when the key was consumed and its default action should
    /// be suppressed. Enter and Space on a disabled cell are not consumed.
    pub fn handle_key(&mut self, key: CalendarKey, modifiers: KeyModifiers, cell: CalendarDate) -> bool {
        let Some(action) = map_key_to_action(key, modifiers) else {
            return false;
        };
        let base = Some(cell);
        match action {
            KeyAction::MoveDays(offset) => {
                self.focus.move_focus_by_days(&mut self.state, offset, base);
            }
            KeyAction::MoveMonths(delta) => {
                self.focus.move_focus_by_months(&mut self.state, delta, base);
            }
            KeyAction::WeekEdge(edge) => {
                self.focus.focus_week_edge(&mut self.state, edge, base);
            }
            KeyAction::Select => {
                if self.state.is_date_disabled(cell) {
                    return false;
                }
                self.focus.handle_select(&self.state, &cell);
            }
            KeyAction::FocusToday => {
                self.focus.focus_today(&mut self.state);
            }
        }
        true
    }

    /// Handles a click on a day cell. Returns true when a selection was
    /// committed.
    pub fn handle_click<D: DateLike + ?Sized>(&mut self, value: &D) -> bool {
        self.focus.handle_click(&mut self.state, value)
    }

    /// Handles a cell receiving focus. Returns true when focus moved.
    pub fn handle_focus<D: DateLike + ?Sized>(&mut self, value: &D) -> bool {
        self.focus.handle_focus(&self.state, value)
    }

    /// Commits a selection. Returns true when committed.
    pub fn handle_select<D: DateLike + ?Sized>(&mut self, value: &D) -> bool {
        self.focus.handle_select(&self.state, value)
    }

    /// Focuses the nearest enabled date to `value`.
    pub fn move_focus_to_date<D: DateLike + ?Sized>(
        &mut self,
        value: &D,
        direction: ScanDirection,
    ) -> Option<CalendarDate> {
        let candidate = value.to_calendar_date()?;
        self.focus.move_focus_to_date(&mut self.state, candidate, direction)
    }

    /// Moves focus by whole days.
    pub fn move_focus_by_days(&mut self, offset: i64) -> Option<CalendarDate> {
        self.focus.move_focus_by_days(&mut self.state, offset, None)
    }

    /// Moves focus by whole months.
    pub fn move_focus_by_months(&mut self, delta: i32) -> Option<CalendarDate> {
        self.focus.move_focus_by_months(&mut self.state, delta, None)
    }

    /// Moves focus to an edge of the focused week.
    pub fn focus_week_edge(&mut self, edge: WeekEdge) -> Option<CalendarDate> {
        self.focus.focus_week_edge(&mut self.state, edge, None)
    }

    /// Moves focus to today.
    pub fn focus_today(&mut self) -> Option<CalendarDate> {
        self.focus.focus_today(&mut self.state)
    }

    /// Updates the caller-controlled selection.
    pub fn set_selected_date<D: DateLike>(&mut self, value: Option<D>) {
        self.focus.set_selected_date(&self.state, value);
    }

    /// Replaces the disabled dates.
    pub fn set_disabled_dates<I>(&mut self, dates: I)
    where
        I: IntoIterator,
        I::Item: Into<crate::date::DateInput>,
    {
        self.state.set_disabled_dates(dates);
        self.focus.reconcile(&self.state);
    }

    /// Replaces the highlighted dates.
    pub fn set_highlighted_dates<I>(&mut self, dates: I)
    where
        I: IntoIterator,
        I::Item: Into<crate::marks::HighlightInput>,
    {
        self.state.set_highlighted_dates(dates);
    }

    /// Subscribes to the ambient color preference again after
    /// [`Calendar::deactivate`]. Calendars start out active.
    pub fn activate(&mut self) {
        self.color.activate();
    }

    /// Releases the ambient color preference subscription. The last
    /// observed preference stays in effect.
    pub fn deactivate(&mut self) {
        self.color.deactivate();
    }

    /// Changes the requested color scheme.
    pub fn set_color_scheme(&mut self, scheme: ColorScheme) {
        self.color.set_color_scheme(scheme);
    }

    /// True when rendering in dark mode.
    pub fn is_dark(&self) -> bool {
        self.color.is_dark()
    }

    /// Returns the resolved display mode.
    pub fn color_mode(&self) -> ColorMode {
        self.color.resolved_mode()
    }

    /// Returns the token set of the resolved mode.
    pub fn theme(&self) -> &CalendarTheme {
        if self.is_dark() {
            &self.dark_theme
        } else {
            &self.light_theme
        }
    }

    /// Returns the root element's CSS custom properties.
    pub fn style_variables(&self) -> Vec<(&'static str, &str)> {
        self.theme().style_variables()
    }

    /// Returns the root element's class names.
    pub fn root_class_name(&self) -> String {
        let is_dark = self.is_dark();
        build_class_name(
            ROOT_CLASS,
            &[
                (self.size.as_str(), true),
                ("dark", is_dark),
                ("light", !is_dark),
            ],
        )
    }

    /// Returns the header context.
    pub fn header(&self) -> HeaderContext {
        HeaderContext {
            anchor: self.state.anchor(),
            month_label: self.state.month_label(),
            show_year_controls: self.show_year_controls,
        }
    }

    /// Returns custom header content, when a header renderer is set.
    pub fn render_header(&self) -> Option<String> {
        self.render_header
            .as_ref()
            .map(|render| render.render(self.header()))
    }

    /// Returns the 42 cell view models in display order.
    pub fn day_cells(&self) -> Vec<DayCell> {
        let today = CalendarDate::today();
        self.state
            .weeks()
            .iter()
            .map(|date| self.day_cell(date, today))
            .collect()
    }

    /// Returns the cell view model of a date.
    pub fn day_cell(&self, date: CalendarDate, today: CalendarDate) -> DayCell {
        let is_current_month = self.state.is_in_active_month(date);
        if !is_current_month && !self.show_adjacent_days {
            return DayCell {
                key: date.key(),
                date,
                is_current_month,
                is_placeholder: true,
                is_disabled: false,
                is_selected: false,
                is_today: false,
                is_highlighted: false,
                is_focused: false,
                highlight: None,
                tab_index: -1,
                aria_label: String::new(),
                day_number: date.day(),
                class_name: build_class_name(DAY_CLASS, &[("placeholder", true)]),
                content: None,
                badge: None,
                show_dot: false,
            };
        }

        let is_disabled = self.state.is_date_disabled(date);
        let highlight = self.state.highlighted_map().get(date).cloned();
        let is_highlighted = highlight.is_some();
        let is_selected = self.focus.selected_date() == Some(date);
        let is_today = date == today;
        let is_focused = self.focus.focused_date() == Some(date);

        let mut class_name = build_class_name(
            DAY_CLASS,
            &[
                ("outside", !is_current_month),
                ("disabled", is_disabled),
                ("selected", is_selected),
                ("today", is_today),
                ("highlighted", is_highlighted),
                ("focused", is_focused),
            ],
        );
        if let Some(extra) = highlight.as_ref().map(|h| h.class_name.as_str()).filter(|c| !c.is_empty()) {
            class_name.push(' ');
            class_name.push_str(extra);
        }

        let content = self.render_day.as_ref().map(|render| {
            render.render(DayRenderContext {
                date,
                is_current_month,
                is_selected,
                is_today,
                is_disabled,
                is_highlighted,
            })
        });

        DayCell {
            key: date.key(),
            date,
            is_current_month,
            is_placeholder: false,
            is_disabled,
            is_selected,
            is_today,
            is_highlighted,
            is_focused,
            badge: highlight
                .as_ref()
                .and_then(Highlight::badge_content)
                .map(str::to_string),
            show_dot: highlight.as_ref().is_some_and(Highlight::shows_dot),
            highlight,
            tab_index: if is_focused && !is_disabled { 0 } else { -1 },
            aria_label: format_full_date(date, self.state.locale()),
            day_number: date.day(),
            class_name,
            content,
        }
    }
}

impl std::fmt::Debug for Calendar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Calendar")
            .field("anchor", &self.state.anchor())
            .field("focused", &self.focus.focused_date())
            .field("selected", &self.focus.selected_date())
            .field("color", &self.color)
            .finish_non_exhaustive()
    }
}
