//! Calendar configuration.
use chrono::Weekday;
use derive_setters::Setters;

use crate::{
    calendar::{DayRenderContext, HeaderContext},
    date::{CalendarDate, DateInput},
    focus::DEFAULT_FOCUS_SCAN_LIMIT,
    locale::{MonthLabelOptions, WeekdayFormatOptions},
    marks::HighlightInput,
    prop::{CallbackWith, RenderSlotWith},
    theme::{CalendarSize, ColorScheme, ThemeOverrides},
};

/// Locale tag that resolves to the fallback locale.
pub const DEFAULT_LOCALE: &str = "default";

/// Configuration for [`crate::Calendar`].
///
/// Every date option accepts anything convertible into [`DateInput`]:
/// a [`CalendarDate`], a `chrono` date or date-time, a string, or a
/// millisecond timestamp. Values that do not parse are treated as absent.
#[derive(Clone, Debug, Setters)]
pub struct CalendarArgs {
    /// Date whose month is displayed first. Defaults to today.
    #[setters(strip_option, into)]
    pub initial_date: Option<DateInput>,
    /// Externally controlled selection. While this resolves to a date, the
    /// calendar never stores a selection of its own.
    #[setters(strip_option, into)]
    pub selected_date: Option<DateInput>,
    /// Initial value of the internally owned selection.
    #[setters(strip_option, into)]
    pub default_selected_date: Option<DateInput>,
    /// Earliest selectable date, inclusive.
    #[setters(strip_option, into)]
    pub min_date: Option<DateInput>,
    /// Latest selectable date, inclusive.
    #[setters(strip_option, into)]
    pub max_date: Option<DateInput>,
    /// Dates that cannot be selected or focused.
    #[setters(skip)]
    pub disabled_dates: Vec<DateInput>,
    /// Dates decorated with a dot, badge or custom class.
    #[setters(skip)]
    pub highlighted_dates: Vec<HighlightInput>,
    /// Locale tag used for month and weekday labels.
    #[setters(into)]
    pub locale: String,
    /// First column of every week.
    pub week_starts_on: Weekday,
    /// Whether the weekday header row is shown.
    pub show_weekdays: bool,
    /// Whether leading and trailing days of neighbouring months are shown.
    pub show_adjacent_days: bool,
    /// Whether interacting with a neighbouring month's day navigates to it.
    pub allow_outside_days_navigation: bool,
    /// Whether the header shows previous/next year controls.
    pub show_year_controls: bool,
    /// Size variant.
    pub size: CalendarSize,
    /// Requested color scheme.
    pub color_scheme: ColorScheme,
    /// Token overrides applied in both modes.
    pub theme: ThemeOverrides,
    /// Token overrides applied in dark mode only.
    pub dark_theme: ThemeOverrides,
    /// Month header label formatting.
    pub month_label_options: MonthLabelOptions,
    /// Weekday label formatting.
    pub weekday_format_options: WeekdayFormatOptions,
    /// Maximum number of days scanned when looking for a focusable date.
    pub focus_scan_limit: u32,
    /// Custom day cell content.
    #[setters(strip_option, into)]
    pub render_day: Option<RenderSlotWith<DayRenderContext, String>>,
    /// Custom header content.
    #[setters(strip_option, into)]
    pub render_header: Option<RenderSlotWith<HeaderContext, String>>,
    /// Called with every committed selection.
    #[setters(strip_option, into)]
    pub on_date_select: Option<CallbackWith<CalendarDate>>,
    /// Called with the new anchor after every month navigation.
    #[setters(strip_option, into)]
    pub on_month_change: Option<CallbackWith<CalendarDate>>,
}

impl CalendarArgs {
    /// Sets the disabled dates.
    pub fn disabled_dates<I>(mut self, dates: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<DateInput>,
    {
        self.disabled_dates = dates.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the highlighted dates.
    pub fn highlighted_dates<I>(mut self, dates: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<HighlightInput>,
    {
        self.highlighted_dates = dates.into_iter().map(Into::into).collect();
        self
    }
}

impl Default for CalendarArgs {
    fn default() -> Self {
        Self {
            initial_date: None,
            selected_date: None,
            default_selected_date: None,
            min_date: None,
            max_date: None,
            disabled_dates: Vec::new(),
            highlighted_dates: Vec::new(),
            locale: DEFAULT_LOCALE.to_string(),
            week_starts_on: Weekday::Sun,
            show_weekdays: true,
            show_adjacent_days: true,
            allow_outside_days_navigation: true,
            show_year_controls: true,
            size: CalendarSize::Md,
            color_scheme: ColorScheme::System,
            theme: ThemeOverrides::default(),
            dark_theme: ThemeOverrides::default(),
            month_label_options: MonthLabelOptions::default(),
            weekday_format_options: WeekdayFormatOptions::default(),
            focus_scan_limit: DEFAULT_FOCUS_SCAN_LIMIT,
            render_day: None,
            render_header: None,
            on_date_select: None,
            on_month_change: None,
        }
    }
}
