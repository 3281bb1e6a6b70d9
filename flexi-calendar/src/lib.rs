//! A headless month calendar and date picker core.
//!
//! ## Usage
//!
//! Configure a [`Calendar`] with [`CalendarArgs`], render its day cells and
//! header with any UI toolkit, and feed key presses and clicks back into it.
//!
//! ```
//! use chrono::Weekday;
//! use flexi_calendar::{Calendar, CalendarArgs, CalendarDate, CalendarKey, KeyModifiers};
//!
//! let mut calendar = Calendar::headless(
//!     CalendarArgs::default()
//!         .initial_date("2024-03-15")
//!         .week_starts_on(Weekday::Mon)
//!         .disabled_dates(["2024-03-10"]),
//! );
//!
//! let cells = calendar.day_cells();
//! assert_eq!(cells.len(), 42);
//! assert_eq!(cells[0].key.as_str(), "2024-02-26");
//!
//! let friday = CalendarDate::new(2024, 3, 15).expect("valid date");
//! calendar.handle_key(CalendarKey::Enter, KeyModifiers::NONE, friday);
//! assert_eq!(calendar.selected_date(), Some(friday));
//! ```
#![deny(missing_docs, clippy::unwrap_used)]

pub mod args;
pub mod calendar;
pub mod color_scheme;
pub mod date;
pub mod focus;
pub mod grid;
pub mod keyboard;
pub mod locale;
pub mod marks;
pub mod prop;
pub mod state;
pub mod theme;

pub use args::CalendarArgs;
pub use calendar::{Calendar, DayCell, DayRenderContext, HeaderContext};
pub use color_scheme::{
    ColorSchemePreference, ColorSchemeState, PreferenceBroadcaster, StaticPreference, Subscription,
};
pub use date::{CalendarDate, DateInput, DateKey, DateLike};
pub use focus::{DEFAULT_FOCUS_SCAN_LIMIT, FocusController, ScanDirection, WeekEdge};
pub use grid::{MonthMatrix, generate_month_matrix};
pub use keyboard::{CalendarKey, KeyAction, KeyModifiers};
pub use locale::{MonthLabelOptions, WeekdayFormatOptions, WeekdayLabel, WeekdayStyle};
pub use marks::{Highlight, HighlightKind, HighlightSpec};
pub use prop::{CallbackWith, RenderSlotWith};
pub use state::CalendarState;
pub use theme::{CalendarSize, CalendarTheme, ColorMode, ColorScheme, ThemeOverrides};
