//! Disabled-date sets and highlighted-date maps keyed by [`DateKey`].
use chrono::NaiveDate;
use derive_setters::Setters;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::trace;

use crate::date::{CalendarDate, DateInput, DateKey, DateLike};

/// Dates that cannot be selected or focused.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisabledSet {
    keys: FxHashSet<DateKey>,
}

impl DisabledSet {
    /// Returns true when the date is disabled.
    pub fn contains(&self, date: CalendarDate) -> bool {
        self.keys.contains(&date.key())
    }

    /// Returns true when the key is disabled.
    pub fn contains_key(&self, key: &DateKey) -> bool {
        self.keys.contains(key)
    }

    /// Number of distinct disabled dates.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns true when nothing is disabled.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Iterates the disabled keys in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &DateKey> {
        self.keys.iter()
    }
}

/// Builds a [`DisabledSet`] from date-like values, dropping entries that do
/// not resolve to a date.
pub fn build_date_set<I>(values: I) -> DisabledSet
where
    I: IntoIterator,
    I::Item: DateLike,
{
    let keys = values
        .into_iter()
        .filter_map(|value| {
            let date = value.to_calendar_date();
            if date.is_none() {
                trace!("dropping unparseable disabled date");
            }
            date
        })
        .map(DateKey::from)
        .collect();
    DisabledSet { keys }
}

/// How a highlighted date is decorated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HighlightKind {
    /// A small dot under the day number.
    #[default]
    Dot,
    /// A badge, optionally carrying a label.
    Badge,
    /// No built-in decoration; styling comes from the class name or color.
    None,
}

/// Metadata attached to a highlighted date.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Highlight {
    /// Decoration kind.
    pub kind: HighlightKind,
    /// Extra class name appended to the day cell.
    pub class_name: String,
    /// Highlight color override.
    pub color: Option<String>,
    /// Badge label.
    pub label: Option<String>,
}

impl Highlight {
    /// Returns true when a badge is rendered.
    pub fn shows_badge(&self) -> bool {
        self.visible_label().is_some() || self.kind == HighlightKind::Badge
    }

    /// Returns the badge text, if a badge is rendered.
    pub fn badge_content(&self) -> Option<&str> {
        match (self.visible_label(), self.kind) {
            (Some(label), _) => Some(label),
            (None, HighlightKind::Badge) => Some(""),
            _ => None,
        }
    }

    /// An empty label counts as no label.
    fn visible_label(&self) -> Option<&str> {
        self.label.as_deref().filter(|label| !label.is_empty())
    }

    /// Returns true when a dot is rendered.
    pub fn shows_dot(&self) -> bool {
        self.kind == HighlightKind::Dot
    }
}

/// A highlighted date with explicit decoration options.
#[derive(Debug, Clone, PartialEq, Eq, Setters)]
pub struct HighlightSpec {
    /// The date to highlight.
    #[setters(skip)]
    pub date: DateInput,
    /// Decoration kind; defaults to a dot.
    #[setters(strip_option)]
    pub kind: Option<HighlightKind>,
    /// Extra class name for the cell.
    #[setters(strip_option, into)]
    pub class_name: Option<String>,
    /// Highlight color override.
    #[setters(strip_option, into)]
    pub color: Option<String>,
    /// Badge label.
    #[setters(strip_option, into)]
    pub label: Option<String>,
}

impl HighlightSpec {
    /// Creates a spec for the given date with default decoration.
    pub fn new(date: impl Into<DateInput>) -> Self {
        Self {
            date: date.into(),
            kind: None,
            class_name: None,
            color: None,
            label: None,
        }
    }
}

/// One entry of the highlighted-dates configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HighlightInput {
    /// A bare date, highlighted with a dot.
    Date(DateInput),
    /// A date with decoration options.
    Detailed(HighlightSpec),
}

macro_rules! highlight_input_from_date {
    ($($source:ty),* $(,)?) => {
        $(
            impl From<$source> for HighlightInput {
                fn from(value: $source) -> Self {
                    HighlightInput::Date(value.into())
                }
            }
        )*
    };
}

highlight_input_from_date!(DateInput, CalendarDate, NaiveDate, &str, String, i64);

impl From<HighlightSpec> for HighlightInput {
    fn from(spec: HighlightSpec) -> Self {
        HighlightInput::Detailed(spec)
    }
}

/// Highlight metadata keyed by date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighlightedMap {
    entries: FxHashMap<DateKey, Highlight>,
}

impl HighlightedMap {
    /// Returns the highlight of a date, if any.
    pub fn get(&self, date: CalendarDate) -> Option<&Highlight> {
        self.entries.get(&date.key())
    }

    /// Returns the highlight stored under a key, if any.
    pub fn get_key(&self, key: &DateKey) -> Option<&Highlight> {
        self.entries.get(key)
    }

    /// Returns true when the date is highlighted.
    pub fn contains(&self, date: CalendarDate) -> bool {
        self.entries.contains_key(&date.key())
    }

    /// Number of highlighted dates.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when no date is highlighted.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&DateKey, &Highlight)> {
        self.entries.iter()
    }
}

/// Builds a [`HighlightedMap`], dropping entries without a resolvable date.
/// A later entry for the same day replaces an earlier one.
pub fn build_highlighted_map<I>(values: I) -> HighlightedMap
where
    I: IntoIterator,
    I::Item: Into<HighlightInput>,
{
    let mut entries = FxHashMap::default();
    for value in values {
        let (date, highlight) = match value.into() {
            HighlightInput::Date(input) => (input.to_calendar_date(), Highlight::default()),
            HighlightInput::Detailed(spec) => (
                spec.date.to_calendar_date(),
                Highlight {
                    kind: spec.kind.unwrap_or_default(),
                    class_name: spec.class_name.unwrap_or_default(),
                    color: spec.color,
                    label: spec.label,
                },
            ),
        };
        match date {
            Some(date) => {
                entries.insert(date.key(), highlight);
            }
            None => trace!("dropping unparseable highlighted date"),
        }
    }
    HighlightedMap { entries }
}
