//! Key bindings of the day grid.
use crate::focus::WeekEdge;

/// Keys the day grid reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarKey {
    /// Left arrow.
    ArrowLeft,
    /// Right arrow.
    ArrowRight,
    /// Up arrow.
    ArrowUp,
    /// Down arrow.
    ArrowDown,
    /// Page up.
    PageUp,
    /// Page down.
    PageDown,
    /// Home.
    Home,
    /// End.
    End,
    /// Enter.
    Enter,
    /// Space bar.
    Space,
    /// A printable character.
    Character(char),
}

impl CalendarKey {
    /// Maps a DOM `KeyboardEvent.key` style name to a key.
    ///
    /// Both `" "` and the legacy `"Spacebar"` name map to [`CalendarKey::Space`].
    /// Any other single-character name becomes [`CalendarKey::Character`].
    pub fn from_key_name(name: &str) -> Option<Self> {
        let key = match name {
            "ArrowLeft" | "Left" => CalendarKey::ArrowLeft,
            "ArrowRight" | "Right" => CalendarKey::ArrowRight,
            "ArrowUp" | "Up" => CalendarKey::ArrowUp,
            "ArrowDown" | "Down" => CalendarKey::ArrowDown,
            "PageUp" => CalendarKey::PageUp,
            "PageDown" => CalendarKey::PageDown,
            "Home" => CalendarKey::Home,
            "End" => CalendarKey::End,
            "Enter" => CalendarKey::Enter,
            " " | "Spacebar" => CalendarKey::Space,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => CalendarKey::Character(c),
                    _ => return None,
                }
            }
        };
        Some(key)
    }
}

/// Modifier keys held during a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyModifiers {
    /// Shift.
    pub shift: bool,
    /// Control.
    pub ctrl: bool,
}

impl KeyModifiers {
    /// No modifiers.
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
    };

    /// Shift only.
    pub const SHIFT: Self = Self {
        shift: true,
        ctrl: false,
    };

    /// Control only.
    pub const CTRL: Self = Self {
        shift: false,
        ctrl: true,
    };

    fn pages_by_year(self) -> bool {
        self.shift || self.ctrl
    }
}

/// What a key press asks the calendar to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Move focus by a number of days.
    MoveDays(i64),
    /// Move focus by a number of months.
    MoveMonths(i32),
    /// Move focus to an edge of the displayed week.
    WeekEdge(WeekEdge),
    /// Select the cell's date.
    Select,
    /// Move focus to today.
    FocusToday,
}

/// Translates a key press on a day cell into an action.
pub fn map_key_to_action(key: CalendarKey, modifiers: KeyModifiers) -> Option<KeyAction> {
    let action = match key {
        CalendarKey::ArrowLeft => KeyAction::MoveDays(-1),
        CalendarKey::ArrowRight => KeyAction::MoveDays(1),
        CalendarKey::ArrowUp => KeyAction::MoveDays(-7),
        CalendarKey::ArrowDown => KeyAction::MoveDays(7),
        CalendarKey::PageUp if modifiers.pages_by_year() => KeyAction::MoveMonths(-12),
        CalendarKey::PageUp => KeyAction::MoveMonths(-1),
        CalendarKey::PageDown if modifiers.pages_by_year() => KeyAction::MoveMonths(12),
        CalendarKey::PageDown => KeyAction::MoveMonths(1),
        CalendarKey::Home => KeyAction::WeekEdge(WeekEdge::Start),
        CalendarKey::End => KeyAction::WeekEdge(WeekEdge::End),
        CalendarKey::Enter | CalendarKey::Space => KeyAction::Select,
        CalendarKey::Character('t' | 'T') => KeyAction::FocusToday,
        CalendarKey::Character(_) => return None,
    };
    Some(action)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_names() {
        assert_eq!(CalendarKey::from_key_name("ArrowUp"), Some(CalendarKey::ArrowUp));
        assert_eq!(CalendarKey::from_key_name(" "), Some(CalendarKey::Space));
        assert_eq!(CalendarKey::from_key_name("Spacebar"), Some(CalendarKey::Space));
        assert_eq!(CalendarKey::from_key_name("T"), Some(CalendarKey::Character('T')));
        assert_eq!(CalendarKey::from_key_name("Escape"), None);
        assert_eq!(CalendarKey::from_key_name(""), None);
    }

    #[test]
    fn test_arrow_and_page_bindings() {
        let none = KeyModifiers::NONE;
        assert_eq!(map_key_to_action(CalendarKey::ArrowLeft, none), Some(KeyAction::MoveDays(-1)));
        assert_eq!(map_key_to_action(CalendarKey::ArrowDown, none), Some(KeyAction::MoveDays(7)));
        assert_eq!(map_key_to_action(CalendarKey::PageUp, none), Some(KeyAction::MoveMonths(-1)));
        assert_eq!(
            map_key_to_action(CalendarKey::PageUp, KeyModifiers::SHIFT),
            Some(KeyAction::MoveMonths(-12))
        );
        assert_eq!(
            map_key_to_action(CalendarKey::PageDown, KeyModifiers::CTRL),
            Some(KeyAction::MoveMonths(12))
        );
    }

    #[test]
    fn test_other_bindings() {
        let none = KeyModifiers::NONE;
        assert_eq!(
            map_key_to_action(CalendarKey::Home, none),
            Some(KeyAction::WeekEdge(WeekEdge::Start))
        );
        assert_eq!(map_key_to_action(CalendarKey::Space, none), Some(KeyAction::Select));
        assert_eq!(
            map_key_to_action(CalendarKey::Character('t'), none),
            Some(KeyAction::FocusToday)
        );
        assert_eq!(map_key_to_action(CalendarKey::Character('x'), none), None);
    }
}
