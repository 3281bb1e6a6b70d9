//! Light and dark style tokens, size variants and class-name helpers.
//!
//! ## Usage
//!
//! Merge caller overrides onto the built-in token sets and hand the
//! resulting CSS custom properties to the presentation layer.
use std::borrow::Cow;

use derive_setters::Setters;

/// Requested color scheme of a calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorScheme {
    /// Always light.
    Light,
    /// Always dark.
    Dark,
    /// Follow the host's ambient preference.
    #[default]
    System,
}

/// Color mode actually used for display after resolving [`ColorScheme`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    /// Light tokens.
    #[default]
    Light,
    /// Dark tokens.
    Dark,
}

impl ColorMode {
    /// Returns the mode for a dark flag.
    pub fn from_dark(is_dark: bool) -> Self {
        if is_dark { ColorMode::Dark } else { ColorMode::Light }
    }

    /// Returns the lowercase name used in class names and data attributes.
    pub fn as_str(self) -> &'static str {
        match self {
            ColorMode::Light => "light",
            ColorMode::Dark => "dark",
        }
    }
}

/// Overall size variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CalendarSize {
    /// Compact.
    Sm,
    /// Regular.
    #[default]
    Md,
    /// Large.
    Lg,
}

impl CalendarSize {
    /// Returns the class-name token for this size.
    pub fn as_str(self) -> &'static str {
        match self {
            CalendarSize::Sm => "sm",
            CalendarSize::Md => "md",
            CalendarSize::Lg => "lg",
        }
    }
}

/// A complete set of style tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarTheme {
    /// Surface background.
    pub background: Cow<'static, str>,
    /// Outline color.
    pub border_color: Cow<'static, str>,
    /// Corner radius.
    pub border_radius: Cow<'static, str>,
    /// Primary text color.
    pub text_color: Cow<'static, str>,
    /// Secondary text color (weekday row, outside days).
    pub muted_text_color: Cow<'static, str>,
    /// Accent color.
    pub accent_color: Cow<'static, str>,
    /// Text drawn on the accent color.
    pub accent_text_color: Cow<'static, str>,
    /// Hovered cell background.
    pub hover_color: Cow<'static, str>,
    /// Selected cell background.
    pub selected_bg_color: Cow<'static, str>,
    /// Selected cell text.
    pub selected_text_color: Cow<'static, str>,
    /// Disabled cell text.
    pub disabled_text_color: Cow<'static, str>,
    /// Default highlight color.
    pub highlight_color: Cow<'static, str>,
    /// Focus ring shadow.
    pub focus_ring: Cow<'static, str>,
    /// Font stack.
    pub font_family: Cow<'static, str>,
    /// Surface shadow.
    pub shadow: Cow<'static, str>,
}

const FONT_FAMILY: &str =
    "'Inter', system-ui, -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif";

impl CalendarTheme {
    /// Built-in light tokens.
    pub fn light() -> Self {
        Self {
            background: "#ffffff".into(),
            border_color: "#e5e7eb".into(),
            border_radius: "16px".into(),
            text_color: "#111827".into(),
            muted_text_color: "#6b7280".into(),
            accent_color: "#2563eb".into(),
            accent_text_color: "#ffffff".into(),
            hover_color: "#bbd9ff".into(),
            selected_bg_color: "#2563eb".into(),
            selected_text_color: "#ffffff".into(),
            disabled_text_color: "#9ca3af".into(),
            highlight_color: "#f97316".into(),
            focus_ring: "0 0 0 3px rgba(37, 99, 235, 0.35)".into(),
            font_family: FONT_FAMILY.into(),
            shadow: "0 12px 32px rgba(15, 23, 42, 0.08)".into(),
        }
    }

    /// Built-in dark tokens.
    pub fn dark() -> Self {
        Self {
            background: "#111827".into(),
            border_color: "#1f2937".into(),
            border_radius: "16px".into(),
            text_color: "#f9fafb".into(),
            muted_text_color: "#94a3b8".into(),
            accent_color: "#60a5fa".into(),
            accent_text_color: "#0f172a".into(),
            hover_color: "rgba(59, 130, 246, 0.12)".into(),
            selected_bg_color: "#2563eb".into(),
            selected_text_color: "#f9fafb".into(),
            disabled_text_color: "#475569".into(),
            highlight_color: "#facc15".into(),
            focus_ring: "0 0 0 3px rgba(96, 165, 250, 0.45)".into(),
            font_family: FONT_FAMILY.into(),
            shadow: "0 18px 40px rgba(2, 6, 23, 0.55)".into(),
        }
    }

    /// Returns a copy with every token set in `overrides` replaced.
    pub fn merged(mut self, overrides: &ThemeOverrides) -> Self {
        let pairs = [
            (&mut self.background, &overrides.background),
            (&mut self.border_color, &overrides.border_color),
            (&mut self.border_radius, &overrides.border_radius),
            (&mut self.text_color, &overrides.text_color),
            (&mut self.muted_text_color, &overrides.muted_text_color),
            (&mut self.accent_color, &overrides.accent_color),
            (&mut self.accent_text_color, &overrides.accent_text_color),
            (&mut self.hover_color, &overrides.hover_color),
            (&mut self.selected_bg_color, &overrides.selected_bg_color),
            (&mut self.selected_text_color, &overrides.selected_text_color),
            (&mut self.disabled_text_color, &overrides.disabled_text_color),
            (&mut self.highlight_color, &overrides.highlight_color),
            (&mut self.focus_ring, &overrides.focus_ring),
            (&mut self.font_family, &overrides.font_family),
            (&mut self.shadow, &overrides.shadow),
        ];
        for (token, value) in pairs {
            if let Some(value) = value {
                *token = Cow::Owned(value.clone());
            }
        }
        self
    }

    /// Returns the CSS custom properties for the root element.
    ///
    /// The final entry is the plain `font-family` property.
    pub fn style_variables(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("--flexi-cal-bg", self.background.as_ref()),
            ("--flexi-cal-border", self.border_color.as_ref()),
            ("--flexi-cal-radius", self.border_radius.as_ref()),
            ("--flexi-cal-text", self.text_color.as_ref()),
            ("--flexi-cal-muted-text", self.muted_text_color.as_ref()),
            ("--flexi-cal-accent", self.accent_color.as_ref()),
            ("--flexi-cal-accent-text", self.accent_text_color.as_ref()),
            ("--flexi-cal-hover", self.hover_color.as_ref()),
            ("--flexi-cal-selected-bg", self.selected_bg_color.as_ref()),
            ("--flexi-cal-selected-text", self.selected_text_color.as_ref()),
            ("--flexi-cal-disabled-text", self.disabled_text_color.as_ref()),
            ("--flexi-cal-highlight", self.highlight_color.as_ref()),
            ("--flexi-cal-focus", self.focus_ring.as_ref()),
            ("--flexi-cal-shadow", self.shadow.as_ref()),
            ("font-family", self.font_family.as_ref()),
        ]
    }
}

impl Default for CalendarTheme {
    fn default() -> Self {
        Self::light()
    }
}

/// Partial token set; unset tokens keep the built-in value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Setters)]
#[setters(strip_option, into)]
pub struct ThemeOverrides {
    /// Surface background.
    pub background: Option<String>,
    /// Outline color.
    pub border_color: Option<String>,
    /// Corner radius.
    pub border_radius: Option<String>,
    /// Primary text color.
    pub text_color: Option<String>,
    /// Secondary text color.
    pub muted_text_color: Option<String>,
    /// Accent color.
    pub accent_color: Option<String>,
    /// Text drawn on the accent color.
    pub accent_text_color: Option<String>,
    /// Hovered cell background.
    pub hover_color: Option<String>,
    /// Selected cell background.
    pub selected_bg_color: Option<String>,
    /// Selected cell text.
    pub selected_text_color: Option<String>,
    /// Disabled cell text.
    pub disabled_text_color: Option<String>,
    /// Default highlight color.
    pub highlight_color: Option<String>,
    /// Focus ring shadow.
    pub focus_ring: Option<String>,
    /// Font stack.
    pub font_family: Option<String>,
    /// Surface shadow.
    pub shadow: Option<String>,
}

/// Resolves the light and dark token sets for a calendar.
///
/// `theme` applies to both modes; `dark_theme` applies on top of it in dark
/// mode only.
pub fn resolve_themes(theme: &ThemeOverrides, dark_theme: &ThemeOverrides) -> (CalendarTheme, CalendarTheme) {
    let light = CalendarTheme::light().merged(theme);
    let dark = CalendarTheme::dark().merged(theme).merged(dark_theme);
    (light, dark)
}

/// Joins a BEM-style base class with `base--modifier` for every enabled
/// modifier, in order.
pub fn build_class_name(base: &str, modifiers: &[(&str, bool)]) -> String {
    let mut class_name = String::from(base);
    for (modifier, enabled) in modifiers {
        if *enabled {
            class_name.push(' ');
            class_name.push_str(base);
            class_name.push_str("--");
            class_name.push_str(modifier);
        }
    }
    class_name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_apply_to_both_modes() {
        let theme = ThemeOverrides::default().accent_color("#ff00ff");
        let dark_theme = ThemeOverrides::default().background("#000000");
        let (light, dark) = resolve_themes(&theme, &dark_theme);

        assert_eq!(light.accent_color, "#ff00ff");
        assert_eq!(light.background, "#ffffff");
        assert_eq!(dark.accent_color, "#ff00ff");
        assert_eq!(dark.background, "#000000");
        assert_eq!(dark.text_color, "#f9fafb");
    }

    #[test]
    fn test_dark_overrides_win_over_shared_overrides() {
        let theme = ThemeOverrides::default().highlight_color("red");
        let dark_theme = ThemeOverrides::default().highlight_color("gold");
        let (light, dark) = resolve_themes(&theme, &dark_theme);
        assert_eq!(light.highlight_color, "red");
        assert_eq!(dark.highlight_color, "gold");
    }

    #[test]
    fn test_style_variables_order() {
        let theme = CalendarTheme::light();
        let vars = theme.style_variables();
        assert_eq!(vars.len(), 15);
        assert_eq!(vars[0], ("--flexi-cal-bg", "#ffffff"));
        assert_eq!(vars[12].0, "--flexi-cal-focus");
        assert_eq!(vars[14].0, "font-family");
    }

    #[test]
    fn test_build_class_name() {
        assert_eq!(
            build_class_name("flexi-calendar__day", &[("outside", true), ("disabled", false), ("today", true)]),
            "flexi-calendar__day flexi-calendar__day--outside flexi-calendar__day--today"
        );
        assert_eq!(build_class_name("flexi-calendar", &[]), "flexi-calendar");
    }

    #[test]
    fn test_color_mode_names() {
        assert_eq!(ColorMode::from_dark(true), ColorMode::Dark);
        assert_eq!(ColorMode::from_dark(false).as_str(), "light");
        assert_eq!(CalendarSize::default().as_str(), "md");
    }
}
