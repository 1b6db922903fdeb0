use ratatui::style::{Color, Modifier, Style};

/// Terminal background type detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackgroundType {
    Dark,
    Light,
    Unknown,
}

/// Detect terminal background type from the `COLORFGBG` environment variable.
///
/// The variable has the format `"foreground;background"`.  Background values
/// 0–6 are considered dark; 7–15 are considered light.  Anything else
/// yields `BackgroundType::Unknown`.
pub fn detect_background() -> BackgroundType {
    match std::env::var("COLORFGBG") {
        Ok(val) => background_from_colorfgbg(&val),
        Err(_) => BackgroundType::Unknown,
    }
}

fn background_from_colorfgbg(val: &str) -> BackgroundType {
    match val.split(';').next_back().map(str::parse::<u8>) {
        Some(Ok(bg)) if bg <= 6 => BackgroundType::Dark,
        Some(Ok(bg)) if bg <= 15 => BackgroundType::Light,
        _ => BackgroundType::Unknown,
    }
}

/// Styles used by the histogram and summary views.
#[derive(Debug, Clone)]
pub struct Theme {
    // ── Header ───────────────────────────────────────────────────────────────
    pub header: Style,
    pub separator: Style,

    // ── Text ─────────────────────────────────────────────────────────────────
    pub text: Style,
    pub dim: Style,
    pub label: Style,
    pub value: Style,

    // ── Status ───────────────────────────────────────────────────────────────
    pub info: Style,
    pub warning: Style,
    pub error: Style,

    // ── Bars ─────────────────────────────────────────────────────────────────
    /// Bar fill; cycles through `series` per parent.
    pub bar_value: Style,
    pub bar_label: Style,
    pub series: Vec<Color>,

    // ── Table ────────────────────────────────────────────────────────────────
    pub table_header: Style,
    pub table_row: Style,
    pub table_row_alt: Style,
    pub table_total: Style,
}

impl Theme {
    /// Dark-background terminal theme (default).
    pub fn dark() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            separator: Style::default().fg(Color::DarkGray),

            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            label: Style::default().fg(Color::Gray),
            value: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),

            info: Style::default().fg(Color::Cyan),
            warning: Style::default().fg(Color::Yellow),
            error: Style::default().fg(Color::Red),

            bar_value: Style::default().fg(Color::Black).bg(Color::Gray),
            bar_label: Style::default().fg(Color::Gray),
            series: vec![
                Color::Cyan,
                Color::Magenta,
                Color::Green,
                Color::Yellow,
                Color::LightBlue,
                Color::LightRed,
            ],

            table_header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            table_row: Style::default().fg(Color::White),
            table_row_alt: Style::default().fg(Color::Gray),
            table_total: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        }
    }

    /// Light-background terminal theme.
    ///
    /// Uses dark colours for text and saturated accents that stay legible
    /// against a white terminal canvas.
    pub fn light() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            separator: Style::default().fg(Color::Gray),

            text: Style::default().fg(Color::Black),
            dim: Style::default().fg(Color::Gray),
            label: Style::default().fg(Color::DarkGray),
            value: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),

            info: Style::default().fg(Color::Blue),
            warning: Style::default().fg(Color::Rgb(180, 100, 0)),
            error: Style::default().fg(Color::Red),

            bar_value: Style::default().fg(Color::White).bg(Color::DarkGray),
            bar_label: Style::default().fg(Color::DarkGray),
            series: vec![
                Color::Blue,
                Color::Magenta,
                Color::Rgb(0, 130, 0),
                Color::Rgb(180, 100, 0),
                Color::Red,
                Color::DarkGray,
            ],

            table_header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            table_row: Style::default().fg(Color::Black),
            table_row_alt: Style::default().fg(Color::DarkGray),
            table_total: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        }
    }

    /// Basic 8-colour ANSI palette without modifiers.
    pub fn classic() -> Self {
        Self {
            header: Style::default().fg(Color::Green),
            separator: Style::default().fg(Color::White),

            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::White),
            label: Style::default().fg(Color::White),
            value: Style::default().fg(Color::Green),

            info: Style::default().fg(Color::Cyan),
            warning: Style::default().fg(Color::Yellow),
            error: Style::default().fg(Color::Red),

            bar_value: Style::default().fg(Color::Black).bg(Color::White),
            bar_label: Style::default().fg(Color::White),
            series: vec![
                Color::Green,
                Color::Cyan,
                Color::Yellow,
                Color::Magenta,
                Color::Red,
                Color::Blue,
            ],

            table_header: Style::default().fg(Color::Green),
            table_row: Style::default().fg(Color::White),
            table_row_alt: Style::default().fg(Color::White),
            table_total: Style::default().fg(Color::Yellow),
        }
    }

    /// Choose a theme automatically based on the detected terminal background.
    pub fn auto_detect() -> Self {
        match detect_background() {
            BackgroundType::Light => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Construct a theme by name.  Falls back to `auto_detect` for unknown
    /// names.
    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            "dark" => Self::dark(),
            "classic" => Self::classic(),
            _ => Self::auto_detect(),
        }
    }

    /// Bar style for the series at `index`.
    pub fn series_style(&self, index: usize) -> Style {
        match self.series.get(index % self.series.len().max(1)) {
            Some(color) => Style::default().fg(*color),
            None => self.text,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dark_theme_creation() {
        let t = Theme::dark();
        assert_eq!(t.header.fg, Some(Color::Cyan));
        assert_eq!(t.warning.fg, Some(Color::Yellow));
        assert_eq!(t.error.fg, Some(Color::Red));
        assert_eq!(t.series.len(), 6);
    }

    #[test]
    fn test_light_theme_uses_dark_text() {
        let t = Theme::light();
        assert_eq!(t.text.fg, Some(Color::Black));
        assert_eq!(t.header.fg, Some(Color::Blue));
    }

    #[test]
    fn test_classic_theme_has_no_modifiers() {
        let t = Theme::classic();
        assert!(t.header.add_modifier.is_empty());
        assert!(t.table_total.add_modifier.is_empty());
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Theme::from_name("light").text.fg, Some(Color::Black));
        assert_eq!(Theme::from_name("classic").header.fg, Some(Color::Green));
        assert_eq!(Theme::from_name("dark").header.fg, Some(Color::Cyan));
    }

    #[test]
    fn test_series_style_cycles() {
        let t = Theme::dark();
        assert_eq!(t.series_style(0).fg, Some(Color::Cyan));
        assert_eq!(t.series_style(6).fg, Some(Color::Cyan));
        assert_eq!(t.series_style(1).fg, Some(Color::Magenta));

        let empty = Theme {
            series: Vec::new(),
            ..Theme::dark()
        };
        assert_eq!(empty.series_style(3), empty.text);
    }

    #[test]
    fn test_background_from_colorfgbg() {
        assert_eq!(background_from_colorfgbg("15;0"), BackgroundType::Dark);
        assert_eq!(background_from_colorfgbg("0;15"), BackgroundType::Light);
        assert_eq!(background_from_colorfgbg("0;200"), BackgroundType::Unknown);
        assert_eq!(background_from_colorfgbg("garbage"), BackgroundType::Unknown);
    }
}
