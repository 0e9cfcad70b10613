//! Text styles used across console output.

use termimad::crossterm::style::{Attribute, Color, ContentStyle};

/// Green used for passing tests and rules.
pub const BRAND_GREEN: Color = Color::Rgb {
    r: 32,
    g: 170,
    b: 118,
};

/// A foreground colour plus text attributes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Style {
    pub color: Option<Color>,
    pub bold: bool,
    pub italic: bool,
    pub dim: bool,
}

impl Style {
    pub const PLAIN: Style = Style {
        color: None,
        bold: false,
        italic: false,
        dim: false,
    };
    pub const TABLE_TITLE: Style = Style::PLAIN.italic();
    pub const TABLE_HEADER: Style = Style::PLAIN.bold();
    pub const TABLE_CAPTION: Style = Style::PLAIN.italic().dim();
    pub const SUCCESS: Style = Style::fg(BRAND_GREEN);
    pub const FAILURE: Style = Style::fg(Color::Red);
    pub const WARNING: Style = Style::fg(Color::Yellow);

    pub const fn fg(color: Color) -> Self {
        Style {
            color: Some(color),
            ..Style::PLAIN
        }
    }

    pub const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub const fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub const fn dim(mut self) -> Self {
        self.dim = true;
        self
    }

    pub fn is_plain(&self) -> bool {
        *self == Style::PLAIN
    }

    /// Wrap `text` in the terminal escape sequences for this style.
    pub fn apply(&self, text: &str) -> String {
        if self.is_plain() {
            return text.to_string();
        }
        let mut style = ContentStyle::new();
        style.foreground_color = self.color;
        for (enabled, attribute) in [
            (self.bold, Attribute::Bold),
            (self.italic, Attribute::Italic),
            (self.dim, Attribute::Dim),
        ] {
            if enabled {
                style.attributes.set(attribute);
            }
        }
        style.apply(text).to_string()
    }
}
