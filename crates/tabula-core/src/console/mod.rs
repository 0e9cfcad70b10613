//! Styled terminal output.
//!
//! [`Console`] is the single sink every output path writes through: tables,
//! inline markdown markup, styled status words and horizontal rules. Colour
//! is decided once, when the console is created, from a [`ColorChoice`] and
//! whether the target is a terminal; a console without colour writes plain
//! text with the markup stripped.
//!
//! ```rust
//! use tabula_core::console::{Console, Table};
//!
//! let mut table = Table::new(["age__sum"]);
//! table.add_row(["70"]).unwrap();
//!
//! let mut console = Console::new(Vec::new(), false);
//! console.print_table(&table).unwrap();
//! console.print_markup("*Empty QuerySet.*").unwrap();
//!
//! let output = String::from_utf8(console.into_inner()).unwrap();
//! assert!(output.contains("│ 70       │"));
//! assert!(output.ends_with("Empty QuerySet.\n"));
//! ```

use std::{
    env,
    fmt::Display,
    io::{self, IsTerminal, Stderr, Stdout, Write},
};

use termimad::{crossterm::style::Color, minimad::Composite, MadSkin};

use crate::error::{Result, TabulaError};

pub mod style;
pub mod table;
pub mod text;

pub use style::Style;
pub use table::Table;

/// Width used when neither `COLUMNS` nor the terminal report one.
pub const DEFAULT_WIDTH: usize = 80;

/// When to emit colour and text attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorChoice {
    /// Colour when writing to a terminal and `NO_COLOR` is unset
    #[default]
    Auto,
    /// Always colour
    Always,
    /// Never colour
    Never,
}

impl ColorChoice {
    /// Combine the `--no-color` and `--force-color` flags.
    pub fn from_flags(no_color: bool, force_color: bool) -> Result<Self> {
        match (no_color, force_color) {
            (true, true) => Err(TabulaError::ConflictingColorFlags),
            (true, false) => Ok(ColorChoice::Never),
            (false, true) => Ok(ColorChoice::Always),
            (false, false) => Ok(ColorChoice::Auto),
        }
    }

    /// Whether colour is enabled for a target.
    pub fn enabled(self, is_terminal: bool) -> bool {
        match self {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => is_terminal && env::var_os("NO_COLOR").is_none(),
        }
    }
}

/// A writer that renders tables, markup and styled text.
pub struct Console<W: Write> {
    out: W,
    color: bool,
    width: usize,
    skin: MadSkin,
}

impl Console<Stdout> {
    /// A console on standard output.
    pub fn stdout(choice: ColorChoice) -> Self {
        let out = io::stdout();
        let color = choice.enabled(out.is_terminal());
        Console::new(out, color)
    }
}

impl Console<Stderr> {
    /// A console on standard error.
    pub fn stderr(choice: ColorChoice) -> Self {
        let out = io::stderr();
        let color = choice.enabled(out.is_terminal());
        Console::new(out, color)
    }
}

impl<W: Write> Console<W> {
    /// Create a console over any writer.
    pub fn new(out: W, color: bool) -> Self {
        let skin = if color {
            let mut skin = MadSkin::default();
            skin.set_headers_fg(Color::Blue);
            skin.bold.set_fg(Color::Yellow);
            skin.italic.set_fg(Color::Magenta);
            skin.inline_code.set_bg(Color::AnsiValue(238));
            skin
        } else {
            MadSkin::no_style()
        };

        Self {
            out,
            color,
            width: detect_width(),
            skin,
        }
    }

    /// Override the detected width.
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width.max(1);
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn is_color(&self) -> bool {
        self.color
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Apply `style` to `text` if colour is enabled.
    pub fn paint(&self, text: &str, style: Style) -> String {
        if self.color {
            style.apply(text)
        } else {
            text.to_string()
        }
    }

    /// Write a value followed by a newline.
    pub fn println(&mut self, value: impl Display) -> Result<()> {
        writeln!(self.out, "{value}")?;
        Ok(())
    }

    /// Write styled text followed by a newline.
    pub fn print_styled(&mut self, text: &str, style: Style) -> Result<()> {
        let painted = self.paint(text, style);
        writeln!(self.out, "{painted}")?;
        Ok(())
    }

    /// Write styled text without a newline and flush, for progress output.
    pub fn print_styled_inline(&mut self, text: &str, style: Style) -> Result<()> {
        let painted = self.paint(text, style);
        write!(self.out, "{painted}")?;
        self.out.flush()?;
        Ok(())
    }

    /// Write one line of inline markdown (`*italic*`, `**bold**`, `` `code` ``).
    pub fn print_markup(&mut self, markup: &str) -> Result<()> {
        if self.color {
            writeln!(self.out, "{}", self.skin.inline(markup))?;
        } else {
            writeln!(self.out, "{}", strip_markup(markup))?;
        }
        Ok(())
    }

    /// Write a full-width horizontal rule.
    pub fn rule(&mut self, style: Style) -> Result<()> {
        let line = "─".repeat(self.width);
        self.print_styled(&line, style)
    }

    /// Write a rule, a title line and another rule.
    pub fn titled_rule(&mut self, title: &str, style: Style) -> Result<()> {
        self.rule(style)?;
        self.println(title)?;
        self.rule(style)
    }

    /// Render a table.
    pub fn print_table(&mut self, table: &Table) -> Result<()> {
        let lines = table.render_lines(|text, style| self.paint(text, style));
        for line in lines {
            writeln!(self.out, "{line}")?;
        }
        Ok(())
    }
}

/// Drop markdown markers, keeping the text.
pub fn strip_markup(markup: &str) -> String {
    Composite::from_inline(markup)
        .compounds
        .iter()
        .map(|compound| compound.src)
        .collect()
}

fn detect_width() -> usize {
    env::var("COLUMNS")
        .ok()
        .and_then(|columns| columns.trim().parse::<usize>().ok())
        .filter(|&columns| columns > 0)
        .or_else(|| {
            termimad::crossterm::terminal::size()
                .ok()
                .map(|(columns, _)| usize::from(columns))
                .filter(|&columns| columns > 0)
        })
        .unwrap_or(DEFAULT_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn captured(console: Console<Vec<u8>>) -> String {
        String::from_utf8(console.into_inner()).expect("console output is UTF-8")
    }

    #[test]
    fn test_conflicting_flags() {
        let err = ColorChoice::from_flags(true, true).unwrap_err();
        assert_eq!(
            err.to_string(),
            "The --no-color and --force-color options can't be used together."
        );
    }

    #[test]
    fn test_flag_resolution() {
        assert_eq!(ColorChoice::from_flags(true, false).unwrap(), ColorChoice::Never);
        assert_eq!(ColorChoice::from_flags(false, true).unwrap(), ColorChoice::Always);
        assert_eq!(ColorChoice::from_flags(false, false).unwrap(), ColorChoice::Auto);
        assert!(ColorChoice::Always.enabled(false));
        assert!(!ColorChoice::Never.enabled(true));
        assert!(!ColorChoice::Auto.enabled(false));
    }

    #[test]
    fn test_plain_markup_is_stripped() {
        let mut console = Console::new(Vec::new(), false);
        console.print_markup("**Alert!**").unwrap();
        assert_eq!(captured(console), "Alert!\n");
    }

    #[test]
    fn test_colored_markup_has_escape_codes() {
        let mut console = Console::new(Vec::new(), true);
        console.print_markup("**Alert!**").unwrap();
        let output = captured(console);
        assert!(output.contains("\x1b["));
        assert!(output.contains("Alert!"));
    }

    #[test]
    fn test_titled_rule_spans_width() {
        let mut console = Console::new(Vec::new(), false).with_width(10);
        console.titled_rule("FAIL: x", Style::SUCCESS).unwrap();
        assert_eq!(captured(console), "──────────\nFAIL: x\n──────────\n");
    }

    #[test]
    fn test_width_override_is_clamped() {
        let console = Console::new(Vec::new(), false).with_width(0);
        assert_eq!(console.width(), 1);
        let console = Console::new(Vec::new(), false).with_width(120);
        assert_eq!(console.width(), 120);
    }

    #[test]
    fn test_inline_styled_has_no_newline() {
        let mut console = Console::new(Vec::new(), false);
        console.print_styled_inline(".", Style::SUCCESS).unwrap();
        console.print_styled_inline("F", Style::FAILURE).unwrap();
        assert_eq!(captured(console), ".F");
    }
}
