//! Bordered tables with an optional title and caption.
//!
//! Rendering uses a heavy box for the header and a light box for the body:
//!
//! ```text
//!        People
//! ┏━━━━┳━━━━━━━━━━━━━━━┓
//! ┃ id ┃ name          ┃
//! ┡━━━━╇━━━━━━━━━━━━━━━┩
//! │ 1  │ Ash           │
//! └────┴───────────────┘
//! ```

use super::{
    style::Style,
    text::{center, measure, wrap},
};
use crate::error::{Result, TabulaError};

/// A table of string cells.
///
/// Every row has exactly as many cells as there are headers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    title: Option<String>,
    caption: Option<String>,
    min_width: Option<usize>,
}

impl Table {
    /// Create a table with the given column headers.
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn set_caption(&mut self, caption: impl Into<String>) {
        self.caption = Some(caption.into());
    }

    pub fn set_min_width(&mut self, width: usize) {
        self.min_width = Some(width);
    }

    /// Append a row, rejecting it unless it has one cell per header.
    pub fn add_row<I, S>(&mut self, cells: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let row: Vec<String> = cells.into_iter().map(Into::into).collect();
        if row.len() != self.headers.len() {
            return Err(TabulaError::RowWidth {
                expected: self.headers.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn caption(&self) -> Option<&str> {
        self.caption.as_deref()
    }

    pub fn min_width(&self) -> Option<usize> {
        self.min_width
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Column content widths, widened evenly to honour the minimum width.
    fn column_widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| measure(h)).collect();
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(measure(cell));
            }
        }

        let columns = widths.len();
        if let Some(min_width) = self.min_width {
            let natural = table_width(&widths);
            if columns > 0 && min_width > natural {
                let extra = min_width - natural;
                for (i, width) in widths.iter_mut().enumerate() {
                    *width += extra / columns + usize::from(i < extra % columns);
                }
            }
        }
        widths
    }

    /// Render to lines, styling text through `paint`.
    pub(crate) fn render_lines(&self, paint: impl Fn(&str, Style) -> String) -> Vec<String> {
        if self.headers.is_empty() {
            return vec![String::new()];
        }

        let widths = self.column_widths();
        let width = table_width(&widths);
        let mut lines = Vec::with_capacity(self.rows.len() + 6);

        if let Some(title) = &self.title {
            lines.push(paint(&center(title, width), Style::TABLE_TITLE));
        }

        lines.push(border(&widths, '┏', '━', '┳', '┓'));
        lines.push(content(&self.headers, &widths, '┃', |cell| {
            paint(cell, Style::TABLE_HEADER)
        }));
        lines.push(border(&widths, '┡', '━', '╇', '┩'));
        for row in &self.rows {
            lines.push(content(row, &widths, '│', str::to_string));
        }
        lines.push(border(&widths, '└', '─', '┴', '┘'));

        if let Some(caption) = &self.caption {
            for line in wrap(caption, width) {
                lines.push(paint(&center(&line, width), Style::TABLE_CAPTION));
            }
        }
        lines
    }
}

fn table_width(widths: &[usize]) -> usize {
    widths.iter().sum::<usize>() + 3 * widths.len() + 1
}

fn border(widths: &[usize], left: char, fill: char, join: char, right: char) -> String {
    let segments: Vec<String> = widths
        .iter()
        .map(|w| fill.to_string().repeat(w + 2))
        .collect();
    format!("{left}{}{right}", segments.join(&join.to_string()))
}

fn content(
    cells: &[String],
    widths: &[usize],
    edge: char,
    paint: impl Fn(&str) -> String,
) -> String {
    let mut line = String::new();
    line.push(edge);
    for (cell, &width) in cells.iter().zip(widths) {
        let padded = format!("{cell:<width$}");
        line.push(' ');
        line.push_str(&paint(&padded));
        line.push(' ');
        line.push(edge);
    }
    line
}
