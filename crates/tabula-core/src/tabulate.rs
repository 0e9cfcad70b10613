//! Render query results as terminal tables.
//!
//! [`tabulate`] takes a mapping, a [`ResultSet`] or any displayable value and
//! writes exactly one thing to the console: a table, an italic
//! `Empty QuerySet.` notice, or the value itself. Result sets are laid out
//! according to their [`Shape`] and cut off after `limit` rows, in which case
//! an ellipsis row and a caption tell how many records were left out.
//!
//! ```rust
//! use tabula_core::{tabulate, Console, Record, Tabular};
//!
//! let totals = Record::new().with("age__sum", 70);
//! let mut console = Console::new(Vec::new(), false);
//! tabulate(&mut console, Tabular::from(&totals), Some(10)).unwrap();
//!
//! let output = String::from_utf8(console.into_inner()).unwrap();
//! assert!(output.contains("┃ age__sum ┃"));
//! ```

use std::{fmt::Display, io::Write};

use log::debug;

use crate::{
    console::{Console, Table},
    error::{Result, TabulaError},
    iter::peek,
    query::{FieldPolicy, QuerySet, ResultSet, Row, Rows, Shape},
    value::{Record, Value},
};

/// Rows shown when the caller does not choose a limit.
pub const DEFAULT_LIMIT: Option<usize> = Some(10);

/// Markup written instead of a table without rows.
pub const EMPTY_NOTICE: &str = "*Empty QuerySet.*";

/// Cell text of the row marking elided records.
pub const ELLIPSIS: &str = "…";

/// Minimum table width once a caption is attached, so it wraps legibly.
const CAPTION_MIN_WIDTH: usize = 20;

/// Anything that can be tabulated.
pub enum Tabular<'a> {
    /// A single row of named values, e.g. an aggregate
    Mapping(&'a Record),
    /// A queryable result set
    Results(&'a dyn ResultSet),
    /// Any other value, printed as-is
    Value(&'a dyn Display),
}

impl<'a> From<&'a Record> for Tabular<'a> {
    fn from(record: &'a Record) -> Self {
        Tabular::Mapping(record)
    }
}

impl<'a, 'c> From<&'a QuerySet<'c>> for Tabular<'a> {
    fn from(results: &'a QuerySet<'c>) -> Self {
        Tabular::Results(results)
    }
}

/// What [`tabulate`] writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendering {
    Table(Table),
    Empty,
    Raw(String),
}

/// Tabulate `subject` and write the result to `console`.
///
/// # Errors
///
/// Returns `TabulaError::UnsupportedShape` for result sets whose shape has no
/// table layout, and propagates errors from evaluating the result set or
/// writing to the console.
pub fn tabulate<W: Write>(
    console: &mut Console<W>,
    subject: Tabular<'_>,
    limit: Option<usize>,
) -> Result<()> {
    match build(subject, limit)? {
        Rendering::Table(table) => console.print_table(&table),
        Rendering::Empty => console.print_markup(EMPTY_NOTICE),
        Rendering::Raw(text) => console.println(text),
    }
}

/// Decide how `subject` is shown, without writing anything.
pub fn build(subject: Tabular<'_>, limit: Option<usize>) -> Result<Rendering> {
    match subject {
        Tabular::Mapping(record) => {
            let mut table = Table::new(record.keys());
            table.add_row(cells(record.values()))?;
            Ok(Rendering::Table(table))
        }
        Tabular::Results(results) => build_results(results, limit),
        Tabular::Value(value) => Ok(Rendering::Raw(value.to_string())),
    }
}

fn build_results(results: &dyn ResultSet, limit: Option<usize>) -> Result<Rendering> {
    let title = results.title();
    let shape = results.shape();
    debug!("Tabulating {title} as {shape} rows, limit {limit:?}");

    let table = match shape {
        Shape::Mappings => peeked_table(results.rows(limit)?)?,
        Shape::Tuples => declared_table(results.fields()?, results.rows(limit)?)?,
        Shape::Flat => declared_table(results.fields()?, results.rows(limit)?)?,
        Shape::Named => peeked_table(results.rows(limit)?)?,
        Shape::Instances => instance_table(results, limit)?,
        Shape::Unsupported(shape) => return Err(TabulaError::UnsupportedShape { shape }),
    };
    let mut table = table.with_title(title);

    if table.row_count() == 0 {
        return Ok(Rendering::Empty);
    }

    if let Some(limit) = limit {
        let total = results.count()?;
        if limit < total {
            table.add_row(vec![ELLIPSIS; table.column_count()])?;
            table.set_caption(format!(
                "{limit} of {total} records shown. Use `limit=None` to show all records."
            ));
            table.set_min_width(CAPTION_MIN_WIDTH);
        }
    }
    Ok(Rendering::Table(table))
}

/// Headers come from the first row's own field names.
fn peeked_table(rows: Rows<'_>) -> Result<Table> {
    let (first, rows) = peek(rows);
    let headers = first.map(|row| row.field_names()).unwrap_or_default();
    let mut table = Table::new(headers);
    for row in rows {
        table.add_row(cells(&row.into_values()))?;
    }
    Ok(table)
}

/// Headers are the result set's declared fields.
fn declared_table(fields: Vec<String>, rows: Rows<'_>) -> Result<Table> {
    let mut table = Table::new(fields);
    for row in rows {
        table.add_row(cells(&row.into_values()))?;
    }
    Ok(table)
}

/// Headers are the full field list filtered through the field policy.
fn instance_table(results: &dyn ResultSet, limit: Option<usize>) -> Result<Table> {
    let (headers, policy) = match results.first_record()? {
        Some(first) => {
            let policy = results.field_policy();
            let headers: Vec<String> = first
                .keys()
                .filter(|field| policy.includes(field))
                .map(String::from)
                .collect();
            (headers, policy)
        }
        None => (Vec::new(), FieldPolicy::default()),
    };

    let mut table = Table::new(headers);
    for row in results.named_rows(limit)? {
        let row_cells = match row {
            Row::Named(record) | Row::Mapping(record) => cells(
                record
                    .iter()
                    .filter(|(field, _)| policy.includes(field))
                    .map(|(_, value)| value),
            ),
            other => cells(&other.into_values()),
        };
        table.add_row(row_cells)?;
    }
    Ok(table)
}

fn cells<'v>(values: impl IntoIterator<Item = &'v Value>) -> Vec<String> {
    values.into_iter().map(ToString::to_string).collect()
}
