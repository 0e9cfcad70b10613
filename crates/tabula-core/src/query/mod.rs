//! Queryable result sets.
//!
//! The tabulator never talks to a database directly. It consumes anything
//! implementing [`ResultSet`]: a lazily evaluated sequence of rows tagged with
//! the [`Shape`] those rows come in. [`QuerySet`] is the SQLite-backed
//! implementation used by the CLI and the integration tests.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │    QuerySet     │    │    ResultSet    │    │    Tabulator    │
//! │ (SQL builder)   │───▶│ (shape + rows)  │───▶│ (Table/Console) │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```

use std::collections::BTreeSet;
use std::fmt;

use crate::{
    error::Result,
    value::{Record, Value},
};

pub mod model;
pub mod queryset;

pub use model::Model;
pub use queryset::QuerySet;

/// The structural kind of rows a result set yields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    /// Rows are key-value mappings (`values()`)
    Mappings,
    /// Rows are plain tuples (`values_list()`)
    Tuples,
    /// Rows are single flat values (`values_list(flat)`)
    Flat,
    /// Rows are named tuples (`values_list(named)`)
    Named,
    /// Rows are full model instances (`all()`)
    Instances,
    /// Any other iteration mode, identified by name
    Unsupported(String),
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Mappings => write!(f, "mappings"),
            Shape::Tuples => write!(f, "tuples"),
            Shape::Flat => write!(f, "flat"),
            Shape::Named => write!(f, "named"),
            Shape::Instances => write!(f, "instances"),
            Shape::Unsupported(name) => write!(f, "{name}"),
        }
    }
}

/// Which fields of a model instance are loaded and displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldPolicy {
    /// Only the named fields
    Only(BTreeSet<String>),
    /// Every field except the named ones
    AllExcept(BTreeSet<String>),
}

impl FieldPolicy {
    /// Whether a field passes this policy.
    pub fn includes(&self, field: &str) -> bool {
        match self {
            FieldPolicy::Only(fields) => fields.contains(field),
            FieldPolicy::AllExcept(fields) => !fields.contains(field),
        }
    }
}

impl Default for FieldPolicy {
    fn default() -> Self {
        FieldPolicy::AllExcept(BTreeSet::new())
    }
}

/// One row of a result set, in the form its shape produces.
#[derive(Debug, Clone, PartialEq)]
pub enum Row {
    Mapping(Record),
    Tuple(Vec<Value>),
    Flat(Value),
    Named(Record),
}

impl Row {
    /// Field names carried by the row itself, if any.
    pub fn field_names(&self) -> Vec<String> {
        match self {
            Row::Mapping(record) | Row::Named(record) => {
                record.keys().map(String::from).collect()
            }
            Row::Tuple(_) | Row::Flat(_) => Vec::new(),
        }
    }

    /// The row's values in order.
    pub fn into_values(self) -> Vec<Value> {
        match self {
            Row::Mapping(record) | Row::Named(record) => {
                record.into_iter().map(|(_, v)| v).collect()
            }
            Row::Tuple(values) => values,
            Row::Flat(value) => vec![value],
        }
    }
}

/// A bounded stream of rows.
pub type Rows<'a> = Box<dyn Iterator<Item = Row> + 'a>;

/// A lazily evaluated, ordered sequence of rows with a declared shape.
///
/// Implementations may evaluate the underlying query more than once; the
/// tabulator calls [`ResultSet::count`] separately from the row iteration.
pub trait ResultSet {
    /// The declared shape of the rows produced by [`ResultSet::rows`].
    fn shape(&self) -> Shape;

    /// Human-readable, pluralized title of the rows' model.
    fn title(&self) -> String;

    /// Declared field names, used for tuple and flat shapes.
    fn fields(&self) -> Result<Vec<String>>;

    /// Field-inclusion policy for model-instance rows.
    fn field_policy(&self) -> FieldPolicy {
        FieldPolicy::default()
    }

    /// Total number of rows, regardless of any display limit.
    fn count(&self) -> Result<usize>;

    /// Up to `limit` rows in the declared shape.
    fn rows(&self, limit: Option<usize>) -> Result<Rows<'_>>;

    /// The first row projected as a full key-value mapping.
    fn first_record(&self) -> Result<Option<Record>>;

    /// Up to `limit` rows re-projected as named rows over all fields.
    fn named_rows(&self, limit: Option<usize>) -> Result<Rows<'_>>;
}
