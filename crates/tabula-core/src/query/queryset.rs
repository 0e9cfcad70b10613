//! SQLite-backed query sets.

use std::collections::BTreeSet;

use log::debug;
use rusqlite::{types::Value as SqlValue, Connection};

use super::{FieldPolicy, Model, ResultSet, Row, Rows, Shape};
use crate::{
    error::{DatabaseResultExt, Result, TabulaError},
    value::{Record, Value},
};

/// A lazily evaluated query over one table.
///
/// Nothing touches the database until rows or a count are requested, and
/// every request re-runs the query. Builder methods consume and return the
/// query set, so chains read like the query they describe:
///
/// ```rust
/// use rusqlite::Connection;
/// use tabula_core::query::{Model, QuerySet, ResultSet};
///
/// # fn example() -> tabula_core::Result<()> {
/// let conn = Connection::open_in_memory().unwrap();
/// conn.execute_batch("CREATE TABLE person (id INTEGER PRIMARY KEY, name TEXT, age INTEGER)")
///     .unwrap();
///
/// let people = QuerySet::new(&conn, Model::new("person"))
///     .values(&["name"])
///     .filter("age > 18")
///     .order_by("name");
/// assert_eq!(people.count()?, 0);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct QuerySet<'c> {
    conn: &'c Connection,
    model: Model,
    shape: Shape,
    selected: Vec<String>,
    annotations: Vec<(String, String)>,
    policy: FieldPolicy,
    filters: Vec<String>,
    ordering: Vec<String>,
    is_none: bool,
}

impl<'c> QuerySet<'c> {
    /// A query set over every row of the model, yielding model instances.
    pub fn new(conn: &'c Connection, model: Model) -> Self {
        Self {
            conn,
            model,
            shape: Shape::Instances,
            selected: Vec::new(),
            annotations: Vec::new(),
            policy: FieldPolicy::default(),
            filters: Vec::new(),
            ordering: Vec::new(),
            is_none: false,
        }
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Yield full model instances again, dropping any projection.
    pub fn all(self) -> Self {
        self.project(Shape::Instances, &[])
    }

    /// Yield key-value mappings of `fields` (all fields when empty).
    pub fn values(self, fields: &[&str]) -> Self {
        self.project(Shape::Mappings, fields)
    }

    /// Yield tuples of `fields` (all fields when empty).
    pub fn values_list(self, fields: &[&str]) -> Self {
        self.project(Shape::Tuples, fields)
    }

    /// Yield the single value of `field` per row.
    pub fn values_list_flat(self, field: &str) -> Self {
        self.project(Shape::Flat, &[field])
    }

    /// Yield named rows of `fields` (all fields when empty).
    pub fn values_list_named(self, fields: &[&str]) -> Self {
        self.project(Shape::Named, fields)
    }

    fn project(mut self, shape: Shape, fields: &[&str]) -> Self {
        self.shape = shape;
        self.selected = fields.iter().map(|f| f.to_string()).collect();
        self
    }

    /// Load and display only `fields` of each instance. Fields deferred
    /// earlier stay out.
    pub fn only(mut self, fields: &[&str]) -> Self {
        let mut kept = to_set(fields);
        if let FieldPolicy::AllExcept(deferred) = &self.policy {
            kept.retain(|field| !deferred.contains(field));
        }
        self.policy = FieldPolicy::Only(kept);
        self
    }

    /// Leave `fields` out of each instance. Accumulates across calls.
    pub fn defer(mut self, fields: &[&str]) -> Self {
        self.policy = match self.policy {
            FieldPolicy::AllExcept(mut deferred) => {
                deferred.extend(fields.iter().map(|f| f.to_string()));
                FieldPolicy::AllExcept(deferred)
            }
            FieldPolicy::Only(mut kept) => {
                for field in fields {
                    kept.remove(*field);
                }
                FieldPolicy::Only(kept)
            }
        };
        self
    }

    /// Add a computed column named `alias` holding the SQL `expression`.
    pub fn annotate(mut self, alias: &str, expression: &str) -> Self {
        self.annotations
            .push((alias.to_string(), expression.to_string()));
        self
    }

    /// Restrict rows with a raw SQL predicate. Multiple filters are ANDed.
    pub fn filter(mut self, predicate: &str) -> Self {
        self.filters.push(predicate.to_string());
        self
    }

    /// Order rows by `column`; a leading `-` sorts descending.
    pub fn order_by(mut self, column: &str) -> Self {
        self.ordering.push(column.to_string());
        self
    }

    /// A query set that never yields rows.
    pub fn none(mut self) -> Self {
        self.is_none = true;
        self
    }

    /// Compute aggregate expressions over the filtered rows as one mapping.
    pub fn aggregate(&self, aggregates: &[(&str, &str)]) -> Result<Record> {
        let columns: Vec<String> = aggregates
            .iter()
            .map(|(alias, expression)| format!("{expression} AS {}", quote(alias)))
            .collect();
        let sql = format!(
            "SELECT {} FROM {}{}",
            columns.join(", "),
            quote(self.model.table()),
            self.where_clause()
        );
        let (names, rows) = self.fetch(&sql)?;
        let values = rows.into_iter().next().unwrap_or_default();
        Ok(names.into_iter().zip(values).collect())
    }

    /// Every column of the model's table, in declaration order.
    pub fn model_fields(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM pragma_table_info(?1) ORDER BY cid")
            .db_context("Failed to prepare table introspection")?;
        let fields = stmt
            .query_map([self.model.table()], |row| row.get::<_, String>(0))
            .db_context("Failed to introspect table")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to read table columns")?;

        if fields.is_empty() {
            return Err(TabulaError::UnknownTable {
                table: self.model.table().to_string(),
            });
        }
        Ok(fields)
    }

    /// Columns of the declared projection.
    fn selected_fields(&self) -> Result<Vec<String>> {
        if self.selected.is_empty() {
            self.model_fields()
        } else {
            Ok(self.selected.clone())
        }
    }

    /// Computed columns to select. A flat projection stays a single column.
    fn active_annotations(&self) -> &[(String, String)] {
        if self.shape == Shape::Flat {
            &[]
        } else {
            &self.annotations
        }
    }

    fn select_sql(&self, fields: &[String], limit: Option<usize>) -> String {
        let mut columns: Vec<String> = fields.iter().map(|f| quote(f)).collect();
        columns.extend(
            self.active_annotations()
                .iter()
                .map(|(alias, expression)| format!("{expression} AS {}", quote(alias))),
        );

        let mut sql = format!(
            "SELECT {} FROM {}{}",
            columns.join(", "),
            quote(self.model.table()),
            self.where_clause()
        );
        if !self.ordering.is_empty() {
            let terms: Vec<String> = self
                .ordering
                .iter()
                .map(|column| match column.strip_prefix('-') {
                    Some(column) => format!("{} DESC", quote(column)),
                    None => quote(column),
                })
                .collect();
            sql.push_str(" ORDER BY ");
            sql.push_str(&terms.join(", "));
        }
        if let Some(limit) = limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }
        sql
    }

    fn where_clause(&self) -> String {
        if self.filters.is_empty() {
            return String::new();
        }
        let predicates: Vec<String> = self.filters.iter().map(|p| format!("({p})")).collect();
        format!(" WHERE {}", predicates.join(" AND "))
    }

    fn fetch(&self, sql: &str) -> Result<(Vec<String>, Vec<Vec<Value>>)> {
        debug!("{sql}");
        let mut stmt = self.conn.prepare(sql).db_context("Failed to prepare query")?;
        let names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let width = names.len();
        let rows = stmt
            .query_map([], |row| {
                (0..width)
                    .map(|i| row.get::<_, SqlValue>(i).map(Value::from))
                    .collect::<rusqlite::Result<Vec<_>>>()
            })
            .db_context("Failed to execute query")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to read query rows")?;
        Ok((names, rows))
    }

    /// Rows of the given projection as records, honouring `none()`.
    fn records(&self, fields: &[String], limit: Option<usize>) -> Result<Vec<Record>> {
        if self.is_none {
            return Ok(Vec::new());
        }
        let (names, rows) = self.fetch(&self.select_sql(fields, limit))?;
        Ok(rows
            .into_iter()
            .map(|values| names.iter().cloned().zip(values).collect())
            .collect())
    }
}

impl ResultSet for QuerySet<'_> {
    fn shape(&self) -> Shape {
        self.shape.clone()
    }

    fn title(&self) -> String {
        self.model.title()
    }

    fn fields(&self) -> Result<Vec<String>> {
        let mut fields = self.selected_fields()?;
        fields.extend(self.active_annotations().iter().map(|(alias, _)| alias.clone()));
        Ok(fields)
    }

    fn field_policy(&self) -> FieldPolicy {
        self.policy.clone()
    }

    fn count(&self) -> Result<usize> {
        if self.is_none {
            return Ok(0);
        }
        let sql = format!(
            "SELECT COUNT(*) FROM {}{}",
            quote(self.model.table()),
            self.where_clause()
        );
        debug!("{sql}");
        let count: i64 = self
            .conn
            .query_row(&sql, [], |row| row.get(0))
            .db_context("Failed to count rows")?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    fn rows(&self, limit: Option<usize>) -> Result<Rows<'_>> {
        let fields = match &self.shape {
            Shape::Instances => self.model_fields()?,
            Shape::Unsupported(name) => {
                return Err(TabulaError::UnsupportedShape {
                    shape: name.clone(),
                })
            }
            _ => self.selected_fields()?,
        };
        let records = self.records(&fields, limit)?;
        let shape = self.shape.clone();
        Ok(Box::new(records.into_iter().map(move |record| match shape {
            Shape::Mappings => Row::Mapping(record),
            Shape::Tuples => Row::Tuple(record.values().cloned().collect()),
            Shape::Flat => Row::Flat(record.values().next().cloned().unwrap_or(Value::Null)),
            _ => Row::Named(record),
        })))
    }

    fn first_record(&self) -> Result<Option<Record>> {
        let fields = self.model_fields()?;
        Ok(self.records(&fields, Some(1))?.into_iter().next())
    }

    fn named_rows(&self, limit: Option<usize>) -> Result<Rows<'_>> {
        let fields = self.model_fields()?;
        let records = self.records(&fields, limit)?;
        Ok(Box::new(records.into_iter().map(Row::Named)))
    }
}

fn quote(identifier: &str) -> String {
    format!("\"{}\"", identifier.replace('"', "\"\""))
}

fn to_set(fields: &[&str]) -> BTreeSet<String> {
    fields.iter().map(|f| f.to_string()).collect()
}
