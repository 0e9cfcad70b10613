//! SQLite database handle.
//!
//! Opens the database a query set reads from. Schema management is left to
//! whoever owns the database; tabula only reads.

use std::path::Path;

use rusqlite::Connection;

use crate::{
    error::{DatabaseResultExt, Result},
    query::{Model, QuerySet},
};

pub mod builder;

pub use builder::DatabaseBuilder;

/// Database connection handle.
#[derive(Debug)]
pub struct Database {
    connection: Connection,
}

impl Database {
    /// Opens (or creates) the database at `path`.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = Connection::open(path).db_context("Failed to open database connection")?;
        Ok(Self { connection })
    }

    /// Opens a private in-memory database.
    pub fn in_memory() -> Result<Self> {
        let connection =
            Connection::open_in_memory().db_context("Failed to open in-memory database")?;
        Ok(Self { connection })
    }

    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    /// Starts a query set over every row of `model`.
    pub fn query(&self, model: Model) -> QuerySet<'_> {
        QuerySet::new(&self.connection, model)
    }

    /// Names of the user tables in the database, sorted.
    pub fn tables(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .connection
            .prepare(
                "SELECT name FROM sqlite_master WHERE type = 'table' \
                 AND name NOT LIKE 'sqlite_%' ORDER BY name",
            )
            .db_context("Failed to prepare table listing")?;
        let tables = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .db_context("Failed to list tables")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to read table names")?;
        Ok(tables)
    }
}
