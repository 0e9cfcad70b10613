//! Core library for the tabula terminal presentation tools.
//!
//! This crate turns query results and test-run events into styled terminal
//! output:
//!
//! - **Tabulation** ([`tabulate`]): lays out mappings and queryable result
//!   sets as bordered tables, truncated to a row limit
//! - **Query sets** ([`query`]): the result-set contract and its SQLite
//!   implementation
//! - **Console** ([`console`]): colour-aware sink for tables, markup and rules
//! - **Test reports** ([`report`]): coloured progress, failure listings and
//!   slow-test reports from libtest's JSON event stream
//!
//! # Quick Start
//!
//! ```rust
//! use tabula_core::{tabulate, Console, Database, Model, Tabular};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::in_memory()?;
//! db.connection().execute_batch(
//!     "CREATE TABLE person (id INTEGER PRIMARY KEY, name TEXT, age INTEGER);
//!      INSERT INTO person (name, age) VALUES ('Ash', 10), ('Misty', 10);",
//! )?;
//!
//! let people = db.query(Model::new("person").with_verbose_name_plural("people"));
//! let mut console = Console::new(Vec::new(), false);
//! tabulate(&mut console, Tabular::from(&people), Some(1))?;
//!
//! let output = String::from_utf8(console.into_inner())?;
//! assert!(output.contains("1 of 2 records"));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod console;
pub mod db;
pub mod error;
pub mod iter;
pub mod query;
pub mod report;
pub mod tabulate;
pub mod value;

// Re-export commonly used types
pub use console::{ColorChoice, Console, Style, Table};
pub use db::{Database, DatabaseBuilder};
pub use error::{Result, TabulaError};
pub use query::{FieldPolicy, Model, QuerySet, ResultSet, Row, Shape};
pub use report::TestResult;
pub use tabulate::{build, tabulate, Rendering, Tabular, DEFAULT_LIMIT};
pub use value::{Record, Value};
