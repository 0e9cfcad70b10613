use std::{path::PathBuf, str::FromStr};

use clap::{ArgGroup, Args as ClapArgs, Parser, Subcommand};
use tabula_core::{Model, DEFAULT_LIMIT};

/// Tabulate SQLite query results and prettify test runs in the terminal
///
/// Tables are printed with a heavy header, a title taken from the table's
/// plural name and, when rows were cut off, a caption saying how many.
#[derive(Parser)]
#[command(version, about, name = "tabula")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/tabula/tabula.db
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Don't colorize the command output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Force colorization of the command output
    #[arg(long, global = true)]
    pub force_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Tabulate the rows of a table
    #[command(alias = "q")]
    Query(QueryArgs),
    /// Print the number of rows in a table
    Count(CountArgs),
    /// Tabulate aggregate expressions over a table
    Aggregate(AggregateArgs),
    /// Report a test run from libtest JSON events
    #[command(alias = "t")]
    Test(TestArgs),
}

#[derive(ClapArgs)]
#[command(group(ArgGroup::new("shape").args(["values", "values_list", "flat", "named"])))]
pub struct QueryArgs {
    /// Table to query
    pub table: String,

    /// Show rows as mappings of these fields (all fields when empty)
    #[arg(long, num_args = 0.., value_delimiter = ',')]
    pub values: Option<Vec<String>>,

    /// Show rows as tuples of these fields (all fields when empty)
    #[arg(long, num_args = 0.., value_delimiter = ',')]
    pub values_list: Option<Vec<String>>,

    /// Show a single field per row
    #[arg(long)]
    pub flat: Option<String>,

    /// Show rows as named tuples of these fields (all fields when empty)
    #[arg(long, num_args = 0.., value_delimiter = ',')]
    pub named: Option<Vec<String>>,

    /// Only show these fields of each row
    #[arg(long, value_delimiter = ',')]
    pub only: Option<Vec<String>>,

    /// Leave these fields out of each row
    #[arg(long, value_delimiter = ',')]
    pub defer: Vec<String>,

    /// Add a computed column, e.g. `len=LENGTH(name)`
    #[arg(long)]
    pub annotate: Vec<Assignment>,

    /// SQL predicate rows must satisfy; repeat to combine with AND
    #[arg(long)]
    pub filter: Vec<String>,

    /// Column to order by, prefix with `-` for descending
    #[arg(long, allow_hyphen_values = true)]
    pub order_by: Vec<String>,

    /// Plural name used as the table title
    #[arg(long)]
    pub plural: Option<String>,

    /// Maximum number of rows to show
    #[arg(long, conflicts_with = "no_limit")]
    pub limit: Option<usize>,

    /// Show every row
    #[arg(long)]
    pub no_limit: bool,
}

impl QueryArgs {
    pub fn model(&self) -> Model {
        model(&self.table, self.plural.as_deref())
    }

    /// The row limit, falling back to the default.
    pub fn limit(&self) -> Option<usize> {
        if self.no_limit {
            None
        } else {
            self.limit.or(DEFAULT_LIMIT)
        }
    }
}

#[derive(ClapArgs)]
pub struct CountArgs {
    /// Table to count
    pub table: String,

    /// SQL predicate rows must satisfy; repeat to combine with AND
    #[arg(long)]
    pub filter: Vec<String>,
}

#[derive(ClapArgs)]
pub struct AggregateArgs {
    /// Table to aggregate
    pub table: String,

    /// Aggregates as `ALIAS=EXPRESSION`, e.g. `age__sum=SUM(age)`
    #[arg(required = true)]
    pub aggregates: Vec<Assignment>,

    /// SQL predicate rows must satisfy; repeat to combine with AND
    #[arg(long)]
    pub filter: Vec<String>,
}

#[derive(ClapArgs)]
pub struct TestArgs {
    /// File of libtest JSON events; standard input when omitted
    pub file: Option<PathBuf>,

    /// Verbosity level: 0=minimal, 1=normal, 2=verbose, 3=very verbose
    #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(0..=3))]
    pub verbosity: u8,

    /// Stop reporting after the first failed test
    #[arg(long)]
    pub failfast: bool,

    /// List the slowest tests after the summary
    #[arg(long)]
    pub timing: bool,
}

/// An `ALIAS=EXPRESSION` pair naming a computed column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub alias: String,
    pub expression: String,
}

impl FromStr for Assignment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (alias, expression) = s
            .split_once('=')
            .ok_or_else(|| format!("expected ALIAS=EXPRESSION, got '{s}'"))?;
        let (alias, expression) = (alias.trim(), expression.trim());
        if alias.is_empty() || expression.is_empty() {
            return Err(format!("expected ALIAS=EXPRESSION, got '{s}'"));
        }
        Ok(Self {
            alias: alias.to_string(),
            expression: expression.to_string(),
        })
    }
}

pub fn model(table: &str, plural: Option<&str>) -> Model {
    let model = Model::new(table);
    match plural {
        Some(plural) => model.with_verbose_name_plural(plural),
        None => model,
    }
}
