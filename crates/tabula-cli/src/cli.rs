//! Command handlers.
//!
//! Each handler builds a query set from its arguments and hands it to the
//! tabulator; the test handler replays libtest events through the reporter.

use std::{
    fs::File,
    io::{self, BufRead, BufReader, Stdout},
};

use anyhow::{bail, Context, Result};
use log::debug;
use tabula_core::{
    report::libtest, tabulate, ColorChoice, Console, Database, QuerySet, ResultSet, Tabular,
    TestResult,
};

use crate::args::{model, AggregateArgs, Assignment, CountArgs, QueryArgs, TestArgs};

/// Runs table commands against one database.
pub struct Cli {
    db: Database,
    console: Console<Stdout>,
}

impl Cli {
    pub fn new(db: Database, console: Console<Stdout>) -> Self {
        Self { db, console }
    }

    /// Fail early on a missing table, naming the tables that do exist.
    fn ensure_table(&self, table: &str) -> Result<()> {
        let tables = self.db.tables().context("Failed to list tables")?;
        if tables.iter().any(|t| t == table) {
            return Ok(());
        }
        if tables.is_empty() {
            bail!("Table '{table}' not found. The database has no tables.");
        }
        bail!(
            "Table '{table}' not found. Available tables: {}",
            tables.join(", ")
        );
    }

    pub fn handle_query(&mut self, args: QueryArgs) -> Result<()> {
        self.ensure_table(&args.table)?;
        let limit = args.limit();
        let mut queryset = self.db.query(args.model());

        if let Some(fields) = &args.values {
            queryset = queryset.values(&strs(fields));
        } else if let Some(fields) = &args.values_list {
            queryset = queryset.values_list(&strs(fields));
        } else if let Some(field) = &args.flat {
            queryset = queryset.values_list_flat(field);
        } else if let Some(fields) = &args.named {
            queryset = queryset.values_list_named(&strs(fields));
        }

        if let Some(fields) = &args.only {
            queryset = queryset.only(&strs(fields));
        }
        if !args.defer.is_empty() {
            queryset = queryset.defer(&strs(&args.defer));
        }
        for Assignment { alias, expression } in &args.annotate {
            queryset = queryset.annotate(alias, expression);
        }
        queryset = filtered(queryset, &args.filter);
        for column in &args.order_by {
            queryset = queryset.order_by(column);
        }

        tabulate(&mut self.console, Tabular::from(&queryset), limit)
            .with_context(|| format!("Failed to tabulate table '{}'", args.table))
    }

    pub fn handle_count(&mut self, args: CountArgs) -> Result<()> {
        self.ensure_table(&args.table)?;
        let queryset = filtered(self.db.query(model(&args.table, None)), &args.filter);
        let count = queryset
            .count()
            .with_context(|| format!("Failed to count table '{}'", args.table))?;
        tabulate(&mut self.console, Tabular::Value(&count), None)?;
        Ok(())
    }

    pub fn handle_aggregate(&mut self, args: AggregateArgs) -> Result<()> {
        self.ensure_table(&args.table)?;
        let queryset = filtered(self.db.query(model(&args.table, None)), &args.filter);
        let aggregates: Vec<(&str, &str)> = args
            .aggregates
            .iter()
            .map(|a| (a.alias.as_str(), a.expression.as_str()))
            .collect();
        let totals = queryset
            .aggregate(&aggregates)
            .with_context(|| format!("Failed to aggregate table '{}'", args.table))?;
        tabulate(&mut self.console, Tabular::from(&totals), None)?;
        Ok(())
    }
}

/// Report libtest events on standard error. Returns whether the run passed.
pub fn report_tests(args: TestArgs, color: ColorChoice) -> Result<bool> {
    let input: Box<dyn BufRead> = match &args.file {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(io::stdin().lock()),
    };

    let mut result =
        TestResult::new(Console::stderr(color), args.verbosity).with_failfast(args.failfast);
    let elapsed = libtest::consume(input, &mut result).context("Failed to read test events")?;
    debug!("Replayed {} tests", result.tests_run());

    result.print_errors()?;
    result.print_summary(elapsed)?;
    if args.timing {
        result.print_durations()?;
    }
    Ok(result.was_successful())
}

fn filtered<'c>(mut queryset: QuerySet<'c>, filters: &[String]) -> QuerySet<'c> {
    for predicate in filters {
        queryset = queryset.filter(predicate);
    }
    queryset
}

fn strs(fields: &[String]) -> Vec<&str> {
    fields.iter().map(String::as_str).collect()
}
