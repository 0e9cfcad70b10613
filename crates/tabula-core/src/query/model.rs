//! Model descriptors: which table a query set reads and how to title it.

/// Describes the table behind a query set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Model {
    table: String,
    verbose_name_plural: String,
}

impl Model {
    /// Describe a table, deriving the plural label from its name.
    pub fn new(table: impl Into<String>) -> Self {
        let table = table.into();
        let verbose_name_plural = pluralize(&table.replace('_', " "));
        Self {
            table,
            verbose_name_plural,
        }
    }

    /// Override the plural label (e.g. `people` for `person`).
    pub fn with_verbose_name_plural(mut self, plural: impl Into<String>) -> Self {
        self.verbose_name_plural = plural.into();
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn verbose_name_plural(&self) -> &str {
        &self.verbose_name_plural
    }

    /// The plural label with every word capitalized.
    pub fn title(&self) -> String {
        title_case(&self.verbose_name_plural)
    }
}

fn pluralize(name: &str) -> String {
    if name.ends_with('s') {
        name.to_string()
    } else {
        format!("{name}s")
    }
}

fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}
