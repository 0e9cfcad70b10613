//! Builder for opening the database with a resolved path.

use std::path::{Path, PathBuf};

use log::debug;

use super::Database;
use crate::error::{Result, TabulaError};

/// Builder for creating and configuring [`Database`] handles.
#[derive(Debug, Clone, Default)]
pub struct DatabaseBuilder {
    database_path: Option<PathBuf>,
}

impl DatabaseBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a custom database file path.
    ///
    /// If not specified, uses XDG Base Directory specification:
    /// `$XDG_DATA_HOME/tabula/tabula.db` or `~/.local/share/tabula/tabula.db`
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.database_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Opens the configured database.
    ///
    /// # Errors
    ///
    /// Returns `TabulaError::FileSystem` if the parent directory cannot be
    /// created, `TabulaError::XdgDirectory` if no default location exists and
    /// `TabulaError::Database` if the file cannot be opened.
    pub fn build(self) -> Result<Database> {
        let db_path = match self.database_path {
            Some(path) => path,
            None => Self::default_database_path()?,
        };

        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| TabulaError::FileSystem {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        debug!("Opening database at {}", db_path.display());
        Database::new(&db_path)
    }

    /// Returns the default database path following XDG Base Directory
    /// specification.
    fn default_database_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("tabula")
            .place_data_file("tabula.db")
            .map_err(|e| TabulaError::XdgDirectory(e.to_string()))
    }
}
