#![allow(dead_code)]

use tabula_core::{Console, Database, DatabaseBuilder, Model};
use tempfile::TempDir;

/// Helper function to create a test database seeded with three people
pub fn create_test_database() -> (TempDir, Database) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let db = DatabaseBuilder::new()
        .with_database_path(Some(&db_path))
        .build()
        .expect("Failed to create database");
    db.connection()
        .execute_batch(
            "CREATE TABLE person (id INTEGER PRIMARY KEY, name TEXT NOT NULL, age INTEGER NOT NULL);
             INSERT INTO person (id, name, age) VALUES
                 (1, 'Ash', 10),
                 (2, 'Misty', 10),
                 (3, 'Professor Oak', 50);",
        )
        .expect("Failed to seed database");
    (temp_dir, db)
}

pub fn people() -> Model {
    Model::new("person").with_verbose_name_plural("people")
}

/// A colourless console writing to memory, 80 columns wide
pub fn test_console() -> Console<Vec<u8>> {
    Console::new(Vec::new(), false).with_width(80)
}

pub fn output_lines(console: Console<Vec<u8>>) -> Vec<String> {
    String::from_utf8(console.into_inner())
        .expect("console output is UTF-8")
        .lines()
        .map(String::from)
        .collect()
}
