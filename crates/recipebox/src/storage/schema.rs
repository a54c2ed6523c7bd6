//! `SQLite` schema definitions for recipebox.
//!
//! This module contains the SQL statements for creating and managing
//! the database schema.

/// SQL statement to create the recipes table.
///
/// `AUTOINCREMENT` keeps ids from being reused after deletes, including ids
/// that arrived through an import.
pub const CREATE_RECIPES_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS recipes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL CHECK (length(trim(name)) > 0),
    category TEXT NOT NULL,
    ingredients TEXT NOT NULL DEFAULT '',
    instructions TEXT NOT NULL DEFAULT '',
    image TEXT NOT NULL DEFAULT '',
    favorite INTEGER NOT NULL DEFAULT 0,
    updated_at TEXT NOT NULL
)
";

/// SQL statement to create an index on `category` for filtering.
pub const CREATE_CATEGORY_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_recipes_category ON recipes(category)
";

/// SQL statement to create an index on `favorite` for filtering.
pub const CREATE_FAVORITE_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_recipes_favorite ON recipes(favorite)
";

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    CREATE_RECIPES_TABLE,
    CREATE_CATEGORY_INDEX,
    CREATE_FAVORITE_INDEX,
    CREATE_METADATA_TABLE,
];

/// Column list shared by every recipe `SELECT`.
pub const RECIPE_COLUMNS: &str =
    "id, name, category, ingredients, instructions, image, favorite";
