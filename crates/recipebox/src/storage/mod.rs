//! Storage layer for recipebox.
//!
//! This module provides `SQLite`-based persistent storage for recipes. Every
//! mutating operation runs inside its own transaction, so a failure never
//! leaves a half-written record behind.

pub mod migrations;
pub mod schema;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::recipe::{ImportedRecipe, NewRecipe, Recipe};

use schema::RECIPE_COLUMNS;

/// Storage engine for recipes.
///
/// Provides persistent storage using `SQLite` with support for:
/// - Insertion with store-assigned, never-reused ids
/// - Full overwrites and upserts by id
/// - Atomic read-modify-write through [`Storage::with_transaction`]
/// - JSON export and all-or-nothing import
#[derive(Debug)]
pub struct Storage {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
}

impl Storage {
    /// Open or create a storage database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    /// Initializes the schema if this is a new database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        // The file is only read here, so a non-database file fails at this point.
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")
            .map_err(|source| Error::DatabaseOpen {
                path: path.clone(),
                source,
            })?;

        migrations::initialize_schema(&conn).map_err(|err| match err {
            Error::DatabaseQuery(source) => Error::DatabaseOpen {
                path: path.clone(),
                source,
            },
            other => other,
        })?;

        info!("Database opened successfully at {}", path.display());
        Ok(Self { path, conn })
    }

    /// Create an in-memory storage instance for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run `f` inside a single read-write transaction.
    ///
    /// The transaction commits when `f` returns `Ok` and rolls back otherwise.
    ///
    /// # Errors
    ///
    /// Returns whatever `f` returns, or a database error if the transaction
    /// cannot be started or committed.
    pub fn with_transaction<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&RecipeTx<'_>) -> Result<T>,
    {
        let tx = self.conn.transaction()?;
        let value = f(&RecipeTx { conn: &tx })?;
        tx.commit()?;
        Ok(value)
    }

    /// Insert a new recipe and return its assigned id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the name is empty, or a database error.
    pub fn insert(&mut self, recipe: NewRecipe) -> Result<i64> {
        let recipe = recipe.normalized()?;
        self.with_transaction(|tx| tx.insert(recipe))
    }

    /// Overwrite every field of the recipe at `id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no such recipe exists,
    /// [`Error::Validation`] if the name is empty, or a database error.
    pub fn update(&mut self, id: i64, recipe: NewRecipe) -> Result<()> {
        let recipe = recipe.normalized()?;
        self.with_transaction(|tx| tx.overwrite(id, recipe))
    }

    /// Get a recipe by its id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no such recipe exists, or a database error.
    pub fn get(&self, id: i64) -> Result<Recipe> {
        RecipeTx { conn: &self.conn }.get(id)
    }

    /// Get every recipe in storage order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn list_all(&self) -> Result<Vec<Recipe>> {
        RecipeTx { conn: &self.conn }.list_all()
    }

    /// Delete a recipe by id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no such recipe exists, or a database error.
    pub fn delete(&mut self, id: i64) -> Result<()> {
        self.with_transaction(|tx| {
            if tx.delete(id)? {
                Ok(())
            } else {
                Err(Error::not_found(id))
            }
        })
    }

    /// Set the favorite flag of a recipe.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no such recipe exists, or a database error.
    pub fn set_favorite(&mut self, id: i64, favorite: bool) -> Result<()> {
        self.with_transaction(|tx| {
            let mut recipe = tx.get(id)?;
            recipe.favorite = favorite;
            tx.put(&recipe)?;
            Ok(())
        })
    }

    /// Flip the favorite flag of a recipe and return the new value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no such recipe exists, or a database error.
    pub fn toggle_favorite(&mut self, id: i64) -> Result<bool> {
        self.with_transaction(|tx| {
            let mut recipe = tx.get(id)?;
            recipe.favorite = !recipe.favorite;
            tx.put(&recipe)?;
            Ok(recipe.favorite)
        })
    }

    /// Count total recipes in storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn count(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM recipes", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Serialize every recipe as a JSON array.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation or serialization fails.
    pub fn export_all(&self, pretty: bool) -> Result<String> {
        let recipes = self.list_all()?;
        let json = if pretty {
            serde_json::to_string_pretty(&recipes)?
        } else {
            serde_json::to_string(&recipes)?
        };
        debug!("Exported {} recipes", recipes.len());
        Ok(json)
    }

    /// Upsert every recipe in a JSON array payload.
    ///
    /// Records carrying an id are written at that id, replacing any existing
    /// record; records without one get a fresh id. The whole payload is
    /// applied in one transaction, so either every record lands or none does.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] if the payload is not a JSON array of recipes,
    /// [`Error::Validation`] if any record has an empty name, or a database error.
    pub fn import_all(&mut self, payload: &str) -> Result<ImportSummary> {
        let imported: Vec<ImportedRecipe> = serde_json::from_str(payload).map_err(Error::Parse)?;

        let mut prepared = Vec::with_capacity(imported.len());
        for (index, record) in imported.into_iter().enumerate() {
            let fields = record.fields.normalized().map_err(|_| {
                Error::validation(
                    "name",
                    format!("record {index} in import payload has an empty name"),
                )
            })?;
            prepared.push((record.id, fields));
        }

        let summary = self.with_transaction(|tx| {
            let mut summary = ImportSummary::default();
            for (id, fields) in prepared {
                match id {
                    Some(id) => {
                        if tx.put(&Recipe::from_new(id, fields))? {
                            summary.created += 1;
                        } else {
                            summary.updated += 1;
                        }
                    }
                    None => {
                        tx.insert(fields)?;
                        summary.created += 1;
                    }
                }
            }
            Ok(summary)
        })?;

        info!(
            "Imported recipes: {} created, {} updated",
            summary.created, summary.updated
        );
        Ok(summary)
    }

    /// Get database statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn stats(&self) -> Result<StoreStats> {
        let total_recipes = self.count()?;

        let favorite_recipes: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM recipes WHERE favorite = 1",
            [],
            |row| row.get(0),
        )?;

        let category_count: i64 = self.conn.query_row(
            "SELECT COUNT(DISTINCT category) FROM recipes WHERE category <> ''",
            [],
            |row| row.get(0),
        )?;

        let newest: Option<String> = self
            .conn
            .query_row("SELECT MAX(updated_at) FROM recipes", [], |row| row.get(0))
            .optional()?
            .flatten();

        let last_modified = newest
            .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
            .map(|dt| dt.with_timezone(&Utc));

        let db_size_bytes = if self.path.to_string_lossy() == ":memory:" {
            0
        } else {
            std::fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
        };

        Ok(StoreStats {
            total_recipes,
            favorite_recipes,
            category_count,
            last_modified,
            db_size_bytes,
        })
    }
}

/// Recipe operations bound to an open transaction.
///
/// Handed to the closure passed to [`Storage::with_transaction`]; every call
/// made through it commits or rolls back together.
#[derive(Debug)]
pub struct RecipeTx<'conn> {
    conn: &'conn Connection,
}

impl RecipeTx<'_> {
    /// Get a recipe by id, or `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn find(&self, id: i64) -> Result<Option<Recipe>> {
        let recipe = self
            .conn
            .query_row(
                &format!("SELECT {RECIPE_COLUMNS} FROM recipes WHERE id = ?1"),
                [id],
                row_to_recipe,
            )
            .optional()?;
        Ok(recipe)
    }

    /// Get a recipe by id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if absent, or a database error.
    pub fn get(&self, id: i64) -> Result<Recipe> {
        self.find(id)?.ok_or_else(|| Error::not_found(id))
    }

    /// Check whether a recipe with this id exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn exists(&self, id: i64) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM recipes WHERE id = ?1",
            [id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Get every recipe in storage order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn list_all(&self) -> Result<Vec<Recipe>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {RECIPE_COLUMNS} FROM recipes ORDER BY id"))?;
        let recipes = stmt
            .query_map([], row_to_recipe)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(recipes)
    }

    /// Insert a recipe with a fresh id and return it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the name is empty, or a database error.
    pub fn insert(&self, recipe: NewRecipe) -> Result<i64> {
        let recipe = recipe.normalized()?;
        self.conn.execute(
            r"
            INSERT INTO recipes (name, category, ingredients, instructions, image, favorite, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ",
            params![
                recipe.name,
                recipe.category,
                recipe.ingredients,
                recipe.instructions,
                recipe.image,
                recipe.favorite,
                Utc::now().to_rfc3339(),
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        debug!("Inserted recipe with id {}", id);
        Ok(id)
    }

    /// Write a recipe at its own id, creating or replacing it.
    ///
    /// Returns `true` if the record was created, `false` if it replaced an
    /// existing one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the name is empty, or a database error.
    pub fn put(&self, recipe: &Recipe) -> Result<bool> {
        recipe.validate()?;
        let created = !self.exists(recipe.id)?;
        self.conn.execute(
            r"
            INSERT INTO recipes (id, name, category, ingredients, instructions, image, favorite, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                category = excluded.category,
                ingredients = excluded.ingredients,
                instructions = excluded.instructions,
                image = excluded.image,
                favorite = excluded.favorite,
                updated_at = excluded.updated_at
            ",
            params![
                recipe.id,
                recipe.name,
                recipe.category,
                recipe.ingredients,
                recipe.instructions,
                recipe.image,
                recipe.favorite,
                Utc::now().to_rfc3339(),
            ],
        )?;
        debug!(
            "{} recipe with id {}",
            if created { "Created" } else { "Replaced" },
            recipe.id
        );
        Ok(created)
    }

    /// Replace every field of an existing recipe.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if absent, [`Error::Validation`] if the
    /// name is empty, or a database error.
    pub fn overwrite(&self, id: i64, recipe: NewRecipe) -> Result<()> {
        let recipe = recipe.normalized()?;
        if !self.exists(id)? {
            return Err(Error::not_found(id));
        }
        self.put(&Recipe::from_new(id, recipe))?;
        Ok(())
    }

    /// Delete a recipe by id.
    ///
    /// Returns `true` if a recipe was deleted, `false` if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn delete(&self, id: i64) -> Result<bool> {
        let affected = self.conn.execute("DELETE FROM recipes WHERE id = ?1", [id])?;
        if affected > 0 {
            debug!("Deleted recipe with id {}", id);
        }
        Ok(affected > 0)
    }
}

/// Convert a database row to a Recipe struct.
fn row_to_recipe(row: &rusqlite::Row) -> rusqlite::Result<Recipe> {
    Ok(Recipe {
        id: row.get(0)?,
        name: row.get(1)?,
        category: row.get(2)?,
        ingredients: row.get(3)?,
        instructions: row.get(4)?,
        image: row.get(5)?,
        favorite: row.get(6)?,
    })
}

/// Outcome of an import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    /// Records that did not exist before the import.
    pub created: usize,
    /// Existing records that were overwritten.
    pub updated: usize,
}

impl ImportSummary {
    /// Total number of records written.
    #[must_use]
    pub fn total(&self) -> usize {
        self.created + self.updated
    }
}

/// Statistics about the storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    /// Total number of recipes stored.
    pub total_recipes: i64,
    /// Number of recipes marked as favorite.
    pub favorite_recipes: i64,
    /// Number of distinct categories in use.
    pub category_count: i64,
    /// When a recipe was last written.
    pub last_modified: Option<DateTime<Utc>>,
    /// Size of the database file in bytes.
    pub db_size_bytes: u64,
}
