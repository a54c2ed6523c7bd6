//! Asynchronous recipe store.
//!
//! [`RecipeStore`] wraps the synchronous [`Storage`] engine behind a shared
//! handle and runs each operation on tokio's blocking pool. Every call returns
//! a future that resolves exactly once, with either the result or the error
//! that ended the operation.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::error::{Error, Result};
use crate::recipe::{distinct_categories, NewRecipe, Recipe, RecipeQuery};
use crate::storage::{ImportSummary, RecipeTx, Storage, StoreStats};

/// Operations offered by a recipe catalog.
///
/// Implemented by [`RecipeStore`]; front ends depend on this trait rather than
/// on the concrete store.
#[async_trait]
pub trait RecipeRepository: Send + Sync {
    /// Persist a new recipe and return its assigned id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the name is empty.
    async fn create(&self, recipe: NewRecipe) -> Result<i64>;

    /// Replace every field of the recipe at `id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if `id` does not exist.
    async fn update(&self, id: i64, recipe: NewRecipe) -> Result<()>;

    /// Fetch one recipe.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if `id` does not exist.
    async fn get(&self, id: i64) -> Result<Recipe>;

    /// Fetch every recipe in storage order.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage engine fails.
    async fn list_all(&self) -> Result<Vec<Recipe>>;

    /// Remove a recipe.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if `id` does not exist.
    async fn delete(&self, id: i64) -> Result<()>;

    /// Set the favorite flag.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if `id` does not exist.
    async fn set_favorite(&self, id: i64, favorite: bool) -> Result<()>;

    /// Flip the favorite flag and return its new value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if `id` does not exist.
    async fn toggle_favorite(&self, id: i64) -> Result<bool>;

    /// Serialize every recipe as a JSON array.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage engine or serialization fails.
    async fn export_all(&self) -> Result<String>;

    /// Upsert every recipe in a JSON array payload.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] on malformed input; nothing is written then.
    async fn import_all(&self, payload: String) -> Result<ImportSummary>;

    /// Summarize the catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage engine fails.
    async fn stats(&self) -> Result<StoreStats>;

    /// List the recipes matching `query`.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage engine fails.
    async fn filter(&self, query: &RecipeQuery) -> Result<Vec<Recipe>> {
        let recipes = self.list_all().await?;
        Ok(query.apply(recipes))
    }

    /// Distinct non-empty categories across the whole catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage engine fails.
    async fn categories(&self) -> Result<BTreeSet<String>> {
        let recipes = self.list_all().await?;
        Ok(distinct_categories(&recipes))
    }
}

/// Shared, cloneable handle to a recipe database.
#[derive(Debug, Clone)]
pub struct RecipeStore {
    inner: Arc<Mutex<Storage>>,
    pretty_export: bool,
}

impl RecipeStore {
    /// Wrap an already opened storage engine.
    #[must_use]
    pub fn new(storage: Storage) -> Self {
        Self {
            inner: Arc::new(Mutex::new(storage)),
            pretty_export: true,
        }
    }

    /// Open or create the database at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DatabaseOpen`] if the database cannot be opened, or a
    /// migration error if its schema cannot be brought up to date.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let storage = tokio::task::spawn_blocking(move || Storage::open(path)).await??;
        Ok(Self::new(storage))
    }

    /// Open a private in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub async fn open_in_memory() -> Result<Self> {
        let storage = tokio::task::spawn_blocking(Storage::open_in_memory).await??;
        Ok(Self::new(storage))
    }

    /// Choose between indented and compact export output.
    #[must_use]
    pub fn with_pretty_export(mut self, pretty: bool) -> Self {
        self.pretty_export = pretty;
        self
    }

    /// Run `f` inside a single read-write transaction.
    ///
    /// Everything `f` does through the [`RecipeTx`] commits together, or not
    /// at all if it returns an error.
    ///
    /// # Errors
    ///
    /// Returns the closure's error, or a storage error.
    pub async fn with_transaction<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&RecipeTx<'_>) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        self.run(move |storage| storage.with_transaction(f)).await
    }

    async fn run<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Storage) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || {
            // A panicking closure poisons the lock, but its transaction was
            // rolled back during unwinding, so the connection is still usable.
            let mut storage = inner.lock().unwrap_or_else(PoisonError::into_inner);
            f(&mut storage)
        })
        .await?
    }
}

#[async_trait]
impl RecipeRepository for RecipeStore {
    #[instrument(skip(self, recipe), fields(name = %recipe.name))]
    async fn create(&self, recipe: NewRecipe) -> Result<i64> {
        let recipe = recipe.normalized()?;
        let id = self.run(move |storage| storage.insert(recipe)).await?;
        debug!(id, "recipe created");
        Ok(id)
    }

    #[instrument(skip(self, recipe))]
    async fn update(&self, id: i64, recipe: NewRecipe) -> Result<()> {
        let recipe = recipe.normalized()?;
        self.run(move |storage| storage.update(id, recipe)).await
    }

    async fn get(&self, id: i64) -> Result<Recipe> {
        self.run(move |storage| storage.get(id)).await
    }

    async fn list_all(&self) -> Result<Vec<Recipe>> {
        self.run(|storage| storage.list_all()).await
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: i64) -> Result<()> {
        self.run(move |storage| storage.delete(id)).await
    }

    #[instrument(skip(self))]
    async fn set_favorite(&self, id: i64, favorite: bool) -> Result<()> {
        self.run(move |storage| storage.set_favorite(id, favorite))
            .await
    }

    #[instrument(skip(self))]
    async fn toggle_favorite(&self, id: i64) -> Result<bool> {
        self.run(move |storage| storage.toggle_favorite(id)).await
    }

    async fn export_all(&self) -> Result<String> {
        let pretty = self.pretty_export;
        self.run(move |storage| storage.export_all(pretty)).await
    }

    #[instrument(skip(self, payload), fields(bytes = payload.len()))]
    async fn import_all(&self, payload: String) -> Result<ImportSummary> {
        self.run(move |storage| storage.import_all(&payload)).await
    }

    async fn stats(&self) -> Result<StoreStats> {
        self.run(|storage| storage.stats()).await
    }
}
