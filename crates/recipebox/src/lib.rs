//! `recipebox` - A local recipe catalog
//!
//! This library provides durable storage for recipes together with the
//! query, favorite, and JSON import/export operations built on top of it.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod image;
pub mod logging;
pub mod recipe;
pub mod storage;
pub mod store;

pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use recipe::{distinct_categories, NewRecipe, Recipe, RecipeQuery, UNCATEGORIZED};
pub use storage::{ImportSummary, RecipeTx, Storage, StoreStats};
pub use store::{RecipeRepository, RecipeStore};
