//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::error::Result;
use crate::image;
use crate::recipe::{NewRecipe, Recipe, RecipeQuery};

/// Add command arguments.
#[derive(Debug, Args)]
pub struct AddCommand {
    /// Recipe name
    pub name: String,

    /// Category (defaults to "uncategorized")
    #[arg(long, default_value = "")]
    pub category: String,

    /// Ingredient list
    #[arg(short, long, default_value = "")]
    pub ingredients: String,

    /// Preparation steps
    #[arg(long, default_value = "")]
    pub instructions: String,

    /// Image file to attach (stored as a data: URL)
    #[arg(long, value_name = "FILE")]
    pub image: Option<PathBuf>,

    /// Mark as favorite right away
    #[arg(short, long)]
    pub favorite: bool,
}

impl AddCommand {
    /// Build the recipe input, trimming surrounding whitespace from text fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the image file cannot be read.
    pub fn to_new_recipe(&self) -> Result<NewRecipe> {
        let mut recipe = NewRecipe::new(self.name.trim())
            .with_category(self.category.trim())
            .with_ingredients(self.ingredients.trim())
            .with_instructions(self.instructions.trim())
            .with_favorite(self.favorite);
        if let Some(path) = &self.image {
            recipe = recipe.with_image(image::read_data_url(path)?);
        }
        Ok(recipe)
    }
}

/// Edit command arguments.
///
/// Only the supplied fields change; the rest are carried over before the
/// record is overwritten.
#[derive(Debug, Args)]
pub struct EditCommand {
    /// Id of the recipe to edit
    pub id: i64,

    /// New name
    #[arg(short, long)]
    pub name: Option<String>,

    /// New category
    #[arg(long)]
    pub category: Option<String>,

    /// New ingredient list
    #[arg(short, long)]
    pub ingredients: Option<String>,

    /// New preparation steps
    #[arg(long)]
    pub instructions: Option<String>,

    /// Replace the image with this file
    #[arg(long, value_name = "FILE")]
    pub image: Option<PathBuf>,

    /// Remove the attached image
    #[arg(long, conflicts_with = "image")]
    pub remove_image: bool,
}

impl EditCommand {
    /// Apply the supplied fields on top of an existing recipe.
    ///
    /// # Errors
    ///
    /// Returns an error if the image file cannot be read.
    pub fn apply_to(&self, existing: Recipe) -> Result<NewRecipe> {
        let mut recipe = existing.into_new();
        if let Some(name) = &self.name {
            recipe.name = name.trim().to_string();
        }
        if let Some(category) = &self.category {
            recipe.category = category.trim().to_string();
        }
        if let Some(ingredients) = &self.ingredients {
            recipe.ingredients = ingredients.trim().to_string();
        }
        if let Some(instructions) = &self.instructions {
            recipe.instructions = instructions.trim().to_string();
        }
        if let Some(path) = &self.image {
            recipe.image = image::read_data_url(path)?;
        } else if self.remove_image {
            recipe.image.clear();
        }
        Ok(recipe)
    }
}

/// Show command arguments.
#[derive(Debug, Args)]
pub struct ShowCommand {
    /// Id of the recipe to show
    pub id: i64,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Only recipes whose name contains this text (case-insensitive)
    #[arg(short, long, default_value = "")]
    pub search: String,

    /// Only recipes in this category
    #[arg(long, default_value = "")]
    pub category: String,

    /// Only favorites
    #[arg(short, long)]
    pub favorites: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

impl ListCommand {
    /// Build the filter query from the flags.
    #[must_use]
    pub fn query(&self) -> RecipeQuery {
        RecipeQuery::new()
            .text(self.search.trim())
            .category(self.category.as_str())
            .favorites_only(self.favorites)
    }
}

/// Favorite command arguments.
#[derive(Debug, Args)]
pub struct FavoriteCommand {
    /// Id of the recipe
    pub id: i64,

    /// Set an explicit state instead of toggling
    #[arg(short, long, value_enum)]
    pub state: Option<FavoriteState>,
}

/// Delete command arguments.
#[derive(Debug, Args)]
pub struct DeleteCommand {
    /// Id of the recipe to delete
    pub id: i64,
}

/// Export command arguments.
#[derive(Debug, Args)]
pub struct ExportCommand {
    /// Output file (defaults to the configured export file name; "-" for stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Import command arguments.
#[derive(Debug, Args)]
pub struct ImportCommand {
    /// JSON file produced by `export`
    pub file: PathBuf,

    /// Output the summary as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Explicit favorite state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FavoriteState {
    /// Mark as favorite
    On,
    /// Clear the favorite mark
    Off,
}

impl From<FavoriteState> for bool {
    fn from(state: FavoriteState) -> Self {
        matches!(state, FavoriteState::On)
    }
}

/// Output format for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// One card per recipe
    #[default]
    Plain,
    /// Formatted table
    Table,
    /// JSON output
    Json,
}
