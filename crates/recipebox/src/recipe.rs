//! Core recipe types for recipebox.
//!
//! This module defines the recipe record, the input shape used to create or
//! overwrite one, and the query used to filter a catalog listing.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Category stored for recipes created without one.
pub const UNCATEGORIZED: &str = "uncategorized";

/// A stored recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    /// Unique identifier assigned by the store.
    pub id: i64,

    /// Display name. Never empty once persisted.
    pub name: String,

    /// Category label, `"uncategorized"` when none was given.
    #[serde(default)]
    pub category: String,

    /// Free-text ingredient list.
    #[serde(default)]
    pub ingredients: String,

    /// Free-text preparation steps.
    #[serde(default)]
    pub instructions: String,

    /// Encoded image payload (typically a `data:` URL), empty if none.
    #[serde(default)]
    pub image: String,

    /// Whether the recipe is marked as a favorite.
    #[serde(default)]
    pub favorite: bool,
}

impl Recipe {
    /// Attach an id to the given fields.
    #[must_use]
    pub fn from_new(id: i64, new: NewRecipe) -> Self {
        Self {
            id,
            name: new.name,
            category: new.category,
            ingredients: new.ingredients,
            instructions: new.instructions,
            image: new.image,
            favorite: new.favorite,
        }
    }

    /// Check that the required fields are present.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the name is empty or whitespace.
    pub fn validate(&self) -> Result<()> {
        validate_name(&self.name)
    }

    /// Strip the id, leaving the writable fields.
    #[must_use]
    pub fn into_new(self) -> NewRecipe {
        NewRecipe {
            name: self.name,
            category: self.category,
            ingredients: self.ingredients,
            instructions: self.instructions,
            image: self.image,
            favorite: self.favorite,
        }
    }
}

/// The writable fields of a recipe.
///
/// Used both for creation (the store assigns the id) and for full overwrites.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewRecipe {
    /// Display name. Required.
    pub name: String,
    /// Category label. Empty means uncategorized.
    pub category: String,
    /// Free-text ingredient list.
    pub ingredients: String,
    /// Free-text preparation steps.
    pub instructions: String,
    /// Encoded image payload.
    pub image: String,
    /// Favorite flag.
    pub favorite: bool,
}

impl NewRecipe {
    /// Create a recipe input with just a name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Set the ingredients.
    #[must_use]
    pub fn with_ingredients(mut self, ingredients: impl Into<String>) -> Self {
        self.ingredients = ingredients.into();
        self
    }

    /// Set the instructions.
    #[must_use]
    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = instructions.into();
        self
    }

    /// Set the image payload.
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    /// Set the favorite flag.
    #[must_use]
    pub fn with_favorite(mut self, favorite: bool) -> Self {
        self.favorite = favorite;
        self
    }

    /// Check that the required fields are present.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the name is empty or whitespace.
    pub fn validate(&self) -> Result<()> {
        validate_name(&self.name)
    }

    /// Validate and fill in defaults, producing the form that gets stored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the name is empty or whitespace.
    pub fn normalized(mut self) -> Result<Self> {
        self.validate()?;
        if self.category.trim().is_empty() {
            self.category = UNCATEGORIZED.to_string();
        }
        Ok(self)
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::validation("name", "recipe name must not be empty"));
    }
    Ok(())
}

/// A recipe as it appears in an import payload.
///
/// The id is optional; records without one get a fresh id on import.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ImportedRecipe {
    /// Id to upsert at, if present.
    #[serde(default)]
    pub id: Option<i64>,

    /// The record fields.
    #[serde(flatten)]
    pub fields: NewRecipe,
}

/// Filter criteria for listing recipes.
///
/// Empty strings and `false` disable the corresponding predicate, so the
/// default query matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeQuery {
    /// Case-insensitive substring to look for in the name.
    pub text: String,
    /// Exact category to match.
    pub category: String,
    /// Only return favorites.
    pub favorites_only: bool,
}

impl RecipeQuery {
    /// Create a query that matches every recipe.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to names containing `text`.
    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Restrict to a single category.
    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Restrict to favorites.
    #[must_use]
    pub fn favorites_only(mut self, favorites_only: bool) -> Self {
        self.favorites_only = favorites_only;
        self
    }

    /// Check whether a recipe satisfies every active predicate.
    #[must_use]
    pub fn matches(&self, recipe: &Recipe) -> bool {
        let text_ok = self.text.is_empty()
            || recipe
                .name
                .to_lowercase()
                .contains(&self.text.to_lowercase());
        let category_ok = self.category.is_empty() || recipe.category == self.category;
        let favorite_ok = !self.favorites_only || recipe.favorite;

        text_ok && category_ok && favorite_ok
    }

    /// Keep the recipes matching this query, preserving order.
    #[must_use]
    pub fn apply(&self, recipes: Vec<Recipe>) -> Vec<Recipe> {
        recipes.into_iter().filter(|r| self.matches(r)).collect()
    }
}

/// Collect the distinct non-empty categories of the given recipes.
#[must_use]
pub fn distinct_categories<'a, I>(recipes: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'a Recipe>,
{
    recipes
        .into_iter()
        .filter(|r| !r.category.is_empty())
        .map(|r| r.category.clone())
        .collect()
}
