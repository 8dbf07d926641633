//! The crafting recipe catalog.

use std::collections::BTreeMap;
use std::path::Path;

use frontier_types::Recipe;

use crate::error::CatalogError;
use crate::items::ItemRegistry;

const BUILTIN_RECIPES: &str = include_str!("../../../data/recipes.json");

/// Recipes keyed by id.
#[derive(Debug, Clone, Default)]
pub struct RecipeRegistry {
    recipes: BTreeMap<String, Recipe>,
}

impl RecipeRegistry {
    /// Create an empty registry.
    pub const fn new() -> Self {
        Self {
            recipes: BTreeMap::new(),
        }
    }

    /// Build a registry from a list of recipes.
    pub fn from_recipes(recipes: impl IntoIterator<Item = Recipe>) -> Result<Self, CatalogError> {
        let mut registry = Self::new();
        for recipe in recipes {
            registry.insert(recipe)?;
        }
        Ok(registry)
    }

    /// Parse a JSON array of recipes.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let recipes: Vec<Recipe> = serde_json::from_str(json)?;
        Self::from_recipes(recipes)
    }

    /// Load a JSON catalog file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// The catalog bundled with the crate.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_RECIPES)
    }

    /// Add one recipe.
    pub fn insert(&mut self, recipe: Recipe) -> Result<(), CatalogError> {
        if recipe.result_quantity == 0 || recipe.ingredients.is_empty() {
            return Err(CatalogError::Invalid {
                id: recipe.id,
                reason: "recipe needs ingredients and a non-zero result".to_owned(),
            });
        }
        if self.recipes.contains_key(&recipe.id) {
            return Err(CatalogError::Duplicate(recipe.id));
        }
        self.recipes.insert(recipe.id.clone(), recipe);
        Ok(())
    }

    /// Check that every ingredient and result names a known item.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::MissingReference`] for the first unknown id.
    pub fn validate(&self, items: &ItemRegistry) -> Result<(), CatalogError> {
        for recipe in self.recipes.values() {
            let referenced = recipe
                .ingredients
                .keys()
                .chain(std::iter::once(&recipe.result_item));
            for item in referenced {
                if !items.contains(item) {
                    return Err(CatalogError::MissingReference {
                        recipe: recipe.id.clone(),
                        item: item.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Look up a recipe.
    pub fn get(&self, id: &str) -> Option<&Recipe> {
        self.recipes.get(id)
    }

    /// Every recipe, in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Recipe> {
        self.recipes.values()
    }

    /// Recipes producing the given item.
    pub fn producing<'a>(&'a self, item_id: &'a str) -> impl Iterator<Item = &'a Recipe> {
        self.recipes.values().filter(move |r| r.result_item == item_id)
    }

    /// Number of recipes.
    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}

/// Convenience for tests and callers building recipes in code.
pub fn recipe(
    id: &str,
    ingredients: &[(&str, u32)],
    energy_cost: u32,
    result_item: &str,
    result_quantity: u32,
) -> Recipe {
    Recipe {
        id: id.to_owned(),
        name: id.replace('_', " "),
        ingredients: ingredients
            .iter()
            .map(|(item, qty)| ((*item).to_owned(), *qty))
            .collect::<BTreeMap<_, _>>(),
        energy_cost,
        result_item: result_item.to_owned(),
        result_quantity,
    }
}
