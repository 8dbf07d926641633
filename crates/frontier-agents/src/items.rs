//! The item catalog.
//!
//! An [`ItemRegistry`] is an explicit value owned by whoever builds a game;
//! there is no process-wide catalog. It is read-only once built and is
//! shared between games behind an `Arc`.

use std::collections::BTreeMap;
use std::path::Path;

use frontier_types::ItemDefinition;

use crate::error::CatalogError;

const BUILTIN_ITEMS: &str = include_str!("../../../data/items.json");

/// Item definitions keyed by id.
#[derive(Debug, Clone, Default)]
pub struct ItemRegistry {
    items: BTreeMap<String, ItemDefinition>,
}

impl ItemRegistry {
    /// Create an empty registry.
    pub const fn new() -> Self {
        Self {
            items: BTreeMap::new(),
        }
    }

    /// Build a registry from a list of definitions.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Duplicate`] when two definitions share an id,
    /// or [`CatalogError::Invalid`] for a zero `max_stack`.
    pub fn from_definitions(
        definitions: impl IntoIterator<Item = ItemDefinition>,
    ) -> Result<Self, CatalogError> {
        let mut registry = Self::new();
        for def in definitions {
            registry.insert(def)?;
        }
        Ok(registry)
    }

    /// Parse a JSON array of item definitions.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let definitions: Vec<ItemDefinition> = serde_json::from_str(json)?;
        Self::from_definitions(definitions)
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
        Self::from_json(BUILTIN_ITEMS)
    }

    /// Add one definition.
    pub fn insert(&mut self, def: ItemDefinition) -> Result<(), CatalogError> {
        if def.max_stack == 0 {
            return Err(CatalogError::Invalid {
                id: def.id,
                reason: "max_stack must be at least 1".to_owned(),
            });
        }
        if self.items.contains_key(&def.id) {
            return Err(CatalogError::Duplicate(def.id));
        }
        self.items.insert(def.id.clone(), def);
        Ok(())
    }

    /// Look up a definition.
    pub fn get(&self, id: &str) -> Option<&ItemDefinition> {
        self.items.get(id)
    }

    /// Whether the id is known.
    pub fn contains(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }

    /// Every definition, in id order.
    pub fn iter(&self) -> impl Iterator<Item = &ItemDefinition> {
        self.items.values()
    }

    /// Number of definitions.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
