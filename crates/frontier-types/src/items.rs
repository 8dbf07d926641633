//! Item and recipe catalog records, and the item instances agents carry.
//!
//! Definitions and recipes are static data loaded from JSON catalogs; the
//! registries that index them live in `frontier-agents`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{ItemCategory, Rarity, StructureType};

/// A static item definition from the item catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ItemDefinition {
    /// Catalog key, e.g. `"wood"` or `"health_potion"`.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Broad category.
    pub category: ItemCategory,
    /// Rarity tier.
    #[serde(default)]
    pub rarity: Rarity,
    /// Maximum quantity a single inventory slot may hold.
    #[serde(default = "default_max_stack")]
    pub max_stack: u32,
    /// Energy spent when the item is used (placeables).
    #[serde(default)]
    pub energy_cost: u32,
    /// Whether USE consumes the item for an effect.
    #[serde(default)]
    pub usable: bool,
    /// Whether USE places the item as a structure.
    #[serde(default)]
    pub placeable: bool,
    /// Arbitrary named properties (`heal`, `energy`, `damage_bonus`,
    /// `armor_bonus`, `structure_type`, `structure_hp`, `trap_damage`, ...).
    #[serde(default)]
    pub properties: BTreeMap<String, serde_json::Value>,
}

const fn default_max_stack() -> u32 {
    1
}

impl ItemDefinition {
    /// Read a non-negative integer property, `0` when absent or malformed.
    pub fn property_u32(&self, key: &str) -> u32 {
        self.properties
            .get(key)
            .and_then(serde_json::Value::as_u64)
            .and_then(|v| u32::try_from(v).ok())
            .unwrap_or(0)
    }

    /// HP restored when consumed.
    pub fn heal(&self) -> u32 {
        self.property_u32("heal")
    }

    /// Energy restored when consumed.
    pub fn energy(&self) -> u32 {
        self.property_u32("energy")
    }

    /// Damage added when equipped as a weapon.
    pub fn damage_bonus(&self) -> u32 {
        self.property_u32("damage_bonus")
    }

    /// Damage absorbed when equipped as armor.
    pub fn armor_bonus(&self) -> u32 {
        self.property_u32("armor_bonus")
    }

    /// The structure this item becomes when placed.
    pub fn structure_type(&self) -> Option<StructureType> {
        self.properties
            .get("structure_type")
            .and_then(serde_json::Value::as_str)
            .and_then(|s| s.parse().ok())
    }
}

/// A crafting recipe from the recipe catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Recipe {
    /// Catalog key.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Item id -> quantity consumed.
    pub ingredients: BTreeMap<String, u32>,
    /// Energy spent to craft.
    #[serde(default)]
    pub energy_cost: u32,
    /// Item id produced.
    pub result_item: String,
    /// Quantity produced.
    #[serde(default = "default_result_quantity")]
    pub result_quantity: u32,
}

const fn default_result_quantity() -> u32 {
    1
}

/// A stack of one item definition held in a slot, equipped, or dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ItemInstance {
    /// The definition this stack is an instance of.
    pub item_id: String,
    /// Number of units in the stack.
    pub quantity: u32,
    /// Remaining durability for gear.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub durability: Option<u32>,
    /// Free-form instance metadata.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

impl ItemInstance {
    /// A plain stack with no durability or metadata.
    pub fn new(item_id: impl Into<String>, quantity: u32) -> Self {
        Self {
            item_id: item_id.into(),
            quantity,
            durability: None,
            metadata: BTreeMap::new(),
        }
    }
}

/// The three equipment slots of an inventory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Equipment {
    /// Weapon slot.
    pub weapon: Option<ItemInstance>,
    /// Armor slot.
    pub armor: Option<ItemInstance>,
    /// Trinket slot.
    pub trinket: Option<ItemInstance>,
}

/// Private inventory view sent only to its owner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct InventoryView {
    /// Slot contents in slot order.
    pub slots: Vec<Option<ItemInstance>>,
    /// Equipped items.
    pub equipment: Equipment,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn definition_defaults_from_sparse_json() {
        let json = r#"{"id":"wood","name":"Wood","category":"resource"}"#;
        let def: ItemDefinition = serde_json::from_str(json).unwrap_or_else(|_| ItemDefinition {
            id: String::new(),
            name: String::new(),
            category: ItemCategory::Material,
            rarity: Rarity::Common,
            max_stack: 0,
            energy_cost: 0,
            usable: false,
            placeable: false,
            properties: BTreeMap::new(),
        });
        assert_eq!(def.id, "wood");
        assert_eq!(def.max_stack, 1);
        assert!(!def.usable);
    }

    #[test]
    fn numeric_properties_read_back() {
        let json = r#"{"id":"potion","name":"Potion","category":"consumable",
            "usable":true,"properties":{"heal":30,"structure_type":"wall"}}"#;
        let def: Result<ItemDefinition, _> = serde_json::from_str(json);
        assert!(def.is_ok());
        if let Ok(def) = def {
            assert_eq!(def.heal(), 30);
            assert_eq!(def.energy(), 0);
            assert_eq!(def.structure_type(), Some(StructureType::Wall));
        }
    }
}
