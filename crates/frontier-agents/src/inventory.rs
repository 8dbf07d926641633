//! Slotted per-agent item storage with three equipment slots.
//!
//! Each slot holds at most one [`ItemInstance`] whose quantity never exceeds
//! its definition's `max_stack`. Two instances stack only when they share
//! the definition id, durability, and metadata. All arithmetic is checked
//! or saturating; nothing here panics.

use frontier_types::{
    AgentId, Equipment, EquipmentSlot, InventoryView, ItemDefinition, ItemInstance,
};

use crate::error::InventoryError;
use crate::items::ItemRegistry;

/// An agent's inventory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inventory {
    owner: AgentId,
    slots: Vec<Option<ItemInstance>>,
    equipment: Equipment,
}

fn stacks_with(held: &ItemInstance, incoming: &ItemInstance) -> bool {
    held.item_id == incoming.item_id
        && held.durability == incoming.durability
        && held.metadata == incoming.metadata
}

impl Inventory {
    /// An empty inventory with `slot_count` slots.
    pub fn new(owner: AgentId, slot_count: usize) -> Self {
        Self {
            owner,
            slots: vec![None; slot_count],
            equipment: Equipment::default(),
        }
    }

    /// The owning agent.
    pub const fn owner(&self) -> AgentId {
        self.owner
    }

    /// Slot contents in slot order.
    pub fn slots(&self) -> &[Option<ItemInstance>] {
        &self.slots
    }

    /// Number of slots.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of empty slots.
    pub fn free_slots(&self) -> usize {
        self.slots.iter().filter(|s| s.is_none()).count()
    }

    /// Whether every slot is occupied. A full inventory may still top up
    /// partially filled stacks.
    pub fn is_full(&self) -> bool {
        self.free_slots() == 0
    }

    /// Total units of an item held in slots (equipment excluded).
    pub fn count(&self, item_id: &str) -> u32 {
        self.slots
            .iter()
            .flatten()
            .filter(|i| i.item_id == item_id)
            .fold(0_u32, |acc, i| acc.saturating_add(i.quantity))
    }

    /// Whether at least `quantity` units are held.
    pub fn has_item(&self, item_id: &str, quantity: u32) -> bool {
        self.count(item_id) >= quantity
    }

    /// Units of `incoming` that would fit without touching anything.
    pub fn room_for(&self, def: &ItemDefinition, incoming: &ItemInstance) -> u32 {
        self.slots.iter().fold(0_u32, |acc, slot| {
            let room = match slot {
                None => def.max_stack,
                Some(held) if stacks_with(held, incoming) => {
                    def.max_stack.saturating_sub(held.quantity)
                }
                Some(_) => 0,
            };
            acc.saturating_add(room)
        })
    }

    /// Whether `quantity` plain units of `def` fit.
    pub fn can_fit(&self, def: &ItemDefinition, quantity: u32) -> bool {
        self.room_for(def, &ItemInstance::new(def.id.clone(), quantity)) >= quantity
    }

    /// Add plain units of an item, returning the quantity that did not fit.
    pub fn add_item(&mut self, def: &ItemDefinition, quantity: u32) -> u32 {
        self.add_instance(def, ItemInstance::new(def.id.clone(), quantity))
    }

    /// Add an instance (keeping its durability and metadata), returning the
    /// quantity that did not fit.
    ///
    /// Existing matching stacks are topped up first, then empty slots are
    /// filled in slot order.
    pub fn add_instance(&mut self, def: &ItemDefinition, incoming: ItemInstance) -> u32 {
        let mut remaining = incoming.quantity;
        if def.max_stack == 0 {
            return remaining;
        }

        for held in self.slots.iter_mut().flatten() {
            if remaining == 0 {
                break;
            }
            if stacks_with(held, &incoming) {
                let moved = def.max_stack.saturating_sub(held.quantity).min(remaining);
                held.quantity = held.quantity.saturating_add(moved);
                remaining = remaining.saturating_sub(moved);
            }
        }

        for slot in &mut self.slots {
            if remaining == 0 {
                break;
            }
            if slot.is_none() {
                let moved = def.max_stack.min(remaining);
                *slot = Some(ItemInstance {
                    quantity: moved,
                    ..incoming.clone()
                });
                remaining = remaining.saturating_sub(moved);
            }
        }

        remaining
    }

    /// Remove `quantity` units of an item from slots, emptying slots that
    /// reach zero. Nothing changes on failure.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::InsufficientQuantity`] when fewer units are
    /// held.
    pub fn remove_item(&mut self, item_id: &str, quantity: u32) -> Result<(), InventoryError> {
        self.take_item(item_id, quantity).map(|_| ())
    }

    /// Like [`Inventory::remove_item`], but returns the removed units with
    /// their durability and metadata. Units that stack together come back
    /// as one instance.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::InsufficientQuantity`] when fewer units are
    /// held.
    pub fn take_item(
        &mut self,
        item_id: &str,
        quantity: u32,
    ) -> Result<Vec<ItemInstance>, InventoryError> {
        let available = self.count(item_id);
        if available < quantity {
            return Err(InventoryError::InsufficientQuantity {
                item_id: item_id.to_owned(),
                requested: quantity,
                available,
            });
        }

        let mut taken: Vec<ItemInstance> = Vec::new();
        let mut remaining = quantity;
        // Drain from the back so earlier slots keep their stacks.
        for slot in self.slots.iter_mut().rev() {
            if remaining == 0 {
                break;
            }
            let Some(held) = slot.as_mut() else { continue };
            if held.item_id != item_id {
                continue;
            }
            let amount = held.quantity.min(remaining);
            held.quantity = held.quantity.saturating_sub(amount);
            remaining = remaining.saturating_sub(amount);
            match taken.iter_mut().find(|t| stacks_with(t, held)) {
                Some(portion) => portion.quantity = portion.quantity.saturating_add(amount),
                None => taken.push(ItemInstance {
                    quantity: amount,
                    ..held.clone()
                }),
            }
            if held.quantity == 0 {
                *slot = None;
            }
        }
        Ok(taken)
    }

    /// Take one unit of an item out of its slot, keeping its instance data.
    fn take_one(&mut self, item_id: &str) -> Option<ItemInstance> {
        let slot = self
            .slots
            .iter_mut()
            .rev()
            .find(|s| s.as_ref().is_some_and(|i| i.item_id == item_id))?;
        let held = slot.as_mut()?;
        let unit = ItemInstance {
            quantity: 1,
            ..held.clone()
        };
        held.quantity = held.quantity.saturating_sub(1);
        if held.quantity == 0 {
            *slot = None;
        }
        Some(unit)
    }

    /// The equipped item in a slot.
    pub const fn equipped(&self, slot: EquipmentSlot) -> Option<&ItemInstance> {
        match slot {
            EquipmentSlot::Weapon => self.equipment.weapon.as_ref(),
            EquipmentSlot::Armor => self.equipment.armor.as_ref(),
            EquipmentSlot::Trinket => self.equipment.trinket.as_ref(),
        }
    }

    const fn equipment_slot_mut(&mut self, slot: EquipmentSlot) -> &mut Option<ItemInstance> {
        match slot {
            EquipmentSlot::Weapon => &mut self.equipment.weapon,
            EquipmentSlot::Armor => &mut self.equipment.armor,
            EquipmentSlot::Trinket => &mut self.equipment.trinket,
        }
    }

    /// All equipment.
    pub const fn equipment(&self) -> &Equipment {
        &self.equipment
    }

    /// Equip one unit of an item into the slot its category maps to. A
    /// previously equipped item is swapped back into the inventory. Nothing
    /// changes on failure.
    ///
    /// Returns the slot used.
    pub fn equip(
        &mut self,
        item_id: &str,
        items: &ItemRegistry,
    ) -> Result<EquipmentSlot, InventoryError> {
        let def = items
            .get(item_id)
            .ok_or_else(|| InventoryError::UnknownItem(item_id.to_owned()))?;
        let slot = def
            .category
            .equipment_slot()
            .ok_or_else(|| InventoryError::NotEquippable(item_id.to_owned()))?;

        let before = self.clone();
        let unit = self
            .take_one(item_id)
            .ok_or_else(|| InventoryError::InsufficientQuantity {
                item_id: item_id.to_owned(),
                requested: 1,
                available: 0,
            })?;

        if let Some(previous) = self.equipment_slot_mut(slot).take() {
            let previous_def = items
                .get(&previous.item_id)
                .ok_or_else(|| InventoryError::UnknownItem(previous.item_id.clone()));
            let leftover = previous_def.map(|d| self.add_instance(d, previous));
            match leftover {
                Ok(0) => {}
                Ok(_) => {
                    *self = before;
                    return Err(InventoryError::Full);
                }
                Err(err) => {
                    *self = before;
                    return Err(err);
                }
            }
        }

        *self.equipment_slot_mut(slot) = Some(unit);
        Ok(slot)
    }

    /// Move an equipped item back into the inventory. Nothing changes on
    /// failure.
    pub fn unequip(
        &mut self,
        slot: EquipmentSlot,
        items: &ItemRegistry,
    ) -> Result<ItemInstance, InventoryError> {
        let equipped = self
            .equipped(slot)
            .cloned()
            .ok_or(InventoryError::NothingEquipped(slot))?;
        let def = items
            .get(&equipped.item_id)
            .ok_or_else(|| InventoryError::UnknownItem(equipped.item_id.clone()))?;
        if self.room_for(def, &equipped) < equipped.quantity {
            return Err(InventoryError::Full);
        }
        let _ = self.add_instance(def, equipped.clone());
        *self.equipment_slot_mut(slot) = None;
        Ok(equipped)
    }

    /// Sum a numeric property over equipped items.
    pub fn equipment_bonus(&self, items: &ItemRegistry, property: &str) -> u32 {
        [
            &self.equipment.weapon,
            &self.equipment.armor,
            &self.equipment.trinket,
        ]
        .into_iter()
        .flatten()
        .filter_map(|i| items.get(&i.item_id))
        .fold(0_u32, |acc, d| acc.saturating_add(d.property_u32(property)))
    }

    /// Whether anything is equipped.
    pub const fn has_equipment(&self) -> bool {
        self.equipment.weapon.is_some()
            || self.equipment.armor.is_some()
            || self.equipment.trinket.is_some()
    }

    /// Grow the slot array to `slot_count`. Never shrinks.
    pub fn expand(&mut self, slot_count: usize) {
        if slot_count > self.slots.len() {
            self.slots.resize(slot_count, None);
        }
    }

    /// Empty every slot and equipment slot, returning what was held.
    pub fn clear(&mut self) -> Vec<ItemInstance> {
        let mut out: Vec<ItemInstance> = self.slots.iter_mut().filter_map(Option::take).collect();
        out.extend(
            [
                self.equipment.weapon.take(),
                self.equipment.armor.take(),
                self.equipment.trinket.take(),
            ]
            .into_iter()
            .flatten(),
        );
        out
    }

    /// Whether nothing is held or equipped.
    pub fn is_empty(&self) -> bool {
        self.free_slots() == self.slots.len() && !self.has_equipment()
    }

    /// Owner-only view for contexts and per-player deltas.
    pub fn view(&self) -> InventoryView {
        InventoryView {
            slots: self.slots.clone(),
            equipment: self.equipment.clone(),
        }
    }
}
