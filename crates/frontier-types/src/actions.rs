//! Action request and result types for agent-to-engine communication.
//!
//! An [`ActionRequest`] is what a decision maker hands back for one agent
//! for one tick. The action type tag is derived from the
//! [`ActionParameters`] variant so the two can never disagree. An
//! [`ActionResult`] is the applied outcome, consumed by the broadcast layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{ActionType, EquipmentSlot, UpgradeKind};
use crate::geometry::{Direction, Position};
use crate::ids::{AgentId, ObjectId};

// ---------------------------------------------------------------------------
// ActionParameters
// ---------------------------------------------------------------------------

/// Action-specific parameters. Each variant corresponds to one
/// player-submittable [`ActionType`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "bindings/")]
pub enum ActionParameters {
    /// Parameters for [`ActionType::Move`].
    Move {
        /// Direction to walk in.
        direction: Direction,
    },
    /// Parameters for [`ActionType::Claim`].
    Claim,
    /// Parameters for [`ActionType::Fight`].
    Fight {
        /// The agent to attack.
        target_id: AgentId,
    },
    /// Parameters for [`ActionType::Harvest`].
    Harvest,
    /// Parameters for [`ActionType::Pickup`].
    Pickup,
    /// Parameters for [`ActionType::Use`].
    Use {
        /// Item definition id to use.
        item_id: String,
    },
    /// Parameters for [`ActionType::Upgrade`].
    Upgrade {
        /// Track to raise.
        upgrade: UpgradeKind,
    },
    /// Parameters for [`ActionType::Message`].
    Message {
        /// Direct recipient; `None` broadcasts.
        #[serde(default)]
        target_id: Option<AgentId>,
        /// Message body.
        text: String,
    },
    /// Parameters for [`ActionType::Wait`].
    Wait,
    /// Parameters for [`ActionType::Craft`].
    Craft {
        /// Recipe to craft.
        recipe_id: String,
    },
    /// Parameters for [`ActionType::Equip`].
    Equip {
        /// Item definition id to equip.
        item_id: String,
    },
    /// Parameters for [`ActionType::Unequip`].
    Unequip {
        /// Slot to empty.
        slot: EquipmentSlot,
    },
    /// Parameters for [`ActionType::Drop`].
    Drop {
        /// Item definition id to drop.
        item_id: String,
        /// Units to drop.
        quantity: u32,
    },
}

impl ActionParameters {
    /// The type tag this variant stands for.
    pub const fn action_type(&self) -> ActionType {
        match self {
            Self::Move { .. } => ActionType::Move,
            Self::Claim => ActionType::Claim,
            Self::Fight { .. } => ActionType::Fight,
            Self::Harvest => ActionType::Harvest,
            Self::Pickup => ActionType::Pickup,
            Self::Use { .. } => ActionType::Use,
            Self::Upgrade { .. } => ActionType::Upgrade,
            Self::Message { .. } => ActionType::Message,
            Self::Wait => ActionType::Wait,
            Self::Craft { .. } => ActionType::Craft,
            Self::Equip { .. } => ActionType::Equip,
            Self::Unequip { .. } => ActionType::Unequip,
            Self::Drop { .. } => ActionType::Drop,
        }
    }
}

// ---------------------------------------------------------------------------
// ActionRequest
// ---------------------------------------------------------------------------

/// An action submitted by (or on behalf of) an agent for one tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ActionRequest {
    /// The acting agent.
    pub agent_id: AgentId,
    /// Tick the action was decided for.
    pub tick: u64,
    /// Action-specific data.
    pub parameters: ActionParameters,
    /// Arrival timestamp; earlier arrivals are applied first.
    pub submitted_at: DateTime<Utc>,
}

impl ActionRequest {
    /// Build a request stamped with the current time.
    pub fn new(agent_id: AgentId, tick: u64, parameters: ActionParameters) -> Self {
        Self {
            agent_id,
            tick,
            parameters,
            submitted_at: Utc::now(),
        }
    }

    /// The default no-op for agents that failed to decide in time.
    pub fn wait(agent_id: AgentId, tick: u64) -> Self {
        Self::new(agent_id, tick, ActionParameters::Wait)
    }

    /// The type tag of this action.
    pub const fn action_type(&self) -> ActionType {
        self.parameters.action_type()
    }
}

// ---------------------------------------------------------------------------
// ActionResult
// ---------------------------------------------------------------------------

/// Optional typed payload fields of an [`ActionResult`]. Only the fields
/// relevant to the action are set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ActionDetails {
    /// Where the agent ended up (MOVE, portal).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_position: Option<Position>,
    /// Tiles walked (MOVE).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps: Option<u32>,
    /// Tiles that changed hands (CLAIM).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub claimed_tiles: Vec<Position>,
    /// How many of the claimed tiles belonged to another agent (CLAIM).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captured: Option<u32>,
    /// HP actually removed from the target (FIGHT, trap).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damage_dealt: Option<u32>,
    /// The other agent involved (FIGHT).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_id: Option<AgentId>,
    /// Whether the target died (FIGHT, trap).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_killed: Option<bool>,
    /// Item involved (HARVEST, PICKUP, USE, CRAFT, EQUIP, DROP, cache).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_id: Option<String>,
    /// Quantity involved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    /// Energy spent by the action.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy_spent: Option<u32>,
    /// Level reached (UPGRADE).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_level: Option<u8>,
    /// World object created, consumed, or triggered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_id: Option<ObjectId>,
    /// HP restored (USE, shrine).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hp_restored: Option<u32>,
    /// Energy restored (USE, shrine).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy_restored: Option<u32>,
    /// Direct recipient (MESSAGE); absent for broadcasts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<AgentId>,
}

/// The applied outcome of one action or derived effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ActionResult {
    /// The tick the action was applied in.
    pub tick: u64,
    /// The agent who acted (or was affected, for derived effects).
    pub agent_id: AgentId,
    /// What was attempted.
    pub action_type: ActionType,
    /// Whether the action took effect.
    pub success: bool,
    /// Human-readable outcome or failure reason.
    pub message: String,
    /// Typed payload.
    #[serde(default)]
    pub details: ActionDetails,
}

impl ActionResult {
    /// A successful result with an empty payload.
    pub fn success(
        tick: u64,
        agent_id: AgentId,
        action_type: ActionType,
        message: impl Into<String>,
    ) -> Self {
        Self {
            tick,
            agent_id,
            action_type,
            success: true,
            message: message.into(),
            details: ActionDetails::default(),
        }
    }

    /// A failed result; nothing was mutated.
    pub fn failure(
        tick: u64,
        agent_id: AgentId,
        action_type: ActionType,
        message: impl Into<String>,
    ) -> Self {
        Self {
            tick,
            agent_id,
            action_type,
            success: false,
            message: message.into(),
            details: ActionDetails::default(),
        }
    }

    /// Attach a payload.
    #[must_use]
    pub fn with_details(mut self, details: ActionDetails) -> Self {
        self.details = details;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parameters_carry_their_type() {
        let params = ActionParameters::Move {
            direction: Direction::East,
        };
        assert_eq!(params.action_type(), ActionType::Move);
        assert_eq!(ActionParameters::Wait.action_type(), ActionType::Wait);
    }

    #[test]
    fn parameters_parse_from_tagged_json() {
        let json = r#"{"type":"UPGRADE","upgrade":"speed"}"#;
        let params: Result<ActionParameters, _> = serde_json::from_str(json);
        assert_eq!(
            params.ok(),
            Some(ActionParameters::Upgrade {
                upgrade: UpgradeKind::Speed
            })
        );
    }

    #[test]
    fn message_target_is_optional() {
        let json = r#"{"type":"MESSAGE","text":"hello"}"#;
        let params: Result<ActionParameters, _> = serde_json::from_str(json);
        assert!(matches!(
            params,
            Ok(ActionParameters::Message { target_id: None, .. })
        ));
    }

    #[test]
    fn empty_details_serialize_compactly() {
        let result = ActionResult::success(1, AgentId::new(), ActionType::Wait, "holding position");
        let json = serde_json::to_value(&result).ok();
        let details = json.as_ref().and_then(|v| v.get("details"));
        assert_eq!(details, Some(&serde_json::json!({})));
    }
}
