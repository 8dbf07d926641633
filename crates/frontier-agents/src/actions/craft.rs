//! CRAFT: turn recipe ingredients into the result item.
//!
//! Ingredients are removed and the result added against a copy of the
//! inventory; the copy only replaces the real one when everything fits.

use frontier_types::{ActionDetails, ActionParameters, ActionResult, ActionType, Recipe};

use super::{ActionContext, ActionHandler, validate_then};
use crate::error::ActionError;

/// Handler for [`ActionType::Craft`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CraftHandler;

fn recipe<'r>(ctx: &ActionContext<'r>) -> Result<&'r Recipe, ActionError> {
    let recipe_id = match &ctx.request.parameters {
        ActionParameters::Craft { recipe_id } => recipe_id,
        _ => return Err(ActionError::InvalidParameters(ActionType::Craft)),
    };
    ctx.recipe_registry()?
        .get(recipe_id)
        .ok_or_else(|| ActionError::UnknownRecipe(recipe_id.clone()))
}

impl ActionHandler for CraftHandler {
    fn action_type(&self) -> ActionType {
        ActionType::Craft
    }

    fn validate(&self, ctx: &ActionContext<'_>) -> Result<(), ActionError> {
        let recipe = recipe(ctx)?;
        let agent = ctx.agent()?;
        if !recipe
            .ingredients
            .iter()
            .all(|(item, qty)| agent.inventory.has_item(item, *qty))
        {
            return Err(ActionError::MissingIngredients);
        }
        if agent.energy < recipe.energy_cost {
            return Err(ActionError::NotEnoughEnergy);
        }
        if !ctx.item_registry()?.contains(&recipe.result_item) {
            return Err(ActionError::UnknownItem(recipe.result_item.clone()));
        }
        Ok(())
    }

    fn process(&self, ctx: &mut ActionContext<'_>) -> ActionResult {
        validate_then(self, ctx, |ctx| {
            let recipe = recipe(ctx)?;
            let result_def = ctx
                .item_registry()?
                .get(&recipe.result_item)
                .ok_or_else(|| ActionError::UnknownItem(recipe.result_item.clone()))?;

            let agent = ctx.agent_mut()?;
            let mut staged = agent.inventory.clone();
            for (item, qty) in &recipe.ingredients {
                staged.remove_item(item, *qty)?;
            }
            if staged.add_item(result_def, recipe.result_quantity) > 0 {
                return Err(ActionError::InventoryFull);
            }
            agent.spend_energy(recipe.energy_cost)?;
            agent.inventory = staged;

            Ok(ctx.succeed(
                format!("crafted {} {}", recipe.result_quantity, recipe.result_item),
                ActionDetails {
                    item_id: Some(recipe.result_item.clone()),
                    quantity: Some(recipe.result_quantity),
                    energy_spent: Some(recipe.energy_cost),
                    ..ActionDetails::default()
                },
            ))
        })
    }
}
