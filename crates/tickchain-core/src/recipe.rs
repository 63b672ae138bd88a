use crate::item::{Inventory, ItemType, Quantity};
use crate::sim::Ticks;
use serde::Serialize;
use std::num::NonZeroU64;

/// Errors raised when constructing a recipe.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecipeError {
    #[error("recipe duration must be at least one tick")]
    ZeroDuration,
}

/// An immutable transformation: consume `inputs`, wait `duration` ticks,
/// produce `outputs`.
///
/// Recipes are shared between factories through `Arc<Recipe>` and expose no
/// mutating methods once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recipe {
    name: Option<String>,
    inputs: Inventory,
    outputs: Inventory,
    duration: Ticks,
}

impl Recipe {
    pub fn new(inputs: Inventory, outputs: Inventory, duration: Ticks) -> Result<Self, RecipeError> {
        let duration = NonZeroU64::new(duration).ok_or(RecipeError::ZeroDuration)?;
        Ok(Self::with_duration(inputs, outputs, duration))
    }

    /// Infallible constructor for durations already known to be non-zero.
    pub fn with_duration(inputs: Inventory, outputs: Inventory, duration: NonZeroU64) -> Self {
        Self {
            name: None,
            inputs,
            outputs,
            duration: duration.get(),
        }
    }

    /// Build a recipe from `(item, quantity)` lists.
    pub fn from_entries<I, O>(inputs: I, outputs: O, duration: Ticks) -> Result<Self, RecipeError>
    where
        I: IntoIterator<Item = (ItemType, Quantity)>,
        O: IntoIterator<Item = (ItemType, Quantity)>,
    {
        Self::new(
            inputs.into_iter().collect(),
            outputs.into_iter().collect(),
            duration,
        )
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Quantities consumed when a cycle starts.
    pub fn inputs(&self) -> &Inventory {
        &self.inputs
    }

    /// Quantities produced when a cycle completes.
    pub fn outputs(&self) -> &Inventory {
        &self.outputs
    }

    /// Ticks per cycle, always at least one.
    pub fn duration(&self) -> Ticks {
        self.duration
    }
}
