use crate::item::Inventory;
use crate::recipe::Recipe;
use crate::sim::Ticks;
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Factory state
// ---------------------------------------------------------------------------

/// Where a factory is in its recipe cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub enum FactoryState {
    /// Waiting for inputs (or no recipe at all).
    #[default]
    Idle,
    /// Inputs consumed, `progress` ticks into a cycle of the recipe's duration.
    Running { progress: Ticks },
}

// ---------------------------------------------------------------------------
// Tick result
// ---------------------------------------------------------------------------

/// The outcome of a single tick for one factory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutcome {
    /// Items removed from the input inventory this tick.
    pub consumed: Inventory,
    /// Items added to the output inventory this tick.
    pub produced: Inventory,
    /// A cycle started this tick.
    pub started: bool,
    /// A cycle completed this tick.
    pub completed: bool,
}

impl ProcessOutcome {
    pub fn state_changed(&self) -> bool {
        self.started || self.completed
    }
}

// ---------------------------------------------------------------------------
// Factory
// ---------------------------------------------------------------------------

/// A node in the production graph.
///
/// Holds an input and an output inventory, at most one recipe for its whole
/// lifetime, and a progress counter. A factory without a recipe is a plain
/// storage node: material arrives in its input and stays there.
#[derive(Debug, Clone, Default)]
pub struct Factory {
    name: Option<String>,
    pub input: Inventory,
    pub output: Inventory,
    recipe: Option<Arc<Recipe>>,
    /// `0 <= progress < recipe.duration()`, except a one-tick recipe which
    /// holds 1 for its start tick; always 0 without a recipe.
    progress: Ticks,
}

impl Factory {
    /// A factory running `recipe`, with empty inventories.
    pub fn new(recipe: Arc<Recipe>) -> Self {
        Self {
            recipe: Some(recipe),
            ..Self::default()
        }
    }

    /// A pass-through/storage factory with no recipe.
    pub fn storage() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Display name, or a 1-based positional label such as `f3`.
    pub fn label(&self, index: usize) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("f{}", index + 1),
        }
    }

    pub fn recipe(&self) -> Option<&Arc<Recipe>> {
        self.recipe.as_ref()
    }

    pub fn progress(&self) -> Ticks {
        self.progress
    }

    pub fn state(&self) -> FactoryState {
        if self.progress == 0 {
            FactoryState::Idle
        } else {
            FactoryState::Running {
                progress: self.progress,
            }
        }
    }

    /// `current/duration`, or `-` without a recipe.
    pub fn progress_display(&self) -> String {
        match &self.recipe {
            Some(recipe) => format!("{}/{}", self.progress, recipe.duration()),
            None => "-".to_string(),
        }
    }

    /// Advance the recipe state machine by one tick.
    ///
    /// Idle: start only when the whole input requirement is present, consuming
    /// it atomically and moving to progress 1. Running: count one tick and,
    /// on reaching the duration, emit outputs and return to idle. The next
    /// start check happens on the following tick.
    ///
    /// Completion is only checked on the counting branch, so a cycle never
    /// starts and finishes in the same tick. A one-tick recipe therefore sits
    /// at `1/1` for the tick it starts and emits on the next one.
    pub fn tick(&mut self) -> ProcessOutcome {
        let mut outcome = ProcessOutcome::default();
        let Some(recipe) = self.recipe.as_ref() else {
            return outcome;
        };

        if self.progress == 0 {
            // All-or-nothing: a short input leaves the inventory untouched.
            if self.input.remove_all(recipe.inputs()).is_err() {
                return outcome;
            }
            outcome.consumed = recipe.inputs().clone();
            outcome.started = true;
            self.progress = 1;
            tracing::debug!(factory = ?self.name, "recipe started");
            return outcome;
        }

        self.progress += 1;
        if self.progress >= recipe.duration() {
            self.output.add_all(recipe.outputs());
            outcome.produced = recipe.outputs().clone();
            outcome.completed = true;
            self.progress = 0;
            tracing::debug!(factory = ?self.name, "recipe completed");
        }

        outcome
    }
}
