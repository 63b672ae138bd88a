//! Read-only snapshots of simulation state.
//!
//! Snapshots are owned copies with no references into engine storage, so they
//! can be serialized or handed to presentation code freely.

use crate::factory::{Factory, FactoryState};
use crate::id::FactoryId;
use crate::item::Inventory;
use crate::sim::Ticks;

/// An aggregated, read-only view of a single factory.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct FactorySnapshot {
    /// The factory's id in the production graph.
    pub id: FactoryId,
    /// Display name, or positional label (`f1`, `f2`, ...) when unnamed.
    pub label: String,
    pub state: FactoryState,
    /// Ticks into the current cycle; 0 when idle.
    pub progress: Ticks,
    /// Recipe duration, `None` for storage factories.
    pub duration: Option<Ticks>,
    pub input: Inventory,
    pub output: Inventory,
}

impl FactorySnapshot {
    /// Snapshot `factory`, which sits at `index` in declared order.
    pub fn of(index: usize, id: FactoryId, factory: &Factory) -> Self {
        Self {
            id,
            label: factory.label(index),
            state: factory.state(),
            progress: factory.progress(),
            duration: factory.recipe().map(|r| r.duration()),
            input: factory.input.clone(),
            output: factory.output.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::engine::Engine;
    use crate::test_utils::*;

    #[test]
    fn snapshot_copies_factory_state() {
        let mut engine = Engine::new();
        engine.add_factory(recipe_factory("mine", &[], &[("IronOre", 10)], 4));
        engine.add_factory(storage_unnamed());
        engine.step();

        let snaps = engine.snapshot();
        assert_eq!(snaps.len(), 2);
        assert_eq!(snaps[0].label, "mine");
        assert_eq!(snaps[0].progress, 1);
        assert_eq!(snaps[0].duration, Some(4));
        assert_eq!(snaps[1].label, "f2");
        assert_eq!(snaps[1].duration, None);
    }

    #[test]
    fn snapshot_serializes_inventories_as_maps() {
        let mut engine = Engine::new();
        let id = engine.add_factory(storage("depot"));
        seed_input(&mut engine, id, &[("Coal", 5)]);

        let json = serde_json::to_value(&engine.snapshot()[0]).unwrap();
        assert_eq!(json["label"], "depot");
        assert_eq!(json["input"]["Coal"], 5);
        assert_eq!(json["state"], "Idle");
    }
}
