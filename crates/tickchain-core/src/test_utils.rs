//! Shared test helpers for unit tests, integration tests and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]`.

use crate::engine::Engine;
use crate::factory::Factory;
use crate::id::FactoryId;
use crate::item::{Inventory, ItemType, Quantity};
use crate::recipe::Recipe;
use crate::sim::Ticks;
use std::sync::Arc;

// ===========================================================================
// Items and inventories
// ===========================================================================

pub fn item(name: &str) -> ItemType {
    ItemType::from(name)
}

pub fn inventory(entries: &[(&str, Quantity)]) -> Inventory {
    entries
        .iter()
        .map(|&(name, quantity)| (item(name), quantity))
        .collect()
}

// ===========================================================================
// Recipes and factories
// ===========================================================================

pub fn make_recipe(
    inputs: &[(&str, Quantity)],
    outputs: &[(&str, Quantity)],
    duration: Ticks,
) -> Arc<Recipe> {
    Arc::new(Recipe::new(inventory(inputs), inventory(outputs), duration).unwrap())
}

pub fn recipe_factory(
    name: &str,
    inputs: &[(&str, Quantity)],
    outputs: &[(&str, Quantity)],
    duration: Ticks,
) -> Factory {
    Factory::new(make_recipe(inputs, outputs, duration)).with_name(name)
}

pub fn storage(name: &str) -> Factory {
    Factory::storage().with_name(name)
}

pub fn storage_unnamed() -> Factory {
    Factory::storage()
}

// ===========================================================================
// Engine helpers
// ===========================================================================

pub fn seed_input(engine: &mut Engine, id: FactoryId, entries: &[(&str, Quantity)]) {
    engine.factory_mut(id).unwrap().input.add_all(&inventory(entries));
}

pub fn seed_output(engine: &mut Engine, id: FactoryId, entries: &[(&str, Quantity)]) {
    engine.factory_mut(id).unwrap().output.add_all(&inventory(entries));
}

pub fn input_quantity(engine: &Engine, id: FactoryId, name: &str) -> Quantity {
    engine.factory(id).unwrap().input.quantity(&item(name))
}

pub fn output_quantity(engine: &Engine, id: FactoryId, name: &str) -> Quantity {
    engine.factory(id).unwrap().output.quantity(&item(name))
}

/// Build a linear chain of `length` factories: a source producing `X` every
/// `duration` ticks followed by converters `X -> X`.
pub fn linear_chain(engine: &mut Engine, length: usize, duration: Ticks) -> Vec<FactoryId> {
    let mut ids = Vec::with_capacity(length);
    for i in 0..length {
        let factory = if i == 0 {
            recipe_factory("source", &[], &[("X", 10)], duration)
        } else {
            recipe_factory(&format!("stage{i}"), &[("X", 10)], &[("X", 10)], duration)
        };
        ids.push(engine.add_factory(factory));
    }
    for pair in ids.windows(2) {
        engine.connect(pair[0], pair[1]).unwrap();
    }
    ids
}
