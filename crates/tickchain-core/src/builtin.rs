//! Built-in recipes and the demo mining-to-smelting chain.
//!
//! Each recipe is built once, on first use, and handed out as a shared
//! `Arc` so every factory running it points at the same immutable value.

use crate::engine::Engine;
use crate::factory::Factory;
use crate::graph::GraphError;
use crate::id::FactoryId;
use crate::item::{Inventory, ItemType, Quantity};
use crate::recipe::Recipe;
use std::num::NonZeroU64;
use std::sync::{Arc, LazyLock};

pub const IRON_ORE: &str = "IronOre";
pub const COAL: &str = "Coal";
pub const STEEL: &str = "Steel";
pub const SLAG: &str = "Slag";

/// One tonne in base units.
pub const TONNE: Quantity = 1_000_000_000;

const fn ticks(n: u64) -> NonZeroU64 {
    match NonZeroU64::new(n) {
        Some(n) => n,
        None => panic!("built-in recipe durations are non-zero"),
    }
}

fn entries(list: &[(&str, Quantity)]) -> Inventory {
    list.iter()
        .map(|&(name, quantity)| (ItemType::from(name), quantity))
        .collect()
}

static MINING_IRON: LazyLock<Arc<Recipe>> = LazyLock::new(|| {
    Arc::new(
        Recipe::with_duration(Inventory::new(), entries(&[(IRON_ORE, TONNE)]), ticks(20))
            .with_name("MiningIron"),
    )
});

static MINING_COAL: LazyLock<Arc<Recipe>> = LazyLock::new(|| {
    Arc::new(
        Recipe::with_duration(Inventory::new(), entries(&[(COAL, TONNE / 2)]), ticks(15))
            .with_name("MiningCoal"),
    )
});

static SMELTING: LazyLock<Arc<Recipe>> = LazyLock::new(|| {
    Arc::new(
        Recipe::with_duration(
            entries(&[(IRON_ORE, TONNE), (COAL, TONNE / 5)]),
            entries(&[(STEEL, TONNE * 4 / 5), (SLAG, TONNE / 5)]),
            ticks(100),
        )
        .with_name("Smelting"),
    )
});

/// No inputs; 1t of iron ore every 20 ticks.
pub fn mining_iron() -> Arc<Recipe> {
    Arc::clone(&MINING_IRON)
}

/// No inputs; 0.5t of coal every 15 ticks.
pub fn mining_coal() -> Arc<Recipe> {
    Arc::clone(&MINING_COAL)
}

/// 1t iron ore + 0.2t coal into 0.8t steel + 0.2t slag over 100 ticks.
pub fn smelting() -> Arc<Recipe> {
    Arc::clone(&SMELTING)
}

// ---------------------------------------------------------------------------
// Demo scenario
// ---------------------------------------------------------------------------

/// Factory ids of the demo chain.
#[derive(Debug, Clone, Copy)]
pub struct SmeltingChain {
    pub iron_mine: FactoryId,
    pub coal_mine: FactoryId,
    pub smelter: FactoryId,
    pub warehouse: FactoryId,
}

/// Iron mine and coal mine both feed a smelter, whose steel and slag are
/// collected by a recipe-less warehouse.
pub fn smelting_chain(engine: &mut Engine) -> Result<SmeltingChain, GraphError> {
    let iron_mine = engine.add_factory(Factory::new(mining_iron()).with_name("IronMine"));
    let coal_mine = engine.add_factory(Factory::new(mining_coal()).with_name("CoalMine"));
    let smelter = engine.add_factory(Factory::new(smelting()).with_name("Smelter"));
    let warehouse = engine.add_factory(Factory::storage().with_name("Warehouse"));

    engine.connect(iron_mine, smelter)?;
    engine.connect(coal_mine, smelter)?;
    engine.connect(smelter, warehouse)?;

    Ok(SmeltingChain {
        iron_mine,
        coal_mine,
        smelter,
        warehouse,
    })
}
