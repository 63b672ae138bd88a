//! Simulation clock and state hashing.

use crate::item::Inventory;

/// A count of simulation ticks.
pub type Ticks = u64;

// ---------------------------------------------------------------------------
// Simulation state
// ---------------------------------------------------------------------------

/// Mutable simulation state tracked by the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct SimState {
    /// Number of completed steps. The first `step()` call runs tick 1.
    pub tick: Ticks,
}

impl SimState {
    /// Create a new simulation state starting at tick 0.
    pub fn new() -> Self {
        Self { tick: 0 }
    }
}

// ---------------------------------------------------------------------------
// State hash
// ---------------------------------------------------------------------------

/// Fingerprint of an engine's tick counter, progress counters and inventories.
///
/// Two runs built from the same graph must produce the same fingerprint after
/// the same number of ticks; `Engine::state_hash` feeds factories in declared
/// order so any divergence in transfer or processing order shows up here.
/// 64-bit FNV-1a over little-endian integers and length-prefixed names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateHash(u64);

const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const PRIME: u64 = 0x0000_0100_0000_01b3;

impl StateHash {
    pub fn new() -> Self {
        Self(OFFSET_BASIS)
    }

    fn write_bytes(&mut self, bytes: &[u8]) {
        self.0 = bytes
            .iter()
            .fold(self.0, |acc, &b| (acc ^ u64::from(b)).wrapping_mul(PRIME));
    }

    pub fn write_u64(&mut self, value: u64) {
        self.write_bytes(&value.to_le_bytes());
    }

    /// Length-prefixed, so `"ab" + "c"` and `"a" + "bc"` differ.
    pub fn write_str(&mut self, s: &str) {
        self.write_u64(s.len() as u64);
        self.write_bytes(s.as_bytes());
    }

    /// Entry count, then every `(item, quantity)` pair in item order.
    pub fn write_inventory(&mut self, inventory: &Inventory) {
        self.write_u64(inventory.len() as u64);
        for (item, quantity) in inventory.iter() {
            self.write_str(item.name());
            self.write_u64(quantity);
        }
    }

    pub fn finish(self) -> u64 {
        self.0
    }
}

impl Default for StateHash {
    fn default() -> Self {
        Self::new()
    }
}
