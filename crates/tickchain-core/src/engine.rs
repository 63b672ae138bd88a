//! The simulation engine: owns the production graph and runs the two-phase
//! tick pipeline.
//!
//! # Pipeline
//!
//! Each `step()` runs:
//! 1. **Transfer** -- every connection, in declared order, drains each item
//!    type from its source's output into its destination's input
//! 2. **Process** -- every factory, in declared order, runs one step of its
//!    recipe state machine
//!
//! Both phases always run in full. There is no rollback between them.

use crate::factory::Factory;
use crate::graph::{GraphError, ProductionGraph};
use crate::id::{ConnectionId, FactoryId};
use crate::item::{Inventory, ItemType, Quantity};
use crate::query::FactorySnapshot;
use crate::sim::{SimState, StateHash, Ticks};

// ---------------------------------------------------------------------------
// Step report
// ---------------------------------------------------------------------------

/// One whole-type move along a connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transfer {
    pub connection: ConnectionId,
    pub item: ItemType,
    pub quantity: Quantity,
}

/// What happened during one `step()`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepReport {
    /// The tick that was just run (1 for the first step).
    pub tick: Ticks,
    /// Transfers in the order they were performed.
    pub transfers: Vec<Transfer>,
    /// Factories that consumed inputs and began a cycle.
    pub started: Vec<FactoryId>,
    /// Factories that finished a cycle and emitted outputs.
    pub completed: Vec<FactoryId>,
    /// Total consumed by recipe starts this tick.
    pub consumed: Inventory,
    /// Total produced by recipe completions this tick.
    pub produced: Inventory,
}

// ---------------------------------------------------------------------------
// Phases
// ---------------------------------------------------------------------------

/// Phase 1: move material along every connection in declared order.
///
/// Whole-type and first-served: with fan-out the earliest-declared connection
/// takes the full quantity of every type present, and later connections from
/// the same source see nothing left this tick.
pub fn transfer_phase(graph: &mut ProductionGraph) -> Vec<Transfer> {
    let mut transfers = Vec::new();

    for index in 0..graph.connection_count() {
        let connection_id = ConnectionId(index as u32);
        let Some(&connection) = graph.connection(connection_id) else {
            continue;
        };

        let moved = if connection.is_self_loop() {
            let Some(factory) = graph.get_mut(connection.from) else {
                continue;
            };
            drain_into(&mut factory.output, &mut factory.input)
        } else {
            let Some([source, dest]) = graph.pair_mut(connection.from, connection.to) else {
                continue;
            };
            drain_into(&mut source.output, &mut dest.input)
        };

        for (item, quantity) in moved {
            tracing::trace!(connection = index, %item, quantity, "transfer");
            transfers.push(Transfer {
                connection: connection_id,
                item,
                quantity,
            });
        }
    }

    transfers
}

/// Move every item type from `source` to `target`, in item-name order.
fn drain_into(source: &mut Inventory, target: &mut Inventory) -> Vec<(ItemType, Quantity)> {
    let items: Vec<ItemType> = source.item_types().cloned().collect();
    items
        .into_iter()
        .filter_map(|item| {
            let quantity = source.transfer_all(&item, target);
            (quantity > 0).then_some((item, quantity))
        })
        .collect()
}

/// Phase 2: run one recipe step for every factory in declared order,
/// accumulating the outcome into `report`.
pub fn process_phase(graph: &mut ProductionGraph, report: &mut StepReport) {
    let order = graph.order().to_vec();
    for id in order {
        let Some(factory) = graph.get_mut(id) else {
            continue;
        };
        let outcome = factory.tick();
        if outcome.started {
            report.started.push(id);
            report.consumed.add_all(&outcome.consumed);
        }
        if outcome.completed {
            report.completed.push(id);
            report.produced.add_all(&outcome.produced);
        }
    }
}

/// Run both phases once over a graph the caller owns, labelling the result
/// with `tick`.
pub fn step(graph: &mut ProductionGraph, tick: Ticks) -> StepReport {
    let mut report = StepReport {
        tick,
        ..StepReport::default()
    };

    // Phase 1: Transfer -- deliveries land before any factory checks inputs.
    report.transfers = transfer_phase(graph);

    // Phase 2: Process -- recipe state machines.
    process_phase(graph, &mut report);

    tracing::trace!(
        tick = report.tick,
        transfers = report.transfers.len(),
        started = report.started.len(),
        completed = report.completed.len(),
        "step"
    );
    report
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// The core simulation engine.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    /// Factories and connections.
    pub graph: ProductionGraph,

    /// Tick counter.
    pub sim_state: SimState,
}

impl Engine {
    /// Create an engine with an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an already-built graph, starting at tick 0.
    pub fn from_graph(graph: ProductionGraph) -> Self {
        Self {
            graph,
            sim_state: SimState::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Graph construction
    // -----------------------------------------------------------------------

    pub fn add_factory(&mut self, factory: Factory) -> FactoryId {
        self.graph.add_factory(factory)
    }

    pub fn connect(&mut self, from: FactoryId, to: FactoryId) -> Result<ConnectionId, GraphError> {
        self.graph.connect(from, to)
    }

    pub fn factory(&self, id: FactoryId) -> Option<&Factory> {
        self.graph.get(id)
    }

    pub fn factory_mut(&mut self, id: FactoryId) -> Option<&mut Factory> {
        self.graph.get_mut(id)
    }

    /// Number of completed ticks.
    pub fn tick(&self) -> Ticks {
        self.sim_state.tick
    }

    // -----------------------------------------------------------------------
    // Simulation
    // -----------------------------------------------------------------------

    /// Advance the simulation by exactly one tick.
    pub fn step(&mut self) -> StepReport {
        self.sim_state.tick += 1;
        step(&mut self.graph, self.sim_state.tick)
    }

    /// Run `ticks` steps, discarding the per-step reports.
    pub fn run(&mut self, ticks: Ticks) {
        for _ in 0..ticks {
            self.step();
        }
    }

    // -----------------------------------------------------------------------
    // Inspection
    // -----------------------------------------------------------------------

    /// Fixed-width table of every factory in declared order.
    pub fn report(&self) -> String {
        crate::report::format_report(self.graph.factories().map(|(_, f)| f))
    }

    /// Owned views of every factory in declared order.
    pub fn snapshot(&self) -> Vec<FactorySnapshot> {
        self.graph
            .factories()
            .enumerate()
            .map(|(index, (id, factory))| FactorySnapshot::of(index, id, factory))
            .collect()
    }

    /// Hash of tick, progress and inventory contents in declared order.
    pub fn state_hash(&self) -> u64 {
        let mut hash = StateHash::new();
        hash.write_u64(self.sim_state.tick);
        for (_, factory) in self.graph.factories() {
            hash.write_u64(factory.progress());
            hash.write_inventory(&factory.input);
            hash.write_inventory(&factory.output);
        }
        hash.finish()
    }
}
