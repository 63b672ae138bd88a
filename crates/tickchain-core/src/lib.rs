//! Tickchain Core -- the tick engine for production-chain simulations.
//!
//! A simulation is a directed graph of factories. Each factory owns an input
//! and an output [`item::Inventory`], optionally runs one shared
//! [`recipe::Recipe`], and passes its output downstream along connections.
//!
//! # Two-Phase Tick Pipeline
//!
//! Each call to [`engine::Engine::step`] advances the simulation by one tick:
//!
//! 1. **Transfer** -- For every connection in declared order, move the whole
//!    quantity of every item type in the source's output inventory into the
//!    destination's input inventory.
//! 2. **Process** -- For every factory in declared order, run one step of the
//!    recipe state machine (start when inputs are available, otherwise count
//!    progress and emit outputs on completion).
//!
//! Transfers always finish before any factory decides whether to start, so a
//! factory sees this tick's deliveries in the same tick.
//!
//! # Fan-out
//!
//! Transfers are whole-type and first-served. When one factory feeds several
//! connections, the connection declared first receives everything of each
//! type present; later connections from the same source get nothing that
//! tick.
//!
//! # Key Types
//!
//! - [`engine::Engine`] -- Owns the graph and runs the pipeline.
//! - [`graph::ProductionGraph`] -- Factories and connections in declared order.
//! - [`factory::Factory`] -- Inventories, optional recipe, progress counter.
//! - [`recipe::Recipe`] -- Immutable inputs/outputs/duration, shared via `Arc`.
//! - [`item::Inventory`] -- Ordered item-to-quantity map with no zero entries.
//! - [`report::format_report`] -- Fixed-width text table of factory state.

pub mod builtin;
pub mod engine;
pub mod factory;
pub mod graph;
pub mod id;
pub mod item;
pub mod query;
pub mod recipe;
pub mod report;
pub mod sim;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
