use crate::factory::Factory;
use crate::id::{ConnectionId, FactoryId};
use serde::{Deserialize, Serialize};
use slotmap::SlotMap;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur during graph operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("factory not found: {0:?}")]
    FactoryNotFound(FactoryId),
}

// ---------------------------------------------------------------------------
// Connections
// ---------------------------------------------------------------------------

/// A directed material flow from one factory's output to another's input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Connection {
    /// Source factory (drained from its output inventory).
    pub from: FactoryId,
    /// Destination factory (filled into its input inventory).
    pub to: FactoryId,
}

impl Connection {
    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }
}

// ---------------------------------------------------------------------------
// ProductionGraph
// ---------------------------------------------------------------------------

/// Factories and connections, each kept in declared order.
///
/// Factories live in a `SlotMap` for stable ids; `order` records insertion
/// order so processing never depends on slot layout. Connections are
/// immutable once added and are processed in the order they were added.
/// Self-loops, fan-in and fan-out are all accepted.
#[derive(Debug, Clone, Default)]
pub struct ProductionGraph {
    factories: SlotMap<FactoryId, Factory>,
    order: Vec<FactoryId>,
    connections: Vec<Connection>,
}

impl ProductionGraph {
    /// Create a new, empty production graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a factory at the end of the processing order.
    pub fn add_factory(&mut self, factory: Factory) -> FactoryId {
        let id = self.factories.insert(factory);
        self.order.push(id);
        id
    }

    /// Add a connection at the end of the transfer order.
    pub fn connect(&mut self, from: FactoryId, to: FactoryId) -> Result<ConnectionId, GraphError> {
        for id in [from, to] {
            if !self.factories.contains_key(id) {
                return Err(GraphError::FactoryNotFound(id));
            }
        }
        let id = ConnectionId(self.connections.len() as u32);
        self.connections.push(Connection { from, to });
        Ok(id)
    }

    pub fn get(&self, id: FactoryId) -> Option<&Factory> {
        self.factories.get(id)
    }

    pub fn get_mut(&mut self, id: FactoryId) -> Option<&mut Factory> {
        self.factories.get_mut(id)
    }

    pub fn connection(&self, id: ConnectionId) -> Option<&Connection> {
        self.connections.get(id.index())
    }

    /// Factory ids in declared order.
    pub fn order(&self) -> &[FactoryId] {
        &self.order
    }

    /// Connections in declared order.
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Factories in declared order.
    pub fn factories(&self) -> impl Iterator<Item = (FactoryId, &Factory)> {
        self.order
            .iter()
            .filter_map(|&id| self.factories.get(id).map(|f| (id, f)))
    }

    /// Connections leaving `factory`, in declared order.
    pub fn outgoing(&self, factory: FactoryId) -> impl Iterator<Item = (ConnectionId, &Connection)> {
        self.connections
            .iter()
            .enumerate()
            .filter(move |(_, c)| c.from == factory)
            .map(|(i, c)| (ConnectionId(i as u32), c))
    }

    /// Connections entering `factory`, in declared order.
    pub fn incoming(&self, factory: FactoryId) -> impl Iterator<Item = (ConnectionId, &Connection)> {
        self.connections
            .iter()
            .enumerate()
            .filter(move |(_, c)| c.to == factory)
            .map(|(i, c)| (ConnectionId(i as u32), c))
    }

    pub fn factory_count(&self) -> usize {
        self.order.len()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Mutable access to two distinct factories at once.
    pub(crate) fn pair_mut(
        &mut self,
        a: FactoryId,
        b: FactoryId,
    ) -> Option<[&mut Factory; 2]> {
        self.factories.get_disjoint_mut([a, b])
    }
}
