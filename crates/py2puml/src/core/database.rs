//! Core database trait for diagram data storage
//!
//! The renderer reads everything it draws from a [`Database`]. Nodes are the
//! top-level diagram elements (one package per source file), edges are the
//! relationships drawn after them.

use anyhow::Result;

/// Core trait for diagram databases
///
/// The associated types let each diagram kind define its own node and edge
/// structures.
pub trait Database: Send + Sync {
    /// The node data type for this database
    type Node: Clone + Send + Sync;

    /// The edge data type for this database
    type Edge: Clone + Send + Sync;

    /// Add a node to the database
    fn add_node(&mut self, node: Self::Node) -> Result<()>;

    /// Add an edge to the database
    fn add_edge(&mut self, edge: Self::Edge) -> Result<()>;

    /// Get a node by ID
    fn get_node(&self, id: &str) -> Option<&Self::Node>;

    /// Iterate over all nodes in insertion order
    fn nodes(&self) -> impl Iterator<Item = &Self::Node>;

    /// Iterate over all edges in insertion order
    fn edges(&self) -> impl Iterator<Item = &Self::Edge>;

    /// Clear all data from the database
    fn clear(&mut self);

    fn node_count(&self) -> usize;

    fn edge_count(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.node_count() == 0
    }
}
