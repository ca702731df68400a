//! Adjacency index over relationships
//!
//! Elements are nodes and relationships are edges (source -> destination).
//! Uses petgraph for neighbour queries. Parallel edges are allowed, since two
//! relationships may share the same endpoints.

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::HashMap;
use thiserror::Error;

use super::id::ItemId;

#[derive(Debug, Error, PartialEq)]
pub enum GraphError {
    #[error("Element not found in relationship graph: {0}")]
    ElementNotFound(ItemId),
}

/// Directed multigraph of elements connected by relationships
#[derive(Debug, Default, Clone)]
pub struct RelationshipGraph {
    /// Node weights are element ids, edge weights relationship ids
    graph: DiGraph<ItemId, ItemId>,

    /// Map from element id to node index
    node_map: HashMap<ItemId, NodeIndex>,
}

impl RelationshipGraph {
    /// Creates an empty graph
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            node_map: HashMap::new(),
        }
    }

    /// Adds an element node (no-op if already present)
    pub fn add_element(&mut self, element_id: ItemId) {
        if !self.node_map.contains_key(&element_id) {
            let idx = self.graph.add_node(element_id.clone());
            self.node_map.insert(element_id, idx);
        }
    }

    /// Adds a relationship edge from `source` to `destination`
    pub fn add_relationship(
        &mut self,
        relationship_id: ItemId,
        source: &ItemId,
        destination: &ItemId,
    ) -> Result<(), GraphError> {
        let source_idx = self.index_of(source)?;
        let destination_idx = self.index_of(destination)?;

        self.graph
            .add_edge(source_idx, destination_idx, relationship_id);
        Ok(())
    }

    fn index_of(&self, element_id: &ItemId) -> Result<NodeIndex, GraphError> {
        self.node_map
            .get(element_id)
            .copied()
            .ok_or_else(|| GraphError::ElementNotFound(element_id.clone()))
    }

    /// Returns every element one relationship away, in either direction
    ///
    /// The result is deduplicated and never contains `element_id` itself.
    pub fn neighbours(&self, element_id: &ItemId) -> Vec<ItemId> {
        let idx = match self.node_map.get(element_id) {
            Some(idx) => *idx,
            None => return vec![],
        };

        let mut seen = Vec::new();
        for neighbour in self.graph.neighbors_undirected(idx) {
            if neighbour == idx {
                continue;
            }
            if let Some(id) = self.graph.node_weight(neighbour) {
                if !seen.contains(id) {
                    seen.push(id.clone());
                }
            }
        }
        seen
    }

    /// Returns ids of relationships leaving `element_id`
    pub fn outgoing(&self, element_id: &ItemId) -> Vec<ItemId> {
        self.edges(element_id, Direction::Outgoing)
    }

    /// Returns ids of relationships arriving at `element_id`
    pub fn incoming(&self, element_id: &ItemId) -> Vec<ItemId> {
        self.edges(element_id, Direction::Incoming)
    }

    fn edges(&self, element_id: &ItemId, direction: Direction) -> Vec<ItemId> {
        let idx = match self.node_map.get(element_id) {
            Some(idx) => *idx,
            None => return vec![],
        };

        let mut ids: Vec<(usize, ItemId)> = self
            .graph
            .edges_directed(idx, direction)
            .map(|edge| (edge.id().index(), edge.weight().clone()))
            .collect();
        // petgraph walks edges newest first
        ids.sort_by_key(|(index, _)| *index);
        ids.into_iter().map(|(_, id)| id).collect()
    }

    /// Returns true if the graph contains the element
    pub fn contains(&self, element_id: &ItemId) -> bool {
        self.node_map.contains_key(element_id)
    }

    /// Returns the number of elements in the graph
    pub fn len(&self) -> usize {
        self.node_map.len()
    }

    /// Returns true if the graph is empty
    pub fn is_empty(&self) -> bool {
        self.node_map.is_empty()
    }

    /// Returns the number of relationships in the graph
    pub fn relationship_count(&self) -> usize {
        self.graph.edge_count()
    }
}
