//! Edge records shared by both endpoints

use std::collections::HashMap;

use crate::graph::{CompressedGraph, VertexId};

/// Canonical key of an undirected edge: the endpoint indices in ascending order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey(pub u32, pub u32);

impl EdgeKey {
    pub fn new(a: usize, b: usize) -> Self {
        if a <= b {
            EdgeKey(a as u32, b as u32)
        } else {
            EdgeKey(b as u32, a as u32)
        }
    }
}

/// Per-edge state, looked up from either endpoint through its key
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeRecord {
    pub num_triangles: u32,
}

/// All edges of the original graph with their records
#[derive(Debug, Clone, Default)]
pub struct EdgeTable {
    records: HashMap<EdgeKey, EdgeRecord>,
}

impl EdgeTable {
    /// One zeroed record per original edge
    pub fn from_graph<N: VertexId>(graph: &CompressedGraph<N>) -> Self {
        let mut records = HashMap::with_capacity(graph.edge_count());
        for (u, v) in graph.edge_pairs() {
            records.insert(EdgeKey::new(u, v), EdgeRecord::default());
        }
        Self { records }
    }

    pub fn get(&self, a: usize, b: usize) -> Option<&EdgeRecord> {
        self.records.get(&EdgeKey::new(a, b))
    }

    pub fn get_mut(&mut self, a: usize, b: usize) -> Option<&mut EdgeRecord> {
        self.records.get_mut(&EdgeKey::new(a, b))
    }

    /// Triangle count of edge `a - b`, `None` if the pair is not an edge
    pub fn triangles(&self, a: usize, b: usize) -> Option<u32> {
        self.get(a, b).map(|record| record.num_triangles)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&EdgeKey, &EdgeRecord)> {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphBuilder;

    #[test]
    fn key_is_order_independent() {
        assert_eq!(EdgeKey::new(4, 1), EdgeKey::new(1, 4));
        assert_eq!(EdgeKey::new(4, 1), EdgeKey(1, 4));
    }

    #[test]
    fn record_is_shared_by_both_endpoints() {
        let graph = GraphBuilder::from_edges(vec![1, 2, 3], vec![(1, 2), (2, 3)]).unwrap();
        let mut table = EdgeTable::from_graph(&graph);
        assert_eq!(table.len(), 2);

        table.get_mut(1, 0).unwrap().num_triangles += 3;
        assert_eq!(table.triangles(0, 1), Some(3));
        assert_eq!(table.triangles(0, 2), None);
    }
}
