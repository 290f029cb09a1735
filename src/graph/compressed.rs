//! Memory-efficient undirected graph representation

use std::collections::HashMap;
use std::mem;

use crate::graph::VertexId;

/// Compressed sparse representation of an undirected graph.
///
/// Every edge is stored in both endpoints' adjacency lists, which are kept
/// sorted so membership tests are a binary search.
#[derive(Debug, Clone)]
pub struct CompressedGraph<N> {
    /// Number of nodes in the graph
    pub node_count: usize,

    /// Offset array: index where each node's neighbours begin
    /// offsets[i] to offsets[i+1] defines the neighbour range for node i
    pub offsets: Vec<u32>,

    /// Concatenated, sorted neighbour lists
    pub edges: Vec<u32>,

    /// Mapping from internal node indices to the caller's ids
    pub node_ids: Vec<N>,

    /// Reverse mapping from ids to node indices
    pub id_to_index: HashMap<N, u32>,
}

impl<N: VertexId> CompressedGraph<N> {
    /// Create an empty graph with pre-allocated capacity
    pub fn with_capacity(node_count: usize, edge_count: usize) -> Self {
        Self {
            node_count: 0,
            offsets: Vec::with_capacity(node_count + 1),
            edges: Vec::with_capacity(2 * edge_count),
            node_ids: Vec::with_capacity(node_count),
            id_to_index: HashMap::with_capacity(node_count),
        }
    }

    /// Get the neighbours of a node
    pub fn neighbors(&self, node: usize) -> &[u32] {
        let start = self.offsets[node] as usize;
        let end = self.offsets[node + 1] as usize;
        &self.edges[start..end]
    }

    /// Check if `a` and `b` are adjacent
    pub fn has_edge(&self, a: usize, b: u32) -> bool {
        self.neighbors(a).binary_search(&b).is_ok()
    }

    pub fn degree(&self, node: usize) -> usize {
        let start = self.offsets[node] as usize;
        let end = self.offsets[node + 1] as usize;
        end - start
    }

    /// Number of undirected edges
    pub fn edge_count(&self) -> usize {
        self.edges.len() / 2
    }

    pub fn id(&self, node: usize) -> &N {
        &self.node_ids[node]
    }

    pub fn index_of(&self, id: &N) -> Option<usize> {
        self.id_to_index.get(id).map(|&idx| idx as usize)
    }

    /// Iterate every undirected edge once as `(low, high)` index pairs
    pub fn edge_pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.node_count).flat_map(move |u| {
            self.neighbors(u)
                .iter()
                .map(|&v| v as usize)
                .filter(move |&v| u < v)
                .map(move |v| (u, v))
        })
    }

    /// Estimate memory usage in bytes
    pub fn memory_usage(&self) -> usize {
        let base = mem::size_of::<Self>();
        let offsets = self.offsets.capacity() * mem::size_of::<u32>();
        let edges = self.edges.capacity() * mem::size_of::<u32>();
        let ids = self.node_ids.capacity() * mem::size_of::<N>();
        let index = self.id_to_index.capacity() * (mem::size_of::<N>() + mem::size_of::<u32>());

        base + offsets + edges + ids + index
    }
}

#[cfg(test)]
mod tests {
    use crate::graph::GraphBuilder;

    #[test]
    fn stores_edges_in_both_directions() {
        let graph = GraphBuilder::from_edges(vec![1, 2, 3], vec![(1, 2), (3, 2)]).unwrap();

        assert_eq!(graph.node_count, 3);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.degree(1), 2);
        assert!(graph.has_edge(0, 1));
        assert!(graph.has_edge(1, 0));
        assert!(!graph.has_edge(0, 2));
        assert_eq!(graph.edge_pairs().collect::<Vec<_>>(), vec![(0, 1), (1, 2)]);
        assert!(graph.memory_usage() > 0);
    }

    #[test]
    fn resolves_ids() {
        let graph = GraphBuilder::from_edges(vec!["a", "b"], vec![("a", "b")]).unwrap();
        assert_eq!(graph.index_of(&"b"), Some(1));
        assert_eq!(graph.index_of(&"z"), None);
        assert_eq!(*graph.id(0), "a");
    }
}
