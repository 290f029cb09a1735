//! Graph construction module

use std::collections::HashMap;

use petgraph::graph::UnGraph;

use crate::error::{QtmError, Result};
use crate::graph::{CompressedGraph, VertexId};

/// Builder for incrementally constructing a CompressedGraph
pub struct GraphBuilder<N> {
    /// Mapping from ids to node indices
    id_to_index: HashMap<N, u32>,

    /// Node ids in insertion order
    node_ids: Vec<N>,

    /// Adjacency lists for each node
    adjacency_lists: Vec<Vec<u32>>,

    edge_count: usize,
}

impl<N: VertexId> Default for GraphBuilder<N> {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

impl<N: VertexId> GraphBuilder<N> {
    /// Create a new graph builder with the given capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            id_to_index: HashMap::with_capacity(capacity),
            node_ids: Vec::with_capacity(capacity),
            adjacency_lists: Vec::with_capacity(capacity),
            edge_count: 0,
        }
    }

    /// Add a node, rejecting ids that are already present
    pub fn add_node(&mut self, id: N) -> Result<u32> {
        if self.id_to_index.contains_key(&id) {
            return Err(QtmError::DuplicateVertex(format!("{:?}", id)));
        }
        Ok(self.push_node(id))
    }

    /// Get or create a node index for the given id
    pub fn get_or_create_node(&mut self, id: &N) -> u32 {
        if let Some(&idx) = self.id_to_index.get(id) {
            return idx;
        }
        self.push_node(id.clone())
    }

    fn push_node(&mut self, id: N) -> u32 {
        let idx = self.node_ids.len() as u32;
        self.id_to_index.insert(id.clone(), idx);
        self.node_ids.push(id);
        self.adjacency_lists.push(Vec::new());
        idx
    }

    pub fn contains_edge(&self, a: &N, b: &N) -> bool {
        match (self.id_to_index.get(a), self.id_to_index.get(b)) {
            (Some(&ia), Some(&ib)) => self.adjacency_lists[ia as usize].contains(&ib),
            _ => false,
        }
    }

    /// Add an undirected edge between two existing nodes
    pub fn add_edge(&mut self, a: &N, b: &N) -> Result<()> {
        let ia = *self
            .id_to_index
            .get(a)
            .ok_or_else(|| QtmError::UnknownVertex(format!("{:?}", a)))?;
        let ib = *self
            .id_to_index
            .get(b)
            .ok_or_else(|| QtmError::UnknownVertex(format!("{:?}", b)))?;

        if ia == ib {
            return Err(QtmError::SelfLoop(format!("{:?}", a)));
        }
        if self.adjacency_lists[ia as usize].contains(&ib) {
            return Err(QtmError::ParallelEdge(format!("{:?}", a), format!("{:?}", b)));
        }

        self.adjacency_lists[ia as usize].push(ib);
        self.adjacency_lists[ib as usize].push(ia);
        self.edge_count += 1;
        Ok(())
    }

    pub fn node_count(&self) -> usize {
        self.node_ids.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Build the compressed graph
    pub fn build(mut self) -> CompressedGraph<N> {
        let node_count = self.node_ids.len();
        let mut graph = CompressedGraph::with_capacity(node_count, self.edge_count);

        graph.offsets.push(0);
        let mut offset = 0;
        for list in &mut self.adjacency_lists {
            // Sort for binary search efficiency
            list.sort_unstable();
            graph.edges.extend_from_slice(list);
            offset += list.len() as u32;
            graph.offsets.push(offset);
        }

        graph.node_count = node_count;
        graph.node_ids = self.node_ids;
        graph.id_to_index = self.id_to_index;
        graph
    }

    /// Validate and build a graph from a vertex list and an edge list
    pub fn from_edges<I, E>(nodes: I, edges: E) -> Result<CompressedGraph<N>>
    where
        I: IntoIterator<Item = N>,
        E: IntoIterator<Item = (N, N)>,
    {
        let mut builder = Self::default();
        for id in nodes {
            builder.add_node(id)?;
        }
        for (a, b) in edges {
            builder.add_edge(&a, &b)?;
        }
        Ok(builder.build())
    }

    /// Validate and build a graph from a petgraph undirected graph whose node
    /// weights are the vertex ids
    pub fn from_petgraph<E>(input: &UnGraph<N, E>) -> Result<CompressedGraph<N>> {
        let mut builder = Self::with_capacity(input.node_count());
        for node in input.node_indices() {
            builder.add_node(input[node].clone())?;
        }
        for edge in input.raw_edges() {
            let a = &input[edge.source()];
            let b = &input[edge.target()];
            builder.add_edge(a, b)?;
        }
        Ok(builder.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_duplicate_vertices() {
        let err = GraphBuilder::from_edges(vec![1, 2, 1], Vec::new()).unwrap_err();
        assert_eq!(err, QtmError::DuplicateVertex("1".into()));
    }

    #[test]
    fn rejects_unknown_endpoints() {
        let err = GraphBuilder::from_edges(vec![1, 2], vec![(1, 3)]).unwrap_err();
        assert_eq!(err, QtmError::UnknownVertex("3".into()));
    }

    #[test]
    fn rejects_loops_and_parallel_edges() {
        let err = GraphBuilder::from_edges(vec![1, 2], vec![(1, 1)]).unwrap_err();
        assert!(matches!(err, QtmError::SelfLoop(_)));

        let err = GraphBuilder::from_edges(vec![1, 2], vec![(1, 2), (2, 1)]).unwrap_err();
        assert!(matches!(err, QtmError::ParallelEdge(_, _)));
    }

    #[test]
    fn lenient_loading_path() {
        let mut builder: GraphBuilder<String> = GraphBuilder::default();
        let a = "a".to_string();
        let b = "b".to_string();
        assert_eq!(builder.get_or_create_node(&a), 0);
        assert_eq!(builder.get_or_create_node(&b), 1);
        assert_eq!(builder.get_or_create_node(&a), 0);
        builder.add_edge(&a, &b).unwrap();
        assert!(builder.contains_edge(&b, &a));
        assert_eq!(builder.edge_count(), 1);

        let graph = builder.build();
        assert_eq!(graph.degree(0), 1);
    }

    #[test]
    fn imports_petgraph() {
        let mut input = UnGraph::<u32, ()>::new_undirected();
        let a = input.add_node(10);
        let b = input.add_node(20);
        let c = input.add_node(30);
        input.add_edge(a, b, ());
        input.add_edge(b, c, ());

        let graph = GraphBuilder::from_petgraph(&input).unwrap();
        assert_eq!(graph.node_count, 3);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.degree(graph.index_of(&20).unwrap()), 2);

        input.add_node(10);
        assert!(GraphBuilder::from_petgraph(&input).is_err());
    }
}
