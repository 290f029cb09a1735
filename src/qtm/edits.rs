//! Edit distance between the original graph and the forest's closure

use serde::Serialize;

use crate::graph::{CompressedGraph, VertexId};
use crate::qtm::forest::Forest;

/// Edge insertions and deletions that turn the original graph into the
/// quasi-threshold graph implied by a forest
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EditCount {
    pub insertions: usize,
    pub deletions: usize,
}

impl EditCount {
    pub fn total(&self) -> usize {
        self.insertions + self.deletions
    }
}

/// Count edits without materialising the closure.
///
/// A vertex at depth `d` has `d - 1` non-root ancestors, so the closure has
/// `sum(depth - 1)` edges. An original edge survives iff one endpoint is an
/// ancestor of the other. Depths must be up to date.
pub fn count_edits<N: VertexId>(graph: &CompressedGraph<N>, forest: &Forest) -> EditCount {
    let (tin, tout) = forest.euler_times();
    let is_ancestor = |a: usize, b: usize| tin[a] <= tin[b] && tout[b] <= tout[a];

    let closure_edges: usize = (0..graph.node_count)
        .map(|v| forest.depth(v).saturating_sub(1) as usize)
        .sum();
    let kept = graph
        .edge_pairs()
        .filter(|&(u, v)| is_ancestor(u, v) || is_ancestor(v, u))
        .count();

    EditCount {
        insertions: closure_edges - kept,
        deletions: graph.edge_count() - kept,
    }
}
