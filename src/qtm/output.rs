//! Materialising the final forest as a graph

use std::collections::BTreeSet;

use petgraph::graph::{DiGraph, NodeIndex, UnGraph};
use petgraph::Direction;

use crate::graph::{CompressedGraph, VertexId};
use crate::qtm::forest::Forest;

/// Result graph of a run. Node weights are the input's vertex ids and the
/// universal root never appears.
#[derive(Debug, Clone)]
pub enum QtGraph<N> {
    /// The edited quasi-threshold graph: every ancestor joined to every descendant
    Closure(UnGraph<N, ()>),

    /// Only the parent -> child edges of the forest
    Skeleton(DiGraph<N, ()>),
}

impl<N: VertexId> QtGraph<N> {
    pub fn is_directed(&self) -> bool {
        matches!(self, QtGraph::Skeleton(_))
    }

    pub fn node_count(&self) -> usize {
        match self {
            QtGraph::Closure(g) => g.node_count(),
            QtGraph::Skeleton(g) => g.node_count(),
        }
    }

    pub fn edge_count(&self) -> usize {
        match self {
            QtGraph::Closure(g) => g.edge_count(),
            QtGraph::Skeleton(g) => g.edge_count(),
        }
    }

    pub fn node_ids(&self) -> Vec<N> {
        match self {
            QtGraph::Closure(g) => g.node_indices().map(|i| g[i].clone()).collect(),
            QtGraph::Skeleton(g) => g.node_indices().map(|i| g[i].clone()).collect(),
        }
    }

    /// Edges as id pairs: `(parent, child)` for the skeleton, `(ancestor,
    /// descendant)` for the closure
    pub fn edge_list(&self) -> Vec<(N, N)> {
        match self {
            QtGraph::Closure(g) => g
                .raw_edges()
                .iter()
                .map(|e| (g[e.source()].clone(), g[e.target()].clone()))
                .collect(),
            QtGraph::Skeleton(g) => g
                .raw_edges()
                .iter()
                .map(|e| (g[e.source()].clone(), g[e.target()].clone()))
                .collect(),
        }
    }

    /// The undirected quasi-threshold edge set, each pair as `(low, high)`.
    /// For the skeleton this is its transitive closure.
    pub fn closure_edges(&self) -> BTreeSet<(N, N)> {
        let ordered = |a: &N, b: &N| {
            if a <= b {
                (a.clone(), b.clone())
            } else {
                (b.clone(), a.clone())
            }
        };

        match self {
            QtGraph::Closure(g) => g
                .raw_edges()
                .iter()
                .map(|e| ordered(&g[e.source()], &g[e.target()]))
                .collect(),
            QtGraph::Skeleton(g) => {
                let mut edges = BTreeSet::new();
                for node in g.node_indices() {
                    let mut current = node;
                    while let Some(parent) =
                        g.neighbors_directed(current, Direction::Incoming).next()
                    {
                        edges.insert(ordered(&g[parent], &g[node]));
                        current = parent;
                    }
                }
                edges
            }
        }
    }
}

/// Convert the forest into the closure graph or the tree skeleton.
///
/// Every non-root vertex becomes a node, in index order, isolated vertices
/// included. Skeleton edges are added in breadth-first order from the root.
pub fn build_qt_graph<N: VertexId>(
    graph: &CompressedGraph<N>,
    forest: &Forest,
    show_transitive_closures: bool,
) -> QtGraph<N> {
    let root = forest.root();

    if show_transitive_closures {
        let closure_edges: usize = (0..graph.node_count)
            .map(|v| forest.depth(v).saturating_sub(1) as usize)
            .sum();
        let mut out = UnGraph::with_capacity(graph.node_count, closure_edges);
        let nodes: Vec<NodeIndex> = graph
            .node_ids
            .iter()
            .map(|id| out.add_node(id.clone()))
            .collect();

        forest.walk_with_ancestors(|v, ancestors| {
            for &a in ancestors {
                out.add_edge(nodes[a], nodes[v], ());
            }
        });
        QtGraph::Closure(out)
    } else {
        let mut out = DiGraph::with_capacity(graph.node_count, graph.node_count);
        let nodes: Vec<NodeIndex> = graph
            .node_ids
            .iter()
            .map(|id| out.add_node(id.clone()))
            .collect();

        let mut queue = std::collections::VecDeque::from(vec![root]);
        while let Some(v) = queue.pop_front() {
            for &c in forest.children(v) {
                if v != root {
                    out.add_edge(nodes[v], nodes[c], ());
                }
                queue.push_back(c);
            }
        }
        QtGraph::Skeleton(out)
    }
}
