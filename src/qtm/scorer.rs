//! Pseudo C4/P4 edge scores

use std::collections::HashSet;

use crate::graph::{CompressedGraph, EdgeKey, EdgeTable, VertexId};

/// Score returned for edges marked infinite and for non-adjacent pairs
pub const INFINITE_SCORE: i64 = i64::MAX;

/// Estimates how many C4s and P4s (with the edge in the centre) an edge is
/// part of. Edges with few triangles relative to their endpoints' degrees
/// sit in many such patterns and are good deletion candidates.
pub struct PseudoC4P4Counter<'a, N> {
    graph: &'a CompressedGraph<N>,
    edges: &'a EdgeTable,
    root: usize,
    infinities: HashSet<EdgeKey>,
}

impl<'a, N: VertexId> PseudoC4P4Counter<'a, N> {
    /// `root` is the arena index of the universal root, adjacent to every vertex
    pub fn new(graph: &'a CompressedGraph<N>, edges: &'a EdgeTable, root: usize) -> Self {
        Self {
            graph,
            edges,
            root,
            infinities: HashSet::new(),
        }
    }

    /// `(deg(u) - 1 - t) * (deg(v) - 1 - t)` where `t` is the triangle count of `u - v`.
    ///
    /// Pairs marked infinite score [`INFINITE_SCORE`]. A pair involving the
    /// root scores 0 (the root shares every neighbour of the other endpoint),
    /// and two non-adjacent vertices have no edge to delete, so they score
    /// [`INFINITE_SCORE`] as well.
    pub fn score(&self, u: usize, v: usize) -> i64 {
        if self.infinities.contains(&EdgeKey::new(u, v)) {
            return INFINITE_SCORE;
        }
        if u == self.root || v == self.root {
            return 0;
        }
        match self.edges.triangles(u, v) {
            Some(t) => {
                let t = i64::from(t);
                let du = self.graph.degree(u) as i64;
                let dv = self.graph.degree(v) as i64;
                (du - 1 - t) * (dv - 1 - t)
            }
            None => INFINITE_SCORE,
        }
    }

    /// Pin the score of `u - v` to [`INFINITE_SCORE`] for the rest of the run
    pub fn set_to_infinity(&mut self, u: usize, v: usize) {
        self.infinities.insert(EdgeKey::new(u, v));
    }

    pub fn is_infinite(&self, u: usize, v: usize) -> bool {
        self.infinities.contains(&EdgeKey::new(u, v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::algorithms::count_all_triangles;
    use crate::graph::GraphBuilder;

    #[test]
    fn path_scores_reduce_to_degree_product() {
        let graph =
            GraphBuilder::from_edges(1..=5, vec![(1, 2), (2, 3), (3, 4), (4, 5)]).unwrap();
        let table = count_all_triangles(&graph);
        let scorer = PseudoC4P4Counter::new(&graph, &table, graph.node_count);

        for (u, v) in graph.edge_pairs() {
            let expected = (graph.degree(u) as i64 - 1) * (graph.degree(v) as i64 - 1);
            assert_eq!(scorer.score(u, v), expected);
            assert_eq!(scorer.score(v, u), expected);
        }
        // 2 - 3 is a P4 centre: (2 - 1) * (2 - 1)
        assert_eq!(scorer.score(1, 2), 1);
    }

    #[test]
    fn triangles_lower_the_score() {
        let graph =
            GraphBuilder::from_edges(1..=4, vec![(1, 2), (1, 3), (2, 3), (3, 4)]).unwrap();
        let table = count_all_triangles(&graph);
        let scorer = PseudoC4P4Counter::new(&graph, &table, graph.node_count);

        // 1 - 3 has one triangle: (2 - 1 - 1) * (3 - 1 - 1)
        assert_eq!(scorer.score(0, 2), 0);
        // 3 - 4 has none: (3 - 1) * (1 - 1)
        assert_eq!(scorer.score(2, 3), 0);
    }

    #[test]
    fn root_and_non_edges() {
        let graph = GraphBuilder::from_edges(1..=3, vec![(1, 2)]).unwrap();
        let table = count_all_triangles(&graph);
        let root = graph.node_count;
        let scorer = PseudoC4P4Counter::new(&graph, &table, root);

        assert_eq!(scorer.score(0, root), 0);
        assert_eq!(scorer.score(root, 2), 0);
        assert_eq!(scorer.score(0, 2), INFINITE_SCORE);
    }

    #[test]
    fn infinity_is_sticky() {
        let graph = GraphBuilder::from_edges(1..=3, vec![(1, 2), (2, 3)]).unwrap();
        let table = count_all_triangles(&graph);
        let root = graph.node_count;
        let mut scorer = PseudoC4P4Counter::new(&graph, &table, root);

        scorer.set_to_infinity(1, 0);
        scorer.set_to_infinity(2, root);
        for _ in 0..3 {
            assert_eq!(scorer.score(0, 1), INFINITE_SCORE);
            assert_eq!(scorer.score(root, 2), INFINITE_SCORE);
        }
        scorer.set_to_infinity(0, 1);
        assert!(scorer.is_infinite(1, 0));
        assert_eq!(scorer.score(1, 2), 0);
    }
}
