//! Greedy construction of the first candidate forest

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap};

use crate::graph::{CompressedGraph, EdgeTable, VertexId};
use crate::qtm::forest::Forest;
use crate::qtm::scorer::PseudoC4P4Counter;

/// Queue entry: higher degree first, then lower id
struct Pending<'a, N> {
    degree: u32,
    id: Reverse<&'a N>,
    index: usize,
}

impl<N: Ord> PartialEq for Pending<'_, N> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<N: Ord> Eq for Pending<'_, N> {}

impl<N: Ord> PartialOrd for Pending<'_, N> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<N: Ord> Ord for Pending<'_, N> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.degree
            .cmp(&other.degree)
            .then_with(|| self.id.cmp(&other.id))
    }
}

/// Build the initial forest in one greedy pass.
///
/// Vertices are taken by descending degree. Each vertex first moves under
/// the most common parent among its close unprocessed neighbours, then
/// adopts the unprocessed neighbours that belong below it. Depths are only
/// approximate afterwards; callers recompute them.
pub fn initialize<N: VertexId>(graph: &CompressedGraph<N>, edges: &EdgeTable) -> Forest {
    let mut init = Initializer::new(graph, edges);

    let mut queue: BinaryHeap<Pending<'_, N>> = (0..graph.node_count)
        .map(|index| Pending {
            degree: init.forest.degree(index),
            id: Reverse(graph.id(index)),
            index,
        })
        .collect();

    while let Some(Pending { index, .. }) = queue.pop() {
        init.process(index);
    }

    log::debug!("Initialization reparented {} vertices", init.reparented);
    init.forest
}

/// State of the greedy pass, advanced one vertex at a time
struct Initializer<'a, N> {
    graph: &'a CompressedGraph<N>,
    edges: &'a EdgeTable,
    forest: Forest,
    scorer: PseudoC4P4Counter<'a, N>,
    processed: Vec<bool>,
    reparented: usize,
}

impl<'a, N: VertexId> Initializer<'a, N> {
    fn new(graph: &'a CompressedGraph<N>, edges: &'a EdgeTable) -> Self {
        let degrees: Vec<u32> = (0..graph.node_count)
            .map(|v| graph.degree(v) as u32)
            .collect();
        let forest = Forest::new(&degrees);
        let scorer = PseudoC4P4Counter::new(graph, edges, forest.root());
        Self {
            graph,
            edges,
            forest,
            scorer,
            processed: vec![false; graph.node_count],
            reparented: 0,
        }
    }

    fn triangles(&self, u: usize, v: usize) -> i64 {
        i64::from(self.edges.triangles(u, v).unwrap_or(0))
    }

    /// Parents of the unprocessed neighbours close enough to `current` to
    /// share its place, with how many such neighbours each one has
    fn close_parent_counts(&self, current: usize) -> HashMap<usize, usize> {
        let parent = self.forest.parent(current);
        let mut occurrences: HashMap<usize, usize> = HashMap::new();
        for v in unprocessed_neighbors(self.graph, &self.processed, current) {
            let v_parent = self.forest.parent(v);
            let close = v_parent == parent
                || (self.scorer.score(current, v) <= self.scorer.score(v, v_parent)
                    && i64::from(self.forest.depth(v)) <= self.triangles(current, v) + 1);
            if close {
                *occurrences.entry(v_parent).or_insert(0) += 1;
            }
        }
        occurrences
    }

    fn process(&mut self, current: usize) {
        self.processed[current] = true;
        let root = self.forest.root();

        let occurrences = self.close_parent_counts(current);
        if let Some(new_parent) = most_frequent_parent(self.graph, root, &occurrences) {
            if new_parent != self.forest.parent(current) {
                self.forest.change_parent(current, new_parent);
                self.forest.set_depth(current, 0);
                self.scorer.set_to_infinity(current, new_parent);
            }
        }

        // The adoption test is strict where the grouping test above is not
        let parent = self.forest.parent(current);
        let neighbors: Vec<usize> =
            unprocessed_neighbors(self.graph, &self.processed, current).collect();
        for v in neighbors {
            let v_parent = self.forest.parent(v);
            let adopt = v_parent == parent
                || (self.scorer.score(current, v) < self.scorer.score(v, v_parent)
                    && i64::from(self.forest.depth(v)) < self.triangles(current, v) + 1);
            if adopt {
                self.forest.change_parent(v, current);
                self.forest.set_depth(v, self.forest.depth(v) + 1);
                self.reparented += 1;
            }
        }
    }
}

fn unprocessed_neighbors<'g, N: VertexId>(
    graph: &'g CompressedGraph<N>,
    processed: &'g [bool],
    v: usize,
) -> impl Iterator<Item = usize> + 'g {
    graph
        .neighbors(v)
        .iter()
        .map(|&u| u as usize)
        .filter(move |&u| !processed[u])
}

/// Highest count wins; equal counts go to the lowest id, the root counting
/// as larger than every vertex id
fn most_frequent_parent<N: VertexId>(
    graph: &CompressedGraph<N>,
    root: usize,
    occurrences: &HashMap<usize, usize>,
) -> Option<usize> {
    occurrences
        .iter()
        .max_by(|(&a, &count_a), (&b, &count_b)| {
            count_a
                .cmp(&count_b)
                .then_with(|| compare_ids(graph, root, b, a))
        })
        .map(|(&parent, _)| parent)
}

fn compare_ids<N: VertexId>(graph: &CompressedGraph<N>, root: usize, a: usize, b: usize) -> Ordering {
    match (a == root, b == root) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => graph.id(a).cmp(graph.id(b)),
    }
}
