//! Per-vertex relocation search and the refinement loop

use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::QtmConfig;
use crate::error::{QtmError, Result};
use crate::graph::{CompressedGraph, VertexId};
use crate::qtm::edits;
use crate::qtm::forest::Forest;

/// Outcome of one bottom-up pass for a relocated vertex
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    /// Best reattachment point in the whole forest
    pub best_parent: usize,

    /// Close children per vertex, ascending by id
    pub close_children: Vec<Vec<usize>>,
}

impl Placement {
    pub fn close_children_of(&self, v: usize) -> &[usize] {
        &self.close_children[v]
    }
}

/// Find the best place to reinsert `vm`, which must be a childless depth-1
/// vertex under the root.
///
/// Visits the forest leaves first and keeps, per vertex `v`:
/// - `child_close(v)`: `diff(vm, v)` plus the sum over its children,
/// - `score_max(v)`: `diff(vm, v)` plus the better of the summed close
///   children and the single best child `score_max`,
/// - `best_parent(v)`: `v` when the close children win, otherwise the best
///   parent of the winning child.
///
/// `diff(vm, v)` is +1 when `vm` and `v` are adjacent in the original graph
/// (the root counts as adjacent), -1 otherwise.
pub fn core<N: VertexId>(graph: &CompressedGraph<N>, forest: &Forest, vm: usize) -> Result<Placement> {
    let n = forest.len();
    let root = forest.root();

    let mut child_close: Vec<Option<i64>> = vec![None; n];
    let mut score_max = vec![0i64; n];
    let mut best_parent = vec![0usize; n];
    let mut close_children: Vec<Vec<usize>> = vec![Vec::new(); n];

    for v in forest.by_decreasing_depth() {
        let diff = if v == root || graph.has_edge(vm, v as u32) {
            1
        } else {
            -1
        };

        let mut child_close_sum = 0i64;
        let mut close_sum = 0i64;
        // A child must beat an empty subtree (-1) to be delegated to
        let mut best_child: Option<usize> = None;
        let mut best_child_score = -1i64;

        for &c in forest.children(v) {
            let close_c = child_close[c].ok_or_else(|| {
                QtmError::internal(format!(
                    "child {} of vertex {} visited after its parent",
                    c, v
                ))
            })?;

            if close_c > 0 {
                close_children[v].push(c);
                close_sum += close_c;
            }
            child_close_sum += close_c;

            let candidate = score_max[c];
            let better = match best_child {
                Some(b) if candidate == best_child_score => graph.id(c) < graph.id(b),
                _ => candidate > best_child_score,
            };
            if better {
                best_child = Some(c);
                best_child_score = candidate;
            }
        }

        child_close[v] = Some(child_close_sum + diff);
        match best_child {
            Some(c) if best_child_score > close_sum => {
                score_max[v] = best_child_score + diff;
                best_parent[v] = best_parent[c];
            }
            _ => {
                score_max[v] = close_sum + diff;
                best_parent[v] = v;
            }
        }
        close_children[v].sort_by(|&a, &b| graph.id(a).cmp(graph.id(b)));
    }

    Ok(Placement {
        best_parent: best_parent[root],
        close_children,
    })
}

/// Run the configured number of refinement iterations over `forest`.
///
/// Each iteration visits every vertex in a fresh random order, detaches it,
/// and reinserts it where [`core`] places it (or, while annealing, under a
/// random vertex). Depths must be up to date on entry.
pub fn refine<N: VertexId, R: Rng>(
    graph: &CompressedGraph<N>,
    forest: &mut Forest,
    config: &QtmConfig,
    rng: &mut R,
) -> Result<()> {
    let mut vertices: Vec<usize> = (0..graph.node_count).collect();

    for iteration in 0..config.iterations {
        vertices.shuffle(rng);
        let p_random = config.annealing_probability(iteration);
        let mut moved = 0usize;

        for &vm in &vertices {
            let old_parent = forest.parent(vm);
            forest.detach(vm)?;

            let placement = core(graph, forest, vm)?;
            let new_parent = if p_random > 0.0 && rng.gen::<f64>() < p_random {
                random_parent(forest, vm, rng)
            } else {
                placement.best_parent
            };

            forest.reattach(vm, new_parent, placement.close_children_of(new_parent))?;
            if new_parent != old_parent {
                moved += 1;
            }
            log::trace!("vertex {:?} placed under {}", graph.id(vm), new_parent);
        }

        if config.track_edits {
            let count = edits::count_edits(graph, forest);
            log::debug!(
                "Iteration {}: {} vertices moved, {} edits ({} insertions, {} deletions)",
                iteration + 1,
                moved,
                count.total(),
                count.insertions,
                count.deletions
            );
        } else {
            log::debug!("Iteration {}: {} vertices moved", iteration + 1, moved);
        }
    }

    Ok(())
}

/// Uniformly random vertex other than `vm`, the root included
fn random_parent<R: Rng>(forest: &Forest, vm: usize, rng: &mut R) -> usize {
    let pick = rng.gen_range(0..forest.len() - 1);
    if pick >= vm {
        pick + 1
    } else {
        pick
    }
}
