//! Quasi-Threshold Mover: heuristic editing of a graph into a quasi-threshold graph
//!
//! A quasi-threshold graph is one that can be drawn as a rooted forest where
//! two vertices are adjacent iff one is an ancestor of the other. The mover
//! builds a first forest greedily, then repeatedly relocates single vertices
//! to the position that best matches their original neighbourhood.

pub mod edits;
pub mod forest;
pub mod init;
pub mod mover;
pub mod output;
pub mod scorer;

use rand::Rng;

use crate::config::QtmConfig;
use crate::error::{QtmError, Result};
use crate::graph::algorithms::count_all_triangles;
use crate::graph::{CompressedGraph, EdgeTable, VertexId};

pub use edits::EditCount;
pub use forest::Forest;
pub use output::QtGraph;
pub use scorer::PseudoC4P4Counter;

/// One editing job over a validated input graph
pub struct QuasiThresholdMover<N> {
    graph: CompressedGraph<N>,
    root_id: N,
    config: QtmConfig,
    forest: Option<Forest>,
}

impl<N: VertexId> QuasiThresholdMover<N> {
    /// `root` is the id reserved for the universal root and must not name a
    /// vertex of the graph. The mover owns its copy of the graph.
    pub fn new(graph: CompressedGraph<N>, root: N) -> Result<Self> {
        if graph.index_of(&root).is_some() {
            return Err(QtmError::RootCollision(format!("{:?}", root)));
        }
        Ok(Self {
            graph,
            root_id: root,
            config: QtmConfig::default(),
            forest: None,
        })
    }

    pub fn with_config(mut self, config: QtmConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &QtmConfig {
        &self.config
    }

    pub fn graph(&self) -> &CompressedGraph<N> {
        &self.graph
    }

    pub fn root_id(&self) -> &N {
        &self.root_id
    }

    /// Forest left by the last successful run
    pub fn forest(&self) -> Option<&Forest> {
        self.forest.as_ref()
    }

    /// Edits made by the last successful run
    pub fn edit_count(&self) -> Option<EditCount> {
        self.forest
            .as_ref()
            .map(|forest| edits::count_edits(&self.graph, forest))
    }

    /// Build a first forest, refine it and return the edited graph
    /// (`show_transitive_closures`) or its tree skeleton.
    ///
    /// Every run starts from scratch; the result depends only on the input,
    /// the configuration and the state of `rng`.
    pub fn run<R: Rng>(&mut self, show_transitive_closures: bool, rng: &mut R) -> Result<QtGraph<N>> {
        self.config.validate()?;
        self.forest = None;

        log::info!(
            "Running quasi-threshold mover on {} vertices and {} edges",
            self.graph.node_count,
            self.graph.edge_count()
        );

        let edges: EdgeTable = count_all_triangles(&self.graph);

        let mut forest = init::initialize(&self.graph, &edges);
        forest.compute_depths()?;
        forest.validate()?;
        if self.config.track_edits {
            let count = edits::count_edits(&self.graph, &forest);
            log::debug!("Initial forest needs {} edits", count.total());
        }

        mover::refine(&self.graph, &mut forest, &self.config, rng)?;
        forest.validate()?;

        let result = output::build_qt_graph(&self.graph, &forest, show_transitive_closures);
        let count = edits::count_edits(&self.graph, &forest);
        log::info!(
            "Quasi-threshold graph ready: {} edits ({} insertions, {} deletions)",
            count.total(),
            count.insertions,
            count.deletions
        );

        self.forest = Some(forest);
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphBuilder;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn k4() -> CompressedGraph<u32> {
        GraphBuilder::from_edges(
            1..=4,
            vec![(1, 2), (1, 3), (1, 4), (2, 3), (2, 4), (3, 4)],
        )
        .unwrap()
    }

    #[test]
    fn rejects_colliding_root() {
        let err = QuasiThresholdMover::new(k4(), 3).err().unwrap();
        assert_eq!(err, QtmError::RootCollision("3".into()));
    }

    #[test]
    fn rejects_invalid_config() {
        let mut qtm = QuasiThresholdMover::new(k4(), u32::MAX)
            .unwrap()
            .with_config(QtmConfig::new(5, 2, 2.0));
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            qtm.run(true, &mut rng),
            Err(QtmError::InvalidConfig(_))
        ));
        assert!(qtm.forest().is_none());
    }

    #[test]
    fn complete_graph_needs_no_edits() {
        let mut qtm = QuasiThresholdMover::new(k4(), u32::MAX).unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        let out = qtm.run(true, &mut rng).unwrap();

        assert_eq!(out.node_count(), 4);
        assert_eq!(out.edge_count(), 6);
        assert_eq!(qtm.edit_count().unwrap().total(), 0);
        assert!(!out.node_ids().contains(&u32::MAX));
    }

    #[test]
    fn empty_graph() {
        let graph = GraphBuilder::<u32>::default().build();
        let mut qtm = QuasiThresholdMover::new(graph, 0).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let out = qtm.run(false, &mut rng).unwrap();

        assert_eq!(out.node_count(), 0);
        assert_eq!(out.edge_count(), 0);
    }
}
