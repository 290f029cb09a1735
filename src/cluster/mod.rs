//! Community analysis module

pub mod detection;
pub mod metrics;

use serde::{Deserialize, Serialize};

/// A community: one top-level subtree of the quasi-threshold forest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cluster {
    /// Unique identifier for this cluster
    pub id: u32,

    /// Members of this cluster (node indices), in tree pre-order
    pub members: Vec<u32>,

    /// Size of the cluster
    pub size: usize,

    /// Density of the original graph restricted to the members
    pub density: f32,

    /// Top vertex of the subtree, adjacent to every member in the edited graph
    pub center: u32,

    /// Number of levels in the subtree
    pub height: u32,
}
