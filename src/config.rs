//! Configuration management for the quasi-threshold mover

use crate::error::{QtmError, Result};

/// Tuning knobs of the quasi-threshold mover
#[derive(Debug, Clone, PartialEq)]
pub struct QtmConfig {
    /// Number of refinement iterations
    pub iterations: usize,

    /// Number of leading iterations that may pick a random parent (0 disables annealing)
    pub annealing_iterations: usize,

    /// Probability of a random parent in the first iteration
    pub initial_sub_optimal_probability: f64,

    /// Log the edit count after every iteration
    pub track_edits: bool,
}

impl Default for QtmConfig {
    fn default() -> Self {
        Self {
            iterations: 5,
            annealing_iterations: 0,
            initial_sub_optimal_probability: 0.1,
            track_edits: false,
        }
    }
}

impl QtmConfig {
    /// Create a new configuration with custom values
    pub fn new(
        iterations: usize,
        annealing_iterations: usize,
        initial_sub_optimal_probability: f64,
    ) -> Self {
        Self {
            iterations,
            annealing_iterations,
            initial_sub_optimal_probability,
            track_edits: false,
        }
    }

    pub fn with_track_edits(mut self, track_edits: bool) -> Self {
        self.track_edits = track_edits;
        self
    }

    pub fn validate(&self) -> Result<()> {
        let p = self.initial_sub_optimal_probability;
        if !(0.0..=1.0).contains(&p) {
            return Err(QtmError::InvalidConfig(format!(
                "initial sub-optimal choice probability {} is outside [0, 1]",
                p
            )));
        }
        Ok(())
    }

    /// Chance of picking a random parent during iteration `iteration` (0-based).
    /// Decays linearly from the initial probability to zero.
    pub fn annealing_probability(&self, iteration: usize) -> f64 {
        if iteration >= self.annealing_iterations {
            return 0.0;
        }
        let progress = iteration as f64 / self.annealing_iterations as f64;
        self.initial_sub_optimal_probability * (1.0 - progress)
    }
}

/// Driver configuration used by the command line tool
#[derive(Debug, Clone)]
pub struct Config {
    /// Algorithm settings
    pub qtm: QtmConfig,

    /// Minimum community size to report
    pub min_cluster_size: usize,

    /// Emit the full edited graph instead of the tree skeleton
    pub show_transitive_closures: bool,

    /// Seed for the vertex shuffles and annealing choices
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            qtm: QtmConfig::default(),
            min_cluster_size: 3,
            show_transitive_closures: true,
            seed: None,
        }
    }
}
