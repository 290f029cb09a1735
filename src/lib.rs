//! Community detection by editing a graph into a quasi-threshold graph

pub mod cluster;
pub mod config;
pub mod data;
pub mod error;
pub mod graph;
pub mod qtm;
pub mod storage;
pub mod viz;

pub use config::{Config, QtmConfig};
pub use error::QtmError;
pub use graph::{CompressedGraph, GraphBuilder};
pub use qtm::{QtGraph, QuasiThresholdMover};

pub use anyhow::{anyhow, Result};
