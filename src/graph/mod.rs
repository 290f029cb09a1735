//! Graph representation and algorithms module

pub mod algorithms;
pub mod builder;
pub mod compressed;
pub mod edge;

use std::fmt::Debug;
use std::hash::Hash;

pub use builder::GraphBuilder;
pub use compressed::CompressedGraph;
pub use edge::{EdgeKey, EdgeRecord, EdgeTable};

/// Requirements on vertex identities: totally ordered, hashable, printable
pub trait VertexId: Clone + Ord + Hash + Debug {}

impl<T: Clone + Ord + Hash + Debug> VertexId for T {}
