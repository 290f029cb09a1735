//! Input loading module

pub mod edgelist;
