//! An implementation of a dynamic, runtime-dimensional K-D Tree.

#![warn(missing_docs)]

mod index;
mod node;
mod query;

pub use index::KdTree;
pub use query::Neighbor;
