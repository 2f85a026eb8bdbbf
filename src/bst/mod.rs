//! Plain, unbalanced binary search tree (component C1).
//!
//! This is the substructure every persistent engine in this crate is
//! built from: the naive engine (`crate::naive`) clones a whole tree of
//! these nodes per version, while the fat-node and node-copying engines
//! (`crate::fatnode`, `crate::copying`, `crate::full`) each embed one
//! `Bst` per mutable field to record that field's version history.

mod node;
mod tree;

pub use node::{Node, NodeRef};
pub use tree::{ordered, Bst};

#[cfg(test)]
#[path = "tree_test.rs"]
mod tree_test;
