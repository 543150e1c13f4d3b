//! Triple index: ingestion and the frozen adjacency structure.
//!
//! The index is built once per run, single-threaded, through
//! [`parser::GraphIndexBuilder`], then frozen into an immutable
//! [`index::GraphIndex`] before any worker thread starts. The frozen index
//! needs no lock on the read path.

pub mod index;
pub mod parser;
pub mod uri;

use serde::{Deserialize, Serialize};

use crate::symbol::TokenId;

/// A (predicate, object) pair attached to a subject.
///
/// Duplicate edges are preserved: a triple stated twice carries twice the
/// sampling weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    /// The predicate (relation) token.
    pub predicate: TokenId,
    /// The object token.
    pub object: TokenId,
}

impl Edge {
    /// Create a new edge.
    pub fn new(predicate: TokenId, object: TokenId) -> Self {
        Self { predicate, object }
    }
}
