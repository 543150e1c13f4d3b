//! The frozen, read-only triple index.
//!
//! Built once per run by [`GraphIndexBuilder`] and immutable thereafter:
//! concurrent readers never observe partial state and need no locking.
//!
//! [`GraphIndexBuilder`]: crate::graph::parser::GraphIndexBuilder

use std::collections::HashMap;

use rand::Rng;

use crate::graph::Edge;
use crate::symbol::{SymbolTable, TokenId};

const NO_EDGES: &[Edge] = &[];

/// Immutable adjacency map from subject tokens to their outgoing edges.
pub struct GraphIndex {
    table: SymbolTable,
    adjacency: HashMap<TokenId, Vec<Edge>>,
    edge_count: usize,
    /// Per-token frequency across all edge positions (predicate and
    /// object), used by the weighted sampler.
    frequency: Vec<u32>,
}

impl GraphIndex {
    pub(crate) fn new(
        table: SymbolTable,
        adjacency: HashMap<TokenId, Vec<Edge>>,
        edge_count: usize,
    ) -> Self {
        let mut frequency = vec![0u32; table.len()];
        for edges in adjacency.values() {
            for edge in edges {
                frequency[edge.predicate.index()] += 1;
                frequency[edge.object.index()] += 1;
            }
        }
        Self {
            table,
            adjacency,
            edge_count,
            frequency,
        }
    }

    /// Look up the token for a (shortened) term, if it was seen during load.
    pub fn token(&self, term: &str) -> Option<TokenId> {
        self.table.get(term)
    }

    /// Resolve a token back to its string form.
    pub fn resolve(&self, id: TokenId) -> &str {
        self.table.resolve(id)
    }

    /// Outgoing edges of a subject token.
    pub fn edges(&self, subject: TokenId) -> &[Edge] {
        self.adjacency.get(&subject).map_or(NO_EDGES, Vec::as_slice)
    }

    /// Outgoing edges of a subject, or an empty slice if the subject is
    /// absent. The subject must be in shortened, tag-free form.
    pub fn edges_of(&self, subject: &str) -> &[Edge] {
        self.token(subject).map_or(NO_EDGES, |id| self.edges(id))
    }

    /// A uniformly random outgoing edge of a subject, or `None` if the
    /// subject is absent or has no edges.
    ///
    /// Uses the calling thread's local generator, so concurrent callers do
    /// not contend.
    pub fn random_edge_of(&self, subject: &str) -> Option<Edge> {
        let edges = self.edges_of(subject);
        if edges.is_empty() {
            return None;
        }
        Some(edges[rand::thread_rng().gen_range(0..edges.len())])
    }

    /// How often a token appears across all edges (predicate and object
    /// positions combined).
    pub fn frequency(&self, id: TokenId) -> u32 {
        self.frequency[id.index()]
    }

    /// All distinct subjects, in unspecified order.
    pub fn subjects(&self) -> impl Iterator<Item = &str> {
        self.adjacency.keys().map(|&id| self.table.resolve(id))
    }

    /// Number of distinct subjects.
    pub fn subject_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of edges, counting duplicates.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Number of distinct interned tokens.
    pub fn token_count(&self) -> usize {
        self.table.len()
    }
}

impl std::fmt::Debug for GraphIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphIndex")
            .field("subjects", &self.subject_count())
            .field("edges", &self.edge_count())
            .field("tokens", &self.token_count())
            .finish()
    }
}
