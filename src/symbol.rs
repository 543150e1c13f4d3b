//! String interning for graph terms.
//!
//! Predicates and object URIs repeat heavily in large triple files. The
//! [`SymbolTable`] maps each distinct shortened URI to a compact [`TokenId`]
//! exactly once, so the adjacency structure stores fixed-size edges instead
//! of owned strings. The table is populated only during the single-threaded
//! load phase and read-only afterwards.

use std::collections::HashMap;
use std::num::NonZeroU32;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Unique, niche-optimized identifier for an interned token.
///
/// Uses `NonZeroU32` so that `Option<TokenId>` is the same size as `TokenId`
/// (the niche optimization lets the compiler use 0 as the `None`
/// discriminant).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(transparent)]
pub struct TokenId(NonZeroU32);

impl TokenId {
    /// Get the underlying `u32` value.
    pub fn get(self) -> u32 {
        self.0.get()
    }

    fn from_index(index: usize) -> Option<Self> {
        u32::try_from(index + 1).ok().and_then(NonZeroU32::new).map(TokenId)
    }

    pub(crate) fn index(self) -> usize {
        self.0.get() as usize - 1
    }
}

impl std::fmt::Display for TokenId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "tok:{}", self.0)
    }
}

/// Interning table mapping strings to [`TokenId`]s and back.
///
/// The `Arc<str>` allocations are shared between the lookup map and the
/// resolution vector, so each distinct string is stored once.
///
/// Capacity bound: at most `u32::MAX - 1` distinct terms. The largest
/// public knowledge graphs stay two orders of magnitude below that, so
/// exceeding it is treated as an unrecoverable invariant violation rather
/// than a recoverable error.
#[derive(Debug, Default)]
pub struct SymbolTable {
    lookup: HashMap<Arc<str>, TokenId>,
    strings: Vec<Arc<str>>,
}

impl SymbolTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table with pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            lookup: HashMap::with_capacity(capacity),
            strings: Vec::with_capacity(capacity),
        }
    }

    /// Intern a string, returning its token.
    ///
    /// Repeated calls with the same string return the same token without
    /// allocating.
    ///
    /// # Panics
    ///
    /// Panics when the table already holds `u32::MAX - 1` distinct terms.
    pub fn intern(&mut self, term: &str) -> TokenId {
        if let Some(&id) = self.lookup.get(term) {
            return id;
        }
        let id = TokenId::from_index(self.strings.len())
            .expect("symbol table exhausted: more than u32::MAX - 1 distinct terms");
        let shared: Arc<str> = Arc::from(term);
        self.strings.push(Arc::clone(&shared));
        self.lookup.insert(shared, id);
        id
    }

    /// Look up the token for a string without interning it.
    pub fn get(&self, term: &str) -> Option<TokenId> {
        self.lookup.get(term).copied()
    }

    /// Resolve a token back to its string.
    ///
    /// The token must come from this table.
    pub fn resolve(&self, id: TokenId) -> &str {
        &self.strings[id.index()]
    }

    /// Number of distinct interned strings.
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}
