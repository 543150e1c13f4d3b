//! # rdfwalk
//!
//! Generates "walks" — token sequences alternating entities and relations —
//! by sampling paths over an RDF knowledge graph, producing a training
//! corpus for graph-embedding algorithms.
//!
//! ## Architecture
//!
//! - **Symbol table** (`symbol`): string interning for memory-dense indexing
//! - **Graph index** (`graph`): N-Triples ingestion into a frozen adjacency map
//! - **Entity selection** (`select`): full-graph or file-restricted seed sets
//! - **Walk generation** (`walks`): sampling policies, worker pool, shared sink
//! - **Facade** (`generator`): index + selector + dispatcher wired together
//!
//! ## Library usage
//!
//! ```no_run
//! use rdfwalk::generator::WalkGenerator;
//! use rdfwalk::walks::{WalkConfig, WalkMode};
//!
//! let generator = WalkGenerator::from_file("graph.nt", WalkConfig::default()).unwrap();
//! generator
//!     .generate_walks_for_all(WalkMode::RandomWalksDuplicateFree, "walks.txt.gz".as_ref())
//!     .unwrap();
//! ```

pub mod error;
pub mod generator;
pub mod graph;
pub mod select;
pub mod symbol;
pub mod walks;
