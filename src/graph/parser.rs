//! N-Triples ingestion: line parsing and index construction.
//!
//! The builder is the only mutable stage of the index lifecycle. It is
//! driven single-threaded, then consumed by [`GraphIndexBuilder::freeze`]
//! into a read-only [`GraphIndex`] before any concurrent work starts.
//!
//! Lines are parsed without a full RDF toolkit: triple files at the scale
//! this crate targets (tens of millions of edges) are line-oriented, and a
//! split-and-strip pass keeps ingestion fast and memory-flat.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::LazyLock;

use flate2::read::GzDecoder;
use regex::Regex;

use crate::error::IndexError;
use crate::graph::Edge;
use crate::graph::index::GraphIndex;
use crate::graph::uri::{shorten_uri, strip_tags};
use crate::symbol::{SymbolTable, TokenId};

/// File extensions recognized during directory ingestion.
const TRIPLE_EXTENSIONS: &[&str] = &["nt", "ttl", "gz"];

/// Matches a quoted literal anywhere in a line. Literals are not walkable
/// nodes, so the whole statement is skipped.
static RE_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"".*""#).expect("literal pattern is valid"));

/// Mutable construction stage of the triple index.
///
/// Accepts triples from files, directories, or direct calls (the seam for
/// dataset adapters), and freezes into an immutable [`GraphIndex`].
#[derive(Debug, Default)]
pub struct GraphIndexBuilder {
    table: SymbolTable,
    adjacency: HashMap<TokenId, Vec<Edge>>,
    edge_count: usize,
}

impl GraphIndexBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder with a capacity hint for the expected subject count.
    pub fn with_capacity(subjects: usize) -> Self {
        Self {
            table: SymbolTable::with_capacity(subjects),
            adjacency: HashMap::with_capacity(subjects),
            edge_count: 0,
        }
    }

    /// Add a single triple.
    ///
    /// Angle brackets are stripped and URIs are shortened before interning,
    /// so callers may pass raw or normalized terms. Duplicate triples are
    /// kept as multi-edges.
    pub fn add_triple(&mut self, subject: &str, predicate: &str, object: &str) {
        let subject = self.table.intern(&shorten_uri(strip_tags(subject)));
        let predicate = self.table.intern(&shorten_uri(strip_tags(predicate)));
        let object = self.table.intern(&shorten_uri(strip_tags(object)));
        self.adjacency
            .entry(subject)
            .or_default()
            .push(Edge::new(predicate, object));
        self.edge_count += 1;
    }

    /// Load a triple file, gzip-decompressing when the path ends in `.gz`.
    ///
    /// A missing or unreadable file fails this call only; triples from
    /// earlier calls are retained.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<(), IndexError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| IndexError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let source_name = path.display().to_string();
        if has_extension(path, "gz") {
            self.load_reader(&source_name, BufReader::new(GzDecoder::new(file)))
        } else {
            self.load_reader(&source_name, BufReader::new(file))
        }
    }

    /// Load every recognized triple file (`.nt`, `.ttl`, `.gz`) in a
    /// directory, in listing order.
    ///
    /// Individual file failures are logged and skipped; only a path that is
    /// not a directory fails the whole call.
    pub fn load_dir(&mut self, dir: impl AsRef<Path>) -> Result<(), IndexError> {
        let dir = dir.as_ref();
        let entries = std::fs::read_dir(dir).map_err(|source| {
            if dir.is_dir() {
                IndexError::Io {
                    path: dir.display().to_string(),
                    source,
                }
            } else {
                IndexError::NotADirectory {
                    path: dir.display().to_string(),
                }
            }
        })?;

        let mut paths: Vec<_> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| TRIPLE_EXTENSIONS.iter().any(|ext| has_extension(p, ext)))
            .collect();
        paths.sort();

        for path in paths {
            tracing::info!(file = %path.display(), "processing triple file");
            if let Err(err) = self.load_file(&path) {
                tracing::error!(file = %path.display(), %err, "skipping unreadable triple file");
            }
        }
        Ok(())
    }

    /// Parse lines from a reader into the index.
    fn load_reader(
        &mut self,
        source_name: &str,
        reader: impl BufRead,
    ) -> Result<(), IndexError> {
        let mut line_number: u64 = 0;
        for line in reader.lines() {
            let line = line.map_err(|source| IndexError::Io {
                path: source_name.to_string(),
                source,
            })?;
            line_number += 1;

            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') || RE_LITERAL.is_match(trimmed) {
                continue;
            }

            // Strip the trailing statement terminator (" .").
            let statement = trimmed
                .strip_suffix('.')
                .map(str::trim_end)
                .unwrap_or(trimmed);

            let tokens: Vec<&str> = statement.split_whitespace().collect();
            if tokens.len() != 3 {
                tracing::error!(
                    file = source_name,
                    line = line_number,
                    expected = 3,
                    actual = tokens.len(),
                    tokens = %tokens.join(" | "),
                    "malformed triple line, skipping"
                );
                continue;
            }
            self.add_triple(tokens[0], tokens[1], tokens[2]);
        }
        tracing::info!(
            file = source_name,
            subjects = self.adjacency.len(),
            edges = self.edge_count,
            "triple source loaded"
        );
        Ok(())
    }

    /// Number of distinct subjects seen so far.
    pub fn subject_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of edges (triples) seen so far, counting duplicates.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Freeze the builder into an immutable, lock-free index.
    pub fn freeze(self) -> GraphIndex {
        GraphIndex::new(self.table, self.adjacency, self.edge_count)
    }
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_temp(content: &str, suffix: &str) -> tempfile::TempPath {
        let mut file = tempfile::Builder::new()
            .suffix(suffix)
            .tempfile()
            .unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.into_temp_path()
    }

    #[test]
    fn parses_well_formed_triples() {
        let path = write_temp(
            "<http://example.org/A> <http://example.org/p> <http://example.org/B> .\n\
             <http://example.org/A> <http://example.org/p> <http://example.org/C> .\n",
            ".nt",
        );
        let mut builder = GraphIndexBuilder::new();
        builder.load_file(&path).unwrap();
        assert_eq!(builder.subject_count(), 1);
        assert_eq!(builder.edge_count(), 2);
    }

    #[test]
    fn preserves_duplicate_edges() {
        let mut builder = GraphIndexBuilder::new();
        builder.add_triple("ex:A", "ex:p", "ex:B");
        builder.add_triple("ex:A", "ex:p", "ex:B");
        let index = builder.freeze();
        assert_eq!(index.edges_of("ex:A").len(), 2);
    }

    #[test]
    fn skips_comments_blanks_and_literals() {
        let path = write_temp(
            "# a comment\n\
             \n\
             <http://example.org/A> <http://example.org/label> \"Berlin\" .\n\
             <http://example.org/A> <http://example.org/p> <http://example.org/B> .\n",
            ".nt",
        );
        let mut builder = GraphIndexBuilder::new();
        builder.load_file(&path).unwrap();
        assert_eq!(builder.edge_count(), 1);
    }

    #[test]
    fn malformed_line_is_skipped_and_load_completes() {
        let path = write_temp(
            "<http://example.org/A> <http://example.org/p> <http://example.org/B> .\n\
             justonetoken\n\
             <http://example.org/B> <http://example.org/p> <http://example.org/C> .\n",
            ".nt",
        );
        let mut builder = GraphIndexBuilder::new();
        builder.load_file(&path).unwrap();
        let index = builder.freeze();
        assert_eq!(index.subject_count(), 2);
        assert!(index.edges_of("justonetoken").is_empty());
    }

    #[test]
    fn missing_file_is_an_error() {
        let mut builder = GraphIndexBuilder::new();
        let result = builder.load_file("/nonexistent/graph.nt");
        assert!(matches!(result, Err(IndexError::Io { .. })));
    }

    #[test]
    fn load_failure_retains_earlier_sources() {
        let path = write_temp("<ex:A> <ex:p> <ex:B> .\n", ".nt");
        let mut builder = GraphIndexBuilder::new();
        builder.load_file(&path).unwrap();
        assert!(builder.load_file("/nonexistent/graph.nt").is_err());
        assert_eq!(builder.edge_count(), 1);
    }

    #[test]
    fn gzip_source_is_decompressed() {
        use flate2::Compression;
        use flate2::write::GzEncoder;

        let mut file = tempfile::Builder::new().suffix(".nt.gz").tempfile().unwrap();
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder
            .write_all(b"<http://example.org/X> <http://example.org/p> <http://example.org/Y> .\n")
            .unwrap();
        file.write_all(&encoder.finish().unwrap()).unwrap();
        let path = file.into_temp_path();

        let mut builder = GraphIndexBuilder::new();
        builder.load_file(&path).unwrap();
        assert_eq!(builder.edge_count(), 1);
    }

    #[test]
    fn directory_ingestion_merges_plain_and_gzip() {
        use flate2::Compression;
        use flate2::write::GzEncoder;

        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("plain.nt"),
            "<http://example.org/A> <http://example.org/p> <http://example.org/B> .\n",
        )
        .unwrap();
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder
            .write_all(b"<http://example.org/C> <http://example.org/p> <http://example.org/D> .\n")
            .unwrap();
        std::fs::write(dir.path().join("zipped.nt.gz"), encoder.finish().unwrap()).unwrap();
        // Unrecognized extensions are ignored.
        std::fs::write(dir.path().join("notes.txt"), "not a triple file\n").unwrap();

        let mut builder = GraphIndexBuilder::new();
        builder.load_dir(dir.path()).unwrap();
        let index = builder.freeze();
        assert_eq!(index.subject_count(), 2);
        assert!(!index.edges_of("http://example.org/A").is_empty());
        assert!(!index.edges_of("http://example.org/C").is_empty());
    }

    #[test]
    fn load_dir_rejects_file_path() {
        let path = write_temp("<ex:A> <ex:p> <ex:B> .\n", ".nt");
        let mut builder = GraphIndexBuilder::new();
        assert!(matches!(
            builder.load_dir(&path),
            Err(IndexError::NotADirectory { .. })
        ));
    }

    #[test]
    fn uris_are_shortened_on_ingest() {
        let mut builder = GraphIndexBuilder::new();
        builder.add_triple(
            "<http://dbpedia.org/resource/Berlin>",
            "<http://dbpedia.org/ontology/capitalOf>",
            "<http://dbpedia.org/resource/Germany>",
        );
        let index = builder.freeze();
        let edges = index.edges_of("dbr:Berlin");
        assert_eq!(edges.len(), 1);
        assert_eq!(index.resolve(edges[0].predicate), "dbo:capitalOf");
        assert_eq!(index.resolve(edges[0].object), "dbr:Germany");
    }
}
