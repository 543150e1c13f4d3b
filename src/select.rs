//! Entity selection: which subjects to walk from.
//!
//! Two variants, both producing an immutable [`EntitySet`] once:
//! every distinct subject of the index, or an externally supplied list of
//! URIs ("light mode") with optional one-hop redirect normalization.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::SelectorError;
use crate::graph::index::GraphIndex;

/// Resolves one hop of URI indirection during entity-set construction.
///
/// Resolution happens single-threaded, before the worker pool starts, so
/// implementations may block on network I/O. A failed lookup returns `None`
/// and the original identifier is kept.
pub trait RedirectResolver {
    /// The identifier the given URI redirects to, or `None` when resolution
    /// fails or is not applicable.
    fn resolve(&self, uri: &str) -> Option<String>;
}

/// HTTP-backed resolver following redirects to their final URL.
///
/// DBpedia serves `/page/` URLs for redirected resources; those are mapped
/// back to `/resource/` so the result matches the tokens in the index.
pub struct HttpRedirectResolver {
    agent: ureq::Agent,
}

impl HttpRedirectResolver {
    /// Create a resolver with default agent settings.
    pub fn new() -> Self {
        Self {
            agent: ureq::AgentBuilder::new().build(),
        }
    }
}

impl Default for HttpRedirectResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl RedirectResolver for HttpRedirectResolver {
    fn resolve(&self, uri: &str) -> Option<String> {
        match self.agent.get(uri).call() {
            Ok(response) => Some(response.get_url().replace("/page/", "/resource/")),
            Err(err) => {
                tracing::warn!(uri, %err, "redirect resolution failed, keeping original");
                None
            }
        }
    }
}

/// Immutable set of seed entities targeted for walk generation.
///
/// Membership is unique even when the input contains duplicate lines.
#[derive(Debug, Clone, Default)]
pub struct EntitySet {
    entities: HashSet<String>,
}

impl EntitySet {
    /// Every distinct subject present in the index.
    pub fn all_subjects(index: &GraphIndex) -> Self {
        Self {
            entities: index.subjects().map(str::to_owned).collect(),
        }
    }

    /// Read entities from a UTF-8 file with one URI per line.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SelectorError> {
        Self::from_file_with_resolver(path, None)
    }

    /// Read entities from a file, optionally resolving redirects.
    ///
    /// For each line the original URI is always kept; when the resolver
    /// yields a different identifier, that is added alongside it.
    pub fn from_file_with_resolver(
        path: impl AsRef<Path>,
        resolver: Option<&dyn RedirectResolver>,
    ) -> Result<Self, SelectorError> {
        let path = path.as_ref();
        let io_err = |source| SelectorError::Io {
            path: path.display().to_string(),
            source,
        };
        let file = File::open(path).map_err(io_err)?;

        let mut entities = HashSet::new();
        for line in BufReader::new(file).lines() {
            let line = line.map_err(io_err)?;
            let uri = line.trim();
            if uri.is_empty() {
                continue;
            }
            if let Some(resolver) = resolver {
                if let Some(alternative) = resolver.resolve(uri) {
                    if alternative != uri {
                        tracing::info!(
                            original = uri,
                            alternative,
                            "redirect target added to entity set"
                        );
                        entities.insert(alternative);
                    }
                }
            }
            entities.insert(uri.to_owned());
        }
        tracing::info!(path = %path.display(), entities = entities.len(), "entity file read");
        Ok(Self { entities })
    }

    /// Whether the set contains the given entity.
    pub fn contains(&self, entity: &str) -> bool {
        self.entities.contains(entity)
    }

    /// Iterate over the entities, in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entities.iter().map(String::as_str)
    }

    /// Number of entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl FromIterator<String> for EntitySet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            entities: iter.into_iter().collect(),
        }
    }
}
