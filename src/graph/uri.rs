//! URI normalization helpers.
//!
//! Emitted walk tokens use a compact prefixed form (`dbr:Berlin` rather
//! than the full DBpedia resource URI), which substantially reduces corpus
//! size. Shortening is idempotent: an already-shortened token passes
//! through unchanged.

use std::borrow::Cow;

/// Namespace prefixes recognized by [`shorten_uri`].
const PREFIXES: &[(&str, &str)] = &[
    ("http://www.w3.org/1999/02/22-rdf-syntax-ns#", "rdf:"),
    ("http://www.w3.org/2000/01/rdf-schema#", "rdfs:"),
    ("http://www.w3.org/2002/07/owl#", "owl:"),
    ("http://www.w3.org/2001/XMLSchema#", "xsd:"),
    ("http://www.w3.org/2004/02/skos/core#", "skos:"),
    ("http://xmlns.com/foaf/0.1/", "foaf:"),
    ("http://purl.org/dc/terms/", "dct:"),
    ("http://dbpedia.org/resource/", "dbr:"),
    ("http://dbpedia.org/ontology/", "dbo:"),
    ("http://dbpedia.org/property/", "dbp:"),
    ("http://www.wikidata.org/entity/", "wd:"),
    ("http://www.wikidata.org/prop/direct/", "wdt:"),
];

/// Shorten a URI to its compact prefixed form.
///
/// URIs outside the known namespaces are returned unchanged, as are tokens
/// that are already shortened (no shortened form starts with a full
/// namespace IRI, so the function is idempotent).
pub fn shorten_uri(uri: &str) -> Cow<'_, str> {
    for (namespace, prefix) in PREFIXES {
        if let Some(local) = uri.strip_prefix(namespace) {
            return Cow::Owned(format!("{prefix}{local}"));
        }
    }
    Cow::Borrowed(uri)
}

/// Remove a leading less-than and a trailing greater-than sign.
pub fn strip_tags(term: &str) -> &str {
    let term = term.strip_prefix('<').unwrap_or(term);
    term.strip_suffix('>').unwrap_or(term)
}
