//! Walk sampling policies.
//!
//! Each policy is a pure function of `(index, entity, depth, count)` plus a
//! caller-supplied random source: nothing is mutated and no state is
//! carried between calls, so workers sample concurrently without locks.
//!
//! Shared edge cases: a seed with zero out-degree, `depth == 0`, or
//! `count == 0` all yield an empty result, never an error. The seed entity
//! must already be in shortened form; every emitted token is shortened
//! because the index interns shortened terms only.

use std::collections::HashSet;

use rand::Rng;
use rand::distributions::{Distribution, WeightedIndex};

use crate::graph::Edge;
use crate::graph::index::GraphIndex;

// ---------------------------------------------------------------------------
// Edge scoring
// ---------------------------------------------------------------------------

/// Scores an edge for the weighted sampler; higher scores are more likely
/// to be followed.
pub trait EdgeScorer: Sync {
    /// The sampling weight of `edge`. Non-positive scores are clamped to a
    /// minimal positive weight before sampling.
    fn score(&self, index: &GraphIndex, edge: Edge) -> f64;
}

/// Down-weights edges through very frequent predicates and objects.
///
/// Hub tokens such as `rdf:type` or country nodes otherwise dominate the
/// corpus; scoring an edge by the inverse geometric mean of its token
/// frequencies spreads walks across the long tail.
#[derive(Debug, Clone, Copy, Default)]
pub struct InverseFrequencyScorer;

impl EdgeScorer for InverseFrequencyScorer {
    fn score(&self, index: &GraphIndex, edge: Edge) -> f64 {
        let predicate = f64::from(index.frequency(edge.predicate));
        let object = f64::from(index.frequency(edge.object));
        1.0 / (predicate * object).sqrt().max(1.0)
    }
}

// ---------------------------------------------------------------------------
// Duplicate-free exhaustive sampling
// ---------------------------------------------------------------------------

/// Generate at most `count` textually distinct walks from `entity`.
///
/// The candidate set starts from the seed's direct edges (the first hop).
/// Each further hop extends every unfinished walk along every outgoing
/// edge of its tail; a walk whose tail has no outgoing edges is kept as
/// finished and not extended again. After every hop the candidate set is
/// trimmed back to `count` by removing uniformly random elements without
/// replacement.
///
/// Emitted walks have at most `2 * depth + 1` tokens — fewer when a branch
/// dead-ends before reaching `depth`.
pub fn duplicate_free_walks(
    index: &GraphIndex,
    entity: &str,
    depth: usize,
    count: usize,
    rng: &mut impl Rng,
) -> Vec<String> {
    if depth == 0 || count == 0 {
        return Vec::new();
    }
    let Some(seed) = index.token(entity) else {
        return Vec::new();
    };
    let first_hop = index.edges(seed);
    if first_hop.is_empty() {
        return Vec::new();
    }

    // Each candidate is a distinct edge sequence; the flag marks walks
    // whose tail can no longer be extended.
    let mut seen: HashSet<Vec<Edge>> = HashSet::new();
    let mut candidates: Vec<(Vec<Edge>, bool)> = Vec::new();
    for &edge in first_hop {
        let walk = vec![edge];
        if seen.insert(walk.clone()) {
            candidates.push((walk, false));
        }
    }
    trim_to(&mut candidates, count, rng);

    for _ in 1..depth {
        let mut next = Vec::with_capacity(candidates.len());
        for (walk, finished) in candidates.drain(..) {
            if finished {
                next.push((walk, true));
                continue;
            }
            let Some(tail) = walk.last().map(|edge| edge.object) else {
                continue;
            };
            let outgoing = index.edges(tail);
            if outgoing.is_empty() {
                next.push((walk, true));
                continue;
            }
            for &edge in outgoing {
                let mut extended = walk.clone();
                extended.push(edge);
                if seen.insert(extended.clone()) {
                    next.push((extended, false));
                }
            }
        }
        candidates = next;
        trim_to(&mut candidates, count, rng);
    }

    candidates
        .into_iter()
        .map(|(walk, _)| render_walk(index, entity, &walk))
        .collect()
}

/// Remove uniformly random elements without replacement until the set fits
/// the cap.
fn trim_to<T>(candidates: &mut Vec<T>, cap: usize, rng: &mut impl Rng) {
    while candidates.len() > cap {
        let victim = rng.gen_range(0..candidates.len());
        candidates.swap_remove(victim);
    }
}

// ---------------------------------------------------------------------------
// Classic random walks (duplicates possible)
// ---------------------------------------------------------------------------

/// Perform exactly `count` independent random-walk attempts from `entity`.
///
/// Each attempt takes up to `depth` uniformly random steps. A walk that
/// dead-ends is kept truncated if it advanced past the seed and discarded
/// otherwise — attempts are not replaced, so fewer than `count` walks may
/// be returned.
pub fn random_walks(
    index: &GraphIndex,
    entity: &str,
    depth: usize,
    count: usize,
    rng: &mut impl Rng,
) -> Vec<String> {
    if depth == 0 || count == 0 {
        return Vec::new();
    }
    let Some(seed) = index.token(entity) else {
        return Vec::new();
    };

    let mut result = Vec::with_capacity(count);
    for _ in 0..count {
        let mut walk: Vec<Edge> = Vec::with_capacity(depth);
        let mut tail = seed;
        for _ in 0..depth {
            let edges = index.edges(tail);
            if edges.is_empty() {
                break;
            }
            let edge = edges[rng.gen_range(0..edges.len())];
            walk.push(edge);
            tail = edge.object;
        }
        if !walk.is_empty() {
            result.push(render_walk(index, entity, &walk));
        }
    }
    result
}

// ---------------------------------------------------------------------------
// Mid walks (uniform and weighted)
// ---------------------------------------------------------------------------

/// Perform `count` uniform forward walks of up to `depth` hops from
/// `entity`, emitting every walk that advanced past the seed.
pub fn mid_walks(
    index: &GraphIndex,
    entity: &str,
    depth: usize,
    count: usize,
    rng: &mut impl Rng,
) -> Vec<String> {
    walk_forward(index, entity, depth, count, None, rng)
}

/// Like [`mid_walks`], but each hop is drawn from the distribution induced
/// by `scorer` over the tail's outgoing edges.
pub fn weighted_mid_walks(
    index: &GraphIndex,
    entity: &str,
    depth: usize,
    count: usize,
    scorer: &dyn EdgeScorer,
    rng: &mut impl Rng,
) -> Vec<String> {
    walk_forward(index, entity, depth, count, Some(scorer), rng)
}

fn walk_forward(
    index: &GraphIndex,
    entity: &str,
    depth: usize,
    count: usize,
    scorer: Option<&dyn EdgeScorer>,
    rng: &mut impl Rng,
) -> Vec<String> {
    if depth == 0 || count == 0 {
        return Vec::new();
    }
    let Some(seed) = index.token(entity) else {
        return Vec::new();
    };

    let mut result = Vec::with_capacity(count);
    for _ in 0..count {
        let mut walk: Vec<Edge> = Vec::with_capacity(depth);
        let mut tail = seed;
        for _ in 0..depth {
            let edges = index.edges(tail);
            if edges.is_empty() {
                break;
            }
            let choice = match scorer {
                None => rng.gen_range(0..edges.len()),
                Some(scorer) => pick_weighted(index, edges, scorer, rng),
            };
            let edge = edges[choice];
            walk.push(edge);
            tail = edge.object;
        }
        if !walk.is_empty() {
            result.push(render_walk(index, entity, &walk));
        }
    }
    result
}

/// Index of an edge drawn proportionally to its score.
fn pick_weighted(
    index: &GraphIndex,
    edges: &[Edge],
    scorer: &dyn EdgeScorer,
    rng: &mut impl Rng,
) -> usize {
    let weights: Vec<f64> = edges
        .iter()
        .map(|&edge| scorer.score(index, edge).max(f64::MIN_POSITIVE))
        .collect();
    match WeightedIndex::new(&weights) {
        Ok(distribution) => distribution.sample(rng),
        // Degenerate weights (all zero after clamping is impossible, but
        // overflowing sums are not): fall back to uniform choice.
        Err(_) => rng.gen_range(0..edges.len()),
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Space-join the seed token and each hop's predicate and object.
fn render_walk(index: &GraphIndex, seed: &str, edges: &[Edge]) -> String {
    let mut sentence = String::from(seed);
    for edge in edges {
        sentence.push(' ');
        sentence.push_str(index.resolve(edge.predicate));
        sentence.push(' ');
        sentence.push_str(index.resolve(edge.object));
    }
    sentence
}
