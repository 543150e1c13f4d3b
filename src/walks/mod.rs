//! Walk generation: sampling policies, the shared sink, and the worker
//! pool that connects them.

pub mod dispatch;
pub mod sampler;
pub mod writer;

use std::str::FromStr;

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Sampling policy, chosen once per run and handed to the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WalkMode {
    /// Exactly `walks_per_entity` independent uniform random walks;
    /// duplicates possible.
    RandomWalks,
    /// Exhaustive breadth-first enumeration with a random per-hop cap;
    /// no two emitted walks are textually identical.
    RandomWalksDuplicateFree,
    /// Uniform forward walks.
    MidWalks,
    /// Forward walks biased by an edge score that down-weights
    /// high-frequency predicates and objects.
    MidWalksWeighted,
}

impl WalkMode {
    /// The accepted textual spellings, for front-end help output.
    pub fn options() -> &'static str {
        "RANDOM_WALKS | RANDOM_WALKS_DUPLICATE_FREE | MID_WALKS | MID_WALKS_WEIGHTED"
    }
}

impl std::fmt::Display for WalkMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            WalkMode::RandomWalks => "RANDOM_WALKS",
            WalkMode::RandomWalksDuplicateFree => "RANDOM_WALKS_DUPLICATE_FREE",
            WalkMode::MidWalks => "MID_WALKS",
            WalkMode::MidWalksWeighted => "MID_WALKS_WEIGHTED",
        };
        f.write_str(name)
    }
}

/// Error returned when a walk-mode string is not recognized.
#[derive(Debug, Error, Diagnostic)]
#[error("unknown walk generation mode: {0}")]
#[diagnostic(
    code(rdfwalk::walks::unknown_mode),
    help("Valid modes are: RANDOM_WALKS | RANDOM_WALKS_DUPLICATE_FREE | MID_WALKS | MID_WALKS_WEIGHTED.")
)]
pub struct ParseWalkModeError(String);

impl FromStr for WalkMode {
    type Err = ParseWalkModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "RANDOM_WALKS" => Ok(WalkMode::RandomWalks),
            "RANDOM_WALKS_DUPLICATE_FREE" => Ok(WalkMode::RandomWalksDuplicateFree),
            "MID_WALKS" => Ok(WalkMode::MidWalks),
            "MID_WALKS_WEIGHTED" => Ok(WalkMode::MidWalksWeighted),
            _ => Err(ParseWalkModeError(s.to_owned())),
        }
    }
}

/// Run-wide walk generation parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalkConfig {
    /// Number of entity-to-entity hops per walk; token count is at most
    /// `2 * depth + 1`.
    pub depth: usize,
    /// Number of walks requested per entity.
    pub walks_per_entity: usize,
    /// Worker pool size. `None` means half of the available hardware
    /// parallelism, at least one.
    pub threads: Option<usize>,
    /// Base RNG seed for reproducible sampling. `None` seeds each task
    /// from entropy.
    pub seed: Option<u64>,
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            depth: 4,
            walks_per_entity: 100,
            threads: None,
            seed: None,
        }
    }
}

impl WalkConfig {
    pub(crate) fn effective_threads(&self) -> usize {
        self.threads.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get() / 2)
                .unwrap_or(1)
                .max(1)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_round_trips_through_display() {
        for mode in [
            WalkMode::RandomWalks,
            WalkMode::RandomWalksDuplicateFree,
            WalkMode::MidWalks,
            WalkMode::MidWalksWeighted,
        ] {
            assert_eq!(mode.to_string().parse::<WalkMode>().unwrap(), mode);
        }
    }

    #[test]
    fn mode_parsing_is_case_insensitive() {
        assert_eq!(
            "mid_walks".parse::<WalkMode>().unwrap(),
            WalkMode::MidWalks
        );
    }

    #[test]
    fn unknown_mode_is_rejected() {
        assert!("SIDEWAYS_WALKS".parse::<WalkMode>().is_err());
    }

    #[test]
    fn options_listing_is_tidy() {
        let options = WalkMode::options();
        assert!(!options.ends_with(' '));
        assert!(!options.ends_with('|'));
    }

    #[test]
    fn default_config_matches_documented_defaults() {
        let config = WalkConfig::default();
        assert_eq!(config.depth, 4);
        assert_eq!(config.walks_per_entity, 100);
        assert!(config.threads.is_none());
        assert!(config.effective_threads() >= 1);
    }

    #[test]
    fn explicit_thread_count_wins() {
        let config = WalkConfig {
            threads: Some(3),
            ..Default::default()
        };
        assert_eq!(config.effective_threads(), 3);
    }
}
