//! Worker pool: one independent task per entity.
//!
//! The full workload is known before execution starts, so tasks are simply
//! fanned out over a fixed-size pool; there is no ordering guarantee, no
//! backpressure, and no task-to-task communication. Tasks share only the
//! frozen index and the writer. A run is reported complete only after
//! every task has finished or failed.

use std::hash::{DefaultHasher, Hash, Hasher};
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};

use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::DispatchError;
use crate::graph::index::GraphIndex;
use crate::graph::uri::shorten_uri;
use crate::select::EntitySet;
use crate::walks::sampler::{self, EdgeScorer, InverseFrequencyScorer};
use crate::walks::writer::WalkWriter;
use crate::walks::{WalkConfig, WalkMode};

/// Outcome of a dispatch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkStats {
    /// Entities enqueued (one task each).
    pub entities: usize,
    /// Walks written to the sink.
    pub walks: usize,
    /// Tasks that panicked or failed to write.
    pub failed: usize,
}

/// Run one sampling task per entity on a fixed-size pool, forwarding each
/// batch to `writer`. Weighted mode uses the [`InverseFrequencyScorer`].
///
/// A task failure is logged and counted; sibling tasks are unaffected.
pub fn generate_walks(
    index: &GraphIndex,
    entities: &EntitySet,
    mode: WalkMode,
    config: &WalkConfig,
    writer: &WalkWriter,
) -> Result<WalkStats, DispatchError> {
    generate_walks_scored(index, entities, mode, config, &InverseFrequencyScorer, writer)
}

/// Like [`generate_walks`], with a caller-supplied edge scorer for the
/// weighted mode. The scorer is ignored by the unweighted modes.
pub fn generate_walks_scored(
    index: &GraphIndex,
    entities: &EntitySet,
    mode: WalkMode,
    config: &WalkConfig,
    scorer: &dyn EdgeScorer,
    writer: &WalkWriter,
) -> Result<WalkStats, DispatchError> {
    let threads = config.effective_threads();
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(|err| DispatchError::ThreadPool {
            message: err.to_string(),
        })?;

    tracing::info!(
        threads,
        entities = entities.len(),
        %mode,
        depth = config.depth,
        walks_per_entity = config.walks_per_entity,
        "starting walk generation"
    );

    let walks_written = AtomicUsize::new(0);
    let failed = AtomicUsize::new(0);
    let targets: Vec<&str> = entities.iter().collect();

    pool.install(|| {
        targets.par_iter().for_each(|&entity| {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                let seed = shorten_uri(entity);
                let mut rng = task_rng(config.seed, entity);
                match mode {
                    WalkMode::RandomWalks => sampler::random_walks(
                        index,
                        &seed,
                        config.depth,
                        config.walks_per_entity,
                        &mut rng,
                    ),
                    WalkMode::RandomWalksDuplicateFree => sampler::duplicate_free_walks(
                        index,
                        &seed,
                        config.depth,
                        config.walks_per_entity,
                        &mut rng,
                    ),
                    WalkMode::MidWalks => sampler::mid_walks(
                        index,
                        &seed,
                        config.depth,
                        config.walks_per_entity,
                        &mut rng,
                    ),
                    WalkMode::MidWalksWeighted => sampler::weighted_mid_walks(
                        index,
                        &seed,
                        config.depth,
                        config.walks_per_entity,
                        scorer,
                        &mut rng,
                    ),
                }
            }));

            match outcome {
                Ok(walks) => match writer.write_batch(&walks) {
                    Ok(()) => {
                        walks_written.fetch_add(walks.len(), Ordering::Relaxed);
                    }
                    Err(err) => {
                        tracing::error!(entity, %err, "failed to write walk batch");
                        failed.fetch_add(1, Ordering::Relaxed);
                    }
                },
                Err(_) => {
                    tracing::error!(entity, "walk task panicked, skipping entity");
                    failed.fetch_add(1, Ordering::Relaxed);
                }
            }
        });
    });

    let stats = WalkStats {
        entities: targets.len(),
        walks: walks_written.into_inner(),
        failed: failed.into_inner(),
    };
    tracing::info!(
        entities = stats.entities,
        walks = stats.walks,
        failed = stats.failed,
        "walk generation finished"
    );
    Ok(stats)
}

/// A task-confined random source.
///
/// With a configured base seed the stream depends only on (seed, entity),
/// so runs are reproducible regardless of thread scheduling; without one,
/// each task seeds from entropy.
fn task_rng(seed: Option<u64>, entity: &str) -> StdRng {
    match seed {
        Some(base) => {
            let mut hasher = DefaultHasher::new();
            entity.hash(&mut hasher);
            StdRng::seed_from_u64(base ^ hasher.finish())
        }
        None => StdRng::from_entropy(),
    }
}
