//! Facade: build an index once, then generate walk corpora from it.
//!
//! External orchestrators (the CLI front end, dataset adapters) drive this
//! type: construct it from triple sources or a pre-built index, pick a
//! [`WalkMode`] and an [`EntitySet`], and point it at an output path.

use std::path::Path;

use crate::error::WalkGenResult;
use crate::graph::index::GraphIndex;
use crate::graph::parser::GraphIndexBuilder;
use crate::select::EntitySet;
use crate::walks::dispatch::{self, WalkStats};
use crate::walks::sampler::{EdgeScorer, InverseFrequencyScorer};
use crate::walks::writer::WalkWriter;
use crate::walks::{WalkConfig, WalkMode};

/// Walk-corpus generator over a frozen graph index.
#[derive(Debug)]
pub struct WalkGenerator {
    index: GraphIndex,
    config: WalkConfig,
}

impl WalkGenerator {
    /// Build the index from a single triple file (plain or gzipped).
    pub fn from_file(path: impl AsRef<Path>, config: WalkConfig) -> WalkGenResult<Self> {
        let mut builder = GraphIndexBuilder::new();
        builder.load_file(path)?;
        Ok(Self::from_index(builder.freeze(), config))
    }

    /// Build the index from every recognized triple file in a directory.
    pub fn from_dir(dir: impl AsRef<Path>, config: WalkConfig) -> WalkGenResult<Self> {
        let mut builder = GraphIndexBuilder::new();
        builder.load_dir(dir)?;
        Ok(Self::from_index(builder.freeze(), config))
    }

    /// Wrap a pre-built index (the seam for dataset adapters).
    pub fn from_index(index: GraphIndex, config: WalkConfig) -> Self {
        Self { index, config }
    }

    /// The frozen index.
    pub fn index(&self) -> &GraphIndex {
        &self.index
    }

    /// The active configuration.
    pub fn config(&self) -> &WalkConfig {
        &self.config
    }

    /// Generate walks for the given entities into `output`, one walk per
    /// line, gzip-compressed when the path ends in `.gz`. Weighted mode
    /// scores edges by inverse token frequency.
    ///
    /// The sink is opened before dispatch begins and closed after every
    /// task has finished.
    pub fn generate_walks(
        &self,
        mode: WalkMode,
        entities: &EntitySet,
        output: &Path,
    ) -> WalkGenResult<WalkStats> {
        self.generate_walks_with_scorer(mode, entities, &InverseFrequencyScorer, output)
    }

    /// Like [`Self::generate_walks`], with a caller-supplied edge scorer
    /// for the weighted mode.
    pub fn generate_walks_with_scorer(
        &self,
        mode: WalkMode,
        entities: &EntitySet,
        scorer: &dyn EdgeScorer,
        output: &Path,
    ) -> WalkGenResult<WalkStats> {
        let writer = WalkWriter::create(output)?;
        let stats = dispatch::generate_walks_scored(
            &self.index,
            entities,
            mode,
            &self.config,
            scorer,
            &writer,
        )?;
        writer.finish()?;
        tracing::info!(
            path = %output.display(),
            walks = stats.walks,
            "walk corpus written"
        );
        Ok(stats)
    }

    /// Generate walks for every subject in the graph.
    pub fn generate_walks_for_all(&self, mode: WalkMode, output: &Path) -> WalkGenResult<WalkStats> {
        let entities = EntitySet::all_subjects(&self.index);
        self.generate_walks(mode, &entities, output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_file_builds_usable_generator() {
        let dir = tempfile::TempDir::new().unwrap();
        let graph = dir.path().join("graph.nt");
        std::fs::write(
            &graph,
            "<http://example.org/A> <http://example.org/p> <http://example.org/B> .\n",
        )
        .unwrap();

        let generator = WalkGenerator::from_file(&graph, WalkConfig::default()).unwrap();
        assert_eq!(generator.index().subject_count(), 1);
    }

    #[test]
    fn missing_source_surfaces_index_error() {
        let result = WalkGenerator::from_file("/nonexistent/graph.nt", WalkConfig::default());
        assert!(result.is_err());
    }

    #[test]
    fn custom_scorer_steers_weighted_walks() {
        use crate::graph::Edge;
        use crate::graph::index::GraphIndex;
        use crate::graph::parser::GraphIndexBuilder;

        struct OnlyRare;
        impl EdgeScorer for OnlyRare {
            fn score(&self, index: &GraphIndex, edge: Edge) -> f64 {
                if index.resolve(edge.object) == "ex:Rare" {
                    1.0
                } else {
                    f64::MIN_POSITIVE
                }
            }
        }

        let mut builder = GraphIndexBuilder::new();
        builder.add_triple("ex:A", "ex:p", "ex:Rare");
        builder.add_triple("ex:A", "ex:p", "ex:Common");
        let config = WalkConfig {
            depth: 1,
            walks_per_entity: 200,
            threads: Some(1),
            seed: Some(0),
        };
        let generator = WalkGenerator::from_index(builder.freeze(), config);
        let entities: EntitySet = ["ex:A".to_owned()].into_iter().collect();

        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("walks.txt");
        let stats = generator
            .generate_walks_with_scorer(WalkMode::MidWalksWeighted, &entities, &OnlyRare, &path)
            .unwrap();
        assert_eq!(stats.walks, 200);

        let content = std::fs::read_to_string(&path).unwrap();
        let rare = content.lines().filter(|l| l.ends_with("ex:Rare")).count();
        assert!(rare >= 195, "expected nearly all walks through ex:Rare, got {rare}");
    }
}
