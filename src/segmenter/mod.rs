// WHY: one facade runs normalize -> balance -> extract so downstream corpus
// construction only ever sees well-formed sentence/utterance units

use anyhow::Result;
use tracing::{debug, info};

pub mod extractor;
pub mod policy;

pub use extractor::SpanExtractor;
pub use policy::{ClassificationPolicy, ReportingClausePolicy};

use crate::balancer::QuoteBalancer;
use crate::config::SegmenterConfig;
use crate::normalizer::{drop_empty, MarkNormalizer};

/// Classification of a quoted range within a balanced block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanKind {
    /// Retained as a discrete spoken utterance
    Dialogue,
    /// Stylistic stress, not speech
    Emphasis,
    /// Reported speech absorbed into the surrounding prose
    Indirect,
    /// Free text between quoted ranges
    Plain,
}

/// A byte range within a text block, tagged with its classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotedSpan {
    pub start: usize,
    pub end: usize,
    pub kind: SpanKind,
}

/// Full segmentation pipeline over a document's fragment sequence
pub struct SentenceSegmenter {
    normalizer: MarkNormalizer,
    balancer: QuoteBalancer,
    extractor: SpanExtractor,
}

impl SentenceSegmenter {
    /// Build the pipeline, rejecting malformed configuration
    pub fn new(config: SegmenterConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            normalizer: MarkNormalizer::new(config.normalizer)?,
            balancer: QuoteBalancer::new(&config.balancer)?,
            extractor: SpanExtractor::new()?,
        })
    }

    pub fn with_defaults() -> Result<Self> {
        Self::new(SegmenterConfig::default())
    }

    /// Segment one document given as an ordered sequence of raw fragments
    /// (paragraph lines). Returns the ordered sequence of non-empty
    /// sentence/utterance strings.
    pub fn segment_document(&self, fragments: &[String]) -> Vec<String> {
        debug!(fragments = fragments.len(), "starting segmentation pipeline");

        let normalized = drop_empty(
            fragments
                .iter()
                .map(|fragment| self.normalizer.normalize(fragment))
                .collect(),
        );
        let balanced = self.balancer.balance(normalized);

        let mut sentences = Vec::new();
        for block in &balanced {
            sentences.extend(self.extractor.segment(block));
        }

        info!(
            fragments = fragments.len(),
            blocks = balanced.len(),
            sentences = sentences.len(),
            "segmentation pipeline finished"
        );
        sentences
    }

    /// Segment a single pre-joined text block (already one balanced unit)
    pub fn segment_block(&self, block: &str) -> Vec<String> {
        let normalized = self.normalizer.normalize(block);
        let balanced = self.balancer.balance(vec![normalized]);
        balanced
            .iter()
            .flat_map(|fragment| self.extractor.segment(fragment))
            .collect()
    }

    pub fn normalizer(&self) -> &MarkNormalizer {
        &self.normalizer
    }

    pub fn balancer(&self) -> &QuoteBalancer {
        &self.balancer
    }

    pub fn extractor(&self) -> &SpanExtractor {
        &self.extractor
    }
}
