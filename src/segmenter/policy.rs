// WHY: dialogue/emphasis/indirect classification is a tuned heuristic with
// known edge cases; keeping it behind a trait lets rule sets be versioned and
// tested independently of the segmentation control flow

use crate::patterns::{PatternKind, PatternTable, PRIMARY_MARK, SECONDARY_MARK};
use crate::segmenter::QuotedSpan;

/// Emphasis spans are shorter than this many space-separated tokens
const EMPHASIS_MAX_TOKENS: usize = 4;

/// Classification rules applied to candidate quoted spans.
/// Deterministic by contract: ambiguity resolves through fixed tie-breaks,
/// never an error.
pub trait ClassificationPolicy: Send + Sync {
    /// Rule-set version identifier
    fn name(&self) -> &'static str;

    /// Whether a secondary-mark span is stylistic emphasis rather than speech
    fn is_emphasis(&self, block: &str, span: &QuotedSpan) -> bool;

    /// Whether a span is indirect (reported) speech subordinated to the
    /// surrounding clause. `has_following_span` is true when another candidate
    /// span starts at or after this span's end.
    fn is_indirect(&self, block: &str, span: &QuotedSpan, has_following_span: bool) -> bool;
}

/// Default rule set, tuned on Korean narrative prose
pub struct ReportingClausePolicy {
    table: &'static PatternTable,
}

impl ReportingClausePolicy {
    pub fn new(table: &'static PatternTable) -> Self {
        Self { table }
    }

    /// Span content without its delimiting marks
    fn inner<'a>(&self, block: &'a str, span: &QuotedSpan) -> &'a str {
        let text = &block[span.start..span.end];
        text.trim_matches([PRIMARY_MARK, SECONDARY_MARK])
    }
}

fn contains_sentence_end(text: &str) -> bool {
    text.chars().any(|c| ".!?".contains(c))
}

/// Whether `text`, ignoring trailing whitespace and quote marks, ends in
/// sentence-final punctuation
pub(crate) fn ends_terminated(text: &str) -> bool {
    let trimmed = text.trim_end().trim_end_matches([PRIMARY_MARK, SECONDARY_MARK]);
    trimmed.ends_with(['.', '!', '?'])
}

impl ClassificationPolicy for ReportingClausePolicy {
    fn name(&self) -> &'static str {
        "reporting-clause-v1"
    }

    fn is_emphasis(&self, block: &str, span: &QuotedSpan) -> bool {
        let inner = self.inner(block, span);

        // Any one failing condition reclassifies the span as dialogue
        let short = inner.split_whitespace().count() < EMPHASIS_MAX_TOKENS;
        let unpunctuated = !contains_sentence_end(inner);
        let mid_sentence = !ends_terminated(&block[..span.start]);

        short && unpunctuated && mid_sentence
    }

    fn is_indirect(&self, block: &str, span: &QuotedSpan, has_following_span: bool) -> bool {
        let rest = &block[span.end..];

        // Reporting morpheme directly after the closing mark: 라고/하고/며/...
        if self.table.matches_start(PatternKind::IndirectContext, rest) {
            return true;
        }

        // A single terminated word right after the span is a reporting verb
        // (e.g. `"가자" 했다.`); a following quote mark starts a span, not a word
        if let Some(word) = rest.split_whitespace().next() {
            if !word.starts_with([PRIMARY_MARK, SECONDARY_MARK]) && ends_terminated(word) {
                return true;
            }
        }

        // No internal sentence end and nothing quoted follows: the span is
        // grammatically attached to its surrounding prose
        let inner = self.inner(block, span);
        !contains_sentence_end(inner) && !has_following_span
    }
}
