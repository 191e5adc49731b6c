// WHY: span classification and sentence splitting share one scan so that a
// boundary can never be introduced inside a quoted range by a later pass

use anyhow::Result;
use regex_automata::Input;
use tracing::debug;

use crate::patterns::{PatternKind, PatternTable, PRIMARY_MARK, SECONDARY_MARK};
use crate::segmenter::policy::{ends_terminated, ClassificationPolicy, ReportingClausePolicy};
use crate::segmenter::{QuotedSpan, SpanKind};

/// Locates quoted spans in a balanced block, classifies them, and partitions
/// the block into sentence/utterance units.
pub struct SpanExtractor {
    table: &'static PatternTable,
    policy: Box<dyn ClassificationPolicy>,
}

impl SpanExtractor {
    pub fn new() -> Result<Self> {
        let table = PatternTable::global()?;
        Ok(Self {
            table,
            policy: Box::new(ReportingClausePolicy::new(table)),
        })
    }

    /// Swap in a different classification rule set
    pub fn with_policy(policy: Box<dyn ClassificationPolicy>) -> Result<Self> {
        let table = PatternTable::global()?;
        Ok(Self { table, policy })
    }

    pub fn policy_name(&self) -> &'static str {
        self.policy.name()
    }

    /// Steps A and B: locate all quoted spans and classify each as dialogue,
    /// emphasis, or indirect quotation. The returned set is sorted by start
    /// and non-overlapping.
    pub fn classify_spans(&self, block: &str) -> Vec<QuotedSpan> {
        let primary: Vec<(usize, usize)> = self
            .table
            .get(PatternKind::PrimarySpan)
            .find_iter(Input::new(block))
            .map(|m| (m.start(), m.end()))
            .collect();

        let mut spans: Vec<QuotedSpan> = primary
            .iter()
            .map(|&(start, end)| QuotedSpan {
                start,
                end,
                kind: SpanKind::Dialogue,
            })
            .collect();

        for mat in self
            .table
            .get(PatternKind::SecondarySpan)
            .find_iter(Input::new(block))
        {
            // Primary marks are the stronger delimiter: a secondary span that
            // touches a primary span at all (nested or partial) is dropped
            let overlaps = primary
                .iter()
                .any(|&(start, end)| mat.start() < end && start < mat.end());
            if overlaps {
                continue;
            }

            let span = QuotedSpan {
                start: mat.start(),
                end: mat.end(),
                kind: SpanKind::Dialogue,
            };
            let kind = if self.policy.is_emphasis(block, &span) {
                SpanKind::Emphasis
            } else {
                SpanKind::Dialogue
            };
            spans.push(QuotedSpan { kind, ..span });
        }

        spans.sort_by_key(|span| span.start);

        // Step B over the pre-classification span set: whether quoted material
        // follows is judged against spans as found, not as reclassified
        let followers: Vec<bool> = spans
            .iter()
            .map(|span| {
                spans
                    .iter()
                    .any(|other| other.kind != SpanKind::Emphasis && other.start >= span.end)
            })
            .collect();

        for (span, has_following) in spans.iter_mut().zip(followers) {
            if span.kind == SpanKind::Dialogue
                && self.policy.is_indirect(block, span, has_following)
            {
                span.kind = SpanKind::Indirect;
            }
        }

        debug!(total = spans.len(), "classified quoted spans");
        spans
    }

    /// Steps C and D: partition the block into sentences, keeping every
    /// retained dialogue span as a single unsplit unit.
    pub fn segment(&self, block: &str) -> Vec<String> {
        let spans = self.classify_spans(block);
        let indirect: Vec<(usize, usize)> = spans
            .iter()
            .filter(|span| span.kind == SpanKind::Indirect)
            .map(|span| (span.start, span.end))
            .collect();

        // Step C: alternate plain runs and dialogue span tokens
        let mut tokens = Vec::new();
        let mut cursor = 0;
        for span in spans.iter().filter(|span| span.kind == SpanKind::Dialogue) {
            self.split_plain(block, cursor, span.start, &indirect, &mut tokens);
            tokens.push(block[span.start..span.end].to_string());
            cursor = span.end;
        }
        self.split_plain(block, cursor, block.len(), &indirect, &mut tokens);

        let merged = self.merge_attribution(tokens);
        let merged = self.merge_indirect_continuation(merged);

        debug!(sentences = merged.len(), "segmented block");
        merged
    }

    /// Split one plain-text run at sentence-final punctuation. A split is
    /// suppressed inside an indirect span range, before a hyphen (list
    /// markers), and mid-run of consecutive end punctuation.
    fn split_plain(
        &self,
        block: &str,
        from: usize,
        to: usize,
        indirect: &[(usize, usize)],
        tokens: &mut Vec<String>,
    ) {
        let text = &block[from..to];
        let mut piece_start = 0;

        for mat in self
            .table
            .get(PatternKind::SentenceEnd)
            .find_iter(Input::new(text))
        {
            let rel_end = mat.end();
            let abs_end = from + rel_end;
            let rest = &text[rel_end..];

            if indirect
                .iter()
                .any(|&(start, end)| abs_end > start && abs_end < end)
            {
                continue;
            }
            if rest.starts_with(['.', '!', '?']) || rest.starts_with('-') {
                continue;
            }

            let piece = text[piece_start..rel_end].trim();
            if !piece.is_empty() {
                tokens.push(piece.to_string());
            }
            piece_start = rel_end;
        }

        let tail = text[piece_start..].trim();
        if !tail.is_empty() {
            tokens.push(tail.to_string());
        }
    }

    /// First merge pass: reattach a dialogue-attribution clause that was
    /// split from its quoted material. Two tokens merge when exactly one side
    /// of the junction carries a quote mark and the first token is not a
    /// terminated sentence.
    fn merge_attribution(&self, tokens: Vec<String>) -> Vec<String> {
        let mut merged: Vec<String> = Vec::with_capacity(tokens.len());

        for token in tokens {
            if let Some(prev) = merged.last() {
                let prev_closes_quote = prev.ends_with([PRIMARY_MARK, SECONDARY_MARK]);
                let token_opens_quote = token.starts_with([PRIMARY_MARK, SECONDARY_MARK]);

                if (prev_closes_quote != token_opens_quote) && !ends_terminated(prev) {
                    let mut joined = merged.pop().unwrap_or_default();
                    joined.push(' ');
                    joined.push_str(&token);
                    merged.push(joined);
                    continue;
                }
            }
            merged.push(token);
        }

        merged
    }

    /// Second merge pass: a trailing reporting-clause continuation
    /// (e.g. `라고 말했다.`) reattaches onto the quoted unit before it.
    fn merge_indirect_continuation(&self, tokens: Vec<String>) -> Vec<String> {
        let mut merged: Vec<String> = Vec::with_capacity(tokens.len());

        for token in tokens {
            if let Some(prev) = merged.last() {
                if prev.ends_with([PRIMARY_MARK, SECONDARY_MARK])
                    && self.table.matches_start(PatternKind::IndirectContext, &token)
                {
                    let mut joined = merged.pop().unwrap_or_default();
                    joined.push(' ');
                    joined.push_str(&token);
                    merged.push(joined);
                    continue;
                }
            }
            merged.push(token);
        }

        merged
    }
}
