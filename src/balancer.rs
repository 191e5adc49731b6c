// WHY: paragraph splitting upstream routinely severs a quotation from its
// closing mark; repairing parity here means the extractor can assume every
// block it sees has matched delimiters

use anyhow::Result;
use tracing::debug;

use crate::config::BalancerConfig;
use crate::normalizer::{collapse_spaces, drop_empty};
use crate::patterns::{ELLIPSIS_MARK, PRIMARY_MARK, SECONDARY_MARK};

/// Repairs fragments with unbalanced quote marks by bounded forward merging,
/// falling back to forced insertion or removal of a mark. Best-effort: the
/// output is guaranteed even-parity, not semantically verified dialogue.
pub struct QuoteBalancer {
    up_to: usize,
}

fn mark_count(text: &str, mark: char) -> usize {
    text.chars().filter(|&c| c == mark).count()
}

fn is_odd(text: &str, mark: char) -> bool {
    mark_count(text, mark) % 2 == 1
}

impl QuoteBalancer {
    pub fn new(config: &BalancerConfig) -> Result<Self> {
        if config.up_to == 0 {
            anyhow::bail!("quote-merge lookahead (up_to) must be >= 1, got 0");
        }
        Ok(Self { up_to: config.up_to })
    }

    pub fn with_defaults() -> Result<Self> {
        Self::new(&BalancerConfig::default())
    }

    /// Balance both mark kinds across the fragment sequence.
    /// Every emitted fragment has an even count of each mark.
    pub fn balance(&self, fragments: Vec<String>) -> Vec<String> {
        let after_primary = self.merge_pass(fragments, PRIMARY_MARK, SECONDARY_MARK);
        let after_secondary = self.merge_pass(after_primary, SECONDARY_MARK, PRIMARY_MARK);

        let corrected: Vec<String> = after_secondary
            .into_iter()
            .map(|fragment| self.force_balance(fragment))
            .collect();

        drop_empty(corrected)
    }

    /// Forward-merge fragments whose count of `mark` is odd, absorbing at most
    /// `up_to` successors. Builds a fresh sequence instead of blanking
    /// absorbed entries in place.
    fn merge_pass(&self, fragments: Vec<String>, mark: char, other: char) -> Vec<String> {
        let mut output = Vec::with_capacity(fragments.len());
        let mut index = 0;

        while index < fragments.len() {
            let fragment = &fragments[index];
            if !is_odd(fragment, mark) {
                output.push(fragment.clone());
                index += 1;
                continue;
            }

            let mut merged = fragment.clone();
            let mut next = index + 1;
            let mut resolved = false;

            while next < fragments.len() && next - index <= self.up_to {
                let absorbed = &fragments[next];
                merged.push(' ');
                merged.push_str(absorbed);
                next += 1;

                if !is_odd(&merged, mark) {
                    resolved = true;
                    break;
                }
                if is_odd(absorbed, other) {
                    // Cross-mark imbalance: the passage switches mark kinds
                    // midstream, so fold everything to the primary mark
                    merged = merged.replace(SECONDARY_MARK, &PRIMARY_MARK.to_string());
                    resolved = true;
                    break;
                }
            }

            if resolved {
                debug!(
                    absorbed = next - index - 1,
                    mark = %mark,
                    "merged fragments to close quotation"
                );
                output.push(merged);
                index = next;
            } else {
                // Lookahead exhausted; leave the fragment for forced correction
                output.push(fragment.clone());
                index += 1;
            }
        }

        output
    }

    /// Repair any parity still left after merging. Always yields even counts.
    fn force_balance(&self, fragment: String) -> String {
        let fragment = self.force_mark(fragment, PRIMARY_MARK);
        self.force_mark(fragment, SECONDARY_MARK)
    }

    fn force_mark(&self, fragment: String, mark: char) -> String {
        if !is_odd(&fragment, mark) {
            return fragment;
        }

        // A lone token is almost always an unterminated utterance
        if !fragment.trim().contains(' ') {
            let mut closed = fragment;
            closed.push(mark);
            return closed;
        }

        // An ellipsis after the mark usually marks where the speech trails off
        if let (Some(mark_at), Some(ellipsis_at)) =
            (fragment.find(mark), fragment.find(ELLIPSIS_MARK))
        {
            if mark_at < ellipsis_at {
                let close_at = ellipsis_at + ELLIPSIS_MARK.len_utf8();
                let mut closed = String::with_capacity(fragment.len() + mark.len_utf8());
                closed.push_str(&fragment[..close_at]);
                closed.push(mark);
                closed.push_str(&fragment[close_at..]);
                return closed;
            }
        }

        // Not recoverable as dialogue; treat the marks as noise
        debug!(mark = %mark, "stripping unpaired quote marks from fragment");
        let stripped: String = fragment.chars().filter(|&c| c != mark).collect();
        collapse_spaces(&stripped)
    }
}
