// WHY: canonicalizing visually distinct glyph variants up front lets the
// balancer and extractor match on exactly one primary and one secondary mark

use anyhow::Result;

use crate::config::{NormalizerConfig, ScriptExtent};
use crate::patterns::{replace_all, PatternKind, PatternTable};

/// Folds Unicode mark variants to canonical glyphs, strips inline markup and
/// foreign-script spans under the configured policy. Pure: unrecognized glyphs
/// pass through unchanged, and re-normalizing output is a no-op.
pub struct MarkNormalizer {
    config: NormalizerConfig,
    table: &'static PatternTable,
}

impl MarkNormalizer {
    pub fn new(config: NormalizerConfig) -> Result<Self> {
        let table = PatternTable::global()?;
        Ok(Self { config, table })
    }

    pub fn with_defaults() -> Result<Self> {
        Self::new(NormalizerConfig::default())
    }

    /// Canonicalize one block of raw text
    pub fn normalize(&self, text: &str) -> String {
        // Markup and break artifacts go first so the mark folding below never
        // sees entity-encoded glyphs
        let mut out = replace_all(self.table, PatternKind::SoftBreak, text, "");
        out = replace_all(self.table, PatternKind::MarkupTag, &out, "");
        out = replace_all(self.table, PatternKind::WideSpace, &out, " ");

        if self.config.unify_quotation {
            out = replace_all(self.table, PatternKind::Quotation, &out, "\"");
        }
        if self.config.unify_apostrophe {
            out = replace_all(self.table, PatternKind::Apostrophe, &out, "'");
        }
        if self.config.unify_hyphen {
            out = replace_all(self.table, PatternKind::Hyphen, &out, "-");
        }
        if self.config.unify_ellipsis {
            out = replace_all(self.table, PatternKind::Ellipsis, &out, "…");
        }
        if self.config.unify_middle_dot {
            out = replace_all(self.table, PatternKind::MiddleDot, &out, "ㆍ");
        }

        out = self.strip_script(
            out,
            self.config.chinese,
            PatternKind::Chinese,
            PatternKind::ChineseBracket,
        );
        out = self.strip_script(
            out,
            self.config.old_korean,
            PatternKind::OldKorean,
            PatternKind::OldKoreanBracket,
        );
        out = self.strip_script(
            out,
            self.config.roman_numeral,
            PatternKind::RomanNumeral,
            PatternKind::RomanNumeralBracket,
        );

        collapse_spaces(&out)
    }

    fn strip_script(
        &self,
        text: String,
        extent: ScriptExtent,
        all_kind: PatternKind,
        bracket_kind: PatternKind,
    ) -> String {
        match extent {
            ScriptExtent::None => text,
            ScriptExtent::Bracket => replace_all(self.table, bracket_kind, &text, ""),
            ScriptExtent::All => {
                // Stripping bare runs can leave behind `()` / `[]` shells
                let stripped = replace_all(self.table, all_kind, &text, "");
                replace_all(self.table, PatternKind::EmptyBracket, &stripped, "")
            }
        }
    }
}

/// Collapse whitespace runs (including line breaks) into single spaces and
/// trim the ends
pub fn collapse_spaces(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut prev_was_space = false;

    for ch in text.chars() {
        if ch.is_whitespace() {
            if !prev_was_space {
                result.push(' ');
                prev_was_space = true;
            }
        } else {
            result.push(ch);
            prev_was_space = false;
        }
    }

    let trimmed = result.trim();
    if trimmed.len() != result.len() {
        trimmed.to_string()
    } else {
        result
    }
}

/// Drop entries that are empty after trimming, trimming the survivors
pub fn drop_empty(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::OnceLock;

    static SHARED_NORMALIZER: OnceLock<MarkNormalizer> = OnceLock::new();

    fn get_normalizer() -> &'static MarkNormalizer {
        SHARED_NORMALIZER.get_or_init(|| MarkNormalizer::with_defaults().unwrap())
    }

    #[test]
    fn test_quotation_variants_fold_to_primary() {
        let normalizer = get_normalizer();
        assert_eq!(normalizer.normalize("“나 먼저 갈게”"), "\"나 먼저 갈게\"");
        assert_eq!(normalizer.normalize("‘귀여운’ 강아지"), "'귀여운' 강아지");
    }

    #[test]
    fn test_hyphen_and_ellipsis_variants() {
        let normalizer = get_normalizer();
        assert_eq!(normalizer.normalize("그는ㅡ갔다"), "그는-갔다");
        assert_eq!(normalizer.normalize("글쎄...."), "글쎄…");
        assert_eq!(normalizer.normalize("글쎄‥"), "글쎄…");
    }

    #[test]
    fn test_markup_and_space_artifacts_removed() {
        let normalizer = get_normalizer();
        assert_eq!(normalizer.normalize("단어<sub>주석</sub>"), "단어주석");
        assert_eq!(normalizer.normalize("가\u{3000}나\u{a0}다"), "가 나 다");
        assert_eq!(normalizer.normalize("가\u{200b}나"), "가나");
    }

    #[test]
    fn test_bracket_extent_strips_only_enclosed_runs() {
        let normalizer = get_normalizer();
        // Default extent is Bracket: bare runs survive, bracketed ones go
        assert_eq!(normalizer.normalize("한자(漢字) 공부"), "한자 공부");
        assert_eq!(normalizer.normalize("한자 漢字 공부"), "한자 漢字 공부");
    }

    #[test]
    fn test_all_extent_sweeps_empty_brackets() {
        let mut config = NormalizerConfig::default();
        config.chinese = ScriptExtent::All;
        let normalizer = MarkNormalizer::new(config).unwrap();
        assert_eq!(normalizer.normalize("한자(漢字) 공부"), "한자 공부");
        assert_eq!(normalizer.normalize("한자 漢字 공부"), "한자 공부");
    }

    #[test]
    fn test_none_extent_keeps_script() {
        let mut config = NormalizerConfig::default();
        config.chinese = ScriptExtent::None;
        let normalizer = MarkNormalizer::new(config).unwrap();
        assert_eq!(normalizer.normalize("한자(漢字) 공부"), "한자(漢字) 공부");
    }

    #[test]
    fn test_unification_flags_disable_folding() {
        let mut config = NormalizerConfig::default();
        config.unify_quotation = false;
        let normalizer = MarkNormalizer::new(config).unwrap();
        assert_eq!(normalizer.normalize("“그대로”"), "“그대로”");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let normalizer = get_normalizer();
        let inputs = [
            "그는 “나 먼저 갈게‥”라고 했다",
            "한자(漢字)와 ‘강조’와ㅡ대시",
            "로마 숫자 (Ⅳ) 표기",
            "깨끗한 평문은 그대로",
        ];
        for input in inputs {
            let once = normalizer.normalize(input);
            let twice = normalizer.normalize(&once);
            assert_eq!(once, twice, "normalize must be a no-op on its own output");
        }
    }

    #[test]
    fn test_unrecognized_glyphs_pass_through() {
        let normalizer = get_normalizer();
        assert_eq!(normalizer.normalize("★중요★"), "★중요★");
    }

    #[test]
    fn test_collapse_spaces() {
        assert_eq!(collapse_spaces("  가   나\t다  "), "가 나 다");
        assert_eq!(collapse_spaces(""), "");
    }

    #[test]
    fn test_drop_empty() {
        let items = vec!["  가 ".to_string(), "   ".to_string(), "나".to_string()];
        assert_eq!(drop_empty(items), vec!["가".to_string(), "나".to_string()]);
    }
}
