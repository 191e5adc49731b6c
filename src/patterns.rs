// WHY: Statically enumerated pattern table replacing ad-hoc string-keyed dispatch
// Every compiled regex the pipeline uses is named here and built exactly once

use anyhow::Result;
use regex_automata::{meta::Regex, Anchored, Input};
use std::collections::HashMap;
use std::sync::OnceLock;

/// Canonical primary quote mark (double-mark dialogue delimiter)
pub const PRIMARY_MARK: char = '"';
/// Canonical secondary quote mark (single-mark, dialogue or emphasis)
pub const SECONDARY_MARK: char = '\'';
/// Canonical ellipsis glyph all variants fold into
pub const ELLIPSIS_MARK: char = '…';

/// Names for every compiled pattern in the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternKind {
    /// Quotation glyph variants that fold to the primary mark
    Quotation,
    /// Apostrophe glyph variants that fold to the secondary mark
    Apostrophe,
    /// Hyphen and dash variants
    Hyphen,
    /// Ellipsis variants (three-plus ASCII dots and Unicode forms)
    Ellipsis,
    /// Katakana middle dot folded to the Korean middle dot
    MiddleDot,
    /// Inline markup tags and HTML entity artifacts
    MarkupTag,
    /// Ideographic space and non-breaking space artifacts
    WideSpace,
    /// Zero-width and soft-break artifacts removed outright
    SoftBreak,
    /// Chinese character runs
    Chinese,
    /// Chinese runs enclosed in brackets
    ChineseBracket,
    /// Archaic Korean jamo and private-use runs
    OldKorean,
    /// Archaic Korean runs enclosed in brackets
    OldKoreanBracket,
    /// Roman numeral runs
    RomanNumeral,
    /// Roman numeral runs enclosed in brackets
    RomanNumeralBracket,
    /// Bracket pairs left empty after script stripping
    EmptyBracket,
    /// Sentence-final punctuation
    SentenceEnd,
    /// Korean quotation-introducing morphemes (reporting right-context)
    IndirectContext,
    /// Maximal non-nested primary-mark span
    PrimarySpan,
    /// Maximal non-nested secondary-mark span
    SecondarySpan,
}

/// All pattern kinds, used to verify the table is fully populated
const ALL_KINDS: &[PatternKind] = &[
    PatternKind::Quotation,
    PatternKind::Apostrophe,
    PatternKind::Hyphen,
    PatternKind::Ellipsis,
    PatternKind::MiddleDot,
    PatternKind::MarkupTag,
    PatternKind::WideSpace,
    PatternKind::SoftBreak,
    PatternKind::Chinese,
    PatternKind::ChineseBracket,
    PatternKind::OldKorean,
    PatternKind::OldKoreanBracket,
    PatternKind::RomanNumeral,
    PatternKind::RomanNumeralBracket,
    PatternKind::EmptyBracket,
    PatternKind::SentenceEnd,
    PatternKind::IndirectContext,
    PatternKind::PrimarySpan,
    PatternKind::SecondarySpan,
];

/// Immutable table mapping pattern names to compiled patterns
pub struct PatternTable {
    patterns: HashMap<PatternKind, Regex>,
}

static TABLE: OnceLock<PatternTable> = OnceLock::new();

impl PatternTable {
    /// Process-wide table, compiled on first access
    pub fn global() -> Result<&'static PatternTable> {
        match TABLE.get() {
            Some(table) => Ok(table),
            None => {
                let table = Self::compile()?;
                Ok(TABLE.get_or_init(|| table))
            }
        }
    }

    fn compile() -> Result<Self> {
        // Compositional pattern components
        let chinese_class = concat!(
            "[\\u{31c0}-\\u{31ef}\\u{31f0}-\\u{31ff}\\u{3200}-\\u{32ff}",
            "\\u{3300}-\\u{33ff}\\u{3400}-\\u{4dbf}\\u{4dc0}-\\u{4dff}",
            "\\u{4e00}-\\u{9fff}\\u{f900}-\\u{faff}]"
        );
        let old_korean_class = concat!(
            "[\\u{3164}-\\u{318c}\\u{318e}-\\u{318f}\\u{a960}-\\u{a97f}",
            "\\u{d7b0}-\\u{d7ff}\\u{e000}-\\u{efff}\\u{f000}-\\u{fffd}",
            "\\u{1113}-\\u{115f}\\u{1176}-\\u{11a7}\\u{11c3}-\\u{11ff}]"
        );
        let roman_numeral_class = "[\\u{2160}-\\u{217f}]";

        let bracket_open = "[\\[(〔<〈《「『{]";
        let bracket_close = "[\\])〕>〉》」』}]";
        let bracketed = |class: &str| format!("{bracket_open}{class}+{bracket_close}");

        // Reporting endings that subordinate a quoted span to the surrounding
        // clause: -(이)라고/-하고/-며/-면서, -라/-란, 하는/하니/하였, 한다/한 뒤, 할
        let indirect_context =
            " ?(?:(?:이?라|하)?(?:고|며|면서)|[라란] |하[는니였]|[한하](?:다| ?뒤)|할 )";

        let mut patterns = HashMap::new();
        patterns.insert(PatternKind::Quotation, Regex::new("[“”«»„]")?);
        patterns.insert(PatternKind::Apostrophe, Regex::new("[‘’‹›‚]")?);
        patterns.insert(PatternKind::Hyphen, Regex::new("[─ㅡ⎯―–—]")?);
        patterns.insert(PatternKind::Ellipsis, Regex::new("\\.\\.\\.+|‥+|⋯")?);
        patterns.insert(PatternKind::MiddleDot, Regex::new("[・]")?);
        patterns.insert(
            PatternKind::MarkupTag,
            Regex::new("</?(?:FL|sub|p)>|<(?:DR|br) ?/?>|<img[^>]*>|&(?:[lg]t|amp|nbsp);")?,
        );
        patterns.insert(PatternKind::WideSpace, Regex::new("[\\u{3000}\\u{a0}]")?);
        patterns.insert(
            PatternKind::SoftBreak,
            Regex::new("[\\u{200b}\\u{feff}\\u{ad}]")?,
        );
        patterns.insert(PatternKind::Chinese, Regex::new(&format!("{chinese_class}+"))?);
        patterns.insert(PatternKind::ChineseBracket, Regex::new(&bracketed(chinese_class))?);
        patterns.insert(
            PatternKind::OldKorean,
            Regex::new(&format!("{old_korean_class}+"))?,
        );
        patterns.insert(
            PatternKind::OldKoreanBracket,
            Regex::new(&bracketed(old_korean_class))?,
        );
        patterns.insert(
            PatternKind::RomanNumeral,
            Regex::new(&format!("{roman_numeral_class}+"))?,
        );
        patterns.insert(
            PatternKind::RomanNumeralBracket,
            Regex::new(&bracketed(roman_numeral_class))?,
        );
        patterns.insert(
            PatternKind::EmptyBracket,
            Regex::new(&format!("{bracket_open} *{bracket_close}"))?,
        );
        patterns.insert(PatternKind::SentenceEnd, Regex::new("[.!?]")?);
        patterns.insert(PatternKind::IndirectContext, Regex::new(indirect_context)?);
        patterns.insert(PatternKind::PrimarySpan, Regex::new("\"[^\"]+\"")?);
        patterns.insert(PatternKind::SecondarySpan, Regex::new("'[^']+'")?);

        debug_assert!(ALL_KINDS.iter().all(|k| patterns.contains_key(k)));

        Ok(PatternTable { patterns })
    }

    /// Look up a compiled pattern by name
    pub fn get(&self, kind: PatternKind) -> &Regex {
        // The table is populated for every PatternKind at compile()
        &self.patterns[&kind]
    }

    /// Whether `kind` matches anchored at the start of `text`
    pub fn matches_start(&self, kind: PatternKind, text: &str) -> bool {
        let input = Input::new(text).anchored(Anchored::Yes);
        self.get(kind).find(input).is_some()
    }
}

/// Replace every match of `kind` in `text` with `replacement`
pub fn replace_all(table: &PatternTable, kind: PatternKind, text: &str, replacement: &str) -> String {
    let re = table.get(kind);
    let mut result = String::with_capacity(text.len());
    let mut last = 0;
    for mat in re.find_iter(Input::new(text)) {
        result.push_str(&text[last..mat.start()]);
        result.push_str(replacement);
        last = mat.end();
    }
    if last == 0 {
        return text.to_string();
    }
    result.push_str(&text[last..]);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> &'static PatternTable {
        PatternTable::global().unwrap()
    }

    #[test]
    fn test_table_compiles_every_kind() {
        let table = table();
        for kind in ALL_KINDS {
            // get() panics on a missing entry
            let _ = table.get(*kind);
        }
    }

    #[test]
    fn test_ellipsis_variants() {
        let table = table();
        for variant in ["....", "...", "‥", "⋯"] {
            assert!(
                table.get(PatternKind::Ellipsis).is_match(variant),
                "should match ellipsis variant {variant:?}"
            );
        }
        // The canonical glyph is not a variant; folding must be idempotent
        assert!(!table.get(PatternKind::Ellipsis).is_match("…"));
    }

    #[test]
    fn test_indirect_context_morphemes() {
        let table = table();
        for context in ["라고 말했다", " 하고 물었다", "며 웃었다", "면서", "하는", "한 뒤", "란 "] {
            assert!(
                table.matches_start(PatternKind::IndirectContext, context),
                "should match reporting context {context:?}"
            );
        }
        assert!(!table.matches_start(PatternKind::IndirectContext, "그는 떠났다"));
    }

    #[test]
    fn test_span_patterns_are_non_nested() {
        let table = table();
        let text = "가 \"나 다\" 라 \"마\" 바";
        let spans: Vec<_> = table
            .get(PatternKind::PrimarySpan)
            .find_iter(Input::new(text))
            .map(|m| &text[m.range()])
            .collect();
        assert_eq!(spans, vec!["\"나 다\"", "\"마\""]);
    }

    #[test]
    fn test_replace_all_folds_variants() {
        let table = table();
        assert_eq!(replace_all(table, PatternKind::Quotation, "“가”", "\""), "\"가\"");
        assert_eq!(replace_all(table, PatternKind::Hyphen, "하나—둘", "-"), "하나-둘");
        // No-match input passes through untouched
        assert_eq!(replace_all(table, PatternKind::Quotation, "그대로", "\""), "그대로");
    }

    #[test]
    fn test_chinese_class_matches_bracketed_run() {
        let table = table();
        assert!(table.get(PatternKind::Chinese).is_match("漢字"));
        assert!(table.get(PatternKind::ChineseBracket).is_match("(漢字)"));
        assert!(!table.get(PatternKind::ChineseBracket).is_match("한글"));
    }
}
