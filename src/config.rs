use anyhow::Result;
use serde::{Deserialize, Serialize};

/// How aggressively a foreign/archaic script class is stripped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptExtent {
    /// Strip every occurrence, then sweep bracket pairs left empty
    All,
    /// Strip only runs enclosed in brackets
    Bracket,
    /// Leave the script untouched
    None,
}

/// Configuration for the mark normalizer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizerConfig {
    /// Fold quotation glyph variants to the canonical primary mark
    pub unify_quotation: bool,
    /// Fold apostrophe glyph variants to the canonical secondary mark
    pub unify_apostrophe: bool,
    /// Fold dash/hyphen variants to the canonical hyphen
    pub unify_hyphen: bool,
    /// Fold ellipsis variants to the canonical ellipsis glyph
    pub unify_ellipsis: bool,
    /// Fold middle-dot variants to the Korean middle dot
    pub unify_middle_dot: bool,
    /// Stripping policy for Chinese character runs
    pub chinese: ScriptExtent,
    /// Stripping policy for archaic Korean jamo runs
    pub old_korean: ScriptExtent,
    /// Stripping policy for Roman numeral runs
    pub roman_numeral: ScriptExtent,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            unify_quotation: true,
            unify_apostrophe: true,
            unify_hyphen: true,
            unify_ellipsis: true,
            unify_middle_dot: true,
            chinese: ScriptExtent::Bracket,
            old_korean: ScriptExtent::Bracket,
            roman_numeral: ScriptExtent::Bracket,
        }
    }
}

/// Configuration for the quotation balancer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalancerConfig {
    /// Maximum number of subsequent fragments absorbed while searching for a
    /// closing mark
    pub up_to: usize,
}

impl Default for BalancerConfig {
    fn default() -> Self {
        Self { up_to: 20 }
    }
}

/// Full pipeline configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SegmenterConfig {
    #[serde(default)]
    pub normalizer: NormalizerConfig,
    #[serde(default)]
    pub balancer: BalancerConfig,
}

impl SegmenterConfig {
    /// Reject malformed configuration at construction time
    pub fn validate(&self) -> Result<()> {
        if self.balancer.up_to == 0 {
            anyhow::bail!("balancer.up_to must be >= 1, got 0");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SegmenterConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.balancer.up_to, 20);
        assert!(config.normalizer.unify_quotation);
        assert_eq!(config.normalizer.chinese, ScriptExtent::Bracket);
    }

    #[test]
    fn test_zero_lookahead_rejected() {
        let mut config = SegmenterConfig::default();
        config.balancer.up_to = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_round_trips_through_json() {
        let config = SegmenterConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: SegmenterConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.balancer.up_to, config.balancer.up_to);
        assert_eq!(parsed.normalizer.old_korean, config.normalizer.old_korean);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let parsed: SegmenterConfig =
            serde_json::from_str(r#"{"balancer": {"up_to": 5}}"#).unwrap();
        assert_eq!(parsed.balancer.up_to, 5);
        assert!(parsed.normalizer.unify_ellipsis);
    }

    #[test]
    fn test_extent_serializes_lowercase() {
        let json = serde_json::to_string(&ScriptExtent::Bracket).unwrap();
        assert_eq!(json, r#""bracket""#);
    }
}
