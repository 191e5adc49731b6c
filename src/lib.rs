pub mod balancer;
pub mod config;
pub mod normalizer;
pub mod patterns;
pub mod segmenter;

// Re-export main types for convenient access
pub use config::{BalancerConfig, NormalizerConfig, ScriptExtent, SegmenterConfig};
pub use segmenter::{QuotedSpan, SentenceSegmenter, SpanKind};

// Re-export the individual pipeline stages for standalone use
pub use balancer::QuoteBalancer;
pub use normalizer::MarkNormalizer;
pub use segmenter::SpanExtractor;
