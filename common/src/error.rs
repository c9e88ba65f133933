use thiserror::Error;

/// Configuration problems that must abort a run before any network
/// activity starts. Everything else in the pipeline degrades to data
/// (an empty source, an unreachable score) instead of an error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("top-k must be at least 1 (got {0})")]
    InvalidTopK(usize),

    #[error("sample count must be at least 1 (got {0})")]
    InvalidSampleCount(u32),

    #[error("worker pool width must be at least 1")]
    InvalidPoolWidth,

    #[error("per-probe timeout must be non-zero")]
    InvalidProbeTimeout,

    #[error("probe stage deadline must be non-zero")]
    InvalidStageDeadline,

    #[error("source fetch timeout must be non-zero")]
    InvalidFetchTimeout,
}
