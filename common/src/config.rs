use std::time::Duration;

use crate::error::ConfigError;

/// Knobs for a single collection-and-ranking run.
///
/// Defaults mirror the behaviour the tool has always had: five samples
/// per endpoint spaced one second apart, ten probe sequences in flight
/// at once, and a top-5 shortlist.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Latency samples taken per candidate.
    pub sample_count: u32,
    /// Pause between two samples of the same candidate, so each sample
    /// measures a fresh connection instead of socket reuse.
    pub sample_spacing: Duration,
    /// Upper bound for a single probe attempt.
    pub probe_timeout: Duration,
    /// Maximum probe sequences in flight at any moment, system-wide.
    pub pool_width: usize,
    /// Shortlist length.
    pub top_k: usize,
    /// Upper bound for the whole probe stage; candidates still pending
    /// at the deadline are scored unreachable.
    pub stage_deadline: Duration,
    /// Upper bound for fetching one source.
    pub fetch_timeout: Duration,
    /// Port used when a candidate carries no explicit port.
    pub probe_port: u16,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            sample_count: 5,
            sample_spacing: Duration::from_secs(1),
            probe_timeout: Duration::from_secs(5),
            pool_width: 10,
            top_k: 5,
            stage_deadline: Duration::from_secs(120),
            fetch_timeout: Duration::from_secs(15),
            probe_port: 80,
        }
    }
}

impl RunConfig {
    /// Rejects configurations that would make the run meaningless or
    /// hang it. Called by the pipeline before the first fetch.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.top_k == 0 {
            return Err(ConfigError::InvalidTopK(self.top_k));
        }
        if self.sample_count == 0 {
            return Err(ConfigError::InvalidSampleCount(self.sample_count));
        }
        if self.pool_width == 0 {
            return Err(ConfigError::InvalidPoolWidth);
        }
        if self.probe_timeout.is_zero() {
            return Err(ConfigError::InvalidProbeTimeout);
        }
        if self.stage_deadline.is_zero() {
            return Err(ConfigError::InvalidStageDeadline);
        }
        if self.fetch_timeout.is_zero() {
            return Err(ConfigError::InvalidFetchTimeout);
        }
        Ok(())
    }
}
