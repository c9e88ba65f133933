//! Mock collaborators for full-pipeline tests: a canned source reader
//! and a fixed-latency probe transport, both instrumented with call
//! counters so tests can assert that nothing touched the network when
//! it should not have.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use pingr_common::candidate::Endpoint;
use pingr_common::source::{SourceDescriptor, SourceReader};
use pingr_core::probe::ProbeTransport;

/// Serves canned payloads by source tag; unknown tags fail the fetch.
pub struct CannedReader {
    payloads: HashMap<String, String>,
    pub fetches: AtomicUsize,
}

impl CannedReader {
    pub fn new(payloads: &[(&str, &str)]) -> Self {
        Self {
            payloads: payloads
                .iter()
                .map(|(tag, body)| (tag.to_string(), body.to_string()))
                .collect(),
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SourceReader for CannedReader {
    async fn fetch(&self, source: &SourceDescriptor) -> anyhow::Result<String> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        match self.payloads.get(&source.tag) {
            Some(body) => Ok(body.clone()),
            None => anyhow::bail!("source '{}' is down", source.tag),
        }
    }
}

/// Answers each endpoint with a fixed latency; endpoints without an
/// entry fail every sample.
pub struct FixedLatencyTransport {
    latencies: HashMap<Endpoint, Duration>,
    pub probes: AtomicUsize,
}

impl FixedLatencyTransport {
    pub fn new(latencies: &[(&str, u64)]) -> Self {
        Self {
            latencies: latencies
                .iter()
                .map(|(identity, ms)| (identity.parse().unwrap(), Duration::from_millis(*ms)))
                .collect(),
            probes: AtomicUsize::new(0),
        }
    }

    pub fn probe_count(&self) -> usize {
        self.probes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProbeTransport for FixedLatencyTransport {
    async fn probe_once(&self, endpoint: &Endpoint) -> anyhow::Result<Duration> {
        self.probes.fetch_add(1, Ordering::SeqCst);
        match self.latencies.get(endpoint) {
            Some(latency) => Ok(*latency),
            None => anyhow::bail!("no route to {endpoint}"),
        }
    }
}
