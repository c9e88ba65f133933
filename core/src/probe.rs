//! # Latency Probing
//!
//! The concurrent heart of the pipeline. Every candidate gets a
//! sequence of timed probe attempts; sequences for different
//! candidates run in parallel under a hard pool-width cap, while the
//! samples inside one sequence stay strictly ordered with a fixed
//! spacing between them (a fresh connection per sample, and no
//! hammering of one target).
//!
//! Failure never propagates past a candidate: a refused connection, a
//! timeout, even a panicking transport only cost that candidate its
//! score. The stage always resolves every candidate — at the overall
//! deadline whatever is still pending is scored unreachable and the
//! remaining tasks are aborted.

use std::collections::HashSet;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use pingr_common::candidate::{Endpoint, LatencyScore, Registry};
use pingr_common::config::RunConfig;
use tokio::net::TcpStream;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::{self, sleep, timeout};
use tracing::{debug, trace, warn};

/// Called with the number of fully-probed candidates after each one
/// resolves; drives the CLI progress bar.
pub type ProgressFn = dyn Fn(usize) + Send + Sync;

/// One timed attempt against one endpoint.
///
/// Implementations measure a single fresh round trip and report the
/// elapsed time; the prober wraps every call in the per-probe timeout.
#[async_trait]
pub trait ProbeTransport: Send + Sync {
    async fn probe_once(&self, endpoint: &Endpoint) -> anyhow::Result<Duration>;
}

/// Times a fresh TCP connect to the endpoint.
pub struct TcpConnectTransport {
    default_port: u16,
}

impl TcpConnectTransport {
    pub fn new(default_port: u16) -> Self {
        Self { default_port }
    }
}

#[async_trait]
impl ProbeTransport for TcpConnectTransport {
    async fn probe_once(&self, endpoint: &Endpoint) -> anyhow::Result<Duration> {
        let addr = SocketAddr::new(
            IpAddr::V4(endpoint.addr()),
            endpoint.port_or(self.default_port),
        );
        let started = std::time::Instant::now();
        let stream = TcpStream::connect(addr).await?;
        let elapsed = started.elapsed();
        drop(stream);
        Ok(elapsed)
    }
}

/// Outcome of a single sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleOutcome {
    Success(Duration),
    Failed,
}

/// One sample with its capture time, kept only for diagnostics while a
/// candidate's sequence runs.
#[derive(Debug, Clone, Copy)]
pub struct ProbeSample {
    pub outcome: SampleOutcome,
    pub taken_at: std::time::Instant,
}

/// Mean of the successful samples, or the unreachable sentinel when
/// none succeeded.
pub fn score_from_samples(samples: &[ProbeSample]) -> LatencyScore {
    let successes: Vec<Duration> = samples
        .iter()
        .filter_map(|sample| match sample.outcome {
            SampleOutcome::Success(elapsed) => Some(elapsed),
            SampleOutcome::Failed => None,
        })
        .collect();

    match successes.len() {
        0 => LatencyScore::Unreachable,
        n => LatencyScore::Reachable(successes.iter().sum::<Duration>() / n as u32),
    }
}

/// Counts handed back to the pipeline once the stage has drained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProbeStats {
    pub probed: usize,
    pub unreachable: usize,
}

/// Probes every candidate in the registry and attaches its score.
///
/// At most `cfg.pool_width` probe sequences are in flight at any
/// moment; each spawned task holds its semaphore permit for its whole
/// sample sequence. Scores travel back through the join handles and
/// are written by this single-threaded drain loop, so no two writers
/// ever touch the registry concurrently.
pub async fn probe_all(
    registry: &mut Registry,
    transport: Arc<dyn ProbeTransport>,
    cfg: &RunConfig,
    on_candidate_done: Option<Arc<ProgressFn>>,
) -> ProbeStats {
    let endpoints = registry.endpoints();
    if endpoints.is_empty() {
        return ProbeStats::default();
    }

    let pool = Arc::new(Semaphore::new(cfg.pool_width));
    let mut sequences: JoinSet<(Endpoint, LatencyScore)> = JoinSet::new();

    for endpoint in endpoints.iter().copied() {
        let transport = Arc::clone(&transport);
        let pool = Arc::clone(&pool);
        let cfg = cfg.clone();

        sequences.spawn(async move {
            let Ok(_permit) = pool.acquire_owned().await else {
                // The pool only closes if the stage was torn down.
                return (endpoint, LatencyScore::Unreachable);
            };
            let score = probe_sequence(transport.as_ref(), &endpoint, &cfg).await;
            (endpoint, score)
        });
    }

    let deadline = time::Instant::now() + cfg.stage_deadline;
    let mut pending: HashSet<Endpoint> = endpoints.iter().copied().collect();
    let mut resolved: usize = 0;
    let mut unreachable: usize = 0;

    loop {
        match time::timeout_at(deadline, sequences.join_next()).await {
            Ok(Some(Ok((endpoint, score)))) => {
                pending.remove(&endpoint);
                if score.is_unreachable() {
                    unreachable += 1;
                }
                registry.attach_score(&endpoint, score);
                resolved += 1;
                if let Some(callback) = &on_candidate_done {
                    callback(resolved);
                }
            }
            Ok(Some(Err(join_err))) => {
                // A panicking sequence costs only its own candidate:
                // it stays pending and is scored unreachable below.
                warn!("probe sequence aborted: {join_err}");
            }
            Ok(None) => break,
            Err(_) => {
                warn!(
                    "probe stage deadline elapsed with {} candidates outstanding",
                    pending.len()
                );
                sequences.abort_all();
                break;
            }
        }
    }

    for endpoint in &pending {
        registry.attach_score(endpoint, LatencyScore::Unreachable);
        unreachable += 1;
    }

    ProbeStats {
        probed: endpoints.len(),
        unreachable,
    }
}

/// Runs one candidate's full sample sequence. Sample `i + 1` never
/// starts before sample `i` resolved, and spacing sits between
/// attempts, not before the first.
async fn probe_sequence(
    transport: &dyn ProbeTransport,
    endpoint: &Endpoint,
    cfg: &RunConfig,
) -> LatencyScore {
    let mut samples: Vec<ProbeSample> = Vec::with_capacity(cfg.sample_count as usize);

    for attempt in 0..cfg.sample_count {
        if attempt > 0 {
            sleep(cfg.sample_spacing).await;
        }

        let outcome = match timeout(cfg.probe_timeout, transport.probe_once(endpoint)).await {
            Ok(Ok(elapsed)) => SampleOutcome::Success(elapsed),
            Ok(Err(e)) => {
                debug!("probe of {endpoint} failed: {e}");
                SampleOutcome::Failed
            }
            Err(_) => {
                debug!("probe of {endpoint} timed out");
                SampleOutcome::Failed
            }
        };
        samples.push(ProbeSample {
            outcome,
            taken_at: std::time::Instant::now(),
        });
    }

    trace!("samples for {endpoint}: {samples:?}");
    score_from_samples(&samples)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
