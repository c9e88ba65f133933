//! # Run Orchestration
//!
//! Wires the stages together for one batch run:
//! fetch → extract → aggregate → probe → select.
//!
//! Stages hand the registry off in strict order — aggregation finishes
//! for every source before the first probe goes out, and the selector
//! only runs once the probe stage has fully drained. Per-source and
//! per-candidate failures are converted into data (an empty
//! contribution, an unreachable score); only an invalid configuration
//! aborts, and it does so before any network activity.

use std::sync::Arc;

use pingr_common::candidate::{RankedList, Registry, RunSummary};
use pingr_common::config::RunConfig;
use pingr_common::source::{SourceDescriptor, SourceReader};
use tracing::{debug, info, warn};

use crate::aggregate::{self, HostnameSet};
use crate::extract;
use crate::probe::{self, ProbeTransport, ProgressFn};
use crate::select;

/// Everything one run produces for the reporter.
#[derive(Debug)]
pub struct RunReport {
    pub ranked: RankedList,
    pub hostnames: HostnameSet,
    pub summary: RunSummary,
}

/// Executes a full collection-and-ranking run.
pub async fn run(
    sources: &[SourceDescriptor],
    reader: Arc<dyn SourceReader>,
    transport: Arc<dyn ProbeTransport>,
    cfg: &RunConfig,
    on_candidate_done: Option<Arc<ProgressFn>>,
) -> anyhow::Result<RunReport> {
    cfg.validate()?;

    let mut registry = Registry::new();
    let mut hostnames = HostnameSet::new();
    let mut fetched: usize = 0;
    let mut failed: usize = 0;

    for source in sources {
        match reader.fetch(source).await {
            Ok(payload) => {
                let found = extract::extract(&payload, source.kind);
                debug!(
                    "source '{}' contributed {} addresses, {} hostnames",
                    source.tag,
                    found.addresses.len(),
                    found.hostnames.len()
                );
                aggregate::merge(&mut registry, found.addresses, &source.tag);
                aggregate::merge_hostnames(&mut hostnames, found.hostnames, &source.tag);
                fetched += 1;
            }
            Err(e) => {
                warn!("source '{}' unavailable, skipping: {e}", source.tag);
                failed += 1;
            }
        }
    }

    info!(
        "aggregated {} unique candidates from {} of {} sources",
        registry.len(),
        fetched,
        sources.len()
    );

    let stats = probe::probe_all(&mut registry, transport, cfg, on_candidate_done).await;
    let ranked = select::select(&registry, cfg.top_k)?;

    let summary = RunSummary {
        sources_fetched: fetched,
        sources_failed: failed,
        discovered: registry.len(),
        probed: stats.probed,
        unreachable: stats.unreachable,
        hostnames: hostnames.len(),
    };

    Ok(RunReport {
        ranked,
        hostnames,
        summary,
    })
}
