use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use pingr_common::candidate::{Endpoint, Registry, RunSummary};
use pingr_common::config::RunConfig;
use pingr_core::aggregate::{self, HostnameSet};
use pingr_core::probe::{self, ProgressFn};
use pingr_core::select;

use crate::commands::{ProbeArgs, run};
use crate::report;
use crate::terminal::{print, spinner};

/// Probes an explicit endpoint list, skipping source collection.
pub async fn probe(
    endpoints: Vec<String>,
    args: ProbeArgs,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let cfg: RunConfig = args.to_config();
    cfg.validate()?;

    let mut parsed: Vec<Endpoint> = Vec::with_capacity(endpoints.len());
    for raw in &endpoints {
        let endpoint = raw
            .parse::<Endpoint>()
            .map_err(|e| anyhow::anyhow!("invalid endpoint '{raw}': {e}"))?;
        parsed.push(endpoint);
    }

    let mut registry = Registry::new();
    aggregate::merge(&mut registry, parsed, "cli");

    print::header("probing endpoints");

    let transport = run::build_transport(&args, &cfg)?;
    let pb = spinner::probe_spinner();
    let pb_ref = pb.clone();
    let progress: Arc<ProgressFn> =
        Arc::new(move |resolved| spinner::report_probe_progress(&pb_ref, resolved));

    let started: Instant = Instant::now();
    let stats = probe::probe_all(&mut registry, transport, &cfg, Some(progress)).await;
    pb.finish_and_clear();

    let ranked = select::select(&registry, cfg.top_k)?;

    print::header("fastest endpoints");
    print::ranked_list(&ranked);
    let summary = RunSummary {
        sources_fetched: 0,
        sources_failed: 0,
        discovered: registry.len(),
        probed: stats.probed,
        unreachable: stats.unreachable,
        hostnames: 0,
    };
    print::summary(&summary, started.elapsed().as_secs_f64());

    if let Some(path) = output {
        report::write(&path, &ranked, &HostnameSet::new())?;
    }
    Ok(())
}
