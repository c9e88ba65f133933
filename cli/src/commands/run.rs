use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use pingr_common::config::RunConfig;
use pingr_common::source;
use pingr_core::pipeline;
use pingr_core::probe::{ProbeTransport, ProgressFn, TcpConnectTransport};
use pingr_web::fetch::HttpSourceReader;
use pingr_web::probe::HttpGetTransport;

use crate::commands::ProbeArgs;
use crate::report;
use crate::terminal::{print, spinner};

pub async fn run(args: ProbeArgs, output: PathBuf) -> anyhow::Result<()> {
    let cfg: RunConfig = args.to_config();
    cfg.validate()?;

    print::header("collecting endpoint candidates");

    let sources = source::default_sources();
    let reader = Arc::new(HttpSourceReader::new(cfg.fetch_timeout)?);
    let transport = build_transport(&args, &cfg)?;

    let pb = spinner::probe_spinner();
    let pb_ref = pb.clone();
    let progress: Arc<ProgressFn> =
        Arc::new(move |resolved| spinner::report_probe_progress(&pb_ref, resolved));

    let started: Instant = Instant::now();
    let outcome = pipeline::run(&sources, reader, transport, &cfg, Some(progress)).await?;
    pb.finish_and_clear();

    if outcome.ranked.is_empty() {
        print::no_results();
        return Ok(());
    }

    print::header("fastest endpoints");
    print::ranked_list(&outcome.ranked);
    print::summary(&outcome.summary, started.elapsed().as_secs_f64());

    report::write(&output, &outcome.ranked, &outcome.hostnames)
}

/// Picks the probe transport the flags asked for.
pub(super) fn build_transport(
    args: &ProbeArgs,
    cfg: &RunConfig,
) -> anyhow::Result<Arc<dyn ProbeTransport>> {
    if args.tcp {
        Ok(Arc::new(TcpConnectTransport::new(cfg.probe_port)))
    } else {
        Ok(Arc::new(HttpGetTransport::new(cfg.probe_port)?))
    }
}
