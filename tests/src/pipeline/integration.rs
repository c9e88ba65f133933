use std::sync::Arc;
use std::time::Duration;

use pingr_common::config::RunConfig;
use pingr_common::error::ConfigError;
use pingr_common::source::{ContentKind, SourceDescriptor, SourceReader};
use pingr_core::pipeline;
use pingr_core::probe::ProbeTransport;

use super::util::{CannedReader, FixedLatencyTransport};

fn fast_cfg() -> RunConfig {
    RunConfig {
        sample_count: 2,
        sample_spacing: Duration::ZERO,
        probe_timeout: Duration::from_millis(200),
        stage_deadline: Duration::from_secs(10),
        ..RunConfig::default()
    }
}

fn three_sources() -> Vec<SourceDescriptor> {
    vec![
        SourceDescriptor::new("http://a.test/", "a", ContentKind::FreeText),
        SourceDescriptor::new("http://b.test/", "b", ContentKind::FreeText),
        SourceDescriptor::new("http://c.test/", "c", ContentKind::StructuredRecords),
    ]
}

#[tokio::test]
async fn overlapping_sources_collapse_and_rank_deterministically() {
    // All three sources mention 1.2.3.4; the invalid 999.1.1.1 shape
    // and the hostname must stay out of the address registry.
    let reader = Arc::new(CannedReader::new(&[
        ("a", "1.2.3.4 and 1.2.3.4 again, also 999.1.1.1"),
        ("b", "<td>1.2.3.4</td><td>5.6.7.8</td> edge.example.com"),
        ("c", r#"[{"ip":"5.6.7.8"},{"ip":"9.9.9.9"},{"domain":"cf.example.net"}]"#),
    ]));
    let transport = Arc::new(FixedLatencyTransport::new(&[
        ("1.2.3.4", 30),
        ("5.6.7.8", 10),
        // 9.9.9.9 has no route and must surface as unreachable.
    ]));

    let outcome = pipeline::run(&three_sources(), reader, transport, &fast_cfg(), None)
        .await
        .unwrap();

    let identities: Vec<String> = outcome
        .ranked
        .iter()
        .map(|e| e.endpoint.to_string())
        .collect();
    assert_eq!(identities, vec!["5.6.7.8", "1.2.3.4", "9.9.9.9"]);
    assert!(outcome.ranked.iter().nth(2).unwrap().score.is_unreachable());

    // 1.2.3.4 was contributed by sources a and b, deduplicated.
    let shared = outcome.ranked.iter().nth(1).unwrap();
    assert_eq!(
        shared.sources.iter().cloned().collect::<Vec<_>>(),
        vec!["a", "b"]
    );

    assert_eq!(outcome.summary.sources_fetched, 3);
    assert_eq!(outcome.summary.sources_failed, 0);
    assert_eq!(outcome.summary.discovered, 3);
    assert_eq!(outcome.summary.probed, 3);
    assert_eq!(outcome.summary.unreachable, 1);
    assert_eq!(outcome.summary.hostnames, 2);
    assert!(outcome.hostnames.contains_key("edge.example.com"));
    assert!(outcome.hostnames.contains_key("cf.example.net"));
}

#[tokio::test]
async fn a_dead_source_contributes_nothing_but_never_aborts_the_run() {
    // Source "b" is not in the canned set, so its fetch fails.
    let reader = Arc::new(CannedReader::new(&[
        ("a", "1.2.3.4"),
        ("c", r#"[{"ip":"5.6.7.8"}]"#),
    ]));
    let transport = Arc::new(FixedLatencyTransport::new(&[
        ("1.2.3.4", 20),
        ("5.6.7.8", 40),
    ]));

    let outcome = pipeline::run(&three_sources(), reader, transport, &fast_cfg(), None)
        .await
        .unwrap();

    assert_eq!(outcome.summary.sources_fetched, 2);
    assert_eq!(outcome.summary.sources_failed, 1);
    assert_eq!(outcome.summary.discovered, 2);
    assert_eq!(outcome.ranked.len(), 2);
}

#[tokio::test]
async fn invalid_top_k_aborts_before_any_network_activity() {
    let reader = Arc::new(CannedReader::new(&[("a", "1.2.3.4")]));
    let transport = Arc::new(FixedLatencyTransport::new(&[("1.2.3.4", 20)]));
    let cfg = RunConfig {
        top_k: 0,
        ..fast_cfg()
    };

    let result = pipeline::run(
        &three_sources(),
        Arc::clone(&reader) as Arc<dyn SourceReader>,
        Arc::clone(&transport) as Arc<dyn ProbeTransport>,
        &cfg,
        None,
    )
    .await;

    let err = result.unwrap_err();
    assert_eq!(
        err.downcast_ref::<ConfigError>(),
        Some(&ConfigError::InvalidTopK(0))
    );
    assert_eq!(reader.fetch_count(), 0);
    assert_eq!(transport.probe_count(), 0);
}

#[tokio::test]
async fn repeated_runs_produce_identical_shortlists() {
    let sources = three_sources();
    let mut previous: Option<Vec<String>> = None;

    for _ in 0..3 {
        let reader = Arc::new(CannedReader::new(&[
            ("a", "10.0.0.1 10.0.0.2 10.0.0.3"),
            ("b", "10.0.0.3 10.0.0.1"),
        ]));
        // Two endpoints tie at 25ms; first-seen order must decide.
        let transport = Arc::new(FixedLatencyTransport::new(&[
            ("10.0.0.1", 25),
            ("10.0.0.2", 25),
            ("10.0.0.3", 90),
        ]));

        let outcome = pipeline::run(&sources, reader, transport, &fast_cfg(), None)
            .await
            .unwrap();
        let identities: Vec<String> = outcome
            .ranked
            .iter()
            .map(|e| e.endpoint.to_string())
            .collect();

        assert_eq!(identities, vec!["10.0.0.1", "10.0.0.2", "10.0.0.3"]);
        if let Some(previous) = &previous {
            assert_eq!(previous, &identities);
        }
        previous = Some(identities);
    }
}

#[tokio::test]
async fn top_k_truncates_the_shortlist() {
    let reader = Arc::new(CannedReader::new(&[(
        "a",
        "10.0.0.1 10.0.0.2 10.0.0.3 10.0.0.4",
    )]));
    let transport = Arc::new(FixedLatencyTransport::new(&[
        ("10.0.0.1", 40),
        ("10.0.0.2", 10),
        ("10.0.0.3", 30),
        ("10.0.0.4", 20),
    ]));
    let cfg = RunConfig {
        top_k: 2,
        ..fast_cfg()
    };

    let outcome = pipeline::run(
        &[SourceDescriptor::new(
            "http://a.test/",
            "a",
            ContentKind::FreeText,
        )],
        reader,
        transport,
        &cfg,
        None,
    )
    .await
    .unwrap();

    let identities: Vec<String> = outcome
        .ranked
        .iter()
        .map(|e| e.endpoint.to_string())
        .collect();
    assert_eq!(identities, vec!["10.0.0.2", "10.0.0.4"]);
}
