//! Writes the ranked shortlist to disk.
//!
//! One line per entry, `identity latency`, where an unreachable entry
//! carries the literal word `unreachable` — the sentinel never turns
//! into a number on the way out. Hostnames collected along the way are
//! appended in their own section. Each run replaces the previous file.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use pingr_common::candidate::RankedList;
use pingr_core::aggregate::HostnameSet;
use tracing::info;

pub fn write(path: &Path, ranked: &RankedList, hostnames: &HostnameSet) -> anyhow::Result<()> {
    let body = render(ranked, hostnames);
    fs::write(path, body)?;
    info!(
        "saved {} ranked endpoints to {}",
        ranked.len(),
        path.display()
    );
    Ok(())
}

fn render(ranked: &RankedList, hostnames: &HostnameSet) -> String {
    let mut out = String::new();

    for entry in ranked.iter() {
        match entry.score.as_millis() {
            Some(ms) => {
                let _ = writeln!(out, "{} {ms:.3}ms", entry.endpoint);
            }
            None => {
                let _ = writeln!(out, "{} unreachable", entry.endpoint);
            }
        }
    }

    if !hostnames.is_empty() {
        let _ = writeln!(out, "\n# hostnames");
        for host in hostnames.keys() {
            let _ = writeln!(out, "{host}");
        }
    }

    out
}
