//! # Candidate Model
//!
//! Defines the identities flowing through the pipeline:
//!
//! * [`Endpoint`] — a normalized IPv4 identity, optionally with a port.
//! * [`Candidate`] — an endpoint plus provenance and its latency score.
//! * [`Registry`] — the deduplicated candidate set for one run.
//! * [`RankedList`] — the final, deterministically ordered shortlist.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;
use std::time::Duration;

/// A normalized endpoint identity.
///
/// Parsing goes through [`std::net::Ipv4Addr`], which rejects
/// out-of-range octets and leading-zero spellings, so every textual
/// form that survives parsing maps to exactly one `Endpoint` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Endpoint {
    Addr(Ipv4Addr),
    AddrPort(Ipv4Addr, u16),
}

impl Endpoint {
    pub fn addr(&self) -> Ipv4Addr {
        match self {
            Endpoint::Addr(addr) | Endpoint::AddrPort(addr, _) => *addr,
        }
    }

    /// The port to probe: the endpoint's own if it carries one,
    /// otherwise the caller's default.
    pub fn port_or(&self, default: u16) -> u16 {
        match self {
            Endpoint::Addr(_) => default,
            Endpoint::AddrPort(_, port) => *port,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Addr(addr) => write!(f, "{addr}"),
            Endpoint::AddrPort(addr, port) => write!(f, "{addr}:{port}"),
        }
    }
}

impl FromStr for Endpoint {
    type Err = String;

    /// Parses `a.b.c.d` or `a.b.c.d:port`. Anything else — including
    /// shapes like `999.1.1.1` — is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some((addr_str, port_str)) = s.split_once(':') {
            let addr = addr_str
                .parse::<Ipv4Addr>()
                .map_err(|e| format!("invalid address '{addr_str}': {e}"))?;
            let port = port_str
                .parse::<u16>()
                .map_err(|e| format!("invalid port '{port_str}': {e}"))?;
            return Ok(Endpoint::AddrPort(addr, port));
        }

        s.parse::<Ipv4Addr>()
            .map(Endpoint::Addr)
            .map_err(|e| format!("invalid address '{s}': {e}"))
    }
}

/// Ranking summary for one candidate after its probe sequence.
///
/// `Unreachable` is a sentinel, not a large duration; the derived
/// ordering places every finite score before it, which is exactly the
/// order the selector needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LatencyScore {
    Reachable(Duration),
    Unreachable,
}

impl LatencyScore {
    pub fn is_unreachable(&self) -> bool {
        matches!(self, LatencyScore::Unreachable)
    }

    /// Millisecond rendering for reports; `None` when unreachable.
    pub fn as_millis(&self) -> Option<f64> {
        match self {
            LatencyScore::Reachable(d) => Some(d.as_secs_f64() * 1000.0),
            LatencyScore::Unreachable => None,
        }
    }
}

impl fmt::Display for LatencyScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_millis() {
            Some(ms) => write!(f, "{ms:.3}ms"),
            None => write!(f, "unreachable"),
        }
    }
}

/// One deduplicated endpoint with everything the pipeline learns
/// about it.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub endpoint: Endpoint,
    /// Tags of every source that contributed this endpoint.
    pub sources: BTreeSet<String>,
    /// Registry size at insertion time; the deterministic tie-breaker.
    pub ordinal: usize,
    /// Absent until the probe stage has run.
    pub score: Option<LatencyScore>,
}

/// The deduplicated candidate set for one run.
///
/// Populated by the aggregator, enriched with scores by the prober,
/// read-only once the selector takes over. Never persisted.
#[derive(Debug, Default)]
pub struct Registry {
    entries: HashMap<Endpoint, Candidate>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts the endpoint or extends its provenance. The first-seen
    /// ordinal is assigned once and never changes.
    pub fn merge_one(&mut self, endpoint: Endpoint, source_tag: &str) {
        let next_ordinal = self.entries.len();
        self.entries
            .entry(endpoint)
            .or_insert_with(|| Candidate {
                endpoint,
                sources: BTreeSet::new(),
                ordinal: next_ordinal,
                score: None,
            })
            .sources
            .insert(source_tag.to_string());
    }

    /// Attaches the probe stage's verdict. A later run may overwrite.
    pub fn attach_score(&mut self, endpoint: &Endpoint, score: LatencyScore) {
        if let Some(candidate) = self.entries.get_mut(endpoint) {
            candidate.score = Some(score);
        }
    }

    pub fn get(&self, endpoint: &Endpoint) -> Option<&Candidate> {
        self.entries.get(endpoint)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn candidates(&self) -> impl Iterator<Item = &Candidate> {
        self.entries.values()
    }

    /// Snapshot of the identities, in first-seen order.
    pub fn endpoints(&self) -> Vec<Endpoint> {
        let mut all: Vec<&Candidate> = self.entries.values().collect();
        all.sort_by_key(|c| c.ordinal);
        all.iter().map(|c| c.endpoint).collect()
    }
}

/// One row of the final shortlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedEntry {
    pub endpoint: Endpoint,
    pub score: LatencyScore,
    pub sources: BTreeSet<String>,
}

/// The final shortlist: at most K entries, ascending latency,
/// unreachable entries last, immutable once produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankedList {
    entries: Vec<RankedEntry>,
}

impl RankedList {
    pub fn new(entries: Vec<RankedEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RankedEntry> {
        self.entries.iter()
    }
}

/// Aggregate counts handed to the reporter next to the shortlist.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub sources_fetched: usize,
    pub sources_failed: usize,
    pub discovered: usize,
    pub probed: usize,
    pub unreachable: usize,
    pub hostnames: usize,
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
