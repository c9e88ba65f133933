//! # Candidate Extraction
//!
//! Turns one source's raw payload into the set of endpoint identities
//! it contains. Pure and stateless: no I/O, no shared state between
//! calls.
//!
//! Free text is scanned for dotted-quad tokens anywhere in the body;
//! structured payloads are read field-by-field instead of re-scanning
//! their serialized form. Hostname-shaped strings are collected into a
//! separate set — they are a different candidate class and never enter
//! the address namespace.

use std::collections::BTreeSet;
use std::str::FromStr;

use pingr_common::candidate::Endpoint;
use pingr_common::source::ContentKind;
use serde_json::Value;
use tracing::debug;

/// Everything one payload yielded.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub addresses: BTreeSet<Endpoint>,
    pub hostnames: BTreeSet<String>,
}

impl Extraction {
    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty() && self.hostnames.is_empty()
    }
}

/// Extracts candidates from `payload` according to its declared kind.
/// Malformed content is skipped, never fatal.
pub fn extract(payload: &str, kind: ContentKind) -> Extraction {
    match kind {
        ContentKind::FreeText => scan_text(payload),
        ContentKind::StructuredRecords => from_records(payload),
    }
}

/// Scans free text for address and hostname tokens.
///
/// Address tokens are maximal runs of digits and dots, so an
/// out-of-range shape like `999.1.1.1` is seen whole and rejected
/// instead of leaking a valid-looking substring.
fn scan_text(text: &str) -> Extraction {
    let mut found = Extraction::default();

    for token in text.split(|c: char| !c.is_ascii_digit() && c != '.') {
        // Sentence punctuation sticks to the token; shed it before
        // parsing so "reachable at 1.2.3.4." still counts.
        let token = token.trim_matches('.');
        if token.is_empty() {
            continue;
        }
        if let Ok(addr) = token.parse::<std::net::Ipv4Addr>() {
            found.addresses.insert(Endpoint::Addr(addr));
        }
    }

    for token in text.split(|c: char| !is_hostname_char(c)) {
        if let Some(host) = normalize_hostname(token) {
            found.hostnames.insert(host);
        }
    }

    found
}

fn is_hostname_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '.' || c == '-'
}

/// Accepts `label(.label)+` with an alphabetic TLD of length >= 2.
/// Pure digit-and-dot shapes are address territory, not hostnames.
fn normalize_hostname(token: &str) -> Option<String> {
    let token = token.trim_matches('.');
    if !token.contains('.') || token.parse::<std::net::Ipv4Addr>().is_ok() {
        return None;
    }

    let labels: Vec<&str> = token.split('.').collect();
    let valid = labels.iter().all(|label| {
        !label.is_empty()
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    });
    if !valid {
        return None;
    }

    let tld = labels.last()?;
    if tld.len() < 2 || !tld.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }

    Some(token.to_ascii_lowercase())
}

/// Reads a structured JSON payload record-by-record.
///
/// Accepts a top-level array or an array behind a conventional wrapper
/// key. Records are objects with `ip`/`address` (and optional `port`)
/// or `domain`/`hostname` fields, or bare address strings. Anything
/// that does not fit is skipped.
fn from_records(payload: &str) -> Extraction {
    let parsed: Value = match serde_json::from_str(payload) {
        Ok(value) => value,
        Err(e) => {
            debug!("structured payload did not parse as JSON: {e}");
            return Extraction::default();
        }
    };

    let records = match &parsed {
        Value::Array(items) => items.as_slice(),
        Value::Object(map) => ["data", "info"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_array))
            .map(Vec::as_slice)
            .unwrap_or_default(),
        _ => &[],
    };

    let mut found = Extraction::default();
    for record in records {
        extract_record(record, &mut found);
    }
    found
}

fn extract_record(record: &Value, found: &mut Extraction) {
    match record {
        Value::String(s) => {
            if let Ok(endpoint) = Endpoint::from_str(s) {
                found.addresses.insert(endpoint);
            }
        }
        Value::Object(fields) => {
            let addr = ["ip", "address"]
                .iter()
                .find_map(|key| fields.get(*key).and_then(Value::as_str));
            if let Some(addr) = addr {
                let port = fields.get("port").and_then(Value::as_u64);
                let spelled = match port {
                    Some(port) if u16::try_from(port).is_ok() => format!("{addr}:{port}"),
                    _ => addr.to_string(),
                };
                if let Ok(endpoint) = Endpoint::from_str(&spelled) {
                    found.addresses.insert(endpoint);
                }
            }

            let host = ["domain", "hostname"]
                .iter()
                .find_map(|key| fields.get(*key).and_then(Value::as_str));
            if let Some(host) = host
                && let Some(host) = normalize_hostname(host)
            {
                found.hostnames.insert(host);
            }
        }
        _ => {}
    }
}
