//! # Candidate Aggregation
//!
//! Folds per-source extraction results into one deduplicated
//! [`Registry`]. Merging is commutative and idempotent over the final
//! identity set: source order only influences first-seen ordinals, and
//! re-merging a source changes nothing because provenance is a set.

use std::collections::{BTreeMap, BTreeSet};

use pingr_common::candidate::{Endpoint, Registry};

/// Hostname identity -> contributing source tags. Hostnames are a
/// separate candidate class; they never share a registry with
/// addresses.
pub type HostnameSet = BTreeMap<String, BTreeSet<String>>;

/// Merges one source's addresses into the registry: new identities get
/// the next first-seen ordinal and provenance `{source_tag}`, known
/// identities only gain the tag.
pub fn merge(
    registry: &mut Registry,
    addresses: impl IntoIterator<Item = Endpoint>,
    source_tag: &str,
) {
    for endpoint in addresses {
        registry.merge_one(endpoint, source_tag);
    }
}

/// Same merge discipline for the hostname side channel.
pub fn merge_hostnames(
    hostnames: &mut HostnameSet,
    found: impl IntoIterator<Item = String>,
    source_tag: &str,
) {
    for host in found {
        hostnames
            .entry(host)
            .or_default()
            .insert(source_tag.to_string());
    }
}
