//! # Shortlist Selection
//!
//! Orders the probed registry and cuts it down to the top K. The
//! ordering is fully deterministic: ascending latency, the unreachable
//! sentinel after every finite score, and first-seen ordinal as the
//! tie-breaker — so identical inputs always produce an identical
//! shortlist, independent of map iteration or probe completion order.

use pingr_common::candidate::{Candidate, LatencyScore, RankedEntry, RankedList, Registry};
use pingr_common::error::ConfigError;

/// Ranks the registry and truncates to `k` entries. Candidates the
/// probe stage never reached rank as unreachable. `k == 0` is a
/// configuration error, reported without touching the network.
pub fn select(registry: &Registry, k: usize) -> Result<RankedList, ConfigError> {
    if k == 0 {
        return Err(ConfigError::InvalidTopK(k));
    }

    let mut ranked: Vec<&Candidate> = registry.candidates().collect();
    ranked.sort_by_key(|candidate| (effective_score(candidate), candidate.ordinal));

    let entries = ranked
        .into_iter()
        .take(k)
        .map(|candidate| RankedEntry {
            endpoint: candidate.endpoint,
            score: effective_score(candidate),
            sources: candidate.sources.clone(),
        })
        .collect();

    Ok(RankedList::new(entries))
}

fn effective_score(candidate: &Candidate) -> LatencyScore {
    candidate.score.unwrap_or(LatencyScore::Unreachable)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn registry_with_scores(scores: &[Option<u64>]) -> Registry {
        let mut registry = Registry::new();
        for (i, millis) in scores.iter().enumerate() {
            let endpoint = format!("10.0.0.{}", i + 1).parse().unwrap();
            registry.merge_one(endpoint, "test");
            let score = match millis {
                Some(ms) => LatencyScore::Reachable(Duration::from_millis(*ms)),
                None => LatencyScore::Unreachable,
            };
            registry.attach_score(&endpoint, score);
        }
        registry
    }

    fn identities(list: &RankedList) -> Vec<String> {
        list.iter().map(|e| e.endpoint.to_string()).collect()
    }

    #[test]
    fn zero_k_is_a_configuration_error() {
        let registry = registry_with_scores(&[Some(10)]);
        assert_eq!(select(&registry, 0), Err(ConfigError::InvalidTopK(0)));
    }

    #[test]
    fn length_is_min_of_k_and_registry_size() {
        let registry = registry_with_scores(&[Some(10), Some(20), Some(30)]);
        assert_eq!(select(&registry, 2).unwrap().len(), 2);
        assert_eq!(select(&registry, 10).unwrap().len(), 3);
    }

    #[test]
    fn finite_scores_come_first_in_ascending_order() {
        // Ordinals 1..=5 with latencies [unreachable, 50, unreachable, 10, 30].
        let registry = registry_with_scores(&[None, Some(50), None, Some(10), Some(30)]);

        let top_two = select(&registry, 2).unwrap();
        assert_eq!(identities(&top_two), vec!["10.0.0.4", "10.0.0.3"]);

        let all = select(&registry, 5).unwrap();
        let scores: Vec<LatencyScore> = all.iter().map(|e| e.score).collect();
        for pair in scores.windows(2) {
            assert!(pair[0] <= pair[1], "shortlist out of order: {scores:?}");
        }
        assert!(scores[3].is_unreachable() && scores[4].is_unreachable());
    }

    #[test]
    fn equal_scores_break_ties_on_first_seen_ordinal() {
        let mut registry = Registry::new();
        for i in 0..8u8 {
            registry.merge_one(format!("10.0.1.{i}").parse().unwrap(), "test");
        }
        // Identical finite latency on ordinals 7 and 3; attach in the
        // "wrong" order to prove completion timing does not matter.
        let tied = LatencyScore::Reachable(Duration::from_millis(25));
        registry.attach_score(&"10.0.1.7".parse().unwrap(), tied);
        registry.attach_score(&"10.0.1.3".parse().unwrap(), tied);

        for _ in 0..3 {
            let list = select(&registry, 2).unwrap();
            assert_eq!(identities(&list), vec!["10.0.1.3", "10.0.1.7"]);
        }
    }

    #[test]
    fn unprobed_candidates_rank_as_unreachable() {
        let mut registry = registry_with_scores(&[Some(40)]);
        registry.merge_one("10.0.0.99".parse().unwrap(), "test");

        let list = select(&registry, 2).unwrap();
        assert_eq!(identities(&list), vec!["10.0.0.1", "10.0.0.99"]);
        assert!(list.iter().nth(1).unwrap().score.is_unreachable());
    }
}
