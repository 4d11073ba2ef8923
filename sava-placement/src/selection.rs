use crate::anti_affinity::filter_anti_affinity_group_owned_brokers;
use crate::domains::FailureDomainSnapshot;
use crate::errors::{PlacementError, Result};
use crate::ownership::{BrokerId, NamespaceBundle, OwnershipSnapshot};
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Picks exactly one broker for a new bundle assignment.
///
/// The anti-affinity filter is applied first; load scoring then runs over the
/// filtered set only, so load-based ties among compliant brokers are resolved
/// by load, never by iteration order. The scorer is supplied by the resource
/// monitor (lower is better). Ties on the score go to the lexicographically
/// smallest broker id, keeping the decision reproducible across brokers that
/// hold the same snapshot.
///
/// Fails with `PlacementError::NoAvailableBroker` when `candidates` is empty
/// before filtering; the caller retries with a refreshed candidate list.
pub fn select_broker_for_assignment<F>(
    bundle: &NamespaceBundle,
    candidates: &BTreeSet<BrokerId>,
    ownership: &OwnershipSnapshot,
    domains: Option<&FailureDomainSnapshot>,
    score: F,
) -> Result<BrokerId>
where
    F: Fn(&str) -> f64,
{
    if candidates.is_empty() {
        warn!(bundle = %bundle, "no candidate brokers for assignment");
        return Err(PlacementError::NoAvailableBroker);
    }

    let filtered = filter_anti_affinity_group_owned_brokers(bundle, candidates, ownership, domains);

    // BTreeSet iteration is ordered by broker id, and only a strictly lower
    // score replaces the current best, so ties keep the smallest id.
    let mut best: Option<(&BrokerId, f64)> = None;
    for broker in &filtered {
        let broker_score = score(broker);
        match best {
            Some((_, best_score)) if broker_score >= best_score => {}
            _ => best = Some((broker, broker_score)),
        }
    }

    // filtered is non-empty whenever candidates is, checked above
    let (broker, broker_score) = best.ok_or(PlacementError::NoAvailableBroker)?;
    debug!(
        bundle = %bundle,
        broker = %broker,
        score = broker_score,
        "selected broker for bundle assignment"
    );
    Ok(broker.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const RANGE: &str = "0x00000000_0xffffffff";

    fn bundle(namespace: &str) -> NamespaceBundle {
        NamespaceBundle::new(namespace, RANGE)
    }

    fn broker_set(brokers: &[&str]) -> BTreeSet<BrokerId> {
        brokers.iter().map(|b| b.to_string()).collect()
    }

    #[test]
    fn test_empty_candidates_is_an_error() {
        let ownership = OwnershipSnapshot::new();
        let result = select_broker_for_assignment(
            &bundle("ns0"),
            &BTreeSet::new(),
            &ownership,
            None,
            |_| 0.0,
        );
        assert!(matches!(result, Err(PlacementError::NoAvailableBroker)));
    }

    #[test]
    fn test_lowest_score_wins() {
        let ownership = OwnershipSnapshot::new();
        let loads: HashMap<&str, f64> = [("b0", 3.0), ("b1", 1.0), ("b2", 2.0)].into();

        let selected = select_broker_for_assignment(
            &bundle("ns0"),
            &broker_set(&["b0", "b1", "b2"]),
            &ownership,
            None,
            |broker| loads[broker],
        )
        .unwrap();
        assert_eq!(selected, "b1");
    }

    #[test]
    fn test_score_ties_break_on_lowest_broker_id() {
        let ownership = OwnershipSnapshot::new();
        let selected = select_broker_for_assignment(
            &bundle("ns0"),
            &broker_set(&["b2", "b0", "b1"]),
            &ownership,
            None,
            |_| 1.0,
        )
        .unwrap();
        assert_eq!(selected, "b0");
    }

    /// The least loaded broker loses to a more loaded one when it already
    /// owns a namespace of the group: filtering runs before scoring.
    #[test]
    fn test_anti_affinity_overrides_load() {
        let mut ownership = OwnershipSnapshot::new();
        ownership.set_group("ns0", "group");
        ownership.set_group("ns1", "group");
        ownership.assign("b0", "ns0", RANGE);

        let loads: HashMap<&str, f64> = [("b0", 0.0), ("b1", 10.0)].into();
        let selected = select_broker_for_assignment(
            &bundle("ns1"),
            &broker_set(&["b0", "b1"]),
            &ownership,
            None,
            |broker| loads[broker],
        )
        .unwrap();
        assert_eq!(selected, "b1");
    }

    /// Two namespaces of one group land on brokers of different failure
    /// domains, whatever the load says.
    #[test]
    fn test_grouped_namespaces_spread_across_domains() {
        let mut ownership = OwnershipSnapshot::new();
        ownership.set_group("prop/ns1", "group");
        ownership.set_group("prop/ns2", "group");

        let mut domains = FailureDomainSnapshot::new();
        domains.insert_domain("domain1", ["broker-1:8080".to_string()]);
        domains.insert_domain("domain2", ["broker-2:8080".to_string()]);

        let candidates = broker_set(&["broker-1:8080", "broker-2:8080"]);

        let first = select_broker_for_assignment(
            &bundle("prop/ns1"),
            &candidates,
            &ownership,
            Some(&domains),
            |_| 0.0,
        )
        .unwrap();
        ownership.assign(first.clone(), "prop/ns1", RANGE);

        let second = select_broker_for_assignment(
            &bundle("prop/ns2"),
            &candidates,
            &ownership,
            Some(&domains),
            |_| 0.0,
        )
        .unwrap();

        assert_ne!(first, second);
    }
}
