use crate::domains::FailureDomainSnapshot;
use crate::ownership::{BrokerId, NamespaceBundle, OwnershipSnapshot};
use std::collections::BTreeSet;
use tracing::debug;

/// Narrows a candidate broker set to the brokers that do not violate the
/// anti-affinity constraint of the target bundle's namespace.
///
/// Filtering degrades gracefully, in strict order:
/// 1. keep the candidates whose failure domain hosts no other namespace of
///    the group (when domain data is available);
/// 2. failing that, keep the candidates that themselves own no other
///    namespace of the group;
/// 3. failing that, return the candidates unchanged — the constraint is
///    infeasible and placement must still make progress.
///
/// The result is therefore never empty for a non-empty input. An ungrouped
/// namespace is exempt and passes the candidates through untouched.
pub fn filter_anti_affinity_group_owned_brokers(
    bundle: &NamespaceBundle,
    candidates: &BTreeSet<BrokerId>,
    ownership: &OwnershipSnapshot,
    domains: Option<&FailureDomainSnapshot>,
) -> BTreeSet<BrokerId> {
    let Some(group) = ownership.group_of(&bundle.namespace) else {
        return candidates.clone();
    };

    let owned_brokers = ownership.brokers_owning_group(group, &bundle.namespace);
    if owned_brokers.is_empty() {
        return candidates.clone();
    }

    // Domain-level spread takes priority over broker-level spread. An empty
    // snapshot means domains are disabled for the cluster.
    if let Some(domains) = domains.filter(|d| !d.is_empty()) {
        let owned_domains: BTreeSet<&str> = owned_brokers
            .iter()
            .filter_map(|broker| domains.domain_of(broker))
            .collect();

        // A candidate with no domain registration counts as domain-free.
        let domain_free: BTreeSet<BrokerId> = candidates
            .iter()
            .filter(|broker| {
                domains
                    .domain_of(broker)
                    .is_none_or(|domain| !owned_domains.contains(domain))
            })
            .cloned()
            .collect();

        if !domain_free.is_empty() {
            debug!(
                bundle = %bundle,
                group = %group,
                candidates = domain_free.len(),
                "anti-affinity filter kept domain-free candidates"
            );
            return domain_free;
        }
        // Every domain already hosts a group member; fall through to
        // broker-level filtering over the original candidates.
    }

    let broker_free: BTreeSet<BrokerId> = candidates
        .iter()
        .filter(|broker| !owned_brokers.contains(*broker))
        .cloned()
        .collect();

    if !broker_free.is_empty() {
        debug!(
            bundle = %bundle,
            group = %group,
            candidates = broker_free.len(),
            "anti-affinity filter kept group-free candidates"
        );
        return broker_free;
    }

    // Every candidate already owns a namespace of the group: the constraint
    // is infeasible, return the unfiltered set so the assignment can proceed.
    debug!(
        bundle = %bundle,
        group = %group,
        "anti-affinity constraint infeasible, keeping all candidates"
    );
    candidates.clone()
}
