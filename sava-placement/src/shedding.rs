use crate::ownership::{BrokerId, OwnershipSnapshot};
use std::collections::BTreeSet;
use tracing::debug;

/// Decides whether unloading a bundle from its current owner would improve
/// the distribution of its anti-affinity group across the cluster.
///
/// Called by the periodic shedding task for each owned bundle. Returns true
/// iff some peer broker owns strictly fewer namespaces of the group than the
/// current owner, so that migrating the bundle can reduce the skew. Picking
/// the destination is left to the selector once the unload is committed.
///
/// An ungrouped namespace never triggers an unload, and once all peers hold
/// equal counts the advisor reports false — shedding converges.
pub fn should_unload_for_anti_affinity(
    namespace: &str,
    range: &str,
    current_owner: &str,
    ownership: &OwnershipSnapshot,
    peers: &BTreeSet<BrokerId>,
) -> bool {
    let Some(group) = ownership.group_of(namespace) else {
        return false;
    };

    let counts = ownership.group_counts(group);
    let current_count = counts.get(current_owner).copied().unwrap_or(0);

    let least_peer_count = peers
        .iter()
        .filter(|peer| peer.as_str() != current_owner)
        .map(|peer| counts.get(peer).copied().unwrap_or(0))
        .min();

    match least_peer_count {
        Some(least) if least < current_count => {
            debug!(
                namespace = %namespace,
                range = %range,
                group = %group,
                current_owner = %current_owner,
                current_count,
                least,
                "bundle is a candidate for anti-affinity unload"
            );
            true
        }
        _ => false,
    }
}
