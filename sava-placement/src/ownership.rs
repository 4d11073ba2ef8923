use crate::errors::{PlacementError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

/// Broker identifier, "host:port"-like string.
pub type BrokerId = String;

/// A namespace bundle: the unit of ownership handed to a broker.
///
/// A namespace aggregates one or more bundles; each bundle covers a key-range
/// of the namespace, named like `0x00000000_0xffffffff`. The qualified form
/// is `{namespace}/{range}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NamespaceBundle {
    pub namespace: String,
    pub range: String,
}

impl NamespaceBundle {
    pub fn new(namespace: impl Into<String>, range: impl Into<String>) -> Self {
        NamespaceBundle {
            namespace: namespace.into(),
            range: range.into(),
        }
    }
}

impl fmt::Display for NamespaceBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.range)
    }
}

impl FromStr for NamespaceBundle {
    type Err = PlacementError;

    /// Parses a qualified bundle name, e.g. `my-tenant/my-ns/0x00000000_0xffffffff`.
    /// The range is everything after the last `/` and must be a `lower_upper` pair.
    fn from_str(s: &str) -> Result<Self> {
        let (namespace, range) = s
            .rsplit_once('/')
            .ok_or_else(|| PlacementError::InvalidBundle(s.to_string()))?;
        if namespace.is_empty() || range.is_empty() || !range.contains('_') {
            return Err(PlacementError::InvalidBundle(s.to_string()));
        }
        Ok(NamespaceBundle::new(namespace, range))
    }
}

/// OwnershipSnapshot is a read-only view of which broker owns which bundles,
/// together with the anti-affinity group each namespace is tagged with.
///
/// The surrounding service refreshes this snapshot asynchronously from the
/// metadata store; it is eventually consistent and staleness is tolerated.
/// The decision functions in this crate only read it — the mutators below
/// exist for the watcher that rebuilds the snapshot and for tests.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OwnershipSnapshot {
    /// broker -> namespace -> owned bundle ranges
    assignments: HashMap<BrokerId, HashMap<String, BTreeSet<String>>>,
    /// namespace -> anti-affinity group name
    groups: HashMap<String, String>,
}

impl OwnershipSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tags a namespace with an anti-affinity group (many namespaces to one group).
    pub fn set_group(&mut self, namespace: impl Into<String>, group: impl Into<String>) {
        self.groups.insert(namespace.into(), group.into());
    }

    /// Removes the anti-affinity tag of a namespace, making it exempt from filtering.
    pub fn clear_group(&mut self, namespace: &str) {
        self.groups.remove(namespace);
    }

    /// The anti-affinity group of a namespace, if it is tagged with one.
    pub fn group_of(&self, namespace: &str) -> Option<&str> {
        self.groups.get(namespace).map(String::as_str)
    }

    /// Records that `broker` owns `range` of `namespace`.
    ///
    /// A bundle is owned by at most one broker at any instant, so the range is
    /// first dropped from any previous owner before being recorded.
    pub fn assign(&mut self, broker: impl Into<BrokerId>, namespace: &str, range: &str) {
        let broker = broker.into();
        self.remove_owner_of(namespace, range);
        self.assignments
            .entry(broker)
            .or_default()
            .entry(namespace.to_string())
            .or_default()
            .insert(range.to_string());
    }

    /// Removes one bundle assignment, e.g. after an unload completed.
    pub fn remove_assignment(&mut self, broker: &str, namespace: &str, range: &str) {
        if let Some(namespaces) = self.assignments.get_mut(broker) {
            if let Some(ranges) = namespaces.get_mut(namespace) {
                ranges.remove(range);
                if ranges.is_empty() {
                    namespaces.remove(namespace);
                }
            }
            if namespaces.is_empty() {
                self.assignments.remove(broker);
            }
        }
    }

    /// Drops all assignments of a deleted namespace, on every broker.
    pub fn remove_namespace(&mut self, namespace: &str) {
        self.assignments.retain(|_, namespaces| {
            namespaces.remove(namespace);
            !namespaces.is_empty()
        });
    }

    /// The bundle ranges of `namespace` currently owned by `broker`.
    pub fn bundles_owned_by(&self, broker: &str, namespace: &str) -> Option<&BTreeSet<String>> {
        self.assignments.get(broker)?.get(namespace)
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Brokers that own at least one namespace of `group` other than
    /// `excluded_namespace` (the namespace currently being placed).
    pub fn brokers_owning_group(
        &self,
        group: &str,
        excluded_namespace: &str,
    ) -> BTreeSet<BrokerId> {
        self.assignments
            .iter()
            .filter(|(_, namespaces)| {
                namespaces.iter().any(|(ns, ranges)| {
                    ns != excluded_namespace
                        && !ranges.is_empty()
                        && self.group_of(ns) == Some(group)
                })
            })
            .map(|(broker, _)| broker.clone())
            .collect()
    }

    /// Per-broker count of distinct namespaces of `group` it currently owns.
    /// Brokers owning no namespace of the group are absent from the map.
    pub fn group_counts(&self, group: &str) -> HashMap<BrokerId, usize> {
        self.assignments
            .iter()
            .filter_map(|(broker, namespaces)| {
                let count = namespaces
                    .iter()
                    .filter(|(ns, ranges)| !ranges.is_empty() && self.group_of(ns) == Some(group))
                    .count();
                (count > 0).then(|| (broker.clone(), count))
            })
            .collect()
    }

    fn remove_owner_of(&mut self, namespace: &str, range: &str) {
        let previous = self.assignments.iter().find_map(|(broker, namespaces)| {
            namespaces
                .get(namespace)
                .is_some_and(|ranges| ranges.contains(range))
                .then(|| broker.clone())
        });
        if let Some(broker) = previous {
            self.remove_assignment(&broker, namespace, range);
        }
    }
}
