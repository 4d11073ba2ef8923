use crate::ownership::BrokerId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Failure domain admin record, as persisted by cluster administration under
/// the cluster policies path (e.g. rack or power-zone membership).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FailureDomain {
    pub brokers: BTreeSet<BrokerId>,
}

/// FailureDomainSnapshot maps each broker to the failure domain it belongs to.
///
/// Rebuilt asynchronously by the cluster watcher whenever domain policies
/// change; the decision functions receive it as an optional read-only
/// argument (`None` when failure domains are disabled for the cluster).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FailureDomainSnapshot {
    broker_to_domain: HashMap<BrokerId, String>,
}

impl FailureDomainSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the snapshot from the full set of domain records, keyed by
    /// domain id, as read from the metadata store.
    pub fn from_domain_records(records: &HashMap<String, FailureDomain>) -> Self {
        let mut snapshot = Self::new();
        for (domain, record) in records {
            snapshot.insert_domain(domain, record.brokers.iter().cloned());
        }
        snapshot
    }

    /// Registers the brokers of one domain. A broker belongs to at most one
    /// domain: re-listing it under a new domain moves it there.
    pub fn insert_domain(
        &mut self,
        domain: impl Into<String>,
        brokers: impl IntoIterator<Item = BrokerId>,
    ) {
        let domain = domain.into();
        for broker in brokers {
            self.broker_to_domain.insert(broker, domain.clone());
        }
    }

    /// The domain of a broker, or `None` when the broker is not registered to
    /// any domain (treated as domain-unknown by the candidate filter).
    pub fn domain_of(&self, broker: &str) -> Option<&str> {
        self.broker_to_domain.get(broker).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.broker_to_domain.is_empty()
    }

    pub fn len(&self) -> usize {
        self.broker_to_domain.len()
    }
}
