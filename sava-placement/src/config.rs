use crate::domains::FailureDomainSnapshot;
use serde::{Deserialize, Serialize};

/// Placement configuration, part of the broker's load manager section in the
/// service configuration file.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlacementConfig {
    /// Spread anti-affinity groups across failure domains when domain
    /// policies are configured for the cluster
    #[serde(default)]
    pub failure_domains_enabled: bool,
    /// Apply anti-affinity filtering during assignment and shedding
    #[serde(default = "default_anti_affinity_enabled")]
    pub anti_affinity_enabled: bool,
}

fn default_anti_affinity_enabled() -> bool {
    true
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            failure_domains_enabled: false,
            anti_affinity_enabled: true,
        }
    }
}

impl PlacementConfig {
    /// The domain snapshot the decision functions should see: `None` unless
    /// failure domains are enabled, which disables domain-level filtering.
    pub fn effective_domains<'a>(
        &self,
        domains: &'a FailureDomainSnapshot,
    ) -> Option<&'a FailureDomainSnapshot> {
        self.failure_domains_enabled.then_some(domains)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PlacementConfig::default();
        assert!(!config.failure_domains_enabled);
        assert!(config.anti_affinity_enabled);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: PlacementConfig = serde_json::from_str("{}").unwrap();
        assert!(!config.failure_domains_enabled);
        assert!(config.anti_affinity_enabled);
    }

    #[test]
    fn test_effective_domains_follows_the_toggle() {
        let mut domains = FailureDomainSnapshot::new();
        domains.insert_domain("domain-0", ["b0".to_string()]);

        let mut config = PlacementConfig::default();
        assert!(config.effective_domains(&domains).is_none());

        config.failure_domains_enabled = true;
        assert!(config.effective_domains(&domains).is_some());
    }
}
