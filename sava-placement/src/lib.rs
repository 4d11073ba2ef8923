//! # Sava Placement
//!
//! Anti-affinity aware placement decisions for the Sava load manager.
//!
//! ## Core Responsibilities
//!
//! - **Candidate Filtering**: Narrows candidate brokers so namespaces of one
//!   anti-affinity group spread across distinct brokers and failure domains
//! - **Broker Selection**: Composes the filter with an externally supplied
//!   load scorer to pick exactly one broker for a new bundle assignment
//! - **Shedding Advice**: Tells the periodic shedding task whether migrating
//!   an owned bundle would improve anti-affinity distribution
//!
//! ## Architecture
//!
//! Every decision is a pure function over read-only snapshots of cluster
//! metadata ([`OwnershipSnapshot`], [`FailureDomainSnapshot`]) that the
//! surrounding broker refreshes asynchronously from the metadata store.
//! Brokers run these decisions independently against their local caches:
//! anti-affinity is best-effort balancing, a stale snapshot is corrected by
//! the next shedding pass, never treated as an error. Filtering degrades
//! gracefully (domain-level, then broker-level, then unfiltered) so a
//! non-empty candidate set always yields an assignment.

pub mod anti_affinity;
pub mod config;
pub mod domains;
pub mod ownership;
pub mod selection;
pub mod shedding;
mod errors;

// Re-export main types
pub use anti_affinity::filter_anti_affinity_group_owned_brokers;
pub use config::PlacementConfig;
pub use domains::{FailureDomain, FailureDomainSnapshot};
pub use errors::{PlacementError, Result};
pub use ownership::{BrokerId, NamespaceBundle, OwnershipSnapshot};
pub use selection::select_broker_for_assignment;
pub use shedding::should_unload_for_anti_affinity;
