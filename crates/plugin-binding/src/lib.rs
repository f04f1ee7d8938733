//! Plugin Binding Resolution
//!
//! Computes, for a plugin referenced from Kong entities via annotations, the
//! exact set of binding targets per owning control plane:
//! - Tenant resolution (direct or via a route's service)
//! - Relation grouping per control plane
//! - Deterministic combination of consumers/groups with routes/services
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     Plugin Binding Resolver                     │
//! ├─────────────────────────────────────────────────────────────────┤
//! │                                                                 │
//! │   Consumers  ConsumerGroups  Routes  Services   (snapshot)      │
//! │       │            │           │        │                       │
//! │  ┌────▼────────────▼───────────▼────────▼───────────────────┐   │
//! │  │                  Relation Grouper                        │   │
//! │  │   ┌──────────────────┐      ┌─────────────────────────┐  │   │
//! │  │   │ Tenant Resolver  │─────▶│ ServiceRepository (I/O) │  │   │
//! │  │   └──────────────────┘      └─────────────────────────┘  │   │
//! │  └───────────────────────────┬──────────────────────────────┘   │
//! │                              │ {tenant -> RelationSet}          │
//! │  ┌───────────────────────────▼──────────────────────────────┐   │
//! │  │               Combination Generator                      │   │
//! │  └───────────────────────────┬──────────────────────────────┘   │
//! │                              │ {tenant -> [Binding]}            │
//! └──────────────────────────────┼──────────────────────────────────┘
//!                                ▼
//!                      reconciliation loop
//! ```

#![warn(clippy::all)]

use std::collections::BTreeMap;
use std::sync::Arc;

pub mod annotations;
pub mod binding;
pub mod combine;
pub mod config;
pub mod entities;
pub mod refs;
pub mod relations;
pub mod repository;
pub mod resolver;
pub mod snapshot;

// Re-exports
pub use annotations::{plugin_refs, PluginRef, PLUGINS_ANNOTATION};
pub use binding::{Binding, Subject, Target};
pub use combine::combine;
pub use config::{FetchFailurePolicy, ResolverConfig};
pub use entities::{Consumer, ConsumerGroup, ControlPlaneScoped, ObjectMeta, Route, Service};
pub use refs::{ControlPlaneRef, EntityKind, EntityRef, ServiceRef, TenantKey};
pub use relations::{RelationGrouper, RelationSet};
pub use repository::{InMemoryServiceRepository, RepositoryError, ServiceRepository};
pub use resolver::TenantResolver;
pub use snapshot::Snapshot;

// =============================================================================
// Resolver Facade
// =============================================================================

/// Bindings of one plugin, keyed by owning control plane
pub type TenantBindings = BTreeMap<TenantKey, Vec<Binding>>;

/// End-to-end resolver: groups entities per control plane, then combines
/// each relation set into bindings.
pub struct PluginBindingResolver {
    grouper: RelationGrouper,
}

impl PluginBindingResolver {
    /// Create resolver backed by the given service repository
    pub fn new(services: Arc<dyn ServiceRepository>, config: ResolverConfig) -> Self {
        Self {
            grouper: RelationGrouper::new(TenantResolver::new(services), config),
        }
    }

    /// Resolve the bindings of one plugin from the entities referencing it
    pub async fn resolve(
        &self,
        consumers: &[Consumer],
        consumer_groups: &[ConsumerGroup],
        routes: &[Route],
        services: &[Service],
    ) -> BindingResult<TenantBindings> {
        let relations = self
            .grouper
            .group(consumers, consumer_groups, routes, services)
            .await?;

        Ok(relations
            .iter()
            .map(|(tenant, set)| (tenant.clone(), combine(set)))
            .collect())
    }

    /// Resolve the bindings of `plugin` from a snapshot
    pub async fn resolve_snapshot(
        &self,
        snapshot: &Snapshot,
        plugin: &PluginRef,
    ) -> BindingResult<TenantBindings> {
        let selected = snapshot.referencing(plugin);
        tracing::debug!(
            "Plugin {} referenced by {} consumers, {} groups, {} routes, {} services",
            plugin,
            selected.consumers.len(),
            selected.consumer_groups.len(),
            selected.routes.len(),
            selected.services.len(),
        );
        self.resolve(
            &selected.consumers,
            &selected.consumer_groups,
            &selected.routes,
            &selected.services,
        )
        .await
    }

    /// Access the underlying grouper
    pub fn grouper(&self) -> &RelationGrouper {
        &self.grouper
    }
}

// =============================================================================
// Errors
// =============================================================================

/// Result type for binding resolution
pub type BindingResult<T> = Result<T, BindingError>;

#[derive(Debug, thiserror::Error)]
pub enum BindingError {
    /// Indirect control plane lookup (route -> service) failed
    #[error("failed to resolve control plane of {route} via service {service}: {source}")]
    ResolutionFetch {
        route: EntityRef,
        service: String,
        #[source]
        source: RepositoryError,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Snapshot error: {0}")]
    Snapshot(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
