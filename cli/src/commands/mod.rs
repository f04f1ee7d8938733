//! CLI Commands

pub mod resolve;
pub mod tenants;

use crate::Selection;
use anyhow::Context;
use plugin_binding::{PluginBindingResolver, PluginRef, ResolverConfig, Snapshot};
use std::sync::Arc;

/// Snapshot and resolver prepared for one command invocation
pub struct Session {
    pub snapshot: Arc<Snapshot>,
    pub plugin: PluginRef,
    pub resolver: PluginBindingResolver,
}

impl Session {
    pub fn open(selection: &Selection, config: ResolverConfig) -> anyhow::Result<Self> {
        let snapshot = Snapshot::load(&selection.snapshot)
            .with_context(|| format!("loading snapshot {}", selection.snapshot.display()))?;
        let snapshot = Arc::new(snapshot);
        let plugin = PluginRef::new(&selection.namespace, &selection.plugin);

        tracing::info!(
            "Loaded snapshot with {} consumers, {} groups, {} routes, {} services",
            snapshot.consumers.len(),
            snapshot.consumer_groups.len(),
            snapshot.routes.len(),
            snapshot.services.len(),
        );

        let resolver = PluginBindingResolver::new(snapshot.clone(), config);
        Ok(Self {
            snapshot,
            plugin,
            resolver,
        })
    }
}
