//! Relation Grouper
//!
//! Partitions the entities referencing a plugin into one relation set per
//! owning control plane. Input order within each kind is preserved.

use crate::config::{FetchFailurePolicy, ResolverConfig};
use crate::entities::{Consumer, ConsumerGroup, ControlPlaneScoped, Route, Service};
use crate::refs::{EntityRef, TenantKey};
use crate::resolver::TenantResolver;
use crate::{BindingError, BindingResult};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Entities of a single control plane that reference one plugin
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RelationSet {
    pub consumers: Vec<EntityRef>,
    pub consumer_groups: Vec<EntityRef>,
    pub routes: Vec<EntityRef>,
    pub services: Vec<EntityRef>,
}

impl RelationSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.consumers.is_empty()
            && self.consumer_groups.is_empty()
            && self.routes.is_empty()
            && self.services.is_empty()
    }

    /// Total number of entities across all kinds
    pub fn len(&self) -> usize {
        self.consumers.len() + self.consumer_groups.len() + self.routes.len() + self.services.len()
    }
}

/// Groups entities by control plane
pub struct RelationGrouper {
    resolver: TenantResolver,
    config: ResolverConfig,
}

impl RelationGrouper {
    pub fn new(resolver: TenantResolver, config: ResolverConfig) -> Self {
        Self { resolver, config }
    }

    /// Group the four entity collections into per-control-plane relation sets.
    ///
    /// Entities without a resolvable control plane are skipped. With the
    /// default `Abort` policy a failed route -> service lookup fails the whole
    /// call and no map is returned.
    pub async fn group(
        &self,
        consumers: &[Consumer],
        consumer_groups: &[ConsumerGroup],
        routes: &[Route],
        services: &[Service],
    ) -> BindingResult<BTreeMap<TenantKey, RelationSet>> {
        let mut relations: BTreeMap<TenantKey, RelationSet> = BTreeMap::new();

        for consumer in consumers {
            if let Some(key) = self.resolver.resolve_direct(consumer) {
                relations.entry(key).or_default().consumers.push(consumer.entity_ref());
            }
        }

        for group in consumer_groups {
            if let Some(key) = self.resolver.resolve_direct(group) {
                relations.entry(key).or_default().consumer_groups.push(group.entity_ref());
            }
        }

        for route in routes {
            if let Some(key) = self.resolve_route(route).await? {
                relations.entry(key).or_default().routes.push(route.entity_ref());
            }
        }

        for service in services {
            if let Some(key) = self.resolver.resolve_direct(service) {
                relations.entry(key).or_default().services.push(service.entity_ref());
            }
        }

        debug!(
            "Grouped {} entities into {} control planes",
            relations.values().map(RelationSet::len).sum::<usize>(),
            relations.len()
        );

        Ok(relations)
    }

    async fn resolve_route(&self, route: &Route) -> BindingResult<Option<TenantKey>> {
        match self.resolver.resolve_route(route).await {
            Ok(key) => Ok(key),
            Err(err @ BindingError::ResolutionFetch { .. })
                if self.config.fetch_failure_policy == FetchFailurePolicy::SkipRoute =>
            {
                warn!("Skipping route: {}", err);
                Ok(None)
            }
            Err(err) => {
                warn!("Aborting grouping: {}", err);
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::refs::{ControlPlaneRef, EntityKind};
    use crate::repository::{
        InMemoryServiceRepository, RepoResult, RepositoryError, ServiceRepository,
    };
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::Arc;

    /// Repository that records lookups and fails for selected names
    struct RecordingRepository {
        inner: InMemoryServiceRepository,
        failing: Vec<String>,
        calls: Mutex<Vec<String>>,
    }

    impl RecordingRepository {
        fn new(services: Vec<Service>, failing: &[&str]) -> Self {
            Self {
                inner: services.into_iter().collect(),
                failing: failing.iter().map(|s| s.to_string()).collect(),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ServiceRepository for RecordingRepository {
        async fn get(&self, namespace: &str, name: &str) -> RepoResult<Service> {
            self.calls.lock().push(name.to_string());
            if self.failing.iter().any(|f| f == name) {
                return Err(RepositoryError::StorageError("connection reset".into()));
            }
            self.inner.get(namespace, name).await
        }
    }

    fn cp(name: &str) -> ControlPlaneRef {
        ControlPlaneRef::namespaced(name)
    }

    fn grouper(repo: Arc<RecordingRepository>, policy: FetchFailurePolicy) -> RelationGrouper {
        RelationGrouper::new(
            TenantResolver::new(repo),
            ResolverConfig::default().with_fetch_failure_policy(policy),
        )
    }

    fn names(refs: &[EntityRef]) -> Vec<&str> {
        refs.iter().map(|r| r.name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_group_preserves_input_order() {
        let repo = Arc::new(RecordingRepository::new(vec![], &[]));
        let g = grouper(repo, FetchFailurePolicy::Abort);

        let consumers = vec![
            Consumer::new("default", "c2").with_control_plane(cp("cp")),
            Consumer::new("default", "c1").with_control_plane(cp("cp")),
            Consumer::new("default", "c3").with_control_plane(cp("cp")),
        ];

        let relations = g.group(&consumers, &[], &[], &[]).await.unwrap();
        let set = &relations[&TenantKey::new("default", "cp")];
        assert_eq!(names(&set.consumers), vec!["c2", "c1", "c3"]);
        assert!(set.consumers.iter().all(|r| r.kind == EntityKind::Consumer));
    }

    #[tokio::test]
    async fn test_group_separates_tenants() {
        let repo = Arc::new(RecordingRepository::new(vec![], &[]));
        let g = grouper(repo, FetchFailurePolicy::Abort);

        let consumers = vec![
            Consumer::new("default", "c1").with_control_plane(cp("cp-a")),
            Consumer::new("default", "c2").with_control_plane(cp("cp-b")),
        ];
        let groups = vec![ConsumerGroup::new("default", "g1").with_control_plane(cp("cp-b"))];
        let services = vec![
            Service::new("default", "s1").with_control_plane(cp("cp-a")),
            Service::new("other", "s2").with_control_plane(cp("cp-a")),
        ];

        let relations = g.group(&consumers, &groups, &[], &services).await.unwrap();
        assert_eq!(relations.len(), 3);

        let a = &relations[&TenantKey::new("default", "cp-a")];
        assert_eq!(names(&a.consumers), vec!["c1"]);
        assert_eq!(names(&a.services), vec!["s1"]);
        assert!(a.consumer_groups.is_empty());

        let b = &relations[&TenantKey::new("default", "cp-b")];
        assert_eq!(names(&b.consumers), vec!["c2"]);
        assert_eq!(names(&b.consumer_groups), vec!["g1"]);

        // Same control plane name in another namespace is another tenant
        let other = &relations[&TenantKey::new("other", "cp-a")];
        assert_eq!(names(&other.services), vec!["s2"]);
    }

    #[tokio::test]
    async fn test_group_skips_unscoped_entities() {
        let repo = Arc::new(RecordingRepository::new(vec![], &[]));
        let g = grouper(repo.clone(), FetchFailurePolicy::Abort);

        let consumers = vec![Consumer::new("default", "c1")];
        let routes = vec![Route::new("default", "r1")];
        let services = vec![Service::new("default", "s1").with_control_plane(ControlPlaneRef::Kic)];

        let relations = g.group(&consumers, &[], &routes, &services).await.unwrap();
        assert!(relations.is_empty());
        assert!(repo.calls.lock().is_empty());
    }

    #[tokio::test]
    async fn test_group_route_via_service() {
        let repo = Arc::new(RecordingRepository::new(
            vec![Service::new("default", "s1").with_control_plane(cp("cp"))],
            &[],
        ));
        let g = grouper(repo.clone(), FetchFailurePolicy::Abort);

        let routes = vec![
            Route::new("default", "r1").with_service("s1"),
            Route::new("default", "r2").with_control_plane(cp("cp")),
        ];

        let relations = g.group(&[], &[], &routes, &[]).await.unwrap();
        let set = &relations[&TenantKey::new("default", "cp")];
        assert_eq!(names(&set.routes), vec!["r1", "r2"]);

        // Only the indirect route triggers a lookup
        assert_eq!(*repo.calls.lock(), vec!["s1".to_string()]);
    }

    #[tokio::test]
    async fn test_group_aborts_on_failed_lookup() {
        let repo = Arc::new(RecordingRepository::new(
            vec![Service::new("default", "s2").with_control_plane(cp("cp"))],
            &["s1"],
        ));
        let g = grouper(repo, FetchFailurePolicy::Abort);

        let consumers = vec![Consumer::new("default", "c1").with_control_plane(cp("other"))];
        let routes = vec![
            Route::new("default", "r1").with_service("s1"),
            Route::new("default", "r2").with_service("s2"),
        ];

        let err = g.group(&consumers, &[], &routes, &[]).await.unwrap_err();
        match err {
            BindingError::ResolutionFetch { route, service, source } => {
                assert_eq!(route.name, "r1");
                assert_eq!(service, "s1");
                assert_eq!(source, RepositoryError::StorageError("connection reset".into()));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_group_aborts_on_missing_service() {
        let repo = Arc::new(RecordingRepository::new(vec![], &[]));
        let g = grouper(repo, FetchFailurePolicy::Abort);

        let routes = vec![Route::new("default", "r1").with_service("gone")];
        let err = g.group(&[], &[], &routes, &[]).await.unwrap_err();
        assert!(matches!(
            err,
            BindingError::ResolutionFetch { source: RepositoryError::NotFound(_), .. }
        ));
    }

    #[tokio::test]
    async fn test_group_skip_route_policy() {
        let repo = Arc::new(RecordingRepository::new(
            vec![Service::new("default", "s2").with_control_plane(cp("cp"))],
            &["s1"],
        ));
        let g = grouper(repo.clone(), FetchFailurePolicy::SkipRoute);

        let routes = vec![
            Route::new("default", "r1").with_service("s1"),
            Route::new("default", "r2").with_service("s2"),
        ];

        let relations = g.group(&[], &[], &routes, &[]).await.unwrap();
        let set = &relations[&TenantKey::new("default", "cp")];
        assert_eq!(names(&set.routes), vec!["r2"]);
        assert_eq!(repo.calls.lock().len(), 2);
    }

    #[tokio::test]
    async fn test_group_is_repeatable() {
        let repo = Arc::new(RecordingRepository::new(
            vec![Service::new("default", "s1").with_control_plane(cp("cp"))],
            &[],
        ));
        let g = grouper(repo, FetchFailurePolicy::Abort);

        let consumers = vec![Consumer::new("default", "c1").with_control_plane(cp("cp"))];
        let routes = vec![Route::new("default", "r1").with_service("s1")];

        let first = g.group(&consumers, &[], &routes, &[]).await.unwrap();
        let second = g.group(&consumers, &[], &routes, &[]).await.unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_relation_set_len() {
        let mut set = RelationSet::new();
        assert!(set.is_empty());
        set.routes.push(EntityRef::new(EntityKind::Route, "default", "r1"));
        set.services.push(EntityRef::new(EntityKind::Service, "default", "s1"));
        assert_eq!(set.len(), 2);
        assert!(!set.is_empty());
    }
}
