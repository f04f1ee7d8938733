//! Tenant Resolver
//!
//! Determines the control plane owning an entity. Consumers, consumer groups
//! and services carry the reference themselves. Routes may instead point at a
//! service, in which case the service is fetched and its control plane used.

use crate::entities::{ControlPlaneScoped, Route};
use crate::refs::TenantKey;
use crate::repository::ServiceRepository;
use crate::{BindingError, BindingResult};
use std::sync::Arc;
use tracing::debug;

/// Resolves entities to their owning control plane
pub struct TenantResolver {
    services: Arc<dyn ServiceRepository>,
}

impl TenantResolver {
    pub fn new(services: Arc<dyn ServiceRepository>) -> Self {
        Self { services }
    }

    /// Resolve from the entity's own control plane reference.
    ///
    /// Returns `None` when the entity has no reference, or one that does not
    /// identify an in-cluster control plane.
    pub fn resolve_direct<E: ControlPlaneScoped>(&self, entity: &E) -> Option<TenantKey> {
        let meta = entity.metadata();
        let key = entity
            .control_plane_ref()
            .and_then(|cp| cp.tenant_key(&meta.namespace));
        if key.is_none() {
            debug!("No control plane for {}", entity.entity_ref());
        }
        key
    }

    /// Resolve a route directly, or through the service it references.
    ///
    /// `Ok(None)` means the route has neither reference (or the service has
    /// no control plane). A failed service lookup is returned as an error.
    pub async fn resolve_route(&self, route: &Route) -> BindingResult<Option<TenantKey>> {
        let meta = &route.metadata;
        if let Some(cp) = route.control_plane_ref.as_ref() {
            let key = cp.tenant_key(&meta.namespace);
            if key.is_none() {
                debug!("No control plane for {}", route.entity_ref());
            }
            return Ok(key);
        }

        let Some(service_ref) = route.service_ref.as_ref() else {
            debug!("{} has neither control plane nor service reference", route.entity_ref());
            return Ok(None);
        };

        let service = self
            .services
            .get(&meta.namespace, &service_ref.name)
            .await
            .map_err(|source| BindingError::ResolutionFetch {
                route: route.entity_ref(),
                service: service_ref.name.clone(),
                source,
            })?;

        Ok(self.resolve_direct(&service))
    }
}
