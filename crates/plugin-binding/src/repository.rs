//! Service Repository - read-only lookup used for indirect tenant resolution
//!
//! A route without a direct control plane reference is resolved through its
//! service. The lookup is injected so the resolver can run against a live
//! store, a snapshot or a test double.

use crate::entities::Service;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Repository result type
pub type RepoResult<T> = Result<T, RepositoryError>;

/// Repository errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("storage error: {0}")]
    StorageError(String),
}

/// Service lookup by namespace and name
#[async_trait]
pub trait ServiceRepository: Send + Sync {
    async fn get(&self, namespace: &str, name: &str) -> RepoResult<Service>;
}

/// In-memory service repository (for testing and snapshot runs)
pub struct InMemoryServiceRepository {
    services: RwLock<HashMap<(String, String), Service>>,
}

impl InMemoryServiceRepository {
    pub fn new() -> Self {
        Self {
            services: RwLock::new(HashMap::new()),
        }
    }

    /// Insert or replace a service
    pub fn insert(&self, service: Service) {
        let key = (
            service.metadata.namespace.clone(),
            service.metadata.name.clone(),
        );
        self.services.write().insert(key, service);
    }

    pub fn remove(&self, namespace: &str, name: &str) -> Option<Service> {
        self.services
            .write()
            .remove(&(namespace.to_string(), name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.services.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.read().is_empty()
    }
}

impl Default for InMemoryServiceRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<Service> for InMemoryServiceRepository {
    fn from_iter<I: IntoIterator<Item = Service>>(iter: I) -> Self {
        let repo = Self::new();
        for service in iter {
            repo.insert(service);
        }
        repo
    }
}

#[async_trait]
impl ServiceRepository for InMemoryServiceRepository {
    async fn get(&self, namespace: &str, name: &str) -> RepoResult<Service> {
        self.services
            .read()
            .get(&(namespace.to_string(), name.to_string()))
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(format!("{}/{}", namespace, name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_service_repository() {
        let repo = InMemoryServiceRepository::new();
        repo.insert(Service::new("default", "s1"));

        let found = repo.get("default", "s1").await.unwrap();
        assert_eq!(found.metadata.name, "s1");

        // Namespaces are distinct scopes
        let err = repo.get("other", "s1").await.unwrap_err();
        assert_eq!(err, RepositoryError::NotFound("other/s1".into()));

        assert!(repo.remove("default", "s1").is_some());
        assert!(repo.is_empty());
    }

    #[test]
    fn test_from_iter_replaces_duplicates() {
        let repo: InMemoryServiceRepository = vec![
            Service::new("default", "s1"),
            Service::new("default", "s1"),
            Service::new("default", "s2"),
        ]
        .into_iter()
        .collect();
        assert_eq!(repo.len(), 2);

        let s2 = tokio_test::block_on(repo.get("default", "s2")).unwrap();
        assert_eq!(s2.metadata.name, "s2");
    }
}
