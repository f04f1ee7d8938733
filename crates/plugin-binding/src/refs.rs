//! Reference Value Objects
//!
//! Identifiers passed between the resolver stages:
//! - `EntityRef`: one consumer, consumer group, route or service
//! - `TenantKey`: the owning control plane
//! - `ControlPlaneRef` / `ServiceRef`: references as carried by entities

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a bindable entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Consumer,
    ConsumerGroup,
    Route,
    Service,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Consumer => "consumer",
            Self::ConsumerGroup => "consumer_group",
            Self::Route => "route",
            Self::Service => "service",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference to a single entity (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityRef {
    pub kind: EntityKind,
    pub namespace: String,
    pub name: String,
}

impl EntityRef {
    pub fn new(kind: EntityKind, namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind,
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}/{}", self.kind, self.namespace, self.name)
    }
}

/// Control plane identity used to group relation sets
///
/// Two entities with equal keys belong to the same control plane regardless
/// of how the key was resolved.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TenantKey {
    pub namespace: String,
    pub name: String,
}

impl TenantKey {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for TenantKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// Reference from an entity to its control plane
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControlPlaneRef {
    /// Control plane object in the cluster, namespace defaults to the
    /// referencing entity's namespace
    KonnectNamespacedRef {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        namespace: Option<String>,
    },
    /// Control plane addressed by its remote ID
    KonnectId { id: String },
    /// Self-managed control plane
    Kic,
}

impl ControlPlaneRef {
    /// Namespaced reference in the entity's own namespace
    pub fn namespaced(name: &str) -> Self {
        Self::KonnectNamespacedRef {
            name: name.to_string(),
            namespace: None,
        }
    }

    /// Namespaced reference in an explicit namespace
    pub fn namespaced_in(namespace: &str, name: &str) -> Self {
        Self::KonnectNamespacedRef {
            name: name.to_string(),
            namespace: Some(namespace.to_string()),
        }
    }

    /// Tenant key for an entity living in `entity_namespace`, if this
    /// reference form identifies one.
    pub fn tenant_key(&self, entity_namespace: &str) -> Option<TenantKey> {
        match self {
            Self::KonnectNamespacedRef { name, namespace } if !name.is_empty() => {
                let ns = namespace.as_deref().unwrap_or(entity_namespace);
                Some(TenantKey::new(ns, name.as_str()))
            }
            _ => None,
        }
    }
}

/// Reference from a route to a service in the route's namespace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRef {
    pub name: String,
}

impl ServiceRef {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}
