//! Kong Entities
//!
//! Snapshot representations of the entities a plugin can be attached to.
//! Only the fields needed for binding resolution are modelled.

use crate::refs::{ControlPlaneRef, EntityKind, EntityRef, ServiceRef};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Object identity and annotations
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectMeta {
    pub namespace: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
}

impl ObjectMeta {
    pub fn new(namespace: &str, name: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            name: name.to_string(),
            annotations: BTreeMap::new(),
        }
    }
}

/// Entity owned by a control plane
pub trait ControlPlaneScoped {
    /// Entity kind
    const KIND: EntityKind;

    fn metadata(&self) -> &ObjectMeta;

    /// Direct control plane reference, if the entity carries one
    fn control_plane_ref(&self) -> Option<&ControlPlaneRef>;

    fn entity_ref(&self) -> EntityRef {
        let meta = self.metadata();
        EntityRef::new(Self::KIND, meta.namespace.as_str(), meta.name.as_str())
    }
}

macro_rules! scoped_entity {
    ($(#[$doc:meta])* $ty:ident, $kind:expr) => {
        $(#[$doc])*
        #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
        pub struct $ty {
            pub metadata: ObjectMeta,
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub control_plane_ref: Option<ControlPlaneRef>,
        }

        impl $ty {
            pub fn new(namespace: &str, name: &str) -> Self {
                Self {
                    metadata: ObjectMeta::new(namespace, name),
                    control_plane_ref: None,
                }
            }

            pub fn with_control_plane(mut self, cp: ControlPlaneRef) -> Self {
                self.control_plane_ref = Some(cp);
                self
            }

            pub fn with_annotation(mut self, key: &str, value: &str) -> Self {
                self.metadata.annotations.insert(key.to_string(), value.to_string());
                self
            }
        }

        impl ControlPlaneScoped for $ty {
            const KIND: EntityKind = $kind;

            fn metadata(&self) -> &ObjectMeta {
                &self.metadata
            }

            fn control_plane_ref(&self) -> Option<&ControlPlaneRef> {
                self.control_plane_ref.as_ref()
            }
        }
    };
}

scoped_entity!(
    /// Kong Consumer
    Consumer,
    EntityKind::Consumer
);

scoped_entity!(
    /// Kong Consumer Group
    ConsumerGroup,
    EntityKind::ConsumerGroup
);

scoped_entity!(
    /// Kong Service
    Service,
    EntityKind::Service
);

/// Kong Route
///
/// A route without its own control plane reference inherits the control
/// plane of the service it points at.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub metadata: ObjectMeta,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_plane_ref: Option<ControlPlaneRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_ref: Option<ServiceRef>,
}

impl Route {
    pub fn new(namespace: &str, name: &str) -> Self {
        Self {
            metadata: ObjectMeta::new(namespace, name),
            control_plane_ref: None,
            service_ref: None,
        }
    }

    pub fn with_control_plane(mut self, cp: ControlPlaneRef) -> Self {
        self.control_plane_ref = Some(cp);
        self
    }

    pub fn with_service(mut self, service: &str) -> Self {
        self.service_ref = Some(ServiceRef::new(service));
        self
    }

    pub fn with_annotation(mut self, key: &str, value: &str) -> Self {
        self.metadata.annotations.insert(key.to_string(), value.to_string());
        self
    }
}

impl ControlPlaneScoped for Route {
    const KIND: EntityKind = EntityKind::Route;

    fn metadata(&self) -> &ObjectMeta {
        &self.metadata
    }

    fn control_plane_ref(&self) -> Option<&ControlPlaneRef> {
        self.control_plane_ref.as_ref()
    }
}
