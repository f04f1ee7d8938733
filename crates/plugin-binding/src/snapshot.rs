//! Entity snapshot
//!
//! A point-in-time bundle of consumers, consumer groups, routes and services,
//! loadable from YAML or JSON. A snapshot also serves service lookups, so a
//! route can be resolved against the services it was captured with.

use crate::annotations::{references, PluginRef};
use crate::entities::{Consumer, ConsumerGroup, Route, Service};
use crate::repository::{RepoResult, RepositoryError, ServiceRepository};
use crate::{BindingError, BindingResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub consumers: Vec<Consumer>,
    pub consumer_groups: Vec<ConsumerGroup>,
    pub routes: Vec<Route>,
    pub services: Vec<Service>,
}

impl Snapshot {
    /// Load from file; `.json` is parsed as JSON, anything else as YAML
    pub fn load(path: impl AsRef<Path>) -> BindingResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        if path.extension().is_some_and(|ext| ext == "json") {
            Self::from_json(&content)
        } else {
            Self::from_yaml(&content)
        }
    }

    pub fn from_yaml(content: &str) -> BindingResult<Self> {
        serde_yaml::from_str(content).map_err(|e| BindingError::Snapshot(e.to_string()))
    }

    pub fn from_json(content: &str) -> BindingResult<Self> {
        serde_json::from_str(content).map_err(|e| BindingError::Snapshot(e.to_string()))
    }

    /// Entities referencing `plugin`, in snapshot order
    pub fn referencing(&self, plugin: &PluginRef) -> Snapshot {
        Snapshot {
            consumers: self
                .consumers
                .iter()
                .filter(|e| references(&e.metadata, plugin))
                .cloned()
                .collect(),
            consumer_groups: self
                .consumer_groups
                .iter()
                .filter(|e| references(&e.metadata, plugin))
                .cloned()
                .collect(),
            routes: self
                .routes
                .iter()
                .filter(|e| references(&e.metadata, plugin))
                .cloned()
                .collect(),
            services: self
                .services
                .iter()
                .filter(|e| references(&e.metadata, plugin))
                .cloned()
                .collect(),
        }
    }
}

#[async_trait]
impl ServiceRepository for Snapshot {
    async fn get(&self, namespace: &str, name: &str) -> RepoResult<Service> {
        self.services
            .iter()
            .find(|s| s.metadata.namespace == namespace && s.metadata.name == name)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(format!("{}/{}", namespace, name)))
    }
}
