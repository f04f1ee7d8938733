//! Resolver Configuration

use crate::{BindingError, BindingResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// What to do when a route's service lookup fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchFailurePolicy {
    /// Fail the whole grouping pass; no partial result is returned
    #[default]
    Abort,
    /// Drop only the unresolved route and keep grouping
    SkipRoute,
}

/// Resolver configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    pub fetch_failure_policy: FetchFailurePolicy,
}

impl ResolverConfig {
    /// Load from a TOML file. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> BindingResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> BindingResult<Self> {
        toml::from_str(content).map_err(|e| BindingError::Config(e.to_string()))
    }

    pub fn with_fetch_failure_policy(mut self, policy: FetchFailurePolicy) -> Self {
        self.fetch_failure_policy = policy;
        self
    }
}
