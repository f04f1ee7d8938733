//! Plugin reference annotations
//!
//! Entities opt into plugins with `konghq.com/plugins: "a, b, other-ns:c"`.
//! An entry without a namespace refers to a plugin in the entity's own
//! namespace.

use crate::entities::ObjectMeta;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Annotation listing the plugins applied to an entity
pub const PLUGINS_ANNOTATION: &str = "konghq.com/plugins";

/// Namespaced plugin identity
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PluginRef {
    pub namespace: String,
    pub name: String,
}

impl PluginRef {
    pub fn new(namespace: &str, name: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            name: name.to_string(),
        }
    }
}

impl fmt::Display for PluginRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// Parse the plugin references declared on an object
pub fn plugin_refs(meta: &ObjectMeta) -> Vec<PluginRef> {
    let Some(value) = meta.annotations.get(PLUGINS_ANNOTATION) else {
        return Vec::new();
    };

    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| match entry.split_once(':') {
            Some((ns, name)) => {
                let (ns, name) = (ns.trim(), name.trim());
                (!ns.is_empty() && !name.is_empty()).then(|| PluginRef::new(ns, name))
            }
            None => Some(PluginRef::new(&meta.namespace, entry)),
        })
        .collect()
}

/// Whether the object references `plugin`
pub fn references(meta: &ObjectMeta, plugin: &PluginRef) -> bool {
    plugin_refs(meta).iter().any(|p| p == plugin)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(value: &str) -> ObjectMeta {
        let mut meta = ObjectMeta::new("team-a", "obj");
        meta.annotations.insert(PLUGINS_ANNOTATION.to_string(), value.to_string());
        meta
    }

    #[test]
    fn test_parse_list() {
        let refs = plugin_refs(&meta(" rate-limit ,, shared:auth,cors "));
        assert_eq!(
            refs,
            vec![
                PluginRef::new("team-a", "rate-limit"),
                PluginRef::new("shared", "auth"),
                PluginRef::new("team-a", "cors"),
            ]
        );
    }

    #[test]
    fn test_malformed_entries_dropped() {
        assert!(plugin_refs(&meta(":auth, shared:")).is_empty());
    }

    #[test]
    fn test_missing_annotation() {
        assert!(plugin_refs(&ObjectMeta::new("default", "obj")).is_empty());
    }

    #[test]
    fn test_references_is_namespace_aware() {
        let m = meta("auth");
        assert!(references(&m, &PluginRef::new("team-a", "auth")));
        assert!(!references(&m, &PluginRef::new("team-b", "auth")));
    }
}
