//! Binding - one resolved attachment target of a plugin
//!
//! A binding pairs at most one subject (consumer or consumer group) with at
//! most one target (route or service). At least one side is always present.

use crate::refs::EntityRef;
use serde::Serialize;
use std::fmt;

/// Who the plugin applies to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Subject {
    Consumer(EntityRef),
    ConsumerGroup(EntityRef),
}

impl Subject {
    pub fn entity(&self) -> &EntityRef {
        match self {
            Self::Consumer(r) | Self::ConsumerGroup(r) => r,
        }
    }
}

/// Where the plugin applies
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    Route(EntityRef),
    Service(EntityRef),
}

impl Target {
    pub fn entity(&self) -> &EntityRef {
        match self {
            Self::Route(r) | Self::Service(r) => r,
        }
    }
}

/// Immutable binding tuple
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Binding {
    #[serde(skip_serializing_if = "Option::is_none")]
    subject: Option<Subject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    target: Option<Target>,
}

impl Binding {
    /// Subject scoped to a target
    pub fn pair(subject: Subject, target: Target) -> Self {
        Self {
            subject: Some(subject),
            target: Some(target),
        }
    }

    /// Subject alone
    pub fn subject_only(subject: Subject) -> Self {
        Self {
            subject: Some(subject),
            target: None,
        }
    }

    /// Target alone
    pub fn target_only(target: Target) -> Self {
        Self {
            subject: None,
            target: Some(target),
        }
    }

    pub fn subject(&self) -> Option<&Subject> {
        self.subject.as_ref()
    }

    pub fn target(&self) -> Option<&Target> {
        self.target.as_ref()
    }

    pub fn consumer(&self) -> Option<&EntityRef> {
        match &self.subject {
            Some(Subject::Consumer(r)) => Some(r),
            _ => None,
        }
    }

    pub fn consumer_group(&self) -> Option<&EntityRef> {
        match &self.subject {
            Some(Subject::ConsumerGroup(r)) => Some(r),
            _ => None,
        }
    }

    pub fn route(&self) -> Option<&EntityRef> {
        match &self.target {
            Some(Target::Route(r)) => Some(r),
            _ => None,
        }
    }

    pub fn service(&self) -> Option<&EntityRef> {
        match &self.target {
            Some(Target::Service(r)) => Some(r),
            _ => None,
        }
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::with_capacity(2);
        match &self.subject {
            Some(Subject::Consumer(r)) => parts.push(format!("consumer={}", r.name)),
            Some(Subject::ConsumerGroup(r)) => parts.push(format!("consumer_group={}", r.name)),
            None => {}
        }
        match &self.target {
            Some(Target::Route(r)) => parts.push(format!("route={}", r.name)),
            Some(Target::Service(r)) => parts.push(format!("service={}", r.name)),
            None => {}
        }
        f.write_str(&parts.join(","))
    }
}
