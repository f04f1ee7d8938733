//! Combination Generator
//!
//! Turns one control plane's relation set into an ordered list of bindings.
//!
//! Tiers, highest first; only the first non-empty tier contributes:
//! 1. Consumers, each paired with every route then every service
//!    (or alone when there are neither)
//! 2. Consumer groups, same shape as consumers
//! 3. Bare routes followed by bare services
//!
//! A service that is also consumer-scoped does not get a bare binding of its
//! own while a consumer or consumer group is present.

use crate::binding::{Binding, Subject, Target};
use crate::refs::EntityRef;
use crate::relations::RelationSet;

/// Compute the bindings of one relation set
pub fn combine(relations: &RelationSet) -> Vec<Binding> {
    if !relations.consumers.is_empty() {
        return subject_tier(&relations.consumers, relations, Subject::Consumer);
    }
    if !relations.consumer_groups.is_empty() {
        return subject_tier(&relations.consumer_groups, relations, Subject::ConsumerGroup);
    }

    relations
        .routes
        .iter()
        .cloned()
        .map(Target::Route)
        .chain(relations.services.iter().cloned().map(Target::Service))
        .map(Binding::target_only)
        .collect()
}

fn subject_tier(
    subjects: &[EntityRef],
    relations: &RelationSet,
    make: fn(EntityRef) -> Subject,
) -> Vec<Binding> {
    let targets: Vec<Target> = relations
        .routes
        .iter()
        .cloned()
        .map(Target::Route)
        .chain(relations.services.iter().cloned().map(Target::Service))
        .collect();

    if targets.is_empty() {
        return subjects
            .iter()
            .cloned()
            .map(|s| Binding::subject_only(make(s)))
            .collect();
    }

    let mut bindings = Vec::with_capacity(subjects.len() * targets.len());
    for subject in subjects {
        for target in &targets {
            bindings.push(Binding::pair(make(subject.clone()), target.clone()));
        }
    }
    bindings
}
