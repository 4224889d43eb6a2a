//! Ordering of pluggable factories.
//!
//! Every factory names itself with a [`FactoryId`] and may declare ids it
//! must run after or before. [`resolve`] groups factories into stages: a
//! stage holds every factory whose constraints are satisfied by earlier
//! stages, in registration order. Ids that are not registered are ignored.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::error::ConfigError;

/// Stable identity of a factory, used in ordering constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct FactoryId(pub &'static str);

impl fmt::Display for FactoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Something that takes part in dependency ordering.
pub trait Dependent {
    fn id(&self) -> FactoryId;

    /// Factories that must come earlier.
    fn after(&self) -> &[FactoryId] {
        &[]
    }

    /// Factories that must come later.
    fn before(&self) -> &[FactoryId] {
        &[]
    }
}

impl<T: Dependent + ?Sized> Dependent for Arc<T> {
    fn id(&self) -> FactoryId {
        (**self).id()
    }

    fn after(&self) -> &[FactoryId] {
        (**self).after()
    }

    fn before(&self) -> &[FactoryId] {
        (**self).before()
    }
}

/// A group of factories with no ordering constraints among each other.
#[derive(Debug, Clone)]
pub struct Stage<T> {
    pub members: Vec<T>,
}

impl<T> Stage<T> {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Orders `items` into stages, failing on duplicate ids or cycles.
pub fn resolve<T: Dependent>(items: Vec<T>) -> Result<Vec<Stage<T>>, ConfigError> {
    let mut index: HashMap<FactoryId, usize> = HashMap::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        if index.insert(item.id(), i).is_some() {
            return Err(ConfigError::DuplicateFactory(item.id()));
        }
    }

    // preds[i] holds every index that has to be placed before item i
    let mut preds: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); items.len()];
    for (i, item) in items.iter().enumerate() {
        for id in item.after() {
            if let Some(&j) = index.get(id) {
                preds[i].insert(j);
            }
        }
        for id in item.before() {
            if let Some(&j) = index.get(id) {
                preds[j].insert(i);
            }
        }
    }

    let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
    let mut placed = vec![false; slots.len()];
    let mut remaining = slots.len();
    let mut stages = Vec::new();

    while remaining > 0 {
        let ready: Vec<usize> = (0..slots.len())
            .filter(|&i| !placed[i] && preds[i].iter().all(|&p| placed[p]))
            .collect();
        if ready.is_empty() {
            let factories = (0..slots.len())
                .filter(|&i| !placed[i])
                .filter_map(|i| slots[i].as_ref().map(Dependent::id))
                .collect();
            return Err(ConfigError::DependencyCycle { factories });
        }
        let mut members = Vec::with_capacity(ready.len());
        for &i in &ready {
            placed[i] = true;
            if let Some(item) = slots[i].take() {
                members.push(item);
            }
        }
        remaining -= ready.len();
        stages.push(Stage { members });
    }

    Ok(stages)
}

/// Flattens stages into a single ordered list.
pub fn flatten<T>(stages: Vec<Stage<T>>) -> Vec<T> {
    stages.into_iter().flat_map(|s| s.members).collect()
}
