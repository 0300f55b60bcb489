use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::component::ComponentValue;
use crate::error::{CoreError, CoreResult};

/// Identifier of an entity owned by the host's entity store.
///
/// This is plain data. Holding an `EntityId` never keeps the entity alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Read-only queries against a tagged entity store.
///
/// Results of the list queries come back in no particular order.
pub trait EntityQuery {
    /// Ids of all entities carrying `tag`.
    fn with_tag(&self, tag: &str) -> Vec<EntityId>;

    /// Ids of all entities carrying every tag in `tags`.
    fn with_tags(&self, tags: &[&str]) -> Vec<EntityId> {
        let Some((first, rest)) = tags.split_first() else {
            return Vec::new();
        };
        self.with_tag(first)
            .into_iter()
            .filter(|id| rest.iter().all(|t| self.has_component(*id, t)))
            .collect()
    }

    /// The value stored under `tag`, or `None` if the entity lacks it.
    fn component(&self, id: EntityId, tag: &str) -> Option<&ComponentValue>;

    /// Whether the entity carries `tag`.
    fn has_component(&self, id: EntityId, tag: &str) -> bool {
        self.component(id, tag).is_some()
    }
}

/// A simple in-memory entity store keyed by tag.
#[derive(Debug, Clone, Default)]
pub struct EntityTable {
    next_id: u64,
    components: BTreeMap<EntityId, HashMap<String, ComponentValue>>,
}

impl EntityTable {
    /// Create an empty table. Ids start at 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new entity carrying the given components. Returns its id.
    pub fn spawn<I, K>(&mut self, components: I) -> EntityId
    where
        I: IntoIterator<Item = (K, ComponentValue)>,
        K: Into<String>,
    {
        self.next_id += 1;
        let id = EntityId(self.next_id);
        let map = components.into_iter().map(|(k, v)| (k.into(), v)).collect();
        self.components.insert(id, map);
        id
    }

    /// Attach or replace a component on an existing entity.
    pub fn insert(
        &mut self,
        id: EntityId,
        tag: impl Into<String>,
        value: ComponentValue,
    ) -> CoreResult<()> {
        let map = self
            .components
            .get_mut(&id)
            .ok_or(CoreError::EntityNotFound(id))?;
        map.insert(tag.into(), value);
        Ok(())
    }

    /// Remove an entity and all its components.
    pub fn despawn(&mut self, id: EntityId) -> CoreResult<()> {
        self.components
            .remove(&id)
            .map(|_| ())
            .ok_or(CoreError::EntityNotFound(id))
    }

    /// Add `delta` to a numeric component on every entity that has one.
    pub fn bump_all(&mut self, tag: &str, delta: f64) {
        for map in self.components.values_mut() {
            if let Some(ComponentValue::Number(n)) = map.get_mut(tag) {
                *n += delta;
            }
        }
    }

    /// Number of live entities.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Return `true` if the table holds no entities.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Whether the entity exists.
    pub fn contains(&self, id: EntityId) -> bool {
        self.components.contains_key(&id)
    }
}

impl EntityQuery for EntityTable {
    fn with_tag(&self, tag: &str) -> Vec<EntityId> {
        self.components
            .iter()
            .filter(|(_, m)| m.contains_key(tag))
            .map(|(id, _)| *id)
            .collect()
    }

    fn component(&self, id: EntityId, tag: &str) -> Option<&ComponentValue> {
        self.components.get(&id).and_then(|m| m.get(tag))
    }
}
