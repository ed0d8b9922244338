//! The ordered, id-unique collection a store owns.

use gb_core::{Entity, EntityId, FxHashMap, fx_hash_map_with_capacity};

/// Entities in insertion order with unique ids.
///
/// Lookups are linear scans; collections hold one page-limited GraphQL
/// response worth of entities.
#[derive(Debug, Clone)]
pub struct Collection<T> {
    items: Vec<T>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Entity> Collection<T> {
    /// Creates an empty collection.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrowed view of every entity.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Number of entities.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// `true` when empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn position(&self, id: &EntityId) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    /// Looks up an entity by id.
    #[must_use]
    pub fn get(&self, id: &EntityId) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Appends an entity, or replaces the one with the same id in place.
    ///
    /// Returns `true` if the id was new.
    pub fn insert(&mut self, entity: T) -> bool {
        match self.position(entity.id()) {
            Some(at) => {
                self.items[at] = entity;
                false
            }
            None => {
                self.items.push(entity);
                true
            }
        }
    }

    /// Merges `patch` into the entity with `id`, keeping its position.
    ///
    /// Returns the merged entity, or `None` (collection untouched) on a miss.
    pub fn update(&mut self, id: &EntityId, patch: &T::Patch) -> Option<T> {
        let item = self.items.iter_mut().find(|item| item.id() == id)?;
        item.apply_patch(patch);
        Some(item.clone())
    }

    /// Removes the entity with `id`. Returns whether one was removed.
    pub fn remove(&mut self, id: &EntityId) -> bool {
        match self.position(id) {
            Some(at) => {
                self.items.remove(at);
                true
            }
            None => false,
        }
    }

    /// Replaces everything.
    ///
    /// Repeated ids collapse to one entity: the last occurrence's value at the
    /// first occurrence's position.
    pub fn replace(&mut self, items: Vec<T>) {
        let mut index: FxHashMap<EntityId, usize> = fx_hash_map_with_capacity(items.len());
        let mut unique: Vec<T> = Vec::with_capacity(items.len());
        for item in items {
            if let Some(&at) = index.get(item.id()) {
                unique[at] = item;
            } else {
                index.insert(item.id().clone(), unique.len());
                unique.push(item);
            }
        }
        self.items = unique;
    }

    /// Removes everything.
    pub fn clear(&mut self) {
        self.items.clear();
    }
}
