//! Pure mappers from GraphQL response shapes to flat entities.
//!
//! Every mapper:
//!
//! - takes borrowed response data and returns owned entities
//! - treats a null connection, node or nested object as empty, never panics
//! - returns `[]` when the part of the response it needs is absent
//! - deduplicates entities that the response can repeat across parents,
//!   keeping the position of the first occurrence
//!
//! Mappers hold no state, so calling one twice on the same input yields
//! equal output.

mod collaborator;
mod dashboard;
mod issue;
mod label;
mod project;
mod repository;
mod user;

pub use collaborator::map_collaborators;
pub use dashboard::{DashboardCounts, DashboardSnapshot, map_dashboard};
pub use issue::{map_issue, map_issues};
pub use label::{map_label, map_labels};
pub use project::{map_project, map_projects};
pub use repository::{map_repositories, map_repository, repository_summary};
pub use user::{map_user, map_users};

use gb_core::{Entity, EntityId, FxHashMap, fx_hash_map_with_capacity};

/// Collects entities in first-seen order, merging repeats into the first copy.
///
/// `merge` receives the kept entity and the repeat.
pub(crate) struct Dedup<T> {
    index: FxHashMap<EntityId, usize>,
    items: Vec<T>,
}

impl<T: Entity> Dedup<T> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            index: fx_hash_map_with_capacity(capacity),
            items: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push_with(&mut self, entity: T, merge: impl FnOnce(&mut T, T)) {
        if let Some(&at) = self.index.get(entity.id()) {
            merge(&mut self.items[at], entity);
        } else {
            self.index.insert(entity.id().clone(), self.items.len());
            self.items.push(entity);
        }
    }

    /// Keeps the first occurrence and drops repeats.
    pub(crate) fn push(&mut self, entity: T) {
        self.push_with(entity, |_, _| {});
    }

    pub(crate) fn into_vec(self) -> Vec<T> {
        self.items
    }
}

/// Converts GitHub's empty-string-for-private email into `None`.
pub(crate) fn non_empty(value: Option<&String>) -> Option<String> {
    value.filter(|s| !s.is_empty()).cloned()
}
