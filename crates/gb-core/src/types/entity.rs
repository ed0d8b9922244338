//! The entity contract shared by every store.
//!
//! An entity is a plain attribute bag with a stable, server-issued id. The
//! stores never mint ids; they only hold what GitHub returned.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::FxHashMap;

/// An opaque GitHub node id.
///
/// # Examples
///
/// ```
/// use gb_core::EntityId;
///
/// let id = EntityId::from("PVT_kwHOAB");
/// assert_eq!(id.as_str(), "PVT_kwHOAB");
/// assert_eq!(id.to_string(), "PVT_kwHOAB");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Wraps a server-issued id.
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    #[inline]
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for EntityId {
    #[inline]
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for EntityId {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Which feature an entity belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// A Projects v2 board.
    Project,
    /// A repository.
    Repository,
    /// A GitHub user.
    User,
    /// An issue placed on a project board.
    Issue,
    /// A repository label.
    Label,
    /// A repository collaborator.
    Collaborator,
}

impl EntityKind {
    /// Returns a lowercase label for logs and messages.
    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Repository => "repository",
            Self::User => "user",
            Self::Issue => "issue",
            Self::Label => "label",
            Self::Collaborator => "collaborator",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A uniquely identified domain object held by a store.
///
/// `Patch` is the typed partial update for the entity: every field is an
/// `Option`, and `None` leaves the current value alone. Applying the same
/// patch twice yields the same entity as applying it once.
pub trait Entity: Clone + Send + Sync + 'static {
    /// Partial update type.
    type Patch: Clone + Default + Send + Sync;

    /// The feature this entity type belongs to.
    const KIND: EntityKind;

    /// The server-issued id.
    fn id(&self) -> &EntityId;

    /// Shallow-merges `patch` over `self`.
    fn apply_patch(&mut self, patch: &Self::Patch);
}

/// Open filter map: field name to an arbitrary JSON value.
pub type FilterMap = FxHashMap<String, serde_json::Value>;

/// Per-entity search semantics.
///
/// The generic search in the store filters with [`matches_query`] and
/// [`matches_filter`], then stable-sorts with [`compare_by`].
///
/// [`matches_query`]: Searchable::matches_query
/// [`matches_filter`]: Searchable::matches_filter
/// [`compare_by`]: Searchable::compare_by
pub trait Searchable: Entity {
    /// Returns `true` if the entity matches the already-lowercased, non-empty needle.
    fn matches_query(&self, needle: &str) -> bool;

    /// Orders two entities by `field`.
    ///
    /// Unknown fields, and `"id"`, compare equal: ids are opaque and carry no
    /// order, so the default sort leaves collection order untouched.
    fn compare_by(&self, other: &Self, field: &str) -> Ordering;

    /// Returns `true` if the entity satisfies one filter entry.
    ///
    /// Keys the entity does not know are ignored (they match).
    fn matches_filter(&self, key: &str, value: &serde_json::Value) -> bool {
        let _ = (key, value);
        true
    }
}

/// Sort direction for search results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    /// Ascending order.
    #[default]
    Asc,
    /// Descending order.
    Desc,
}

impl SortDirection {
    /// Applies the direction to an ascending comparison result.
    ///
    /// # Examples
    ///
    /// ```
    /// use gb_core::SortDirection;
    /// use std::cmp::Ordering;
    ///
    /// assert_eq!(SortDirection::Asc.apply(Ordering::Less), Ordering::Less);
    /// assert_eq!(SortDirection::Desc.apply(Ordering::Less), Ordering::Greater);
    /// assert_eq!(SortDirection::Desc.apply(Ordering::Equal), Ordering::Equal);
    /// ```
    #[inline]
    #[must_use]
    pub const fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }
}

/// Case-insensitive substring test against an already-lowercased needle.
#[inline]
#[must_use]
pub fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Case-insensitive comparison used for name-like sort fields.
#[inline]
#[must_use]
pub fn cmp_ci(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

/// Compares a string filter value against a field, case-insensitively.
///
/// Non-string filter values never match a string field.
#[inline]
#[must_use]
pub fn filter_eq_str(field: &str, value: &serde_json::Value) -> bool {
    value.as_str().is_some_and(|v| field.eq_ignore_ascii_case(v))
}

/// Compares a boolean filter value against a field.
///
/// Non-boolean filter values never match.
#[inline]
#[must_use]
pub fn filter_eq_bool(field: bool, value: &serde_json::Value) -> bool {
    value.as_bool() == Some(field)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entity_id_serializes_transparently() {
        let id = EntityId::from("R_1");
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""R_1""#);
        let parsed: EntityId = serde_json::from_str(r#""R_1""#).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_entity_kind_labels() {
        assert_eq!(EntityKind::Project.label(), "project");
        assert_eq!(EntityKind::Collaborator.to_string(), "collaborator");
        assert_eq!(
            serde_json::to_string(&EntityKind::Repository).unwrap(),
            r#""repository""#
        );
    }

    #[test]
    fn test_contains_ci() {
        assert!(contains_ci("Alpha Board", "alpha"));
        assert!(contains_ci("GAMMA", "mm"));
        assert!(!contains_ci("Beta", "x"));
    }

    #[test]
    fn test_cmp_ci() {
        assert_eq!(cmp_ci("alpha", "Beta"), Ordering::Less);
        assert_eq!(cmp_ci("ALPHA", "alpha"), Ordering::Equal);
    }

    #[test]
    fn test_filter_helpers() {
        assert!(filter_eq_str("OPEN", &json!("open")));
        assert!(!filter_eq_str("OPEN", &json!(true)));
        assert!(filter_eq_bool(true, &json!(true)));
        assert!(!filter_eq_bool(true, &json!("true")));
    }
}
