//! Repository collaborators.
//!
//! GitHub reports collaborators per repository. A [`Collaborator`] folds every
//! repository a person can access into one entity with a list of grants.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::entity::{Entity, EntityId, EntityKind, Searchable, cmp_ci, contains_ci, filter_eq_str};
use super::repository::RepositorySummary;

/// Repository permission levels, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RepositoryPermission {
    /// Read-only access.
    Read,
    /// Read plus issue and pull request management.
    Triage,
    /// Push access.
    Write,
    /// Write plus repository settings short of admin.
    Maintain,
    /// Full control.
    Admin,
}

impl RepositoryPermission {
    /// Position in the permission ladder, `Read` = 0.
    #[inline]
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Read => 0,
            Self::Triage => 1,
            Self::Write => 2,
            Self::Maintain => 3,
            Self::Admin => 4,
        }
    }

    /// Returns the GitHub spelling.
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Read => "READ",
            Self::Triage => "TRIAGE",
            Self::Write => "WRITE",
            Self::Maintain => "MAINTAIN",
            Self::Admin => "ADMIN",
        }
    }

    /// Parses the GitHub spelling, ignoring case.
    ///
    /// # Examples
    ///
    /// ```
    /// use gb_core::RepositoryPermission;
    ///
    /// assert_eq!(RepositoryPermission::parse("write"), Some(RepositoryPermission::Write));
    /// assert_eq!(RepositoryPermission::parse("owner"), None);
    /// ```
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        [
            Self::Read,
            Self::Triage,
            Self::Write,
            Self::Maintain,
            Self::Admin,
        ]
        .into_iter()
        .find(|p| p.as_str().eq_ignore_ascii_case(s))
    }
}

impl PartialOrd for RepositoryPermission {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RepositoryPermission {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl fmt::Display for RepositoryPermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Access to one repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CollaboratorGrant {
    /// The repository.
    pub repository: RepositorySummary,
    /// Permission on it.
    pub permission: RepositoryPermission,
}

/// A person with access to at least one of the viewer's repositories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collaborator {
    /// User node id.
    pub id: EntityId,
    /// Login.
    pub login: String,
    /// Display name.
    pub name: Option<String>,
    /// Avatar image URL.
    pub avatar_url: Option<String>,
    /// One grant per repository.
    pub grants: Vec<CollaboratorGrant>,
}

impl Collaborator {
    /// Highest permission across all grants.
    #[must_use]
    pub fn max_permission(&self) -> Option<RepositoryPermission> {
        self.grants.iter().map(|grant| grant.permission).max()
    }

    /// Adds a grant, or raises the existing grant on the same repository.
    pub fn merge_grant(&mut self, grant: CollaboratorGrant) {
        match self
            .grants
            .iter_mut()
            .find(|g| g.repository.id == grant.repository.id)
        {
            Some(existing) => existing.permission = existing.permission.max(grant.permission),
            None => self.grants.push(grant),
        }
    }
}

/// Partial update for a [`Collaborator`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollaboratorPatch {
    /// Replace the grants.
    pub grants: Option<Vec<CollaboratorGrant>>,
}

impl Entity for Collaborator {
    type Patch = CollaboratorPatch;

    const KIND: EntityKind = EntityKind::Collaborator;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn apply_patch(&mut self, patch: &CollaboratorPatch) {
        if let Some(grants) = &patch.grants {
            self.grants.clone_from(grants);
        }
    }
}

impl Searchable for Collaborator {
    fn matches_query(&self, needle: &str) -> bool {
        contains_ci(&self.login, needle)
            || self.name.as_deref().is_some_and(|n| contains_ci(n, needle))
    }

    fn compare_by(&self, other: &Self, field: &str) -> Ordering {
        match field {
            "login" => cmp_ci(&self.login, &other.login),
            "name" => cmp_ci(
                self.name.as_deref().unwrap_or(&self.login),
                other.name.as_deref().unwrap_or(&other.login),
            ),
            "permission" => self.max_permission().cmp(&other.max_permission()),
            _ => Ordering::Equal,
        }
    }

    fn matches_filter(&self, key: &str, value: &serde_json::Value) -> bool {
        match key {
            // Minimum permission on any repository.
            "permission" => value
                .as_str()
                .and_then(RepositoryPermission::parse)
                .is_some_and(|min| self.max_permission().is_some_and(|p| p >= min)),
            "repository" => self
                .grants
                .iter()
                .any(|g| filter_eq_str(&g.repository.name_with_owner, value)),
            _ => true,
        }
    }
}
