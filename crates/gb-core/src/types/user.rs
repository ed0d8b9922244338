//! GitHub users.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::entity::{Entity, EntityId, EntityKind, Searchable, cmp_ci, contains_ci};

/// A GitHub user: the viewer or anyone seen as a collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Node id.
    pub id: EntityId,
    /// Login handle.
    pub login: String,
    /// Display name.
    pub name: Option<String>,
    /// Public email.
    pub email: Option<String>,
    /// Avatar image URL.
    pub avatar_url: Option<String>,
}

impl User {
    /// Creates a user with only an id and a login.
    #[must_use]
    pub fn new(id: EntityId, login: impl Into<String>) -> Self {
        Self {
            id,
            login: login.into(),
            name: None,
            email: None,
            avatar_url: None,
        }
    }

    /// Returns the display name, falling back to the login.
    #[inline]
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.login)
    }
}

/// Partial update for a [`User`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPatch {
    /// New display name.
    pub name: Option<String>,
    /// New email.
    pub email: Option<String>,
}

impl Entity for User {
    type Patch = UserPatch;

    const KIND: EntityKind = EntityKind::User;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn apply_patch(&mut self, patch: &UserPatch) {
        if let Some(name) = &patch.name {
            self.name = Some(name.clone());
        }
        if let Some(email) = &patch.email {
            self.email = Some(email.clone());
        }
    }
}

impl Searchable for User {
    fn matches_query(&self, needle: &str) -> bool {
        contains_ci(&self.login, needle)
            || self.name.as_deref().is_some_and(|n| contains_ci(n, needle))
            || self.email.as_deref().is_some_and(|e| contains_ci(e, needle))
    }

    fn compare_by(&self, other: &Self, field: &str) -> Ordering {
        match field {
            "login" => cmp_ci(&self.login, &other.login),
            "name" => cmp_ci(self.display_name(), other.display_name()),
            _ => Ordering::Equal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_falls_back_to_login() {
        let mut user = User::new(EntityId::from("U_1"), "octocat");
        assert_eq!(user.display_name(), "octocat");
        user.name = Some("The Octocat".to_owned());
        assert_eq!(user.display_name(), "The Octocat");
    }

    #[test]
    fn test_query_matches_email() {
        let mut user = User::new(EntityId::from("U_1"), "octocat");
        user.email = Some("octo@github.com".to_owned());
        assert!(user.matches_query("github.com"));
        assert!(!user.matches_query("gitlab"));
    }
}
