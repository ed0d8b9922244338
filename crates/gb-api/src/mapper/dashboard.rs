use gb_core::{Collaborator, EntityId, Issue, Label, Project, Repository, User};
use serde::Serialize;

use super::{
    map_collaborators, map_issues, map_labels, map_projects, map_repositories, map_users,
};
use crate::schema::ViewerData;

/// Every collection mapped from one aggregated response.
///
/// Built completely before any store is touched, so hydration either gets
/// all of it or none of it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    /// The authenticated user, when the response had one.
    pub viewer_id: Option<EntityId>,
    /// Boards.
    pub projects: Vec<Project>,
    /// Repositories.
    pub repositories: Vec<Repository>,
    /// Viewer and collaborators.
    pub users: Vec<User>,
    /// Issues on boards.
    pub issues: Vec<Issue>,
    /// Labels.
    pub labels: Vec<Label>,
    /// Collaborators.
    pub collaborators: Vec<Collaborator>,
}

/// Per-collection sizes of a [`DashboardSnapshot`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardCounts {
    /// Boards.
    pub projects: usize,
    /// Repositories.
    pub repositories: usize,
    /// Users.
    pub users: usize,
    /// Issues.
    pub issues: usize,
    /// Labels.
    pub labels: usize,
    /// Collaborators.
    pub collaborators: usize,
}

impl DashboardSnapshot {
    /// Returns the size of every collection.
    #[must_use]
    pub fn counts(&self) -> DashboardCounts {
        DashboardCounts {
            projects: self.projects.len(),
            repositories: self.repositories.len(),
            users: self.users.len(),
            issues: self.issues.len(),
            labels: self.labels.len(),
            collaborators: self.collaborators.len(),
        }
    }
}

/// Maps the aggregated dashboard response.
#[must_use]
pub fn map_dashboard(data: &ViewerData) -> DashboardSnapshot {
    DashboardSnapshot {
        viewer_id: data
            .viewer
            .as_ref()
            .map(|viewer| EntityId::from(viewer.id.as_str())),
        projects: map_projects(data),
        repositories: map_repositories(data),
        users: map_users(data),
        issues: map_issues(data),
        labels: map_labels(data),
        collaborators: map_collaborators(data),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_response_maps_to_empty_snapshot() {
        let snapshot = map_dashboard(&ViewerData::default());
        assert_eq!(snapshot, DashboardSnapshot::default());
        assert_eq!(snapshot.counts(), DashboardCounts::default());
    }
}
