//! Domain types for ghboard.
//!
//! # Module Organization
//!
//! - [`entity`] - the [`Entity`] and [`Searchable`] contracts, ids, sort direction
//! - [`project`] - Projects v2 boards and their columns
//! - [`repository`] - repositories and embedded repository summaries
//! - [`user`] - GitHub users
//! - [`issue`] - issues and their board placements
//! - [`label`] - labels and embedded label summaries
//! - [`collaborator`] - collaborators and their per-repository grants
//!
//! All public types are re-exported here and at the crate root:
//!
//! ```
//! use gb_core::{Entity, EntityId, Project, Repository};
//! use gb_core::types::{Issue, IssueState, Label};
//! ```

pub mod collaborator;
pub mod entity;
pub mod issue;
pub mod label;
pub mod project;
pub mod repository;
pub mod user;

pub use collaborator::{Collaborator, CollaboratorGrant, CollaboratorPatch, RepositoryPermission};
pub use entity::{
    Entity, EntityId, EntityKind, FilterMap, Searchable, SortDirection, cmp_ci, contains_ci,
    filter_eq_bool, filter_eq_str,
};
pub use issue::{Issue, IssuePatch, IssueState, ProjectItemRef};
pub use label::{Label, LabelPatch, LabelSummary};
pub use project::{Project, ProjectColumn, ProjectPatch};
pub use repository::{Repository, RepositoryPatch, RepositorySummary};
pub use user::{User, UserPatch};
