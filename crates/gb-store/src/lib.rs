//! In-memory entity state for ghboard.
//!
//! Each feature owns one [`EntityStore`], a composition of four primitives:
//!
//! - [`LoadState`] - busy flag and last error
//! - [`CacheState`] - freshness stamp with a fixed TTL
//! - [`SearchState`] - query, sort, filters, pagination, materialized results
//! - [`Collection`] - the id-unique entities themselves
//!
//! The feature services in [`services`] pair a store with a
//! [`GraphqlExecutor`](gb_api::GraphqlExecutor): remote call first, local
//! mutation second. [`AppInitializer`] hydrates every store from one
//! aggregated query at startup, and [`AppContext`] wires it all together.

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod collection;
pub mod context;
pub mod error;
pub mod events;
pub mod freshness;
pub mod initializer;
pub mod load;
pub mod search;
pub mod services;
pub mod store;

pub use collection::Collection;
pub use context::{AppContext, Stores};
pub use error::StoreError;
pub use events::{StoreEvent, SubscriptionId};
pub use freshness::CacheState;
pub use initializer::{AppInitializer, InitState};
pub use load::LoadState;
pub use search::{SearchCriteria, SearchState, SortSpec};
pub use services::{
    CollaboratorService, IssueService, LabelService, NewIssue, NewLabel, NewProject,
    NewRepository, ProjectService, RepositoryService, UserService,
};
pub use store::{EntityStore, Fetch, LoadGuard};
