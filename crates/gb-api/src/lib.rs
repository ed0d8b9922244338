//! GraphQL plumbing for ghboard.
//!
//! - [`GraphqlExecutor`] - the one seam between the stores and the network
//! - [`HttpExecutor`] - reqwest implementation talking to GitHub
//! - [`operations`] - query and mutation documents with variable builders
//! - [`schema`] - serde shapes of the responses
//! - [`mapper`] - pure functions from those shapes to `gb-core` entities

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod error;
pub mod executor;
pub mod http;
pub mod mapper;
pub mod operations;
pub mod request;
pub mod schema;

pub use error::ApiError;
pub use executor::GraphqlExecutor;
pub use http::HttpExecutor;
pub use mapper::{DashboardCounts, DashboardSnapshot, map_dashboard};
pub use request::{GraphqlError, GraphqlRequest, GraphqlResponse};
