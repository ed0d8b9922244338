//! Core types, configuration, and errors for ghboard.
//!
//! This crate provides the foundational types used across the workspace:
//!
//! - The [`Entity`] contract every store is generic over, with typed patches
//! - Domain entities (`Project`, `Repository`, `User`, `Issue`, `Label`, `Collaborator`)
//! - Configuration structures loaded from TOML
//! - Type aliases for `FxHashMap`/`FxHashSet` (faster than std)

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod hash;
pub mod types;

pub use config::{
    ApiConfig, CacheConfig, Config, DEFAULT_CACHE_TTL_SECS, DEFAULT_ENDPOINT, DEFAULT_PAGE_SIZE,
    SearchConfig,
};
pub use error::ConfigError;
pub use hash::{FxHashMap, FxHashSet, fx_hash_map_with_capacity, fx_hash_set_with_capacity};
pub use types::*;
