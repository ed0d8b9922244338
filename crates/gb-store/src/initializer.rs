//! Startup sequencing.
//!
//! ```text
//! Idle --initialize--> Loading --ok--> Ready
//!                         |
//!                         +--err--> Failed --retry--> Loading
//! ```
//!
//! `Loading` issues exactly one aggregated dashboard query. The response is
//! mapped into a complete [`DashboardSnapshot`](gb_api::DashboardSnapshot)
//! before any store is touched, so stores are hydrated all together or not
//! at all.

use std::fmt;
use std::sync::Arc;

use gb_api::schema::ViewerData;
use gb_api::{GraphqlExecutor, map_dashboard, operations};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::context::Stores;
use crate::error::StoreError;

/// Where startup stands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum InitState {
    /// Nothing has been attempted.
    #[default]
    Idle,
    /// The aggregated fetch is in flight.
    Loading,
    /// Every store has been hydrated.
    Ready,
    /// The last attempt failed; no store was touched.
    Failed(StoreError),
}

impl InitState {
    /// Lowercase state name.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Ready => "ready",
            Self::Failed(_) => "failed",
        }
    }

    /// `true` once the stores are hydrated.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }

    /// The failure of the last attempt.
    #[must_use]
    pub const fn error(&self) -> Option<&StoreError> {
        match self {
            Self::Failed(err) => Some(err),
            _ => None,
        }
    }
}

impl fmt::Display for InitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed(err) => write!(f, "failed: {err}"),
            other => f.write_str(other.label()),
        }
    }
}

/// Moves a `Loading` state to `Failed` when an attempt ends without settling,
/// for example because the `initialize` future was dropped mid-fetch.
struct AttemptGuard<'a> {
    state: &'a watch::Sender<InitState>,
    settled: bool,
}

impl AttemptGuard<'_> {
    fn settle(mut self, outcome: InitState) {
        self.settled = true;
        self.state.send_replace(outcome);
    }
}

impl Drop for AttemptGuard<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        warn!("initialization cancelled before it finished");
        self.state.send_if_modified(|state| {
            if *state != InitState::Loading {
                return false;
            }
            *state = InitState::Failed(StoreError::Remote {
                message: "initialization was cancelled".to_owned(),
                retryable: true,
            });
            true
        });
    }
}

/// Runs the aggregated startup fetch and publishes its state.
#[derive(Debug)]
pub struct AppInitializer<E> {
    executor: Arc<E>,
    stores: Arc<Stores>,
    first: u32,
    state: watch::Sender<InitState>,
}

impl<E: GraphqlExecutor> AppInitializer<E> {
    /// Creates an idle initializer.
    #[must_use]
    pub fn new(executor: Arc<E>, stores: Arc<Stores>, first: u32) -> Self {
        Self {
            executor,
            stores,
            first,
            state: watch::Sender::new(InitState::Idle),
        }
    }

    /// The current state.
    #[must_use]
    pub fn state(&self) -> InitState {
        self.state.borrow().clone()
    }

    /// Watches state changes. The receiver starts at the current state.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<InitState> {
        self.state.subscribe()
    }

    /// Hydrates every store from one aggregated fetch.
    ///
    /// - `Idle` or `Failed`: runs the fetch.
    /// - `Ready`: returns `Ok(())` without fetching again.
    /// - `Loading`: returns [`StoreError::AlreadyLoading`].
    pub async fn initialize(&self) -> Result<(), StoreError> {
        let mut start = Ok(false);
        self.state.send_if_modified(|state| match state {
            InitState::Idle | InitState::Failed(_) => {
                *state = InitState::Loading;
                start = Ok(true);
                true
            }
            InitState::Ready => false,
            InitState::Loading => {
                start = Err(StoreError::AlreadyLoading);
                false
            }
        });
        if start? {
            self.run().await
        } else {
            Ok(())
        }
    }

    /// Re-enters `Loading` after a failure.
    ///
    /// # Errors
    ///
    /// [`StoreError::InvalidTransition`] unless the state is `Failed`, or the
    /// error of the new attempt.
    pub async fn retry(&self) -> Result<(), StoreError> {
        let mut start = Ok(());
        self.state.send_if_modified(|state| {
            if let InitState::Failed(_) = state {
                *state = InitState::Loading;
                true
            } else {
                start = Err(StoreError::InvalidTransition {
                    from: state.label(),
                });
                false
            }
        });
        start?;
        info!("retrying initialization");
        self.run().await
    }

    async fn run(&self) -> Result<(), StoreError> {
        let attempt = AttemptGuard {
            state: &self.state,
            settled: false,
        };
        info!(first = self.first, "loading dashboard");
        match self.fetch().await {
            Ok(data) => {
                let snapshot = map_dashboard(&data);
                self.stores.hydrate(snapshot);
                attempt.settle(InitState::Ready);
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, retryable = err.is_retryable(), "initialization failed");
                attempt.settle(InitState::Failed(err.clone()));
                Err(err)
            }
        }
    }

    async fn fetch(&self) -> Result<ViewerData, StoreError> {
        let response = self
            .executor
            .execute(operations::dashboard(self.first))
            .await?;
        Ok(response.into_result()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_and_display() {
        assert_eq!(InitState::default().label(), "idle");
        assert_eq!(InitState::Loading.to_string(), "loading");
        let failed = InitState::Failed(StoreError::remote("offline"));
        assert_eq!(failed.to_string(), "failed: offline");
        assert_eq!(failed.error(), Some(&StoreError::remote("offline")));
        assert!(!failed.is_ready());
        assert!(InitState::Ready.is_ready());
    }
}
