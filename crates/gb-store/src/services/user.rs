//! Users. Read-only: profiles belong to their owners.

use std::sync::Arc;

use gb_api::GraphqlExecutor;
use gb_api::mapper::map_users;
use gb_api::operations;
use gb_core::{EntityId, User};

use super::fetch_viewer;
use crate::context::Stores;
use crate::error::StoreError;
use crate::store::{EntityStore, Fetch};

/// Read access to the user store.
#[derive(Debug)]
pub struct UserService<E> {
    executor: Arc<E>,
    stores: Arc<Stores>,
    first: u32,
}

impl<E: GraphqlExecutor> UserService<E> {
    pub(crate) fn new(executor: Arc<E>, stores: Arc<Stores>, first: u32) -> Self {
        Self {
            executor,
            stores,
            first,
        }
    }

    /// The store this service reads.
    #[must_use]
    pub fn store(&self) -> &EntityStore<User> {
        &self.stores.users
    }

    /// Refetches the viewer and collaborators unless the cache is fresh.
    /// Also refreshes the viewer id.
    pub async fn refresh(&self, force_refresh: bool) -> Result<Fetch<()>, StoreError> {
        let store = self.store();
        store
            .execute_with_cache(force_refresh, || async {
                let data =
                    fetch_viewer(&*self.executor, operations::repositories(self.first)).await?;
                self.stores.set_viewer_id(
                    data.viewer
                        .as_ref()
                        .map(|viewer| EntityId::from(viewer.id.as_str())),
                );
                store.set_items(map_users(&data));
                Ok(())
            })
            .await
    }

    /// The authenticated user, once loaded.
    #[must_use]
    pub fn viewer(&self) -> Option<User> {
        self.stores
            .viewer_id()
            .and_then(|id| self.store().get_by_id(&id))
    }

    /// Looks a user up by login, ignoring ASCII case.
    #[must_use]
    pub fn find_by_login(&self, login: &str) -> Option<User> {
        self.store()
            .get_all()
            .into_iter()
            .find(|user| user.login.eq_ignore_ascii_case(login))
    }
}
