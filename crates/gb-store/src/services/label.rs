//! Labels.

use std::sync::Arc;

use gb_api::GraphqlExecutor;
use gb_api::mapper::{map_label, map_labels};
use gb_api::operations;
use gb_api::schema::LabelNode;
use gb_core::{EntityId, Label, LabelPatch};
use serde_json::Value;
use tracing::info;

use super::{apply_confirmed, ensure_present, mutate, refresh_store, remove_confirmed};
use crate::context::Stores;
use crate::error::StoreError;
use crate::store::{EntityStore, Fetch};

/// Input for [`LabelService::create`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLabel {
    /// Repository the label belongs to.
    pub repository_id: EntityId,
    /// Label name.
    pub name: String,
    /// Hex color, with or without a leading `#`.
    pub color: String,
    /// Optional description.
    pub description: Option<String>,
}

/// Remote operations on the label store.
#[derive(Debug)]
pub struct LabelService<E> {
    executor: Arc<E>,
    stores: Arc<Stores>,
    first: u32,
}

impl<E: GraphqlExecutor> LabelService<E> {
    pub(crate) fn new(executor: Arc<E>, stores: Arc<Stores>, first: u32) -> Self {
        Self {
            executor,
            stores,
            first,
        }
    }

    /// The store this service writes to.
    #[must_use]
    pub fn store(&self) -> &EntityStore<Label> {
        &self.stores.labels
    }

    /// Refetches labels unless the cache is fresh.
    ///
    /// Labels are collected from repositories and from issues on boards, so
    /// this uses the full dashboard query.
    pub async fn refresh(&self, force_refresh: bool) -> Result<Fetch<()>, StoreError> {
        refresh_store(
            self.store(),
            &*self.executor,
            operations::dashboard(self.first),
            map_labels,
            force_refresh,
        )
        .await
    }

    /// Creates a label and appends the server's copy.
    pub async fn create(&self, new: NewLabel) -> Result<Label, StoreError> {
        let store = self.store();
        store
            .track(async {
                let node: LabelNode = mutate(
                    &*self.executor,
                    operations::create_label(
                        &new.repository_id,
                        &new.name,
                        &new.color,
                        new.description.as_deref(),
                    ),
                    &["createLabel", "label"],
                )
                .await?;
                let label = map_label(&node);
                store.insert(label.clone());
                info!(id = %label.id, name = %label.name, "label created");
                Ok(label)
            })
            .await
    }

    /// Renames, recolors or re-describes a label.
    pub async fn update(&self, id: &EntityId, patch: &LabelPatch) -> Result<Label, StoreError> {
        let store = self.store();
        store
            .track(async {
                ensure_present(store, id)?;
                let node: LabelNode = mutate(
                    &*self.executor,
                    operations::update_label(
                        id,
                        patch.name.as_deref(),
                        patch.color.as_deref(),
                        patch.description.as_deref(),
                    ),
                    &["updateLabel", "label"],
                )
                .await?;
                let confirmed = map_label(&node);
                let local = LabelPatch {
                    name: Some(confirmed.name),
                    color: Some(confirmed.color),
                    description: confirmed.description,
                };
                apply_confirmed(store, id, &local)
            })
            .await
    }

    /// Deletes a label.
    pub async fn delete(&self, id: &EntityId) -> Result<(), StoreError> {
        let store = self.store();
        store
            .track(async {
                ensure_present(store, id)?;
                let _: Value =
                    mutate(&*self.executor, operations::delete_label(id), &["deleteLabel"]).await?;
                remove_confirmed(store, id)?;
                info!(%id, "label deleted");
                Ok(())
            })
            .await
    }
}
