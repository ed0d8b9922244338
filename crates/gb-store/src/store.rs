//! The generic entity store.
//!
//! [`EntityStore`] composes the four primitives behind one lock:
//!
//! - [`Collection`] - the authoritative, id-unique entities
//! - [`LoadState`] - busy flag and last error
//! - [`CacheState`] - freshness stamp and TTL
//! - [`SearchState`] - criteria and materialized results
//!
//! Every method takes `&self`; stores are shared through `Arc`. The lock is
//! never held across an `.await` and is always released before listeners
//! run.
//!
//! # Examples
//!
//! ```
//! use gb_core::{EntityId, Project, ProjectPatch};
//! use gb_store::EntityStore;
//!
//! let store: EntityStore<Project> = EntityStore::default();
//! store.set_items(vec![
//!     Project::new(EntityId::from("PVT_1"), "Alpha"),
//!     Project::new(EntityId::from("PVT_2"), "Beta"),
//! ]);
//!
//! let patch = ProjectPatch { closed: Some(true), ..ProjectPatch::default() };
//! let updated = store.update(&EntityId::from("PVT_2"), &patch).unwrap();
//! assert!(updated.closed);
//!
//! assert!(store.delete(&EntityId::from("PVT_1")));
//! assert_eq!(store.len(), 1);
//! ```

use std::future::Future;

use gb_core::{CacheConfig, Entity, EntityId, FilterMap, SearchConfig, Searchable, SortDirection};
use parking_lot::RwLock;
use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::collection::Collection;
use crate::error::StoreError;
use crate::events::{Listeners, StoreEvent, SubscriptionId};
use crate::freshness::CacheState;
use crate::load::LoadState;
use crate::search::{SearchCriteria, SearchState, run_search};

/// Outcome of [`EntityStore::execute_with_cache`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fetch<R> {
    /// The cache was fresh; the operation did not run.
    Cached,
    /// The operation ran and produced a value.
    Fresh(R),
}

impl<R> Fetch<R> {
    /// `true` if the operation ran.
    #[inline]
    #[must_use]
    pub const fn is_fresh(&self) -> bool {
        matches!(self, Self::Fresh(_))
    }

    /// Maps the fresh value.
    pub fn map<U>(self, f: impl FnOnce(R) -> U) -> Fetch<U> {
        match self {
            Self::Cached => Fetch::Cached,
            Self::Fresh(value) => Fetch::Fresh(f(value)),
        }
    }
}

#[derive(Debug)]
struct StoreInner<T> {
    items: Collection<T>,
    load: LoadState,
    cache: CacheState,
    search: SearchState<T>,
}

/// Events produced while the lock was held, emitted after it is released.
type Pending = SmallVec<[StoreEvent; 2]>;

/// In-memory state for one feature's entities.
#[derive(Debug)]
pub struct EntityStore<T: Entity> {
    inner: RwLock<StoreInner<T>>,
    listeners: Listeners,
}

impl<T: Entity> Default for EntityStore<T> {
    fn default() -> Self {
        Self::new(&CacheConfig::default(), &SearchConfig::default())
    }
}

/// Clears the busy flag of a store when dropped.
///
/// Returned by [`EntityStore::begin_load`]. Dropping it on success, on error,
/// on early return or because the enclosing future was cancelled all clear the
/// flag, exactly once.
#[must_use = "the loading flag is cleared when the guard is dropped"]
#[derive(Debug)]
pub struct LoadGuard<'a, T: Entity> {
    store: &'a EntityStore<T>,
}

impl<T: Entity> Drop for LoadGuard<'_, T> {
    fn drop(&mut self) {
        self.store.set_loading(false);
    }
}

impl<T: Entity> EntityStore<T> {
    /// Creates an empty store.
    #[must_use]
    pub fn new(cache: &CacheConfig, search: &SearchConfig) -> Self {
        Self {
            inner: RwLock::new(StoreInner {
                items: Collection::new(),
                load: LoadState::new(),
                cache: CacheState::new(cache.ttl()),
                search: SearchState::new(search.default_page_size),
            }),
            listeners: Listeners::default(),
        }
    }

    fn mutate<R>(&self, f: impl FnOnce(&mut StoreInner<T>, &mut Pending) -> R) -> R {
        let mut pending = Pending::new();
        let result = {
            let mut inner = self.inner.write();
            f(&mut inner, &mut pending)
        };
        for event in &pending {
            self.listeners.emit(event);
        }
        result
    }

    // =========================================================================
    // Change notification
    // =========================================================================

    /// Registers a listener called after every change to this store.
    pub fn subscribe(
        &self,
        listener: impl Fn(&StoreEvent) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.listeners.subscribe(listener)
    }

    /// Removes a listener. Returns whether it was registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.listeners.unsubscribe(id)
    }

    // =========================================================================
    // Loading / error
    // =========================================================================

    /// `true` while a tracked operation is running.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.inner.read().load.is_loading()
    }

    /// The last recorded error.
    #[must_use]
    pub fn error(&self) -> Option<StoreError> {
        self.inner.read().load.error().cloned()
    }

    /// Sets the busy flag.
    pub fn set_loading(&self, loading: bool) {
        self.mutate(|inner, pending| {
            if inner.load.set_loading(loading) {
                pending.push(StoreEvent::LoadingChanged(loading));
            }
        });
    }

    /// Records or clears the error.
    pub fn set_error(&self, error: Option<StoreError>) {
        self.mutate(|inner, pending| {
            if inner.load.set_error(error) {
                pending.push(StoreEvent::ErrorChanged);
            }
        });
    }

    /// Marks the store busy and clears its error until the guard drops.
    pub fn begin_load(&self) -> LoadGuard<'_, T> {
        self.mutate(|inner, pending| {
            let (loading_changed, error_changed) = inner.load.begin();
            if loading_changed {
                pending.push(StoreEvent::LoadingChanged(true));
            }
            if error_changed {
                pending.push(StoreEvent::ErrorChanged);
            }
        });
        LoadGuard { store: self }
    }

    /// Runs `operation` inside the loading bracket.
    ///
    /// A failure is recorded with [`set_error`](Self::set_error) and also
    /// returned.
    pub async fn track<R, F>(&self, operation: F) -> Result<R, StoreError>
    where
        F: Future<Output = Result<R, StoreError>>,
    {
        let guard = self.begin_load();
        let result = operation.await;
        if let Err(err) = &result {
            warn!(kind = %T::KIND, error = %err, "store operation failed");
            self.set_error(Some(err.clone()));
        }
        drop(guard);
        result
    }

    // =========================================================================
    // Cache freshness
    // =========================================================================

    /// `true` iff the store was fetched less than one TTL ago.
    #[must_use]
    pub fn is_cache_valid(&self) -> bool {
        self.inner.read().cache.is_valid()
    }

    /// A copy of the cache stamp and TTL.
    #[must_use]
    pub fn cache_state(&self) -> CacheState {
        self.inner.read().cache
    }

    /// Stamps the cache with the current time.
    pub fn update_cache_timestamp(&self) {
        self.mutate(|inner, pending| {
            inner.cache.touch();
            pending.push(StoreEvent::CacheChanged { fresh: true });
        });
    }

    /// Drops the cache stamp so the next fetch runs.
    pub fn invalidate_cache(&self) {
        self.mutate(|inner, pending| {
            let was_stamped = inner.cache.stamp().is_some();
            inner.cache.invalidate();
            if was_stamped {
                pending.push(StoreEvent::CacheChanged { fresh: false });
            }
        });
    }

    /// Runs a fetch unless the cache is still fresh.
    ///
    /// - Fresh cache and no `force_refresh`: `operation` is not called and
    ///   [`Fetch::Cached`] is returned.
    /// - Otherwise `operation` runs inside the loading bracket. On success the
    ///   cache is stamped; on failure the error is recorded, the stamp is left
    ///   alone, and the error is returned.
    pub async fn execute_with_cache<R, F, Fut>(
        &self,
        force_refresh: bool,
        operation: F,
    ) -> Result<Fetch<R>, StoreError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<R, StoreError>>,
    {
        if !force_refresh && self.is_cache_valid() {
            debug!(kind = %T::KIND, "cache fresh, skipping fetch");
            return Ok(Fetch::Cached);
        }
        let value = self.track(operation()).await?;
        self.update_cache_timestamp();
        Ok(Fetch::Fresh(value))
    }

    // =========================================================================
    // CRUD
    // =========================================================================

    /// A snapshot of every entity, in collection order.
    #[must_use]
    pub fn get_all(&self) -> Vec<T> {
        self.inner.read().items.as_slice().to_vec()
    }

    /// Looks up an entity by id. `None` on a miss.
    #[must_use]
    pub fn get_by_id(&self, id: &EntityId) -> Option<T> {
        self.inner.read().items.get(id).cloned()
    }

    /// `true` if an entity with `id` is present.
    #[must_use]
    pub fn contains(&self, id: &EntityId) -> bool {
        self.inner.read().items.get(id).is_some()
    }

    /// Number of entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().items.len()
    }

    /// `true` when the store holds nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.read().items.is_empty()
    }

    /// Appends a server-confirmed entity, or replaces the one with its id.
    pub fn insert(&self, entity: T) {
        let id = entity.id().clone();
        self.mutate(|inner, pending| {
            inner.items.insert(entity);
            pending.push(StoreEvent::Inserted(id.clone()));
        });
        debug!(kind = %T::KIND, %id, "inserted");
    }

    /// Shallow-merges `patch` into the entity with `id`, keeping its position.
    ///
    /// Returns the merged entity, or `None` with the collection untouched.
    pub fn update(&self, id: &EntityId, patch: &T::Patch) -> Option<T> {
        let updated = self.mutate(|inner, pending| {
            let updated = inner.items.update(id, patch);
            if updated.is_some() {
                pending.push(StoreEvent::Updated(id.clone()));
            }
            updated
        });
        debug!(kind = %T::KIND, %id, hit = updated.is_some(), "update");
        updated
    }

    /// Removes the entity with `id`. Returns whether one was removed.
    pub fn delete(&self, id: &EntityId) -> bool {
        let removed = self.mutate(|inner, pending| {
            let removed = inner.items.remove(id);
            if removed {
                pending.push(StoreEvent::Deleted(id.clone()));
            }
            removed
        });
        debug!(kind = %T::KIND, %id, removed, "delete");
        removed
    }

    /// Replaces the collection wholesale.
    ///
    /// Repeated ids collapse to the last occurrence, at the first
    /// occurrence's position.
    pub fn set_items(&self, items: Vec<T>) {
        let count = self.mutate(|inner, pending| {
            inner.items.replace(items);
            let count = inner.items.len();
            pending.push(StoreEvent::Replaced { count });
            count
        });
        debug!(kind = %T::KIND, count, "items replaced");
    }

    /// Empties the collection.
    pub fn clear(&self) {
        self.mutate(|inner, pending| {
            inner.items.clear();
            pending.push(StoreEvent::Cleared);
        });
    }

    /// Back to the freshly constructed state: no entities, no cache stamp,
    /// reset search and no error.
    pub fn reset(&self) {
        self.mutate(|inner, pending| {
            inner.items.clear();
            inner.cache.invalidate();
            inner.search.reset();
            pending.push(StoreEvent::Cleared);
            if inner.load.set_error(None) {
                pending.push(StoreEvent::ErrorChanged);
            }
        });
        debug!(kind = %T::KIND, "reset");
    }

    // =========================================================================
    // Search criteria
    // =========================================================================

    /// Edits the criteria and emits [`StoreEvent::CriteriaChanged`] when the
    /// edit changed anything.
    fn edit_criteria(&self, edit: impl FnOnce(&mut SearchCriteria)) {
        self.mutate(|inner, pending| {
            let criteria = inner.search.criteria_mut();
            let before = criteria.clone();
            edit(criteria);
            if *criteria != before {
                pending.push(StoreEvent::CriteriaChanged);
            }
        });
    }

    /// Sets the free-text query.
    pub fn set_search_query(&self, query: impl Into<String>) {
        let query = query.into();
        self.edit_criteria(|criteria| criteria.query = query);
    }

    /// Sets the sort field and direction.
    pub fn set_sort_by(&self, field: impl Into<String>, direction: SortDirection) {
        let field = field.into();
        self.edit_criteria(|criteria| {
            criteria.sort.field = field;
            criteria.sort.direction = direction;
        });
    }

    /// Replaces the filter map.
    pub fn set_filters(&self, filters: FilterMap) {
        self.edit_criteria(|criteria| criteria.filters = filters);
    }

    /// Sets page and page size, each clamped to at least 1.
    pub fn set_pagination(&self, page: usize, page_size: usize) {
        self.edit_criteria(|criteria| criteria.set_pagination(page, page_size));
    }

    /// The current criteria.
    #[must_use]
    pub fn criteria(&self) -> SearchCriteria {
        self.inner.read().search.criteria().clone()
    }

    /// Last materialized results.
    #[must_use]
    pub fn search_results(&self) -> Vec<T> {
        self.inner.read().search.results().to_vec()
    }

    /// Number of materialized results.
    #[must_use]
    pub fn total_results(&self) -> usize {
        self.inner.read().search.total_results()
    }

    /// Page count of the materialized results, at least 1.
    #[must_use]
    pub fn total_pages(&self) -> usize {
        self.inner.read().search.total_pages()
    }

    /// The current page of the materialized results.
    #[must_use]
    pub fn paginated_results(&self) -> Vec<T> {
        self.inner.read().search.paginated().to_vec()
    }

    /// Restores the default criteria and drops the results.
    pub fn reset_search(&self) {
        self.mutate(|inner, pending| {
            inner.search.reset();
            pending.push(StoreEvent::SearchChanged { total: 0 });
        });
    }
}

impl<T: Searchable> EntityStore<T> {
    /// Materializes results for the current criteria and returns them.
    pub fn search(&self) -> Vec<T> {
        self.mutate(|inner, pending| {
            let results = run_search(inner.items.as_slice(), inner.search.criteria());
            pending.push(StoreEvent::SearchChanged {
                total: results.len(),
            });
            inner.search.set_results(results.clone());
            results
        })
    }

    /// Applies `criteria` in one call, then searches.
    pub fn search_with(&self, criteria: SearchCriteria) -> Vec<T> {
        self.edit_criteria(|current| *current = criteria);
        self.search()
    }
}
