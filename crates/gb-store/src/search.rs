//! Search, sort, filter and pagination over a store's collection.
//!
//! Matching semantics belong to each entity through
//! [`Searchable`](gb_core::Searchable). This module only holds the criteria,
//! runs the generic filter-then-stable-sort, and does the page arithmetic.

use gb_core::{DEFAULT_PAGE_SIZE, FilterMap, Searchable, SortDirection};
use serde_json::Value;

/// Sort field and direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    /// Field name understood by the entity's `compare_by`.
    pub field: String,
    /// Direction.
    pub direction: SortDirection,
}

impl Default for SortSpec {
    /// `("id", asc)`: ids carry no order, so this keeps collection order.
    fn default() -> Self {
        Self {
            field: "id".to_owned(),
            direction: SortDirection::Asc,
        }
    }
}

/// The (query, sort, filters, page, page size) tuple that drives a search.
///
/// `page` and `page_size` are clamped to at least 1 by every setter.
///
/// # Examples
///
/// ```
/// use gb_core::SortDirection;
/// use gb_store::SearchCriteria;
///
/// let criteria = SearchCriteria::default()
///     .with_query("alpha")
///     .with_sort("title", SortDirection::Desc)
///     .with_filter("closed", false)
///     .with_page(0, 0);
///
/// assert_eq!(criteria.page(), 1);
/// assert_eq!(criteria.page_size(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SearchCriteria {
    /// Free-text query; empty matches everything.
    pub query: String,
    /// Sort field and direction.
    pub sort: SortSpec,
    /// Open filter map.
    pub filters: FilterMap,
    page: usize,
    page_size: usize,
}

impl Default for SearchCriteria {
    fn default() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }
}

impl SearchCriteria {
    /// Reset criteria with a specific page size.
    #[must_use]
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            query: String::new(),
            sort: SortSpec::default(),
            filters: FilterMap::default(),
            page: 1,
            page_size: page_size.max(1),
        }
    }

    /// Current page, 1-based.
    #[inline]
    #[must_use]
    pub const fn page(&self) -> usize {
        self.page
    }

    /// Results per page.
    #[inline]
    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    /// Sets page and page size, each clamped to at least 1.
    pub fn set_pagination(&mut self, page: usize, page_size: usize) {
        self.page = page.max(1);
        self.page_size = page_size.max(1);
    }

    /// Builder form of setting the query.
    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    /// Builder form of setting the sort.
    #[must_use]
    pub fn with_sort(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.sort = SortSpec {
            field: field.into(),
            direction,
        };
        self
    }

    /// Builder form of adding one filter entry.
    #[must_use]
    pub fn with_filter(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.insert(key.into(), value.into());
        self
    }

    /// Builder form of [`set_pagination`](Self::set_pagination).
    #[must_use]
    pub fn with_page(mut self, page: usize, page_size: usize) -> Self {
        self.set_pagination(page, page_size);
        self
    }
}

/// Filters `items` by query and filters, then stable-sorts them.
///
/// Equal sort keys keep their collection order, in both directions.
#[must_use]
pub fn run_search<T: Searchable>(items: &[T], criteria: &SearchCriteria) -> Vec<T> {
    let needle = criteria.query.to_lowercase();
    let mut results: Vec<T> = items
        .iter()
        .filter(|item| needle.is_empty() || item.matches_query(&needle))
        .filter(|item| {
            criteria
                .filters
                .iter()
                .all(|(key, value)| item.matches_filter(key, value))
        })
        .cloned()
        .collect();

    let field = criteria.sort.field.as_str();
    let direction = criteria.sort.direction;
    results.sort_by(|a, b| direction.apply(a.compare_by(b, field)));
    results
}

/// `max(1, ceil(total / page_size))`.
///
/// # Examples
///
/// ```
/// use gb_store::search::total_pages;
///
/// assert_eq!(total_pages(23, 10), 3);
/// assert_eq!(total_pages(20, 10), 2);
/// assert_eq!(total_pages(0, 10), 1);
/// ```
#[inline]
#[must_use]
pub const fn total_pages(total: usize, page_size: usize) -> usize {
    let pages = total.div_ceil(if page_size == 0 { 1 } else { page_size });
    if pages == 0 { 1 } else { pages }
}

/// Slice of `results` for `page` (1-based). Pages past the end are empty.
#[must_use]
pub fn page_slice<T>(results: &[T], page: usize, page_size: usize) -> &[T] {
    let start = page.saturating_sub(1).saturating_mul(page_size);
    if start >= results.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(results.len());
    &results[start..end]
}

/// Search criteria plus the last materialized results.
#[derive(Debug, Clone)]
pub struct SearchState<T> {
    criteria: SearchCriteria,
    results: Vec<T>,
    default_page_size: usize,
}

impl<T> SearchState<T> {
    /// Creates reset state using `default_page_size` for pagination.
    #[must_use]
    pub fn new(default_page_size: usize) -> Self {
        Self {
            criteria: SearchCriteria::with_page_size(default_page_size),
            results: Vec::new(),
            default_page_size: default_page_size.max(1),
        }
    }

    /// Current criteria.
    #[inline]
    #[must_use]
    pub const fn criteria(&self) -> &SearchCriteria {
        &self.criteria
    }

    /// Mutable criteria, for the store's setters.
    #[inline]
    pub fn criteria_mut(&mut self) -> &mut SearchCriteria {
        &mut self.criteria
    }

    /// Replaces the criteria wholesale.
    pub fn set_criteria(&mut self, criteria: SearchCriteria) {
        self.criteria = criteria;
    }

    /// Last materialized results.
    #[inline]
    #[must_use]
    pub fn results(&self) -> &[T] {
        &self.results
    }

    /// Stores freshly materialized results.
    pub fn set_results(&mut self, results: Vec<T>) {
        self.results = results;
    }

    /// Number of materialized results.
    #[inline]
    #[must_use]
    pub fn total_results(&self) -> usize {
        self.results.len()
    }

    /// Page count, never below 1.
    #[inline]
    #[must_use]
    pub fn total_pages(&self) -> usize {
        total_pages(self.results.len(), self.criteria.page_size)
    }

    /// The current page of results.
    #[must_use]
    pub fn paginated(&self) -> &[T] {
        page_slice(&self.results, self.criteria.page, self.criteria.page_size)
    }

    /// Restores query "", sort ("id", asc), no filters, page 1, the default
    /// page size, and no results.
    pub fn reset(&mut self) {
        self.criteria = SearchCriteria::with_page_size(self.default_page_size);
        self.results.clear();
    }
}
