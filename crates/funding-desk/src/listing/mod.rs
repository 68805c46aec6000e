//! Composable list queries: free-text search, category filters, and a single
//! active sort, applied in that order.
//!
//! Filters compose the way the list views expect: values inside the same
//! category are ORed, categories are ANDed, and the search needle must match
//! at least one searchable field. Setting a sort replaces the previous one;
//! sorts never stack.

pub mod applications;
pub mod books;

use std::cmp::Ordering;

/// Rows that can be matched by the free-text search.
pub trait Searchable {
    /// The field values a search needle is checked against.
    fn search_fields(&self) -> Vec<&str>;
}

/// One concrete filter value. `category` groups values for OR composition.
pub trait FilterRule<R> {
    fn category(&self) -> &'static str;
    fn matches(&self, row: &R) -> bool;
    fn label(&self) -> String;
}

/// An active sort order over rows.
pub trait SortRule<R> {
    fn compare(&self, a: &R, b: &R) -> Ordering;
    fn label(&self) -> &'static str;
}

/// Current query state of one list view.
#[derive(Debug, Clone, Default)]
pub struct ListQueryState<F, S> {
    search: String,
    filters: Vec<F>,
    sort: Option<S>,
}

impl<F, S> ListQueryState<F, S> {
    pub fn new() -> Self {
        Self {
            search: String::new(),
            filters: Vec::new(),
            sort: None,
        }
    }

    pub fn set_search(&mut self, needle: impl Into<String>) {
        self.search = needle.into();
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// Replace the active filter set wholesale, mirroring a filter dialog's
    /// confirm action.
    pub fn set_filters(&mut self, filters: Vec<F>) {
        self.filters = filters;
    }

    pub fn filters(&self) -> &[F] {
        &self.filters
    }

    /// Replace the active sort. `None` restores the view's natural order.
    pub fn set_sort(&mut self, sort: Option<S>) {
        self.sort = sort;
    }

    pub fn sort(&self) -> Option<&S> {
        self.sort.as_ref()
    }

    /// Drop search, filters, and sort in one step.
    pub fn clear_all(&mut self) {
        self.search.clear();
        self.filters.clear();
        self.sort = None;
    }

    pub fn is_active(&self) -> bool {
        !self.search.trim().is_empty() || !self.filters.is_empty() || self.sort.is_some()
    }
}

impl<F, S> ListQueryState<F, S> {
    /// Whether a single row survives the current search and filters.
    pub fn matches<R>(&self, row: &R) -> bool
    where
        R: Searchable,
        F: FilterRule<R>,
        S: SortRule<R>,
    {
        self.matches_search(row) && self.matches_filters(row)
    }

    /// Filter and sort a snapshot of rows. The incoming order is preserved
    /// when no sort is active.
    pub fn apply<R>(&self, rows: &[R]) -> Vec<R>
    where
        R: Searchable + Clone,
        F: FilterRule<R>,
        S: SortRule<R>,
    {
        let mut out: Vec<R> = rows.iter().filter(|row| self.matches(row)).cloned().collect();
        if let Some(sort) = &self.sort {
            out.sort_by(|a, b| sort.compare(a, b));
        }
        out
    }

    /// Infobar text describing the active query, `None` when nothing is set.
    pub fn summary<R>(&self) -> Option<String>
    where
        R: Searchable,
        F: FilterRule<R>,
        S: SortRule<R>,
    {
        if !self.is_active() {
            return None;
        }
        let mut parts = Vec::new();
        let needle = self.search.trim();
        if !needle.is_empty() {
            parts.push(format!("Search: \"{needle}\""));
        }
        let mut categories: Vec<&'static str> = Vec::new();
        for filter in &self.filters {
            let category = filter.category();
            if !categories.contains(&category) {
                categories.push(category);
            }
        }
        if !categories.is_empty() {
            parts.push(format!("Filtered by: {}", categories.join(", ")));
        }
        if let Some(sort) = &self.sort {
            parts.push(format!("Sorted by: {}", sort.label()));
        }
        Some(parts.join(" | "))
    }

    fn matches_search<R>(&self, row: &R) -> bool
    where
        R: Searchable,
    {
        let needle = self.search.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        row.search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }

    fn matches_filters<R>(&self, row: &R) -> bool
    where
        F: FilterRule<R>,
    {
        let mut categories: Vec<&'static str> = Vec::new();
        for filter in &self.filters {
            let category = filter.category();
            if !categories.contains(&category) {
                categories.push(category);
            }
        }
        // OR within a category, AND across categories.
        categories.into_iter().all(|category| {
            self.filters
                .iter()
                .filter(|filter| filter.category() == category)
                .any(|filter| filter.matches(row))
        })
    }
}
