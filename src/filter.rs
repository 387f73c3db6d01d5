//! Tag + text filtering over the catalog.
//!
//! Every mutation recomputes the visible set and pushes it to the subscribed
//! observers, so callers never need to ask for a refresh.

use std::collections::HashSet;
use tracing::debug;

use crate::catalog::Catalog;
use crate::error::{BrowserError, Result};
use crate::observability::metrics;
use crate::types::{Filter, PlaceId};

/// Receives the visible set after every recompute
pub trait VisibilityObserver: Send + Sync {
    fn visible_changed(&self, visible: &[PlaceId]);
}

/// The parts of a place the filter looks at
#[derive(Debug, Clone)]
pub struct FilterEntry {
    pub id: PlaceId,
    pub name: String,
    pub tags: Vec<String>,
}

pub struct FilterEngine {
    entries: Vec<FilterEntry>,
    filters: Vec<Filter>,
    query: String,
    visible: Vec<PlaceId>,
    observers: Vec<Box<dyn VisibilityObserver>>,
}

impl FilterEngine {
    pub fn new(catalog: &Catalog) -> Self {
        let entries = catalog
            .places()
            .iter()
            .map(|p| FilterEntry {
                id: p.id,
                name: p.name.clone(),
                tags: p.tags.clone(),
            })
            .collect();
        let mut engine = Self {
            entries,
            filters: catalog.filters().to_vec(),
            query: String::new(),
            visible: Vec::new(),
            observers: Vec::new(),
        };
        engine.recompute();
        engine
    }

    /// Register an observer; it immediately receives the current visible set.
    pub fn subscribe(&mut self, observer: Box<dyn VisibilityObserver>) {
        observer.visible_changed(&self.visible);
        self.observers.push(observer);
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn enabled_filters(&self) -> Vec<&str> {
        self.filters
            .iter()
            .filter(|f| f.enabled)
            .map(|f| f.name.as_str())
            .collect()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn visible(&self) -> &[PlaceId] {
        &self.visible
    }

    pub fn is_visible(&self, id: PlaceId) -> bool {
        self.visible.contains(&id)
    }

    /// Flip a filter and return its new state.
    pub fn toggle(&mut self, name: &str) -> Result<bool> {
        let filter = self.find_mut(name)?;
        filter.enabled = !filter.enabled;
        let enabled = filter.enabled;
        debug!(filter = name, enabled, "Filter toggled");
        self.recompute();
        Ok(enabled)
    }

    pub fn set_enabled(&mut self, name: &str, enabled: bool) -> Result<()> {
        let filter = self.find_mut(name)?;
        if filter.enabled != enabled {
            filter.enabled = enabled;
            self.recompute();
        }
        Ok(())
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        if query != self.query {
            self.query = query;
            self.recompute();
        }
    }

    fn find_mut(&mut self, name: &str) -> Result<&mut Filter> {
        self.filters
            .iter_mut()
            .find(|f| f.name == name)
            .ok_or_else(|| BrowserError::UnknownFilter(name.to_string()))
    }

    fn recompute(&mut self) {
        let enabled: HashSet<&str> = self
            .filters
            .iter()
            .filter(|f| f.enabled)
            .map(|f| f.name.as_str())
            .collect();
        self.visible = visible_places(&self.entries, &enabled, &self.query);
        metrics::filters::recomputed(self.visible.len());
        debug!(visible = self.visible.len(), query = %self.query, "Visible places recomputed");

        for observer in &self.observers {
            observer.visible_changed(&self.visible);
        }
    }
}

/// Places whose tags intersect `enabled` and, when `query` is non-empty, whose
/// name contains it case-insensitively. Catalog order is preserved.
pub fn visible_places(
    entries: &[FilterEntry],
    enabled: &HashSet<&str>,
    query: &str,
) -> Vec<PlaceId> {
    let needle = query.to_lowercase();
    entries
        .iter()
        .filter(|e| e.tags.iter().any(|t| enabled.contains(t.as_str())))
        .filter(|e| needle.is_empty() || e.name.to_lowercase().contains(&needle))
        .map(|e| e.id)
        .collect()
}
