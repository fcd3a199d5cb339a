//! Content-addressed cache of parsed taxonomies.
//!
//! Filings of the same company and year usually ship identical taxonomy
//! files. The cache is an explicit object handed to each worker; entries are
//! never invalidated because a published taxonomy does not change.

use crate::error::Result;
use crate::taxonomy::{Taxonomy, TaxonomyBundle};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Shared cache of parsed taxonomies keyed by bundle content hash.
#[derive(Debug, Default)]
pub struct TaxonomyCache {
    entries: RwLock<HashMap<String, Arc<Taxonomy>>>,
}

impl TaxonomyCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached taxonomy for `bundle`, parsing it on a miss.
    ///
    /// Parsing happens outside the write lock. Two workers racing on the same
    /// bundle both parse it and the first insert wins.
    pub fn get_or_parse(&self, bundle: &TaxonomyBundle) -> Result<Arc<Taxonomy>> {
        let key = bundle.content_hash();
        if let Some(hit) = self.get(&key) {
            tracing::debug!(key = %&key[..12], "taxonomy cache hit");
            return Ok(hit);
        }

        let parsed = Arc::new(Taxonomy::parse(bundle)?);
        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let entry = entries.entry(key).or_insert(parsed);
        Ok(Arc::clone(entry))
    }

    /// Looks up a taxonomy by content hash.
    pub fn get(&self, key: &str) -> Option<Arc<Taxonomy>> {
        self.entries
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Number of cached taxonomies.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }

    /// Returns true if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
