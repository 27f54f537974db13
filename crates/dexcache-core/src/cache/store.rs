use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use crate::models::{CategoryListing, Pokemon, SpeciesInfo};
use crate::utils::age_display;

/// A cached value and the moment it was fetched.
/// Cloning shares the value.
#[derive(Debug)]
pub struct CachedData<T> {
    pub data: Arc<T>,
    pub cached_at: DateTime<Utc>,
}

impl<T> Clone for CachedData<T> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
            cached_at: self.cached_at,
        }
    }
}

impl<T> CachedData<T> {
    pub fn new(data: T) -> Self {
        Self {
            data: Arc::new(data),
            cached_at: Utc::now(),
        }
    }

    pub fn age_minutes(&self) -> i64 {
        (Utc::now() - self.cached_at).num_minutes()
    }
}

/// Entry counts per store.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CacheStats {
    /// Distinct records, regardless of how many keys point at them
    pub records: usize,
    /// Keys in the record store (ids, names, and raw lookups)
    pub record_keys: usize,
    pub species: usize,
    pub categories: usize,
    pub listing_loaded: bool,
    pub oldest_entry: Option<DateTime<Utc>>,
}

impl CacheStats {
    /// Age of the oldest entry, "never" for an empty cache.
    pub fn oldest_age_display(&self) -> String {
        self.oldest_entry
            .map(|at| age_display(at, Utc::now()))
            .unwrap_or_else(|| "never".to_string())
    }
}

/// Session-scoped stores. Insert-only; no eviction.
#[derive(Default)]
pub struct SessionCache {
    records: RwLock<HashMap<String, CachedData<Pokemon>>>,
    species: RwLock<HashMap<u32, CachedData<SpeciesInfo>>>,
    categories: RwLock<HashMap<String, CachedData<CategoryListing>>>,
    listing: RwLock<Option<CachedData<Vec<String>>>>,
}

impl SessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    // ===== Records =====

    pub async fn record(&self, key: &str) -> Option<Arc<Pokemon>> {
        self.records
            .read()
            .await
            .get(key)
            .map(|c| Arc::clone(&c.data))
    }

    /// Store a fetched record under the key it was requested with, its
    /// numeric id, and its lowercased name. If the record is already cached
    /// under its id, that entry is reused so every key yields the same value.
    pub async fn insert_record(&self, requested_key: &str, record: Pokemon) -> Arc<Pokemon> {
        let id_key = record.id.to_string();
        let name_key = record.name.to_lowercase();

        let mut records = self.records.write().await;
        let entry = records
            .get(&id_key)
            .cloned()
            .unwrap_or_else(|| CachedData::new(record));

        for key in [requested_key.to_string(), id_key, name_key] {
            records.entry(key).or_insert_with(|| entry.clone());
        }
        debug!(key = requested_key, total_keys = records.len(), "Cached record");

        entry.data
    }

    // ===== Species =====

    pub async fn species(&self, id: u32) -> Option<Arc<SpeciesInfo>> {
        self.species
            .read()
            .await
            .get(&id)
            .map(|c| Arc::clone(&c.data))
    }

    pub async fn insert_species(&self, id: u32, info: SpeciesInfo) -> Arc<SpeciesInfo> {
        let mut species = self.species.write().await;
        Arc::clone(&species.entry(id).or_insert_with(|| CachedData::new(info)).data)
    }

    // ===== Categories =====

    pub async fn category(&self, name: &str) -> Option<Arc<CategoryListing>> {
        self.categories
            .read()
            .await
            .get(name)
            .map(|c| Arc::clone(&c.data))
    }

    pub async fn insert_category(&self, listing: CategoryListing) -> Arc<CategoryListing> {
        let mut categories = self.categories.write().await;
        let key = listing.name.clone();
        Arc::clone(
            &categories
                .entry(key)
                .or_insert_with(|| CachedData::new(listing))
                .data,
        )
    }

    // ===== Name listing =====

    pub async fn listing(&self) -> Option<Arc<Vec<String>>> {
        self.listing
            .read()
            .await
            .as_ref()
            .map(|c| Arc::clone(&c.data))
    }

    pub async fn insert_listing(&self, names: Vec<String>) -> Arc<Vec<String>> {
        let mut listing = self.listing.write().await;
        Arc::clone(&listing.get_or_insert_with(|| CachedData::new(names)).data)
    }

    // ===== Diagnostics =====

    pub async fn stats(&self) -> CacheStats {
        let records = self.records.read().await;
        let species = self.species.read().await;
        let categories = self.categories.read().await;
        let listing = self.listing.read().await;

        let distinct: HashSet<u32> = records.values().map(|c| c.data.id).collect();

        let oldest_entry = records
            .values()
            .map(|c| c.cached_at)
            .chain(species.values().map(|c| c.cached_at))
            .chain(categories.values().map(|c| c.cached_at))
            .chain(listing.iter().map(|c| c.cached_at))
            .min();

        CacheStats {
            records: distinct.len(),
            record_keys: records.len(),
            species: species.len(),
            categories: categories.len(),
            listing_loaded: listing.is_some(),
            oldest_entry,
        }
    }
}
