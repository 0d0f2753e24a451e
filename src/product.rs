//! Product configuration and the shared configuration cache.
//!
//! The catalog is a JSON map `productKey → ProductConfig`. Lookups go
//! through a [`ConfigCache`] with a time-to-live; the cache takes its notion
//! of "now" from an injected [`Clock`] so expiry can be driven by tests.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::strategy::StrategyType;

/// Static configuration of one product page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductConfig {
    pub display_name: String,
    pub filename: String,
    pub url: String,
    pub slug: String,
    pub category: String,
    pub important_section_titles: Vec<String>,
    /// Per-strategy overrides keyed by strategy name, plus `common`.
    #[serde(alias = "extraction_strategy", skip_serializing_if = "Option::is_none")]
    pub extraction_strategy: Option<Map<String, Value>>,
}

impl ProductConfig {
    /// Overrides for `strategy_type`: `common` first, then the
    /// strategy-specific block on top.
    #[must_use]
    pub fn strategy_overrides(&self, strategy_type: StrategyType) -> Map<String, Value> {
        let mut merged = Map::new();
        let Some(blocks) = &self.extraction_strategy else {
            return merged;
        };
        for key in ["common", strategy_type.as_str()] {
            if let Some(Value::Object(block)) = blocks.get(key) {
                for (k, v) in block {
                    merged.insert(k.clone(), v.clone());
                }
            }
        }
        merged
    }
}

/// Ordered map of product key to configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductCatalog {
    products: IndexMap<String, ProductConfig>,
}

impl ProductCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a catalog from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::ConfigMalformed(format!("product catalog: {e}")))
    }

    /// Loads a catalog file; an unreadable or malformed file yields an
    /// empty catalog and a warning.
    #[must_use]
    pub fn load_or_empty(path: &Path) -> Self {
        let loaded = std::fs::read_to_string(path)
            .map_err(|e| Error::ConfigMalformed(format!("{}: {e}", path.display())))
            .and_then(|json| Self::from_json_str(&json));
        match loaded {
            Ok(catalog) => catalog,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "product catalog unavailable, continuing without overrides");
                Self::default()
            }
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, config: ProductConfig) {
        self.products.insert(key.into(), config);
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ProductConfig> {
        self.products.get(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Product key for an HTML file.
    ///
    /// Matches the file stem (minus a trailing `-index`) against catalog
    /// keys, then against configured filenames. Without a match the bare
    /// stem is returned.
    #[must_use]
    pub fn detect_product_key(&self, path: &Path) -> String {
        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
        let base = stem.strip_suffix("-index").unwrap_or(stem);

        if self.products.contains_key(base) {
            return base.to_string();
        }
        let file_name = path.file_name().and_then(|s| s.to_str()).unwrap_or_default();
        self.products
            .iter()
            .find(|(_, config)| {
                !config.filename.is_empty() && (config.filename == file_name || config.filename == stem)
            })
            .map_or_else(|| base.to_string(), |(key, _)| key.clone())
    }
}

/// Source of the current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Mutex-guarded map with per-entry expiry.
pub struct ConfigCache<V> {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    entries: Mutex<HashMap<String, (Instant, Arc<V>)>>,
}

impl<V> std::fmt::Debug for ConfigCache<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigCache")
            .field("ttl", &self.ttl)
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

impl<V> ConfigCache<V> {
    /// Cache on the system clock.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    #[must_use]
    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl,
            clock,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Fresh entry for `key`; expired entries are evicted on read.
    pub fn get(&self, key: &str) -> Option<Arc<V>> {
        let now = self.clock.now();
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let entry = entries
            .get(key)
            .map(|(inserted, value)| (now.duration_since(*inserted) < self.ttl, Arc::clone(value)));
        match entry {
            Some((true, value)) => Some(value),
            Some((false, _)) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    pub fn insert(&self, key: &str, value: V) -> Arc<V> {
        let value = Arc::new(value);
        let now = self.clock.now();
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), (now, Arc::clone(&value)));
        value
    }

    /// Cached value, or the result of `load` stored under `key`.
    ///
    /// `None` from `load` is not cached.
    pub fn get_or_insert_with<F>(&self, key: &str, load: F) -> Option<Arc<V>>
    where
        F: FnOnce() -> Option<V>,
    {
        if let Some(hit) = self.get(key) {
            return Some(hit);
        }
        load().map(|value| self.insert(key, value))
    }

    pub fn clear(&self) {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Serves product configurations from a catalog through the cache.
#[derive(Debug)]
pub struct ProductManager {
    catalog: ProductCatalog,
    cache: ConfigCache<ProductConfig>,
}

impl ProductManager {
    #[must_use]
    pub fn new(catalog: ProductCatalog, cache: ConfigCache<ProductConfig>) -> Self {
        Self { catalog, cache }
    }

    /// Manager over `catalog` with a system-clock cache of `ttl`.
    #[must_use]
    pub fn with_ttl(catalog: ProductCatalog, ttl: Duration) -> Self {
        Self::new(catalog, ConfigCache::new(ttl))
    }

    #[must_use]
    pub fn catalog(&self) -> &ProductCatalog {
        &self.catalog
    }

    /// Configuration for `key`, cached.
    #[must_use]
    pub fn get_product_config(&self, key: &str) -> Option<Arc<ProductConfig>> {
        self.cache.get_or_insert_with(key, || {
            let config = self.catalog.get(key).cloned();
            if config.is_none() {
                debug!(product = %key, "no product configuration");
            }
            config
        })
    }

    #[must_use]
    pub fn detect_product_key(&self, path: &Path) -> String {
        self.catalog.detect_product_key(path)
    }

    #[must_use]
    pub fn cache(&self) -> &ConfigCache<ProductConfig> {
        &self.cache
    }
}
