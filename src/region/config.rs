//! Region exclusion configuration.
//!
//! The exclusion file maps a product name and region to the ids of the
//! tables that must not appear for that region. It comes in two shapes:
//!
//! ```json
//! [{"os": "API Management", "region": "east-china", "tableIDs": ["#t1"]}]
//! ```
//!
//! ```json
//! {"API Management": {"east-china": ["#t1"]}}
//! ```
//!
//! Both normalize to the same [`RegionExclusionConfig`].

use std::collections::HashMap;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Region id to excluded table ids.
pub type RegionTables = IndexMap<String, Vec<String>>;

/// One record of the flat exclusion shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusionRecord {
    pub os: String,
    pub region: String,
    #[serde(rename = "tableIDs", default)]
    pub table_ids: Vec<String>,
}

/// Either accepted exclusion shape, as read from disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawExclusionConfig {
    Flat(Vec<ExclusionRecord>),
    Nested(IndexMap<String, RegionTables>),
}

/// Product → region → excluded table ids, with a normalized-name index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionExclusionConfig {
    products: IndexMap<String, RegionTables>,
    normalized: HashMap<String, String>,
}

impl RegionExclusionConfig {
    /// Builds the config from a nested map.
    #[must_use]
    pub fn from_nested(products: IndexMap<String, RegionTables>) -> Self {
        let normalized = products
            .keys()
            .map(|k| (normalize_product_name(k), k.clone()))
            .collect();
        Self { products, normalized }
    }

    /// Parses either shape from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: RawExclusionConfig = serde_json::from_str(json)
            .map_err(|e| Error::ConfigMalformed(format!("region exclusions: {e}")))?;
        Ok(to_nested_map(raw))
    }

    /// Reads and parses an exclusion file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| Error::ConfigMalformed(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&json)
    }

    /// Like [`load`](Self::load), but a missing or malformed file yields an
    /// empty config (exclude nothing) and a warning.
    #[must_use]
    pub fn load_or_empty(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => {
                debug!(path = %path.display(), products = config.len(), "region exclusions loaded");
                config
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "region exclusions unavailable, nothing will be excluded");
                Self::default()
            }
        }
    }

    /// Region map for `product`: exact key first, then normalized name.
    #[must_use]
    pub fn product(&self, product: &str) -> Option<&RegionTables> {
        self.products.get(product).or_else(|| {
            self.normalized
                .get(&normalize_product_name(product))
                .and_then(|key| self.products.get(key))
        })
    }

    /// Excluded table ids for `(product, region)`.
    #[must_use]
    pub fn excluded_tables(&self, product: &str, region: &str) -> Option<&[String]> {
        self.product(product)
            .and_then(|regions| regions.get(region))
            .map(Vec::as_slice)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// The nested product map.
    #[must_use]
    pub fn products(&self) -> &IndexMap<String, RegionTables> {
        &self.products
    }
}

/// Converts either shape into the nested config.
///
/// Flat records for the same product and region are merged, keeping the
/// first occurrence of each table id.
#[must_use]
pub fn to_nested_map(raw: RawExclusionConfig) -> RegionExclusionConfig {
    match raw {
        RawExclusionConfig::Nested(products) => RegionExclusionConfig::from_nested(products),
        RawExclusionConfig::Flat(records) => {
            let mut products: IndexMap<String, RegionTables> = IndexMap::new();
            for record in records {
                let tables = products
                    .entry(record.os)
                    .or_default()
                    .entry(record.region)
                    .or_default();
                for id in record.table_ids {
                    if !tables.contains(&id) {
                        tables.push(id);
                    }
                }
            }
            RegionExclusionConfig::from_nested(products)
        }
    }
}

/// Canonical form of a product name for lookups.
///
/// Lowercases, strips `azure ` / `microsoft ` prefixes, turns whitespace and
/// underscores into hyphens and collapses repeated hyphens.
///
/// # Example
///
/// ```rust
/// use rs_pricing_cms::region::normalize_product_name;
///
/// assert_eq!(normalize_product_name("Azure  API Management"), "api-management");
/// assert_eq!(normalize_product_name("Microsoft Azure SQL_Database"), "sql-database");
/// ```
#[must_use]
pub fn normalize_product_name(name: &str) -> String {
    let mut lowered = name.trim().to_lowercase();
    loop {
        let stripped = ["azure ", "microsoft "]
            .iter()
            .find_map(|prefix| lowered.strip_prefix(prefix).map(|rest| rest.trim_start().to_string()));
        match stripped {
            Some(rest) => lowered = rest,
            None => break,
        }
    }

    let mut out = String::with_capacity(lowered.len());
    for ch in lowered.chars() {
        let ch = if ch.is_whitespace() || ch == '_' { '-' } else { ch };
        if ch == '-' && out.ends_with('-') {
            continue;
        }
        out.push(ch);
    }
    out.trim_matches('-').to_string()
}
