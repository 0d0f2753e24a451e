//! Region processing.
//!
//! Resolves which product name the exclusion config is keyed by, finds the
//! regions a page offers, and produces per-region copies of the page with
//! the excluded tables removed.

pub mod config;
pub mod removal;

use std::collections::BTreeSet;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::detector::FilterAnalysis;
use crate::dom::{self, Document};
use crate::product::ProductConfig;

pub use config::{normalize_product_name, to_nested_map, ExclusionRecord, RawExclusionConfig, RegionExclusionConfig};
pub use removal::{plan_table_removal, remove_table_structured, BlockRole, RemovalPlan};

/// Region-id fragments recognised inside element ids.
pub const KNOWN_REGION_PATTERNS: &[&str] = &[
    "china-north",
    "china-east",
    "china-south",
    "beijing",
    "shanghai",
    "guangzhou",
    "shenzhen",
    "cn-north",
    "cn-east",
    "cn-south",
];

/// Tokens kept upper-case when a product name is inferred from a file name.
const ACRONYMS: &[&str] = &["api", "ml", "ai", "sql", "vm", "vpn", "cdn", "dns"];

/// Display name of a known region id.
#[must_use]
pub fn known_region_name(region_id: &str) -> Option<&'static str> {
    match region_id {
        "north-china" => Some("中国北部"),
        "north-china2" => Some("中国北部 2"),
        "north-china3" => Some("中国北部 3"),
        "east-china" => Some("中国东部"),
        "east-china2" => Some("中国东部 2"),
        "east-china3" => Some("中国东部 3"),
        _ => None,
    }
}

/// Display name for `region_id`: known name, then the page's own label,
/// then the id title-cased.
#[must_use]
pub fn region_display_name(region_id: &str, filters: Option<&FilterAnalysis>) -> String {
    if let Some(name) = known_region_name(region_id) {
        return name.to_string();
    }
    if let Some(label) = filters.and_then(|f| f.region_label(region_id)) {
        return label.to_string();
    }
    region_id
        .split(['-', '_'])
        .filter(|t| !t.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Product name inferred from an HTML file name.
///
/// # Example
///
/// ```rust
/// use std::path::Path;
/// use rs_pricing_cms::region::infer_product_name_from_file;
///
/// assert_eq!(infer_product_name_from_file(Path::new("api-management-index.html")), "API Management");
/// assert_eq!(infer_product_name_from_file(Path::new("machine_learning.html")), "Machine Learning");
/// ```
#[must_use]
pub fn infer_product_name_from_file(path: &Path) -> String {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
    let stem = stem.strip_suffix("-index").unwrap_or(stem);
    stem.split(['-', '_'])
        .filter(|t| !t.is_empty())
        .map(|token| {
            let lower = token.to_lowercase();
            if lower == "iot" {
                "IoT".to_string()
            } else if ACRONYMS.contains(&lower.as_str()) {
                token.to_uppercase()
            } else {
                capitalize(token)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Region detection and exclusion-driven filtering.
#[derive(Debug, Clone, Default)]
pub struct RegionProcessor {
    exclusions: RegionExclusionConfig,
}

impl RegionProcessor {
    #[must_use]
    pub fn new(exclusions: RegionExclusionConfig) -> Self {
        Self { exclusions }
    }

    /// Processor over an exclusion file; a missing or malformed file means
    /// nothing is excluded.
    #[must_use]
    pub fn from_config_file(path: &Path) -> Self {
        Self::new(RegionExclusionConfig::load_or_empty(path))
    }

    #[must_use]
    pub fn exclusions(&self) -> &RegionExclusionConfig {
        &self.exclusions
    }

    /// Name the exclusion config is keyed by for this page.
    ///
    /// Order: first software option value, configured display name, file
    /// name inference.
    #[must_use]
    pub fn resolve_product_name(
        &self,
        product_config: Option<&ProductConfig>,
        filters: Option<&FilterAnalysis>,
        file_path: &Path,
    ) -> String {
        if let Some(option) = filters.and_then(|f| f.software_options.first()) {
            info!(product = %option.value, "product name from software filter");
            return option.value.clone();
        }
        if let Some(config) = product_config.filter(|c| !c.display_name.trim().is_empty()) {
            debug!(product = %config.display_name, "product name from product config");
            return config.display_name.trim().to_string();
        }
        let inferred = infer_product_name_from_file(file_path);
        warn!(product = %inferred, file = %file_path.display(), "product name inferred from file name");
        inferred
    }

    /// Regions offered by the page, deduplicated and sorted.
    #[must_use]
    pub fn detect_available_regions(&self, doc: &Document) -> Vec<String> {
        let mut regions = BTreeSet::new();

        for container in dom::elements(&doc.select(".region-container")) {
            if let Some(id) = dom::non_empty_attribute(&container, "id") {
                regions.insert(id);
            }
        }

        for element in dom::elements(&doc.select("[data-region]")) {
            if let Some(region) = dom::non_empty_attribute(&element, "data-region") {
                regions.insert(region);
            }
        }

        let ids: Vec<String> = dom::elements(&doc.select("[id]"))
            .iter()
            .filter_map(dom::id)
            .map(|id| id.to_lowercase())
            .collect();
        for pattern in KNOWN_REGION_PATTERNS {
            if ids.iter().any(|id| id.contains(pattern)) {
                regions.insert((*pattern).to_string());
            }
        }

        for select in dom::elements(&doc.select("select")) {
            let name = dom::get_attribute(&select, "name").unwrap_or_default().to_lowercase();
            let id = dom::id(&select).unwrap_or_default().to_lowercase();
            let is_region_select = [name, id]
                .iter()
                .any(|s| s.contains("region") || s.contains("location"));
            if !is_region_select {
                continue;
            }
            for option in dom::elements(&select.select("option")) {
                if let Some(value) = dom::non_empty_attribute(&option, "value") {
                    if value.chars().count() > 2 {
                        regions.insert(value);
                    }
                }
            }
        }

        let regions: Vec<String> = regions.into_iter().collect();
        debug!(count = regions.len(), ?regions, "available regions");
        regions
    }

    /// Copy of `doc` with the tables excluded for `(product_name, region_id)`
    /// removed.
    ///
    /// An unknown product, or a region without entries, returns an unchanged
    /// copy. `doc` itself is never modified.
    #[must_use]
    pub fn apply_region_filtering(&self, doc: &Document, region_id: &str, product_name: &str) -> Document {
        let filtered = dom::clone_document(doc);

        let Some(regions) = self.exclusions.product(product_name) else {
            debug!(product = %product_name, "no exclusions for product, keeping all tables");
            return filtered;
        };
        let excluded: Vec<&str> = regions
            .get(region_id)
            .map(|ids| ids.iter().map(|id| id.trim().trim_start_matches('#')).filter(|id| !id.is_empty()).collect())
            .unwrap_or_default();
        if excluded.is_empty() {
            debug!(product = %product_name, region = %region_id, "no exclusions for region, keeping all tables");
            return filtered;
        }

        let removed = {
            let plans: Vec<_> = dom::elements(&filtered.select("[id]"))
                .into_iter()
                .filter(|el| {
                    dom::id(el).is_some_and(|id| excluded.contains(&id.trim_start_matches('#')))
                })
                .map(|el| plan_table_removal(&el))
                .collect();
            removal::apply_plans(plans)
        };

        info!(
            product = %product_name,
            region = %region_id,
            excluded = excluded.len(),
            removed,
            "region filtering applied"
        );
        filtered
    }
}
