//! Strategy selection.
//!
//! File size first: anything above the large-file threshold takes the
//! large-file path without being parsed. Otherwise the page is classified
//! from its DOM, scored, and the descriptor is completed with priority
//! features and configuration overrides. Classification failures never
//! escape: they turn into the fallback strategy.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde_json::{json, Map, Value};
use tracing::{debug, info, warn};

use super::large_file::memory_limit_mb;
use super::{ExtractionStrategy, ProcessingMode, StrategyType};
use crate::detector::{PageAnalysis, PageAnalyzer, PageComplexity};
use crate::dom;
use crate::encoding::decode_html;
use crate::error::{Error, Result};
use crate::options::Options;
use crate::product::{ProductConfig, ProductManager};

/// Pages with more interactive elements than this get the
/// `interactive_elements` priority feature.
const INTERACTIVE_PRIORITY_THRESHOLD: usize = 10;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Selects an [`ExtractionStrategy`] per page.
#[derive(Debug, Clone, Default)]
pub struct StrategyManager {
    options: Options,
    analyzer: PageAnalyzer,
    products: Option<Arc<ProductManager>>,
}

impl StrategyManager {
    #[must_use]
    pub fn new(options: Options) -> Self {
        Self {
            options,
            analyzer: PageAnalyzer::new(),
            products: None,
        }
    }

    /// Manager that reads product overrides from `products`.
    #[must_use]
    pub fn with_products(mut self, products: Arc<ProductManager>) -> Self {
        self.products = Some(products);
        self
    }

    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Strategy for the page stored at `path`.
    ///
    /// A missing file is measured as 0 MB and then fails classification,
    /// which yields the fallback strategy.
    #[must_use]
    pub fn determine_strategy(&self, path: &Path, product_key: Option<&str>) -> ExtractionStrategy {
        let size_mb = file_size_mb(path);
        let product = self.product_config(product_key);

        if self.options.is_large_file(size_mb) {
            let strategy = self.large_file_strategy(size_mb, product_key, product.as_deref());
            info!(
                file = %path.display(),
                size_mb,
                mode = strategy.override_str("processing_mode").unwrap_or_default(),
                "large file strategy"
            );
            return strategy;
        }

        let html = match fs::read(path) {
            Ok(bytes) => decode_html(&bytes),
            Err(err) => {
                let err = Error::ClassificationFailed(format!("{}: {err}", path.display()));
                warn!(file = %path.display(), error = %err, "using fallback strategy");
                return ExtractionStrategy::fallback();
            }
        };
        self.strategy_for_html(&html, size_mb, product_key, product.as_deref())
    }

    /// Strategy for already-loaded HTML of `size_mb`.
    #[must_use]
    pub fn determine_strategy_for_html(&self, html: &str, size_mb: f64, product_key: Option<&str>) -> ExtractionStrategy {
        let product = self.product_config(product_key);
        if self.options.is_large_file(size_mb) {
            let strategy = self.large_file_strategy(size_mb, product_key, product.as_deref());
            info!(
                size_mb,
                mode = strategy.override_str("processing_mode").unwrap_or_default(),
                "large file strategy"
            );
            return strategy;
        }
        self.strategy_for_html(html, size_mb, product_key, product.as_deref())
    }

    /// DOM analysis and complexity of `html`.
    ///
    /// # Errors
    ///
    /// [`Error::ClassificationFailed`] when there is no markup to classify.
    pub fn classify_html(&self, html: &str, size_mb: f64) -> Result<(PageAnalysis, PageComplexity)> {
        if html.trim().is_empty() {
            return Err(Error::ClassificationFailed("empty document".to_string()));
        }
        let doc = dom::parse(html);
        if !doc.select("body *").exists() {
            return Err(Error::ClassificationFailed("document has no body content".to_string()));
        }
        let analysis = self.analyzer.analyze(&doc);
        let complexity = self.analyzer.page_complexity(
            &doc,
            &analysis,
            size_mb,
            false,
            self.options.size_bonus_threshold_mb,
        );
        Ok((analysis, complexity))
    }

    fn strategy_for_html(
        &self,
        html: &str,
        size_mb: f64,
        product_key: Option<&str>,
        product: Option<&ProductConfig>,
    ) -> ExtractionStrategy {
        match self.classify_html(html, size_mb) {
            Ok((analysis, complexity)) => {
                let strategy_type = analysis.page_type();
                let strategy = self.build_strategy(strategy_type, &complexity, product_key, product, Map::new());
                info!(
                    strategy = %strategy.strategy_type,
                    score = strategy.complexity_score,
                    priority = ?strategy.priority_features,
                    "strategy selected"
                );
                strategy
            }
            Err(err) => {
                warn!(error = %err, "using fallback strategy");
                ExtractionStrategy::fallback()
            }
        }
    }

    fn large_file_strategy(
        &self,
        size_mb: f64,
        product_key: Option<&str>,
        product: Option<&ProductConfig>,
    ) -> ExtractionStrategy {
        let mode = ProcessingMode::for_size(size_mb, &self.options);
        let mut base = Map::new();
        base.insert("file_size_mb".to_string(), json!(size_mb));
        base.insert("processing_mode".to_string(), json!(mode.as_str()));
        base.insert("memory_limit_mb".to_string(), json!(memory_limit_mb(size_mb, &self.options)));
        if let Some(chunk_size) = mode.chunk_size() {
            base.insert("chunk_size".to_string(), json!(chunk_size));
        }

        let complexity = PageComplexity {
            file_size_mb: size_mb,
            is_large_file: true,
            size_bonus_threshold_mb: self.options.size_bonus_threshold_mb,
            ..PageComplexity::default()
        };
        self.build_strategy(StrategyType::LargeFile, &complexity, product_key, product, base)
    }

    fn build_strategy(
        &self,
        strategy_type: StrategyType,
        complexity: &PageComplexity,
        product_key: Option<&str>,
        product: Option<&ProductConfig>,
        base_overrides: Map<String, Value>,
    ) -> ExtractionStrategy {
        let mut config_overrides = base_overrides;
        if let Some(product) = product {
            config_overrides.extend(product.strategy_overrides(strategy_type));
        }
        if let Some(key) = product_key {
            config_overrides.extend(hardcoded_overrides(key, strategy_type));
        }

        ExtractionStrategy {
            priority_features: priority_features(strategy_type, complexity),
            config_overrides,
            complexity_score: complexity.score(),
            ..ExtractionStrategy::for_type(strategy_type)
        }
    }

    fn product_config(&self, product_key: Option<&str>) -> Option<Arc<ProductConfig>> {
        let key = product_key?;
        self.products.as_ref()?.get_product_config(key)
    }
}

/// Size of the file at `path` in MB; 0 when it cannot be read.
#[must_use]
pub fn file_size_mb(path: &Path) -> f64 {
    match fs::metadata(path) {
        Ok(metadata) => metadata.len() as f64 / BYTES_PER_MB,
        Err(err) => {
            warn!(file = %path.display(), error = %err, "file size unavailable, assuming 0 MB");
            0.0
        }
    }
}

/// Signals that fired for this page, followed by the type's own extra.
#[must_use]
pub fn priority_features(strategy_type: StrategyType, complexity: &PageComplexity) -> Vec<String> {
    let mut features: Vec<&str> = Vec::new();
    if complexity.has_region_filter {
        features.push("region_processing");
    }
    if complexity.tab_count > 0 {
        features.push("tab_processing");
    }
    if complexity.has_multiple_filters {
        features.push("multi_filter_processing");
    }
    if complexity.interactive_elements > INTERACTIVE_PRIORITY_THRESHOLD {
        features.push("interactive_elements");
    }
    if let Some(extra) = strategy_type.extra_priority_feature() {
        features.push(extra);
    }

    let mut unique: Vec<String> = Vec::with_capacity(features.len());
    for feature in features {
        if !unique.iter().any(|f| f == feature) {
            unique.push(feature.to_string());
        }
    }
    unique
}

/// Built-in overrides for products whose pages need special handling.
#[must_use]
pub fn hardcoded_overrides(product_key: &str, strategy_type: StrategyType) -> Map<String, Value> {
    let value = match (product_key, strategy_type) {
        ("api-management", StrategyType::RegionFilter) => json!({
            "region_detection_mode": "aggressive",
            "fallback_regions": ["china-north", "china-east"],
        }),
        ("sql-database", StrategyType::Complex) => json!({
            "filter_detection_threshold": 2,
            "enable_dynamic_content": true,
        }),
        _ => return Map::new(),
    };
    debug!(product = %product_key, strategy = %strategy_type, "hardcoded overrides applied");
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}
