//! End-to-end extraction of one page.
//!
//! The coordinator reads and decodes the file once, resolves the product,
//! selects a strategy from the decoded markup, instantiates it, extracts
//! the document and validates it. Only an unreadable input stops a run;
//! every other failure degrades to a fallback and is logged.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::encoding::decode_html;
use crate::error::{Error, Result};
use crate::options::Options;
use crate::product::{ProductCatalog, ProductConfig, ProductManager};
use crate::region::RegionProcessor;
use crate::result::{ErrorResult, FlexibleContentDocument, LegacyRecord};
use crate::strategy::{ExtractionContext, ExtractionStrategy, PageStrategy, StrategyFactory, StrategyManager};
use crate::validator::{ExtractionValidator, ValidationReport};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Document, validation and the strategy that produced them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionReport {
    pub document: FlexibleContentDocument,
    pub validation: ValidationReport,
    pub strategy: ExtractionStrategy,
    pub product_key: String,
}

impl ExtractionReport {
    /// The document projected onto the flat legacy record.
    #[must_use]
    pub fn legacy_record(&self) -> LegacyRecord {
        self.document.legacy_record()
    }
}

/// Runs the extraction pipeline over pricing pages.
#[derive(Debug)]
pub struct ExtractionCoordinator {
    options: Options,
    products: Arc<ProductManager>,
    region_processor: RegionProcessor,
    strategy_manager: StrategyManager,
    factory: StrategyFactory,
    validator: ExtractionValidator,
}

impl Default for ExtractionCoordinator {
    fn default() -> Self {
        Self::new(Options::default())
    }
}

impl ExtractionCoordinator {
    /// Coordinator without product catalog or exclusions.
    #[must_use]
    pub fn new(options: Options) -> Self {
        let products = Arc::new(ProductManager::with_ttl(ProductCatalog::new(), options.product_cache_ttl));
        Self {
            strategy_manager: StrategyManager::new(options.clone()).with_products(Arc::clone(&products)),
            products,
            options,
            region_processor: RegionProcessor::default(),
            factory: StrategyFactory::with_defaults(),
            validator: ExtractionValidator::new(),
        }
    }

    /// Coordinator over a product catalog file and an exclusion file.
    ///
    /// Missing or malformed files leave the catalog or the exclusions empty.
    #[must_use]
    pub fn from_config_files(options: Options, product_config: &Path, exclusion_config: &Path) -> Self {
        Self::new(options)
            .with_catalog(ProductCatalog::load_or_empty(product_config))
            .with_region_processor(RegionProcessor::from_config_file(exclusion_config))
    }

    #[must_use]
    pub fn with_catalog(mut self, catalog: ProductCatalog) -> Self {
        self.products = Arc::new(ProductManager::with_ttl(catalog, self.options.product_cache_ttl));
        self.strategy_manager =
            StrategyManager::new(self.options.clone()).with_products(Arc::clone(&self.products));
        self
    }

    #[must_use]
    pub fn with_region_processor(mut self, region_processor: RegionProcessor) -> Self {
        self.region_processor = region_processor;
        self
    }

    /// Replaces the strategy registry.
    ///
    /// # Errors
    ///
    /// [`Error::StrategyNotRegistered`] when `factory` lacks a strategy type.
    pub fn with_factory(mut self, factory: StrategyFactory) -> Result<Self> {
        factory.validate_strategy_registration()?;
        self.factory = factory;
        Ok(self)
    }

    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    #[must_use]
    pub fn products(&self) -> &ProductManager {
        &self.products
    }

    /// Extracts the page stored at `path`.
    ///
    /// `url` overrides [`Options::url`]; without either, the URL comes from
    /// the product configuration or the file name.
    ///
    /// # Errors
    ///
    /// An [`ErrorResult`] when the file cannot be read or the fallback
    /// extraction fails too.
    pub fn extract_file(&self, path: &Path, url: Option<&str>) -> std::result::Result<ExtractionReport, ErrorResult> {
        let url = url.or(self.options.url.as_deref()).unwrap_or_default();
        let source_file = path.display().to_string();

        let bytes = fs::read(path).map_err(|source| {
            let err = Error::InputNotFound {
                path: path.to_path_buf(),
                source,
            };
            warn!(file = %source_file, error = %err, "input unreadable");
            ErrorResult::new(&err, &source_file, url)
        })?;
        self.extract_source(path, &bytes, Some(url))
    }

    /// Extracts a page whose raw bytes were already read from `path`.
    ///
    /// `path` names the product and the source; it is not read again, so
    /// strategy selection sees exactly `bytes`.
    ///
    /// # Errors
    ///
    /// An [`ErrorResult`] when the fallback extraction fails too.
    pub fn extract_source(
        &self,
        path: &Path,
        bytes: &[u8],
        url: Option<&str>,
    ) -> std::result::Result<ExtractionReport, ErrorResult> {
        let url = url.or(self.options.url.as_deref()).unwrap_or_default();
        let html = decode_html(bytes);
        let size_mb = bytes.len() as f64 / BYTES_PER_MB;

        let product_key = self.products.detect_product_key(path);
        let product = self.products.get_product_config(&product_key);
        let strategy = self
            .strategy_manager
            .determine_strategy_for_html(&html, size_mb, Some(&product_key));

        self.run(&html, path, url, &product_key, product.as_deref(), &strategy)
            .map_err(|err| ErrorResult::new(&err, &path.display().to_string(), url))
    }

    /// Extracts a page from HTML already in memory.
    ///
    /// # Errors
    ///
    /// Only when the fallback extraction fails too.
    pub fn extract_html(&self, html: &str, product_key: Option<&str>, url: Option<&str>) -> Result<ExtractionReport> {
        let url = url.or(self.options.url.as_deref()).unwrap_or_default();
        let size_mb = html.len() as f64 / BYTES_PER_MB;
        let product = product_key.and_then(|key| self.products.get_product_config(key));
        let strategy = self.strategy_manager.determine_strategy_for_html(html, size_mb, product_key);

        self.run(
            html,
            Path::new(""),
            url,
            product_key.unwrap_or_default(),
            product.as_deref(),
            &strategy,
        )
    }

    fn run(
        &self,
        html: &str,
        path: &Path,
        url: &str,
        product_key: &str,
        product: Option<&ProductConfig>,
        strategy: &ExtractionStrategy,
    ) -> Result<ExtractionReport> {
        let ctx = ExtractionContext::new(path, &self.region_processor, &self.options)
            .with_url(url)
            .with_product_config(product);

        let instance: Box<dyn PageStrategy> = self.factory.create_strategy(strategy).unwrap_or_else(|err| {
            warn!(strategy = %strategy.strategy_type, error = %err, "strategy creation failed, using fallback");
            self.factory.create_fallback_strategy()
        });

        let (document, used) = match instance.extract(html, &ctx) {
            Ok(document) => (document, instance.descriptor().clone()),
            Err(err) => {
                warn!(strategy = %strategy.strategy_type, error = %err, "extraction failed, using fallback");
                let fallback = self.factory.create_fallback_strategy();
                (fallback.extract(html, &ctx)?, fallback.descriptor().clone())
            }
        };

        let validation = self.validator.validate(&document);
        info!(
            product = %product_key,
            strategy = %used.strategy_type,
            groups = document.content_groups.len(),
            valid = validation.is_valid,
            quality = validation.quality_score,
            "extraction finished"
        );

        Ok(ExtractionReport {
            document,
            validation,
            strategy: used,
            product_key: product_key.to_string(),
        })
    }
}
