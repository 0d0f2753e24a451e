//! Extraction strategies.
//!
//! A page is classified into one [`StrategyType`]; the [`manager`] turns the
//! classification into an [`ExtractionStrategy`] descriptor and the
//! [`factory`] instantiates the matching [`PageStrategy`]:
//!
//! - [`simple`]: metadata, common sections and the page body
//! - [`region`]: one content group per region after exclusion filtering
//! - [`complex`]: content groups over region × software × category tab
//! - [`large_file`]: regex pre-strip, then the simple path

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::content::{default_url_for_file, ContentExtractor, SectionExtractor};
use crate::dom::Document;
use crate::error::Result;
use crate::flexible::{FlexibleBuilder, StrategyContent};
use crate::options::Options;
use crate::product::ProductConfig;
use crate::region::RegionProcessor;
use crate::result::{ExtractionMetadata, FlexibleContentDocument};

pub mod complex;
pub mod factory;
pub mod large_file;
pub mod manager;
pub mod region;
pub mod simple;

pub use complex::ComplexStrategy;
pub use factory::{StrategyConstructor, StrategyFactory};
pub use large_file::{strip_heavy_markup, LargeFileStrategy, ProcessingMode};
pub use manager::StrategyManager;
pub use region::RegionFilterStrategy;
pub use simple::SimpleStaticStrategy;

/// Page classification driving strategy selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyType {
    SimpleStatic,
    RegionFilter,
    Complex,
    LargeFile,
}

impl StrategyType {
    /// Every strategy type, in registry order.
    pub const ALL: [StrategyType; 4] = [
        StrategyType::SimpleStatic,
        StrategyType::RegionFilter,
        StrategyType::Complex,
        StrategyType::LargeFile,
    ];

    /// Serialized name, also used as the product override key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            StrategyType::SimpleStatic => "simple_static",
            StrategyType::RegionFilter => "region_filter",
            StrategyType::Complex => "complex",
            StrategyType::LargeFile => "large_file",
        }
    }

    /// Name of the processor implementing this type.
    #[must_use]
    pub const fn processor(self) -> &'static str {
        match self {
            StrategyType::SimpleStatic => "SimpleStaticProcessor",
            StrategyType::RegionFilter => "RegionFilterProcessor",
            StrategyType::Complex => "ComplexContentProcessor",
            StrategyType::LargeFile => "LargeFileProcessor",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            StrategyType::SimpleStatic => "static page without interactive filters",
            StrategyType::RegionFilter => "page with a region filter only",
            StrategyType::Complex => "page with several filters or category tabs",
            StrategyType::LargeFile => "large page processed with reduced markup",
        }
    }

    /// Capabilities the processor offers.
    #[must_use]
    pub const fn features(self) -> &'static [&'static str] {
        match self {
            StrategyType::SimpleStatic => &["basic content extraction", "FAQ extraction"],
            StrategyType::RegionFilter => &[
                "region detection",
                "region content extraction",
                "region filtering",
            ],
            StrategyType::Complex => &["multi filter", "tab content", "region × filter cross product"],
            StrategyType::LargeFile => &["streaming", "memory optimization", "chunking"],
        }
    }

    /// Priority feature every strategy of this type carries.
    #[must_use]
    pub const fn extra_priority_feature(self) -> Option<&'static str> {
        match self {
            StrategyType::SimpleStatic => None,
            StrategyType::RegionFilter => Some("region_filtering"),
            StrategyType::Complex => Some("content_groups"),
            StrategyType::LargeFile => Some("memory_optimization"),
        }
    }
}

impl fmt::Display for StrategyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strategy selected for one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionStrategy {
    pub strategy_type: StrategyType,
    pub processor: String,
    pub description: String,
    pub features: Vec<String>,
    pub priority_features: Vec<String>,
    pub config_overrides: Map<String, Value>,
    pub complexity_score: f64,
}

impl ExtractionStrategy {
    /// Descriptor with the registry defaults for `strategy_type`.
    #[must_use]
    pub fn for_type(strategy_type: StrategyType) -> Self {
        Self {
            strategy_type,
            processor: strategy_type.processor().to_string(),
            description: strategy_type.description().to_string(),
            features: strategy_type.features().iter().map(|f| (*f).to_string()).collect(),
            priority_features: Vec::new(),
            config_overrides: Map::new(),
            complexity_score: 0.0,
        }
    }

    /// Strategy used when classification fails.
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            processor: "FallbackProcessor".to_string(),
            description: "fallback for pages that could not be classified".to_string(),
            features: vec!["basic content extraction".to_string()],
            priority_features: vec!["title".to_string(), "description_content".to_string()],
            ..Self::for_type(StrategyType::SimpleStatic)
        }
    }

    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.processor == "FallbackProcessor"
    }

    /// String override, if set.
    #[must_use]
    pub fn override_str(&self, key: &str) -> Option<&str> {
        self.config_overrides.get(key).and_then(Value::as_str)
    }
}

/// Inputs a strategy needs besides the page itself.
#[derive(Debug, Clone, Copy)]
pub struct ExtractionContext<'a> {
    pub source_file: &'a Path,
    /// Page URL; empty means "derive from the file name".
    pub source_url: &'a str,
    pub product_config: Option<&'a ProductConfig>,
    pub region_processor: &'a RegionProcessor,
    pub options: &'a Options,
}

impl<'a> ExtractionContext<'a> {
    #[must_use]
    pub fn new(source_file: &'a Path, region_processor: &'a RegionProcessor, options: &'a Options) -> Self {
        Self {
            source_file,
            source_url: "",
            product_config: None,
            region_processor,
            options,
        }
    }

    #[must_use]
    pub fn with_url(mut self, source_url: &'a str) -> Self {
        self.source_url = source_url;
        self
    }

    #[must_use]
    pub fn with_product_config(mut self, product_config: Option<&'a ProductConfig>) -> Self {
        self.product_config = product_config;
        self
    }

    /// URL used for slug derivation.
    #[must_use]
    pub fn effective_url(&self) -> String {
        if !self.source_url.trim().is_empty() {
            return self.source_url.to_string();
        }
        if let Some(url) = self.product_config.map(|c| c.url.trim()).filter(|u| !u.is_empty()) {
            return url.to_string();
        }
        default_url_for_file(self.source_file).unwrap_or_default()
    }
}

/// A page extraction strategy.
pub trait PageStrategy: fmt::Debug + Send + Sync {
    /// Type this strategy was registered for.
    fn strategy_type(&self) -> StrategyType;

    /// Descriptor the strategy was created from.
    fn descriptor(&self) -> &ExtractionStrategy;

    /// Extracts a flexible document from raw page HTML.
    fn extract(&self, html: &str, ctx: &ExtractionContext<'_>) -> Result<FlexibleContentDocument>;
}

/// Metadata, common sections and strategy output combined into a document.
pub(crate) fn assemble_document(
    doc: &Document,
    ctx: &ExtractionContext<'_>,
    strategy_type: StrategyType,
    content: StrategyContent,
) -> FlexibleContentDocument {
    let url = ctx.effective_url();
    let metadata = ContentExtractor::new(&ctx.options.default_language).extract_base_metadata(doc, &url);
    let common_sections = SectionExtractor::new(&ctx.options.image_host_placeholder).extract_common_sections(doc);
    let extraction = ExtractionMetadata::now(strategy_type, &ctx.source_file.display().to_string(), &url);
    FlexibleBuilder::new().build_flexible_page(metadata, common_sections, content, extraction)
}
