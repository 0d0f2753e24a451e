//! # rs-pricing-cms
//!
//! Turns static cloud pricing pages into CMS-importable flexible content
//! documents.
//!
//! A page is classified by the filters and tabs it exposes, an extraction
//! strategy is chosen from that classification, region-excluded tables are
//! removed structure-aware, and the surviving fragments are assembled into
//! content groups tagged with machine-checkable filter predicates.
//!
//! ## Quick Start
//!
//! ```rust
//! use rs_pricing_cms::{extract_html, Options};
//!
//! let html = r#"<html><head><title>Azure 示例服务定价</title></head>
//! <body><div class="pricing-page-section"><h2>定价</h2><table id="t1"><tr><td>￥1</td></tr></table></div></body></html>"#;
//!
//! let document = extract_html(html, &Options::default())?;
//! assert_eq!(document.title, "Azure 示例服务定价");
//! assert!(document.base_content.contains("t1"));
//! # Ok::<(), rs_pricing_cms::Error>(())
//! ```
//!
//! ## Pipeline
//!
//! - **Detection**: region and software filters, content partitions versus
//!   genuine category tabs, page type and complexity score
//! - **Strategy**: simple static, region filter, complex or large file,
//!   with per-product configuration overrides
//! - **Region filtering**: excluded tables and their notes are removed while
//!   footnotes, titles and global notes are kept
//! - **Assembly**: common sections, content groups, page configuration
//! - **Validation**: structural checks and a quality score

mod error;
mod options;
mod patterns;
mod result;

/// DOM operations adapter over `dom_query`.
pub mod dom;

/// Character encoding detection and transcoding.
pub mod encoding;

/// Filter, tab and page-type detection.
pub mod detector;

/// Metadata, common sections and page body extraction.
pub mod content;

/// Region detection, exclusion config and structure-aware table removal.
pub mod region;

/// Product catalog and the TTL configuration cache.
pub mod product;

/// Strategy types, selection, registry and implementations.
pub mod strategy;

/// Content group, page configuration and document assembly.
pub mod flexible;

/// Structural validation and quality scoring.
pub mod validator;

/// End-to-end coordinator.
pub mod pipeline;

// Public API - re-exports
pub use error::{Error, Result};
pub use options::Options;
pub use pipeline::{ExtractionCoordinator, ExtractionReport};
pub use result::{
    BaseMetadata, CommonSection, ContentGroup, ErrorResult, ErrorValidation, ExtractionMetadata, FilterCriterion,
    FilterDefinition, FilterDefinitionOption, FlexibleContentDocument, LegacyRecord, PageConfig, PageType,
    SectionType, EXTRACTOR_VERSION, SCHEMA_VERSION,
};
pub use strategy::{ExtractionStrategy, StrategyType};
pub use validator::{ExtractionValidator, ValidationReport};

/// Extracts a flexible document from HTML with no product catalog or
/// region exclusions.
///
/// The URL used for the slug comes from [`Options::url`].
#[allow(clippy::missing_errors_doc)]
pub fn extract_html(html: &str, options: &Options) -> Result<FlexibleContentDocument> {
    ExtractionCoordinator::new(options.clone())
        .extract_html(html, None, None)
        .map(|report| report.document)
}

/// Extracts a flexible document from HTML bytes, detecting the encoding.
///
/// # Example
///
/// ```rust
/// use rs_pricing_cms::{extract_bytes, Options};
///
/// let html = b"\xEF\xBB\xBF<html><head><title>Azure \xE5\xAE\x9A\xE4\xBB\xB7</title></head><body></body></html>";
/// let document = extract_bytes(html, &Options::default())?;
/// assert_eq!(document.title, "Azure 定价");
/// # Ok::<(), rs_pricing_cms::Error>(())
/// ```
#[allow(clippy::missing_errors_doc)]
pub fn extract_bytes(html: &[u8], options: &Options) -> Result<FlexibleContentDocument> {
    extract_html(&encoding::decode_html(html), options)
}
