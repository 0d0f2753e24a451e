//! Large pages.
//!
//! Script, style and noscript blocks are stripped with regexes before the
//! page is parsed; chunked and streaming modes also drop inline SVG and
//! comments. Only metadata, common sections and the page body are kept.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{assemble_document, ExtractionContext, ExtractionStrategy, PageStrategy, StrategyType};
use crate::content::extract_main_content;
use crate::dom;
use crate::error::Result;
use crate::flexible::{FlexibleBuilder, StrategyContent};
use crate::options::Options;
use crate::patterns::{HTML_COMMENT, SCRIPT_STYLE_BLOCK, SVG_BLOCK};
use crate::result::FlexibleContentDocument;

/// Chunk size used by the chunked and streaming modes.
pub const CHUNK_SIZE_BYTES: u64 = 1024 * 1024;

/// How aggressively a large page is reduced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingMode {
    #[default]
    Optimized,
    Chunked,
    Streaming,
}

impl ProcessingMode {
    /// Mode for a file of `size_mb`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rs_pricing_cms::strategy::ProcessingMode;
    /// use rs_pricing_cms::Options;
    ///
    /// let options = Options::default();
    /// assert_eq!(ProcessingMode::for_size(6.0, &options), ProcessingMode::Optimized);
    /// assert_eq!(ProcessingMode::for_size(12.0, &options), ProcessingMode::Chunked);
    /// assert_eq!(ProcessingMode::for_size(25.0, &options), ProcessingMode::Streaming);
    /// ```
    #[must_use]
    pub fn for_size(size_mb: f64, options: &Options) -> Self {
        if size_mb > options.streaming_threshold_mb {
            ProcessingMode::Streaming
        } else if size_mb > options.chunked_threshold_mb {
            ProcessingMode::Chunked
        } else {
            ProcessingMode::Optimized
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ProcessingMode::Optimized => "optimized",
            ProcessingMode::Chunked => "chunked",
            ProcessingMode::Streaming => "streaming",
        }
    }

    /// Parses an override value; unknown names yield `None`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "optimized" => Some(ProcessingMode::Optimized),
            "chunked" => Some(ProcessingMode::Chunked),
            "streaming" => Some(ProcessingMode::Streaming),
            _ => None,
        }
    }

    /// Chunk size for this mode, if it reads in chunks.
    #[must_use]
    pub const fn chunk_size(self) -> Option<u64> {
        match self {
            ProcessingMode::Optimized => None,
            ProcessingMode::Chunked | ProcessingMode::Streaming => Some(CHUNK_SIZE_BYTES),
        }
    }
}

impl fmt::Display for ProcessingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Memory limit for a file of `size_mb`: twice the size, capped.
#[must_use]
pub fn memory_limit_mb(size_mb: f64, options: &Options) -> f64 {
    (2.0 * size_mb).min(options.memory_limit_cap_mb)
}

/// Removes markup the extractors never read.
///
/// # Example
///
/// ```rust
/// use rs_pricing_cms::strategy::{strip_heavy_markup, ProcessingMode};
///
/// let html = "<p>a</p><script>var x = 1;</script><svg><path/></svg>";
/// assert_eq!(strip_heavy_markup(html, ProcessingMode::Optimized), "<p>a</p><svg><path/></svg>");
/// assert_eq!(strip_heavy_markup(html, ProcessingMode::Streaming), "<p>a</p>");
/// ```
#[must_use]
pub fn strip_heavy_markup(html: &str, mode: ProcessingMode) -> String {
    let stripped = SCRIPT_STYLE_BLOCK.replace_all(html, "");
    if mode == ProcessingMode::Optimized {
        return stripped.into_owned();
    }
    let without_svg = SVG_BLOCK.replace_all(&stripped, "");
    HTML_COMMENT.replace_all(&without_svg, "").into_owned()
}

/// Strategy for files above the large-file threshold.
#[derive(Debug, Clone)]
pub struct LargeFileStrategy {
    descriptor: ExtractionStrategy,
}

impl LargeFileStrategy {
    #[must_use]
    pub fn new(descriptor: ExtractionStrategy) -> Self {
        Self { descriptor }
    }

    /// Registry constructor.
    #[must_use]
    pub fn boxed(descriptor: &ExtractionStrategy) -> Box<dyn PageStrategy> {
        Box::new(Self::new(descriptor.clone()))
    }

    /// Mode from the descriptor's `processing_mode` override.
    #[must_use]
    pub fn processing_mode(&self) -> ProcessingMode {
        self.descriptor
            .override_str("processing_mode")
            .and_then(ProcessingMode::parse)
            .unwrap_or_default()
    }
}

impl PageStrategy for LargeFileStrategy {
    fn strategy_type(&self) -> StrategyType {
        StrategyType::LargeFile
    }

    fn descriptor(&self) -> &ExtractionStrategy {
        &self.descriptor
    }

    fn extract(&self, html: &str, ctx: &ExtractionContext<'_>) -> Result<FlexibleContentDocument> {
        let mode = self.processing_mode();
        let reduced = strip_heavy_markup(html, mode);
        debug!(
            mode = %mode,
            before = html.len(),
            after = reduced.len(),
            "large file markup stripped"
        );

        let doc = dom::parse(&reduced);
        let base_content = extract_main_content(&doc);
        info!(mode = %mode, chars = base_content.len(), "large file extraction");

        let content = StrategyContent {
            base_content,
            content_groups: Vec::new(),
            page_config: FlexibleBuilder::new().default_page_config(),
        };
        Ok(assemble_document(&doc, ctx, self.strategy_type(), content))
    }
}
