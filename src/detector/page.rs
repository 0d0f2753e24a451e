//! Page-type classification.
//!
//! Combines the filter and tab signals into a [`StrategyType`] and a
//! diagnostic [`PageComplexity`] score. The file-size check lives with the
//! caller: a large file never reaches this module's decision.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::filter::{FilterAnalysis, FilterDetector};
use super::tab::{TabAnalysis, TabDetector};
use crate::dom::Document;
use crate::strategy::StrategyType;

/// Selector for elements a reader can interact with.
pub const INTERACTIVE_SELECTOR: &str =
    "button, input, select, textarea, [onclick], [data-toggle], .btn, .button";

/// Weighted summary of a page's interactive dimensions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageComplexity {
    pub has_region_filter: bool,
    pub tab_count: usize,
    pub filter_types: Vec<String>,
    pub has_multiple_filters: bool,
    pub interactive_elements: usize,
    pub file_size_mb: f64,
    pub is_large_file: bool,
    /// Files above this size earn the small size bonus.
    pub size_bonus_threshold_mb: f64,
}

impl PageComplexity {
    /// Complexity score in `[0, 10]`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rs_pricing_cms::detector::PageComplexity;
    ///
    /// let complexity = PageComplexity {
    ///     has_region_filter: true,
    ///     tab_count: 2,
    ///     ..PageComplexity::default()
    /// };
    /// assert_eq!(complexity.score(), 5.0);
    /// ```
    #[must_use]
    pub fn score(&self) -> f64 {
        let mut score = 0.0;
        if self.has_region_filter {
            score += 2.0;
        }
        score += 1.5 * self.tab_count as f64;
        if self.has_multiple_filters {
            score += 1.0 * self.filter_types.len() as f64;
        }
        score += (0.1 * self.interactive_elements as f64).min(2.0);
        if self.is_large_file {
            score += 3.0;
        } else if self.size_bonus_threshold_mb > 0.0 && self.file_size_mb > self.size_bonus_threshold_mb {
            score += 1.0;
        }
        score.min(10.0)
    }
}

/// Filter and tab analysis of one page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageAnalysis {
    pub filters: FilterAnalysis,
    pub tabs: TabAnalysis,
}

impl PageAnalysis {
    /// Page type for this analysis.
    #[must_use]
    pub fn page_type(&self) -> StrategyType {
        classify(&self.filters, &self.tabs)
    }
}

/// Classifies pages by their filter and tab structure.
#[derive(Debug, Clone, Copy, Default)]
pub struct PageAnalyzer {
    filter_detector: FilterDetector,
    tab_detector: TabDetector,
}

impl PageAnalyzer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs both detectors.
    #[must_use]
    pub fn analyze(&self, doc: &Document) -> PageAnalysis {
        PageAnalysis {
            filters: self.filter_detector.detect_filters(doc),
            tabs: self.tab_detector.detect_tabs(doc),
        }
    }

    /// Page type from the DOM alone.
    #[must_use]
    pub fn determine_page_type(&self, doc: &Document) -> StrategyType {
        let page_type = self.analyze(doc).page_type();
        debug!(page_type = %page_type, "page classified");
        page_type
    }

    /// Complexity of an analysed page.
    #[must_use]
    pub fn page_complexity(
        &self,
        doc: &Document,
        analysis: &PageAnalysis,
        file_size_mb: f64,
        is_large_file: bool,
        size_bonus_threshold_mb: f64,
    ) -> PageComplexity {
        let filter_types = analysis.filters.visible_filter_types();
        PageComplexity {
            has_region_filter: analysis.filters.region_visible,
            tab_count: analysis.tabs.total_category_tabs,
            has_multiple_filters: filter_types.len() > 1,
            filter_types: filter_types.into_iter().map(str::to_string).collect(),
            interactive_elements: count_interactive_elements(doc),
            file_size_mb,
            is_large_file,
            size_bonus_threshold_mb,
        }
    }
}

/// Decision table for the DOM branch.
///
/// 1. No main container, or neither filter visible: `SimpleStatic`.
/// 2. Region visible, software hidden, no category tabs: `RegionFilter`.
/// 3. Anything else: `Complex`.
#[must_use]
pub fn classify(filters: &FilterAnalysis, tabs: &TabAnalysis) -> StrategyType {
    if !tabs.has_main_container || (!filters.region_visible && !filters.software_visible) {
        return StrategyType::SimpleStatic;
    }
    if filters.region_visible && !filters.software_visible && !tabs.has_complex_tabs {
        return StrategyType::RegionFilter;
    }
    StrategyType::Complex
}

/// Number of interactive elements in the page.
#[must_use]
pub fn count_interactive_elements(doc: &Document) -> usize {
    doc.select(INTERACTIVE_SELECTOR).length()
}
