//! Page structure detection.
//!
//! - [`filter`]: region and software filter controls
//! - [`tab`]: content partitions versus genuine category tabs
//! - [`page`]: page-type decision and complexity score

pub mod filter;
pub mod page;
pub mod tab;

pub use filter::{FilterAnalysis, FilterControl, FilterDetector, FilterOption};
pub use page::{classify, PageAnalysis, PageAnalyzer, PageComplexity};
pub use tab::{CategoryTab, ContentGroupMarker, TabAnalysis, TabDetector};
