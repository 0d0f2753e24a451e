//! Content extraction.
//!
//! - [`metadata`]: title, meta tags, language and slug
//! - [`sections`]: Banner, Description and Q&A blocks
//! - [`main_content`]: pricing area and page body
//! - [`clean`]: fragment cleanup shared by all of the above

pub mod clean;
pub mod main_content;
pub mod metadata;
pub mod sections;

pub use clean::clean_html_content;
pub use main_content::{extract_main_content, extract_pricing_area, without_filter_controls};
pub use metadata::{default_url_for_file, extract_slug, ContentExtractor};
pub use sections::{classify_pricing_section, SectionExtractor, SectionKind};
