//! Page body extraction.
//!
//! The "main content" of a pricing page is its technical selector
//! container when there is one, otherwise the pricing sections that are
//! not already covered by the description or the Q&A.

use super::clean::clean_html_content;
use super::sections::{classify_pricing_section, find_description_section, SectionKind};
use crate::detector::filter::{REGION_CONTAINER_CLASS, SOFTWARE_CONTAINER_CLASS};
use crate::detector::tab::find_main_container;
use crate::dom::{self, Document, Selection};
use crate::region::removal::PRICING_SECTION_CLASS;

/// Generic content containers tried last.
pub const MAIN_CONTENT_FALLBACK_SELECTORS: &[&str] =
    &["main", "article", ".main-content", "#main-content", ".content"];

/// Minimum text length for a generic container to count as content.
const MIN_FALLBACK_CHARS: usize = 100;

/// Pricing area of the page with filter controls stripped.
///
/// Empty when the page has neither a technical selector container nor
/// pricing sections.
#[must_use]
pub fn extract_pricing_area(doc: &Document) -> String {
    if let Some(container) = find_main_container(doc) {
        return without_filter_controls(&container);
    }
    content_sections_html(doc)
}

/// Main content for pages without filter-dependent groups.
#[must_use]
pub fn extract_main_content(doc: &Document) -> String {
    let area = extract_pricing_area(doc);
    if !area.is_empty() {
        return area;
    }
    MAIN_CONTENT_FALLBACK_SELECTORS
        .iter()
        .map(|selector| doc.select(selector).first())
        .find(|sel| sel.exists() && dom::normalized_text(sel).chars().count() > MIN_FALLBACK_CHARS)
        .map(|sel| clean_html_content(&dom::outer_html(&sel)))
        .unwrap_or_default()
}

/// Serialized `scope` without the region and software dropdowns.
#[must_use]
pub fn without_filter_controls(scope: &Selection) -> String {
    let copy = dom::clone_element(scope);
    copy.select(&format!(".{REGION_CONTAINER_CLASS}, .{SOFTWARE_CONTAINER_CLASS}"))
        .remove();
    clean_html_content(&dom::body_html(&copy))
}

/// Pricing sections other than the description, FAQ and SLA ones.
fn content_sections_html(doc: &Document) -> String {
    let description = find_description_section(doc);
    let parts: Vec<String> = dom::elements(&doc.select(&format!(".{PRICING_SECTION_CLASS}")))
        .iter()
        .filter(|section| !description.as_ref().is_some_and(|d| dom::same_node(d, section)))
        .filter(|section| {
            !matches!(classify_pricing_section(section), SectionKind::Faq | SectionKind::Sla)
        })
        .map(|section| dom::outer_html(section).to_string())
        .collect();
    clean_html_content(&parts.concat())
}
