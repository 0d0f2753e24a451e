//! Common section extraction (Banner, Description, Q&A).
//!
//! These blocks are page-invariant: they are extracted once per page and do
//! not depend on any filter selection.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::clean::clean_html_content;
use crate::dom::{self, Document, NodeId, Selection};
use crate::patterns::{FAQ_SECTION, PRICE_INDICATOR, SLA_SECTION, SUPPORT_KEYWORDS};
use crate::region::removal::PRICING_SECTION_CLASS;
use crate::result::{CommonSection, SectionType};

/// Banner candidates, in priority order.
pub const BANNER_SELECTORS: &[&str] = &[
    "div.common-banner",
    "div.common-banner-image",
    ".col-top-banner",
    ".banner",
    ".hero",
    ".page-banner",
    ".product-banner",
];

/// Description candidates used when no pricing section follows the banner.
pub const DESCRIPTION_FALLBACK_SELECTORS: &[&str] = &[
    ".description",
    ".product-description",
    ".intro",
    ".summary",
    "section.overview",
];

/// Question strings that identify a Q&A block when no structure does.
pub const KNOWN_QUESTIONS: &[&str] = &[
    "开发人员层的用途是什么",
    "我是否可以在自己的数据中心",
    "什么是\u{201c}单位\u{201d}",
    "什么是\u{201c}网关部署\u{201d}",
    "什么是\"单位\"",
    "什么是\"网关部署\"",
];

/// Sections with less visible text than this are classified [`SectionKind::Other`].
pub const MIN_CONTENT_CHARS: usize = 50;

/// Classification of a pricing section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Faq,
    Sla,
    Content,
    Other,
}

/// Class marking the expandable FAQ blocks of a pricing page.
pub const MORE_DETAIL_CLASS: &str = "more-detail";

/// Classifies a pricing section by ordered pattern match.
///
/// Keywords are matched on visible text only, so link targets and other
/// attributes never decide the kind. FAQ wins over SLA; short sections are
/// `Other`; everything else is `Content`.
#[must_use]
pub fn classify_pricing_section(section: &Selection) -> SectionKind {
    let text = dom::normalized_text(section);

    let more_detail = dom::has_class(section, MORE_DETAIL_CLASS)
        || section.select(&format!(".{MORE_DETAIL_CLASS}")).exists();
    if more_detail || FAQ_SECTION.is_match(&text) {
        return SectionKind::Faq;
    }
    if SLA_SECTION.is_match(&text) {
        return SectionKind::Sla;
    }
    if text.chars().count() < MIN_CONTENT_CHARS {
        return SectionKind::Other;
    }
    SectionKind::Content
}

/// Extracts the common sections of a page.
#[derive(Debug, Clone)]
pub struct SectionExtractor {
    image_host_placeholder: String,
}

impl Default for SectionExtractor {
    fn default() -> Self {
        Self::new("{img_hostname}")
    }
}

impl SectionExtractor {
    #[must_use]
    pub fn new(image_host_placeholder: &str) -> Self {
        Self {
            image_host_placeholder: image_host_placeholder.to_string(),
        }
    }

    /// Banner, Description and Q&A, omitting the ones the page lacks.
    #[must_use]
    pub fn extract_common_sections(&self, doc: &Document) -> Vec<CommonSection> {
        let sections: Vec<CommonSection> = [
            (SectionType::Banner, self.extract_banner(doc)),
            (SectionType::Description, self.extract_description(doc)),
            (SectionType::Qa, self.extract_qa(doc)),
        ]
        .into_iter()
        .filter(|(_, content)| !content.is_empty())
        .map(|(section_type, content)| CommonSection { section_type, content })
        .collect();

        debug!(count = sections.len(), "common sections extracted");
        sections
    }

    /// First banner-like element, with relative image sources rewritten to
    /// the image host placeholder.
    #[must_use]
    pub fn extract_banner(&self, doc: &Document) -> String {
        find_banner(doc).map_or_else(String::new, |banner| self.standardize_banner_images(&banner))
    }

    /// Product description.
    #[must_use]
    pub fn extract_description(&self, doc: &Document) -> String {
        if let Some(section) = find_description_section(doc) {
            return clean_html_content(&dom::outer_html(&section));
        }
        DESCRIPTION_FALLBACK_SELECTORS
            .iter()
            .map(|selector| doc.select(selector).first())
            .find(|sel| sel.exists() && !dom::normalized_text(sel).is_empty())
            .map(|sel| clean_html_content(&dom::outer_html(&sel)))
            .unwrap_or_default()
    }

    /// Q&A content aggregated from every matching heuristic.
    ///
    /// Blocks matched by more than one heuristic appear more than once.
    #[must_use]
    pub fn extract_qa(&self, doc: &Document) -> String {
        let mut parts: Vec<String> = Vec::new();
        let mut push = |sel: &Selection| parts.push(dom::outer_html(sel).to_string());

        for selector in ["div.faq", "div.qa", "section.faq", "section.qa"] {
            let container = doc.select(selector).first();
            if container.exists() {
                push(&container);
            }
        }

        for more in dom::elements(&doc.select("div.more-detail")) {
            push(&more);
        }

        for list in dom::elements(&doc.select("ul.faq-list")) {
            push(&list);
        }

        for item in dom::elements(&doc.select("li")) {
            if is_faq_item(&item) {
                push(&item);
            }
        }

        for section in dom::elements(&doc.select(&format!(".{PRICING_SECTION_CLASS}"))) {
            let text = dom::normalized_text(&section);
            if SUPPORT_KEYWORDS.is_match(&text) && !PRICE_INDICATOR.is_match(&text) {
                push(&section);
            }
        }

        for item in dom::elements(&doc.select(".accordion-item, .faq-item")) {
            push(&item);
        }

        if parts.is_empty() {
            parts.extend(known_question_containers(doc));
        }

        clean_html_content(&parts.concat())
    }

    fn standardize_banner_images(&self, banner: &Selection) -> String {
        let copy = dom::clone_element(banner);
        for img in dom::elements(&copy.select("img[src]")) {
            let src = dom::get_attribute(&img, "src").unwrap_or_default();
            if let Some(rewritten) = self.rewrite_image_src(&src) {
                img.set_attr("src", &rewritten);
            }
        }
        clean_html_content(&dom::body_html(&copy))
    }

    fn rewrite_image_src(&self, src: &str) -> Option<String> {
        let src = src.trim();
        let absolute = ["http://", "https://", "//", "data:"]
            .iter()
            .any(|prefix| src.starts_with(prefix));
        if src.is_empty() || absolute || src.starts_with(&self.image_host_placeholder) {
            return None;
        }
        let separator = if src.starts_with('/') { "" } else { "/" };
        Some(format!("{}{separator}{src}", self.image_host_placeholder))
    }
}

/// First element matching a banner selector.
#[must_use]
pub fn find_banner(doc: &Document) -> Option<Selection<'_>> {
    BANNER_SELECTORS
        .iter()
        .map(|selector| doc.select(selector).first())
        .find(Selection::exists)
}

/// The pricing section used as the product description.
///
/// Walks the siblings following the banner (and, when the banner is
/// wrapped, following its first ancestors) for the first pricing section
/// that is neither FAQ nor SLA.
#[must_use]
pub fn find_description_section(doc: &Document) -> Option<Selection<'_>> {
    let banner = find_banner(doc)?;
    let mut anchors = vec![banner.clone()];
    anchors.extend(dom::ancestors(&banner, Some(3)));

    for anchor in anchors {
        let mut current = dom::next_element_sibling(&anchor);
        while let Some(sibling) = current {
            if dom::has_class(&sibling, PRICING_SECTION_CLASS)
                && !matches!(classify_pricing_section(&sibling), SectionKind::Faq | SectionKind::Sla)
            {
                return Some(sibling);
            }
            current = dom::next_element_sibling(&sibling);
        }
    }
    None
}

/// `<li>` shaped as an expandable question: icon, question link, answer body.
fn is_faq_item(item: &Selection) -> bool {
    item.select("i.icon-plus").exists() && item.select("a").exists() && item.select("section").exists()
}

/// Containers of the known literal questions, at most five levels up.
fn known_question_containers(doc: &Document) -> Vec<String> {
    let mut seen: HashSet<NodeId> = HashSet::new();
    let mut found = Vec::new();
    let candidates = dom::elements(&doc.select("a, h2, h3, h4, p, li, span, strong"));

    for question in KNOWN_QUESTIONS {
        let Some(element) = candidates
            .iter()
            .find(|el| dom::normalized_text(el).contains(question))
        else {
            continue;
        };
        let container = dom::ancestors(element, Some(5)).into_iter().find(|a| {
            dom::has_class(a, PRICING_SECTION_CLASS) || dom::has_class(a, MORE_DETAIL_CLASS)
        });
        if let Some(container) = container {
            if dom::node_id(&container).is_some_and(|id| seen.insert(id)) {
                found.push(dom::outer_html(&container).to_string());
            }
        }
    }
    found
}
