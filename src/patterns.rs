//! Compiled regex patterns for page analysis and content extraction.
//!
//! All patterns are compiled once at first use using `LazyLock`.
//! Patterns are organized by the pipeline stage that uses them.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

// =============================================================================
// Filter / Tab Detection
// =============================================================================

/// Inline style that hides a filter container.
pub static HIDDEN_STYLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(display\s*:\s*none|visibility\s*:\s*hidden)").expect("HIDDEN_STYLE regex")
});

/// Placeholder labels shown while a filter list is still loading.
pub static PLACEHOLDER_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(加载中|请选择|loading|please\s+select)").expect("PLACEHOLDER_LABEL regex")
});

/// Identifier of a top-level content partition (`tabContent1`, `contentGroup_2`).
pub static CONTENT_PARTITION_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:tabContent|contentGroup_?)\d+$").expect("CONTENT_PARTITION_ID regex")
});

// =============================================================================
// Section Classification
// =============================================================================

/// FAQ keywords, checked first by the section classifier.
pub static FAQ_SECTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(常见问题|\bFAQs?\b|frequently\s+asked\s+questions|\bQ\s*&(?:amp;)?\s*A\b)")
        .expect("FAQ_SECTION regex")
});

/// Support / service-level keywords.
pub static SLA_SECTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(支持和服务级别协议|support\s*&(?:amp;)?\s*SLA|service\s+level\s+agreement)")
        .expect("SLA_SECTION regex")
});

/// Support/SLA wording used by the Q&A heuristics.
pub static SUPPORT_KEYWORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(支持和服务级别协议|\bsla\b)").expect("SUPPORT_KEYWORDS regex")
});

/// Currency or unit-price indicators that mark a section as pricing content.
pub static PRICE_INDICATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(￥|¥|价格|每单位|小时|开发人员基本标准)").expect("PRICE_INDICATOR regex")
});

// =============================================================================
// Structure-aware Removal
// =============================================================================

/// Numbered footnote reference: `[1]`, `【1】`, `(1)`, `（1）`, leading `1.` / `1、`, `注1`.
pub static FOOTNOTE_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:[\[【(（]\s*\d{1,2}\s*[\]】)）])|(?:^\s*\d{1,2}\s*[.．、]\s*\S)|(?:注\s*\d)")
        .expect("FOOTNOTE_REFERENCE regex")
});

/// Page-wide pricing disclaimer, e.g. the tax-inclusive notice.
pub static GLOBAL_PRICING_NOTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(价格含税|均含税|含税价格|均为含税|tax[\s-]+inclusive|prices?\s+include\s+(?:all\s+)?tax)")
        .expect("GLOBAL_PRICING_NOTE regex")
});

/// Product-level headings (page or product title).
pub static GLOBAL_TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)((定价|价格|pricing).*(详细信息|details)|^\s*(azure|microsoft)\b)")
        .expect("GLOBAL_TITLE regex")
});

/// Section-level headings shared by several tables.
pub static SECTION_TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(常见问题|支持和服务级别协议|\bFAQs?\b|\bSLA\b|定价层|计费|pricing\s+tiers?)")
        .expect("SECTION_TITLE regex")
});

// =============================================================================
// Content Cleaning
// =============================================================================

/// HTML comments.
pub static HTML_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("HTML_COMMENT regex"));

/// Any whitespace run.
pub static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("WHITESPACE_RUN regex"));

/// Empty `<div>` wrapper.
pub static EMPTY_DIV: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<div>\s*</div>").expect("EMPTY_DIV regex"));

/// Whitespace between tags.
pub static INTER_TAG_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r">\s+<").expect("INTER_TAG_SPACE regex"));

// =============================================================================
// Large-file Pre-stripping
// =============================================================================

/// Script, style and noscript blocks.
pub static SCRIPT_STYLE_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(script|style|noscript)\b[^>]*>.*?</(?:script|style|noscript)\s*>")
        .expect("SCRIPT_STYLE_BLOCK regex")
});

/// Inline SVG blocks.
pub static SVG_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<svg\b[^>]*>.*?</svg\s*>").expect("SVG_BLOCK regex"));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidden_style_tolerates_spacing() {
        assert!(HIDDEN_STYLE.is_match("display:none"));
        assert!(HIDDEN_STYLE.is_match("color: red; DISPLAY : none;"));
        assert!(HIDDEN_STYLE.is_match("visibility:hidden"));
        assert!(!HIDDEN_STYLE.is_match("display:block"));
    }

    #[test]
    fn partition_ids() {
        assert!(CONTENT_PARTITION_ID.is_match("tabContent1"));
        assert!(CONTENT_PARTITION_ID.is_match("contentGroup_3"));
        assert!(!CONTENT_PARTITION_ID.is_match("tabContent1-0"));
        assert!(!CONTENT_PARTITION_ID.is_match("tabContent"));
    }

    #[test]
    fn footnote_references() {
        assert!(FOOTNOTE_REFERENCE.is_match("[1] 此价格适用于所有区域"));
        assert!(FOOTNOTE_REFERENCE.is_match("（2）按小时计费"));
        assert!(FOOTNOTE_REFERENCE.is_match("1. 预留实例价格"));
        assert!(FOOTNOTE_REFERENCE.is_match("注1：仅限中国东部"));
        assert!(!FOOTNOTE_REFERENCE.is_match("仅适用于基本层"));
    }

    #[test]
    fn global_pricing_note() {
        assert!(GLOBAL_PRICING_NOTE.is_match("*以上价格均含税"));
        assert!(GLOBAL_PRICING_NOTE.is_match("所有价格均为含税价格"));
        assert!(GLOBAL_PRICING_NOTE.is_match("All prices are tax-inclusive."));
        assert!(!GLOBAL_PRICING_NOTE.is_match("每小时计费"));
    }

    #[test]
    fn section_keywords() {
        assert!(FAQ_SECTION.is_match("常见问题"));
        assert!(FAQ_SECTION.is_match("Frequently Asked Questions"));
        assert!(SLA_SECTION.is_match("支持和服务级别协议"));
        assert!(SLA_SECTION.is_match("Support &amp; SLA"));
        assert!(!FAQ_SECTION.is_match("定价详细信息"));
    }
}
