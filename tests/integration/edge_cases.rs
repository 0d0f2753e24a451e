//! Edge case integration tests
//!
//! Tests for unusual inputs, boundary conditions, and degraded runs.

#![allow(clippy::expect_used)] // expect() is appropriate in tests for clear panic messages

use rs_pricing_cms::strategy::ProcessingMode;
use rs_pricing_cms::{extract_html, ExtractionCoordinator, Options, StrategyType};

use super::{coordinator, fixture_path};

#[test]
fn test_extract_empty_input() {
    let report = coordinator()
        .extract_html("", None, None)
        .expect("empty input should degrade to the fallback");

    assert!(report.strategy.is_fallback());
    assert!(report.document.title.is_empty());
    assert!(report.validation.warnings.iter().any(|w| w.contains("title")));
}

#[test]
fn test_extract_no_body() {
    let html = "<html><head><title>仅有标题的页面</title></head></html>";
    let document = extract_html(html, &Options::default()).expect("missing body should not fail");

    assert_eq!(document.title, "仅有标题的页面");
    assert!(document.content_groups.is_empty());
    assert!(document.common_sections.is_empty());
}

#[test]
fn test_extract_malformed_html() {
    let html = r#"<html><body><div class="pricing-page-section"><h2>定价<table><tr><td>￥1.00<p>未闭合"#;
    let document = extract_html(html, &Options::default()).expect("malformed html should not fail");
    assert!(document.base_content.contains("￥1.00"));
}

#[test]
fn test_missing_fixture_is_error_result() {
    let path = fixture_path("does-not-exist-index.html");
    let Err(result) = coordinator().extract_file(&path, None) else {
        panic!("missing file should fail");
    };
    assert!(result.error.contains("does-not-exist-index.html"));
    assert!(!result.validation.is_valid);
}

#[test]
fn test_region_options_detected_from_page_signals() {
    let html = r#"<html><head><title>示例服务定价</title></head><body>
        <div class="technical-azure-selector">
            <div class="dropdown-container region-container" id="north-china"><select></select></div>
            <div data-region="east-china">
                <div class="pricing-page-section"><table id="t"><tr><td>￥2.00</td></tr></table></div>
            </div>
        </div>
        </body></html>"#;
    let report = ExtractionCoordinator::default()
        .extract_html(html, None, None)
        .expect("extraction should succeed");

    assert_eq!(report.strategy.strategy_type, StrategyType::RegionFilter);
    let regions: Vec<&str> = report
        .document
        .content_groups
        .iter()
        .filter_map(|g| g.criterion("region").and_then(|v| v.first()).map(String::as_str))
        .collect();
    assert_eq!(regions, vec!["east-china", "north-china"]);
}

#[test]
fn test_without_exclusions_every_region_keeps_every_table() {
    let html = std::fs::read_to_string(fixture_path("api-management-index.html")).expect("fixture");
    let report = ExtractionCoordinator::default()
        .extract_html(&html, Some("api-management"), None)
        .expect("extraction should succeed");

    assert_eq!(report.document.content_groups.len(), 5);
    for group in &report.document.content_groups {
        assert!(group.content.contains("Api-management-developer"));
        assert!(group.content.contains("Api-management-premium"));
    }
}

#[test]
fn test_large_file_threshold_overrides_dom() {
    let options = Options {
        large_file_threshold_mb: 0.001,
        ..Options::default()
    };
    let report = ExtractionCoordinator::from_config_files(
        options,
        &fixture_path("products.json"),
        &fixture_path("soft-category.json"),
    )
    .extract_file(&fixture_path("virtual-machines-index.html"), None)
    .expect("large file extraction should succeed");

    assert_eq!(report.strategy.strategy_type, StrategyType::LargeFile);
    assert_eq!(
        report.strategy.override_str("processing_mode"),
        Some(ProcessingMode::Optimized.as_str())
    );
    assert!(report.document.content_groups.is_empty());
    assert!(report.document.base_content.contains("linux-general"));
    assert!(report.document.base_content.contains("windows-general"));
}
