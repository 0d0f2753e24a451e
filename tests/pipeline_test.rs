use std::fs;
use std::path::PathBuf;

use rs_pricing_cms::{ExtractionCoordinator, Options, SectionType, StrategyType};

const STATIC_PAGE: &str = r#"<html><head>
    <title>Azure 事件网格定价</title>
    <meta name="description" content="事件网格的定价详细信息">
</head><body class="zh-cn">
<div class="common-banner"><img src="/Images/event-grid.png"><h2>事件网格</h2></div>
<div class="pricing-page-section"><p>Azure 事件网格是完全托管的事件路由服务，可使用发布-订阅模型统一使用事件，适用于各种应用程序。</p></div>
<div class="pricing-page-section"><h2>定价详细信息</h2><table><tr><td>每百万次操作</td><td>￥4.07</td></tr></table></div>
</body></html>"#;

fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("rs-pricing-cms-pipeline-{name}-{}", std::process::id()));
    if let Err(err) = fs::create_dir_all(&dir) {
        panic!("temp dir {}: {err}", dir.display());
    }
    dir
}

fn write(path: &PathBuf, content: &str) {
    if let Err(err) = fs::write(path, content) {
        panic!("write {}: {err}", path.display());
    }
}

#[test]
fn unreadable_input_returns_error_result() -> rs_pricing_cms::Result<()> {
    let missing = temp_dir("missing").join("nothing-index.html");
    let coordinator = ExtractionCoordinator::default();

    let Err(result) = coordinator.extract_file(&missing, Some("https://www.azure.cn/pricing/details/nothing/")) else {
        panic!("missing input should not produce a document");
    };
    assert!(result.error.contains("nothing-index.html"));
    assert_eq!(result.source_url, "https://www.azure.cn/pricing/details/nothing/");
    assert!(!result.validation.is_valid);
    assert_eq!(result.validation.errors, vec![result.error.clone()]);

    let json = serde_json::to_value(&result)?;
    for key in ["error", "sourceFile", "sourceUrl", "extractionTimestamp", "validation"] {
        assert!(json.get(key).is_some(), "{key} missing from error result");
    }
    Ok(())
}

#[test]
fn static_page_report_and_legacy_record() -> rs_pricing_cms::Result<()> {
    let dir = temp_dir("static");
    let page = dir.join("event-grid-index.html");
    write(&page, STATIC_PAGE);

    let coordinator = ExtractionCoordinator::default();
    let report = match coordinator.extract_file(&page, None) {
        Ok(report) => report,
        Err(err) => panic!("extraction failed: {}", err.error),
    };

    assert_eq!(report.product_key, "event-grid");
    assert_eq!(report.strategy.strategy_type, StrategyType::SimpleStatic);
    let document = &report.document;
    assert!(document.content_groups.is_empty());
    assert!(document.base_content.contains("￥4.07"));
    assert_eq!(document.slug, "event-grid");
    assert_eq!(document.page_config.left_navigation_identifier, "event-grid");
    assert_eq!(document.page_config.page_icon, "{img_hostname}/Images/event-grid.png");
    assert!(document.section(SectionType::Description).is_some_and(|d| d.contains("事件路由服务")));
    assert_eq!(document.extraction_metadata.strategy, StrategyType::SimpleStatic);
    assert!(document.extraction_metadata.source_file.ends_with("event-grid-index.html"));

    let legacy = report.legacy_record();
    assert!(!legacy.has_region);
    assert_eq!(legacy.no_region_content, document.base_content);
    assert!(legacy.north_china_content.is_empty());

    let json = serde_json::to_value(&legacy)?;
    for key in ["Title", "MetaDescription", "BannerContent", "HasRegion", "NoRegionContent", "NorthChina2Content", "EastChina3Content"] {
        assert!(json.get(key).is_some(), "{key} missing from legacy record");
    }

    let _ = fs::remove_dir_all(&dir);
    Ok(())
}

#[test]
fn malformed_config_files_fail_open() {
    let dir = temp_dir("configs");
    let products = dir.join("products.json");
    let exclusions = dir.join("exclusions.json");
    let page = dir.join("event-grid-index.html");
    write(&products, "{ not json");
    write(&exclusions, "[1, 2, 3");
    write(&page, STATIC_PAGE);

    let coordinator = ExtractionCoordinator::from_config_files(Options::default(), &products, &exclusions);
    assert!(coordinator.products().catalog().is_empty());

    let report = match coordinator.extract_file(&page, None) {
        Ok(report) => report,
        Err(err) => panic!("extraction failed: {}", err.error),
    };
    assert!(report.validation.is_valid, "{:?}", report.validation.errors);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn empty_html_uses_fallback() -> rs_pricing_cms::Result<()> {
    let report = ExtractionCoordinator::default().extract_html("", None, None)?;
    assert!(report.strategy.is_fallback());
    assert!(report.document.content_groups.is_empty());
    assert!(!report.validation.warnings.is_empty());
    Ok(())
}

#[test]
fn report_serializes_camel_case() -> rs_pricing_cms::Result<()> {
    let report = ExtractionCoordinator::default().extract_html(STATIC_PAGE, Some("event-grid"), None)?;
    let json = serde_json::to_value(&report)?;
    assert_eq!(json["productKey"], "event-grid");
    assert_eq!(json["strategy"]["strategyType"], "simple_static");
    assert_eq!(json["document"]["extractionMetadata"]["schemaVersion"], "1.1");
    assert!(json["validation"]["isValid"].as_bool().unwrap_or(false));
    Ok(())
}
