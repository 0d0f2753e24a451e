//! End-to-end extraction of the fixture pricing pages
//!
//! `api-management-index.html` is a region-only page with a hidden software
//! control; `virtual-machines-index.html` combines region, software and
//! category tabs.

use rs_pricing_cms::flexible::{CATEGORY_KEY, REGION_KEY, SOFTWARE_KEY};
use rs_pricing_cms::{PageType, SectionType, StrategyType};

use super::extract_fixture;

#[test]
fn test_region_page_strategy_and_overrides() {
    let report = extract_fixture("api-management-index.html");

    assert_eq!(report.product_key, "api-management");
    assert_eq!(report.strategy.strategy_type, StrategyType::RegionFilter);
    assert_eq!(report.strategy.override_str("region_detection_mode"), Some("aggressive"));
    assert_eq!(
        report.strategy.config_overrides.get("keep_global_notes"),
        Some(&serde_json::json!(true))
    );
    assert!(report.validation.is_valid, "{:?}", report.validation.errors);
}

#[test]
fn test_region_page_groups_follow_select_order() {
    let report = extract_fixture("api-management-index.html");
    let document = &report.document;

    let names: Vec<&str> = document.content_groups.iter().map(|g| g.group_name.as_str()).collect();
    assert_eq!(names, vec!["中国北部 3", "中国东部 2", "中国北部 2", "中国东部", "中国北部"]);
    for (i, group) in document.content_groups.iter().enumerate() {
        assert_eq!(group.sort_order as usize, i + 1);
        assert!(group.criterion(REGION_KEY).is_some());
        assert!(!group.content.contains("region-box"), "filter controls must be stripped");
    }
    assert!(document.base_content.is_empty());
}

#[test]
fn test_region_exclusions_remove_only_their_tables() {
    let report = extract_fixture("api-management-index.html");
    let document = &report.document;

    let north3 = document.region_content("north-china3").unwrap_or_default();
    assert!(!north3.contains("Api-management-developer"));
    assert!(north3.contains("Api-management-premium"));
    assert!(north3.contains("以上价格含增值税"));
    assert!(north3.contains("[1]"));

    let east = document.region_content("east-china").unwrap_or_default();
    assert!(east.contains("Api-management-developer"));
    assert!(!east.contains("Api-management-premium"));

    let north = document.region_content("north-china").unwrap_or_default();
    assert!(north.contains("Api-management-developer"));
    assert!(north.contains("Api-management-premium"));
}

#[test]
fn test_region_page_metadata_and_sections() {
    let report = extract_fixture("api-management-index.html");
    let document = &report.document;

    assert_eq!(document.title, "API 管理定价 - Azure 云计算");
    assert_eq!(document.meta_description, "API 管理的定价详细信息。");
    assert_eq!(document.ms_service_name, "api-management");
    assert_eq!(document.slug, "api-management");
    assert_eq!(document.language, "zh-cn");

    let banner = document.section(SectionType::Banner).unwrap_or_default();
    assert!(banner.contains("{img_hostname}/Images/marketing-resource/css/api-management_banner.png"));
    let description = document.section(SectionType::Description).unwrap_or_default();
    assert!(description.contains("API 网关"));
    let qa = document.section(SectionType::Qa).unwrap_or_default();
    assert!(qa.contains("开发人员层的用途是什么"));
    assert!(qa.contains("支持和服务级别协议"));

    let config = &document.page_config;
    assert_eq!(config.page_type, PageType::RegionFilter);
    assert!(config.enable_filters);
    assert_eq!(config.filter_definitions.len(), 1);
    assert_eq!(config.filter_definitions[0].display_name, "地区");
    assert_eq!(config.left_navigation_identifier, "api-management");
    assert_eq!(
        config.page_icon,
        "{img_hostname}/Images/marketing-resource/css/api-management_banner.png"
    );
}

#[test]
fn test_region_page_legacy_record() {
    let legacy = extract_fixture("api-management-index.html").legacy_record();

    assert!(legacy.has_region);
    assert!(legacy.no_region_content.is_empty());
    assert!(!legacy.north_china3_content.contains("Api-management-developer"));
    assert!(legacy.north_china2_content.contains("Api-management-developer"));
    assert!(!legacy.east_china_content.contains("Api-management-premium"));
    assert!(legacy.east_china3_content.is_empty());
}

#[test]
fn test_complex_page_cross_product() {
    let report = extract_fixture("virtual-machines-index.html");
    let document = &report.document;

    assert_eq!(report.strategy.strategy_type, StrategyType::Complex);
    let names: Vec<&str> = document.content_groups.iter().map(|g| g.group_name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "中国北部 2 - Linux - 通用",
            "中国北部 2 - Linux - 计算优化",
            "中国北部 2 - Windows",
            "中国东部 2 - Linux - 通用",
            "中国东部 2 - Windows",
        ]
    );

    let compute = &document.content_groups[1];
    assert!(compute.content.contains("linux-compute"));
    assert_eq!(compute.criterion(SOFTWARE_KEY), Some(&["linux".to_string()][..]));
    assert_eq!(compute.criterion(CATEGORY_KEY), Some(&["tabContent1-1".to_string()][..]));
    assert!(!compute.content.contains("linux-general"));

    let windows = &document.content_groups[4];
    assert!(windows.content.contains("windows-general"));
    assert!(windows.criterion(CATEGORY_KEY).is_none());
    assert!(report.validation.is_valid, "{:?}", report.validation.errors);
}

#[test]
fn test_complex_page_config() {
    let document = extract_fixture("virtual-machines-index.html").document;
    let config = &document.page_config;

    assert_eq!(config.page_type, PageType::ComplexFilter);
    let keys: Vec<&str> = config.filter_definitions.iter().map(|d| d.filter_key.as_str()).collect();
    assert_eq!(keys, vec![REGION_KEY, SOFTWARE_KEY, CATEGORY_KEY]);

    let categories: Vec<&str> = config.filter_definitions[2]
        .options
        .iter()
        .map(|o| o.value.as_str())
        .collect();
    assert_eq!(categories, vec!["tabContent1-0", "tabContent1-1"]);

    let parsed: serde_json::Value =
        serde_json::from_str(&config.filters_json_config).unwrap_or(serde_json::Value::Null);
    assert_eq!(parsed["filterDefinitions"].as_array().map(Vec::len), Some(3));
}
