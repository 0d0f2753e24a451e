use proptest::prelude::*;
use rs_pricing_cms::validator::{completeness_bonus, quality_score, REQUIRED_FIELDS};
use rs_pricing_cms::{extract_html, ExtractionValidator, Options};
use serde_json::json;

const REGION_PAGE: &str = r#"<html><head><title>Azure 存储定价</title></head><body>
<div class="common-banner"><img src="Images/storage.png"><h2>Azure 存储</h2></div>
<div class="pricing-page-section"><p>Azure 存储提供可大规模缩放的对象存储，适用于数据对象、文件系统、消息存储和 NoSQL 存储。</p></div>
<div class="technical-azure-selector">
    <div class="dropdown-container region-container">
        <select><option value="north-china">中国北部</option><option value="east-china">中国东部</option></select>
    </div>
    <div class="pricing-page-section"><h2>定价详细信息</h2><table><tr><td>￥0.15/GB</td></tr></table></div>
</div>
<div class="pricing-page-section"><h2>常见问题</h2>
    <ul><li><i class="icon icon-plus"></i><a>如何计费？</a><section>按用量计费。</section></li></ul>
</div>
</body></html>"#;

proptest! {
    #[test]
    fn score_stays_in_unit_interval(errors in 0usize..50, warnings in 0usize..50, hits in 0u8..=4) {
        let score = quality_score(errors, warnings, f64::from(hits) * 0.1);
        prop_assert!((0.0..=1.0).contains(&score));
    }

    #[test]
    fn more_problems_never_raise_the_score(
        errors in 0usize..20,
        warnings in 0usize..20,
        extra_errors in 0usize..5,
        extra_warnings in 0usize..5,
        hits in 0u8..=4,
    ) {
        let bonus = f64::from(hits) * 0.1;
        let base = quality_score(errors, warnings, bonus);
        prop_assert!(quality_score(errors + extra_errors, warnings, bonus) <= base);
        prop_assert!(quality_score(errors, warnings + extra_warnings, bonus) <= base);
    }
}

#[test]
fn extracted_region_page_is_valid() -> rs_pricing_cms::Result<()> {
    let options = Options {
        url: Some("https://www.azure.cn/pricing/details/storage/".to_string()),
        ..Options::default()
    };
    let document = extract_html(REGION_PAGE, &options)?;
    let report = ExtractionValidator::new().validate(&document);

    assert!(report.is_valid, "{:?}", report.errors);
    assert_eq!(report.content_groups_count, 2);
    assert_eq!(report.common_sections_count, 3);
    assert!(report.has_filters);
    assert!(report.quality_score > 0.9, "{}", report.summary());
    assert!(report.summary().starts_with("valid"));
    Ok(())
}

#[test]
fn every_required_field_is_checked() {
    let full = json!({
        "title": "Azure 存储定价",
        "baseContent": "",
        "contentGroups": [],
        "commonSections": [],
        "pageConfig": {"enableFilters": false}
    });
    let validator = ExtractionValidator::new();
    assert!(validator.validate_value(&full).is_valid);

    for field in REQUIRED_FIELDS {
        let mut value = full.clone();
        if let Some(object) = value.as_object_mut() {
            object.remove(field);
        }
        let report = validator.validate_value(&value);
        assert!(!report.is_valid, "{field} should be required");
        assert!(report.errors.iter().any(|e| e.contains(field)));
    }
}

#[test]
fn broken_groups_and_sections_are_errors() {
    let value = json!({
        "title": "Azure 存储定价",
        "baseContent": "",
        "contentGroups": [{"groupName": "", "filterCriteriaJson": "[{", "content": "<p>x</p>"}],
        "commonSections": [{"sectionType": "Footer", "content": "<p>x</p>"}, {"sectionType": "Qa", "content": " "}],
        "pageConfig": {"enableFilters": true, "filtersJsonConfig": "{not json"}
    });
    let report = ExtractionValidator::new().validate_value(&value);

    assert!(!report.is_valid);
    assert_eq!(report.errors.len(), 4, "{:?}", report.errors);
    assert_eq!(report.warnings.len(), 1, "{:?}", report.warnings);
    assert!(report.quality_score < 0.5);
}

#[test]
fn completeness_counts_present_parts() {
    let sparse = json!({"title": "短", "baseContent": "", "contentGroups": [], "commonSections": []});
    assert!(completeness_bonus(&sparse).abs() < f64::EPSILON);

    let rich = json!({
        "title": "Azure 存储定价",
        "baseContent": "x".repeat(101),
        "contentGroups": [{}],
        "commonSections": [{}, {}]
    });
    assert!((completeness_bonus(&rich) - 0.4).abs() < 1e-9);
}
