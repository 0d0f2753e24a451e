//! Structural validation and quality scoring.
//!
//! Checks run on the serialized JSON form of a document, so documents
//! loaded from elsewhere can be checked the same way as freshly extracted
//! ones. A failing document is still a document: the report says
//! `is_valid: false` and the caller decides what to do with it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::result::{FlexibleContentDocument, SectionType, SCHEMA_VERSION};

/// Top-level fields every document must carry.
pub const REQUIRED_FIELDS: [&str; 5] = ["title", "baseContent", "contentGroups", "commonSections", "pageConfig"];

/// Fields every content group must carry.
const GROUP_REQUIRED_FIELDS: [&str; 3] = ["groupName", "filterCriteriaJson", "content"];

const ERROR_PENALTY: f64 = 0.2;
const WARNING_PENALTY: f64 = 0.1;
const COMPLETENESS_STEP: f64 = 0.1;

/// Outcome of validating one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub quality_score: f64,
    pub content_groups_count: usize,
    pub common_sections_count: usize,
    pub has_filters: bool,
    pub validated_at: DateTime<Utc>,
}

impl ValidationReport {
    /// One-line summary for logs.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{} | quality {:.2} | errors {} | warnings {}",
            if self.is_valid { "valid" } else { "invalid" },
            self.quality_score,
            self.errors.len(),
            self.warnings.len()
        )
    }
}

/// Validates flexible documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractionValidator;

impl ExtractionValidator {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Validates a document through its serialized form.
    #[must_use]
    pub fn validate(&self, document: &FlexibleContentDocument) -> ValidationReport {
        match serde_json::to_value(document) {
            Ok(value) => self.validate_value(&value),
            Err(err) => {
                warn!(error = %err, "document failed to serialize for validation");
                let errors = vec![format!("document is not serializable: {err}")];
                ValidationReport {
                    is_valid: false,
                    quality_score: quality_score(errors.len(), 0, 0.0),
                    errors,
                    warnings: Vec::new(),
                    content_groups_count: document.content_groups.len(),
                    common_sections_count: document.common_sections.len(),
                    has_filters: document.page_config.enable_filters,
                    validated_at: Utc::now(),
                }
            }
        }
    }

    /// Validates a document given as JSON.
    #[must_use]
    pub fn validate_value(&self, value: &Value) -> ValidationReport {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        let Some(object) = value.as_object() else {
            errors.push("document must be a JSON object".to_string());
            return ValidationReport {
                is_valid: false,
                quality_score: quality_score(errors.len(), 0, 0.0),
                errors,
                warnings,
                content_groups_count: 0,
                common_sections_count: 0,
                has_filters: false,
                validated_at: Utc::now(),
            };
        };

        for field in REQUIRED_FIELDS {
            match object.get(field) {
                None => errors.push(format!("missing required field: {field}")),
                Some(Value::Null) => warnings.push(format!("field is null: {field}")),
                Some(_) => {}
            }
        }

        let title = object.get("title").and_then(Value::as_str).unwrap_or_default();
        if title.trim().is_empty() {
            warnings.push("title is empty".to_string());
        } else if title.chars().count() < 5 {
            warnings.push("title is too short".to_string());
        }

        let content_groups_count = check_content_groups(object.get("contentGroups"), &mut errors);
        let common_sections_count = check_common_sections(object.get("commonSections"), &mut errors, &mut warnings);
        let has_filters = check_page_config(object.get("pageConfig"), &mut errors, &mut warnings);
        check_extraction_metadata(object.get("extractionMetadata"), &mut warnings);

        let score = quality_score(errors.len(), warnings.len(), completeness_bonus(value));
        let report = ValidationReport {
            is_valid: errors.is_empty(),
            errors,
            warnings,
            quality_score: score,
            content_groups_count,
            common_sections_count,
            has_filters,
            validated_at: Utc::now(),
        };
        info!(
            valid = report.is_valid,
            quality = report.quality_score,
            errors = report.errors.len(),
            warnings = report.warnings.len(),
            "document validated"
        );
        report
    }
}

fn check_content_groups(groups: Option<&Value>, errors: &mut Vec<String>) -> usize {
    let Some(groups) = groups.filter(|g| !g.is_null()) else {
        return 0;
    };
    let Some(groups) = groups.as_array() else {
        errors.push("contentGroups must be an array".to_string());
        return 0;
    };

    for (i, group) in groups.iter().enumerate() {
        let Some(group) = group.as_object() else {
            errors.push(format!("contentGroups[{i}] must be an object"));
            continue;
        };
        for field in GROUP_REQUIRED_FIELDS {
            match group.get(field).and_then(Value::as_str) {
                None => errors.push(format!("contentGroups[{i}] is missing {field}")),
                Some(s) if s.trim().is_empty() => errors.push(format!("contentGroups[{i}].{field} is empty")),
                Some(_) => {}
            }
        }
        if let Some(criteria) = group.get("filterCriteriaJson").and_then(Value::as_str) {
            if serde_json::from_str::<Value>(criteria).is_err() {
                errors.push(format!("contentGroups[{i}].filterCriteriaJson is not valid JSON"));
            }
        }
    }
    groups.len()
}

fn check_common_sections(sections: Option<&Value>, errors: &mut Vec<String>, warnings: &mut Vec<String>) -> usize {
    let Some(sections) = sections.filter(|s| !s.is_null()) else {
        return 0;
    };
    let Some(sections) = sections.as_array() else {
        errors.push("commonSections must be an array".to_string());
        return 0;
    };

    for (i, section) in sections.iter().enumerate() {
        let Some(section) = section.as_object() else {
            errors.push(format!("commonSections[{i}] must be an object"));
            continue;
        };
        match section.get("sectionType").and_then(Value::as_str) {
            None => errors.push(format!("commonSections[{i}] is missing sectionType")),
            Some(kind) if !SectionType::ALL.iter().any(|t| t.as_str() == kind) => {
                errors.push(format!("commonSections[{i}].sectionType is unknown: {kind}"));
            }
            Some(_) => {}
        }
        match section.get("content").and_then(Value::as_str) {
            None => errors.push(format!("commonSections[{i}] is missing content")),
            Some(content) if content.trim().is_empty() => {
                warnings.push(format!("commonSections[{i}].content is empty"));
            }
            Some(_) => {}
        }
    }
    sections.len()
}

/// Returns whether the page enables filters.
fn check_page_config(config: Option<&Value>, errors: &mut Vec<String>, warnings: &mut Vec<String>) -> bool {
    let Some(config) = config.filter(|c| !c.is_null()) else {
        return false;
    };
    let Some(config) = config.as_object() else {
        errors.push("pageConfig must be an object".to_string());
        return false;
    };

    let enable_filters = config.get("enableFilters").and_then(Value::as_bool);
    if enable_filters.is_none() {
        warnings.push("pageConfig is missing enableFilters".to_string());
    }
    if let Some(filters) = config.get("filtersJsonConfig") {
        let parses = filters
            .as_str()
            .is_some_and(|s| serde_json::from_str::<Value>(s).is_ok());
        if !parses {
            errors.push("pageConfig.filtersJsonConfig is not valid JSON".to_string());
        }
    }
    enable_filters.unwrap_or(false)
}

fn check_extraction_metadata(metadata: Option<&Value>, warnings: &mut Vec<String>) {
    let Some(metadata) = metadata else {
        return;
    };
    let Some(metadata) = metadata.as_object() else {
        warnings.push("extractionMetadata should be an object".to_string());
        return;
    };
    match metadata.get("schemaVersion").and_then(Value::as_str) {
        None => warnings.push("extractionMetadata is missing schemaVersion".to_string()),
        Some(version) if version != SCHEMA_VERSION => {
            warnings.push(format!("schemaVersion is not {SCHEMA_VERSION}: {version}"));
        }
        Some(_) => {}
    }
}

/// Completeness bonus: 0.1 each for a title over 5 characters, base
/// content over 100 characters, at least one content group and at least two
/// common sections.
#[must_use]
pub fn completeness_bonus(value: &Value) -> f64 {
    let text_len = |field: &str| {
        value
            .get(field)
            .and_then(Value::as_str)
            .map_or(0, |s| s.trim().chars().count())
    };
    let array_len = |field: &str| value.get(field).and_then(Value::as_array).map_or(0, Vec::len);

    [
        text_len("title") > 5,
        text_len("baseContent") > 100,
        array_len("contentGroups") >= 1,
        array_len("commonSections") >= 2,
    ]
    .into_iter()
    .filter(|hit| *hit)
    .map(|_| COMPLETENESS_STEP)
    .sum()
}

/// `clamp(1 − 0.2·errors − 0.1·warnings + bonus, 0, 1)`.
///
/// # Example
///
/// ```rust
/// use rs_pricing_cms::validator::quality_score;
///
/// assert_eq!(quality_score(0, 0, 0.4), 1.0);
/// assert!((quality_score(1, 2, 0.1) - 0.7).abs() < 1e-9);
/// assert_eq!(quality_score(9, 0, 0.0), 0.0);
/// ```
#[must_use]
pub fn quality_score(error_count: usize, warning_count: usize, completeness_bonus: f64) -> f64 {
    let score = 1.0 - ERROR_PENALTY * error_count as f64 - WARNING_PENALTY * warning_count as f64 + completeness_bonus;
    score.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn valid_value() -> Value {
        json!({
            "title": "Azure 存储定价",
            "baseContent": "",
            "contentGroups": [{
                "groupName": "中国北部",
                "filterCriteriaJson": "[{\"filterKey\":\"region\",\"matchValues\":[\"north-china\"]}]",
                "content": "<table></table>"
            }],
            "commonSections": [
                {"sectionType": "Banner", "content": "<div>b</div>"},
                {"sectionType": "Qa", "content": "<div>q</div>"}
            ],
            "pageConfig": {"enableFilters": true, "filtersJsonConfig": "{\"filterDefinitions\":[]}"},
            "extractionMetadata": {"schemaVersion": "1.1"}
        })
    }

    #[test]
    fn valid_document_passes() {
        let report = ExtractionValidator::new().validate_value(&valid_value());
        assert!(report.is_valid, "{:?}", report.errors);
        assert!(report.warnings.is_empty(), "{:?}", report.warnings);
        assert_eq!(report.content_groups_count, 1);
        assert_eq!(report.common_sections_count, 2);
        assert!(report.has_filters);
        assert!((report.quality_score - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_field_is_an_error() {
        let mut value = valid_value();
        if let Some(object) = value.as_object_mut() {
            object.remove("pageConfig");
        }
        let report = ExtractionValidator::new().validate_value(&value);
        assert!(!report.is_valid);
        assert!(report.errors.iter().any(|e| e.contains("pageConfig")));
        assert!(!report.has_filters);
    }

    #[test]
    fn group_problems_are_errors() {
        let mut value = valid_value();
        value["contentGroups"][0]["filterCriteriaJson"] = json!("[{not json");
        value["contentGroups"][0]["groupName"] = json!("");
        let report = ExtractionValidator::new().validate_value(&value);
        assert_eq!(report.errors.len(), 2, "{:?}", report.errors);
    }

    #[test]
    fn section_problems() {
        let mut value = valid_value();
        value["commonSections"][0]["sectionType"] = json!("Footer");
        value["commonSections"][1]["content"] = json!("");
        let report = ExtractionValidator::new().validate_value(&value);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn short_title_and_bad_filters_config() {
        let mut value = valid_value();
        value["title"] = json!("VM");
        value["pageConfig"]["filtersJsonConfig"] = json!("{");
        let report = ExtractionValidator::new().validate_value(&value);
        assert!(report.warnings.iter().any(|w| w.contains("too short")));
        assert!(report.errors.iter().any(|e| e.contains("filtersJsonConfig")));
    }

    #[test]
    fn non_object_is_invalid() {
        let report = ExtractionValidator::new().validate_value(&json!([1, 2]));
        assert!(!report.is_valid);
        assert!((report.quality_score - 0.8).abs() < 1e-9);
    }

    #[test]
    fn bonus_counts_each_criterion() {
        let value = json!({
            "title": "Azure 存储定价",
            "baseContent": "x".repeat(101),
            "contentGroups": [],
            "commonSections": [{}]
        });
        assert!((completeness_bonus(&value) - 0.2).abs() < 1e-9);
    }
}
