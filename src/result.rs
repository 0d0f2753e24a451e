//! Result types for a pipeline run.
//!
//! `FlexibleContentDocument` is the terminal artifact: metadata, common
//! sections, content groups tagged with filter predicates and the page
//! configuration a CMS uses to render filters. `LegacyRecord` re-projects
//! the same facts onto the fixed field names of the older import format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::strategy::StrategyType;

/// Version tag written into every document.
pub const EXTRACTOR_VERSION: &str = "flexible_v1.0";

/// Schema version of the flexible document format.
pub const SCHEMA_VERSION: &str = "1.1";

/// Kind of page-invariant section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SectionType {
    Banner,
    Description,
    Qa,
}

impl SectionType {
    /// All known section types.
    pub const ALL: [SectionType; 3] = [SectionType::Banner, SectionType::Description, SectionType::Qa];

    /// Serialized name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            SectionType::Banner => "Banner",
            SectionType::Description => "Description",
            SectionType::Qa => "Qa",
        }
    }
}

/// One of the page-invariant blocks extracted once per page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommonSection {
    pub section_type: SectionType,
    pub content: String,
}

/// A structured predicate attached to a content group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriterion {
    pub filter_key: String,
    pub match_values: Vec<String>,
}

impl FilterCriterion {
    /// Predicate matching a single value.
    #[must_use]
    pub fn single(filter_key: &str, value: &str) -> Self {
        Self {
            filter_key: filter_key.to_string(),
            match_values: vec![value.to_string()],
        }
    }
}

/// A named bundle of HTML shown under the given filter predicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentGroup {
    pub group_name: String,
    pub filter_criteria: Vec<FilterCriterion>,
    /// `filter_criteria` serialized as a JSON array.
    pub filter_criteria_json: String,
    pub content: String,
    /// 1-based position in emission order.
    pub sort_order: u32,
    pub is_active: bool,
}

impl ContentGroup {
    /// Creates an active group, serializing the criteria alongside.
    pub fn new(
        group_name: impl Into<String>,
        filter_criteria: Vec<FilterCriterion>,
        content: impl Into<String>,
        sort_order: u32,
    ) -> crate::Result<Self> {
        let filter_criteria_json = serde_json::to_string(&filter_criteria)?;
        Ok(Self {
            group_name: group_name.into(),
            filter_criteria,
            filter_criteria_json,
            content: content.into(),
            sort_order,
            is_active: true,
        })
    }

    /// Match values of the predicate on `filter_key`, if any.
    #[must_use]
    pub fn criterion(&self, filter_key: &str) -> Option<&[String]> {
        self.filter_criteria
            .iter()
            .find(|c| c.filter_key == filter_key)
            .map(|c| c.match_values.as_slice())
    }
}

/// How the CMS should render the page's filters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageType {
    #[default]
    Simple,
    RegionFilter,
    ComplexFilter,
}

/// One selectable value in a filter definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterDefinitionOption {
    pub value: String,
    pub label: String,
}

/// A filter the CMS renders above the content groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterDefinition {
    /// Key matched by `FilterCriterion::filter_key`.
    pub filter_key: String,
    /// Control kind: `dropdown` or `tabs`.
    pub filter_type: String,
    pub display_name: String,
    pub options: Vec<FilterDefinitionOption>,
}

/// Page-level rendering configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageConfig {
    pub display_title: String,
    pub page_icon: String,
    pub left_navigation_identifier: String,
    pub page_type: PageType,
    pub enable_filters: bool,
    pub filter_definitions: Vec<FilterDefinition>,
    /// `{"filterDefinitions": [...]}` as a JSON string.
    pub filters_json_config: String,
}

/// Provenance of a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionMetadata {
    pub extractor_version: String,
    pub schema_version: String,
    pub strategy: StrategyType,
    pub extracted_at: DateTime<Utc>,
    pub source_file: String,
    pub source_url: String,
}

impl ExtractionMetadata {
    /// Metadata stamped with the current time and crate versions.
    #[must_use]
    pub fn now(strategy: StrategyType, source_file: &str, source_url: &str) -> Self {
        Self {
            extractor_version: EXTRACTOR_VERSION.to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            strategy,
            extracted_at: Utc::now(),
            source_file: source_file.to_string(),
            source_url: source_url.to_string(),
        }
    }
}

/// Page metadata pulled from the document head and URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseMetadata {
    pub title: String,
    pub meta_title: String,
    pub meta_description: String,
    pub meta_keywords: String,
    pub ms_service_name: String,
    pub slug: String,
    pub language: String,
    pub last_modified: String,
}

/// The CMS-importable result of one extraction run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlexibleContentDocument {
    pub title: String,
    pub meta_title: String,
    pub meta_description: String,
    pub meta_keywords: String,
    pub ms_service_name: String,
    pub slug: String,
    pub language: String,
    pub last_modified: String,
    pub base_content: String,
    pub content_groups: Vec<ContentGroup>,
    pub common_sections: Vec<CommonSection>,
    pub page_config: PageConfig,
    pub extraction_metadata: ExtractionMetadata,
}

impl FlexibleContentDocument {
    /// Content of the first common section of `section_type`.
    #[must_use]
    pub fn section(&self, section_type: SectionType) -> Option<&str> {
        self.common_sections
            .iter()
            .find(|s| s.section_type == section_type)
            .map(|s| s.content.as_str())
    }

    /// Content of the group whose only predicate is `region = region_id`.
    #[must_use]
    pub fn region_content(&self, region_id: &str) -> Option<&str> {
        self.content_groups
            .iter()
            .find(|g| {
                g.filter_criteria.len() == 1
                    && g.criterion("region").is_some_and(|v| v.len() == 1 && v[0] == region_id)
            })
            .map(|g| g.content.as_str())
    }

    /// Re-projects the document onto the flat legacy record.
    #[must_use]
    pub fn legacy_record(&self) -> LegacyRecord {
        let region = |id: &str| self.region_content(id).unwrap_or_default().to_string();
        let has_region = self
            .content_groups
            .iter()
            .any(|g| g.criterion("region").is_some());

        LegacyRecord {
            title: self.title.clone(),
            meta_title: self.meta_title.clone(),
            meta_description: self.meta_description.clone(),
            meta_keywords: self.meta_keywords.clone(),
            slug: self.slug.clone(),
            language: self.language.clone(),
            banner_content: self.section(SectionType::Banner).unwrap_or_default().to_string(),
            description_content: self
                .section(SectionType::Description)
                .unwrap_or_default()
                .to_string(),
            qa_content: self.section(SectionType::Qa).unwrap_or_default().to_string(),
            has_region,
            no_region_content: if has_region { String::new() } else { self.base_content.clone() },
            north_china_content: region("north-china"),
            north_china2_content: region("north-china2"),
            north_china3_content: region("north-china3"),
            east_china_content: region("east-china"),
            east_china2_content: region("east-china2"),
            east_china3_content: region("east-china3"),
        }
    }
}

/// Flat record with one field per known region.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LegacyRecord {
    pub title: String,
    pub meta_title: String,
    pub meta_description: String,
    pub meta_keywords: String,
    pub slug: String,
    pub language: String,
    pub banner_content: String,
    pub description_content: String,
    pub qa_content: String,
    pub has_region: bool,
    pub no_region_content: String,
    pub north_china_content: String,
    #[serde(rename = "NorthChina2Content")]
    pub north_china2_content: String,
    #[serde(rename = "NorthChina3Content")]
    pub north_china3_content: String,
    pub east_china_content: String,
    #[serde(rename = "EastChina2Content")]
    pub east_china2_content: String,
    #[serde(rename = "EastChina3Content")]
    pub east_china3_content: String,
}

/// Validation summary embedded in an error result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorValidation {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

/// Returned instead of a document when the input cannot be read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResult {
    pub error: String,
    pub source_file: String,
    pub source_url: String,
    pub extraction_timestamp: DateTime<Utc>,
    pub validation: ErrorValidation,
}

impl ErrorResult {
    /// Error result for `error`, stamped with the current time.
    #[must_use]
    pub fn new(error: &crate::Error, source_file: &str, source_url: &str) -> Self {
        let message = error.to_string();
        Self {
            error: message.clone(),
            source_file: source_file.to_string(),
            source_url: source_url.to_string(),
            extraction_timestamp: Utc::now(),
            validation: ErrorValidation {
                is_valid: false,
                errors: vec![message],
            },
        }
    }
}
