//! Flexible document assembly.
//!
//! Turns per-region or per-filter content into [`ContentGroup`]s with
//! machine-checkable predicates, derives the page's filter configuration and
//! puts the final [`FlexibleContentDocument`] together.

use indexmap::IndexMap;
use serde_json::json;
use tracing::{debug, warn};

use crate::detector::{CategoryTab, FilterAnalysis, FilterOption, TabAnalysis};
use crate::error::Result;
use crate::region::region_display_name;
use crate::result::{
    BaseMetadata, CommonSection, ContentGroup, ExtractionMetadata, FilterCriterion, FilterDefinition,
    FilterDefinitionOption, FlexibleContentDocument, PageConfig, PageType,
};

/// Filter key of the region dimension.
pub const REGION_KEY: &str = "region";
/// Filter key of the software dimension.
pub const SOFTWARE_KEY: &str = "software";
/// Filter key of the category-tab dimension.
pub const CATEGORY_KEY: &str = "category";

/// One value along a filter dimension.
#[derive(Debug, Clone, PartialEq, Eq)]
struct DimensionValue {
    key: &'static str,
    value: String,
    label: String,
}

/// Strategy output that varies by page type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StrategyContent {
    pub base_content: String,
    pub content_groups: Vec<ContentGroup>,
    pub page_config: PageConfig,
}

/// Builds content groups, page configuration and the final document.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlexibleBuilder;

impl FlexibleBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// One group per region with non-empty content, in map order.
    pub fn build_region_content_groups(
        &self,
        region_content: &IndexMap<String, String>,
        filters: Option<&FilterAnalysis>,
    ) -> Result<Vec<ContentGroup>> {
        let mut groups = Vec::with_capacity(region_content.len());
        for (region_id, content) in region_content {
            if content.trim().is_empty() {
                debug!(region = %region_id, "skipping empty region content");
                continue;
            }
            let sort_order = next_sort_order(&groups);
            groups.push(ContentGroup::new(
                region_display_name(region_id, filters),
                vec![FilterCriterion::single(REGION_KEY, region_id)],
                content.clone(),
                sort_order,
            )?);
        }
        Ok(groups)
    }

    /// Groups for the cross-product of the dimensions present on the page.
    ///
    /// `content_by_key` is keyed by the dimension values joined with `_`,
    /// escaped by [`content_key`]. Only keys with non-empty content emit a group.
    pub fn build_complex_content_groups(
        &self,
        filters: &FilterAnalysis,
        tabs: &TabAnalysis,
        content_by_key: &IndexMap<String, String>,
    ) -> Result<Vec<ContentGroup>> {
        let mut groups = Vec::new();
        for combination in enumerate_combinations(filters, tabs) {
            let refs: Vec<&str> = combination.iter().map(|d| d.value.as_str()).collect();
            let key = content_key(&refs);
            let Some(content) = content_by_key.get(&key).filter(|c| !c.trim().is_empty()) else {
                continue;
            };

            let group_name = combination
                .iter()
                .map(|d| d.label.as_str())
                .collect::<Vec<_>>()
                .join(" - ");
            let criteria = combination
                .iter()
                .map(|d| FilterCriterion::single(d.key, &d.value))
                .collect();
            let sort_order = next_sort_order(&groups);
            groups.push(ContentGroup::new(group_name, criteria, content.clone(), sort_order)?);
        }

        debug!(groups = groups.len(), keys = content_by_key.len(), "complex content groups");
        Ok(groups)
    }

    /// Page type and filter definitions for the active dimensions.
    ///
    /// Display title, icon and navigation identifier are left for the
    /// caller.
    #[must_use]
    pub fn build_page_config(&self, filters: &FilterAnalysis, tabs: &TabAnalysis) -> PageConfig {
        let mut definitions = Vec::new();

        if filters.region_visible && !filters.region_options.is_empty() {
            definitions.push(dropdown_definition(REGION_KEY, "地区", &filters.region_options, true));
        }
        if filters.software_visible && !filters.software_options.is_empty() {
            definitions.push(dropdown_definition(SOFTWARE_KEY, "软件类别", &filters.software_options, false));
        }
        let category_tabs = unique_tabs(&tabs.category_tabs);
        if !category_tabs.is_empty() {
            definitions.push(FilterDefinition {
                filter_key: CATEGORY_KEY.to_string(),
                filter_type: "tabs".to_string(),
                display_name: "类别".to_string(),
                options: category_tabs
                    .iter()
                    .map(|t| FilterDefinitionOption {
                        value: t.target_id().to_string(),
                        label: t.label.clone(),
                    })
                    .collect(),
            });
        }

        let page_type = match (
            definitions.iter().any(|d| d.filter_key == REGION_KEY),
            definitions.iter().any(|d| d.filter_key != REGION_KEY),
        ) {
            (false, false) => PageType::Simple,
            (true, false) => PageType::RegionFilter,
            _ => PageType::ComplexFilter,
        };

        PageConfig {
            page_type,
            enable_filters: !definitions.is_empty(),
            filters_json_config: filters_json_config(&definitions),
            filter_definitions: definitions,
            ..PageConfig::default()
        }
    }

    /// Configuration of a page without filters.
    #[must_use]
    pub fn default_page_config(&self) -> PageConfig {
        PageConfig {
            filters_json_config: filters_json_config(&[]),
            ..PageConfig::default()
        }
    }

    /// Final document from metadata, common sections and strategy output.
    ///
    /// Fills the page config's display title from the page title, the icon
    /// from the banner image and the navigation identifier from the slug
    /// when the strategy left them empty.
    #[must_use]
    pub fn build_flexible_page(
        &self,
        metadata: BaseMetadata,
        common_sections: Vec<CommonSection>,
        content: StrategyContent,
        extraction: ExtractionMetadata,
    ) -> FlexibleContentDocument {
        let mut page_config = content.page_config;
        if page_config.filters_json_config.is_empty() {
            page_config.filters_json_config = filters_json_config(&page_config.filter_definitions);
        }
        if page_config.display_title.is_empty() {
            page_config.display_title = metadata.title.clone();
        }
        if page_config.page_icon.is_empty() {
            page_config.page_icon = banner_icon(&common_sections).unwrap_or_default();
        }
        if page_config.left_navigation_identifier.is_empty() {
            page_config.left_navigation_identifier = if metadata.slug.is_empty() {
                metadata.ms_service_name.clone()
            } else {
                metadata.slug.clone()
            };
        }

        FlexibleContentDocument {
            title: metadata.title,
            meta_title: metadata.meta_title,
            meta_description: metadata.meta_description,
            meta_keywords: metadata.meta_keywords,
            ms_service_name: metadata.ms_service_name,
            slug: metadata.slug,
            language: metadata.language,
            last_modified: metadata.last_modified,
            base_content: content.base_content,
            content_groups: content.content_groups,
            common_sections,
            page_config,
            extraction_metadata: extraction,
        }
    }
}

/// Key of a combination in `content_by_key`.
///
/// Values are joined with `_`. A `_` or `\` inside a value is escaped with
/// `\`, so distinct combinations never share a key.
///
/// # Example
///
/// ```rust
/// use rs_pricing_cms::flexible::content_key;
///
/// assert_eq!(content_key(&["north-china", "linux", "tabContent1-0"]), "north-china_linux_tabContent1-0");
/// assert_ne!(content_key(&["a_b", "c"]), content_key(&["a", "b_c"]));
/// ```
#[must_use]
pub fn content_key(values: &[&str]) -> String {
    values
        .iter()
        .map(|value| value.replace('\\', "\\\\").replace('_', "\\_"))
        .collect::<Vec<_>>()
        .join("_")
}

/// Dimension-value combinations actually present on the page.
///
/// Category tabs are scoped to their partition: a software option is
/// paired with the tabs of the partition its `href` points at, or with all
/// tabs when no partition matches.
fn enumerate_combinations(filters: &FilterAnalysis, tabs: &TabAnalysis) -> Vec<Vec<DimensionValue>> {
    let regions: Vec<DimensionValue> = if filters.region_visible {
        filters
            .region_options
            .iter()
            .map(|o| DimensionValue {
                key: REGION_KEY,
                value: o.value.clone(),
                label: region_display_name(&o.value, Some(filters)),
            })
            .collect()
    } else {
        Vec::new()
    };

    let software: Vec<&FilterOption> = if filters.software_visible {
        filters.software_options.iter().collect()
    } else {
        Vec::new()
    };

    let mut tails: Vec<Vec<DimensionValue>> = Vec::new();
    if software.is_empty() {
        let all_tabs = unique_tabs(&tabs.category_tabs);
        if all_tabs.is_empty() {
            tails.push(Vec::new());
        } else {
            tails.extend(all_tabs.into_iter().map(|t| vec![tab_value(t)]));
        }
    } else {
        for option in software {
            let software_value = DimensionValue {
                key: SOFTWARE_KEY,
                value: option.value.clone(),
                label: if option.label.is_empty() { option.value.clone() } else { option.label.clone() },
            };
            let scoped = tabs_for_software(option, tabs);
            if scoped.is_empty() {
                tails.push(vec![software_value]);
            } else {
                for tab in scoped {
                    tails.push(vec![software_value.clone(), tab_value(tab)]);
                }
            }
        }
    }

    if regions.is_empty() {
        return tails.into_iter().filter(|t| !t.is_empty()).collect();
    }
    regions
        .iter()
        .flat_map(|region| {
            tails.iter().map(move |tail| {
                let mut combination = Vec::with_capacity(tail.len() + 1);
                combination.push(region.clone());
                combination.extend(tail.iter().cloned());
                combination
            })
        })
        .collect()
}

/// Tabs of the partition a software option reveals.
pub fn tabs_for_software<'a>(option: &FilterOption, tabs: &'a TabAnalysis) -> Vec<&'a CategoryTab> {
    let target = option.href.trim_start_matches('#');
    let scoped = tabs.tabs_in_group(target);
    if scoped.is_empty() && !tabs.content_groups.iter().any(|g| g.id == target) {
        return unique_tabs(&tabs.category_tabs);
    }
    scoped
}

fn tab_value(tab: &CategoryTab) -> DimensionValue {
    DimensionValue {
        key: CATEGORY_KEY,
        value: tab.target_id().to_string(),
        label: tab.label.clone(),
    }
}

/// Tabs with distinct targets, first occurrence kept.
fn unique_tabs(tabs: &[CategoryTab]) -> Vec<&CategoryTab> {
    let mut seen = std::collections::HashSet::new();
    tabs.iter().filter(|t| seen.insert(t.target_id())).collect()
}

fn dropdown_definition(key: &str, display_name: &str, options: &[FilterOption], is_region: bool) -> FilterDefinition {
    FilterDefinition {
        filter_key: key.to_string(),
        filter_type: "dropdown".to_string(),
        display_name: display_name.to_string(),
        options: options
            .iter()
            .map(|o| FilterDefinitionOption {
                value: o.value.clone(),
                label: if is_region {
                    known_or_label(o)
                } else if o.label.is_empty() {
                    o.value.clone()
                } else {
                    o.label.clone()
                },
            })
            .collect(),
    }
}

fn known_or_label(option: &FilterOption) -> String {
    if option.label.is_empty() {
        region_display_name(&option.value, None)
    } else {
        option.label.clone()
    }
}

fn next_sort_order(groups: &[ContentGroup]) -> u32 {
    u32::try_from(groups.len()).map_or(u32::MAX, |n| n.saturating_add(1))
}

/// `{"filterDefinitions": [...]}` as a JSON string.
#[must_use]
pub fn filters_json_config(definitions: &[FilterDefinition]) -> String {
    let value = json!({ "filterDefinitions": definitions });
    serde_json::to_string(&value).unwrap_or_else(|err| {
        warn!(error = %err, "filter definitions failed to serialize");
        r#"{"filterDefinitions":[]}"#.to_string()
    })
}

/// `src` of the first image in the banner section.
fn banner_icon(sections: &[CommonSection]) -> Option<String> {
    let banner = sections
        .iter()
        .find(|s| s.section_type == crate::result::SectionType::Banner)?;
    let doc = crate::dom::parse(&banner.content);
    crate::dom::non_empty_attribute(&doc.select("img").first(), "src")
}
