//! Tab structure detection.
//!
//! Pricing pages wrap their variable content in a technical selector
//! container. Inside it, `tabContentN` partitions group the markup of one
//! software option; they look like tabs but nobody clicks them. Genuine
//! tabs are the `category-tabs` navigation lists inside each partition.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dom::{self, Document, Selection};
use crate::patterns::CONTENT_PARTITION_ID;

/// Class of the technical selector root container.
pub const MAIN_CONTAINER_CLASS: &str = "technical-azure-selector";

/// Class shared by desktop and mobile category tab lists.
pub const CATEGORY_TABS_CLASS: &str = "category-tabs";

/// Group id used when the container has tabs but no partitions.
pub const IMPLICIT_GROUP_ID: &str = "main";

/// A container that partitions content by software value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentGroupMarker {
    pub id: String,
    /// Number of category tabs inside this partition.
    pub tab_count: usize,
}

/// A user-clickable category tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTab {
    pub href: String,
    pub id: String,
    pub label: String,
    pub group_id: String,
}

impl CategoryTab {
    /// Id of the pane the tab reveals (`href` without `#`).
    #[must_use]
    pub fn target_id(&self) -> &str {
        self.href.trim_start_matches('#')
    }
}

/// Result of tab detection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabAnalysis {
    pub has_main_container: bool,
    pub has_tabs: bool,
    pub content_groups: Vec<ContentGroupMarker>,
    pub category_tabs: Vec<CategoryTab>,
    pub total_category_tabs: usize,
    pub has_complex_tabs: bool,
}

impl TabAnalysis {
    /// Category tabs that live in partition `group_id`.
    #[must_use]
    pub fn tabs_in_group(&self, group_id: &str) -> Vec<&CategoryTab> {
        self.category_tabs.iter().filter(|t| t.group_id == group_id).collect()
    }
}

/// Detects partitions and category tabs.
#[derive(Debug, Clone, Copy, Default)]
pub struct TabDetector;

impl TabDetector {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Detects the tab structure of `doc`.
    #[must_use]
    pub fn detect_tabs(&self, doc: &Document) -> TabAnalysis {
        let Some(container) = find_main_container(doc) else {
            debug!("no technical selector container");
            return TabAnalysis::default();
        };

        let partitions = find_partitions(&container);
        let mut content_groups = Vec::with_capacity(partitions.len());
        let mut category_tabs = Vec::new();

        if partitions.is_empty() {
            let group_id = dom::non_empty_attribute(&container, "id")
                .unwrap_or_else(|| IMPLICIT_GROUP_ID.to_string());
            category_tabs.extend(collect_category_tabs(&container, &group_id));
        } else {
            for (id, partition) in &partitions {
                let tabs = collect_category_tabs(partition, id);
                content_groups.push(ContentGroupMarker {
                    id: id.clone(),
                    tab_count: tabs.len(),
                });
                category_tabs.extend(tabs);
            }
        }

        let total_category_tabs = category_tabs.len();
        debug!(
            partitions = content_groups.len(),
            category_tabs = total_category_tabs,
            "tab detection"
        );

        TabAnalysis {
            has_main_container: true,
            has_tabs: !content_groups.is_empty(),
            content_groups,
            category_tabs,
            total_category_tabs,
            has_complex_tabs: total_category_tabs > 0,
        }
    }
}

/// First element carrying the technical selector class.
#[must_use]
pub fn find_main_container(doc: &Document) -> Option<Selection<'_>> {
    let container = doc.select(&format!(".{MAIN_CONTAINER_CLASS}")).first();
    container.exists().then_some(container)
}

/// Top-level partitions of `container`, with their ids.
///
/// A partition nested inside another partition belongs to its parent and
/// is skipped.
#[must_use]
pub fn find_partitions<'a>(container: &Selection<'a>) -> Vec<(String, Selection<'a>)> {
    let candidates: Vec<(String, Selection<'a>)> = dom::elements(&container.select("[id]"))
        .into_iter()
        .filter_map(|el| {
            let id = dom::id(&el)?;
            CONTENT_PARTITION_ID.is_match(&id).then_some((id, el))
        })
        .collect();

    candidates
        .iter()
        .filter(|(_, el)| {
            !candidates
                .iter()
                .any(|(_, other)| !dom::same_node(el, other) && dom::is_within(el, other))
        })
        .cloned()
        .collect()
}

/// Category tabs rendered inside `scope`, with mobile duplicates collapsed.
#[must_use]
pub fn collect_category_tabs(scope: &Selection, group_id: &str) -> Vec<CategoryTab> {
    let lists = dom::elements(&scope.select(&format!(".{CATEGORY_TABS_CLASS}")));
    let has_desktop = lists.iter().any(|l| !is_mobile_only(l));

    let mut seen = HashSet::new();
    let mut tabs = Vec::new();
    for list in lists.iter().filter(|l| !has_desktop || !is_mobile_only(l)) {
        for tab in read_tab_entries(list, group_id) {
            if seen.insert(tab.href.clone()) {
                tabs.push(tab);
            }
        }
    }
    tabs
}

/// Lists shown only on small breakpoints.
fn is_mobile_only(list: &Selection) -> bool {
    dom::has_class(list, "hidden-lg") || dom::has_class(list, "hidden-md")
}

fn read_tab_entries(list: &Selection, group_id: &str) -> Vec<CategoryTab> {
    if dom::tag_name(list).as_deref() == Some("select") {
        return dom::elements(&list.select("option"))
            .iter()
            .filter_map(|option| {
                let value = dom::non_empty_attribute(option, "data-href")
                    .or_else(|| dom::non_empty_attribute(option, "value"))?;
                let label = dom::normalized_text(option);
                if label.is_empty() {
                    return None;
                }
                let href = if value.starts_with('#') { value } else { format!("#{value}") };
                Some(CategoryTab {
                    id: dom::id(option).unwrap_or_else(|| href.trim_start_matches('#').to_string()),
                    href,
                    label,
                    group_id: group_id.to_string(),
                })
            })
            .collect();
    }

    dom::elements(&list.select("a"))
        .iter()
        .filter_map(|link| {
            let href = dom::non_empty_attribute(link, "data-href")
                .or_else(|| dom::non_empty_attribute(link, "href").filter(|h| h.starts_with('#')))?;
            let label = dom::normalized_text(link);
            if label.is_empty() {
                return None;
            }
            Some(CategoryTab {
                id: dom::id(link).unwrap_or_else(|| href.trim_start_matches('#').to_string()),
                href,
                label,
                group_id: group_id.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partitions_without_tabs_are_not_complex() {
        let doc = dom::parse(
            r#"<div class="technical-azure-selector pricing-detail-tab">
                <div class="tab-content">
                    <div class="tab-panel" id="tabContent1"><table id="a"></table></div>
                    <div class="tab-panel" id="tabContent2"><table id="b"></table></div>
                </div>
            </div>"#,
        );
        let analysis = TabDetector::new().detect_tabs(&doc);
        assert!(analysis.has_main_container);
        assert!(analysis.has_tabs);
        assert_eq!(analysis.content_groups.len(), 2);
        assert_eq!(analysis.total_category_tabs, 0);
        assert!(!analysis.has_complex_tabs);
    }

    #[test]
    fn mobile_duplicates_collapse() {
        let doc = dom::parse(
            r##"<div class="technical-azure-selector">
                <div id="tabContent1">
                    <ul class="os-tab-nav category-tabs hidden-xs hidden-sm">
                        <li><a data-href="#tabContent1-0" id="cat-general">通用</a></li>
                        <li><a data-href="#tabContent1-1" id="cat-memory">内存优化</a></li>
                    </ul>
                    <select class="dropdown-select category-tabs hidden-lg hidden-md">
                        <option data-href="#tabContent1-0" value="tabContent1-0">通用</option>
                        <option data-href="#tabContent1-1" value="tabContent1-1">内存优化</option>
                    </select>
                    <div id="tabContent1-0"></div>
                    <div id="tabContent1-1"></div>
                </div>
            </div>"##,
        );
        let analysis = TabDetector::new().detect_tabs(&doc);
        assert_eq!(analysis.content_groups.len(), 1);
        assert_eq!(analysis.total_category_tabs, 2);
        assert!(analysis.has_complex_tabs);
        assert_eq!(analysis.category_tabs[0].group_id, "tabContent1");
        assert_eq!(analysis.category_tabs[0].target_id(), "tabContent1-0");
        assert_eq!(analysis.category_tabs[1].id, "cat-memory");
        assert_eq!(analysis.content_groups[0].tab_count, 2);

        let group_id = String::from("tabContent1");
        let scoped = analysis.tabs_in_group(&group_id);
        drop(group_id);
        assert_eq!(scoped.len(), 2);
        assert!(analysis.tabs_in_group("tabContent2").is_empty());
    }

    #[test]
    fn mobile_only_list_is_still_counted() {
        let doc = dom::parse(
            r##"<div class="technical-azure-selector"><div id="contentGroup_1">
                <select class="category-tabs hidden-lg hidden-md">
                    <option value="tabContent1-0">基本</option>
                </select>
            </div></div>"##,
        );
        let analysis = TabDetector::new().detect_tabs(&doc);
        assert_eq!(analysis.total_category_tabs, 1);
        assert_eq!(analysis.category_tabs[0].href, "#tabContent1-0");
    }

    #[test]
    fn no_container_means_no_tabs() {
        let doc = dom::parse(r##"<ul class="category-tabs"><li><a href="#x">X</a></li></ul>"##);
        let analysis = TabDetector::new().detect_tabs(&doc);
        assert_eq!(analysis, TabAnalysis::default());
    }

    #[test]
    fn container_without_partitions_uses_implicit_group() {
        let doc = dom::parse(
            r##"<div class="technical-azure-selector">
                <ul class="category-tabs"><li><a href="#pane-a">A</a></li></ul>
            </div>"##,
        );
        let analysis = TabDetector::new().detect_tabs(&doc);
        assert!(!analysis.has_tabs);
        assert_eq!(analysis.total_category_tabs, 1);
        assert_eq!(analysis.category_tabs[0].group_id, IMPLICIT_GROUP_ID);
    }
}
