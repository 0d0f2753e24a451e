//! Region and software filter detection.
//!
//! A filter control is a labelled container (`region-container`,
//! `software-kind-container`) wrapping a selectable list. The container's
//! inline style decides visibility; the list decides the options.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dom::{self, Document, Selection};
use crate::patterns::{HIDDEN_STYLE, PLACEHOLDER_LABEL};

/// Class of the region filter container.
pub const REGION_CONTAINER_CLASS: &str = "region-container";

/// Class of the software/category filter container.
pub const SOFTWARE_CONTAINER_CLASS: &str = "software-kind-container";

/// One selectable entry in a region or software filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOption {
    pub value: String,
    pub label: String,
    /// Fragment link to the content the option reveals (`#tabContent1`), may be empty.
    pub href: String,
}

/// Presence, visibility and options of a single filter control.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterControl {
    pub exists: bool,
    pub visible: bool,
    pub options: Vec<FilterOption>,
}

/// Combined view of the region and software filters on a page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterAnalysis {
    pub has_region: bool,
    pub region_visible: bool,
    pub region_options: Vec<FilterOption>,
    pub has_software: bool,
    pub software_visible: bool,
    pub software_options: Vec<FilterOption>,
}

impl FilterAnalysis {
    /// Builds the analysis from the two controls.
    #[must_use]
    pub fn from_controls(region: FilterControl, software: FilterControl) -> Self {
        Self {
            has_region: region.exists,
            region_visible: region.exists && region.visible,
            region_options: region.options,
            has_software: software.exists,
            software_visible: software.exists && software.visible,
            software_options: software.options,
        }
    }

    /// Names of the visible filter types (`region`, `software`).
    #[must_use]
    pub fn visible_filter_types(&self) -> Vec<&'static str> {
        let mut types = Vec::with_capacity(2);
        if self.region_visible {
            types.push("region");
        }
        if self.software_visible {
            types.push("software");
        }
        types
    }

    /// `true` when more than one filter type is visible.
    #[inline]
    #[must_use]
    pub fn has_multiple_filters(&self) -> bool {
        self.visible_filter_types().len() > 1
    }

    /// Label of the region option with `value`, if the page lists one.
    #[must_use]
    pub fn region_label(&self, value: &str) -> Option<&str> {
        self.region_options
            .iter()
            .find(|o| o.value == value)
            .map(|o| o.label.as_str())
            .filter(|l| !l.is_empty())
    }
}

/// Detects filter controls in a parsed page.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterDetector;

impl FilterDetector {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Detects the region and software filters.
    ///
    /// Never fails: a missing container yields a control that does not
    /// exist, is not visible and has no options.
    #[must_use]
    pub fn detect_filters(&self, doc: &Document) -> FilterAnalysis {
        let region = self.detect_control(doc, REGION_CONTAINER_CLASS);
        let software = self.detect_control(doc, SOFTWARE_CONTAINER_CLASS);

        debug!(
            region_exists = region.exists,
            region_visible = region.visible,
            region_options = region.options.len(),
            software_exists = software.exists,
            software_visible = software.visible,
            software_options = software.options.len(),
            "filter detection"
        );

        FilterAnalysis::from_controls(region, software)
    }

    /// Reads the first container carrying `container_class`.
    #[must_use]
    pub fn detect_control(&self, doc: &Document, container_class: &str) -> FilterControl {
        let selector = format!(".{container_class}");
        let container = doc.select(&selector).first();
        if !container.exists() {
            return FilterControl::default();
        }

        FilterControl {
            exists: true,
            visible: !is_hidden(&container),
            options: read_options(&container),
        }
    }
}

/// `true` when the element's inline style hides it.
#[must_use]
pub fn is_hidden(sel: &Selection) -> bool {
    sel.attr("style").is_some_and(|style| HIDDEN_STYLE.is_match(&style))
}

/// Options of the selectable list inside a filter container.
///
/// A `<select>` is preferred; link lists (`li > a`) are read when the
/// control is rendered as a custom dropdown.
#[must_use]
pub fn read_options(container: &Selection) -> Vec<FilterOption> {
    let select = container.select("select").first();
    let raw: Vec<FilterOption> = if select.exists() {
        dom::elements(&select.select("option"))
            .iter()
            .map(|option| FilterOption {
                value: dom::get_attribute(option, "value").unwrap_or_default().trim().to_string(),
                label: dom::normalized_text(option),
                href: dom::get_attribute(option, "data-href").unwrap_or_default(),
            })
            .collect()
    } else {
        dom::elements(&container.select("li a"))
            .iter()
            .map(|link| {
                let href = dom::non_empty_attribute(link, "data-href")
                    .or_else(|| dom::non_empty_attribute(link, "href").filter(|h| h.starts_with('#')))
                    .unwrap_or_default();
                let value = dom::non_empty_attribute(link, "data-value")
                    .or_else(|| dom::non_empty_attribute(link, "id"))
                    .unwrap_or_else(|| href.trim_start_matches('#').to_string());
                FilterOption {
                    value,
                    label: dom::normalized_text(link),
                    href,
                }
            })
            .collect()
    };

    raw.into_iter().filter(is_real_option).collect()
}

fn is_real_option(option: &FilterOption) -> bool {
    !option.value.is_empty() && !PLACEHOLDER_LABEL.is_match(&option.label)
}
