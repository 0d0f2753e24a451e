//! Pages with several filter dimensions or category tabs.
//!
//! Content is resolved per combination of region, software option and
//! category tab: the tree is region-filtered first, then narrowed to the
//! software option's partition and finally to the tab's pane. Each
//! combination is stored under [`content_key`] for the builder.

use indexmap::IndexMap;
use tracing::{debug, info, warn};

use super::{assemble_document, ExtractionContext, ExtractionStrategy, PageStrategy, StrategyType};
use crate::content::{clean_html_content, extract_main_content, without_filter_controls};
use crate::detector::tab::{find_main_container, find_partitions};
use crate::detector::{CategoryTab, PageAnalysis, PageAnalyzer};
use crate::dom::{self, Document, Selection};
use crate::error::Result;
use crate::flexible::{content_key, tabs_for_software, FlexibleBuilder, StrategyContent};
use crate::result::FlexibleContentDocument;

/// Strategy for pages with software filters or category tabs.
#[derive(Debug, Clone)]
pub struct ComplexStrategy {
    descriptor: ExtractionStrategy,
}

impl ComplexStrategy {
    #[must_use]
    pub fn new(descriptor: ExtractionStrategy) -> Self {
        Self { descriptor }
    }

    /// Registry constructor.
    #[must_use]
    pub fn boxed(descriptor: &ExtractionStrategy) -> Box<dyn PageStrategy> {
        Box::new(Self::new(descriptor.clone()))
    }

    /// Content of every dimension combination present on the page.
    #[must_use]
    pub fn content_by_key(
        &self,
        doc: &Document,
        analysis: &PageAnalysis,
        product_name: &str,
        ctx: &ExtractionContext<'_>,
    ) -> IndexMap<String, String> {
        let filters = &analysis.filters;
        let regions: Vec<Option<&str>> = if filters.region_visible && !filters.region_options.is_empty() {
            filters.region_options.iter().map(|o| Some(o.value.as_str())).collect()
        } else {
            vec![None]
        };

        let mut content = IndexMap::new();
        for region in regions {
            let filtered = match region {
                Some(region) => ctx.region_processor.apply_region_filtering(doc, region, product_name),
                None => dom::clone_document(doc),
            };
            let Some(container) = find_main_container(&filtered) else {
                debug!(region = ?region, "no technical selector container");
                continue;
            };
            for (values, html) in resolve_panes(&container, analysis) {
                let mut parts: Vec<&str> = region.into_iter().collect();
                parts.extend(values.iter().map(String::as_str));
                if parts.is_empty() {
                    continue;
                }
                content.insert(content_key(&parts), html);
            }
        }
        content
    }
}

impl PageStrategy for ComplexStrategy {
    fn strategy_type(&self) -> StrategyType {
        StrategyType::Complex
    }

    fn descriptor(&self) -> &ExtractionStrategy {
        &self.descriptor
    }

    fn extract(&self, html: &str, ctx: &ExtractionContext<'_>) -> Result<FlexibleContentDocument> {
        let doc = dom::parse(html);
        let analysis = PageAnalyzer::new().analyze(&doc);
        let product_name = ctx
            .region_processor
            .resolve_product_name(ctx.product_config, Some(&analysis.filters), ctx.source_file);

        let content_by_key = self.content_by_key(&doc, &analysis, &product_name, ctx);
        let builder = FlexibleBuilder::new();
        let content_groups = builder.build_complex_content_groups(&analysis.filters, &analysis.tabs, &content_by_key)?;

        let base_content = if content_groups.is_empty() {
            warn!(product = %product_name, "no filter content resolved, keeping page body as base content");
            extract_main_content(&doc)
        } else {
            String::new()
        };

        info!(
            product = %product_name,
            keys = content_by_key.len(),
            groups = content_groups.len(),
            "complex extraction"
        );

        let content = StrategyContent {
            base_content,
            content_groups,
            page_config: builder.build_page_config(&analysis.filters, &analysis.tabs),
        };
        Ok(assemble_document(&doc, ctx, self.strategy_type(), content))
    }
}

/// Software and tab values with their HTML, within one (filtered) container.
fn resolve_panes(container: &Selection, analysis: &PageAnalysis) -> Vec<(Vec<String>, String)> {
    let filters = &analysis.filters;
    let tabs = &analysis.tabs;
    let partitions = find_partitions(container);
    let mut panes = Vec::new();

    if filters.software_visible && !filters.software_options.is_empty() {
        for option in &filters.software_options {
            let target = option.href.trim_start_matches('#');
            let scope = partitions
                .iter()
                .find(|(id, _)| id == target)
                .map_or_else(|| container.clone(), |(_, partition)| partition.clone());
            let scoped_tabs = tabs_for_software(option, tabs);
            if scoped_tabs.is_empty() {
                panes.push((vec![option.value.clone()], without_filter_controls(&scope)));
            } else {
                panes.extend(tab_panes(&scope, &scoped_tabs).into_iter().map(|(tab, html)| {
                    (vec![option.value.clone(), tab], html)
                }));
            }
        }
        return panes;
    }

    let mut seen = std::collections::HashSet::new();
    let all_tabs: Vec<&CategoryTab> = tabs.category_tabs.iter().filter(|t| seen.insert(t.target_id())).collect();
    if all_tabs.is_empty() {
        panes.push((Vec::new(), without_filter_controls(container)));
    } else {
        panes.extend(tab_panes(container, &all_tabs).into_iter().map(|(tab, html)| (vec![tab], html)));
    }
    panes
}

/// Pane HTML per tab, keyed by the tab's target id.
fn tab_panes(scope: &Selection, tabs: &[&CategoryTab]) -> Vec<(String, String)> {
    tabs.iter()
        .filter_map(|tab| {
            let target = tab.target_id();
            let Some(pane) = find_by_id(scope, target) else {
                debug!(tab = %target, "tab pane not found");
                return None;
            };
            let html = if has_visible_content(&pane) {
                clean_html_content(&dom::outer_html(&pane))
            } else {
                String::new()
            };
            Some((target.to_string(), html))
        })
        .collect()
}

/// Text, a table or an image left in the pane.
fn has_visible_content(pane: &Selection) -> bool {
    !dom::normalized_text(pane).is_empty() || pane.select("table, img").exists()
}

fn find_by_id<'a>(scope: &Selection<'a>, id: &str) -> Option<Selection<'a>> {
    dom::elements(&scope.select("[id]"))
        .into_iter()
        .find(|el| dom::id(el).as_deref() == Some(id))
}
