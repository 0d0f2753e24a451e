//! Region-filtered pages.
//!
//! The page is filtered once per region: excluded tables are removed from a
//! copy of the tree and the remaining pricing area becomes that region's
//! content group.

use indexmap::IndexMap;
use tracing::{debug, info, warn};

use super::{assemble_document, ExtractionContext, ExtractionStrategy, PageStrategy, StrategyType};
use crate::content::{extract_main_content, extract_pricing_area};
use crate::detector::{FilterAnalysis, FilterDetector, FilterOption, TabAnalysis};
use crate::dom::{self, Document};
use crate::error::Result;
use crate::flexible::{FlexibleBuilder, StrategyContent};
use crate::region::region_display_name;
use crate::result::FlexibleContentDocument;

/// Strategy for pages whose only dimension is the region.
#[derive(Debug, Clone)]
pub struct RegionFilterStrategy {
    descriptor: ExtractionStrategy,
}

impl RegionFilterStrategy {
    #[must_use]
    pub fn new(descriptor: ExtractionStrategy) -> Self {
        Self { descriptor }
    }

    /// Registry constructor.
    #[must_use]
    pub fn boxed(descriptor: &ExtractionStrategy) -> Box<dyn PageStrategy> {
        Box::new(Self::new(descriptor.clone()))
    }

    /// Pricing area per region, in region order.
    #[must_use]
    pub fn region_content(
        &self,
        doc: &Document,
        regions: &[String],
        product_name: &str,
        ctx: &ExtractionContext<'_>,
    ) -> IndexMap<String, String> {
        regions
            .iter()
            .map(|region| {
                let filtered = ctx.region_processor.apply_region_filtering(doc, region, product_name);
                let content = extract_pricing_area(&filtered);
                debug!(region = %region, chars = content.len(), "region content");
                (region.clone(), content)
            })
            .collect()
    }
}

impl PageStrategy for RegionFilterStrategy {
    fn strategy_type(&self) -> StrategyType {
        StrategyType::RegionFilter
    }

    fn descriptor(&self) -> &ExtractionStrategy {
        &self.descriptor
    }

    fn extract(&self, html: &str, ctx: &ExtractionContext<'_>) -> Result<FlexibleContentDocument> {
        let doc = dom::parse(html);
        let filters = with_detected_regions(FilterDetector::new().detect_filters(&doc), ctx, &doc);
        let regions: Vec<String> = filters.region_options.iter().map(|o| o.value.clone()).collect();
        let product_name = ctx
            .region_processor
            .resolve_product_name(ctx.product_config, Some(&filters), ctx.source_file);

        let region_content = self.region_content(&doc, &regions, &product_name, ctx);
        let builder = FlexibleBuilder::new();
        let content_groups = builder.build_region_content_groups(&region_content, Some(&filters))?;

        let base_content = if content_groups.is_empty() {
            warn!(product = %product_name, "no region content, keeping page body as base content");
            extract_main_content(&doc)
        } else {
            String::new()
        };

        info!(
            product = %product_name,
            regions = regions.len(),
            groups = content_groups.len(),
            "region extraction"
        );

        let content = StrategyContent {
            base_content,
            content_groups,
            page_config: builder.build_page_config(&filters, &TabAnalysis::default()),
        };
        Ok(assemble_document(&doc, ctx, self.strategy_type(), content))
    }
}

/// Falls back to region ids found elsewhere in the page when the region
/// control lists no options.
fn with_detected_regions(mut filters: FilterAnalysis, ctx: &ExtractionContext<'_>, doc: &Document) -> FilterAnalysis {
    if !filters.region_options.is_empty() {
        filters.region_visible = true;
        return filters;
    }
    let detected = ctx.region_processor.detect_available_regions(doc);
    if detected.is_empty() {
        return filters;
    }
    debug!(count = detected.len(), "region options taken from page signals");
    filters.has_region = true;
    filters.region_visible = true;
    filters.region_options = detected
        .into_iter()
        .map(|value| FilterOption {
            label: region_display_name(&value, None),
            value,
            href: String::new(),
        })
        .collect();
    filters
}
