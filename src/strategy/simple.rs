//! Static pages: metadata, common sections and the page body.

use tracing::debug;

use super::{assemble_document, ExtractionContext, ExtractionStrategy, PageStrategy, StrategyType};
use crate::content::extract_main_content;
use crate::dom;
use crate::error::Result;
use crate::flexible::{FlexibleBuilder, StrategyContent};
use crate::result::FlexibleContentDocument;

/// Strategy for pages without filter-dependent content.
#[derive(Debug, Clone)]
pub struct SimpleStaticStrategy {
    descriptor: ExtractionStrategy,
}

impl SimpleStaticStrategy {
    #[must_use]
    pub fn new(descriptor: ExtractionStrategy) -> Self {
        Self { descriptor }
    }

    /// Registry constructor.
    #[must_use]
    pub fn boxed(descriptor: &ExtractionStrategy) -> Box<dyn PageStrategy> {
        Box::new(Self::new(descriptor.clone()))
    }
}

impl PageStrategy for SimpleStaticStrategy {
    fn strategy_type(&self) -> StrategyType {
        StrategyType::SimpleStatic
    }

    fn descriptor(&self) -> &ExtractionStrategy {
        &self.descriptor
    }

    fn extract(&self, html: &str, ctx: &ExtractionContext<'_>) -> Result<FlexibleContentDocument> {
        let doc = dom::parse(html);
        let base_content = extract_main_content(&doc);
        debug!(
            processor = %self.descriptor.processor,
            chars = base_content.len(),
            "static extraction"
        );
        let content = StrategyContent {
            base_content,
            content_groups: Vec::new(),
            page_config: FlexibleBuilder::new().default_page_config(),
        };
        Ok(assemble_document(&doc, ctx, self.strategy_type(), content))
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::options::Options;
    use crate::region::RegionProcessor;
    use crate::result::{PageType, SectionType};

    #[test]
    fn static_page_has_base_content_only() -> Result<()> {
        let html = r#"<html><head><title>Azure 存储定价</title></head><body class="zh-cn">
            <div class="common-banner"><h2>存储</h2><img src="/images/storage.svg"></div>
            <div class="pricing-page-section"><p>Azure 存储提供可大规模扩展的对象存储，适用于各种数据对象和工作负载。</p></div>
            <div class="pricing-page-section"><h2>定价</h2><table id="t1"><tr><td>￥0.1</td></tr></table></div>
            <div class="pricing-page-section"><h2>常见问题</h2><ul><li>问题</li></ul></div>
        </body></html>"#;
        let options = Options::default();
        let processor = RegionProcessor::default();
        let ctx = ExtractionContext::new(Path::new("storage-index.html"), &processor, &options);

        let strategy = SimpleStaticStrategy::new(ExtractionStrategy::for_type(StrategyType::SimpleStatic));
        let doc = strategy.extract(html, &ctx)?;

        assert_eq!(doc.title, "Azure 存储定价");
        assert_eq!(doc.slug, "storage");
        assert!(doc.content_groups.is_empty());
        assert!(doc.base_content.contains(r#"id="t1""#));
        assert_eq!(doc.page_config.page_type, PageType::Simple);
        assert!(!doc.page_config.enable_filters);
        assert!(doc.section(SectionType::Banner).is_some_and(|b| b.contains("{img_hostname}/images/storage.svg")));
        assert_eq!(doc.page_config.page_icon, "{img_hostname}/images/storage.svg");
        assert_eq!(doc.extraction_metadata.strategy, StrategyType::SimpleStatic);
        Ok(())
    }
}
