use rs_pricing_cms::content::{
    classify_pricing_section, extract_pricing_area, extract_slug, ContentExtractor, SectionExtractor, SectionKind,
};
use rs_pricing_cms::dom;
use rs_pricing_cms::SectionType;

fn classify(html: &str) -> SectionKind {
    let doc = dom::parse(html);
    classify_pricing_section(&doc.select(".pricing-page-section").first())
}

#[test]
fn faq_keyword_wins() {
    let kind = classify(r#"<div class="pricing-page-section"><h2>常见问题</h2><table><tr><td>支持和服务级别协议</td></tr></table></div>"#);
    assert_eq!(kind, SectionKind::Faq);
}

#[test]
fn sla_keyword() {
    let kind = classify(r#"<div class="pricing-page-section"><h2>支持和服务级别协议</h2><p>如有任何疑问或需要帮助，请访问 Azure 支持选择自助服务或者其他任何方式联系我们获得支持。</p></div>"#);
    assert_eq!(kind, SectionKind::Sla);
}

#[test]
fn table_without_keywords_is_content() {
    let long_table = format!(
        r#"<div class="pricing-page-section"><table><tr><td>{}</td></tr></table></div>"#,
        "实例 ￥1.00/小时 ".repeat(8)
    );
    assert_eq!(classify(&long_table), SectionKind::Content);
}

#[test]
fn faq_link_keeps_pricing_section_in_content() {
    let html = format!(
        r#"<html><body>
        <div class="pricing-page-section" id="desc"><p>{}</p></div>
        <div class="pricing-page-section" id="prices">
            <p>{}</p>
            <a href="/support/faq/">更多</a>
            <table><tr><td>每小时</td><td>￥0.50</td></tr></table>
        </div>
        </body></html>"#,
        "Azure 示例服务是完全托管的服务，可以帮助你轻松构建和运行应用程序，无需管理基础结构。",
        "以下价格按小时计费，具体取决于所选层级和所在区域，详细信息请参阅下表。".repeat(2)
    );
    let doc = dom::parse(&html);
    assert_eq!(classify_pricing_section(&doc.select("#prices")), SectionKind::Content);
    assert!(extract_pricing_area(&doc).contains("￥0.50"));
}

#[test]
fn short_plain_text_is_other() {
    assert_eq!(classify(r#"<div class="pricing-page-section"><p>简短说明</p></div>"#), SectionKind::Other);
}

const PAGE: &str = r#"<html><head>
    <title>Azure Cosmos DB 定价</title>
    <meta name="keywords" content="Cosmos DB">
</head><body class="zh-cn">
<div class="container">
    <div class="common-banner col-top-banner">
        <div class="common-banner-image"><img src="Images/cosmos-banner.png"><h2>Azure Cosmos DB</h2></div>
    </div>
</div>
<div class="pricing-page-section" id="desc">
    <p>Azure Cosmos DB 是全球分布式多模型数据库服务，支持文档、键值、宽列和图形数据库，可弹性缩放吞吐量和存储。</p>
</div>
<div class="pricing-page-section" id="pricing">
    <h2>定价详细信息</h2><table><tr><td>￥0.10/小时</td></tr></table>
</div>
<div class="pricing-page-section" id="faq">
    <h2>常见问题</h2>
    <ul>
        <li><i class="icon icon-plus"></i><a>如何计费？</a><section>按小时计费。</section></li>
    </ul>
</div>
<div class="pricing-page-section" id="support">
    <h2>支持和服务级别协议</h2>
    <p>如有任何疑问或需要帮助，请访问 Azure 支持选择自助服务或者其他任何方式联系我们。</p>
</div>
</body></html>"#;

#[test]
fn common_sections_of_a_pricing_page() {
    let doc = dom::parse(PAGE);
    let sections = SectionExtractor::default().extract_common_sections(&doc);
    let kinds: Vec<_> = sections.iter().map(|s| s.section_type).collect();
    assert_eq!(kinds, vec![SectionType::Banner, SectionType::Description, SectionType::Qa]);

    let banner = &sections[0].content;
    assert!(banner.contains(r#"src="{img_hostname}/Images/cosmos-banner.png""#));

    let description = &sections[1].content;
    assert!(description.contains(r#"id="desc""#));
    assert!(!description.contains("常见问题"));

    let qa = &sections[2].content;
    assert!(qa.contains("如何计费"));
    assert!(qa.contains("支持和服务级别协议"));
    assert!(!qa.contains("￥0.10"));
}

#[test]
fn literal_questions_are_the_last_resort() {
    let doc = dom::parse(
        r#"<html><body>
        <div class="more-info"><div class="box"><h3>开发人员层的用途是什么？</h3><p>用于评估。</p></div></div>
        <div class="other"><p>无关内容</p></div>
        </body></html>"#,
    );
    assert_eq!(SectionExtractor::default().extract_qa(&doc), "");

    let wrapped = dom::parse(
        r#"<html><body>
        <div class="pricing-page-section"><div class="box"><h3>开发人员层的用途是什么？</h3><p>用于评估。</p></div></div>
        <div class="other"><p>无关内容</p></div>
        </body></html>"#,
    );
    let qa = SectionExtractor::default().extract_qa(&wrapped);
    assert!(qa.contains("用于评估"));
    assert!(!qa.contains("无关内容"));
}

#[test]
fn metadata_of_a_pricing_page() {
    let doc = dom::parse(PAGE);
    let metadata =
        ContentExtractor::default().extract_base_metadata(&doc, "https://www.azure.cn/pricing/details/cosmos-db/index.html");
    assert_eq!(metadata.title, "Azure Cosmos DB 定价");
    assert_eq!(metadata.meta_keywords, "Cosmos DB");
    assert_eq!(metadata.slug, "cosmos-db");
    assert_eq!(metadata.language, "zh-cn");
}

#[test]
fn slug_joins_nested_segments() -> rs_pricing_cms::Result<()> {
    assert_eq!(extract_slug("https://www.azure.cn/pricing/details/storage/files/")?, "storage_files");
    assert_eq!(extract_slug("pricing/details/iot-hub/index.html")?, "iot-hub");
    Ok(())
}
