//! Page metadata extraction.
//!
//! Reads the document head (title and named meta tags), the service tag
//! the pricing pages embed, the body language class and the slug implied by
//! the page URL.

use std::path::Path;

use tracing::warn;
use url::Url;

use crate::dom::{self, Document, Selection};
use crate::error::{Error, Result};
use crate::result::BaseMetadata;

/// Base used to resolve relative page paths when deriving a slug.
const SLUG_BASE_URL: &str = "https://www.azure.cn/";

/// Extracts [`BaseMetadata`] from a parsed page.
#[derive(Debug, Clone)]
pub struct ContentExtractor {
    default_language: String,
}

impl Default for ContentExtractor {
    fn default() -> Self {
        Self::new("zh-cn")
    }
}

impl ContentExtractor {
    #[must_use]
    pub fn new(default_language: &str) -> Self {
        Self {
            default_language: default_language.to_string(),
        }
    }

    /// Extracts page metadata.
    ///
    /// A failing field degrades to an empty string with a warning; the
    /// other fields are unaffected.
    #[must_use]
    pub fn extract_base_metadata(&self, doc: &Document, url: &str) -> BaseMetadata {
        let slug = if url.trim().is_empty() {
            String::new()
        } else {
            extract_slug(url).unwrap_or_else(|err| {
                warn!(url = %url, error = %err, "slug derivation failed");
                String::new()
            })
        };

        BaseMetadata {
            title: extract_title(doc),
            meta_title: meta_content(doc, "title"),
            meta_description: meta_content(doc, "description"),
            meta_keywords: meta_content(doc, "keywords"),
            ms_service_name: extract_ms_service_name(doc),
            slug,
            language: extract_language(doc).unwrap_or_else(|| self.default_language.clone()),
            last_modified: extract_last_modified(doc),
        }
    }
}

/// `<title>` text, falling back to the first `<h1>`.
#[must_use]
pub fn extract_title(doc: &Document) -> String {
    let title = dom::normalized_text(&doc.select("title").first());
    if !title.is_empty() {
        return title;
    }
    dom::normalized_text(&doc.select("h1").first())
}

/// `content` of `<meta name="{name}">`, trimmed.
#[must_use]
pub fn meta_content(doc: &Document, name: &str) -> String {
    dom::elements(&doc.select("meta[name]"))
        .iter()
        .find(|meta| {
            dom::get_attribute(meta, "name").is_some_and(|n| n.eq_ignore_ascii_case(name))
        })
        .and_then(|meta| dom::get_attribute(meta, "content"))
        .map(|c| c.trim().to_string())
        .unwrap_or_default()
}

/// Service identifier from the `ms.service` tag.
#[must_use]
pub fn extract_ms_service_name(doc: &Document) -> String {
    dom::elements(&doc.select("tags"))
        .iter()
        .find_map(|tags| dom::non_empty_attribute(tags, "ms.service"))
        .unwrap_or_else(|| meta_content(doc, "ms.service"))
}

/// First class token of `<body>`, used by the pages as a locale marker.
#[must_use]
pub fn extract_language(doc: &Document) -> Option<String> {
    dom::first_class(&doc.select("body").first())
}

/// Last-modified marker from meta tags or visible date elements.
#[must_use]
pub fn extract_last_modified(doc: &Document) -> String {
    let from_meta = meta_content(doc, "last-modified");
    if !from_meta.is_empty() {
        return from_meta;
    }
    let from_property = dom::elements(&doc.select("meta[property]"))
        .iter()
        .find(|m| dom::get_attribute(m, "property").as_deref() == Some("article:modified_time"))
        .and_then(|m| dom::non_empty_attribute(m, "content"));
    if let Some(value) = from_property {
        return value;
    }
    let visible: Selection = doc.select(".last-updated, .modified-date").first();
    dom::normalized_text(&visible)
}

/// Slug of a pricing URL: path after `/details/`, minus `index.html` or a
/// trailing slash, with the remaining segments joined by `_`.
///
/// Relative paths are accepted. Returns an empty slug when the path has no
/// `/details/` segment.
///
/// # Example
///
/// ```rust
/// use rs_pricing_cms::content::extract_slug;
///
/// let slug = extract_slug("https://www.azure.cn/pricing/details/storage/blobs/index.html")?;
/// assert_eq!(slug, "storage_blobs");
/// # Ok::<(), rs_pricing_cms::Error>(())
/// ```
pub fn extract_slug(url: &str) -> Result<String> {
    let parsed = Url::parse(url).or_else(|_| {
        Url::parse(SLUG_BASE_URL).and_then(|base| base.join(url))
    });
    let parsed = parsed.map_err(|e| Error::SectionExtractionFailed {
        section: "slug".to_string(),
        message: format!("{url}: {e}"),
    })?;

    let path = parsed.path();
    let Some((_, rest)) = path.split_once("/details/") else {
        return Ok(String::new());
    };
    let rest = rest.strip_suffix("index.html").unwrap_or(rest);
    let rest = rest.trim_end_matches('/');

    Ok(rest
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("_"))
}

/// Canonical pricing URL for a `<service>-index.html` file.
#[must_use]
pub fn default_url_for_file(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    let service = stem.strip_suffix("-index")?;
    (!service.is_empty()).then(|| format!("https://www.azure.cn/pricing/details/{service}/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEAD: &str = r#"<html><head>
        <title> Azure 存储定价 </title>
        <meta name="title" content="存储定价 - Azure 云计算">
        <meta name="Description" content=" 了解存储价格 ">
        <meta name="keywords" content="Azure, 存储, 价格">
        <meta property="article:modified_time" content="2024-05-01">
        </head><body class="zh-cn pricing">
        <div class="pure-content"><tags ms.service="storage" ms.date="09/30/2015"></tags></div>
        </body></html>"#;

    #[test]
    fn extracts_head_metadata() {
        let doc = dom::parse(HEAD);
        let metadata = ContentExtractor::default()
            .extract_base_metadata(&doc, "https://www.azure.cn/pricing/details/storage/");
        assert_eq!(metadata.title, "Azure 存储定价");
        assert_eq!(metadata.meta_title, "存储定价 - Azure 云计算");
        assert_eq!(metadata.meta_description, "了解存储价格");
        assert_eq!(metadata.meta_keywords, "Azure, 存储, 价格");
        assert_eq!(metadata.ms_service_name, "storage");
        assert_eq!(metadata.slug, "storage");
        assert_eq!(metadata.language, "zh-cn");
        assert_eq!(metadata.last_modified, "2024-05-01");
    }

    #[test]
    fn language_defaults_when_body_has_no_class() {
        let doc = dom::parse("<html><body><h1>Title</h1></body></html>");
        let metadata = ContentExtractor::new("en-us").extract_base_metadata(&doc, "");
        assert_eq!(metadata.language, "en-us");
        assert_eq!(metadata.title, "Title");
        assert_eq!(metadata.slug, "");
    }

    #[test]
    fn slug_variants() -> Result<()> {
        assert_eq!(extract_slug("https://www.azure.cn/pricing/details/api-management/")?, "api-management");
        assert_eq!(extract_slug("https://www.azure.cn/pricing/details/storage/blobs/index.html")?, "storage_blobs");
        assert_eq!(extract_slug("/pricing/details/cosmos-db/index.html")?, "cosmos-db");
        assert_eq!(extract_slug("https://www.azure.cn/home/features/")?, "");
        Ok(())
    }

    #[test]
    fn default_url_from_index_file() {
        assert_eq!(
            default_url_for_file(Path::new("/tmp/api-management-index.html")).as_deref(),
            Some("https://www.azure.cn/pricing/details/api-management/")
        );
        assert!(default_url_for_file(Path::new("/tmp/about.html")).is_none());
    }
}
