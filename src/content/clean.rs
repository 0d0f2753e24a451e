//! HTML cleanup for extracted fragments.

use crate::patterns::{EMPTY_DIV, HTML_COMMENT, INTER_TAG_SPACE, WHITESPACE_RUN};

/// Normalizes an extracted HTML fragment.
///
/// Comments are dropped, whitespace runs collapse to one space, empty
/// `<div>` wrappers disappear and whitespace between tags is removed.
///
/// # Example
///
/// ```rust
/// use rs_pricing_cms::content::clean_html_content;
///
/// let html = "<div>\n  <p>中国北部</p>  <!-- note -->\n  <div> </div>\n</div>";
/// assert_eq!(clean_html_content(html), "<div><p>中国北部</p></div>");
/// ```
#[must_use]
pub fn clean_html_content(html: &str) -> String {
    if html.trim().is_empty() {
        return String::new();
    }
    let without_comments = HTML_COMMENT.replace_all(html, "");
    let collapsed = WHITESPACE_RUN.replace_all(&without_comments, " ");
    let without_empty = EMPTY_DIV.replace_all(&collapsed, "");
    let tight = INTER_TAG_SPACE.replace_all(&without_empty, "><");
    tight.trim().to_string()
}
