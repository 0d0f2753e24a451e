//! DOM operations adapter.
//!
//! Thin helpers over the `dom_query` crate that the detectors and
//! extractors share: attribute and class access, element-only sibling and
//! child navigation, ancestor walks and document cloning. Every helper
//! operates on the first node of a `Selection`.

// Re-export core types for external use
pub use dom_query::{Document, NodeId, Selection};

// Re-export StrTendril for external use
pub use tendril::StrTendril;

// === Attribute Operations ===

/// Get element ID attribute
#[inline]
#[must_use]
pub fn id(sel: &Selection) -> Option<String> {
    sel.attr("id").map(|s| s.to_string())
}

/// Get any attribute value
#[inline]
#[must_use]
pub fn get_attribute(sel: &Selection, name: &str) -> Option<String> {
    sel.attr(name).map(|s| s.to_string())
}

/// Get an attribute value, treating blank values as absent.
#[must_use]
pub fn non_empty_attribute(sel: &Selection, name: &str) -> Option<String> {
    sel.attr(name)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Check whether the element's class list contains `class` as a whole token.
#[must_use]
pub fn has_class(sel: &Selection, class: &str) -> bool {
    sel.attr("class")
        .is_some_and(|c| c.split_whitespace().any(|token| token == class))
}

/// First whitespace-separated class token.
#[must_use]
pub fn first_class(sel: &Selection) -> Option<String> {
    sel.attr("class")
        .and_then(|c| c.split_whitespace().next().map(str::to_string))
}

// === Tag/Node Information ===

/// Get tag name (lowercase)
#[must_use]
pub fn tag_name(sel: &Selection) -> Option<String> {
    sel.nodes()
        .first()
        .and_then(dom_query::NodeRef::node_name)
        .map(|t| t.to_ascii_lowercase())
}

/// Check whether the element is one of `h1`..`h6`.
#[must_use]
pub fn is_heading(sel: &Selection) -> bool {
    tag_name(sel).is_some_and(|t| matches!(t.as_str(), "h1" | "h2" | "h3" | "h4" | "h5" | "h6"))
}

/// Identity of the first node, for comparisons across selections.
#[inline]
#[must_use]
pub fn node_id(sel: &Selection) -> Option<NodeId> {
    sel.nodes().first().map(|n| n.id)
}

/// Check whether two selections start at the same node.
#[must_use]
pub fn same_node(a: &Selection, b: &Selection) -> bool {
    match (node_id(a), node_id(b)) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}

// === Text Content ===

/// Text content with runs of whitespace collapsed to single spaces.
#[must_use]
pub fn normalized_text(sel: &Selection) -> String {
    sel.text().split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Get outer HTML content
#[inline]
#[must_use]
pub fn outer_html(sel: &Selection) -> StrTendril {
    sel.html()
}

// === Tree Navigation ===

/// Split a selection into one selection per matched element.
#[must_use]
pub fn elements<'a>(sel: &Selection<'a>) -> Vec<Selection<'a>> {
    sel.nodes()
        .iter()
        .filter(|n| n.is_element())
        .map(|n| Selection::from(*n))
        .collect()
}

/// Direct element children, in document order.
#[must_use]
pub fn element_children<'a>(sel: &Selection<'a>) -> Vec<Selection<'a>> {
    elements(&sel.children())
}

/// Get next element sibling (skipping text nodes)
#[must_use]
pub fn next_element_sibling<'a>(sel: &Selection<'a>) -> Option<Selection<'a>> {
    sel.nodes().first().and_then(|node| {
        let mut sibling = node.next_sibling();
        while let Some(s) = sibling {
            if s.is_element() {
                return Some(Selection::from(s));
            }
            sibling = s.next_sibling();
        }
        None
    })
}

/// Element ancestors from the parent upwards, stopping before `<html>`.
///
/// `limit` bounds the number of levels walked.
#[must_use]
pub fn ancestors<'a>(sel: &Selection<'a>, limit: Option<usize>) -> Vec<Selection<'a>> {
    let mut out = Vec::new();
    let mut current = sel.nodes().first().and_then(dom_query::NodeRef::parent);
    while let Some(node) = current {
        if limit.is_some_and(|max| out.len() >= max) {
            break;
        }
        if node.is_element() {
            let parent = Selection::from(node);
            if tag_name(&parent).as_deref() == Some("html") {
                break;
            }
            out.push(parent);
        }
        current = node.parent();
    }
    out
}

/// Nearest ancestor matching `predicate`.
#[must_use]
pub fn closest<'a, F>(sel: &Selection<'a>, predicate: F) -> Option<Selection<'a>>
where
    F: Fn(&Selection<'a>) -> bool,
{
    ancestors(sel, None).into_iter().find(|a| predicate(a))
}

/// Check whether `node` lies inside (or is) `container`.
#[must_use]
pub fn is_within(node: &Selection, container: &Selection) -> bool {
    let Some(container_id) = node_id(container) else {
        return false;
    };
    if node_id(node) == Some(container_id) {
        return true;
    }
    ancestors(node, None)
        .iter()
        .any(|a| node_id(a) == Some(container_id))
}

// === Documents ===

/// Parse HTML string into document
#[inline]
#[must_use]
pub fn parse(html: &str) -> Document {
    Document::from(html)
}

/// Clone document
///
/// The clone is re-parsed from serialized HTML, so it shares no nodes with
/// the source.
#[must_use]
pub fn clone_document(doc: &Document) -> Document {
    Document::from(doc.html().to_string())
}

/// Clone an element with all descendants into a standalone document.
#[must_use]
pub fn clone_element(sel: &Selection) -> Document {
    Document::from(outer_html(sel).to_string())
}

/// Body markup of a document produced by [`clone_element`].
#[must_use]
pub fn body_html(doc: &Document) -> String {
    let body = doc.select("body");
    if body.exists() {
        body.inner_html().to_string()
    } else {
        doc.html().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_tokens_match_whole_words() {
        let doc = parse(r#"<div class="region-container dropdown-container">x</div>"#);
        let div = doc.select("div");
        assert!(has_class(&div, "region-container"));
        assert!(!has_class(&div, "region"));
        assert_eq!(first_class(&div).as_deref(), Some("region-container"));
    }

    #[test]
    fn sibling_navigation_skips_text() {
        let doc = parse("<div><p id=a>A</p> text <p id=b>B</p></div>");
        let a = doc.select("#a");
        let next = next_element_sibling(&a).map(|s| id(&s));
        assert_eq!(next, Some(Some("b".to_string())));
    }

    #[test]
    fn ancestors_stop_before_html() {
        let doc = parse("<div class=outer><section><span id=leaf>x</span></section></div>");
        let leaf = doc.select("#leaf");
        let tags: Vec<_> = ancestors(&leaf, None)
            .iter()
            .filter_map(tag_name)
            .collect();
        assert_eq!(tags, vec!["section", "div", "body"]);
        assert_eq!(ancestors(&leaf, Some(1)).len(), 1);
        let outer = closest(&leaf, |a| has_class(a, "outer"));
        assert!(outer.is_some());
    }

    #[test]
    fn is_within_checks_containment() {
        let doc = parse("<div id=box><p id=in>x</p></div><p id=out>y</p>");
        let container = doc.select("#box");
        assert!(is_within(&doc.select("#in"), &container));
        assert!(!is_within(&doc.select("#out"), &container));
    }

    #[test]
    fn clone_document_is_independent() {
        let doc = parse("<table id=t1></table><table id=t2></table>");
        let copy = clone_document(&doc);
        copy.select("#t1").remove();
        assert_eq!(copy.select("table").length(), 1);
        assert_eq!(doc.select("table").length(), 2);
    }

    #[test]
    fn normalized_text_collapses_whitespace() {
        let doc = parse("<p>  a \n\n b\tc </p>");
        assert_eq!(normalized_text(&doc.select("p")), "a b c");
    }
}
