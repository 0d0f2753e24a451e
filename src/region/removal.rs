//! Structure-aware table removal.
//!
//! Removing a region-excluded table must not take the surrounding prose
//! with it. The children of the element holding the table (its pricing
//! section, or a wrapper inside the section) are split into heading-anchored
//! blocks; within the table's block every child gets a [`BlockRole`], and
//! only the table and its own short notes are removed. Footnotes, titles and
//! the page-wide pricing disclaimer stay, even when they share a wrapper
//! with the table.
//!
//! Planning is read-only. [`RemovalPlan::apply`] performs the mutation.

use std::collections::HashSet;

use tracing::debug;

use crate::dom::{self, NodeId, Selection};
use crate::patterns::{FOOTNOTE_REFERENCE, GLOBAL_PRICING_NOTE, GLOBAL_TITLE, SECTION_TITLE};

/// Class of the section container that owns pricing tables.
pub const PRICING_SECTION_CLASS: &str = "pricing-page-section";

/// Notes longer than this are treated as prose, not as a table note.
pub const MAX_TABLE_NOTE_CHARS: usize = 200;

const NOTE_TAGS: &[&str] = &["p", "div", "span", "small", "em", "i", "blockquote"];

/// Role of a child element within the removed table's block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockRole {
    /// The excluded table, or a wrapper that holds nothing but the table.
    Table,
    /// A short note tied to the excluded table.
    TableSpecificNote,
    /// A note carrying a numbered footnote reference, shared by tables.
    TableFootnoteNote,
    /// Product-level heading.
    GlobalTitle,
    /// Section-level heading.
    SectionTitle,
    /// Page-wide pricing disclaimer.
    GlobalPricingNote,
    /// Anything else in the block.
    Other,
}

impl BlockRole {
    /// Only the table and its specific notes are ever removed.
    #[inline]
    #[must_use]
    pub fn is_removable(self) -> bool {
        matches!(self, BlockRole::Table | BlockRole::TableSpecificNote)
    }
}

/// A block child with its role.
#[derive(Debug, Clone)]
pub struct ClassifiedChild<'a> {
    pub element: Selection<'a>,
    pub role: BlockRole,
}

/// Elements to remove for one table, with the classification behind it.
#[derive(Debug, Clone)]
pub struct RemovalPlan<'a> {
    /// `false` when no pricing section encloses the table.
    pub section_found: bool,
    /// Children of the table's block, in document order.
    pub block: Vec<ClassifiedChild<'a>>,
    targets: Vec<Selection<'a>>,
}

impl<'a> RemovalPlan<'a> {
    /// Elements the plan removes.
    #[must_use]
    pub fn targets(&self) -> &[Selection<'a>] {
        &self.targets
    }

    /// Role assigned to `element`, if it is part of the block.
    #[must_use]
    pub fn role_of(&self, element: &Selection) -> Option<BlockRole> {
        self.block
            .iter()
            .find(|c| dom::same_node(&c.element, element))
            .map(|c| c.role)
    }

    /// Removes the targets. Returns the number of elements removed.
    pub fn apply(self) -> usize {
        apply_plans(vec![self])
    }
}

/// Applies several plans, removing each distinct element once.
pub fn apply_plans(plans: Vec<RemovalPlan<'_>>) -> usize {
    let mut seen: HashSet<NodeId> = HashSet::new();
    let mut removed = 0;
    for target in plans.iter().flat_map(|p| p.targets.iter()) {
        if let Some(id) = dom::node_id(target) {
            if seen.insert(id) {
                target.remove();
                removed += 1;
            }
        }
    }
    removed
}

/// Plans the removal of `table`.
///
/// Without an enclosing pricing section, only the table itself is targeted.
#[must_use]
pub fn plan_table_removal<'a>(table: &Selection<'a>) -> RemovalPlan<'a> {
    let Some(section) = dom::closest(table, |a| dom::has_class(a, PRICING_SECTION_CLASS)) else {
        debug!("no pricing section around table, removing table only");
        return table_only(table);
    };

    let removal_anchor = sole_wrapper_or_table(table, &section);
    let Some(container) = dom::ancestors(&removal_anchor, Some(1)).into_iter().next() else {
        return table_only(table);
    };
    let children = dom::element_children(&container);
    let Some(anchor_index) = children.iter().position(|c| dom::same_node(c, &removal_anchor)) else {
        return table_only(table);
    };

    let start = children[..=anchor_index]
        .iter()
        .rposition(dom::is_heading)
        .unwrap_or(0);
    let end = children[anchor_index + 1..]
        .iter()
        .position(dom::is_heading)
        .map_or(children.len(), |offset| anchor_index + 1 + offset);

    let specific_notes = table_specific_notes(&removal_anchor);

    let block: Vec<ClassifiedChild<'a>> = children[start..end]
        .iter()
        .enumerate()
        .map(|(offset, child)| {
            let role = if start + offset == anchor_index {
                BlockRole::Table
            } else if specific_notes.iter().any(|n| dom::same_node(n, child)) {
                BlockRole::TableSpecificNote
            } else {
                classify_block_child(child)
            };
            ClassifiedChild {
                element: child.clone(),
                role,
            }
        })
        .collect();

    let mut targets = vec![removal_anchor];
    targets.extend(specific_notes);

    RemovalPlan {
        section_found: true,
        block,
        targets,
    }
}

/// The table, or the outermost wrapper below `section` whose only content is the table.
fn sole_wrapper_or_table<'a>(table: &Selection<'a>, section: &Selection<'a>) -> Selection<'a> {
    let table_text = dom::normalized_text(table);
    let mut anchor = table.clone();
    for parent in dom::ancestors(table, None) {
        if dom::same_node(&parent, section) {
            break;
        }
        let only_child = matches!(
            dom::element_children(&parent).as_slice(),
            [child] if dom::same_node(child, &anchor)
        );
        if !only_child || dom::normalized_text(&parent) != table_text {
            break;
        }
        anchor = parent;
    }
    anchor
}

/// Removes `table` with its specific notes. Returns the number of elements removed.
pub fn remove_table_structured(table: &Selection) -> usize {
    plan_table_removal(table).apply()
}

/// Role of a block child that is neither the table nor one of its notes.
#[must_use]
pub fn classify_block_child(child: &Selection) -> BlockRole {
    if dom::is_heading(child) {
        let text = dom::normalized_text(child);
        if GLOBAL_TITLE.is_match(&text) {
            return BlockRole::GlobalTitle;
        }
        if SECTION_TITLE.is_match(&text) {
            return BlockRole::SectionTitle;
        }
        return BlockRole::Other;
    }
    protected_note_role(child).unwrap_or(BlockRole::Other)
}

/// Role of a note that must never be removed.
#[must_use]
pub fn protected_note_role(note: &Selection) -> Option<BlockRole> {
    let text = dom::normalized_text(note);
    if GLOBAL_PRICING_NOTE.is_match(&text) {
        return Some(BlockRole::GlobalPricingNote);
    }
    let numbered_sup = dom::elements(&note.select("sup"))
        .iter()
        .any(|sup| dom::normalized_text(sup).chars().any(|c| c.is_ascii_digit()));
    if numbered_sup || FOOTNOTE_REFERENCE.is_match(&text) {
        return Some(BlockRole::TableFootnoteNote);
    }
    None
}

/// Short notes directly following `anchor`, up to the next heading or table.
///
/// Protected notes are skipped but do not end the run.
fn table_specific_notes<'a>(anchor: &Selection<'a>) -> Vec<Selection<'a>> {
    let mut notes = Vec::new();
    let mut current = dom::next_element_sibling(anchor);
    while let Some(sibling) = current {
        if dom::is_heading(&sibling) || contains_table(&sibling) {
            break;
        }
        if protected_note_role(&sibling).is_none() {
            if !is_short_note(&sibling) {
                break;
            }
            notes.push(sibling.clone());
        }
        current = dom::next_element_sibling(&sibling);
    }
    notes
}

fn contains_table(sel: &Selection) -> bool {
    dom::tag_name(sel).as_deref() == Some("table") || sel.select("table").exists()
}

fn is_short_note(sel: &Selection) -> bool {
    let is_note_tag = dom::tag_name(sel).is_some_and(|t| NOTE_TAGS.contains(&t.as_str()));
    if !is_note_tag || sel.select("h1, h2, h3, h4, h5, h6").exists() {
        return false;
    }
    let len = dom::normalized_text(sel).chars().count();
    len > 0 && len <= MAX_TABLE_NOTE_CHARS
}

fn table_only<'a>(table: &Selection<'a>) -> RemovalPlan<'a> {
    RemovalPlan {
        section_found: false,
        block: vec![ClassifiedChild {
            element: table.clone(),
            role: BlockRole::Table,
        }],
        targets: vec![table.clone()],
    }
}
