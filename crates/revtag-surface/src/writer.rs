#![forbid(unsafe_code)]

//! Surgical prefix rewriting.
//!
//! [`apply`] reconciles the first content block of a surface with a desired
//! prefix tuple. Four structural cases:
//!
//! - structured prefix present, new prefix wanted: overwrite the bold run
//!   in place and repair the `": "` separator
//! - structured prefix present, no prefix wanted: detach the bold run and
//!   strip the separator off the following text
//! - no structured prefix, new prefix wanted: delete any legacy plain-text
//!   prefix span by flat-text range, then insert fresh bold + separator
//!   nodes at the block start
//! - no structured prefix, no prefix wanted: delete a legacy span if one is
//!   there, otherwise leave the block alone
//!
//! The legacy span is deleted by character range against the flattened text
//! because its internal structure is unpredictable: it may span several
//! runs, so a targeted in-place edit is not generally safe.
//!
//! Caret handling is a side effect: the caret lands just after the `": "`
//! separator, but only when the caller asked for adjustment *and* the
//! surface holds focus at call time. Rewrites triggered by panel controls
//! pass `adjust_caret: false` and so never steal the user's cursor.

use revtag_model::{PrefixTuple, SerializedPrefix, parse_legacy};

use crate::node::{Block, Inline};
use crate::surface::{Caret, EditSurface};

/// Per-call options for [`apply`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ApplyOptions {
    /// Whether the caret may be repositioned after the rewrite. Live focus
    /// is re-checked independently; without focus this is a no-op.
    pub adjust_caret: bool,
}

/// Rewrite the surface's first content block to carry `tuple`.
///
/// Never fails: structural surprises degrade to the insert-fresh or
/// no-prefix paths.
pub fn apply<S: EditSurface + ?Sized>(surface: &mut S, tuple: &PrefixTuple, options: ApplyOptions) {
    let serialized = tuple.serialize();
    // Focus is inspected before mutation; UI-originated events can shift
    // apparent focus mid-rewrite.
    let adjust = options.adjust_caret && surface.has_focus();
    tracing::debug!(
        has_prefix = serialized.has_prefix,
        display = %serialized.display_text,
        adjust_caret = adjust,
        "applying prefix"
    );
    let caret = rewrite_block(surface.first_content_block_mut(), &serialized);
    if adjust {
        surface.set_caret(caret);
    }
}

/// Rewrite one block in place; returns where the caret should land.
fn rewrite_block(block: &mut Block, serialized: &SerializedPrefix) -> Caret {
    // A line-break-only first child would become a stray empty leading line
    // once a prefix sits in front of it.
    if matches!(block.children.first(), Some(Inline::LineBreak)) {
        block.children.remove(0);
    }

    if let Some(Inline::Bold(_)) = block.children.first() {
        if serialized.has_prefix {
            update_structured(block, serialized)
        } else {
            remove_structured(block)
        }
    } else {
        replace_unstructured(block, serialized)
    }
}

/// Structured prefix already present: overwrite the bold run and make sure
/// the `": "` separator follows it.
fn update_structured(block: &mut Block, serialized: &SerializedPrefix) -> Caret {
    if let Some(Inline::Bold(text)) = block.children.first_mut() {
        text.clear();
        text.push_str(&serialized.display_text);
    }
    match block.children.get_mut(1) {
        Some(Inline::Text(after)) => {
            if !starts_with_separator(after) {
                strip_leading_colon(after);
                after.insert_str(0, ": ");
            }
        }
        _ => block.children.insert(1, Inline::text(": ")),
    }
    caret_after_prefix(block)
}

/// Structured prefix present, none wanted: detach the bold run and strip
/// the separator off the following text run.
fn remove_structured(block: &mut Block) -> Caret {
    if let Some(Inline::Text(after)) = block.children.get_mut(1)
        && after.starts_with(':')
    {
        strip_leading_colon(after);
    }
    block.children.remove(0);
    Caret::BlockStart
}

/// No structured prefix: strip a legacy plain-text span, then insert fresh
/// prefix nodes when one is wanted.
fn replace_unstructured(block: &mut Block, serialized: &SerializedPrefix) -> Caret {
    let flat = block.flat_text();
    if let Some((legacy, span)) = parse_legacy(&flat) {
        tracing::debug!(label = %legacy.label, span_len = span, "stripping legacy prefix span");
        block.delete_flat_range(0..span);
    }

    if !serialized.has_prefix {
        return Caret::BlockStart;
    }

    block
        .children
        .insert(0, Inline::bold(serialized.display_text.as_str()));
    block.children.insert(1, Inline::text(": "));
    // The host editor's placeholder break would now render as an empty
    // trailing line.
    if matches!(block.children.get(2), Some(Inline::LineBreak)) {
        block.children.remove(2);
    }
    caret_after_prefix(block)
}

/// Caret lands just after the `": "` separator; when the expected separator
/// text is not there, just after the bold run itself.
fn caret_after_prefix(block: &Block) -> Caret {
    match block.children.get(1) {
        Some(Inline::Text(t)) if starts_with_separator(t) => Caret::InText {
            index: 1,
            offset: separator_len(t),
        },
        _ => Caret::AfterInline(0),
    }
}

/// `^:\s`: a colon followed by one whitespace char.
fn starts_with_separator(text: &str) -> bool {
    let mut chars = text.chars();
    chars.next() == Some(':') && chars.next().is_some_and(char::is_whitespace)
}

/// Byte length of the leading `":" + whitespace` separator.
fn separator_len(text: &str) -> usize {
    let ws = text.chars().nth(1).map_or(0, char::len_utf8);
    1 + ws
}

/// Strip `^:\s?`: the colon and at most one following whitespace char.
fn strip_leading_colon(text: &mut String) {
    if !text.starts_with(':') {
        return;
    }
    text.remove(0);
    if let Some(c) = text.chars().next()
        && c.is_whitespace()
    {
        text.remove(0);
    }
}
