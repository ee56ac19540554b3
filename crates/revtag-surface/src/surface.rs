#![forbid(unsafe_code)]

//! The edit-surface capability trait and its in-memory implementation.
//!
//! The host editor owns the real document; the engine reaches it through
//! [`EditSurface`], which exposes exactly what the prefix logic needs: the
//! first content-bearing block, live focus state, and caret placement.
//! Focus is inspected at call time, never cached, so a rewrite triggered by
//! a panel control can tell that the user's cursor is elsewhere.

use revtag_model::{PrefixTuple, parse_prefix};

use crate::node::Block;

/// A caret position within the first content block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Caret {
    /// At the very start of the block.
    BlockStart,
    /// Immediately after the inline run at this index.
    AfterInline(usize),
    /// Inside the text run at `index`, at byte offset `offset`.
    InText { index: usize, offset: usize },
}

/// Narrow capability interface over the host editor's document.
///
/// Implementations must re-query live state on every call: the host may
/// mutate the document between calls, and cached node handles go stale.
pub trait EditSurface {
    /// The first content-bearing block, if the surface has one.
    ///
    /// Selection rule: the first block in document order whose kind is a
    /// content carrier, falling back to the first block of any kind.
    fn first_content_block(&self) -> Option<&Block>;

    /// Mutable access to the first content block, materializing an empty
    /// paragraph when the surface has none.
    fn first_content_block_mut(&mut self) -> &mut Block;

    /// Whether focus or a selection currently sits inside this surface.
    fn has_focus(&self) -> bool;

    /// Move the caret within the first content block. Only meaningful when
    /// the surface holds focus.
    fn set_caret(&mut self, caret: Caret);
}

/// Parse the existing prefix off a surface's first content block.
///
/// Total: a missing block or malformed text parses as "no prefix".
#[must_use]
pub fn read_prefix<S: EditSurface + ?Sized>(surface: &S) -> PrefixTuple {
    match surface.first_content_block() {
        Some(block) => parse_prefix(block.leading_bold(), &block.flat_text()),
        None => PrefixTuple::none(),
    }
}

/// Owned in-memory surface.
///
/// The reference implementation of [`EditSurface`]: used directly by tests
/// and mirrored by host bindings onto the live document.
#[derive(Debug, Clone, Default)]
pub struct MemorySurface {
    pub blocks: Vec<Block>,
    focused: bool,
    caret: Option<Caret>,
}

impl MemorySurface {
    /// An empty, unfocused surface.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A surface with the given blocks.
    #[must_use]
    pub fn with_blocks(blocks: Vec<Block>) -> Self {
        Self {
            blocks,
            focused: false,
            caret: None,
        }
    }

    /// Set whether the surface currently holds focus.
    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
        if !focused {
            self.caret = None;
        }
    }

    /// The last caret position written by the engine, if any.
    #[must_use]
    pub fn caret(&self) -> Option<Caret> {
        self.caret
    }
}

impl EditSurface for MemorySurface {
    fn first_content_block(&self) -> Option<&Block> {
        self.blocks
            .iter()
            .find(|b| b.kind.is_content_carrier())
            .or_else(|| self.blocks.first())
    }

    fn first_content_block_mut(&mut self) -> &mut Block {
        let index = self
            .blocks
            .iter()
            .position(|b| b.kind.is_content_carrier())
            .or(if self.blocks.is_empty() { None } else { Some(0) });
        match index {
            Some(i) => &mut self.blocks[i],
            None => {
                self.blocks.push(Block::empty_paragraph());
                let last = self.blocks.len() - 1;
                &mut self.blocks[last]
            }
        }
    }

    fn has_focus(&self) -> bool {
        self.focused
    }

    fn set_caret(&mut self, caret: Caret) {
        self.caret = Some(caret);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{BlockKind, Inline};

    #[test]
    fn read_prefix_structured() {
        let surface = MemorySurface::with_blocks(vec![Block::paragraph(vec![
            Inline::bold("issue [blocking]"),
            Inline::text(": fix this"),
        ])]);
        let t = read_prefix(&surface);
        assert_eq!(t.label, "issue");
        assert_eq!(t.decorations, vec!["blocking".to_owned()]);
        assert!(t.has_prefix);
    }

    #[test]
    fn read_prefix_legacy() {
        let surface = MemorySurface::with_blocks(vec![Block::paragraph(vec![Inline::text(
            "issue [blocking]: fix this",
        )])]);
        let t = read_prefix(&surface);
        assert_eq!(t.label, "issue");
        assert!(t.has_prefix);
    }

    #[test]
    fn read_prefix_empty_surface() {
        let surface = MemorySurface::new();
        assert!(!read_prefix(&surface).has_prefix);
    }

    #[test]
    fn container_blocks_are_skipped() {
        let surface = MemorySurface::with_blocks(vec![
            Block::new(BlockKind::Container, vec![Inline::text("chrome")]),
            Block::paragraph(vec![Inline::text("note: hi")]),
        ]);
        let t = read_prefix(&surface);
        assert_eq!(t.label, "note");
    }

    #[test]
    fn falls_back_to_first_block_when_no_carrier() {
        let surface = MemorySurface::with_blocks(vec![Block::new(
            BlockKind::Container,
            vec![Inline::text("typo: s/teh/the")],
        )]);
        let t = read_prefix(&surface);
        assert_eq!(t.label, "typo");
    }

    #[test]
    fn mutable_access_materializes_a_paragraph() {
        let mut surface = MemorySurface::new();
        let block = surface.first_content_block_mut();
        assert_eq!(block.kind, BlockKind::Paragraph);
        assert_eq!(surface.blocks.len(), 1);
    }

    #[test]
    fn losing_focus_drops_caret() {
        let mut surface = MemorySurface::new();
        surface.set_focused(true);
        surface.set_caret(Caret::BlockStart);
        surface.set_focused(false);
        assert_eq!(surface.caret(), None);
    }
}
