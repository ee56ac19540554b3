#![forbid(unsafe_code)]

//! Block and inline node model.
//!
//! A deliberately small mirror of the host editor's document shape: blocks
//! hold an ordered list of inline runs, and the only runs the engine cares
//! about are plain text, bold text, and line breaks. Offsets into a block's
//! flattened text are byte offsets; line breaks contribute no text, matching
//! the host's flattened text-content view.

use std::ops::Range;

/// An inline run inside a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    /// Plain text run.
    Text(String),
    /// Bold/strong run. A leading bold run is the structured prefix carrier.
    Bold(String),
    /// Hard line break. Zero-width in the flattened text.
    LineBreak,
}

impl Inline {
    /// Convenience constructor for a text run.
    #[must_use]
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    /// Convenience constructor for a bold run.
    #[must_use]
    pub fn bold(s: impl Into<String>) -> Self {
        Self::Bold(s.into())
    }

    /// Byte length of this run's contribution to the flattened text.
    #[must_use]
    pub fn text_len(&self) -> usize {
        match self {
            Self::Text(s) | Self::Bold(s) => s.len(),
            Self::LineBreak => 0,
        }
    }

    /// Mutable access to this run's text, if it has any.
    pub fn text_mut(&mut self) -> Option<&mut String> {
        match self {
            Self::Text(s) | Self::Bold(s) => Some(s),
            Self::LineBreak => None,
        }
    }
}

/// The block-level element kinds the engine recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Paragraph,
    ListItem,
    Preformatted,
    Blockquote,
    Heading(u8),
    /// Wrapper element that is not a prefix carrier.
    Container,
}

impl BlockKind {
    /// Whether a block of this kind can carry the comment prefix.
    #[must_use]
    pub fn is_content_carrier(self) -> bool {
        !matches!(self, Self::Container)
    }
}

/// A block-level element: a kind plus ordered inline children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub kind: BlockKind,
    pub children: Vec<Inline>,
}

impl Block {
    /// Create a block of the given kind.
    #[must_use]
    pub fn new(kind: BlockKind, children: Vec<Inline>) -> Self {
        Self { kind, children }
    }

    /// Create a paragraph block.
    #[must_use]
    pub fn paragraph(children: Vec<Inline>) -> Self {
        Self::new(BlockKind::Paragraph, children)
    }

    /// An empty paragraph holding a single line break, the shape a host
    /// editor gives an empty composer.
    #[must_use]
    pub fn empty_paragraph() -> Self {
        Self::paragraph(vec![Inline::LineBreak])
    }

    /// The flattened text of all inline runs, in order.
    #[must_use]
    pub fn flat_text(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            match child {
                Inline::Text(s) | Inline::Bold(s) => out.push_str(s),
                Inline::LineBreak => {}
            }
        }
        out
    }

    /// Text of the leading bold run, if the first child is one.
    #[must_use]
    pub fn leading_bold(&self) -> Option<&str> {
        match self.children.first() {
            Some(Inline::Bold(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Delete a byte range of the flattened text, across however many
    /// inline runs it spans.
    ///
    /// Runs wholly inside the range are removed (zero-width runs included);
    /// partially covered runs have the covered bytes sliced out. `range`
    /// bounds must lie on char boundaries of the runs they fall in.
    pub fn delete_flat_range(&mut self, range: Range<usize>) {
        if range.start >= range.end {
            return;
        }
        let mut pos = 0usize;
        let mut i = 0usize;
        while i < self.children.len() {
            let width = self.children[i].text_len();
            let start = pos;
            let end = start + width;
            if start >= range.end {
                break;
            }
            if width == 0 {
                // Zero-width run strictly before the range end and not
                // before its start sits inside the deleted span.
                if start >= range.start {
                    self.children.remove(i);
                } else {
                    i += 1;
                }
                continue;
            }
            pos = end;
            if end <= range.start {
                i += 1;
                continue;
            }
            let cut_start = range.start.max(start) - start;
            let cut_end = range.end.min(end) - start;
            if cut_start == 0 && cut_end == width {
                self.children.remove(i);
                continue;
            }
            if let Some(text) = self.children[i].text_mut() {
                text.replace_range(cut_start..cut_end, "");
            }
            i += 1;
        }
    }
}
