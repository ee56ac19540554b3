#![forbid(unsafe_code)]

//! Edit-surface model and the surgical prefix writer.
//!
//! The *surface* is the host editor's rich-text fragment: an ordered
//! sequence of blocks, each holding inline runs. The host owns it and may
//! mutate it at any time, so this crate treats it as an external store
//! reached through the narrow [`EditSurface`] capability trait and only ever
//! rewrites the leading nodes of the first content block.
//!
//! [`MemorySurface`] is the in-memory implementation used by every test and
//! by host bindings that mirror a live document. [`writer::apply`] is the
//! single mutation entry point.

pub mod node;
pub mod surface;
pub mod writer;

pub use node::{Block, BlockKind, Inline};
pub use surface::{Caret, EditSurface, MemorySurface, read_prefix};
pub use writer::{ApplyOptions, apply};
