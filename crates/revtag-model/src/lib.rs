#![forbid(unsafe_code)]

//! Pure prefix model for review-comment tags.
//!
//! A tagged comment starts with a *prefix*: a bold run holding a label and
//! an optional decoration list, followed by a literal `": "` separator:
//!
//! ```text
//! **issue [blocking, security]**: the rest of the comment
//! ```
//!
//! This crate owns everything about that prefix that does not touch a
//! document tree: the two recognition grammars (structured bold run and
//! legacy plain text), serialization back to display text, and the
//! reconciliation policy that merges live control state with the baseline
//! recovered from an existing prefix.
//!
//! Everything here is total and side-effect-free; the imperative surface
//! mutation lives in `revtag-surface`.

pub mod prefix;
pub mod reconcile;

pub use prefix::{
    CLEAR_TOKEN, PrefixTuple, SerializedPrefix, parse_legacy, parse_prefix, parse_structured_run,
    serialize,
};
pub use reconcile::{Baseline, ControlState, reconcile};
