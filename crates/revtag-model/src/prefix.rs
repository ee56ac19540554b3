#![forbid(unsafe_code)]

//! Prefix grammars and serialization.
//!
//! Two grammars are recognized when reading an existing comment:
//!
//! - **Structured**: the first child of the first content block is a bold
//!   run whose exact text matches `LABEL ( "[" DEC_LIST "]" )?`. This is the
//!   form this system writes.
//! - **Legacy**: no matching bold run, but the block's flattened text starts
//!   with `LABEL [decs]:` or `LABEL (decs):` (decoration list optional).
//!   Produced by older versions that wrote plain text; recognized on read
//!   and normalized to the structured form on the next edit.
//!
//! `LABEL = [A-Za-z][\w-]*`. Malformed text is never an error: anything that
//! matches neither grammar parses as "no prefix".

use std::sync::LazyLock;

use regex::Regex;

/// Reserved label value meaning "remove the prefix and close the panel".
///
/// Routed by the panel controller to the clear-and-close transition; it must
/// never reach [`serialize`] as an ordinary label.
pub const CLEAR_TOKEN: &str = "X";

/// Exact-match grammar for the text of a structured bold run.
static STRUCTURED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z][\w-]*)(?:\s*\[([^\]]*)\])?$").expect("structured prefix grammar")
});

/// Anchored grammar for a legacy plain-text prefix, separator included.
static LEGACY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z][\w-]*)\s*(?:\[(.*?)\]|\((.*?)\))?:\s*").expect("legacy prefix grammar")
});

/// A parsed prefix: label plus decorations in insertion order.
///
/// Invariant: `has_prefix == !label.is_empty()`. Decorations without a label
/// are never meaningful and never serialized.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PrefixTuple {
    /// The category tag, e.g. `"issue"`. Empty means no prefix.
    pub label: String,
    /// Optional qualifiers, e.g. `["blocking"]`, in insertion order.
    pub decorations: Vec<String>,
    /// Whether a prefix is present at all.
    pub has_prefix: bool,
}

impl PrefixTuple {
    /// Build a tuple, deriving `has_prefix` from the label.
    #[must_use]
    pub fn new(label: impl Into<String>, decorations: Vec<String>) -> Self {
        let label = label.into();
        let has_prefix = !label.is_empty();
        Self {
            label,
            decorations,
            has_prefix,
        }
    }

    /// The "no prefix" tuple.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Serialize this tuple's label and decorations.
    #[must_use]
    pub fn serialize(&self) -> SerializedPrefix {
        if self.has_prefix {
            serialize(&self.label, &self.decorations)
        } else {
            SerializedPrefix::default()
        }
    }
}

/// Serialized form of a prefix, ready for the writer.
///
/// `display_text` is the text of the bold run only; the `": "` separator is
/// structural and inserted by the writer as a sibling text node.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SerializedPrefix {
    /// Bold-run text, e.g. `"issue [blocking]"`. Empty when `has_prefix` is false.
    pub display_text: String,
    /// Whether anything should be written at all.
    pub has_prefix: bool,
}

/// Serialize a label and decoration list into bold-run display text.
///
/// An empty label yields an empty, prefix-less result regardless of the
/// decoration list.
#[must_use]
pub fn serialize<S: AsRef<str>>(label: &str, decorations: &[S]) -> SerializedPrefix {
    if label.is_empty() {
        return SerializedPrefix::default();
    }
    let display_text = if decorations.is_empty() {
        label.to_owned()
    } else {
        let joined = decorations
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(", ");
        format!("{label} [{joined}]")
    };
    SerializedPrefix {
        display_text,
        has_prefix: true,
    }
}

/// Parse the exact text of a bold run against the structured grammar.
#[must_use]
pub fn parse_structured_run(bold_text: &str) -> Option<PrefixTuple> {
    let caps = STRUCTURED_RE.captures(bold_text)?;
    let label = caps.get(1).map_or("", |m| m.as_str());
    let decorations = split_decorations(caps.get(2).map_or("", |m| m.as_str()));
    Some(PrefixTuple::new(label, decorations))
}

/// Parse a legacy plain-text prefix at the start of `text`.
///
/// On match, returns the tuple plus the byte length of the matched span
/// (label, optional decoration list, colon, trailing whitespace) so the
/// writer can delete exactly that range. Bracketed decorations take
/// precedence over parenthesized ones.
#[must_use]
pub fn parse_legacy(text: &str) -> Option<(PrefixTuple, usize)> {
    let caps = LEGACY_RE.captures(text)?;
    let matched_len = caps.get(0).map_or(0, |m| m.end());
    let label = caps.get(1).map_or("", |m| m.as_str());
    let raw_decs = caps
        .get(2)
        .or_else(|| caps.get(3))
        .map_or("", |m| m.as_str());
    Some((PrefixTuple::new(label, split_decorations(raw_decs)), matched_len))
}

/// Parse the first content block of a surface.
///
/// `leading_bold` is the text of the block's first child when that child is
/// a bold run; `flat_text` is the block's flattened text content. The
/// structured case takes precedence and never inspects the trailing text.
/// Total: malformed input parses as "no prefix".
#[must_use]
pub fn parse_prefix(leading_bold: Option<&str>, flat_text: &str) -> PrefixTuple {
    if let Some(bold) = leading_bold
        && let Some(tuple) = parse_structured_run(bold)
    {
        tracing::trace!(label = %tuple.label, "parsed structured prefix");
        return tuple;
    }
    if let Some((tuple, _)) = parse_legacy(flat_text) {
        tracing::trace!(label = %tuple.label, "parsed legacy prefix");
        return tuple;
    }
    PrefixTuple::none()
}

/// Split a raw decoration list on commas, trimming and dropping empties.
fn split_decorations(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decs(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn structured_label_only() {
        let t = parse_structured_run("issue").unwrap();
        assert_eq!(t.label, "issue");
        assert!(t.decorations.is_empty());
        assert!(t.has_prefix);
    }

    #[test]
    fn structured_with_decorations() {
        let t = parse_structured_run("issue [blocking, security]").unwrap();
        assert_eq!(t.label, "issue");
        assert_eq!(t.decorations, decs(&["blocking", "security"]));
    }

    #[test]
    fn structured_rejects_trailing_text() {
        assert!(parse_structured_run("issue [blocking]: rest").is_none());
        assert!(parse_structured_run("").is_none());
        assert!(parse_structured_run("1issue").is_none());
    }

    #[test]
    fn structured_allows_hyphen_and_underscore() {
        let t = parse_structured_run("non-blocking_note").unwrap();
        assert_eq!(t.label, "non-blocking_note");
    }

    #[test]
    fn legacy_bracket_form() {
        let (t, len) = parse_legacy("issue [blocking]: fix this").unwrap();
        assert_eq!(t.label, "issue");
        assert_eq!(t.decorations, decs(&["blocking"]));
        assert_eq!(&"issue [blocking]: fix this"[len..], "fix this");
    }

    #[test]
    fn legacy_paren_form() {
        let (t, _) = parse_legacy("nitpick (if-minor): rename").unwrap();
        assert_eq!(t.label, "nitpick");
        assert_eq!(t.decorations, decs(&["if-minor"]));
    }

    #[test]
    fn legacy_bare_label() {
        let (t, len) = parse_legacy("question: why?").unwrap();
        assert_eq!(t.label, "question");
        assert!(t.decorations.is_empty());
        assert_eq!(len, "question: ".len());
    }

    #[test]
    fn legacy_requires_colon() {
        assert!(parse_legacy("just a comment").is_none());
        assert!(parse_legacy("issue [blocking] no colon").is_none());
    }

    #[test]
    fn legacy_span_excludes_body() {
        let (_, len) = parse_legacy("todo:no space").unwrap();
        assert_eq!(len, "todo:".len());
    }

    #[test]
    fn parse_prefix_prefers_structured() {
        // Bold run wins even when the flattened text would also match legacy.
        let t = parse_prefix(Some("praise"), "praise: nice catch");
        assert_eq!(t.label, "praise");
        assert!(t.has_prefix);
    }

    #[test]
    fn parse_prefix_falls_through_malformed_bold() {
        // Bold run that fails the grammar falls back to the flattened text.
        let t = parse_prefix(Some("not a label!"), "issue: broken");
        assert_eq!(t.label, "issue");
    }

    #[test]
    fn parse_prefix_none_case() {
        let t = parse_prefix(None, "plain comment body");
        assert_eq!(t, PrefixTuple::none());
        assert!(!t.has_prefix);
    }

    #[test]
    fn serialize_empty_label() {
        let s = serialize::<&str>("", &[]);
        assert!(!s.has_prefix);
        assert!(s.display_text.is_empty());
    }

    #[test]
    fn serialize_label_and_decorations() {
        let s = serialize("issue", &["blocking", "security"]);
        assert_eq!(s.display_text, "issue [blocking, security]");
        assert!(s.has_prefix);
    }

    #[test]
    fn decoration_list_trims_and_drops_empties() {
        let (t, _) = parse_legacy("issue [ blocking , , security ]: x").unwrap();
        assert_eq!(t.decorations, decs(&["blocking", "security"]));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn label_strategy() -> impl Strategy<Value = String> {
            "[A-Za-z][A-Za-z0-9_-]{0,11}"
        }

        fn decorations_strategy() -> impl Strategy<Value = Vec<String>> {
            proptest::collection::vec("[a-z][a-z-]{0,9}", 0..4)
        }

        proptest! {
            #[test]
            fn serialize_parse_round_trip(label in label_strategy(), decorations in decorations_strategy()) {
                prop_assume!(label != CLEAR_TOKEN);
                let s = serialize(&label, &decorations);
                let t = parse_structured_run(&s.display_text).unwrap();
                prop_assert_eq!(t.label, label);
                prop_assert_eq!(t.decorations, decorations);
            }

            #[test]
            fn legacy_span_is_a_valid_boundary(label in label_strategy(), body in ".{0,30}") {
                let text = format!("{label}: {body}");
                if let Some((t, len)) = parse_legacy(&text) {
                    prop_assert!(text.is_char_boundary(len));
                    prop_assert_eq!(t.label, label);
                }
            }

            #[test]
            fn parse_prefix_is_total(bold in proptest::option::of(".{0,20}"), text in ".{0,40}") {
                // Never panics, and has_prefix always mirrors the label.
                let t = parse_prefix(bold.as_deref(), &text);
                prop_assert_eq!(t.has_prefix, !t.label.is_empty());
            }
        }
    }
}
