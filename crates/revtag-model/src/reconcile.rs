#![forbid(unsafe_code)]

//! Sticky-baseline reconciliation.
//!
//! The panel has two independent controls: a label selector and a row of
//! decoration checkboxes. A user editing only one of them must not clobber
//! the other half of an existing prefix, so each control carries a *touched*
//! flag and falls back to the baseline recovered at panel-open time until it
//! is explicitly touched.
//!
//! # Rules
//!
//! - label: the live selection once touched; otherwise the baseline label,
//!   falling back to the live selection when the baseline is empty
//! - decorations: the live checked set (in UI order) once touched;
//!   otherwise the baseline list

use crate::prefix::PrefixTuple;

/// Label and decorations recovered from an existing prefix when the panel
/// was bound to its surface. Empty when the surface had no prefix.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Baseline {
    pub label: String,
    pub decorations: Vec<String>,
}

impl Baseline {
    /// Capture a baseline from a parsed prefix.
    #[must_use]
    pub fn from_tuple(tuple: &PrefixTuple) -> Self {
        Self {
            label: tuple.label.clone(),
            decorations: tuple.decorations.clone(),
        }
    }

    /// Reset to the empty baseline (used by clear-and-close).
    pub fn clear(&mut self) {
        self.label.clear();
        self.decorations.clear();
    }
}

/// Live state of the two panel controls.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ControlState {
    /// Currently selected label; empty means no selection. The reserved
    /// clear token never appears here (routed upstream).
    pub selected_label: String,
    /// Checked decorations in UI (configured) order.
    pub checked_decorations: Vec<String>,
    /// Whether the label control was interacted with since binding.
    pub label_touched: bool,
    /// Whether any decoration checkbox was interacted with since binding.
    pub decorations_touched: bool,
}

/// Merge live control state with the baseline into the effective tuple.
#[must_use]
pub fn reconcile(controls: &ControlState, baseline: &Baseline) -> PrefixTuple {
    let effective_label = if controls.label_touched {
        controls.selected_label.as_str()
    } else if baseline.label.is_empty() {
        controls.selected_label.as_str()
    } else {
        baseline.label.as_str()
    };
    let effective_decorations = if controls.decorations_touched {
        controls.checked_decorations.clone()
    } else {
        baseline.decorations.clone()
    };
    PrefixTuple::new(effective_label, effective_decorations)
}
