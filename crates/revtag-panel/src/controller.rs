#![forbid(unsafe_code)]

//! Per-surface panel state machine.
//!
//! States: `Empty` (no label chosen, decorations hidden) ⇄ `Collapsed`
//! (label chosen, compact chip row) ⇄ `Expanded` (full label control shown
//! for re-selection) → `Closed` (prefix cleared, panel hidden).
//!
//! The controller owns the control state and baseline for one surface and
//! drives every prefix rewrite through reconcile → apply. Rewrites
//! triggered here pass `adjust_caret: false`; the writer re-checks live
//! focus on top of that, since UI-originated events can transiently shift
//! apparent focus.

use revtag_model::{Baseline, CLEAR_TOKEN, ControlState, PrefixTuple, reconcile};
use revtag_surface::{ApplyOptions, EditSurface, apply, read_prefix};

use crate::settings::Settings;

/// Interaction state of a panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelState {
    /// No label chosen; decoration chips hidden.
    Empty,
    /// Label chosen; compact form with chips visible.
    Collapsed,
    /// Label control shown in full for re-selection.
    Expanded,
    /// Prefix cleared and panel hidden.
    Closed,
}

/// A user interaction forwarded by the host UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelEvent {
    /// A label was selected. May carry the reserved clear token.
    LabelSelected(String),
    /// The currently-active label was clicked.
    ActiveLabelClicked,
    /// A decoration chip was toggled.
    DecorationToggled { name: String, checked: bool },
    /// The explicit clear affordance ("X") was clicked.
    ClearClicked,
    /// Panel visibility was toggled externally (toolbar button).
    VisibilityToggled(bool),
}

/// What the host glue must reflect after an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PanelOutcome {
    /// `Some(visible)` when the panel changed its own visibility and the
    /// toolbar-sync collaborator should be notified.
    pub visibility_changed: Option<bool>,
}

/// One panel bound to one edit surface.
#[derive(Debug, Clone)]
pub struct PanelController {
    state: PanelState,
    visible: bool,
    baseline: Baseline,
    controls: ControlState,
    /// Configured decoration order; the checked list is kept in this order.
    decoration_order: Vec<String>,
}

impl PanelController {
    /// Bind a new panel to a surface, capturing the baseline from any
    /// existing prefix.
    #[must_use]
    pub fn bind<S: EditSurface + ?Sized>(
        surface: &S,
        settings: &Settings,
        start_visible: bool,
    ) -> Self {
        let existing = read_prefix(surface);
        let decoration_order = settings.decorations.clone();
        if existing.has_prefix {
            tracing::debug!(label = %existing.label, "binding panel to prefixed surface");
            let baseline = Baseline::from_tuple(&existing);
            let controls = ControlState {
                selected_label: baseline.label.clone(),
                checked_decorations: in_ui_order(&decoration_order, &baseline.decorations),
                ..Default::default()
            };
            Self {
                state: PanelState::Collapsed,
                visible: start_visible,
                baseline,
                controls,
                decoration_order,
            }
        } else {
            Self {
                state: PanelState::Empty,
                visible: start_visible,
                baseline: Baseline::default(),
                controls: ControlState::default(),
                decoration_order,
            }
        }
    }

    /// Current interaction state.
    #[must_use]
    pub fn state(&self) -> PanelState {
        self.state
    }

    /// Whether the panel is currently shown.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// The baseline captured at bind time (reset by clear-and-close).
    #[must_use]
    pub fn baseline(&self) -> &Baseline {
        &self.baseline
    }

    /// Live control state.
    #[must_use]
    pub fn controls(&self) -> &ControlState {
        &self.controls
    }

    /// Process one UI event against the bound surface.
    pub fn handle<S: EditSurface + ?Sized>(
        &mut self,
        event: PanelEvent,
        surface: &mut S,
    ) -> PanelOutcome {
        match event {
            PanelEvent::LabelSelected(label) => {
                if label == CLEAR_TOKEN {
                    return self.clear_and_close(surface);
                }
                self.controls.selected_label = label;
                self.controls.label_touched = true;
                self.state = PanelState::Collapsed;
                self.apply_reconciled(surface);
                PanelOutcome::default()
            }
            PanelEvent::ActiveLabelClicked => {
                match self.state {
                    // Re-open the choice without touching the surface.
                    PanelState::Collapsed => self.state = PanelState::Expanded,
                    PanelState::Expanded => {
                        self.controls.label_touched = true;
                        self.state = PanelState::Collapsed;
                        self.apply_reconciled(surface);
                    }
                    PanelState::Empty | PanelState::Closed => {}
                }
                PanelOutcome::default()
            }
            PanelEvent::DecorationToggled { name, checked } => {
                if !self.decoration_order.contains(&name) {
                    tracing::debug!(%name, "toggle for unconfigured decoration ignored");
                    return PanelOutcome::default();
                }
                self.toggle_decoration(&name, checked);
                self.controls.decorations_touched = true;
                self.apply_reconciled(surface);
                PanelOutcome::default()
            }
            PanelEvent::ClearClicked => self.clear_and_close(surface),
            PanelEvent::VisibilityToggled(visible) => {
                // Purely presentational: baseline and touched flags stay.
                self.visible = visible;
                if visible && self.state == PanelState::Closed {
                    self.state = PanelState::Empty;
                }
                PanelOutcome::default()
            }
        }
    }

    /// Clear-and-close: reset everything, strip the prefix, hide the panel.
    fn clear_and_close<S: EditSurface + ?Sized>(&mut self, surface: &mut S) -> PanelOutcome {
        tracing::debug!("clear-and-close");
        self.controls.selected_label.clear();
        self.controls.checked_decorations.clear();
        self.controls.label_touched = true;
        self.controls.decorations_touched = true;
        self.baseline.clear();
        apply(
            surface,
            &PrefixTuple::none(),
            ApplyOptions { adjust_caret: false },
        );
        self.visible = false;
        self.state = PanelState::Closed;
        PanelOutcome {
            visibility_changed: Some(false),
        }
    }

    fn apply_reconciled<S: EditSurface + ?Sized>(&self, surface: &mut S) {
        let tuple = reconcile(&self.controls, &self.baseline);
        apply(surface, &tuple, ApplyOptions { adjust_caret: false });
    }

    fn toggle_decoration(&mut self, name: &str, checked: bool) {
        self.controls.checked_decorations.retain(|d| d != name);
        if checked {
            self.controls.checked_decorations.push(name.to_owned());
            let order = &self.decoration_order;
            self.controls
                .checked_decorations
                .sort_by_key(|d| order.iter().position(|o| o == d));
        }
    }
}

/// Filter `decorations` down to the configured set, in configured order.
fn in_ui_order(order: &[String], decorations: &[String]) -> Vec<String> {
    order
        .iter()
        .filter(|o| decorations.contains(o))
        .cloned()
        .collect()
}
