#![forbid(unsafe_code)]

//! Surface discovery and panel injection.
//!
//! The host glue feeds document-mutation batches into
//! [`InjectionController::notify_mutations`]; relevant batches schedule one
//! discovery pass on the next frame. Rapid mutation bursts coalesce into a
//! single pass, and an explicit single-flight guard keeps passes from
//! nesting. Discovery is idempotent: re-running it over an already-bound
//! container only re-asserts toolbar placement.

use ahash::{AHashMap, AHashSet};

use crate::adapter::{PlatformAdapter, ToolbarStatus};
use crate::controller::{PanelController, PanelEvent};
use crate::settings::Settings;

/// Summary of one node added by a document mutation, precomputed by the
/// host glue (which owns the selectors).
#[derive(Debug, Clone, Copy, Default)]
pub struct NodeSummary {
    /// Whether the added node is an element (text nodes are never relevant).
    pub is_element: bool,
    /// The node matches, or contains, an editor container.
    pub matches_editor_container: bool,
    /// The node matches, or contains, a toolbar.
    pub matches_toolbar: bool,
}

/// One batch of document-mutation records.
#[derive(Debug, Clone, Default)]
pub struct MutationBatch {
    pub added: Vec<NodeSummary>,
}

impl MutationBatch {
    /// Whether this batch can possibly have introduced a new surface.
    ///
    /// Filters out the host editor's own keystroke mutations, which
    /// otherwise arrive at typing frequency.
    #[must_use]
    pub fn is_relevant(&self) -> bool {
        self.added
            .iter()
            .any(|n| n.is_element && (n.matches_editor_container || n.matches_toolbar))
    }
}

/// Discovers edit surfaces and maintains at most one panel per surface.
#[derive(Debug)]
pub struct InjectionController<A: PlatformAdapter> {
    adapter: A,
    settings: Settings,
    panels: AHashMap<A::ContainerId, PanelController>,
    /// A discovery pass is queued for the next frame.
    pass_scheduled: bool,
    /// Single-flight guard: a pass is currently executing.
    pass_running: bool,
    /// Containers whose toolbar was not ready; each gets one bounded retry.
    toolbar_retry: AHashSet<A::ContainerId>,
}

impl<A: PlatformAdapter> InjectionController<A> {
    /// Create a controller over a platform adapter with loaded settings.
    #[must_use]
    pub fn new(adapter: A, settings: Settings) -> Self {
        for problem in settings.validate() {
            tracing::warn!(%problem, "settings problem");
        }
        Self {
            adapter,
            settings,
            panels: AHashMap::new(),
            pass_scheduled: false,
            pass_running: false,
            toolbar_retry: AHashSet::new(),
        }
    }

    /// Feed one mutation batch.
    ///
    /// Returns `true` when the host should request a frame callback for
    /// [`on_frame`](Self::on_frame); repeated relevant batches before that
    /// frame coalesce into the already-scheduled pass.
    pub fn notify_mutations(&mut self, batch: &MutationBatch) -> bool {
        if !batch.is_relevant() || self.pass_scheduled {
            return false;
        }
        self.pass_scheduled = true;
        true
    }

    /// Frame callback: run the coalesced discovery pass, if one is due.
    pub fn on_frame(&mut self) {
        if !self.pass_scheduled {
            return;
        }
        self.pass_scheduled = false;
        self.inject_if_needed();
    }

    /// One discovery pass over every candidate container.
    ///
    /// Idempotent: already-bound containers only get their toolbar toggle
    /// re-asserted. Containers that disappeared are pruned.
    pub fn inject_if_needed(&mut self) {
        if self.pass_running {
            return;
        }
        self.pass_running = true;

        let containers = self.adapter.containers();
        self.panels.retain(|id, _| containers.contains(id));
        self.toolbar_retry.retain(|id| containers.contains(id));

        for id in containers {
            if self.adapter.is_in_assistant_chat(&id) {
                tracing::trace!(container = ?id, "skipping assistant-chat surface");
                continue;
            }

            if !self.panels.contains_key(&id) {
                let reply = self.adapter.is_reply_editor(&id);
                let Some(surface) = self.adapter.editor(&id) else {
                    tracing::debug!(container = ?id, "no usable editor, skipping");
                    continue;
                };
                let start_visible = if reply {
                    self.settings.replies_start_visible
                } else {
                    true
                };
                tracing::debug!(container = ?id, reply, start_visible, "binding panel");
                let panel = PanelController::bind(surface, &self.settings, start_visible);
                self.panels.insert(id.clone(), panel);
            }

            let visible = self.panels.get(&id).is_some_and(PanelController::is_visible);
            match self.adapter.ensure_toolbar_toggle(&id, visible) {
                ToolbarStatus::Placed => {
                    self.toolbar_retry.remove(&id);
                }
                ToolbarStatus::NotReady => {
                    // One rescheduled pass per container, not a loop.
                    if self.toolbar_retry.insert(id.clone()) {
                        self.pass_scheduled = true;
                    }
                }
            }
        }

        self.pass_running = false;
    }

    /// Route a UI event to the panel bound to `container`.
    ///
    /// Visibility changes are reflected onto the toolbar toggle.
    pub fn handle_panel_event(&mut self, container: &A::ContainerId, event: PanelEvent) {
        let Some(panel) = self.panels.get_mut(container) else {
            return;
        };
        let Some(surface) = self.adapter.editor(container) else {
            return;
        };
        let outcome = panel.handle(event, surface);
        if let Some(visible) = outcome.visibility_changed {
            self.adapter.sync_toolbar_button(container, visible);
        }
    }

    /// The panel bound to a container, if any.
    #[must_use]
    pub fn panel(&self, container: &A::ContainerId) -> Option<&PanelController> {
        self.panels.get(container)
    }

    /// Number of live panels.
    #[must_use]
    pub fn panel_count(&self) -> usize {
        self.panels.len()
    }

    /// Whether a discovery pass is queued for the next frame.
    #[must_use]
    pub fn pass_scheduled(&self) -> bool {
        self.pass_scheduled
    }

    /// The loaded settings.
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The platform adapter (host glue needs it for rendering concerns).
    pub fn adapter_mut(&mut self) -> &mut A {
        &mut self.adapter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(matches_editor: bool, matches_toolbar: bool) -> NodeSummary {
        NodeSummary {
            is_element: true,
            matches_editor_container: matches_editor,
            matches_toolbar,
        }
    }

    #[test]
    fn empty_batch_is_irrelevant() {
        assert!(!MutationBatch::default().is_relevant());
    }

    #[test]
    fn text_nodes_are_irrelevant() {
        let batch = MutationBatch {
            added: vec![NodeSummary {
                is_element: false,
                matches_editor_container: true,
                matches_toolbar: false,
            }],
        };
        assert!(!batch.is_relevant());
    }

    #[test]
    fn editor_or_toolbar_matches_are_relevant() {
        let editor = MutationBatch {
            added: vec![element(true, false)],
        };
        let toolbar = MutationBatch {
            added: vec![element(false, true)],
        };
        let unrelated = MutationBatch {
            added: vec![element(false, false)],
        };
        assert!(editor.is_relevant());
        assert!(toolbar.is_relevant());
        assert!(!unrelated.is_relevant());
    }
}
