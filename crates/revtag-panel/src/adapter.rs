#![forbid(unsafe_code)]

//! Host-platform adapter seam.
//!
//! Everything site-specific (selectors, toolbar DOM, reply-detection
//! heuristics) lives behind [`PlatformAdapter`]. The injection controller
//! consumes only this interface, so supporting another review platform
//! means writing another adapter, not touching the engine.

use std::hash::Hash;

use revtag_surface::EditSurface;

/// Result of a toolbar-toggle placement attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarStatus {
    /// The toggle affordance exists and is bound to the panel.
    Placed,
    /// The toolbar has not rendered yet; retry later.
    NotReady,
}

/// Capabilities one host site must provide.
pub trait PlatformAdapter {
    /// Stable identity of an editor-hosting container.
    type ContainerId: Clone + Eq + Hash + std::fmt::Debug;
    /// The edit surface behind a container.
    type Surface: EditSurface;

    /// All candidate editor containers currently in the document.
    fn containers(&self) -> Vec<Self::ContainerId>;

    /// The editable surface for a container, if one is usable.
    fn editor(&mut self, container: &Self::ContainerId) -> Option<&mut Self::Surface>;

    /// Whether the container's editor is a reply composer. Controls the
    /// panel's initial visibility.
    fn is_reply_editor(&self, container: &Self::ContainerId) -> bool;

    /// Whether the editor is embedded in an unrelated assistant-chat
    /// feature and must be skipped.
    fn is_in_assistant_chat(&self, _container: &Self::ContainerId) -> bool {
        false
    }

    /// Idempotently ensure a visibility-toggle affordance exists in the
    /// container's toolbar, bound to the panel.
    fn ensure_toolbar_toggle(
        &mut self,
        container: &Self::ContainerId,
        panel_visible: bool,
    ) -> ToolbarStatus;

    /// Reflect panel visibility on the toggle affordance.
    fn sync_toolbar_button(&mut self, _container: &Self::ContainerId, _visible: bool) {}
}
