#![forbid(unsafe_code)]

//! Panel controller and injection pipeline for review-comment tags.
//!
//! One [`PanelController`] exists per edit surface. It owns the control
//! state and baseline for that surface and turns UI events into prefix
//! rewrites through the `revtag-model` reconciliation policy and the
//! `revtag-surface` writer.
//!
//! The [`InjectionController`] watches for new edit surfaces through a host
//! change-notification feed, coalesces discovery work to one pass per frame,
//! and guarantees at most one panel per surface. Host specifics (selectors,
//! toolbar DOM, reply heuristics) stay behind the [`PlatformAdapter`] seam.

pub mod adapter;
pub mod controller;
pub mod inject;
pub mod settings;

pub use adapter::{PlatformAdapter, ToolbarStatus};
pub use controller::{PanelController, PanelEvent, PanelOutcome, PanelState};
pub use inject::{InjectionController, MutationBatch, NodeSummary};
pub use settings::{Settings, SettingsError};
