//! Core types for spark-widgets.
//!
//! These types define the foundation that everything builds on.
//! They flow from the host into the runtime (DOM events) and back out
//! (event outcomes, close reasons).

use crate::state::KeyboardEvent;

// =============================================================================
// Node identity
// =============================================================================

/// Handle to an element in a [`Document`](crate::engine::Document).
///
/// Generational: once a node is removed its slot may be reused, but the old
/// handle never resolves again. This is what lets the modal coordinator hold
/// a non-owning reference to its trigger element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl NodeId {
    pub(crate) const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Arena slot of this node.
    pub fn index(self) -> usize {
        self.index as usize
    }
}

// =============================================================================
// Widget configuration values
// =============================================================================

/// Which part of an accordion item toggles it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TriggerMode {
    /// Activation anywhere in the item, minus panel and interactive content.
    #[default]
    Item,
    /// Activation inside the head only.
    Head,
}

impl TriggerMode {
    /// Parse the declared attribute value. Only `head` selects head mode.
    pub fn from_attr(value: &str) -> Self {
        if value == "head" { Self::Head } else { Self::Item }
    }
}

/// Why a modal closed. Carried on the `modal:close` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CloseReason {
    /// Programmatic close.
    #[default]
    Close,
    /// A close-trigger element was activated.
    Button,
    /// The backdrop outside the content region was activated.
    Overlay,
    /// Escape was pressed.
    Escape,
    /// Another modal opened.
    Switch,
}

impl CloseReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Close => "close",
            Self::Button => "button",
            Self::Overlay => "overlay",
            Self::Escape => "escape",
            Self::Switch => "switch",
        }
    }
}

impl std::fmt::Display for CloseReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// DOM events
// =============================================================================

/// A delegated document-level event fed in by the host.
#[derive(Debug, Clone, PartialEq)]
pub enum DomEvent {
    /// Pointer activation (click / tap) on `target`.
    Click { target: NodeId },
    /// Key press while `target` has focus (or the body when nothing does).
    KeyDown { target: NodeId, key: KeyboardEvent },
    /// `target` just received focus.
    FocusIn { target: NodeId },
    /// The viewport changed size.
    Resize { width: f32, height: f32 },
}

impl DomEvent {
    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Click { .. } => "click",
            Self::KeyDown { .. } => "keydown",
            Self::FocusIn { .. } => "focusin",
            Self::Resize { .. } => "resize",
        }
    }
}

/// What the host should do with the native event after dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventOutcome {
    /// Default browser behavior (navigation, scrolling, tabbing) must be
    /// suppressed.
    pub default_prevented: bool,
}

impl EventOutcome {
    pub const IGNORED: Self = Self { default_prevented: false };
    pub const PREVENTED: Self = Self { default_prevented: true };

    /// Accumulate another handler's outcome into this one.
    pub fn merge(&mut self, other: EventOutcome) {
        self.default_prevented |= other.default_prevented;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_mode_only_exact_head() {
        assert_eq!(TriggerMode::from_attr("head"), TriggerMode::Head);
        assert_eq!(TriggerMode::from_attr("HEAD"), TriggerMode::Item);
        assert_eq!(TriggerMode::from_attr("item"), TriggerMode::Item);
        assert_eq!(TriggerMode::from_attr(""), TriggerMode::Item);
    }

    #[test]
    fn test_outcome_merge_is_sticky() {
        let mut outcome = EventOutcome::IGNORED;
        outcome.merge(EventOutcome::PREVENTED);
        outcome.merge(EventOutcome::IGNORED);
        assert!(outcome.default_prevented);
    }

    #[test]
    fn test_close_reason_names() {
        assert_eq!(CloseReason::Switch.to_string(), "switch");
        assert_eq!(CloseReason::default().as_str(), "close");
    }
}
