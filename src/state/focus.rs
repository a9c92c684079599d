//! Focus System - Focus placement and trapping for dialogs.
//!
//! Stateless helpers over the document's focus:
//! - Enumerating focusable elements inside a container
//! - Initial focus placement when a dialog opens
//! - Tab / Shift+Tab wrap-around trapping
//! - Focus restoration to a (possibly stale) element
//!
//! # Example
//!
//! ```ignore
//! use spark_widgets::state::focus::{self, FocusScope};
//!
//! let scope = FocusScope::new(modal, content);
//! focus::focus_first(&mut doc, scope);
//!
//! // On Tab
//! if focus::trap_tab(&mut doc, &key, scope) {
//!     // wrapped: suppress default navigation
//! }
//! ```

use crate::engine::Document;
use crate::state::keyboard::{KeyCode, KeyboardEvent};
use crate::types::NodeId;

// =============================================================================
// FOCUS SCOPE
// =============================================================================

/// Where focus is searched (`region`) and what takes focus when the region
/// has nothing focusable (`container`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusScope {
    pub container: NodeId,
    pub region: NodeId,
}

impl FocusScope {
    pub fn new(container: NodeId, region: NodeId) -> Self {
        Self { container, region }
    }

    /// Region and container are the same element.
    pub fn whole(container: NodeId) -> Self {
        Self::new(container, container)
    }
}

// =============================================================================
// FOCUSABLE ELEMENTS
// =============================================================================

/// Check if a single element belongs in the focus cycle.
///
/// Native controls count whatever their `tabindex`; other elements need a
/// non-negative one.
fn is_tabbable(doc: &Document, node: NodeId) -> bool {
    if doc.is_disabled(node) && doc.tag(node) != Some("a") {
        return false;
    }
    let tab_ok = doc.is_natively_focusable(node) || doc.tab_index(node).is_some_and(|i| i >= 0);
    tab_ok && doc.is_rendered(node)
}

/// Rendered, enabled, tabbable descendants of `container` in document order.
/// The container itself is never included.
pub fn focusable_elements(doc: &Document, container: NodeId) -> Vec<NodeId> {
    doc.descendants(container)
        .into_iter()
        .filter(|&n| is_tabbable(doc, n))
        .collect()
}

// =============================================================================
// FOCUS OPERATIONS
// =============================================================================

/// Focus the first focusable element of the region, falling back to the
/// container itself. Returns whether focus moved.
pub fn focus_first(doc: &mut Document, scope: FocusScope) -> bool {
    match focusable_elements(doc, scope.region).first() {
        Some(&first) => doc.focus(first),
        None => doc.focus(scope.container),
    }
}

/// Wrap Tab navigation at the ends of the region.
///
/// - Tab on the last focusable → first
/// - Shift+Tab on the first focusable (or on the container) → last
///
/// Returns `true` when focus wrapped; the caller suppresses the default.
/// Any other key, or a region with nothing focusable, is left alone.
pub fn trap_tab(doc: &mut Document, key: &KeyboardEvent, scope: FocusScope) -> bool {
    if key.code != KeyCode::Tab {
        return false;
    }

    let focusables = focusable_elements(doc, scope.region);
    let (Some(&first), Some(&last)) = (focusables.first(), focusables.last()) else {
        return false;
    };
    let active = doc.active_element();

    if key.is_shift() {
        if active == Some(first) || active == Some(scope.container) {
            doc.focus(last);
            return true;
        }
    } else if active == Some(last) {
        doc.focus(first);
        return true;
    }

    false
}

/// Focus `target` if it still exists and can take focus.
pub fn restore_focus(doc: &mut Document, target: Option<NodeId>) -> bool {
    match target {
        Some(node) if doc.exists(node) => doc.focus(node),
        _ => false,
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::keyboard::Modifiers;

    struct Dialog {
        doc: Document,
        modal: NodeId,
        content: NodeId,
        first: NodeId,
        last: NodeId,
    }

    fn setup() -> Dialog {
        let mut doc = Document::new();
        let body = doc.body();
        let modal = doc.element(body, "div", &[("data-rs-modal", "m"), ("tabindex", "-1")]);
        doc.element(modal, "button", &[]);
        let content = doc.element(modal, "div", &[("data-rs-modal-content", "")]);
        let first = doc.element(content, "input", &[]);
        doc.element(content, "button", &[("disabled", "")]);
        doc.element(content, "span", &[]);
        let last = doc.element(content, "a", &[("href", "#")]);
        Dialog {
            doc,
            modal,
            content,
            first,
            last,
        }
    }

    fn tab() -> KeyboardEvent {
        KeyboardEvent::new(KeyCode::Tab)
    }

    fn shift_tab() -> KeyboardEvent {
        KeyboardEvent::with_modifiers(KeyCode::Tab, Modifiers::SHIFT)
    }

    #[test]
    fn test_focusable_elements_filters() {
        let mut d = setup();
        let hidden = d.doc.element(d.content, "button", &[("hidden", "")]);
        let tabbable = d.doc.element(d.content, "div", &[("tabindex", "0")]);
        let negative = d.doc.element(d.content, "div", &[("tabindex", "-1")]);
        let anchor = d.doc.element(d.content, "a", &[]);

        let found = focusable_elements(&d.doc, d.content);
        assert_eq!(found, vec![d.first, d.last, tabbable]);
        assert!(!found.contains(&hidden));
        assert!(!found.contains(&negative));
        assert!(!found.contains(&anchor));
    }

    #[test]
    fn test_native_control_with_negative_tabindex_is_kept() {
        let mut d = setup();
        let skipped = d.doc.element(d.content, "button", &[("tabindex", "-1")]);
        let disabled = d.doc.element(d.content, "input", &[("tabindex", "0"), ("disabled", "")]);

        let found = focusable_elements(&d.doc, d.content);
        assert_eq!(found, vec![d.first, d.last, skipped]);
        assert!(!found.contains(&disabled));
    }

    #[test]
    fn test_focusable_excludes_container() {
        let d = setup();
        assert!(!focusable_elements(&d.doc, d.modal).contains(&d.modal));
    }

    #[test]
    fn test_focus_first_uses_region() {
        let mut d = setup();
        assert!(focus_first(&mut d.doc, FocusScope::new(d.modal, d.content)));
        assert_eq!(d.doc.active_element(), Some(d.first));
    }

    #[test]
    fn test_focus_first_falls_back_to_container() {
        let mut doc = Document::new();
        let body = doc.body();
        let modal = doc.element(body, "div", &[("tabindex", "-1")]);
        doc.element(modal, "p", &[]);

        assert!(focus_first(&mut doc, FocusScope::whole(modal)));
        assert_eq!(doc.active_element(), Some(modal));
    }

    #[test]
    fn test_tab_wraps_forward_from_last() {
        let mut d = setup();
        let scope = FocusScope::new(d.modal, d.content);
        d.doc.focus(d.last);
        assert!(trap_tab(&mut d.doc, &tab(), scope));
        assert_eq!(d.doc.active_element(), Some(d.first));
    }

    #[test]
    fn test_shift_tab_wraps_backward() {
        let mut d = setup();
        let scope = FocusScope::new(d.modal, d.content);

        d.doc.focus(d.first);
        assert!(trap_tab(&mut d.doc, &shift_tab(), scope));
        assert_eq!(d.doc.active_element(), Some(d.last));

        // From the container itself
        d.doc.focus(d.modal);
        assert!(trap_tab(&mut d.doc, &shift_tab(), scope));
        assert_eq!(d.doc.active_element(), Some(d.last));
    }

    #[test]
    fn test_tab_in_middle_is_left_alone() {
        let mut d = setup();
        let scope = FocusScope::new(d.modal, d.content);
        d.doc.focus(d.first);
        assert!(!trap_tab(&mut d.doc, &tab(), scope));
        assert_eq!(d.doc.active_element(), Some(d.first));
    }

    #[test]
    fn test_trap_ignores_other_keys_and_empty_regions() {
        let mut d = setup();
        let scope = FocusScope::new(d.modal, d.content);
        d.doc.focus(d.last);
        assert!(!trap_tab(&mut d.doc, &KeyboardEvent::new(KeyCode::Enter), scope));

        let mut doc = Document::new();
        let body = doc.body();
        let empty = doc.element(body, "div", &[("tabindex", "-1")]);
        doc.focus(empty);
        assert!(!trap_tab(&mut doc, &tab(), FocusScope::whole(empty)));
        assert_eq!(doc.active_element(), Some(empty));
    }

    #[test]
    fn test_restore_focus_skips_stale() {
        let mut d = setup();
        assert!(restore_focus(&mut d.doc, Some(d.first)));
        assert_eq!(d.doc.active_element(), Some(d.first));

        d.doc.remove(d.last);
        assert!(!restore_focus(&mut d.doc, Some(d.last)));
        assert!(!restore_focus(&mut d.doc, None));
        assert_eq!(d.doc.active_element(), Some(d.first));
    }
}
