//! Attribute Reader - Declarative configuration from markup.
//!
//! Every knob a widget exposes is an attribute on the instance element or on
//! one of its ancestors. Resolution is always:
//!
//! 1. the element's own attribute, if declared and non-empty
//! 2. the nearest ancestor declaring it, if non-empty
//! 3. the hard-coded default
//!
//! Nothing here mutates the document or fails: malformed values fall back to
//! the default.
//!
//! # Example
//!
//! ```ignore
//! use spark_widgets::attributes;
//!
//! // <section data-rs-accordion-offset="24"> <div data-rs-accordion-item> ...
//! let offset = attributes::accordion_offset(&doc, item, &names); // 24
//! ```

use crate::config::AttributeNames;
use crate::engine::Document;
use crate::types::{NodeId, TriggerMode};

// =============================================================================
// Primitive parsers
// =============================================================================

/// First non-empty declaration of `name` on `node` or its ancestors.
pub fn resolve_cascading<'a>(doc: &'a Document, node: NodeId, name: &str) -> Option<&'a str> {
    doc.self_and_ancestors(node)
        .find_map(|n| doc.attribute(n, name))
        .filter(|value| !value.is_empty())
}

/// Leading integer of `raw`: optional whitespace, optional sign, digits.
/// Trailing garbage is ignored (`"20px"` is 20). No digits gives `None`.
pub fn parse_int_prefix(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let magnitude = digits[..end].bytes().fold(0i64, |acc, b| {
        acc.saturating_mul(10).saturating_add(i64::from(b - b'0'))
    });
    Some(if negative { -magnitude } else { magnitude })
}

/// `"true"`, `"1"` or `"yes"`, trimmed and case-insensitive.
pub fn is_truthy(raw: &str) -> bool {
    let value = raw.trim();
    ["true", "1", "yes"]
        .iter()
        .any(|t| value.eq_ignore_ascii_case(t))
}

// =============================================================================
// Accordion
// =============================================================================

/// Extra pixels added to an open panel's height. Default 0.
pub fn accordion_offset(doc: &Document, item: NodeId, names: &AttributeNames) -> i64 {
    resolve_cascading(doc, item, &names.accordion_offset)
        .and_then(parse_int_prefix)
        .unwrap_or(0)
}

/// Which part of the item toggles it. Default [`TriggerMode::Item`].
pub fn trigger_mode(doc: &Document, item: NodeId, names: &AttributeNames) -> TriggerMode {
    resolve_cascading(doc, item, &names.accordion_trigger)
        .map(TriggerMode::from_attr)
        .unwrap_or_default()
}

/// Mutual-exclusion key. Own attribute only.
pub fn group<'a>(doc: &'a Document, item: NodeId, names: &AttributeNames) -> Option<&'a str> {
    doc.attribute(item, &names.accordion_group)
        .filter(|value| !value.is_empty())
}

/// Whether the item starts open. Own attribute only.
pub fn open_by_default(doc: &Document, item: NodeId, names: &AttributeNames) -> bool {
    doc.attribute(item, &names.accordion_open)
        .is_some_and(is_truthy)
}

// =============================================================================
// Modal
// =============================================================================

/// Whether an open modal locks page scroll. Absent means no.
pub fn lock_scroll(doc: &Document, modal: NodeId, names: &AttributeNames) -> bool {
    resolve_cascading(doc, modal, &names.modal_lock).is_some_and(is_truthy)
}

/// How an open-trigger names its modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenTarget {
    /// Value of the modal's id attribute.
    Id(String),
    /// CSS selector of the modal element.
    Selector(String),
}

/// Read the target declared on an open-trigger. The id form wins over the
/// selector form; neither declared (or both empty) gives `None`.
pub fn open_target(doc: &Document, trigger: NodeId, names: &AttributeNames) -> Option<OpenTarget> {
    let non_empty = |name: &str| {
        doc.attribute(trigger, name)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    };

    non_empty(&names.modal_open)
        .map(OpenTarget::Id)
        .or_else(|| non_empty(&names.modal_target).map(OpenTarget::Selector))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (Document, AttributeNames, NodeId, NodeId) {
        let mut doc = Document::new();
        let body = doc.body();
        let section = doc.element(body, "section", &[]);
        let item = doc.element(section, "div", &[("data-rs-accordion-item", "")]);
        (doc, AttributeNames::default(), section, item)
    }

    #[test]
    fn test_parse_int_prefix() {
        assert_eq!(parse_int_prefix("20"), Some(20));
        assert_eq!(parse_int_prefix("  20px"), Some(20));
        assert_eq!(parse_int_prefix("-15"), Some(-15));
        assert_eq!(parse_int_prefix("+7"), Some(7));
        assert_eq!(parse_int_prefix("abc"), None);
        assert_eq!(parse_int_prefix(""), None);
        assert_eq!(parse_int_prefix("-"), None);
        assert_eq!(parse_int_prefix("px20"), None);
    }

    #[test]
    fn test_is_truthy() {
        for value in ["true", "1", "yes", " TRUE ", "Yes"] {
            assert!(is_truthy(value), "{value}");
        }
        for value in ["", "false", "0", "no", "on"] {
            assert!(!is_truthy(value), "{value}");
        }
    }

    #[test]
    fn test_offset_cascades_from_ancestor() {
        let (mut doc, names, section, item) = setup();
        assert_eq!(accordion_offset(&doc, item, &names), 0);

        doc.set_attribute(section, "data-rs-accordion-offset", "24");
        assert_eq!(accordion_offset(&doc, item, &names), 24);

        // Own value wins
        doc.set_attribute(item, "data-rs-accordion-offset", "8");
        assert_eq!(accordion_offset(&doc, item, &names), 8);
    }

    #[test]
    fn test_offset_malformed_is_zero() {
        let (mut doc, names, _, item) = setup();
        doc.set_attribute(item, "data-rs-accordion-offset", "abc");
        assert_eq!(accordion_offset(&doc, item, &names), 0);
    }

    #[test]
    fn test_empty_declaration_uses_default() {
        let (mut doc, names, section, item) = setup();
        doc.set_attribute(section, "data-rs-accordion-trigger", "head");
        doc.set_attribute(item, "data-rs-accordion-trigger", "");
        assert_eq!(trigger_mode(&doc, item, &names), TriggerMode::Item);
    }

    #[test]
    fn test_trigger_mode() {
        let (mut doc, names, section, item) = setup();
        assert_eq!(trigger_mode(&doc, item, &names), TriggerMode::Item);
        doc.set_attribute(section, "data-rs-accordion-trigger", "head");
        assert_eq!(trigger_mode(&doc, item, &names), TriggerMode::Head);
        doc.set_attribute(section, "data-rs-accordion-trigger", "HEAD");
        assert_eq!(trigger_mode(&doc, item, &names), TriggerMode::Item);
    }

    #[test]
    fn test_group_and_open_are_own_only() {
        let (mut doc, names, section, item) = setup();
        doc.set_attribute(section, "data-rs-accordion-group", "faq");
        doc.set_attribute(section, "data-rs-accordion-open", "true");
        assert_eq!(group(&doc, item, &names), None);
        assert!(!open_by_default(&doc, item, &names));

        doc.set_attribute(item, "data-rs-accordion-group", "faq");
        doc.set_attribute(item, "data-rs-accordion-open", "1");
        assert_eq!(group(&doc, item, &names), Some("faq"));
        assert!(open_by_default(&doc, item, &names));
    }

    #[test]
    fn test_lock_scroll_defaults_off() {
        let mut doc = Document::new();
        let names = AttributeNames::default();
        let body = doc.body();
        let modal = doc.element(body, "div", &[("data-rs-modal", "m")]);
        assert!(!lock_scroll(&doc, modal, &names));

        doc.set_attribute(body, "data-rs-modal-lock", "true");
        assert!(lock_scroll(&doc, modal, &names));

        doc.set_attribute(modal, "data-rs-modal-lock", "false");
        assert!(!lock_scroll(&doc, modal, &names));
    }

    #[test]
    fn test_open_target_prefers_id() {
        let mut doc = Document::new();
        let names = AttributeNames::default();
        let body = doc.body();
        let both = doc.element(
            body,
            "button",
            &[("data-rs-modal-open", "signup"), ("data-rs-modal-target", "#x")],
        );
        let selector_only = doc.element(
            body,
            "button",
            &[("data-rs-modal-open", ""), ("data-rs-modal-target", ".dialog")],
        );
        let neither = doc.element(body, "button", &[("data-rs-modal-open", " ")]);

        assert_eq!(open_target(&doc, both, &names), Some(OpenTarget::Id("signup".into())));
        assert_eq!(
            open_target(&doc, selector_only, &names),
            Some(OpenTarget::Selector(".dialog".into()))
        );
        assert_eq!(open_target(&doc, neither, &names), None);
    }
}
