//! Accordion Coordinator - Collapsible items with optional grouping.
//!
//! An item is `data-rs-accordion-item` with a `-head` and a `-panel` inside.
//! The panel animates through `max-height`: open sets it to the panel's
//! natural content height plus the item's offset, close sets `0px`.
//!
//! - Items sharing a `data-rs-accordion-group` value are mutually exclusive
//! - `data-rs-accordion-trigger="head"` restricts toggling to the head
//! - Enter / Space on a focused head toggles its item
//! - A resize recomputes every open panel's height
//!
//! All state is in the markup (the open class and the panel's inline
//! `max-height`), so the coordinator itself holds nothing but compiled
//! selectors.

use std::any::Any;
use std::rc::Rc;

use crate::attributes;
use crate::config::AttributeNames;
use crate::engine::{Document, Selector, Widget, WidgetEvent};
use crate::error::WidgetError;
use crate::layout::natural_height;
use crate::pipeline::Env;
use crate::types::{DomEvent, EventOutcome, NodeId, TriggerMode};

/// Controls that keep their own click behavior in item mode.
const INTERACTIVE: &str = "a, button, input, textarea, select, label";

// =============================================================================
// MARKUP
// =============================================================================

struct AccordionMarkup {
    names: AttributeNames,
    open_class: String,
    interactive: Selector,
}

/// Structural parts of one item.
#[derive(Debug, Clone, Copy)]
struct Parts {
    head: Option<NodeId>,
    panel: NodeId,
}

impl AccordionMarkup {
    fn compile(env: &Env) -> Result<Self, WidgetError> {
        Ok(Self {
            names: env.attribute_names(),
            open_class: env.config.classes.open.clone(),
            interactive: Selector::parse(INTERACTIVE)?,
        })
    }

    fn parts(&self, doc: &Document, item: NodeId) -> Option<Parts> {
        let panel = doc.first_with_attribute(item, &self.names.accordion_panel)?;
        Some(Parts {
            head: doc.first_with_attribute(item, &self.names.accordion_head),
            panel,
        })
    }

    fn items(&self, doc: &Document) -> Vec<NodeId> {
        doc.all_elements()
            .into_iter()
            .filter(|&n| doc.has_attribute(n, &self.names.accordion_item))
            .collect()
    }

    /// Nearest `name`-bearing node from `node` up, but only inside `item`.
    fn closest_in(&self, doc: &Document, item: NodeId, node: NodeId, name: &str) -> Option<NodeId> {
        doc.closest_with_attribute(node, name)
            .filter(|&found| doc.contains(item, found))
    }
}

// =============================================================================
// COORDINATOR
// =============================================================================

#[derive(Default)]
pub struct AccordionCoordinator {
    markup: Option<Rc<AccordionMarkup>>,
}

impl AccordionCoordinator {
    pub const NAME: &'static str = "accordion";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self, doc: &Document, item: NodeId) -> bool {
        self.markup
            .as_ref()
            .is_some_and(|m| doc.has_class(item, &m.open_class))
    }

    fn set_panel_height(markup: &AccordionMarkup, env: &mut Env, item: NodeId, panel: NodeId) {
        let doc = &mut env.document;
        let offset = attributes::accordion_offset(doc, item, &markup.names);
        let height = (natural_height(doc, panel) as i64 + offset).max(0);
        doc.set_style(panel, "max-height", &format!("{height}px"));
    }

    /// Mark item, head and panel open and size the panel. No event.
    fn apply_open(markup: &AccordionMarkup, env: &mut Env, item: NodeId, parts: Parts) {
        let doc = &mut env.document;
        doc.add_class(item, &markup.open_class);
        if let Some(head) = parts.head {
            doc.add_class(head, &markup.open_class);
        }
        doc.add_class(parts.panel, &markup.open_class);
        Self::set_panel_height(markup, env, item, parts.panel);
    }

    // =========================================================================
    // TRANSITIONS
    // =========================================================================

    /// Open `item`. An item without a panel is ignored; an item already open
    /// only has its panel height refreshed. Returns whether it transitioned.
    pub fn open(&mut self, env: &mut Env, item: NodeId) -> bool {
        let Some(markup) = self.markup.clone() else {
            return false;
        };
        let Some(parts) = markup.parts(&env.document, item) else {
            return false;
        };

        if env.document.has_class(item, &markup.open_class) {
            Self::set_panel_height(&markup, env, item, parts.panel);
            return false;
        }

        Self::apply_open(&markup, env, item, parts);
        tracing::debug!(?item, "accordion open");
        env.events.emit(WidgetEvent::AccordionOpen { item });
        true
    }

    /// Close `item`. Items without a panel, or not open, are ignored.
    pub fn close(&mut self, env: &mut Env, item: NodeId) -> bool {
        let Some(markup) = self.markup.clone() else {
            return false;
        };
        let doc = &mut env.document;
        let Some(parts) = markup.parts(doc, item) else {
            return false;
        };
        if !doc.has_class(item, &markup.open_class) {
            return false;
        }

        doc.remove_class(item, &markup.open_class);
        if let Some(head) = parts.head {
            doc.remove_class(head, &markup.open_class);
        }
        doc.remove_class(parts.panel, &markup.open_class);
        doc.set_style(parts.panel, "max-height", "0px");

        tracing::debug!(?item, "accordion close");
        env.events.emit(WidgetEvent::AccordionClose { item });
        true
    }

    /// Close an open item; otherwise close the open members of its group
    /// (document order) and open it.
    pub fn toggle(&mut self, env: &mut Env, item: NodeId) -> bool {
        let Some(markup) = self.markup.clone() else {
            return false;
        };
        let doc = &env.document;
        if markup.parts(doc, item).is_none() {
            return false;
        }
        if doc.has_class(item, &markup.open_class) {
            return self.close(env, item);
        }

        if let Some(group) = attributes::group(doc, item, &markup.names).map(str::to_string) {
            let siblings: Vec<NodeId> = markup
                .items(doc)
                .into_iter()
                .filter(|&other| {
                    other != item
                        && doc.has_class(other, &markup.open_class)
                        && attributes::group(doc, other, &markup.names) == Some(group.as_str())
                })
                .collect();
            for other in siblings {
                self.close(env, other);
            }
        }

        self.open(env, item)
    }

    /// Apply the initial state from markup, without emitting: items with
    /// the open class or a truthy open attribute are opened, the rest get
    /// `max-height: 0px`.
    pub fn init_defaults(&mut self, env: &mut Env) {
        let Some(markup) = self.markup.clone() else {
            return;
        };
        for item in markup.items(&env.document) {
            let doc = &env.document;
            let Some(parts) = markup.parts(doc, item) else {
                continue;
            };
            let should_open = doc.has_class(item, &markup.open_class)
                || attributes::open_by_default(doc, item, &markup.names);

            if should_open {
                Self::apply_open(&markup, env, item, parts);
            } else {
                env.document.set_style(parts.panel, "max-height", "0px");
            }
        }
    }

    /// Recompute every open panel's height. Returns how many were resized.
    pub fn resync_heights(&mut self, env: &mut Env) -> usize {
        let Some(markup) = self.markup.clone() else {
            return 0;
        };
        let open: Vec<(NodeId, Parts)> = markup
            .items(&env.document)
            .into_iter()
            .filter(|&item| env.document.has_class(item, &markup.open_class))
            .filter_map(|item| markup.parts(&env.document, item).map(|p| (item, p)))
            .collect();

        for &(item, parts) in &open {
            Self::set_panel_height(&markup, env, item, parts.panel);
        }
        open.len()
    }

    // =========================================================================
    // EVENT HANDLERS
    // =========================================================================

    /// Whether a click on `target` should toggle `item`.
    fn click_toggles(markup: &AccordionMarkup, doc: &Document, item: NodeId, target: NodeId) -> bool {
        let names = &markup.names;
        match attributes::trigger_mode(doc, item, names) {
            TriggerMode::Head => markup
                .closest_in(doc, item, target, &names.accordion_head)
                .is_some(),
            TriggerMode::Item => {
                if markup.closest_in(doc, item, target, &names.accordion_panel).is_some()
                    || markup.closest_in(doc, item, target, &names.accordion_ignore).is_some()
                {
                    return false;
                }
                let control = doc
                    .closest(target, &markup.interactive)
                    .filter(|&c| doc.contains(item, c));
                match control {
                    Some(control) => markup
                        .closest_in(doc, item, control, &names.accordion_head)
                        .is_some(),
                    None => true,
                }
            }
        }
    }

    fn on_click(&mut self, env: &mut Env, markup: &AccordionMarkup, target: NodeId) -> EventOutcome {
        let doc = &env.document;
        let Some(item) = doc.closest_with_attribute(target, &markup.names.accordion_item) else {
            return EventOutcome::IGNORED;
        };
        if Self::click_toggles(markup, doc, item, target) {
            self.toggle(env, item);
        } else {
            tracing::trace!(?item, ?target, "click inside item left alone");
        }
        EventOutcome::IGNORED
    }

    fn on_key_down(&mut self, env: &mut Env, markup: &AccordionMarkup, target: NodeId) -> EventOutcome {
        let doc = &env.document;
        let Some(head) = doc.closest_with_attribute(target, &markup.names.accordion_head) else {
            return EventOutcome::IGNORED;
        };
        if let Some(item) = doc.closest_with_attribute(head, &markup.names.accordion_item) {
            self.toggle(env, item);
        }
        EventOutcome::PREVENTED
    }
}

impl Widget for AccordionCoordinator {
    fn init(&mut self, env: &mut Env) -> Result<(), WidgetError> {
        self.markup = Some(Rc::new(AccordionMarkup::compile(env)?));
        self.init_defaults(env);
        Ok(())
    }

    fn handle(&mut self, env: &mut Env, event: &DomEvent) -> EventOutcome {
        let Some(markup) = self.markup.clone() else {
            return EventOutcome::IGNORED;
        };
        match event {
            DomEvent::Click { target } => self.on_click(env, &markup, *target),
            DomEvent::KeyDown { target, key } if key.is_down() && key.is_activation() => {
                self.on_key_down(env, &markup, *target)
            }
            DomEvent::Resize { .. } => {
                self.resync_heights(env);
                EventOutcome::IGNORED
            }
            _ => EventOutcome::IGNORED,
        }
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::state::{KeyCode, KeyState, KeyboardEvent};
    use pretty_assertions::assert_eq;

    struct Item {
        item: NodeId,
        head: NodeId,
        panel: NodeId,
    }

    fn add_item(doc: &mut Document, parent: NodeId, attrs: &[(&str, &str)], content_px: u32) -> Item {
        let mut item_attrs = vec![("data-rs-accordion-item", "")];
        item_attrs.extend_from_slice(attrs);
        let item = doc.element(parent, "div", &item_attrs);
        let head = doc.element(item, "button", &[("data-rs-accordion-head", "")]);
        let panel = doc.element(item, "div", &[("data-rs-accordion-panel", "")]);
        let height = format!("height: {content_px}px");
        doc.element(panel, "div", &[("style", height.as_str())]);
        Item { item, head, panel }
    }

    fn setup() -> (Env, AccordionCoordinator, NodeId) {
        let env = Env::new(Config::default());
        let body = env.document.body();
        (env, AccordionCoordinator::new(), body)
    }

    fn init(env: &mut Env, acc: &mut AccordionCoordinator) {
        acc.init(env).unwrap();
    }

    fn click(env: &mut Env, acc: &mut AccordionCoordinator, target: NodeId) {
        acc.handle(env, &DomEvent::Click { target });
    }

    #[test]
    fn test_open_sets_classes_and_height() {
        let (mut env, mut acc, body) = setup();
        let a = add_item(&mut env.document, body, &[], 100);
        init(&mut env, &mut acc);

        assert!(acc.open(&mut env, a.item));
        let doc = &env.document;
        assert!(doc.has_class(a.item, "is-open"));
        assert!(doc.has_class(a.head, "is-open"));
        assert!(doc.has_class(a.panel, "is-open"));
        assert_eq!(doc.style(a.panel, "max-height"), "100px");
        assert_eq!(env.events.last_event(), Some(WidgetEvent::AccordionOpen { item: a.item }));
    }

    #[test]
    fn test_offset_is_added() {
        let (mut env, mut acc, body) = setup();
        let section = env.document.element(body, "section", &[("data-rs-accordion-offset", "20")]);
        let a = add_item(&mut env.document, section, &[], 100);
        init(&mut env, &mut acc);

        acc.open(&mut env, a.item);
        assert_eq!(env.document.style(a.panel, "max-height"), "120px");
    }

    #[test]
    fn test_close_collapses() {
        let (mut env, mut acc, body) = setup();
        let a = add_item(&mut env.document, body, &[], 100);
        init(&mut env, &mut acc);
        acc.open(&mut env, a.item);

        assert!(acc.close(&mut env, a.item));
        assert!(!env.document.has_class(a.item, "is-open"));
        assert!(!env.document.has_class(a.head, "is-open"));
        assert_eq!(env.document.style(a.panel, "max-height"), "0px");
        assert_eq!(env.events.last_event(), Some(WidgetEvent::AccordionClose { item: a.item }));

        // Second close is a no-op
        let emitted = env.events.emitted();
        assert!(!acc.close(&mut env, a.item));
        assert_eq!(env.events.emitted(), emitted);
    }

    #[test]
    fn test_open_when_open_only_resyncs() {
        let (mut env, mut acc, body) = setup();
        let a = add_item(&mut env.document, body, &[], 100);
        init(&mut env, &mut acc);
        acc.open(&mut env, a.item);
        let emitted = env.events.emitted();

        let extra = env.document.children(a.panel)[0];
        env.document.set_style(extra, "height", "150px");
        assert!(!acc.open(&mut env, a.item));
        assert_eq!(env.events.emitted(), emitted);
        assert_eq!(env.document.style(a.panel, "max-height"), "150px");
    }

    #[test]
    fn test_group_is_exclusive() {
        let (mut env, mut acc, body) = setup();
        let a = add_item(&mut env.document, body, &[("data-rs-accordion-group", "faq")], 10);
        let b = add_item(&mut env.document, body, &[("data-rs-accordion-group", "faq")], 10);
        let c = add_item(&mut env.document, body, &[("data-rs-accordion-group", "other")], 10);
        let d = add_item(&mut env.document, body, &[], 10);
        init(&mut env, &mut acc);

        acc.toggle(&mut env, a.item);
        acc.toggle(&mut env, c.item);
        acc.toggle(&mut env, d.item);
        acc.toggle(&mut env, b.item);

        let doc = &env.document;
        assert!(!acc.is_open(doc, a.item));
        assert!(acc.is_open(doc, b.item));
        assert!(acc.is_open(doc, c.item));
        assert!(acc.is_open(doc, d.item));
    }

    #[test]
    fn test_missing_panel_is_ignored() {
        let (mut env, mut acc, body) = setup();
        let bare = env.document.element(body, "div", &[("data-rs-accordion-item", "")]);
        init(&mut env, &mut acc);

        assert!(!acc.open(&mut env, bare));
        assert!(!acc.toggle(&mut env, bare));
        assert!(!env.document.has_class(bare, "is-open"));
        assert_eq!(env.events.emitted(), 0);
    }

    #[test]
    fn test_init_defaults_silent() {
        let (mut env, mut acc, body) = setup();
        let a = add_item(&mut env.document, body, &[("data-rs-accordion-open", "true")], 40);
        let b = add_item(&mut env.document, body, &[("class", "is-open")], 60);
        let c = add_item(&mut env.document, body, &[], 80);
        init(&mut env, &mut acc);

        let doc = &env.document;
        assert!(doc.has_class(a.item, "is-open"));
        assert!(doc.has_class(a.panel, "is-open"));
        assert_eq!(doc.style(a.panel, "max-height"), "40px");
        assert!(doc.has_class(b.head, "is-open"));
        assert_eq!(doc.style(b.panel, "max-height"), "60px");
        assert_eq!(doc.style(c.panel, "max-height"), "0px");
        assert_eq!(env.events.emitted(), 0);
    }

    #[test]
    fn test_item_mode_click_filters() {
        let (mut env, mut acc, body) = setup();
        let a = add_item(&mut env.document, body, &[], 10);
        let doc = &mut env.document;
        let link = doc.element(a.panel, "a", &[("href", "#")]);
        let extra = doc.element(a.item, "div", &[]);
        let ignored = doc.element(a.item, "span", &[("data-rs-accordion-ignore", "")]);
        let checkbox = doc.element(a.item, "input", &[]);
        let head_icon = doc.element(a.head, "svg", &[]);
        init(&mut env, &mut acc);

        for target in [link, a.panel, ignored, checkbox] {
            click(&mut env, &mut acc, target);
            assert!(!acc.is_open(&env.document, a.item));
        }

        click(&mut env, &mut acc, extra);
        assert!(acc.is_open(&env.document, a.item));

        // The head is a button, but a button inside the head still toggles
        click(&mut env, &mut acc, head_icon);
        assert!(!acc.is_open(&env.document, a.item));
    }

    #[test]
    fn test_head_mode_only_head_toggles() {
        let (mut env, mut acc, body) = setup();
        let a = add_item(&mut env.document, body, &[("data-rs-accordion-trigger", "head")], 10);
        let extra = env.document.element(a.item, "div", &[]);
        init(&mut env, &mut acc);

        click(&mut env, &mut acc, extra);
        assert!(!acc.is_open(&env.document, a.item));
        click(&mut env, &mut acc, a.head);
        assert!(acc.is_open(&env.document, a.item));
    }

    #[test]
    fn test_activation_keys_on_head() {
        let (mut env, mut acc, body) = setup();
        let a = add_item(&mut env.document, body, &[], 10);
        init(&mut env, &mut acc);

        let space = DomEvent::KeyDown {
            target: a.head,
            key: KeyboardEvent::new(KeyCode::SPACE),
        };
        assert!(acc.handle(&mut env, &space).default_prevented);
        assert!(acc.is_open(&env.document, a.item));

        let enter = DomEvent::KeyDown {
            target: a.head,
            key: KeyboardEvent::new(KeyCode::Enter),
        };
        assert!(acc.handle(&mut env, &enter).default_prevented);
        assert!(!acc.is_open(&env.document, a.item));

        // Outside any head nothing happens
        let elsewhere = DomEvent::KeyDown {
            target: a.panel,
            key: KeyboardEvent::new(KeyCode::Enter),
        };
        assert!(!acc.handle(&mut env, &elsewhere).default_prevented);
        let tab = DomEvent::KeyDown {
            target: a.head,
            key: KeyboardEvent::new(KeyCode::Tab),
        };
        assert!(!acc.handle(&mut env, &tab).default_prevented);
    }

    #[test]
    fn test_key_release_does_not_toggle() {
        let (mut env, mut acc, body) = setup();
        let a = add_item(&mut env.document, body, &[], 10);
        init(&mut env, &mut acc);

        let mut key = KeyboardEvent::new(KeyCode::Enter);
        acc.handle(&mut env, &DomEvent::KeyDown { target: a.head, key: key.clone() });
        assert!(acc.is_open(&env.document, a.item));

        key.state = KeyState::Release;
        let outcome = acc.handle(&mut env, &DomEvent::KeyDown { target: a.head, key });
        assert!(!outcome.default_prevented);
        assert!(acc.is_open(&env.document, a.item));
        assert_eq!(env.events.emitted(), 1);
    }

    #[test]
    fn test_resize_recomputes_open_panels() {
        let (mut env, mut acc, body) = setup();
        let a = add_item(&mut env.document, body, &[], 0);
        let text = env.document.children(a.panel)[0];
        env.document.set_style(text, "height", "");
        // 10 words of 4 columns
        env.document.set_text(text, &["word"; 10].join(" "));
        let b = add_item(&mut env.document, body, &[], 30);
        init(&mut env, &mut acc);
        acc.open(&mut env, a.item);
        assert_eq!(env.document.style(a.panel, "max-height"), "20px");

        env.document.set_viewport(80.0, 600.0);
        acc.handle(&mut env, &DomEvent::Resize { width: 80.0, height: 600.0 });
        assert_eq!(env.document.style(a.panel, "max-height"), "100px");
        assert_eq!(env.document.style(b.panel, "max-height"), "0px");
    }
}
