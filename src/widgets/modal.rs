//! Modal Coordinator - Singleton-open dialogs.
//!
//! Owns the modal state machine (`Closed` ⇄ `Open`) for every element marked
//! `data-rs-modal`, with at most one open at a time:
//! - Opening B while A is open closes A first (reason `switch`)
//! - Open marks the modal (`is-open`, `aria-hidden="false"`, `tabindex="-1"`),
//!   optionally locks page scroll, and defers initial focus to the next tick
//! - Close unmarks it, releases the scroll lock, and hands focus back to the
//!   element that opened it
//!
//! # Click routing
//!
//! One click resolves to at most one route, checked in this order:
//!
//! | Priority | Target inside        | Action                                  |
//! |----------|----------------------|-----------------------------------------|
//! | 1        | open-trigger         | open its modal, always prevent default  |
//! | 2        | close-trigger        | close the enclosing modal (`button`)    |
//! | 3        | overlay              | close the enclosing modal (`overlay`), unless inside the content region |

use std::any::Any;
use std::rc::Rc;

use spark_signals::{signal, Signal};

use crate::attributes::{self, OpenTarget};
use crate::config::AttributeNames;
use crate::engine::{Document, Selector, Widget, WidgetEvent};
use crate::error::WidgetError;
use crate::pipeline::{Env, Task};
use crate::state::focus::{self, FocusScope};
use crate::state::{KeyCode, KeyboardEvent};
use crate::types::{CloseReason, DomEvent, EventOutcome, NodeId};

// =============================================================================
// MARKUP
// =============================================================================

/// Selectors compiled once at init from the configured namespace.
struct ModalMarkup {
    names: AttributeNames,
    open_class: String,
    modal: Selector,
    open_trigger: Selector,
    close_trigger: Selector,
    overlay: Selector,
    content: Selector,
}

/// `[attr]`, plus the configured class fallback when it parses.
fn with_fallback(attr: &str, fallback: &str) -> Selector {
    let primary = Selector::attribute(attr);
    if fallback.trim().is_empty() {
        return primary;
    }
    match Selector::parse(fallback) {
        Ok(selector) => primary.or(selector),
        Err(err) => {
            tracing::warn!(fallback, error = %err, "ignoring invalid modal fallback selector");
            primary
        }
    }
}

impl ModalMarkup {
    fn compile(env: &Env) -> Self {
        let names = env.attribute_names();
        let modal_config = &env.config.modal;
        Self {
            open_class: env.config.classes.open.clone(),
            modal: Selector::attribute(&names.modal),
            open_trigger: Selector::attribute(&names.modal_open)
                .or(Selector::attribute(&names.modal_target)),
            close_trigger: Selector::attribute(&names.modal_close),
            overlay: with_fallback(&names.modal_overlay, &modal_config.overlay_fallback),
            content: with_fallback(&names.modal_content, &modal_config.content_fallback),
            names,
        }
    }

    fn modal_id(&self, doc: &Document, modal: NodeId) -> Option<String> {
        doc.attribute(modal, &self.names.modal)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
    }

    /// Content region of `modal`, or the modal itself.
    fn focus_scope(&self, doc: &Document, modal: NodeId) -> FocusScope {
        let region = doc.query_selector_in(modal, &self.content).unwrap_or(modal);
        FocusScope::new(modal, region)
    }

    fn resolve(&self, doc: &Document, target: &OpenTarget) -> Option<NodeId> {
        match target {
            OpenTarget::Id(id) => doc.find_by_attribute(&self.names.modal, id),
            OpenTarget::Selector(raw) => match Selector::parse(raw) {
                Ok(selector) => doc.query_selector(&selector),
                Err(err) => {
                    tracing::warn!(selector = %raw, error = %err, "invalid modal target selector");
                    None
                }
            },
        }
    }
}

// =============================================================================
// CLICK ROUTING
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClickRoute {
    Open { trigger: NodeId },
    Close { modal: NodeId },
    Overlay { modal: NodeId },
    /// Matched a route but it resolved to nothing.
    Swallowed,
    Miss,
}

fn route_click(markup: &ModalMarkup, doc: &Document, target: NodeId) -> ClickRoute {
    if let Some(trigger) = doc.closest(target, &markup.open_trigger) {
        return ClickRoute::Open { trigger };
    }

    if let Some(close) = doc.closest(target, &markup.close_trigger) {
        return match doc.closest(close, &markup.modal) {
            Some(modal) => ClickRoute::Close { modal },
            None => ClickRoute::Swallowed,
        };
    }

    if let Some(overlay) = doc.closest(target, &markup.overlay) {
        let Some(modal) = doc.closest(overlay, &markup.modal) else {
            return ClickRoute::Swallowed;
        };
        let inside_content = doc
            .query_selector_in(modal, &markup.content)
            .is_some_and(|content| doc.contains(content, target));
        return if inside_content {
            ClickRoute::Swallowed
        } else {
            ClickRoute::Overlay { modal }
        };
    }

    ClickRoute::Miss
}

fn is_form_control(doc: &Document, node: NodeId) -> bool {
    matches!(doc.tag(node), Some("input" | "textarea" | "select"))
}

// =============================================================================
// COORDINATOR
// =============================================================================

pub struct ModalCoordinator {
    markup: Option<Rc<ModalMarkup>>,
    active: Signal<Option<NodeId>>,
    last_trigger: Option<NodeId>,
    /// Bumped on every open and on every close of the active modal, so a
    /// queued focus task can tell it is stale.
    generation: u64,
}

impl Default for ModalCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl ModalCoordinator {
    pub const NAME: &'static str = "modal";

    pub fn new() -> Self {
        Self {
            markup: None,
            active: signal(None),
            last_trigger: None,
            generation: 0,
        }
    }

    /// The open modal, if any.
    pub fn active(&self) -> Option<NodeId> {
        self.active.get()
    }

    /// Reactive view of [`active`](Self::active).
    pub fn active_signal(&self) -> Signal<Option<NodeId>> {
        self.active.clone()
    }

    /// Element focus returns to when the active modal closes.
    pub fn last_trigger(&self) -> Option<NodeId> {
        self.last_trigger
    }

    pub fn is_open(&self, doc: &Document, modal: NodeId) -> bool {
        self.markup
            .as_ref()
            .is_some_and(|m| doc.has_class(modal, &m.open_class))
    }

    // =========================================================================
    // TRANSITIONS
    // =========================================================================

    /// Open `modal`, closing any other open modal first. Returns false when
    /// the module is not initialized or the node is gone.
    pub fn open(&mut self, env: &mut Env, modal: NodeId, trigger: Option<NodeId>) -> bool {
        let Some(markup) = self.markup.clone() else {
            return false;
        };
        if !env.document.exists(modal) {
            return false;
        }

        if let Some(current) = self.active() {
            if current != modal {
                self.close(env, current, CloseReason::Switch);
            }
        }

        self.last_trigger = trigger;
        self.active.set(Some(modal));
        self.generation += 1;

        let doc = &mut env.document;
        doc.add_class(modal, &markup.open_class);
        doc.set_attribute(modal, "aria-hidden", "false");
        doc.set_attribute(modal, "tabindex", "-1");

        if attributes::lock_scroll(doc, modal, &markup.names) {
            env.scroll_lock.lock(doc);
        }

        let id = markup.modal_id(&env.document, modal);
        tracing::debug!(?id, ?modal, ?trigger, "modal open");
        env.events.emit(WidgetEvent::ModalOpen { id, modal, trigger });

        env.scheduler.schedule(Task::FocusFirst {
            modal,
            generation: self.generation,
        });
        true
    }

    /// Close `modal`. A modal that is missing or not open is left alone and
    /// no event is emitted.
    ///
    /// The active modal is the exception once it has left the document: its
    /// scroll lock and focus bookkeeping are released without an event.
    pub fn close(&mut self, env: &mut Env, modal: NodeId, reason: CloseReason) -> bool {
        let Some(markup) = self.markup.clone() else {
            return false;
        };
        let doc = &mut env.document;
        if !doc.exists(modal) {
            if self.active() != Some(modal) {
                return false;
            }
            tracing::debug!(?modal, %reason, "active modal left the document");
            env.scroll_lock.unlock(doc);
            self.finish_active(env);
            return true;
        }
        if !doc.has_class(modal, &markup.open_class) {
            return false;
        }

        doc.remove_class(modal, &markup.open_class);
        doc.set_attribute(modal, "aria-hidden", "true");

        if attributes::lock_scroll(doc, modal, &markup.names) {
            env.scroll_lock.unlock(doc);
        }

        let id = markup.modal_id(&env.document, modal);
        tracing::debug!(?id, ?modal, %reason, "modal close");
        env.events.emit(WidgetEvent::ModalClose { id, modal, reason });

        if self.active() == Some(modal) {
            self.finish_active(env);
        }
        true
    }

    fn finish_active(&mut self, env: &mut Env) {
        focus::restore_focus(&mut env.document, self.last_trigger.take());
        self.active.set(None);
        self.generation += 1;
    }

    /// Open the modal whose id attribute equals `id`, with no trigger.
    pub fn open_by_id(&mut self, env: &mut Env, id: &str) -> bool {
        let Some(markup) = self.markup.clone() else {
            return false;
        };
        match markup.resolve(&env.document, &OpenTarget::Id(id.to_string())) {
            Some(modal) => self.open(env, modal, None),
            None => {
                tracing::trace!(id, "no modal with this id");
                false
            }
        }
    }

    pub fn close_active(&mut self, env: &mut Env, reason: CloseReason) -> bool {
        match self.active() {
            Some(modal) => self.close(env, modal, reason),
            None => false,
        }
    }

    // =========================================================================
    // EVENT HANDLERS
    // =========================================================================

    fn open_from_trigger(&mut self, env: &mut Env, markup: &ModalMarkup, trigger: NodeId) {
        let modal = attributes::open_target(&env.document, trigger, &markup.names)
            .and_then(|target| markup.resolve(&env.document, &target));
        match modal {
            Some(modal) => {
                self.open(env, modal, Some(trigger));
            }
            None => tracing::trace!(?trigger, "open trigger resolved to no modal"),
        }
    }

    fn on_click(&mut self, env: &mut Env, markup: &ModalMarkup, target: NodeId) -> EventOutcome {
        match route_click(markup, &env.document, target) {
            ClickRoute::Open { trigger } => {
                self.open_from_trigger(env, markup, trigger);
                EventOutcome::PREVENTED
            }
            ClickRoute::Close { modal } => {
                self.close(env, modal, CloseReason::Button);
                EventOutcome::IGNORED
            }
            ClickRoute::Overlay { modal } => {
                self.close(env, modal, CloseReason::Overlay);
                EventOutcome::IGNORED
            }
            ClickRoute::Swallowed | ClickRoute::Miss => EventOutcome::IGNORED,
        }
    }

    fn on_focus_in(&mut self, env: &mut Env, markup: &ModalMarkup, target: NodeId) -> EventOutcome {
        let doc = &env.document;
        if doc.matches(target, &markup.open_trigger) && is_form_control(doc, target) {
            self.open_from_trigger(env, markup, target);
        }
        EventOutcome::IGNORED
    }

    fn on_key_down(&mut self, env: &mut Env, markup: &ModalMarkup, key: &KeyboardEvent) -> EventOutcome {
        if !key.is_down() {
            return EventOutcome::IGNORED;
        }
        let Some(active) = self.active() else {
            return EventOutcome::IGNORED;
        };

        match key.code {
            KeyCode::Escape => {
                self.close(env, active, CloseReason::Escape);
                EventOutcome::PREVENTED
            }
            KeyCode::Tab if env.document.exists(active) => {
                let scope = markup.focus_scope(&env.document, active);
                if focus::trap_tab(&mut env.document, key, scope) {
                    EventOutcome::PREVENTED
                } else {
                    EventOutcome::IGNORED
                }
            }
            _ => EventOutcome::IGNORED,
        }
    }
}

impl Widget for ModalCoordinator {
    fn init(&mut self, env: &mut Env) -> Result<(), WidgetError> {
        self.markup = Some(Rc::new(ModalMarkup::compile(env)));
        Ok(())
    }

    fn handle(&mut self, env: &mut Env, event: &DomEvent) -> EventOutcome {
        let Some(markup) = self.markup.clone() else {
            return EventOutcome::IGNORED;
        };
        match event {
            DomEvent::Click { target } => self.on_click(env, &markup, *target),
            DomEvent::FocusIn { target } => self.on_focus_in(env, &markup, *target),
            DomEvent::KeyDown { key, .. } => self.on_key_down(env, &markup, key),
            DomEvent::Resize { .. } => EventOutcome::IGNORED,
        }
    }

    fn run_task(&mut self, env: &mut Env, task: &Task) -> bool {
        let Some(markup) = self.markup.clone() else {
            return false;
        };
        match *task {
            Task::FocusFirst { modal, generation } => {
                let current = generation == self.generation && self.active() == Some(modal);
                if current && env.document.exists(modal) {
                    let scope = markup.focus_scope(&env.document, modal);
                    focus::focus_first(&mut env.document, scope);
                } else {
                    tracing::trace!(?modal, generation, "stale focus task");
                }
                true
            }
        }
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

// =============================================================================
// TESTS
// =============================================================================
