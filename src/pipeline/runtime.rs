//! Runtime - Application lifecycle and event entry points.
//!
//! The runtime owns the [`Env`] and the [`ModuleRegistry`]. Hosts construct
//! one, build or load the document, call [`init`](Runtime::init) once, then
//! feed events in and flush deferred work:
//!
//! ```ignore
//! use spark_widgets::{Config, Runtime};
//!
//! let mut rt = Runtime::new(Config::default());
//! // ... build markup through rt.document_mut() ...
//! rt.init();
//!
//! let outcome = rt.click(button);
//! if outcome.default_prevented {
//!     // don't follow the link
//! }
//! rt.tick(); // after the host laid out the newly opened modal
//! ```

use crate::config::Config;
use crate::engine::{Document, EventBus, InitReport, ModuleRegistry, ModuleState, Widget};
use crate::state::KeyboardEvent;
use crate::types::{CloseReason, DomEvent, EventOutcome, NodeId};
use crate::widgets::{AccordionCoordinator, ModalCoordinator};

use super::env::Env;

pub struct Runtime {
    env: Env,
    registry: ModuleRegistry,
}

impl Runtime {
    /// New runtime over an empty document, with the modal and accordion
    /// modules registered (in that order) but not yet initialized.
    pub fn new(config: Config) -> Self {
        Self::with_document(config, Document::new())
    }

    pub fn with_document(config: Config, document: Document) -> Self {
        let registry = ModuleRegistry::new(config.debug);
        let mut runtime = Self {
            env: Env::with_document(config, document),
            registry,
        };
        runtime.register(ModalCoordinator::NAME, Box::new(ModalCoordinator::new()));
        runtime.register(AccordionCoordinator::NAME, Box::new(AccordionCoordinator::new()));
        runtime
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Register (or replace) a module. Takes effect at the next `init`.
    pub fn register(&mut self, name: &str, widget: Box<dyn Widget>) -> bool {
        self.registry.register(name, widget)
    }

    /// Initialize every module not yet initialized.
    pub fn init(&mut self) -> InitReport {
        let report = self.registry.init(&mut self.env);
        tracing::info!(
            initialized = report.initialized.len(),
            failed = report.failed.len(),
            "runtime initialized"
        );
        report
    }

    pub fn module_state(&self, name: &str) -> Option<ModuleState> {
        self.registry.state(name)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn env(&self) -> &Env {
        &self.env
    }

    pub fn env_mut(&mut self) -> &mut Env {
        &mut self.env
    }

    pub fn config(&self) -> &Config {
        &self.env.config
    }

    pub fn document(&self) -> &Document {
        &self.env.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.env.document
    }

    pub fn events(&mut self) -> &mut EventBus {
        &mut self.env.events
    }

    /// Run `f` against the module registered as `name`, if it is a `T`.
    pub fn with_widget<T, R>(&mut self, name: &str, f: impl FnOnce(&mut T, &mut Env) -> R) -> Option<R>
    where
        T: Widget,
    {
        let widget = self.registry.widget_mut::<T>(name)?;
        Some(f(widget, &mut self.env))
    }

    // =========================================================================
    // Event entry points
    // =========================================================================

    /// Deliver one delegated event to every ready module.
    pub fn dispatch(&mut self, event: DomEvent) -> EventOutcome {
        tracing::trace!(event = event.name(), "dispatch");
        self.registry.dispatch(&mut self.env, &event)
    }

    pub fn click(&mut self, target: NodeId) -> EventOutcome {
        self.dispatch(DomEvent::Click { target })
    }

    /// Key press on the focused element, or on the body when nothing has
    /// focus.
    pub fn key_down(&mut self, key: KeyboardEvent) -> EventOutcome {
        let target = self
            .env
            .document
            .active_element()
            .unwrap_or_else(|| self.env.document.body());
        self.dispatch(DomEvent::KeyDown { target, key })
    }

    /// User-initiated focus: move focus, then deliver `FocusIn`. Nothing is
    /// delivered when the element cannot take focus.
    pub fn focus(&mut self, target: NodeId) -> EventOutcome {
        if !self.env.document.focus(target) {
            return EventOutcome::IGNORED;
        }
        self.dispatch(DomEvent::FocusIn { target })
    }

    pub fn resize(&mut self, width: f32, height: f32) -> EventOutcome {
        self.env.document.set_viewport(width, height);
        self.dispatch(DomEvent::Resize { width, height })
    }

    /// Run the deferred tasks queued so far. Returns how many were claimed
    /// by a module.
    pub fn tick(&mut self) -> usize {
        let tasks = self.env.scheduler.drain();
        tasks
            .iter()
            .filter(|task| self.registry.run_task(&mut self.env, task))
            .count()
    }

    // =========================================================================
    // Programmatic control
    // =========================================================================

    /// Open the modal whose id attribute equals `id`.
    pub fn open_modal(&mut self, id: &str) -> bool {
        self.with_widget(ModalCoordinator::NAME, |modal: &mut ModalCoordinator, env| {
            modal.open_by_id(env, id)
        })
        .unwrap_or(false)
    }

    /// Close the active modal, if any.
    pub fn close_modal(&mut self, reason: CloseReason) -> bool {
        self.with_widget(ModalCoordinator::NAME, |modal: &mut ModalCoordinator, env| {
            modal.close_active(env, reason)
        })
        .unwrap_or(false)
    }

    pub fn active_modal(&mut self) -> Option<NodeId> {
        self.with_widget(ModalCoordinator::NAME, |modal: &mut ModalCoordinator, _| {
            modal.active()
        })
        .flatten()
    }

    pub fn toggle_accordion(&mut self, item: NodeId) -> bool {
        self.with_widget(AccordionCoordinator::NAME, |acc: &mut AccordionCoordinator, env| {
            acc.toggle(env, item)
        })
        .unwrap_or(false)
    }
}
