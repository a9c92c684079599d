//! Module Registry - Named widget modules and their lifecycle.
//!
//! Manages the lifecycle of widget modules:
//! - Name → module mapping in registration order
//! - One global init pass, each module initialized exactly once
//! - Failure isolation: a module whose init fails (or panics) is logged and
//!   skipped, the rest still initialize
//! - Event fan-out to every ready module

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::error::WidgetError;
use crate::pipeline::{Env, Task};
use crate::types::{DomEvent, EventOutcome};

// =============================================================================
// Widget trait
// =============================================================================

/// A widget module driven by the runtime.
pub trait Widget: Any {
    /// One-time setup: compile selectors, apply initial markup state.
    fn init(&mut self, env: &mut Env) -> Result<(), WidgetError>;

    /// React to a delegated document event.
    fn handle(&mut self, env: &mut Env, event: &DomEvent) -> EventOutcome;

    /// Run a deferred task. Returns true if this widget owned it.
    fn run_task(&mut self, _env: &mut Env, _task: &Task) -> bool {
        false
    }

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

// =============================================================================
// Registry State
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleState {
    /// Registered, waiting for the init pass.
    Registered,
    /// Initialized; receives events.
    Ready,
    /// Init failed; never receives events.
    Failed,
}

struct Module {
    name: String,
    widget: Box<dyn Widget>,
    state: ModuleState,
}

/// Outcome of one init pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InitReport {
    pub initialized: Vec<String>,
    pub failed: Vec<String>,
}

#[derive(Default)]
pub struct ModuleRegistry {
    modules: Vec<Module>,
    debug: bool,
}

impl ModuleRegistry {
    pub fn new(debug: bool) -> Self {
        Self {
            modules: Vec::new(),
            debug,
        }
    }

    /// Registry debug line, only when the debug flag is on.
    pub fn debug(&self, message: &str) {
        if self.debug {
            tracing::debug!(target: "spark_widgets::registry", "{message}");
        }
    }

    /// Register a module under `name`.
    ///
    /// Empty names are ignored. Registering an existing name replaces its
    /// widget in place (keeping its position) and queues it for init again.
    pub fn register(&mut self, name: &str, widget: Box<dyn Widget>) -> bool {
        if name.is_empty() {
            return false;
        }

        match self.modules.iter_mut().find(|m| m.name == name) {
            Some(module) => {
                module.widget = widget;
                module.state = ModuleState::Registered;
            }
            None => self.modules.push(Module {
                name: name.to_string(),
                widget,
                state: ModuleState::Registered,
            }),
        }
        self.debug(&format!("registered: {name}"));
        true
    }

    /// Initialize every module still waiting for init, in registration order.
    pub fn init(&mut self, env: &mut Env) -> InitReport {
        self.debug("init start");
        let mut report = InitReport::default();

        for module in &mut self.modules {
            if module.state != ModuleState::Registered {
                continue;
            }

            let result = catch_unwind(AssertUnwindSafe(|| module.widget.init(env)))
                .unwrap_or_else(|_| {
                    Err(WidgetError::InitPanic {
                        module: module.name.clone(),
                    })
                });

            match result {
                Ok(()) => {
                    module.state = ModuleState::Ready;
                    report.initialized.push(module.name.clone());
                    if self.debug {
                        tracing::debug!(target: "spark_widgets::registry", module = %module.name, "init ok");
                    }
                }
                Err(err) => {
                    module.state = ModuleState::Failed;
                    report.failed.push(module.name.clone());
                    tracing::error!(module = %module.name, error = %err, "init failed");
                }
            }
        }

        self.debug("init done");
        report
    }

    /// Hand `event` to every ready module. Default suppression accumulates.
    pub fn dispatch(&mut self, env: &mut Env, event: &DomEvent) -> EventOutcome {
        let mut outcome = EventOutcome::default();
        for module in &mut self.modules {
            if module.state == ModuleState::Ready {
                outcome.merge(module.widget.handle(env, event));
            }
        }
        outcome
    }

    /// Offer a deferred task to ready modules until one claims it.
    pub fn run_task(&mut self, env: &mut Env, task: &Task) -> bool {
        self.modules
            .iter_mut()
            .filter(|m| m.state == ModuleState::Ready)
            .any(|m| m.widget.run_task(env, task))
    }

    pub fn state(&self, name: &str) -> Option<ModuleState> {
        self.modules.iter().find(|m| m.name == name).map(|m| m.state)
    }

    /// Registered names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.modules.iter().map(|m| m.name.as_str()).collect()
    }

    /// Typed access to a registered widget.
    pub fn widget_mut<T: Widget>(&mut self, name: &str) -> Option<&mut T> {
        self.modules
            .iter_mut()
            .find(|m| m.name == name)
            .and_then(|m| m.widget.as_any_mut().downcast_mut::<T>())
    }
}

// =============================================================================
// TESTS
// =============================================================================
