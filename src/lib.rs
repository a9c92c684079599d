//! # spark-widgets
//!
//! Declarative, attribute-driven modal and accordion runtime for Rust.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for
//! reactive state and [Taffy](https://github.com/DioxusLabs/taffy) for content
//! measurement.
//!
//! ## Architecture
//!
//! Widgets are configured entirely by `data-rs-*` attributes on a headless
//! document. The host feeds delegated DOM events into a [`Runtime`]; each
//! widget module resolves the event target to the instance it owns and
//! drives that instance's state machine:
//! ```text
//! host event → Runtime → ModuleRegistry → Modal / Accordion coordinator
//!                                            ↓            ↓          ↓
//!                                         Document    EventBus   Scheduler
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Core types (NodeId, DomEvent, CloseReason, etc.)
//! - [`engine`] - Document, selectors, event bus, module registry
//! - [`layout`] - Natural content height via Taffy
//! - [`attributes`] - Cascading attribute resolution
//! - [`state`] - Focus, keyboard and scroll-lock state
//! - [`widgets`] - The modal and accordion coordinators
//! - [`pipeline`] - Runtime, environment and deferred tasks
//! - [`config`], [`error`], [`logging`] - Setup

pub mod attributes;
pub mod config;
pub mod engine;
pub mod error;
pub mod layout;
pub mod logging;
pub mod pipeline;
pub mod state;
pub mod types;
pub mod widgets;

// Re-export commonly used items
pub use types::*;

pub use config::{AttributeNames, Config};

pub use error::{ConfigError, SelectorError, WidgetError};

pub use engine::{
    Document, EventBus, EventKind, InitReport, ListenerId, ModuleRegistry, ModuleState, Selector,
    Widget, WidgetEvent,
};

pub use layout::natural_height;

pub use pipeline::{Env, Runtime, Scheduler, Task};

pub use state::{FocusScope, KeyCode, KeyState, KeyboardEvent, LockState, Modifiers, ScrollLock};

pub use widgets::{AccordionCoordinator, ModalCoordinator};
