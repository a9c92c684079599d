//! Engine - Document model, selectors, event bus and module registry.
//!
//! The engine manages the core data structures:
//! - Document: headless element arena (attributes, classes, style, focus)
//! - Selector: the CSS subset used by the declarative contract
//! - EventBus: semantic widget events for external listeners
//! - ModuleRegistry: named widget modules, init pass, event fan-out
//!
//! # Architecture
//!
//! Elements are NOT objects. They are generational indices into one arena:
//!
//! ```text
//! Slot 0: html   (parent=-,  children=[1])
//! Slot 1: body   (parent=0,  children=[2, 5])
//! Slot 2: div    (parent=1,  data-rs-modal="signup", class="is-open")
//! ```

mod document;
mod events;
mod registry;
mod selector;

pub use document::*;
pub use events::*;
pub use registry::*;
pub use selector::*;
