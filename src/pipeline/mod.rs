//! Interaction Pipeline
//!
//! This module connects host input to the widget modules.
//!
//! # Pipeline Architecture
//!
//! ```text
//! host event → Runtime::dispatch → ModuleRegistry (fan-out) → widgets → Env
//!                                                                  ↓
//!                         Runtime::tick ← Scheduler ← deferred tasks
//! ```
//!
//! ## Data Flow
//!
//! 1. **dispatch** - One delegated [`DomEvent`](crate::types::DomEvent) goes
//!    to every ready module in registration order
//! 2. **widgets** - Mutate the document, emit on the event bus, queue tasks
//! 3. **tick** - The host flushes deferred tasks after its own layout pass
//!
//! ## Key Design Principles
//!
//! - **Run to completion**: each dispatch finishes before the next starts
//! - **Owned state**: the document, bus, lock and queue live in one [`Env`]
//! - **Guarded deferral**: a task re-checks its preconditions when it runs

pub mod env;
pub mod runtime;
pub mod scheduler;

// Re-exports
pub use env::Env;
pub use runtime::Runtime;
pub use scheduler::{Scheduler, Task};
