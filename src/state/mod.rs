//! State modules - Focus, keyboard, and scroll state.
//!
//! - [`focus`] - Focus placement and Tab trapping inside dialogs
//! - [`keyboard`] - Key event types fed in by the host
//! - [`scroll`] - Page scroll lock

pub mod focus;
pub mod keyboard;
pub mod scroll;

pub use focus::FocusScope;
pub use keyboard::{KeyCode, KeyState, KeyboardEvent, Modifiers};
pub use scroll::{LockSnapshot, LockState, ScrollLock};
