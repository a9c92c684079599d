//! Widgets - The interaction coordinators.
//!
//! Each coordinator is a [`Widget`](crate::engine::Widget) module: it sees
//! every delegated event, claims the ones aimed at its markup, and drives the
//! owning instance's state machine.
//!
//! - [`ModalCoordinator`] - singleton-open dialogs (`data-rs-modal`)
//! - [`AccordionCoordinator`] - collapsible items (`data-rs-accordion-item`)

pub mod accordion;
pub mod modal;

pub use accordion::AccordionCoordinator;
pub use modal::ModalCoordinator;
