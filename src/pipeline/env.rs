//! Env - Everything a widget may touch while handling an event.

use crate::config::{AttributeNames, Config};
use crate::engine::{Document, EventBus};
use crate::state::ScrollLock;

use super::scheduler::Scheduler;

/// Shared state handed to every widget call.
///
/// One `Env` per runtime. Independent runtimes share nothing.
pub struct Env {
    pub document: Document,
    pub events: EventBus,
    pub scheduler: Scheduler,
    pub scroll_lock: ScrollLock,
    pub config: Config,
}

impl Env {
    pub fn new(config: Config) -> Self {
        Self::with_document(config, Document::new())
    }

    pub fn with_document(config: Config, document: Document) -> Self {
        Self {
            document,
            events: EventBus::new(&config.namespace),
            scheduler: Scheduler::new(),
            scroll_lock: ScrollLock::new(&config.classes.scroll_locked),
            config,
        }
    }

    pub fn attribute_names(&self) -> AttributeNames {
        self.config.attribute_names()
    }
}
