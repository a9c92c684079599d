//! Event bus - Semantic widget events for external listeners.
//!
//! Widgets emit a [`WidgetEvent`] after every state transition. Listeners
//! subscribe to everything (`on`) or to one kind (`on_kind`); the last
//! emitted event is also published as a signal.
//!
//! # Example
//!
//! ```ignore
//! let id = bus.on_kind(EventKind::ModalClose, |event| {
//!     if let WidgetEvent::ModalClose { reason, .. } = event {
//!         println!("closed: {reason}");
//!     }
//! });
//! bus.off(id);
//! ```

use spark_signals::{signal, Signal};

use crate::types::{CloseReason, NodeId};

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum WidgetEvent {
    ModalOpen {
        id: Option<String>,
        modal: NodeId,
        trigger: Option<NodeId>,
    },
    ModalClose {
        id: Option<String>,
        modal: NodeId,
        reason: CloseReason,
    },
    AccordionOpen {
        item: NodeId,
    },
    AccordionClose {
        item: NodeId,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    ModalOpen,
    ModalClose,
    AccordionOpen,
    AccordionClose,
}

impl EventKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::ModalOpen => "modal:open",
            Self::ModalClose => "modal:close",
            Self::AccordionOpen => "accordion:open",
            Self::AccordionClose => "accordion:close",
        }
    }
}

impl WidgetEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::ModalOpen { .. } => EventKind::ModalOpen,
            Self::ModalClose { .. } => EventKind::ModalClose,
            Self::AccordionOpen { .. } => EventKind::AccordionOpen,
            Self::AccordionClose { .. } => EventKind::AccordionClose,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind().name()
    }
}

/// Listener callback.
pub type EventHandler = Box<dyn FnMut(&WidgetEvent)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(usize);

// =============================================================================
// BUS
// =============================================================================

pub struct EventBus {
    namespace: String,
    listeners: Vec<(ListenerId, Option<EventKind>, EventHandler)>,
    next_id: usize,
    emitted: usize,
    last_event: Signal<Option<WidgetEvent>>,
}

impl EventBus {
    pub fn new(namespace: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            listeners: Vec::new(),
            next_id: 0,
            emitted: 0,
            last_event: signal(None),
        }
    }

    /// Full event name as seen by listeners, e.g. `rs:modal:open`.
    pub fn qualified_name(&self, kind: EventKind) -> String {
        format!("{}:{}", self.namespace, kind.name())
    }

    /// Subscribe to every event.
    pub fn on<F>(&mut self, handler: F) -> ListenerId
    where
        F: FnMut(&WidgetEvent) + 'static,
    {
        self.subscribe(None, Box::new(handler))
    }

    /// Subscribe to one kind of event.
    pub fn on_kind<F>(&mut self, kind: EventKind, handler: F) -> ListenerId
    where
        F: FnMut(&WidgetEvent) + 'static,
    {
        self.subscribe(Some(kind), Box::new(handler))
    }

    fn subscribe(&mut self, kind: Option<EventKind>, handler: EventHandler) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, kind, handler));
        id
    }

    /// Unsubscribe. Returns false if the listener was already gone.
    pub fn off(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener, _, _)| *listener != id);
        self.listeners.len() != before
    }

    pub fn emit(&mut self, event: WidgetEvent) {
        tracing::debug!(event = %self.qualified_name(event.kind()), ?event, "emit");
        self.emitted += 1;

        let kind = event.kind();
        for (_, filter, handler) in &mut self.listeners {
            if filter.is_none_or(|k| k == kind) {
                handler(&event);
            }
        }

        self.last_event.set(Some(event));
    }

    /// Number of events emitted so far.
    pub fn emitted(&self) -> usize {
        self.emitted
    }

    pub fn last_event(&self) -> Option<WidgetEvent> {
        self.last_event.get()
    }

    /// Signal carrying the last emitted event, for reactive hosts.
    pub fn last_event_signal(&self) -> Signal<Option<WidgetEvent>> {
        self.last_event.clone()
    }
}
