//! Scroll Lock - Page scroll freeze while a dialog is open.
//!
//! Manages the document-level scroll lock:
//! - Snapshot of the scroll offset and the inline styles it overrides
//! - Fixed-body technique: body pinned at `top: -{y}px`, overflow hidden
//! - Exact restoration on unlock (unset properties are removed again)
//! - `locked` signal for reactive hosts
//!
//! Not reference counted: one lock, one owner. Locking twice is a no-op,
//! unlocking while unlocked is a no-op.

use spark_signals::{signal, Signal};

use crate::engine::Document;

// =============================================================================
// STATE
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LockState {
    #[default]
    Unlocked,
    Locked,
}

/// Everything `lock` overwrites, captured verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LockSnapshot {
    pub scroll_y: i64,
    pub html_overflow: String,
    pub body_position: String,
    pub body_top: String,
    pub body_width: String,
    pub body_overflow: String,
}

impl LockSnapshot {
    fn capture(doc: &Document) -> Self {
        let (html, body) = (doc.root(), doc.body());
        Self {
            scroll_y: doc.scroll_y(),
            html_overflow: doc.style(html, "overflow").to_string(),
            body_position: doc.style(body, "position").to_string(),
            body_top: doc.style(body, "top").to_string(),
            body_width: doc.style(body, "width").to_string(),
            body_overflow: doc.style(body, "overflow").to_string(),
        }
    }

    fn restore(&self, doc: &mut Document) {
        let (html, body) = (doc.root(), doc.body());
        doc.set_style(body, "position", &self.body_position);
        doc.set_style(body, "top", &self.body_top);
        doc.set_style(body, "width", &self.body_width);
        doc.set_style(body, "overflow", &self.body_overflow);
        doc.set_style(html, "overflow", &self.html_overflow);
    }
}

pub struct ScrollLock {
    snapshot: Option<LockSnapshot>,
    locked_class: String,
    locked: Signal<bool>,
}

impl ScrollLock {
    /// `locked_class` is added to the root element while locked.
    pub fn new(locked_class: &str) -> Self {
        Self {
            snapshot: None,
            locked_class: locked_class.to_string(),
            locked: signal(false),
        }
    }

    pub fn state(&self) -> LockState {
        if self.snapshot.is_some() {
            LockState::Locked
        } else {
            LockState::Unlocked
        }
    }

    pub fn is_locked(&self) -> bool {
        self.snapshot.is_some()
    }

    /// Reactive view of [`is_locked`](Self::is_locked).
    pub fn locked_signal(&self) -> Signal<bool> {
        self.locked.clone()
    }

    /// Captured values of the current lock, if any.
    pub fn snapshot(&self) -> Option<&LockSnapshot> {
        self.snapshot.as_ref()
    }

    // =========================================================================
    // TRANSITIONS
    // =========================================================================

    /// Unlocked → Locked. Returns false when already locked.
    pub fn lock(&mut self, doc: &mut Document) -> bool {
        if self.snapshot.is_some() {
            return false;
        }

        let snapshot = LockSnapshot::capture(doc);
        let (html, body) = (doc.root(), doc.body());

        doc.set_style(body, "position", "fixed");
        doc.set_style(body, "top", &format!("-{}px", snapshot.scroll_y));
        doc.set_style(body, "width", "100%");
        doc.set_style(body, "overflow", "hidden");
        doc.add_class(html, &self.locked_class);

        // A fixed body has no scroll range
        doc.scroll_to(0);

        tracing::debug!(scroll_y = snapshot.scroll_y, "scroll locked");
        self.snapshot = Some(snapshot);
        self.locked.set(true);
        true
    }

    /// Locked → Unlocked. Returns false when not locked.
    pub fn unlock(&mut self, doc: &mut Document) -> bool {
        let Some(snapshot) = self.snapshot.take() else {
            return false;
        };

        snapshot.restore(doc);
        let html = doc.root();
        doc.remove_class(html, &self.locked_class);
        doc.scroll_to(snapshot.scroll_y);

        tracing::debug!(scroll_y = snapshot.scroll_y, "scroll unlocked");
        self.locked.set(false);
        true
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn setup() -> (Document, ScrollLock) {
        let mut doc = Document::new();
        doc.scroll_to(300);
        (doc, ScrollLock::new("is-modal-open"))
    }

    #[test]
    fn test_lock_pins_body() {
        let (mut doc, mut lock) = setup();
        assert!(lock.lock(&mut doc));

        let body = doc.body();
        assert_eq!(doc.style(body, "position"), "fixed");
        assert_eq!(doc.style(body, "top"), "-300px");
        assert_eq!(doc.style(body, "width"), "100%");
        assert_eq!(doc.style(body, "overflow"), "hidden");
        assert!(doc.has_class(doc.root(), "is-modal-open"));
        assert_eq!(doc.scroll_y(), 0);
        assert_eq!(lock.state(), LockState::Locked);
        assert!(lock.locked_signal().get());
    }

    #[test]
    fn test_unlock_restores_exact_values() {
        let (mut doc, mut lock) = setup();
        let (html, body) = (doc.root(), doc.body());
        doc.set_style(body, "position", "relative");
        doc.set_style(html, "overflow", "auto");

        lock.lock(&mut doc);
        assert!(lock.unlock(&mut doc));

        assert_eq!(doc.style(body, "position"), "relative");
        assert_eq!(doc.style(html, "overflow"), "auto");
        assert_eq!(doc.style(body, "top"), "");
        assert_eq!(doc.style(body, "width"), "");
        assert_eq!(doc.style(body, "overflow"), "");
        assert!(!doc.has_class(html, "is-modal-open"));
        assert_eq!(doc.scroll_y(), 300);
        assert!(!lock.locked_signal().get());
    }

    #[test]
    fn test_lock_is_not_reentrant() {
        let (mut doc, mut lock) = setup();
        lock.lock(&mut doc);
        let first = lock.snapshot().cloned();

        doc.scroll_to(50);
        assert!(!lock.lock(&mut doc));
        assert_eq!(lock.snapshot().cloned(), first);

        lock.unlock(&mut doc);
        assert_eq!(doc.scroll_y(), 300);
    }

    #[test]
    fn test_unlock_while_unlocked_is_noop() {
        let (mut doc, mut lock) = setup();
        assert!(!lock.unlock(&mut doc));
        assert_eq!(doc.scroll_y(), 300);
        assert_eq!(lock.state(), LockState::Unlocked);
    }
}
