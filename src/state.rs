//! Session-wide state shared between views.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use static_assertions::assert_impl_all;
use tokio::sync::watch;

use crate::detail::PinnedDetailPayload;
use crate::place::SearchResult;

/// A handle to the shared state of a session.
///
/// Holds three slices: the pinned results, the payload of the active detail view,
/// and the highlight labels derived from the pinned results. Each slice can be
/// observed through a `watch::Receiver`. Writes are serialized, and the highlight
/// labels are recomputed with every write to the pinned results.
///
/// Cloning the handle is cheap and every clone refers to the same state.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<Inner>,
}

struct Inner {
    pinned: watch::Sender<Vec<SearchResult>>,
    details: watch::Sender<Option<PinnedDetailPayload>>,
    highlights: watch::Sender<Vec<String>>,
    writer: Mutex<()>,
}

assert_impl_all!(AppState: Send, Sync, Clone);

/// The label a pinned result is highlighted by in a list of destinations.
pub fn highlight_label(result: &SearchResult) -> String {
    match &*result.display_name.text {
        "Federal Territory of Kuala Lumpur" => "Kuala Lumpur".to_owned(),
        name => name.to_owned(),
    }
}

impl AppState {
    pub fn new() -> Self {
        AppState {
            inner: Arc::new(Inner {
                pinned: watch::channel(Vec::new()).0,
                details: watch::channel(None).0,
                highlights: watch::channel(Vec::new()).0,
                writer: Mutex::new(()),
            }),
        }
    }

    /// The pinned results, most recently pinned first.
    pub fn pinned(&self) -> Vec<SearchResult> {
        self.inner.pinned.borrow().clone()
    }

    pub fn is_pinned(&self, id: &str) -> bool {
        self.inner.pinned.borrow().iter().any(|r| r.id == id)
    }

    /// Pins `result` in front of the others.
    ///
    /// Returns `false` without changing anything if a result with the same id
    /// is already pinned.
    pub fn pin(&self, result: SearchResult) -> bool {
        let _guard = self.lock();
        if self.is_pinned(&result.id) {
            return false;
        }
        self.inner.pinned.send_modify(|pinned| pinned.insert(0, result));
        self.update_highlights();
        true
    }

    /// Removes the pinned result with the given id, if any.
    pub fn unpin(&self, id: &str) -> Option<SearchResult> {
        let _guard = self.lock();
        let pos = self.inner.pinned.borrow().iter().position(|r| r.id == id)?;
        let mut removed = None;
        self.inner
            .pinned
            .send_modify(|pinned| removed = Some(pinned.remove(pos)));
        self.update_highlights();
        removed
    }

    /// Replaces the pinned results. Later duplicates of an id are dropped.
    pub fn set_pinned(&self, results: Vec<SearchResult>) {
        let mut unique: Vec<SearchResult> = Vec::with_capacity(results.len());
        for result in results {
            if !unique.iter().any(|r| r.id == result.id) {
                unique.push(result);
            }
        }

        let _guard = self.lock();
        self.inner.pinned.send_replace(unique);
        self.update_highlights();
    }

    pub fn subscribe_pinned(&self) -> watch::Receiver<Vec<SearchResult>> {
        self.inner.pinned.subscribe()
    }

    /// The payload of the active detail view. `None` means no detail view is active.
    pub fn details(&self) -> Option<PinnedDetailPayload> {
        self.inner.details.borrow().clone()
    }

    pub fn set_details(&self, details: Option<PinnedDetailPayload>) {
        let _guard = self.lock();
        self.inner.details.send_replace(details);
    }

    pub fn subscribe_details(&self) -> watch::Receiver<Option<PinnedDetailPayload>> {
        self.inner.details.subscribe()
    }

    /// Labels of the pinned results, in pinned order.
    pub fn highlights(&self) -> Vec<String> {
        self.inner.highlights.borrow().clone()
    }

    pub fn subscribe_highlights(&self) -> watch::Receiver<Vec<String>> {
        self.inner.highlights.subscribe()
    }

    // Must be called with the writer lock held.
    fn update_highlights(&self) {
        let labels = self
            .inner
            .pinned
            .borrow()
            .iter()
            .map(highlight_label)
            .collect();
        self.inner.highlights.send_replace(labels);
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.inner
            .writer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::place::{AttractionsByCategory, LocalizedText};
    use crate::types::Location;

    fn result(id: &str, name: &str) -> SearchResult {
        SearchResult {
            id: id.to_owned(),
            name: format!("places/{}", id),
            display_name: LocalizedText {
                text: name.to_owned(),
                language_code: "en".to_owned(),
            },
            formatted_address: String::new(),
            location: Location::default(),
            photos: Vec::new(),
        }
    }

    #[test]
    fn pin_inserts_in_front_and_dedups() {
        let state = AppState::new();
        assert!(state.pin(result("p1", "Paris")));
        assert!(state.pin(result("t1", "Tokyo")));
        assert!(!state.pin(result("p1", "Paris again")));

        let ids: Vec<_> = state.pinned().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, ["t1", "p1"]);
        assert_eq!(state.highlights(), ["Tokyo", "Paris"]);
    }

    #[test]
    fn unpin_updates_highlights() {
        let state = AppState::new();
        state.pin(result("p1", "Paris"));
        state.pin(result("k1", "Federal Territory of Kuala Lumpur"));
        assert_eq!(state.highlights(), ["Kuala Lumpur", "Paris"]);

        assert_eq!(state.unpin("p1").map(|r| r.id), Some("p1".to_owned()));
        assert_eq!(state.unpin("p1"), None);
        assert_eq!(state.highlights(), ["Kuala Lumpur"]);
    }

    #[test]
    fn set_pinned_drops_duplicates() {
        let state = AppState::new();
        state.set_pinned(vec![
            result("p1", "Paris"),
            result("p1", "Paris"),
            result("r1", "Rome"),
        ]);
        assert_eq!(state.pinned().len(), 2);
        assert_eq!(state.highlights(), ["Paris", "Rome"]);
    }

    #[test]
    fn observers_see_changes() {
        let state = AppState::new();
        let mut pinned = state.subscribe_pinned();
        let mut details = state.clone().subscribe_details();

        state.pin(result("p1", "Paris"));
        assert!(pinned.has_changed().unwrap());
        assert_eq!(pinned.borrow_and_update().len(), 1);

        assert!(state.details().is_none());
        state.set_details(Some(PinnedDetailPayload {
            result: result("p1", "Paris"),
            attractions: AttractionsByCategory::new(),
            background_image: String::new(),
        }));
        assert!(details.has_changed().unwrap());
        assert_eq!(
            details.borrow_and_update().as_ref().map(|d| &*d.result.id),
            Some("p1")
        );
    }
}
