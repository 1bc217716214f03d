//! Bounded caption history.
//!
//! Newest-first, capacity [`HISTORY_CAP`]. Insertion always prepends; when
//! the bound is exceeded the oldest entries fall off the tail. The store is
//! the only mutation point in the pipeline: appends serialise on one lock,
//! consumers get cloned snapshots, and every append is broadcast as a
//! [`CaptionEvent`] for live subscribers.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::debug;

use crate::ipc::events::CaptionEvent;

/// Maximum entries retained in the feed.
pub const HISTORY_CAP: usize = 15;

/// Entries shown on the broadcast overlay: the two most recent, oldest first.
pub const OVERLAY_CAP: usize = 2;

/// One finished utterance as displayed in the feed.
///
/// Entries are write-once: construction assigns identity and timestamp and
/// nothing mutates them afterwards. A failed translation still becomes an
/// entry — `english` is empty rather than the utterance being dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionEntry {
    /// Opaque per-session identity, used as a rendering key.
    pub id: String,
    /// The recognized utterance as it entered the pipeline.
    pub original: String,
    /// English rendering; empty when translation failed.
    pub english: String,
    /// Japanese rendering; present only for Dual-mode structured replies.
    pub japanese: Option<String>,
    /// Creation time, epoch milliseconds.
    pub created_at: i64,
}

/// Owner of the caption feed.
pub struct HistoryStore {
    entries: Mutex<VecDeque<CaptionEntry>>,
    caption_tx: broadcast::Sender<CaptionEvent>,
    /// Monotonically increasing event sequence counter.
    seq: AtomicU64,
}

impl HistoryStore {
    pub fn new(caption_tx: broadcast::Sender<CaptionEvent>) -> Self {
        Self {
            entries: Mutex::new(VecDeque::with_capacity(HISTORY_CAP + 1)),
            caption_tx,
            seq: AtomicU64::new(0),
        }
    }

    /// Insert `entry` at the front, evicting past [`HISTORY_CAP`].
    ///
    /// The broadcast seq is taken under the same lock as the insertion, so
    /// event order always matches feed order.
    pub fn append(&self, entry: CaptionEntry) {
        let seq;
        {
            let mut entries = self.entries.lock();
            entries.push_front(entry.clone());
            entries.truncate(HISTORY_CAP);
            seq = self.seq.fetch_add(1, Ordering::Relaxed);
            // Send while holding the lock — broadcast::send does not block.
            let _ = self.caption_tx.send(CaptionEvent { seq, entry });
        }
        debug!(seq, "caption appended");
    }

    /// Read-only snapshot of the feed, newest first.
    pub fn snapshot(&self) -> Vec<CaptionEntry> {
        self.entries.lock().iter().cloned().collect()
    }

    /// The overlay slice: up to [`OVERLAY_CAP`] most recent entries,
    /// reversed to oldest-first so new captions push in from the bottom.
    pub fn overlay_view(&self) -> Vec<CaptionEntry> {
        let mut view: Vec<CaptionEntry> =
            self.entries.lock().iter().take(OVERLAY_CAP).cloned().collect();
        view.reverse();
        view
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Subscribe to live caption events.
    pub fn subscribe(&self) -> broadcast::Receiver<CaptionEvent> {
        self.caption_tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> HistoryStore {
        let (tx, _) = broadcast::channel(64);
        HistoryStore::new(tx)
    }

    fn entry(n: usize) -> CaptionEntry {
        CaptionEntry {
            id: format!("cap-{n}"),
            original: format!("utterance {n}"),
            english: format!("english {n}"),
            japanese: None,
            created_at: n as i64,
        }
    }

    #[test]
    fn append_prepends_newest_first() {
        let store = store();
        store.append(entry(0));
        store.append(entry(1));
        store.append(entry(2));

        let snap = store.snapshot();
        assert_eq!(snap.len(), 3);
        assert_eq!(snap[0].id, "cap-2");
        assert_eq!(snap[2].id, "cap-0");
    }

    #[test]
    fn history_is_bounded_and_keeps_most_recent() {
        let store = store();
        for n in 0..20 {
            store.append(entry(n));
        }

        let snap = store.snapshot();
        assert_eq!(snap.len(), HISTORY_CAP);
        // The 15 most recently appended entries survive, newest first.
        assert_eq!(snap[0].id, "cap-19");
        assert_eq!(snap[14].id, "cap-5");
    }

    #[test]
    fn empty_store_has_empty_views() {
        let store = store();
        assert!(store.is_empty());
        assert!(store.snapshot().is_empty());
        assert!(store.overlay_view().is_empty());
    }

    #[test]
    fn overlay_view_is_two_newest_reversed() {
        let store = store();
        for n in 0..5 {
            store.append(entry(n));
        }

        let overlay = store.overlay_view();
        assert_eq!(overlay.len(), OVERLAY_CAP);
        // Oldest-first of the two newest: 3 then 4.
        assert_eq!(overlay[0].id, "cap-3");
        assert_eq!(overlay[1].id, "cap-4");
    }

    #[test]
    fn overlay_view_with_a_single_entry() {
        let store = store();
        store.append(entry(0));
        let overlay = store.overlay_view();
        assert_eq!(overlay.len(), 1);
        assert_eq!(overlay[0].id, "cap-0");
    }

    #[test]
    fn snapshots_are_isolated_from_the_store() {
        let store = store();
        store.append(entry(0));

        let mut snap = store.snapshot();
        snap[0].english = "mutated".into();
        snap.clear();

        let fresh = store.snapshot();
        assert_eq!(fresh.len(), 1);
        assert_eq!(fresh[0].english, "english 0");
    }

    #[test]
    fn appends_broadcast_in_feed_order() {
        let (tx, mut rx) = broadcast::channel(64);
        let store = HistoryStore::new(tx);
        store.append(entry(0));
        store.append(entry(1));

        let first = rx.try_recv().expect("first caption event");
        let second = rx.try_recv().expect("second caption event");
        assert_eq!(first.seq, 0);
        assert_eq!(first.entry.id, "cap-0");
        assert_eq!(second.seq, 1);
        assert_eq!(second.entry.id, "cap-1");
    }
}
