use std::{
    collections::{HashMap, VecDeque},
    sync::Mutex,
};

use tracing::debug;

/// Remembers who sent each answered message so a later retraction can be
/// acknowledged by push.
///
/// Bounded two ways, both enforced by a lazy sweep on every call: entries
/// older than the retention window are dropped, and beyond `max_entries` the
/// oldest entries are evicted first. Every operation takes the lock once.
pub struct RetractionTracker {
    retention_secs: i64,
    max_entries: usize,
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    entries: HashMap<String, Entry>,
    /// Insertion order. A slot is stale once its id was overwritten or
    /// consumed; stale slots are skipped when they reach the front.
    order: VecDeque<Slot>,
    next_seq: u64,
}

struct Entry {
    originator_id: String,
    recorded_at: i64,
    seq: u64,
}

struct Slot {
    seq: u64,
    message_id: String,
}

impl Inner {
    fn is_live(&self, slot: &Slot) -> bool {
        self.entries
            .get(&slot.message_id)
            .is_some_and(|e| e.seq == slot.seq)
    }

    fn sweep(&mut self, now: i64, retention_secs: i64, max_entries: usize) {
        while let Some(front) = self.order.front() {
            let evict = match self.entries.get(&front.message_id) {
                Some(entry) if entry.seq == front.seq => {
                    now - entry.recorded_at >= retention_secs
                        || self.entries.len() > max_entries
                },
                _ => true,
            };
            if !evict {
                break;
            }
            if let Some(slot) = self.order.pop_front()
                && self.is_live(&slot)
            {
                self.entries.remove(&slot.message_id);
                debug!(message_id = %slot.message_id, "evicted retraction record");
            }
        }

        // Overwrites leave stale slots behind live ones; compact occasionally.
        if self.order.len() > self.entries.len() * 2 + 64 {
            let entries = &self.entries;
            self.order.retain(|slot| {
                entries
                    .get(&slot.message_id)
                    .is_some_and(|e| e.seq == slot.seq)
            });
        }
    }
}

impl RetractionTracker {
    /// `max_entries` below 1 is treated as 1.
    #[must_use]
    pub fn new(retention_secs: u64, max_entries: usize) -> Self {
        Self {
            retention_secs: i64::try_from(retention_secs).unwrap_or(i64::MAX),
            max_entries: max_entries.max(1),
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Insert or overwrite the record for `message_id`.
    pub fn record(&self, message_id: &str, originator_id: &str, now: i64) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.entries.insert(message_id.to_string(), Entry {
            originator_id: originator_id.to_string(),
            recorded_at: now,
            seq,
        });
        inner.order.push_back(Slot {
            seq,
            message_id: message_id.to_string(),
        });
        inner.sweep(now, self.retention_secs, self.max_entries);
    }

    /// Remove and return the originator recorded for `message_id`.
    ///
    /// `None` for unknown, already consumed, or expired ids.
    pub fn consume(&self, message_id: &str, now: i64) -> Option<String> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.sweep(now, self.retention_secs, self.max_entries);
        let entry = inner.entries.remove(message_id)?;
        (now - entry.recorded_at < self.retention_secs).then_some(entry.originator_id)
    }

    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .entries
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use {super::*, std::sync::Arc};

    const DAY: u64 = 86_400;

    #[test]
    fn record_then_consume_once() {
        let tracker = RetractionTracker::new(DAY, 100);
        tracker.record("m1", "U1", 1_000);
        assert_eq!(tracker.len(), 1);

        assert_eq!(tracker.consume("m1", 1_010), Some("U1".into()));
        assert_eq!(tracker.consume("m1", 1_020), None);
        assert!(tracker.is_empty());
    }

    #[test]
    fn unknown_id_is_not_found() {
        let tracker = RetractionTracker::new(DAY, 100);
        assert_eq!(tracker.consume("nope", 0), None);
    }

    #[test]
    fn record_overwrites_same_id() {
        let tracker = RetractionTracker::new(DAY, 100);
        tracker.record("m1", "U1", 0);
        tracker.record("m1", "U2", 5);
        assert_eq!(tracker.len(), 1);
        assert_eq!(tracker.consume("m1", 6), Some("U2".into()));
    }

    #[test]
    fn expired_records_are_swept() {
        let tracker = RetractionTracker::new(60, 100);
        tracker.record("old", "U1", 0);
        tracker.record("new", "U2", 50);

        // Sweep on record drops `old` once its window has passed.
        tracker.record("newer", "U3", 60);
        assert_eq!(tracker.len(), 2);
        assert_eq!(tracker.consume("old", 61), None);
        assert_eq!(tracker.consume("new", 61), Some("U2".into()));
    }

    #[test]
    fn expired_record_is_not_found_even_out_of_order() {
        let tracker = RetractionTracker::new(60, 100);
        tracker.record("a", "U1", 100);
        tracker.record("b", "U2", 10);
        // `a` sits at the front and is still fresh, so the sweep stops there.
        assert_eq!(tracker.consume("b", 80), None);
    }

    #[test]
    fn capacity_evicts_oldest_first() {
        let tracker = RetractionTracker::new(DAY, 2);
        tracker.record("m1", "U1", 0);
        tracker.record("m2", "U2", 1);
        tracker.record("m3", "U3", 2);

        assert_eq!(tracker.len(), 2);
        assert_eq!(tracker.consume("m1", 3), None);
        assert_eq!(tracker.consume("m2", 3), Some("U2".into()));
        assert_eq!(tracker.consume("m3", 3), Some("U3".into()));
    }

    #[test]
    fn overwrite_refreshes_eviction_order() {
        let tracker = RetractionTracker::new(DAY, 2);
        tracker.record("m1", "U1", 0);
        tracker.record("m2", "U2", 1);
        tracker.record("m1", "U1", 2);
        tracker.record("m3", "U3", 3);

        assert_eq!(tracker.consume("m2", 4), None);
        assert_eq!(tracker.consume("m1", 4), Some("U1".into()));
    }

    #[test]
    fn repeated_overwrites_stay_compact() {
        let tracker = RetractionTracker::new(DAY, 10);
        for i in 0..1_000 {
            tracker.record("same", "U1", i);
        }
        let inner = tracker.inner.lock().unwrap();
        assert_eq!(inner.entries.len(), 1);
        assert!(inner.order.len() <= 2 + 64 + 1, "{}", inner.order.len());
    }

    #[test]
    fn zero_capacity_keeps_latest() {
        let tracker = RetractionTracker::new(DAY, 0);
        tracker.record("m1", "U1", 0);
        tracker.record("m2", "U2", 0);
        assert_eq!(tracker.len(), 1);
        assert_eq!(tracker.consume("m2", 0), Some("U2".into()));
    }

    #[test]
    fn concurrent_record_and_consume() {
        let tracker = Arc::new(RetractionTracker::new(DAY, 10_000));
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let tracker = Arc::clone(&tracker);
                std::thread::spawn(move || {
                    for i in 0..100 {
                        tracker.record(&format!("{t}-{i}"), &format!("U{t}"), 0);
                    }
                    (0..100)
                        .filter(|i| tracker.consume(&format!("{t}-{i}"), 1).is_some())
                        .count()
                })
            })
            .collect();
        let consumed: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(consumed, 800);
        assert!(tracker.is_empty());
    }
}
