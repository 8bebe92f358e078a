//! Bounded FIFO handoff between the engine and host timelines.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

use tracing::warn;

/// FIFO that never blocks the producer.
///
/// When full, the oldest entry the eviction predicate allows is dropped to
/// make room. If nothing queued may be evicted, an evictable newcomer is
/// dropped instead and anything else is kept past capacity.
#[derive(Debug)]
pub struct BoundedQueue<T> {
    name: &'static str,
    items: Mutex<VecDeque<T>>,
    capacity: usize,
    evictable: fn(&T) -> bool,
    overflowed: AtomicU64,
    closed: AtomicBool,
}

fn any_entry<T>(_: &T) -> bool {
    true
}

impl<T> BoundedQueue<T> {
    pub fn new(name: &'static str, capacity: usize) -> Self {
        Self::with_eviction(name, capacity, any_entry::<T>)
    }

    /// Queue that only ever drops entries for which `evictable` holds.
    pub fn with_eviction(name: &'static str, capacity: usize, evictable: fn(&T) -> bool) -> Self {
        let capacity = capacity.max(1);
        Self {
            name,
            items: Mutex::new(VecDeque::with_capacity(capacity.min(1024))),
            capacity,
            evictable,
            overflowed: AtomicU64::new(0),
            closed: AtomicBool::new(false),
        }
    }

    /// Append an item. Returns `false` once the queue is closed or when the
    /// item itself was dropped for lack of room.
    pub fn push(&self, item: T) -> bool {
        if self.is_closed() {
            return false;
        }
        let Ok(mut items) = self.items.lock() else {
            return false;
        };
        if items.len() >= self.capacity {
            match items.iter().position(|queued| (self.evictable)(queued)) {
                Some(index) => {
                    items.remove(index);
                    let total = self.overflowed.fetch_add(1, Ordering::Relaxed) + 1;
                    warn!(queue = self.name, capacity = self.capacity, total, "queue full, dropped oldest entry");
                }
                None if (self.evictable)(&item) => {
                    let total = self.overflowed.fetch_add(1, Ordering::Relaxed) + 1;
                    warn!(queue = self.name, capacity = self.capacity, total, "queue full, dropped new entry");
                    return false;
                }
                None => {
                    warn!(queue = self.name, capacity = self.capacity, len = items.len(), "queue over capacity");
                }
            }
        }
        items.push_back(item);
        true
    }

    /// Keep only the entries `keep` accepts. Returns how many were removed.
    pub fn retain(&self, mut keep: impl FnMut(&T) -> bool) -> usize {
        let Ok(mut items) = self.items.lock() else {
            return 0;
        };
        let before = items.len();
        items.retain(|item| keep(item));
        before - items.len()
    }

    /// Take everything queued, oldest first.
    pub fn drain(&self) -> Vec<T> {
        self.items
            .lock()
            .map(|mut items| items.drain(..).collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.items.lock().map(|items| items.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entries lost to overflow so far.
    pub fn overflowed(&self) -> u64 {
        self.overflowed.load(Ordering::Relaxed)
    }

    /// Refuse further pushes and discard what is queued.
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
        if let Ok(mut items) = self.items.lock() {
            items.clear();
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}
