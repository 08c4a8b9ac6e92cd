//! Debounced auto-save as an explicit coalescing write queue.
//!
//! Each key holds at most one pending value and a due instant. Scheduling a
//! key again replaces its value and restarts its deadline, so only the last
//! value inside the debounce window is written. The queue never sleeps by
//! itself: a driver asks for `next_deadline` and calls `take_due`.

use crate::core::repository::Repository;
use crate::errors::AppResult;
use crate::models::category::Category;
use crate::models::session::SessionPatch;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(1000);

#[derive(Debug)]
struct Pending<V> {
    value: V,
    due: Instant,
}

#[derive(Debug)]
pub struct CoalescingQueue<K, V> {
    delay: Duration,
    pending: HashMap<K, Pending<V>>,
}

impl<K: Eq + Hash + Clone, V> CoalescingQueue<K, V> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: HashMap::new(),
        }
    }

    /// Replace whatever is pending for `key`; its deadline restarts at `now`.
    pub fn schedule(&mut self, key: K, value: V, now: Instant) {
        self.pending.insert(
            key,
            Pending {
                value,
                due: now + self.delay,
            },
        );
    }

    pub fn pending_value(&self, key: &K) -> Option<&V> {
        self.pending.get(key).map(|p| &p.value)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Earliest instant at which `take_due` will return something.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.values().map(|p| p.due).min()
    }

    /// Remove and return every entry whose deadline is at or before `now`.
    pub fn take_due(&mut self, now: Instant) -> Vec<(K, V)> {
        let due: Vec<K> = self
            .pending
            .iter()
            .filter(|(_, p)| p.due <= now)
            .map(|(k, _)| k.clone())
            .collect();

        due.into_iter()
            .filter_map(|k| self.pending.remove(&k).map(|p| (k, p.value)))
            .collect()
    }

    /// Remove and return everything, due or not.
    pub fn drain(&mut self) -> Vec<(K, V)> {
        self.pending.drain().map(|(k, p)| (k, p.value)).collect()
    }
}

/// Auto-save of running timers: minutes per category, coalesced per category
/// and written as a patch of that day's existing entry.
pub struct AutoSaver {
    repo: Arc<Repository>,
    queue: Mutex<CoalescingQueue<Category, u32>>,
}

impl AutoSaver {
    pub fn new(repo: Arc<Repository>, debounce: Duration) -> Self {
        Self {
            repo,
            queue: Mutex::new(CoalescingQueue::new(debounce)),
        }
    }

    fn queue(&self) -> std::sync::MutexGuard<'_, CoalescingQueue<Category, u32>> {
        match self.queue.lock() {
            Ok(q) => q,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Zero minutes are never auto-saved.
    pub fn record(&self, category: Category, minutes: u32, now: Instant) {
        if minutes == 0 {
            return;
        }
        self.queue().schedule(category, minutes, now);
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.queue().next_deadline()
    }

    /// Write every due value for `date`. Returns how many entries were patched.
    pub fn flush_due(&self, date: NaiveDate, now: Instant) -> AppResult<usize> {
        let due = self.queue().take_due(now);
        self.write(date, due)
    }

    /// Write everything still pending (e.g. when the timer view closes).
    pub fn flush_all(&self, date: NaiveDate) -> AppResult<usize> {
        let all = self.queue().drain();
        self.write(date, all)
    }

    fn write(&self, date: NaiveDate, values: Vec<(Category, u32)>) -> AppResult<usize> {
        if values.is_empty() {
            return Ok(0);
        }
        let entries = self.repo.sessions_on(date)?;
        let mut written = 0;

        for (category, minutes) in values {
            let existing = entries.iter().find(|e| e.category == category).and_then(|e| e.id);
            match existing {
                Some(id) => {
                    if let Err(e) = self.repo.update_entry(id, SessionPatch::minutes(minutes)) {
                        tracing::warn!(%date, %category, error = %e, "auto-save failed");
                        continue;
                    }
                    written += 1;
                }
                None => {
                    tracing::warn!(%date, %category, "no entry to auto-save into");
                }
            }
        }
        Ok(written)
    }
}
