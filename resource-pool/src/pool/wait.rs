use std::collections::VecDeque;
use std::fmt::{self, Debug, Formatter};
use std::sync::{Mutex, MutexGuard};
use std::task::Waker;

/// Identifies a registered waiter within a `WaitQueue`.
pub type WaitId = usize;

#[derive(Default)]
struct WaitState {
    last_id: WaitId,
    entries: VecDeque<(WaitId, Waker)>,
}

/// The queue of acquirers suspended on an empty pool.
///
/// Entries are woken in registration order. A woken entry is removed from
/// the queue, so a waiter which still finds the pool empty must register
/// again (at the back of the queue).
#[derive(Default)]
pub struct WaitQueue {
    state: Mutex<WaitState>,
}

impl WaitQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, WaitState> {
        // waker calls never panic while the lock is held, but recover anyway
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Register a new waiter, or refresh the waker of an existing one.
    /// Returns the identifier for the (possibly new) registration.
    pub fn register(&self, id: Option<WaitId>, waker: &Waker) -> WaitId {
        let mut state = self.lock();
        if let Some(id) = id {
            if let Some(entry) = state.entries.iter_mut().find(|(eid, _)| *eid == id) {
                if !entry.1.will_wake(waker) {
                    entry.1 = waker.clone();
                }
                return id;
            }
        }
        state.last_id = state.last_id.wrapping_add(1);
        let id = state.last_id;
        state.entries.push_back((id, waker.clone()));
        id
    }

    /// Remove a registration. Returns `false` if the entry was already
    /// removed by a notification.
    pub fn cancel(&self, id: WaitId) -> bool {
        let mut state = self.lock();
        if let Some(pos) = state.entries.iter().position(|(eid, _)| *eid == id) {
            state.entries.remove(pos);
            true
        } else {
            false
        }
    }

    pub fn notify_one(&self) -> bool {
        let entry = self.lock().entries.pop_front();
        if let Some((_, waker)) = entry {
            waker.wake();
            true
        } else {
            false
        }
    }

    pub fn notify_all(&self) -> usize {
        let entries = std::mem::take(&mut self.lock().entries);
        let count = entries.len();
        for (_, waker) in entries {
            waker.wake();
        }
        count
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }
}

impl Debug for WaitQueue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("WaitQueue")
            .field("len", &self.len())
            .finish()
    }
}
