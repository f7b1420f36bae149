use std::collections::HashMap;
use std::fmt::{self, Debug, Formatter};
use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc, Mutex,
};

use resource_pool::{PoolConfig, Resource};

pub struct AtomicCounter {
    count: AtomicUsize,
}

#[allow(unused)]
impl AtomicCounter {
    pub fn new(val: usize) -> Self {
        Self {
            count: AtomicUsize::new(val),
        }
    }

    pub fn increment(&self) -> usize {
        self.count.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn decrement(&self) -> usize {
        self.count.fetch_sub(1, Ordering::SeqCst) - 1
    }

    pub fn value(&self) -> usize {
        self.count.load(Ordering::Acquire)
    }
}

impl Default for AtomicCounter {
    fn default() -> Self {
        Self::new(0)
    }
}

#[allow(unused)]
pub fn init_logger() {
    env_logger::try_init().unwrap_or(());
}

/// Records the resources handed out by a factory and every close call made
/// on them.
#[derive(Default)]
pub struct Tracker {
    created: AtomicCounter,
    closed: Mutex<HashMap<usize, usize>>,
    fail_close: AtomicBool,
}

#[allow(unused)]
impl Tracker {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn create(self: &Arc<Self>) -> Tracked {
        Tracked {
            id: self.created.increment(),
            tracker: self.clone(),
        }
    }

    pub fn created(&self) -> usize {
        self.created.value()
    }

    pub fn close_count(&self, id: usize) -> usize {
        self.closed.lock().unwrap().get(&id).copied().unwrap_or(0)
    }

    pub fn total_closed(&self) -> usize {
        self.closed.lock().unwrap().values().sum()
    }

    pub fn closed_once(&self) -> bool {
        self.closed.lock().unwrap().values().all(|c| *c == 1)
    }

    pub fn set_fail_close(&self, fail: bool) {
        self.fail_close.store(fail, Ordering::SeqCst);
    }
}

pub struct Tracked {
    pub id: usize,
    tracker: Arc<Tracker>,
}

impl Debug for Tracked {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Tracked({})", self.id)
    }
}

#[derive(Debug, PartialEq)]
pub struct CloseFailed(pub usize);

impl Resource for Tracked {
    type Error = CloseFailed;

    fn close(self) -> Result<(), CloseFailed> {
        *self.tracker.closed.lock().unwrap().entry(self.id).or_insert(0) += 1;
        if self.tracker.fail_close.load(Ordering::SeqCst) {
            Err(CloseFailed(self.id))
        } else {
            Ok(())
        }
    }
}

#[allow(unused)]
pub fn tracked_config(tracker: &Arc<Tracker>) -> PoolConfig<Tracked, String> {
    let tracker = tracker.clone();
    PoolConfig::new(move || Ok(tracker.create()))
}
