use std::fmt::{self, Debug, Formatter};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex, MutexGuard,
};
use std::time::Duration;

use concurrent_queue::{ConcurrentQueue, PopError, PushError};
use log::{debug, trace, warn};

use super::acquire::Acquire;
use super::config::PoolConfig;
use super::error::{AcquireError, BuildError};
use super::wait::WaitQueue;
use crate::resource::{Managed, Resource};

pub type CreateFn<T, E> = Box<dyn Fn() -> Result<T, E> + Send + Sync>;

pub type ErrorFn<E> = Box<dyn Fn(E) + Send + Sync>;

pub(crate) struct PoolInternal<T: Resource, E> {
    acquire_timeout: Option<Duration>,
    capacity: usize,
    // Guards the transition into the closed state. Release and close both
    // decide under this lock, so nothing is pushed after the drain begins.
    closed: Mutex<bool>,
    count: AtomicUsize,
    create: CreateFn<T, E>,
    create_on_demand: bool,
    handle_error: Option<ErrorFn<T::Error>>,
    idle: ConcurrentQueue<T>,
    pub(super) waiters: WaitQueue,
}

impl<T: Resource, E> PoolInternal<T, E> {
    pub fn new(
        acquire_timeout: Option<Duration>,
        capacity: usize,
        create: CreateFn<T, E>,
        create_on_demand: bool,
        handle_error: Option<ErrorFn<T::Error>>,
    ) -> Self {
        Self {
            acquire_timeout,
            capacity,
            closed: Mutex::new(false),
            count: AtomicUsize::new(0),
            create,
            create_on_demand,
            handle_error,
            idle: ConcurrentQueue::bounded(capacity),
            waiters: WaitQueue::new(),
        }
    }

    pub fn acquire_timeout(&self) -> Option<Duration> {
        self.acquire_timeout
    }

    pub fn close(&self) -> bool {
        let mut closed = self.lock_closed();
        if *closed {
            return false;
        }
        *closed = true;

        // After this point every push fails, so the drain below sees the
        // final contents of the queue.
        self.idle.close();
        let mut drained = Vec::with_capacity(self.idle.len());
        while let Ok(res) = self.idle.pop() {
            drained.push(res);
        }
        drop(closed);

        let woken = self.waiters.notify_all();
        let drained_count = drained.len();
        for res in drained {
            self.dispose(res);
        }
        debug!(
            "Closed resource pool: {} idle resources closed, {} waiters released",
            drained_count, woken
        );
        true
    }

    fn decrement_count(&self) {
        // Resources released into the pool from elsewhere were never counted
        self.count
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |c| c.checked_sub(1))
            .ok();
    }

    pub fn dispose(&self, res: T) {
        if let Err(err) = res.close() {
            match self.handle_error.as_ref() {
                Some(handler) => handler(err),
                None => warn!("Error closing pooled resource: {:?}", err),
            }
        }
        self.decrement_count();
        if self.create_on_demand && !self.is_closed() {
            // A slot was freed, let a waiter create a replacement
            self.waiters.notify_one();
        }
    }

    /// Create the initial set of idle resources.
    pub fn fill(&self, count: usize) -> Result<(), E> {
        for _ in 0..count {
            let res = (self.create)()?;
            self.count.fetch_add(1, Ordering::AcqRel);
            match self.idle.push(res) {
                Ok(()) => (),
                Err(PushError::Full(res)) | Err(PushError::Closed(res)) => self.dispose(res),
            }
        }
        debug!("Filled resource pool with {} resources", count);
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.idle.is_closed()
    }

    fn lock_closed(&self) -> MutexGuard<'_, bool> {
        // a panicking close callback must not wedge the pool
        self.closed
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn release(&self, res: T) {
        let rejected = {
            let closed = self.lock_closed();
            if *closed {
                Some(res)
            } else {
                match self.idle.push(res) {
                    Ok(()) => None,
                    Err(PushError::Full(res)) | Err(PushError::Closed(res)) => Some(res),
                }
            }
        };
        match rejected {
            None => {
                trace!("Release: returned to idle queue");
                self.waiters.notify_one();
            }
            Some(res) => {
                trace!("Release: closing");
                self.dispose(res);
            }
        }
    }

    pub fn try_acquire(&self) -> Result<Option<T>, AcquireError<E>> {
        match self.idle.pop() {
            Ok(res) => {
                if self.is_closed() {
                    // Popped while the pool was being drained
                    self.dispose(res);
                    Err(AcquireError::PoolClosed)
                } else {
                    trace!("Acquire: idle resource");
                    Ok(Some(res))
                }
            }
            Err(PopError::Closed) => Err(AcquireError::PoolClosed),
            Err(PopError::Empty) if self.create_on_demand => self.try_create(),
            Err(PopError::Empty) => Ok(None),
        }
    }

    fn try_create(&self) -> Result<Option<T>, AcquireError<E>> {
        let mut count = self.count.load(Ordering::Acquire);
        loop {
            if count >= self.capacity {
                return Ok(None);
            }
            match self.count.compare_exchange_weak(
                count,
                count + 1,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => break,
                Err(c) => count = c,
            }
        }

        match (self.create)() {
            Ok(res) => {
                if self.is_closed() {
                    self.dispose(res);
                    Err(AcquireError::PoolClosed)
                } else {
                    trace!("Acquire: created resource");
                    Ok(Some(res))
                }
            }
            Err(err) => {
                self.decrement_count();
                self.waiters.notify_one();
                Err(AcquireError::ResourceError(err))
            }
        }
    }
}

impl<T: Resource, E> Drop for PoolInternal<T, E> {
    fn drop(&mut self) {
        self.close();
    }
}

/// A bounded pool of resources of type `T`, created by a factory which
/// fails with errors of type `E`.
///
/// Cloning a `Pool` produces another handle to the same pool. When the last
/// handle is dropped the pool is closed.
pub struct Pool<T: Resource, E> {
    pub(crate) inner: Arc<PoolInternal<T, E>>,
}

impl<T: Resource, E> Pool<T, E> {
    /// Create a pool holding up to `capacity` resources, filled by calling
    /// `create` once per slot.
    pub fn new<C>(create: C, capacity: usize) -> Result<Self, BuildError<E>>
    where
        C: Fn() -> Result<T, E> + Send + Sync + 'static,
    {
        PoolConfig::new(create).capacity(capacity).build()
    }

    pub(crate) fn from_internal(inner: PoolInternal<T, E>) -> Self {
        Self {
            inner: Arc::new(inner),
        }
    }

    /// Returns an `Acquire<T, E>`, a `Future` which resolves to a resource
    /// removed from the pool, or an `AcquireError<E>`. Use `Acquire::wait`
    /// to block the current thread instead.
    pub fn acquire(&self) -> Acquire<T, E> {
        Acquire::new(self.clone())
    }

    /// Take an idle resource without waiting. Returns `Ok(None)` when no
    /// resource is available.
    pub fn try_acquire(&self) -> Result<Option<T>, AcquireError<E>> {
        self.inner.try_acquire()
    }

    /// Return a resource to the pool. If the pool is closed or already full
    /// then the resource is closed instead. This never blocks.
    pub fn release(&self, res: T) {
        self.inner.release(res)
    }

    /// Close the pool and every idle resource. Resources currently held by
    /// callers are closed when they are released. Returns `false` if the
    /// pool was already closed.
    pub fn close(&self) -> bool {
        self.inner.close()
    }

    /// Wrap a resource so that it is released back to this pool on drop.
    pub fn managed(&self, res: T) -> Managed<T, E> {
        Managed::new(res, self.clone())
    }

    pub(crate) fn dispose(&self, res: T) {
        self.inner.dispose(res)
    }

    pub fn capacity(&self) -> usize {
        self.inner.capacity
    }

    /// Fetch the number of resources created by this pool which have not
    /// yet been closed by it.
    pub fn count(&self) -> usize {
        self.inner.count.load(Ordering::Acquire)
    }

    /// Fetch the number of resources currently waiting in the pool.
    pub fn idle_count(&self) -> usize {
        self.inner.idle.len()
    }

    pub fn is_closed(&self) -> bool {
        self.inner.is_closed()
    }
}

impl<T: Resource, E> Clone for Pool<T, E> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Resource, E> Debug for Pool<T, E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pool")
            .field("capacity", &self.capacity())
            .field("count", &self.count())
            .field("idle", &self.idle_count())
            .field("closed", &self.is_closed())
            .field("waiters", &self.inner.waiters)
            .finish()
    }
}
