use std::fmt::{self, Debug, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

use futures_lite::future;

use super::error::AcquireError;
use super::pool::Pool;
use super::wait::WaitId;
use crate::resource::Resource;
use crate::util::block_on_deadline;

/// A Future resolving to a resource or an `AcquireError`.
///
/// The future only completes once a resource is available or the pool is
/// closed. Dropping it abandons the wait.
pub struct Acquire<T: Resource, E> {
    pool: Pool<T, E>,
    done: bool,
    wait_id: Option<WaitId>,
}

impl<T: Resource, E> Acquire<T, E> {
    pub(crate) fn new(pool: Pool<T, E>) -> Self {
        Self {
            pool,
            done: false,
            wait_id: None,
        }
    }

    fn complete(
        &mut self,
        result: Result<T, AcquireError<E>>,
    ) -> Poll<Result<T, AcquireError<E>>> {
        if let Some(id) = self.wait_id.take() {
            self.pool.inner.waiters.cancel(id);
        }
        self.done = true;
        Poll::Ready(result)
    }

    /// Block the current thread until a resource is acquired, the pool is
    /// closed, or the pool's configured acquire timeout expires.
    pub fn wait(self) -> Result<T, AcquireError<E>> {
        match self.pool.inner.acquire_timeout() {
            Some(timeout) => self.wait_timeout(timeout),
            None => future::block_on(self),
        }
    }

    pub fn wait_timeout(self, timeout: Duration) -> Result<T, AcquireError<E>> {
        match Instant::now().checked_add(timeout) {
            Some(expire) => self.wait_deadline(expire),
            // too far in the future to represent, wait indefinitely
            None => future::block_on(self),
        }
    }

    pub fn wait_deadline(self, expire: Instant) -> Result<T, AcquireError<E>> {
        match block_on_deadline(self, expire) {
            Ok(result) => result,
            // dropping the future removes its registration
            Err(_acquire) => Err(AcquireError::Timeout),
        }
    }
}

impl<T: Resource, E> Future for Acquire<T, E> {
    type Output = Result<T, AcquireError<E>>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        if this.done {
            // future already completed
            return Poll::Ready(Err(AcquireError::PoolClosed));
        }

        match this.pool.try_acquire() {
            Ok(Some(res)) => return this.complete(Ok(res)),
            Ok(None) => (),
            Err(err) => return this.complete(Err(err)),
        }

        let id = this.pool.inner.waiters.register(this.wait_id, cx.waker());
        this.wait_id.replace(id);

        // Check again in case a resource was released or the pool was closed
        // before the waiter was registered
        match this.pool.try_acquire() {
            Ok(Some(res)) => this.complete(Ok(res)),
            Ok(None) => Poll::Pending,
            Err(err) => this.complete(Err(err)),
        }
    }
}

impl<T: Resource, E> Drop for Acquire<T, E> {
    fn drop(&mut self) {
        if let Some(id) = self.wait_id.take() {
            if !self.pool.inner.waiters.cancel(id) {
                // Notified but never completed, pass the notification on
                self.pool.inner.waiters.notify_one();
            }
        }
    }
}

impl<T: Resource, E> Debug for Acquire<T, E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Acquire")
            .field("done", &self.done)
            .field("waiting", &self.wait_id.is_some())
            .finish()
    }
}
