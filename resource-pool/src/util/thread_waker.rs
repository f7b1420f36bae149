use std::future::Future;
use std::pin::Pin;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::task::{Context, Poll, Wake, Waker};
use std::thread;
use std::time::Instant;

/// Wakes a parked thread. The `notified` flag absorbs wakeups which arrive
/// before the thread parks.
struct ThreadWaker {
    notified: AtomicBool,
    thread: thread::Thread,
}

impl Wake for ThreadWaker {
    fn wake(self: Arc<Self>) {
        self.wake_by_ref()
    }

    fn wake_by_ref(self: &Arc<Self>) {
        if !self.notified.swap(true, Ordering::Release) {
            self.thread.unpark();
        }
    }
}

/// Poll a future on the current thread until it resolves or the deadline
/// passes. On expiry the future is returned so the caller may drop or
/// resume it.
pub fn block_on_deadline<F>(mut fut: F, expire: Instant) -> Result<F::Output, F>
where
    F: Future + Unpin,
{
    let inner = Arc::new(ThreadWaker {
        notified: AtomicBool::new(false),
        thread: thread::current(),
    });
    let waker = Waker::from(inner.clone());
    let mut cx = Context::from_waker(&waker);
    loop {
        if let Poll::Ready(result) = Pin::new(&mut fut).poll(&mut cx) {
            return Ok(result);
        }
        loop {
            if inner.notified.swap(false, Ordering::Acquire) {
                break;
            }
            match expire.checked_duration_since(Instant::now()) {
                Some(dur) => thread::park_timeout(dur),
                None => return Err(fut),
            }
        }
    }
}
