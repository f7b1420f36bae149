//! A bounded pool of reusable, closable resources.
//!
//! A [`Pool`] holds at most `capacity` idle resources in a bounded queue.
//! Callers borrow a resource with [`Pool::acquire`], return it with
//! [`Pool::release`], and shut the pool down with [`Pool::close`]. Once
//! closed, every buffered resource is closed, later releases close their
//! resource instead of buffering it, and every acquire fails with
//! [`AcquireError::PoolClosed`].

mod pool;
pub use self::pool::{Acquire, AcquireError, BuildError, Pool, PoolConfig};

mod resource;
pub use self::resource::{Managed, Resource};

mod util;
