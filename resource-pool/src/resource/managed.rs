use std::fmt::{self, Debug, Display, Formatter};
use std::ops::{Deref, DerefMut};

use super::Resource;
use crate::pool::Pool;

/// A resource which is released back to its pool when dropped.
pub struct Managed<T: Resource, E> {
    pool: Option<Pool<T, E>>,
    value: Option<T>,
}

impl<T: Resource, E> Managed<T, E> {
    pub(crate) fn new(value: T, pool: Pool<T, E>) -> Self {
        Self {
            pool: Some(pool),
            value: Some(value),
        }
    }

    /// Close the resource instead of returning it to the pool.
    pub fn discard(mut mng_self: Self) {
        if let (Some(pool), Some(value)) = (mng_self.pool.take(), mng_self.value.take()) {
            pool.dispose(value);
        }
    }

    /// Detach the resource from the pool. The caller becomes responsible for
    /// releasing or closing it.
    pub fn into_inner(mut mng_self: Self) -> T {
        mng_self.pool.take();
        // note: only empty after drop
        mng_self.value.take().unwrap()
    }
}

impl<T: Resource + Debug, E> Debug for Managed<T, E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            f.debug_struct("Managed")
                .field("value", &self.deref())
                .finish()
        } else {
            Debug::fmt(self.deref(), f)
        }
    }
}

impl<T: Resource + Display, E> Display for Managed<T, E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(self.deref(), f)
    }
}

impl<T: Resource, E> Deref for Managed<T, E> {
    type Target = T;
    fn deref(&self) -> &Self::Target {
        // note: panics after drop when value is taken
        self.value.as_ref().unwrap()
    }
}

impl<T: Resource, E> DerefMut for Managed<T, E> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        // note: panics after drop when value is taken
        self.value.as_mut().unwrap()
    }
}

impl<T: Resource, E> Drop for Managed<T, E> {
    fn drop(&mut self) {
        if let (Some(pool), Some(value)) = (self.pool.take(), self.value.take()) {
            pool.release(value);
        }
    }
}
