use std::time::Duration;

use log::debug;

use super::error::BuildError;
use super::pool::{CreateFn, ErrorFn, Pool, PoolInternal};
use crate::resource::Resource;

/// Builder for a [`Pool`] instance.
///
/// By default the pool is filled to capacity when it is built and the
/// factory is not called again: the pool caps a fixed set of resources.
/// Enable `create_on_demand` to have an empty pool create resources while
/// fewer than `capacity` are live.
pub struct PoolConfig<T: Resource, E> {
    acquire_timeout: Option<Duration>,
    capacity: usize,
    create: CreateFn<T, E>,
    create_on_demand: bool,
    handle_error: Option<ErrorFn<T::Error>>,
    prefill: Option<usize>,
}

impl<T: Resource, E> PoolConfig<T, E> {
    pub fn new<C>(create: C) -> Self
    where
        C: Fn() -> Result<T, E> + Send + Sync + 'static,
    {
        Self {
            acquire_timeout: None,
            capacity: 0,
            create: Box::new(create),
            create_on_demand: false,
            handle_error: None,
            prefill: None,
        }
    }

    /// Set the default timeout for `Acquire::wait`. A zero duration waits
    /// indefinitely.
    pub fn acquire_timeout(mut self, val: Duration) -> Self {
        if val.as_micros() > 0 {
            self.acquire_timeout.replace(val);
        } else {
            self.acquire_timeout.take();
        }
        self
    }

    pub fn capacity(mut self, val: usize) -> Self {
        self.capacity = val;
        self
    }

    pub fn create_on_demand(mut self, val: bool) -> Self {
        self.create_on_demand = val;
        self
    }

    /// Observe failures when the pool closes a resource. Without a handler
    /// these are logged and otherwise ignored.
    pub fn handle_error<F>(mut self, handler: F) -> Self
    where
        F: Fn(T::Error) + Send + Sync + 'static,
    {
        self.handle_error.replace(Box::new(handler));
        self
    }

    /// Set the number of resources created when the pool is built. Defaults
    /// to the capacity.
    pub fn prefill(mut self, val: usize) -> Self {
        self.prefill.replace(val);
        self
    }

    pub fn build(self) -> Result<Pool<T, E>, BuildError<E>> {
        if self.capacity == 0 {
            return Err(BuildError::InvalidArgument(
                "capacity must be positive".to_string(),
            ));
        }
        let prefill = self.prefill.unwrap_or(self.capacity);
        if prefill > self.capacity {
            return Err(BuildError::InvalidArgument(format!(
                "prefill count ({}) exceeds capacity ({})",
                prefill, self.capacity
            )));
        }

        let inner = PoolInternal::new(
            self.acquire_timeout,
            self.capacity,
            self.create,
            self.create_on_demand,
            self.handle_error,
        );
        if let Err(err) = inner.fill(prefill) {
            // close anything created before the failure
            inner.close();
            return Err(BuildError::ResourceError(err));
        }
        debug!(
            "Created resource pool: capacity {}, on-demand creation {}",
            self.capacity, self.create_on_demand
        );
        Ok(Pool::from_internal(inner))
    }
}
