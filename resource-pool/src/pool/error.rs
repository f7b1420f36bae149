use std::fmt::{self, Debug, Display, Formatter};

/// An error during resource acquisition.
pub enum AcquireError<E> {
    /// The resource pool is closed
    PoolClosed,
    /// Wraps an error result from the pool's resource factory
    ResourceError(E),
    /// The acquire timed out
    Timeout,
}

impl<E> AcquireError<E> {
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::PoolClosed)
    }
}

impl<E: Debug> Debug for AcquireError<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self {
            Self::PoolClosed => write!(f, "AcquireError::PoolClosed"),
            Self::ResourceError(err) => f
                .debug_tuple("AcquireError::ResourceError")
                .field(err)
                .finish(),
            Self::Timeout => write!(f, "AcquireError::Timeout"),
        }
    }
}

impl<E: Display> Display for AcquireError<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self {
            Self::PoolClosed => write!(f, "The resource pool is closed"),
            Self::ResourceError(err) => write!(f, "Resource error: {}", err),
            Self::Timeout => write!(f, "The request timed out"),
        }
    }
}

impl<E: Debug + Display> std::error::Error for AcquireError<E> {}

impl<E: PartialEq> PartialEq for AcquireError<E> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::PoolClosed, Self::PoolClosed) => true,
            (Self::Timeout, Self::Timeout) => true,
            (Self::ResourceError(a), Self::ResourceError(b)) => a == b,
            _ => false,
        }
    }
}

/// An error while building a resource pool.
pub enum BuildError<E> {
    /// The pool configuration was rejected
    InvalidArgument(String),
    /// The resource factory failed while filling the pool
    ResourceError(E),
}

impl<E: Debug> Debug for BuildError<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self {
            Self::InvalidArgument(msg) => f
                .debug_tuple("BuildError::InvalidArgument")
                .field(msg)
                .finish(),
            Self::ResourceError(err) => f
                .debug_tuple("BuildError::ResourceError")
                .field(err)
                .finish(),
        }
    }
}

impl<E: Display> Display for BuildError<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self {
            Self::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            Self::ResourceError(err) => write!(f, "Resource error: {}", err),
        }
    }
}

impl<E: Debug + Display> std::error::Error for BuildError<E> {}
