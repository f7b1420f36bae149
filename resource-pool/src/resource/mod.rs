use std::fmt::Debug;

mod managed;
pub use managed::Managed;

/// A resource which can be held by a [`Pool`](crate::Pool).
///
/// The pool never inspects a resource, it only stores it and eventually
/// closes it. Closing consumes the resource.
pub trait Resource {
    /// The error produced when closing fails
    type Error: Debug;

    /// Close the resource, releasing anything it holds.
    fn close(self) -> Result<(), Self::Error>;
}

impl<R: Resource> Resource for Box<R> {
    type Error = R::Error;

    fn close(self) -> Result<(), Self::Error> {
        (*self).close()
    }
}
