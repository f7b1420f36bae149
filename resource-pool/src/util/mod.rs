mod thread_waker;
pub use thread_waker::block_on_deadline;
