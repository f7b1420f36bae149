mod acquire;
pub use acquire::Acquire;

mod config;
pub use config::PoolConfig;

mod error;
pub use error::{AcquireError, BuildError};

mod pool;
pub use pool::Pool;

mod wait;
