//! Job dispatch and the worker pool.

pub mod pool;
pub mod worker;

pub use pool::{default_workers, run_pool, PoolConfig, PoolError, PoolRun, PoolStats};
pub use worker::{Job, WorkerReport};
