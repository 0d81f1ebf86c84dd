//! Configuration for the server, worker pool, and simulated work.

pub mod app;

pub use app::{AppConfig, PoolConfig, ServerConfig, TaskConfig};
