//! Infrastructure adapters for task storage.

pub mod store;

pub use store::InMemoryTaskStore;
