//! Background Tasks Module
//!
//! Helpers for the composition root that owns the cache's lifecycle.

mod cleanup;

pub use cleanup::spawn_cleanup_task;
