//! Background Tasks Module
//!
//! Contains background tasks that run periodically while a cache is alive.
//!
//! # Tasks
//! - Expiry sweep: evicts expired entries at the configured interval, as a
//!   Tokio task or on a dedicated thread

mod sweep;

pub use sweep::{spawn_sweep, spawn_sweep_task, spawn_sweep_thread, SweepHandle};
