//! Expiry Sweep Task
//!
//! Background sweep that periodically evicts expired cache entries, either as
//! a task on the caller's Tokio runtime or on a dedicated thread.

use std::io;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Weak};
use std::thread;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::MemoryStore;

// == Sweep Handle ==
/// Handle to a running sweep, however it was started.
#[derive(Debug)]
pub enum SweepHandle {
    /// Task on a Tokio runtime
    Task(JoinHandle<()>),
    /// Dedicated OS thread; dropping the sender stops it
    Thread {
        stop: Option<mpsc::Sender<()>>,
        thread: thread::JoinHandle<()>,
    },
}

impl SweepHandle {
    /// Returns true while the sweep is still running.
    pub fn is_running(&self) -> bool {
        match self {
            SweepHandle::Task(handle) => !handle.is_finished(),
            SweepHandle::Thread { thread, .. } => !thread.is_finished(),
        }
    }

    /// Stops the sweep without waiting for it to exit.
    pub fn stop(&mut self) {
        match self {
            SweepHandle::Task(handle) => handle.abort(),
            SweepHandle::Thread { stop, .. } => {
                // Disconnecting wakes the thread immediately
                stop.take();
            }
        }
    }
}

/// Starts a sweep on the current Tokio runtime, or on a dedicated thread
/// when called outside one.
///
/// Returns `None` only if the OS refuses to spawn the thread; expired
/// entries are then still evicted lazily on read.
pub fn spawn_sweep(store: &Arc<RwLock<MemoryStore>>, interval: Duration) -> Option<SweepHandle> {
    if Handle::try_current().is_ok() {
        return Some(SweepHandle::Task(spawn_sweep_task(store, interval)));
    }

    match spawn_sweep_thread(store, interval) {
        Ok(handle) => Some(handle),
        Err(err) => {
            warn!("Failed to spawn expiry sweep thread: {}", err);
            None
        }
    }
}

/// Spawns a background task that periodically evicts expired entries.
///
/// The task sleeps for `interval` between runs and holds the write lock only
/// while removing expired entries. It keeps a weak reference to the store and
/// exits on its own once the store is dropped; the returned handle can also
/// be aborted directly.
///
/// Must be called from within a Tokio runtime.
pub fn spawn_sweep_task(store: &Arc<RwLock<MemoryStore>>, interval: Duration) -> JoinHandle<()> {
    let weak: Weak<RwLock<MemoryStore>> = Arc::downgrade(store);

    tokio::spawn(async move {
        info!("Starting expiry sweep with interval of {:?}", interval);

        loop {
            tokio::time::sleep(interval).await;

            let Some(store) = weak.upgrade() else {
                debug!("Cache store dropped, stopping expiry sweep");
                break;
            };

            let removed = store.write().await.cleanup_expired();
            log_sweep(removed);
        }
    })
}

/// Runs the sweep on its own thread, for caches built outside a runtime.
///
/// The thread waits on a stop channel with `interval` as the timeout, so
/// [`SweepHandle::stop`] ends it without waiting out the interval.
pub fn spawn_sweep_thread(
    store: &Arc<RwLock<MemoryStore>>,
    interval: Duration,
) -> io::Result<SweepHandle> {
    let weak: Weak<RwLock<MemoryStore>> = Arc::downgrade(store);
    let (stop_tx, stop_rx) = mpsc::channel::<()>();

    let thread = thread::Builder::new()
        .name("cache-sweep".to_string())
        .spawn(move || {
            info!(
                "Starting expiry sweep thread with interval of {:?}",
                interval
            );

            loop {
                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {}
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                        debug!("Expiry sweep thread stopped");
                        break;
                    }
                }

                let Some(store) = weak.upgrade() else {
                    debug!("Cache store dropped, stopping expiry sweep");
                    break;
                };

                let removed = store.blocking_write().cleanup_expired();
                log_sweep(removed);
            }
        })?;

    Ok(SweepHandle::Thread {
        stop: Some(stop_tx),
        thread,
    })
}

fn log_sweep(removed: usize) {
    if removed > 0 {
        info!("Expiry sweep: removed {} expired entries", removed);
    } else {
        debug!("Expiry sweep: no expired entries found");
    }
}
