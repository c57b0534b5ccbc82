//! Signature-keyed debouncing of deferred function calls.
//!
//! This module defers invocations tagged with a serializable signature:
//! - Per-signature pending state (last call wins)
//! - Timer reset on repeated calls within the delay window
//! - Explicit cancellation, per signature or wholesale
//! - Optional immediate firing that discards pending work for the signature

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use serde::Serialize;
use tokio::task::JoinHandle;

use crate::error::SignatureError;
use crate::signature::canonical_key;

/// Default debounce duration (milliseconds) when a call supplies none.
pub const DEFAULT_DEBOUNCE_MS: u64 = 1000;

/// Options recognized by [`Debouncer::run_with`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Invoke the function synchronously instead of scheduling it. Any
    /// pending invocation for the same signature is discarded without firing.
    pub fire_now: bool,
}

/// A pending deferred invocation: the sleeping timer task plus the
/// generation it was scheduled under.
#[derive(Debug)]
struct PendingRun {
    generation: u64,
    handle: JoinHandle<()>,
}

/// Debounces function invocations keyed by a canonicalized signature.
///
/// The debouncer owns a map from canonical signature key to the timer task
/// that will eventually invoke the stored function. At most one invocation
/// is pending per signature; a repeated [`run`](Debouncer::run) replaces the
/// pending one and restarts its window. Calls for canonically distinct
/// signatures never interfere with each other.
///
/// Dropping the debouncer aborts every pending timer task; none of their
/// functions run.
#[derive(Debug)]
pub struct Debouncer {
    /// Pending timer tasks keyed by canonical signature
    pending: Arc<StdMutex<HashMap<String, PendingRun>>>,
    /// Duration used when a call does not supply one
    default_duration: Duration,
    /// Distinguishes a timer task from its replacement under the same key
    next_generation: AtomicU64,
}

impl Debouncer {
    /// Create a new debouncer with the default duration of 1000 ms.
    pub fn new() -> Self {
        Self {
            pending: Arc::new(StdMutex::new(HashMap::new())),
            default_duration: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            next_generation: AtomicU64::new(0),
        }
    }

    /// Set the duration used when `run` is called without an explicit one.
    pub fn with_default_duration(mut self, duration: Duration) -> Self {
        self.default_duration = duration;
        self
    }

    /// The duration used when a call does not supply one.
    pub fn default_duration(&self) -> Duration {
        self.default_duration
    }

    /// Schedule `func` to run after `duration`, debounced by `signature`.
    ///
    /// If an invocation is already pending for an equivalent signature, its
    /// timer is discarded without firing and the window restarts from this
    /// call. When the timer fires, `func` is invoked on the timer task and
    /// the pending entry is removed.
    ///
    /// Note: this is a fire-and-forget method. It returns immediately after
    /// scheduling; a panic in `func` propagates inside the timer task, never
    /// to this caller.
    ///
    /// # Arguments
    /// * `func` - Zero-argument function to execute after the window elapses
    /// * `signature` - Serializable value identifying the debounce slot
    /// * `duration` - Delay before firing; `None` uses the instance default
    ///
    /// # Errors
    /// Returns [`SignatureError`] when `signature` cannot be canonicalized.
    ///
    /// # Panics
    /// Panics if called outside a Tokio runtime.
    pub fn run<F, S>(
        &self,
        func: F,
        signature: &S,
        duration: Option<Duration>,
    ) -> Result<(), SignatureError>
    where
        F: FnOnce() + Send + 'static,
        S: Serialize + ?Sized,
    {
        self.run_with(func, signature, duration, RunOptions::default())
    }

    /// [`run`](Debouncer::run) with explicit options.
    ///
    /// With `fire_now` set, any pending invocation for the signature is
    /// discarded first, then `func` runs synchronously before this method
    /// returns. No timer is scheduled and no entry is left pending, so the
    /// `fire_now` path works outside a Tokio runtime as well.
    pub fn run_with<F, S>(
        &self,
        func: F,
        signature: &S,
        duration: Option<Duration>,
        options: RunOptions,
    ) -> Result<(), SignatureError>
    where
        F: FnOnce() + Send + 'static,
        S: Serialize + ?Sized,
    {
        let key = canonical_key(signature)?;

        if options.fire_now {
            let reset = self.remove_pending(&key);
            tracing::debug!(key = %key, reset, "firing immediately");
            // Lock released above: func may reenter this debouncer.
            func();
            return Ok(());
        }

        let duration = duration.unwrap_or(self.default_duration);
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let pending = Arc::clone(&self.pending);
        let task_key = key.clone();

        let mut map = self.pending.lock().unwrap();
        if let Some(prev) = map.remove(&key) {
            prev.handle.abort();
            tracing::trace!(key = %key, "debounce window reset");
        }

        let handle = tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            tracing::trace!(key = %task_key, "debounce window elapsed, invoking");
            func();
            // Remove our own entry, unless a later call already replaced it.
            let mut map = pending.lock().unwrap();
            if map
                .get(&task_key)
                .is_some_and(|run| run.generation == generation)
            {
                map.remove(&task_key);
            }
        });

        map.insert(key, PendingRun { generation, handle });
        Ok(())
    }

    /// Cancel the pending invocation for `signature`, if any.
    ///
    /// The stored function is never invoked. Cancelling a signature with
    /// nothing pending is a no-op.
    ///
    /// # Errors
    /// Returns [`SignatureError`] when `signature` cannot be canonicalized.
    pub fn cancel<S>(&self, signature: &S) -> Result<(), SignatureError>
    where
        S: Serialize + ?Sized,
    {
        let key = canonical_key(signature)?;
        if self.remove_pending(&key) {
            tracing::debug!(key = %key, "pending invocation cancelled");
        }
        Ok(())
    }

    /// Cancel every pending invocation.
    pub fn cancel_all(&self) {
        let drained: Vec<PendingRun> = {
            let mut map = self.pending.lock().unwrap();
            map.drain().map(|(_, run)| run).collect()
        };
        if !drained.is_empty() {
            tracing::debug!(count = drained.len(), "cancelled all pending invocations");
        }
        for run in drained {
            run.handle.abort();
        }
    }

    /// Number of signatures with an invocation currently pending.
    pub fn pending_count(&self) -> usize {
        self.pending.lock().unwrap().len()
    }

    /// Whether an invocation is pending for `signature`.
    ///
    /// # Errors
    /// Returns [`SignatureError`] when `signature` cannot be canonicalized.
    pub fn is_pending<S>(&self, signature: &S) -> Result<bool, SignatureError>
    where
        S: Serialize + ?Sized,
    {
        let key = canonical_key(signature)?;
        Ok(self.pending.lock().unwrap().contains_key(&key))
    }

    /// Shared cleanup for `cancel` and the `fire_now` path: abort and remove
    /// the entry for `key` if present. Returns whether an entry was removed.
    fn remove_pending(&self, key: &str) -> bool {
        match self.pending.lock().unwrap().remove(key) {
            Some(run) => {
                run.handle.abort();
                true
            }
            None => false,
        }
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
