//! Serialization of generator invocations within a process.

use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

/// Mutual exclusion around generator invocations.
///
/// The generator's thread safety is unknown, so every coordinator in the
/// process shares [`GeneratorLock::shared`] unless given its own. Only the
/// generation step is guarded; staging runs without it.
#[derive(Debug, Default)]
pub struct GeneratorLock {
    inner: Mutex<()>,
}

static SHARED: OnceLock<Arc<GeneratorLock>> = OnceLock::new();

impl GeneratorLock {
    /// Creates an independent lock.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide lock.
    pub fn shared() -> Arc<GeneratorLock> {
        Arc::clone(SHARED.get_or_init(|| Arc::new(GeneratorLock::new())))
    }

    /// Blocks until the lock is held.
    ///
    /// A panic in an earlier holder doesn't poison later runs: the lock
    /// guards no data, only the generator call.
    pub fn acquire(&self) -> MutexGuard<'_, ()> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
