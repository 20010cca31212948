//! Advisory, named mutual-exclusion locks backed by atomic directory creation.
//!
//! The lock namespace is shared across independent processes: whoever manages
//! to create the marker directory holds the lock, so the filesystem itself is
//! the compare-and-swap. There is no queueing, no fairness, and no expiry —
//! acquisition failure is immediate and callers decide whether to retry. A
//! marker left behind by a crashed holder must be cleared by an operator.
//!
//! Providers are injected rather than reached through a process-wide
//! singleton so tests can substitute an in-memory implementation.

use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::errors::LockError;

/// Capability for acquiring and releasing named advisory locks.
pub trait LockProvider: Send + Sync {
    /// Attempt to take the lock for `resource`.
    ///
    /// Succeeds iff no other holder currently owns it; fails immediately with
    /// `LockError::Held` otherwise. No blocking, no retry, no timeout.
    fn try_acquire(&self, resource: &str) -> Result<(), LockError>;

    /// Release the lock for `resource`.
    ///
    /// Idempotent and fault-tolerant: releasing a lock whose marker is
    /// already gone (manual cleanup after a crash) is not an error.
    fn release(&self, resource: &str);
}

/// Run `body` while holding the lock for `resource`.
///
/// The lock is released on every exit path of `body` — normal return, error,
/// or panic — before the outcome propagates.
pub fn with_lock<T, E, F>(locks: &dyn LockProvider, resource: &str, body: F) -> Result<T, E>
where
    E: From<LockError>,
    F: FnOnce() -> Result<T, E>,
{
    locks.try_acquire(resource)?;
    let _guard = ReleaseGuard { locks, resource };
    body()
}

struct ReleaseGuard<'a> {
    locks: &'a dyn LockProvider,
    resource: &'a str,
}

impl Drop for ReleaseGuard<'_> {
    fn drop(&mut self) {
        self.locks.release(self.resource);
    }
}

/// Production provider: one marker directory per resource under a shared,
/// well-known lock directory. `create_dir` fails if the marker exists, which
/// makes acquisition atomic across processes with no coordination service.
pub struct DirLockProvider {
    lock_dir: PathBuf,
}

impl DirLockProvider {
    pub fn new(lock_dir: impl Into<PathBuf>) -> Self {
        Self {
            lock_dir: lock_dir.into(),
        }
    }

    /// Provider over the default machine-wide lock namespace.
    pub fn shared() -> Self {
        Self::new(std::env::temp_dir().join("agent-factory-locks"))
    }

    fn marker_path(&self, resource: &str) -> PathBuf {
        self.lock_dir.join(format!("{resource}.lock"))
    }
}

impl LockProvider for DirLockProvider {
    fn try_acquire(&self, resource: &str) -> Result<(), LockError> {
        fs::create_dir_all(&self.lock_dir).map_err(|source| LockError::MarkerFailed {
            path: self.lock_dir.clone(),
            source,
        })?;

        let marker = self.marker_path(resource);
        match fs::create_dir(&marker) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                Err(LockError::Held(resource.to_string()))
            }
            Err(source) => Err(LockError::MarkerFailed {
                path: marker,
                source,
            }),
        }
    }

    fn release(&self, resource: &str) {
        // Best-effort: a marker already removed by an operator is fine.
        let _ = fs::remove_dir(self.marker_path(resource));
    }
}

/// In-memory provider with explicit compare-and-swap semantics, for tests.
#[derive(Default)]
pub struct MemoryLockProvider {
    held: Mutex<HashSet<String>>,
}

impl MemoryLockProvider {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LockProvider for MemoryLockProvider {
    fn try_acquire(&self, resource: &str) -> Result<(), LockError> {
        let mut held = match self.held.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if held.insert(resource.to_string()) {
            Ok(())
        } else {
            Err(LockError::Held(resource.to_string()))
        }
    }

    fn release(&self, resource: &str) {
        let mut held = match self.held.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        held.remove(resource);
    }
}
