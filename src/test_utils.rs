//! Shared test utilities for `smartcube` unit tests.
//!
//! This module provides common test infrastructure used across multiple test modules.
//! It is only compiled during testing (`#[cfg(test)]`).

use crate::config::manager::DATA_DIR_ENV;
use std::sync::Mutex;
use tempfile::TempDir;

/// Global mutex to serialize tests that modify the data directory variable.
static DATA_DIR_LOCK: Mutex<()> = Mutex::new(());

/// Helper function to create a temporary test directory using tempfile.
/// Returns a `TempDir` that automatically cleans up when dropped.
pub fn create_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

/// RAII guard that points `SMART_CUBE_DATA_DIR` at a temp directory for a
/// test scope and restores the original value when dropped.
///
/// `DATA_DIR_LOCK` is held for the guard's lifetime so tests touching the
/// variable run one at a time.
pub struct DataDirGuard {
    original: Option<std::ffi::OsString>,
    _lock: std::sync::MutexGuard<'static, ()>,
}

#[expect(
    unsafe_code,
    reason = "Test-only code that modifies environment variables while holding DATA_DIR_LOCK"
)]
impl DataDirGuard {
    /// Create a new guard that sets the data directory to the given temp directory path.
    pub fn new(temp_dir: &TempDir) -> Self {
        let lock = DATA_DIR_LOCK
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        let original = std::env::var_os(DATA_DIR_ENV);
        // SAFETY: DATA_DIR_LOCK serializes every writer of this variable and
        // no test reads it outside a guard.
        unsafe {
            std::env::set_var(DATA_DIR_ENV, temp_dir.path());
        }
        Self {
            original,
            _lock: lock,
        }
    }
}

#[expect(
    unsafe_code,
    reason = "Test-only code that restores environment variables while holding DATA_DIR_LOCK"
)]
impl Drop for DataDirGuard {
    fn drop(&mut self) {
        // SAFETY: the lock is still held; see `DataDirGuard::new`.
        if let Some(ref original) = self.original {
            unsafe {
                std::env::set_var(DATA_DIR_ENV, original);
            }
        } else {
            unsafe {
                std::env::remove_var(DATA_DIR_ENV);
            }
        }
    }
}
