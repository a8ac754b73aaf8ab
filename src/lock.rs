// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use parking_lot::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use crate::error::{LedgerError, LedgerResult};

/// Tenant-wide gate in front of the live store. Every create, update, delete
/// and backup holds it for its whole duration; reads never touch it.
#[derive(Debug)]
pub struct WriteGate {
    inner: Mutex<()>,
    timeout: Duration,
}

/// Proof of exclusive write access. The gate reopens when this is dropped,
/// whichever way the write path exits.
pub struct WriteGuard<'a> {
    _guard: MutexGuard<'a, ()>,
    acquired_at: Instant,
}

impl WriteGate {
    pub fn new(timeout: Duration) -> Self {
        WriteGate {
            inner: Mutex::new(()),
            timeout,
        }
    }

    pub fn acquire(&self) -> LedgerResult<WriteGuard<'_>> {
        self.acquire_within(self.timeout)
    }

    pub fn acquire_within(&self, wait: Duration) -> LedgerResult<WriteGuard<'_>> {
        match self.inner.try_lock_for(wait) {
            Some(guard) => Ok(WriteGuard {
                _guard: guard,
                acquired_at: Instant::now(),
            }),
            None => {
                tracing::warn!(?wait, "write lock timed out");
                Err(LedgerError::LockTimeout(wait))
            }
        }
    }

    pub fn is_locked(&self) -> bool {
        self.inner.is_locked()
    }
}

impl Drop for WriteGuard<'_> {
    fn drop(&mut self) {
        tracing::trace!(held = ?self.acquired_at.elapsed(), "write lock released");
    }
}
