//! Bounded admission gate
//!
//! A fixed number of slots shared by every reconciliation in a run. The gate
//! is created per run and handed to tasks by reference; it is never global.

use crate::metrics;
use crate::{ReposyncError, Result};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::{Semaphore, SemaphorePermit};

/// Admits at most `capacity` holders at once, in arrival order
#[derive(Debug)]
pub struct AdmissionGate {
    semaphore: Semaphore,
    capacity: usize,
    active: AtomicUsize,
    peak: AtomicUsize,
    admitted: AtomicUsize,
}

impl AdmissionGate {
    /// Create a gate with `capacity` slots
    ///
    /// A zero-capacity gate never admits anyone; callers validate the
    /// configured capacity first.
    pub fn new(capacity: usize) -> Self {
        Self {
            semaphore: Semaphore::new(capacity),
            capacity,
            active: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
            admitted: AtomicUsize::new(0),
        }
    }

    /// Wait for a free slot
    ///
    /// The slot is released when the returned permit is dropped, on every
    /// exit path.
    pub async fn acquire(&self) -> Result<AdmissionPermit<'_>> {
        let permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|e| ReposyncError::Other(format!("admission gate closed: {}", e)))?;

        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        self.admitted.fetch_add(1, Ordering::SeqCst);
        metrics::set_active(now);

        Ok(AdmissionPermit {
            gate: self,
            _permit: permit,
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Holders right now
    pub fn active(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    /// Highest number of simultaneous holders observed
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    /// Total admissions so far
    pub fn admitted(&self) -> usize {
        self.admitted.load(Ordering::SeqCst)
    }
}

/// One occupied slot of an [`AdmissionGate`]
#[derive(Debug)]
pub struct AdmissionPermit<'a> {
    gate: &'a AdmissionGate,
    // Dropped after `drop` runs, so the active count falls before the slot frees
    _permit: SemaphorePermit<'a>,
}

impl Drop for AdmissionPermit<'_> {
    fn drop(&mut self) {
        let now = self.gate.active.fetch_sub(1, Ordering::SeqCst) - 1;
        metrics::set_active(now);
    }
}
