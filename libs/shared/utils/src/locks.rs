use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::debug;

/// Per-doctor critical sections for check-then-write scheduling operations.
///
/// Holding the guard for a doctor serializes every availability and
/// appointment write for that doctor. Different doctors never contend.
#[derive(Debug, Default)]
pub struct DoctorLocks {
    slots: Mutex<HashMap<i64, Arc<AsyncMutex<()>>>>,
}

impl DoctorLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `doctor_id`'s schedule.
    pub async fn acquire(&self, doctor_id: i64) -> OwnedMutexGuard<()> {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            // Entries only referenced by the map have no holder and no waiter.
            slots.retain(|id, lock| *id == doctor_id || Arc::strong_count(lock) > 1);
            Arc::clone(slots.entry(doctor_id).or_default())
        };

        let guard = slot.lock_owned().await;
        debug!("Scheduling lock acquired for doctor {}", doctor_id);
        guard
    }

    /// Number of doctors with a live lock entry.
    pub fn tracked_doctors(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
