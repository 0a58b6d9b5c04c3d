//! Per-key mutual exclusion for billing workflows.
//!
//! Assigning services to a vehicle and invoicing that vehicle must not
//! interleave within one process, otherwise an assignment created mid-invoice
//! could be billed twice or skipped. Parking invoices are serialised per ticket
//! for the same reason.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::domain::{Plate, TicketId};

/// A table of async mutexes, one per key, created on demand.
///
/// Cloning shares the table. Entries nobody holds are pruned on the next
/// acquisition, so the table stays proportional to in-flight workflows.
#[derive(Debug, Clone, Default)]
pub struct KeyedLocks {
    table: Arc<Mutex<HashMap<String, Arc<AsyncMutex<()>>>>>,
}

impl KeyedLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `key`. Released when the guard drops.
    pub async fn acquire(&self, key: &str) -> OwnedMutexGuard<()> {
        let slot = {
            let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
            table.retain(|_, slot| Arc::strong_count(slot) > 1);
            table.entry(key.to_owned()).or_default().clone()
        };
        slot.lock_owned().await
    }

    pub async fn vehicle(&self, plate: &Plate) -> OwnedMutexGuard<()> {
        self.acquire(&format!("vehicle:{plate}")).await
    }

    pub async fn ticket(&self, ticket: TicketId) -> OwnedMutexGuard<()> {
        self.acquire(&format!("ticket:{ticket}")).await
    }

    /// Number of keys currently tracked.
    pub fn len(&self) -> usize {
        self.table
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
