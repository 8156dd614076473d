//! Round-robin credential rotation
//!
//! Sets are taken from the front of a shared queue and put back at the tail
//! once the job holding them finishes. When every set is in use, `checkout`
//! waits for the next return.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::Notify;
use tracing::debug;

use crate::models::CredentialSet;

/// Shared queue of credential sets
#[derive(Debug)]
pub struct CredentialPool {
    queue: Mutex<VecDeque<CredentialSet>>,
    returned: Notify,
}

impl CredentialPool {
    pub fn new(sets: Vec<CredentialSet>) -> Arc<Self> {
        Arc::new(Self {
            queue: Mutex::new(sets.into()),
            returned: Notify::new(),
        })
    }

    /// Take the set at the head of the queue, waiting if all are checked out
    pub async fn checkout(self: &Arc<Self>) -> CredentialLease {
        loop {
            let notified = self.returned.notified();

            if let Some(set) = self.lock().pop_front() {
                debug!("Checked out credential set #{}", set.slot());
                return CredentialLease {
                    pool: Arc::clone(self),
                    set,
                };
            }

            notified.await;
        }
    }

    /// Number of sets currently in the queue
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Slots in queue order, head first
    pub fn slots(&self) -> Vec<usize> {
        self.lock().iter().map(CredentialSet::slot).collect()
    }

    fn checkin(&self, set: CredentialSet) {
        debug!("Returned credential set #{}", set.slot());
        self.lock().push_back(set);
        self.returned.notify_one();
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<CredentialSet>> {
        // The queue holds plain data, so a poisoned lock is still consistent.
        self.queue.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// A checked-out credential set. Dropping the lease appends the set to the
/// tail of the pool's queue.
#[derive(Debug)]
pub struct CredentialLease {
    pool: Arc<CredentialPool>,
    set: CredentialSet,
}

impl CredentialLease {
    pub fn credentials(&self) -> &CredentialSet {
        &self.set
    }

    pub fn slot(&self) -> usize {
        self.credentials().slot()
    }
}

impl Drop for CredentialLease {
    fn drop(&mut self) {
        self.pool.checkin(self.set.clone());
    }
}
