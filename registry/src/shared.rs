//! Thread-safe handle around an engine.

use std::sync::{Arc, Mutex, MutexGuard};

use jury_ledger::TokenLedger;
use jury_types::{Clock, Dispute, DisputeId, EventRecord};

use crate::engine::ArbitrationEngine;
use crate::error::ArbitrationError;

/// Cloneable handle that serializes every operation on one engine.
///
/// Each call holds the lock for exactly one operation, so no caller can
/// observe a partially applied mutation. Reads hand back owned snapshots.
pub struct SharedEngine<L, C> {
    inner: Arc<Mutex<ArbitrationEngine<L, C>>>,
}

impl<L, C> Clone for SharedEngine<L, C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<L: TokenLedger, C: Clock> SharedEngine<L, C> {
    pub fn new(engine: ArbitrationEngine<L, C>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, ArbitrationEngine<L, C>>, ArbitrationError> {
        self.inner.lock().map_err(|_| ArbitrationError::Poisoned)
    }

    /// Run one mutating operation under the lock.
    pub fn write<R>(
        &self,
        op: impl FnOnce(&mut ArbitrationEngine<L, C>) -> Result<R, ArbitrationError>,
    ) -> Result<R, ArbitrationError> {
        let mut engine = self.lock()?;
        op(&mut engine)
    }

    /// Run a read-only query under the lock.
    pub fn read<R>(
        &self,
        query: impl FnOnce(&ArbitrationEngine<L, C>) -> R,
    ) -> Result<R, ArbitrationError> {
        let engine = self.lock()?;
        Ok(query(&engine))
    }

    pub fn dispute(&self, id: DisputeId) -> Result<Dispute, ArbitrationError> {
        self.lock()?.dispute(id).cloned()
    }

    pub fn events_since(&self, sequence: u64) -> Result<Vec<EventRecord>, ArbitrationError> {
        Ok(self.lock()?.events_since(sequence).to_vec())
    }
}
