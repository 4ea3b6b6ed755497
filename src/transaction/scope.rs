use super::{TransactionId, TransactionState, Transactional};
use crate::core::Result;
use std::sync::Arc;
use std::time::Instant;
use tracing::{Level, event};

/// Structured transaction boundary.
///
/// `begin` opens a transaction on the collaborator. The scope must end with
/// [`commit`](Self::commit) or [`rollback`](Self::rollback); a scope dropped
/// while still active (early return, `?`, panic) rolls back.
pub struct TransactionScope {
    id: TransactionId,
    connection: Arc<dyn Transactional>,
    state: TransactionState,
    started: Instant,
}

impl TransactionScope {
    pub fn begin(connection: Arc<dyn Transactional>) -> Result<Self> {
        connection.begin()?;
        let id = TransactionId::new();
        event!(Level::DEBUG, txn = %id, "transaction scope opened");
        Ok(Self {
            id,
            connection,
            state: TransactionState::Active,
            started: Instant::now(),
        })
    }

    pub fn id(&self) -> TransactionId {
        self.id
    }

    pub fn state(&self) -> TransactionState {
        self.state
    }

    pub fn commit(mut self) -> Result<()> {
        let outcome = self.connection.commit();
        // A failed commit leaves nothing open on the collaborator side.
        self.state = if outcome.is_ok() {
            TransactionState::Committed
        } else {
            TransactionState::Aborted
        };
        event!(
            Level::DEBUG,
            txn = %self.id,
            state = %self.state,
            elapsed_us = self.started.elapsed().as_micros() as u64,
            "transaction scope closed"
        );
        outcome
    }

    pub fn rollback(mut self) -> Result<()> {
        self.state = TransactionState::Aborted;
        event!(
            Level::DEBUG,
            txn = %self.id,
            elapsed_us = self.started.elapsed().as_micros() as u64,
            "transaction scope rolled back"
        );
        self.connection.rollback()
    }

    /// Commits when `commit` is true, rolls back otherwise.
    /// Returns whether the scope committed.
    pub fn finish(self, commit: bool) -> Result<bool> {
        if commit {
            self.commit()?;
            Ok(true)
        } else {
            self.rollback()?;
            Ok(false)
        }
    }
}

impl Drop for TransactionScope {
    fn drop(&mut self) {
        if !self.state.is_active() {
            return;
        }
        self.state = TransactionState::Aborted;
        event!(
            Level::WARN,
            txn = %self.id,
            "transaction scope dropped while active; rolling back"
        );
        if let Err(err) = self.connection.rollback() {
            event!(Level::ERROR, txn = %self.id, error = %err, "rollback on drop failed");
        }
    }
}
