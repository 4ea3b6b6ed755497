// ============================================================================
// Transaction Boundary
// ============================================================================
//
// The decorator never writes anything itself. It brackets callbacks and the
// delegated save/destroy in a transaction provided by the persistence
// collaborator, through the `Transactional` facility below.
//
// ============================================================================

pub mod scope;
pub mod state;

pub use scope::TransactionScope;
pub use state::{TransactionId, TransactionState};

use crate::core::Result;

/// Transaction facility of the persistence collaborator.
///
/// Implementations decide how nested `begin` calls behave. A `commit` that
/// returns an error must not leave the transaction open.
pub trait Transactional: Send + Sync {
    fn begin(&self) -> Result<()>;
    fn commit(&self) -> Result<()>;
    fn rollback(&self) -> Result<()>;
    fn in_transaction(&self) -> bool;
}
