// ============================================================================
// Veneer Library
// ============================================================================
//
// Decorators for persisted records: a `Decorator` forwards to the record it
// wraps, lets a decoration override attribute access, adds validation rules
// and runs before/after callbacks around validation, save and destroy, with
// save and destroy bracketed by the record's own transaction facility.
//
// ============================================================================

// Lets the derive macros' `::veneer::` paths resolve inside this crate.
extern crate self as veneer;

pub mod core;
pub mod decorator;
pub mod memory;
pub mod prelude;
pub mod record;
pub mod transaction;
mod macros;

pub use crate::core::{Errors, FromValue, Model, ModelName, Result, ToValue, Value, VeneerError};
pub use decorator::class::{config, configure, model_name};
pub use decorator::{
    CallbackChain, ClassId, Config, Decoration, Decorator, DecoratorClass, DecoratorMut,
    DecoratorRef, Definition, Flow, ModelClass, Phase, Validator,
};
pub use memory::MemoryStore;
pub use record::{Attributes, Record};
pub use transaction::{TransactionScope, Transactional};
pub use veneer_derive::{Attributes, Model};
