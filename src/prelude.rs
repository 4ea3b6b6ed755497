//! Everything needed to write a decorator and a record for it.
//!
//! ```
//! use veneer::prelude::*;
//! ```

pub use crate::decorator::validations::{Inclusion, Length, Presence};
pub use crate::{
    Attributes, Config, Decoration, Decorator, DecoratorClass, DecoratorMut, DecoratorRef,
    Definition, Errors, Flow, Model, ModelClass, ModelName, Record, Result, Transactional, Value,
    VeneerError, decorator_class,
};
