//! Collaborator interface for decorated records.
//!
//! Anything a decorator can wrap implements [`Record`]: plain persisted
//! records and decorators themselves. Named attribute access goes through
//! [`Attributes`], usually generated with `#[derive(Attributes)]`.

use crate::core::{Errors, ModelName, Result, Value};
use crate::transaction::Transactional;
use std::sync::Arc;

/// Named getter/setter access to a record's attributes.
pub trait Attributes {
    fn attribute_names(&self) -> Vec<String>;

    /// Reads `name`, or fails with `VeneerError::UnknownAttribute`.
    fn read_attribute(&self, name: &str) -> Result<Value>;

    /// Writes `name`, or fails with `VeneerError::UnknownAttribute` /
    /// `VeneerError::TypeMismatch`.
    fn write_attribute(&mut self, name: &str, value: Value) -> Result<()>;

    fn has_attribute(&self, name: &str) -> bool {
        self.attribute_names().iter().any(|attr| attr == name)
    }
}

/// A persisted domain record as seen by the decorator layer.
pub trait Record: Attributes {
    /// Innermost non-decorator record type. Plain records use `Self`.
    type Base: Record;

    fn base(&self) -> &Self::Base;
    fn base_mut(&mut self) -> &mut Self::Base;

    fn save(&mut self) -> Result<bool>;
    fn destroy(&mut self) -> Result<bool>;
    fn is_valid(&mut self) -> Result<bool>;
    fn errors(&self) -> &Errors;
    fn is_persisted(&self) -> bool;

    fn is_new_record(&self) -> bool {
        !self.is_persisted()
    }

    fn model_name(&self) -> ModelName;

    /// Transaction facility that owns this record's writes.
    fn connection(&self) -> Arc<dyn Transactional>;
}
