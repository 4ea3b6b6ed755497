pub mod error;
pub mod errors;
pub mod naming;
pub mod value;

pub use error::{Result, VeneerError};
pub use errors::Errors;
pub use naming::{Model, ModelName};
pub use value::{FromValue, ToValue, Value};
