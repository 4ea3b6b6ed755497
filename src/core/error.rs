use thiserror::Error;

#[derive(Error, Debug)]
pub enum VeneerError {
    #[error("{0}")]
    InvalidModel(String),

    #[error("Unknown attribute '{attribute}' for {model}")]
    UnknownAttribute { attribute: String, model: String },

    #[error("Attribute '{attribute}' of {model} is read-only")]
    ReadOnlyAttribute { attribute: String, model: String },

    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    #[error("Callback failed: {0}")]
    Callback(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Transaction error: {0}")]
    Transaction(String),

    #[error("Record {id} not found in table '{table}'")]
    RecordNotFound { table: String, id: u64 },

    #[error("Lock error: {0}")]
    LockError(String),
}

impl VeneerError {
    pub fn unknown_attribute(attribute: impl Into<String>, model: impl Into<String>) -> Self {
        Self::UnknownAttribute {
            attribute: attribute.into(),
            model: model.into(),
        }
    }

    pub fn read_only_attribute(attribute: impl Into<String>, model: impl Into<String>) -> Self {
        Self::ReadOnlyAttribute {
            attribute: attribute.into(),
            model: model.into(),
        }
    }

    pub fn callback(message: impl Into<String>) -> Self {
        Self::Callback(message.into())
    }

    /// Builds the error raised by the strict save/update variants.
    pub fn validation_failed(full_messages: &[String]) -> Self {
        Self::InvalidModel(format!("Validation failed: {}", full_messages.join(",")))
    }
}

pub type Result<T> = std::result::Result<T, VeneerError>;

impl<T> From<std::sync::PoisonError<T>> for VeneerError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        Self::LockError(err.to_string())
    }
}
