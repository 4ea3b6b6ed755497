//! Decorator-level validation rules
//!
//! Rules run in registration order. Each one reports its findings into the
//! `errors` sink it is given; the decorator's collection, readable through
//! the view, already holds whatever earlier rules found. A rule returns `Err`
//! only for failures that are not validation findings (e.g. an attribute
//! that does not exist).

use super::Decoration;
use super::view::DecoratorRef;
use crate::core::{Errors, Result, Value};
use crate::record::Record;

/// A validation rule over a decorated record.
pub trait Validator<K, R>: Send + Sync {
    fn validate(&self, decorator: &DecoratorRef<'_, K, R>, errors: &mut Errors) -> Result<()>;
}

/// Adapts a closure into a [`Validator`].
pub struct FnValidator<F>(pub F);

impl<K, R, F> Validator<K, R> for FnValidator<F>
where
    F: Fn(&DecoratorRef<'_, K, R>, &mut Errors) -> Result<()> + Send + Sync,
{
    fn validate(&self, decorator: &DecoratorRef<'_, K, R>, errors: &mut Errors) -> Result<()> {
        (self.0)(decorator, errors)
    }
}

/// Attributes must not be NULL or blank text.
#[derive(Debug, Clone)]
pub struct Presence {
    attributes: Vec<String>,
    message: String,
}

impl Presence {
    pub fn of<I, S>(attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            attributes: attributes.into_iter().map(Into::into).collect(),
            message: "can't be blank".to_string(),
        }
    }

    pub fn message(mut self, message: &str) -> Self {
        self.message = message.to_string();
        self
    }
}

impl<K, R> Validator<K, R> for Presence
where
    K: Decoration<R>,
    R: Record + 'static,
{
    fn validate(&self, decorator: &DecoratorRef<'_, K, R>, errors: &mut Errors) -> Result<()> {
        for attribute in &self.attributes {
            if decorator.read(attribute)?.is_blank() {
                errors.add(attribute.as_str(), self.message.as_str());
            }
        }
        Ok(())
    }
}

/// Attribute value must be one of a fixed set. NULL is accepted unless
/// `allow_null(false)` is set.
#[derive(Debug, Clone)]
pub struct Inclusion {
    attribute: String,
    allowed: Vec<Value>,
    allow_null: bool,
    message: String,
}

impl Inclusion {
    pub fn of<I, V>(attribute: &str, allowed: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            attribute: attribute.to_string(),
            allowed: allowed.into_iter().map(Into::into).collect(),
            allow_null: true,
            message: "is not included in the list".to_string(),
        }
    }

    pub fn allow_null(mut self, allow: bool) -> Self {
        self.allow_null = allow;
        self
    }

    pub fn message(mut self, message: &str) -> Self {
        self.message = message.to_string();
        self
    }
}

impl<K, R> Validator<K, R> for Inclusion
where
    K: Decoration<R>,
    R: Record + 'static,
{
    fn validate(&self, decorator: &DecoratorRef<'_, K, R>, errors: &mut Errors) -> Result<()> {
        let value = decorator.read(&self.attribute)?;
        if value.is_null() && self.allow_null {
            return Ok(());
        }
        if !self.allowed.contains(&value) {
            errors.add(self.attribute.as_str(), self.message.as_str());
        }
        Ok(())
    }
}

/// Character length bounds for a text attribute. NULL counts as empty.
#[derive(Debug, Clone)]
pub struct Length {
    attribute: String,
    minimum: Option<usize>,
    maximum: Option<usize>,
}

impl Length {
    pub fn of(attribute: &str) -> Self {
        Self {
            attribute: attribute.to_string(),
            minimum: None,
            maximum: None,
        }
    }

    pub fn minimum(mut self, minimum: usize) -> Self {
        self.minimum = Some(minimum);
        self
    }

    pub fn maximum(mut self, maximum: usize) -> Self {
        self.maximum = Some(maximum);
        self
    }
}

impl<K, R> Validator<K, R> for Length
where
    K: Decoration<R>,
    R: Record + 'static,
{
    fn validate(&self, decorator: &DecoratorRef<'_, K, R>, errors: &mut Errors) -> Result<()> {
        let value = decorator.read(&self.attribute)?;
        let length = match &value {
            Value::Null => 0,
            Value::Text(text) => text.chars().count(),
            other => other.to_string().chars().count(),
        };
        if let Some(minimum) = self.minimum
            && length < minimum
        {
            errors.add(
                self.attribute.as_str(),
                format!("is too short (minimum is {} characters)", minimum),
            );
        }
        if let Some(maximum) = self.maximum
            && length > maximum
        {
            errors.add(
                self.attribute.as_str(),
                format!("is too long (maximum is {} characters)", maximum),
            );
        }
        Ok(())
    }
}
