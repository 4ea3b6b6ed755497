//! Borrowed views of a decorator handed to callbacks and validation rules.
//!
//! A view holds the decoration state, the wrapped record and the error
//! collection as separate borrows. That is what lets a subclass run its
//! parent's registrations: the view is re-pointed at the parent's part of
//! the state with [`upcast`](DecoratorMut::upcast).

use super::Decoration;
use crate::core::{Errors, Result, Value};
use crate::record::Record;
use std::ops::{Deref, DerefMut};

/// Mutable view given to `before_*` / `after_*` callbacks.
pub struct DecoratorMut<'a, K, R> {
    pub(crate) decoration: &'a mut K,
    pub(crate) record: &'a mut R,
    pub(crate) errors: &'a mut Errors,
}

impl<'a, K, R> DecoratorMut<'a, K, R> {
    pub fn decoration(&self) -> &K {
        self.decoration
    }

    pub fn decorated_record(&self) -> &R {
        self.record
    }

    pub fn decorated_record_mut(&mut self) -> &mut R {
        self.record
    }

    pub fn errors(&self) -> &Errors {
        self.errors
    }

    pub fn errors_mut(&mut self) -> &mut Errors {
        self.errors
    }

    /// Read-only view over the same parts.
    pub fn shared(&self) -> DecoratorRef<'_, K, R> {
        DecoratorRef {
            decoration: self.decoration,
            record: self.record,
            errors: self.errors,
        }
    }

    /// The same decorator seen as its parent class `P`.
    pub fn upcast<P>(&mut self) -> DecoratorMut<'_, P, R>
    where
        K: AsMut<P>,
    {
        DecoratorMut {
            decoration: <K as AsMut<P>>::as_mut(&mut *self.decoration),
            record: &mut *self.record,
            errors: &mut *self.errors,
        }
    }
}

impl<K, R> DecoratorMut<'_, K, R>
where
    K: Decoration<R>,
    R: Record,
{
    /// Indexed read; honors attribute overrides.
    pub fn read(&self, name: &str) -> Result<Value> {
        <K as Decoration<R>>::read_attribute(self.decoration, self.record, name)
    }

    /// Indexed write; honors attribute overrides.
    pub fn write(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        <K as Decoration<R>>::write_attribute(self.decoration, self.record, name, value.into())
    }
}

impl<K, R> Deref for DecoratorMut<'_, K, R> {
    type Target = K;

    fn deref(&self) -> &K {
        self.decoration
    }
}

impl<K, R> DerefMut for DecoratorMut<'_, K, R> {
    fn deref_mut(&mut self) -> &mut K {
        self.decoration
    }
}

/// Shared view given to validation rules. `errors()` is the decorator's
/// collection as it stands; rules report into their own sink.
pub struct DecoratorRef<'a, K, R> {
    pub(crate) decoration: &'a K,
    pub(crate) record: &'a R,
    pub(crate) errors: &'a Errors,
}

impl<K, R> Clone for DecoratorRef<'_, K, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, R> Copy for DecoratorRef<'_, K, R> {}

impl<'a, K, R> DecoratorRef<'a, K, R> {
    pub fn decoration(&self) -> &'a K {
        self.decoration
    }

    pub fn decorated_record(&self) -> &'a R {
        self.record
    }

    pub fn errors(&self) -> &'a Errors {
        self.errors
    }

    /// The same decorator seen as its parent class `P`.
    pub fn upcast<P>(&self) -> DecoratorRef<'a, P, R>
    where
        K: AsRef<P>,
    {
        DecoratorRef {
            decoration: <K as AsRef<P>>::as_ref(self.decoration),
            record: self.record,
            errors: self.errors,
        }
    }
}

impl<K, R> DecoratorRef<'_, K, R>
where
    K: Decoration<R>,
    R: Record,
{
    /// Indexed read; honors attribute overrides.
    pub fn read(&self, name: &str) -> Result<Value> {
        <K as Decoration<R>>::read_attribute(self.decoration, self.record, name)
    }
}

impl<K, R> Deref for DecoratorRef<'_, K, R> {
    type Target = K;

    fn deref(&self) -> &K {
        self.decoration
    }
}
