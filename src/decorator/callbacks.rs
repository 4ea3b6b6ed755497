//! Callback chains and validation rules of a decorator class.

use super::class::ClassId;
use super::validations::{FnValidator, Validator};
use super::view::{DecoratorMut, DecoratorRef};
use super::Decoration;
use crate::core::{Errors, Result};
use crate::record::Record;
use std::fmt;

/// Outcome of a `before_*` callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// Stop the chain and report the operation as failed.
    Halt,
}

impl From<bool> for Flow {
    fn from(proceed: bool) -> Self {
        if proceed { Flow::Continue } else { Flow::Halt }
    }
}

impl From<()> for Flow {
    fn from(_: ()) -> Self {
        Flow::Continue
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Validation,
    Save,
    Destroy,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Validation => write!(f, "validation"),
            Phase::Save => write!(f, "save"),
            Phase::Destroy => write!(f, "destroy"),
        }
    }
}

pub type BeforeCallback<K, R> =
    Box<dyn Fn(&mut DecoratorMut<'_, K, R>) -> Result<Flow> + Send + Sync>;
pub type AfterCallback<K, R> =
    Box<dyn Fn(&mut DecoratorMut<'_, K, R>) -> Result<()> + Send + Sync>;

fn before_callback<K, R, F>(callback: F) -> BeforeCallback<K, R>
where
    F: Fn(&mut DecoratorMut<'_, K, R>) -> Result<Flow> + Send + Sync + 'static,
{
    Box::new(callback)
}

fn after_callback<K, R, F>(callback: F) -> AfterCallback<K, R>
where
    F: Fn(&mut DecoratorMut<'_, K, R>) -> Result<()> + Send + Sync + 'static,
{
    Box::new(callback)
}

/// Ordered before/after callbacks of one phase.
pub struct CallbackChain<K, R> {
    before: Vec<BeforeCallback<K, R>>,
    after: Vec<AfterCallback<K, R>>,
}

impl<K, R> Default for CallbackChain<K, R> {
    fn default() -> Self {
        Self {
            before: Vec::new(),
            after: Vec::new(),
        }
    }
}

impl<K, R> CallbackChain<K, R> {
    pub fn len(&self) -> usize {
        self.before.len() + self.after.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn before(&self) -> &[BeforeCallback<K, R>] {
        &self.before
    }

    pub(crate) fn after(&self) -> &[AfterCallback<K, R>] {
        &self.after
    }

    /// Appends the callbacks of a parent class's chain, each one run
    /// against the parent's part of the decoration.
    fn extend_from_parent<P>(&mut self, parent: CallbackChain<P, R>)
    where
        K: AsMut<P> + 'static,
        P: 'static,
        R: 'static,
    {
        for callback in parent.before {
            self.before
                .push(before_callback(move |decorator: &mut DecoratorMut<'_, K, R>| callback(&mut decorator.upcast::<P>())));
        }
        for callback in parent.after {
            self.after
                .push(after_callback(move |decorator: &mut DecoratorMut<'_, K, R>| callback(&mut decorator.upcast::<P>())));
        }
    }
}

/// Parent-class rule run against the parent's part of the decoration.
struct InheritedValidator<P, R> {
    rule: Box<dyn Validator<P, R>>,
}

impl<K, P, R> Validator<K, R> for InheritedValidator<P, R>
where
    K: AsRef<P>,
{
    fn validate(&self, decorator: &DecoratorRef<'_, K, R>, errors: &mut Errors) -> Result<()> {
        self.rule.validate(&decorator.upcast::<P>(), errors)
    }
}

/// Class-level definition of a decoration for record type `R`: callback
/// chains per phase and validation rules, each kept in registration order.
///
/// Built once per (decoration, record) pair by `Decoration::define`.
pub struct Definition<K, R> {
    validation: CallbackChain<K, R>,
    save: CallbackChain<K, R>,
    destroy: CallbackChain<K, R>,
    validators: Vec<Box<dyn Validator<K, R>>>,
    inherited: Vec<ClassId>,
}

impl<K, R> Default for Definition<K, R> {
    fn default() -> Self {
        Self {
            validation: CallbackChain::default(),
            save: CallbackChain::default(),
            destroy: CallbackChain::default(),
            validators: Vec::new(),
            inherited: Vec::new(),
        }
    }
}

impl<K: 'static, R: Record + 'static> Definition<K, R> {
    pub fn chain(&self, phase: Phase) -> &CallbackChain<K, R> {
        match phase {
            Phase::Validation => &self.validation,
            Phase::Save => &self.save,
            Phase::Destroy => &self.destroy,
        }
    }

    pub fn validators(&self) -> &[Box<dyn Validator<K, R>>] {
        &self.validators
    }

    /// Classes whose registrations were pulled in with [`inherit`](Self::inherit),
    /// nearest first.
    pub fn inherited(&self) -> &[ClassId] {
        &self.inherited
    }

    pub fn inherits(&self, class: &ClassId) -> bool {
        self.inherited.contains(class)
    }

    fn chain_mut(&mut self, phase: Phase) -> &mut CallbackChain<K, R> {
        match phase {
            Phase::Validation => &mut self.validation,
            Phase::Save => &mut self.save,
            Phase::Destroy => &mut self.destroy,
        }
    }

    /// Pulls in every callback and rule registered by parent class `P`
    /// (and, through `P::define`, by its own ancestors).
    ///
    /// Call it first in `define` so the parent's registrations run before the
    /// child's. Inherited callbacks see the parent's state through
    /// `AsMut<P>`; `decorator_class!(Child: Parent { field })` generates it.
    pub fn inherit<P>(&mut self) -> &mut Self
    where
        P: Decoration<R>,
        K: AsRef<P> + AsMut<P>,
    {
        let mut parent = Definition::<P, R>::default();
        P::define(&mut parent);
        let Definition {
            validation,
            save,
            destroy,
            validators,
            inherited,
        } = parent;

        self.validation.extend_from_parent(validation);
        self.save.extend_from_parent(save);
        self.destroy.extend_from_parent(destroy);
        self.validators.extend(validators.into_iter().map(|rule| {
            Box::new(InheritedValidator { rule }) as Box<dyn Validator<K, R>>
        }));
        self.inherited.push(ClassId::of::<P>());
        self.inherited.extend(inherited);
        self
    }

    /// Registers a `before_*` callback. Returning `false` (or `Flow::Halt`)
    /// halts the operation; `()` and `true` continue.
    pub fn before<F, T>(&mut self, phase: Phase, callback: F) -> &mut Self
    where
        F: Fn(&mut DecoratorMut<'_, K, R>) -> Result<T> + Send + Sync + 'static,
        T: Into<Flow>,
    {
        self.chain_mut(phase)
            .before
            .push(before_callback(move |decorator: &mut DecoratorMut<'_, K, R>| callback(decorator).map(Into::into)));
        self
    }

    /// Registers an `after_*` callback. An error rolls back the enclosing
    /// transaction and propagates to the caller.
    pub fn after<F>(&mut self, phase: Phase, callback: F) -> &mut Self
    where
        F: Fn(&mut DecoratorMut<'_, K, R>) -> Result<()> + Send + Sync + 'static,
    {
        self.chain_mut(phase).after.push(after_callback(callback));
        self
    }

    pub fn before_validation<F, T>(&mut self, callback: F) -> &mut Self
    where
        F: Fn(&mut DecoratorMut<'_, K, R>) -> Result<T> + Send + Sync + 'static,
        T: Into<Flow>,
    {
        self.before(Phase::Validation, callback)
    }

    pub fn after_validation<F>(&mut self, callback: F) -> &mut Self
    where
        F: Fn(&mut DecoratorMut<'_, K, R>) -> Result<()> + Send + Sync + 'static,
    {
        self.after(Phase::Validation, callback)
    }

    pub fn before_save<F, T>(&mut self, callback: F) -> &mut Self
    where
        F: Fn(&mut DecoratorMut<'_, K, R>) -> Result<T> + Send + Sync + 'static,
        T: Into<Flow>,
    {
        self.before(Phase::Save, callback)
    }

    pub fn after_save<F>(&mut self, callback: F) -> &mut Self
    where
        F: Fn(&mut DecoratorMut<'_, K, R>) -> Result<()> + Send + Sync + 'static,
    {
        self.after(Phase::Save, callback)
    }

    pub fn before_destroy<F, T>(&mut self, callback: F) -> &mut Self
    where
        F: Fn(&mut DecoratorMut<'_, K, R>) -> Result<T> + Send + Sync + 'static,
        T: Into<Flow>,
    {
        self.before(Phase::Destroy, callback)
    }

    pub fn after_destroy<F>(&mut self, callback: F) -> &mut Self
    where
        F: Fn(&mut DecoratorMut<'_, K, R>) -> Result<()> + Send + Sync + 'static,
    {
        self.after(Phase::Destroy, callback)
    }

    /// Adds a decorator-level validation rule written as a closure that
    /// records its findings in `errors`.
    pub fn validate<F>(&mut self, rule: F) -> &mut Self
    where
        F: Fn(&DecoratorRef<'_, K, R>, &mut Errors) -> Result<()> + Send + Sync + 'static,
    {
        self.validators.push(Box::new(FnValidator(rule)));
        self
    }

    /// Adds a reusable validator such as [`Presence`](super::validations::Presence).
    pub fn validates<V>(&mut self, validator: V) -> &mut Self
    where
        V: Validator<K, R> + 'static,
    {
        self.validators.push(Box::new(validator));
        self
    }
}
