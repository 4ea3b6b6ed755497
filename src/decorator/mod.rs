// ============================================================================
// Decorator
// ============================================================================
//
// `Decorator<K, R>` wraps one record `R` and behaves like it, except where
// the decoration `K` says otherwise:
// - attribute reads/writes go through `K`'s override hooks, which receive
//   the wrapped record so an override can call the original
// - validation merges decorator-level rules with the record's own result
// - save/destroy run their callback chains inside one transaction of the
//   record's persistence collaborator
//
// A decorator is itself a `Record`, so decorators nest.
//
// ============================================================================

pub mod callbacks;
pub mod class;
pub mod validations;
pub mod view;

pub use callbacks::{CallbackChain, Definition, Flow, Phase};
pub use class::{ClassId, Config, DecoratorClass, ModelClass};
pub use validations::{FnValidator, Inclusion, Length, Presence, Validator};
pub use view::{DecoratorMut, DecoratorRef};

use crate::core::{Errors, ModelName, Result, Value, VeneerError};
use crate::record::{Attributes, Record};
use crate::transaction::{TransactionScope, Transactional};
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use tracing::{Level, event, info_span};

/// Behavior a decorator class adds on top of record type `R`.
///
/// Every method has a forwarding default, so an empty impl yields a pure
/// pass-through decorator. Overrides receive the wrapped record; calling its
/// methods from inside an override is the way to reach the original behavior.
pub trait Decoration<R: Record>: DecoratorClass + Sized {
    /// Registers callbacks and validation rules. Runs once per
    /// (decoration, record type) pair. A subclass starts with
    /// `definition.inherit::<Parent>()` to keep its parent's registrations.
    fn define(definition: &mut Definition<Self, R>) {
        let _ = definition;
    }

    fn attribute_names(&self, record: &R) -> Vec<String> {
        record.attribute_names()
    }

    fn read_attribute(&self, record: &R, name: &str) -> Result<Value> {
        record.read_attribute(name)
    }

    fn write_attribute(&mut self, record: &mut R, name: &str, value: Value) -> Result<()> {
        record.write_attribute(name, value)
    }
}

pub struct Decorator<K, R> {
    record: R,
    decoration: K,
    errors: Errors,
    definition: Arc<Definition<K, R>>,
}

impl<K, R> Decorator<K, R>
where
    K: Decoration<R>,
    R: Record + 'static,
{
    pub fn new(record: R) -> Self
    where
        K: Default,
    {
        Self::with_decoration(K::default(), record)
    }

    pub fn with_decoration(decoration: K, record: R) -> Self {
        let definition = class::shared_definition(|| {
            let mut definition = Definition::default();
            K::define(&mut definition);
            if let Some(parent) = K::superclass()
                && !definition.inherits(&parent)
            {
                event!(
                    Level::WARN,
                    decorator = Self::class_id().name(),
                    parent = parent.name(),
                    "subclass definition does not inherit its parent's callbacks"
                );
            }
            definition
        });
        Self {
            record,
            decoration,
            errors: Errors::new(),
            definition,
        }
    }

    pub fn class_id() -> ClassId {
        ClassId::of::<K>()
    }

    /// The wrapped record, one level down.
    pub fn decorated_record(&self) -> &R {
        &self.record
    }

    pub fn decorated_record_mut(&mut self) -> &mut R {
        &mut self.record
    }

    /// The innermost record beneath any number of nested decorators.
    pub fn decorated_record_deep(&self) -> &R::Base {
        self.record.base()
    }

    pub fn decorated_record_deep_mut(&mut self) -> &mut R::Base {
        self.record.base_mut()
    }

    pub fn decoration(&self) -> &K {
        &self.decoration
    }

    pub fn decoration_mut(&mut self) -> &mut K {
        &mut self.decoration
    }

    pub fn into_inner(self) -> R {
        self.record
    }

    pub fn into_parts(self) -> (K, R) {
        (self.decoration, self.record)
    }

    pub fn definition(&self) -> &Definition<K, R> {
        &self.definition
    }

    /// Shared view over the decoration, record and errors.
    pub fn view(&self) -> DecoratorRef<'_, K, R> {
        DecoratorRef {
            decoration: &self.decoration,
            record: &self.record,
            errors: &self.errors,
        }
    }

    /// Mutable view, as handed to callbacks.
    pub fn view_mut(&mut self) -> DecoratorMut<'_, K, R> {
        DecoratorMut {
            decoration: &mut self.decoration,
            record: &mut self.record,
            errors: &mut self.errors,
        }
    }

    pub fn errors_mut(&mut self) -> &mut Errors {
        &mut self.errors
    }

    pub fn clear_errors(&mut self) {
        self.errors.clear();
    }

    /// Indexed read; honors attribute overrides.
    pub fn read(&self, name: &str) -> Result<Value> {
        <K as Decoration<R>>::read_attribute(&self.decoration, &self.record, name)
    }

    /// Indexed write; honors attribute overrides.
    pub fn write(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        <K as Decoration<R>>::write_attribute(
            &mut self.decoration,
            &mut self.record,
            name,
            value.into(),
        )
    }

    /// Bulk assignment. Every pair goes through [`write`](Self::write), so
    /// overridden setters see bulk updates too. Stops at the first failure;
    /// earlier pairs stay assigned.
    pub fn assign<I, N, V>(&mut self, attrs: I) -> Result<()>
    where
        I: IntoIterator<Item = (N, V)>,
        N: AsRef<str>,
        V: Into<Value>,
    {
        for (name, value) in attrs {
            self.write(name.as_ref(), value)?;
        }
        Ok(())
    }

    /// Bulk assignment from a JSON object.
    pub fn assign_json(&mut self, attrs: &serde_json::Map<String, serde_json::Value>) -> Result<()> {
        self.assign(
            attrs
                .iter()
                .map(|(name, value)| (name.as_str(), Value::from(value.clone()))),
        )
    }

    pub fn persisted(&self) -> bool {
        self.record.is_persisted()
    }

    pub fn new_record(&self) -> bool {
        !self.persisted()
    }

    /// Like `save`, but a failed save becomes `VeneerError::InvalidModel`
    /// listing the current error messages.
    pub fn save_strict(&mut self) -> Result<()> {
        if self.save()? {
            Ok(())
        } else {
            Err(self.invalid_model())
        }
    }

    /// Assigns `attrs` and saves. The attributes stay assigned when the save
    /// fails.
    pub fn update<I, N, V>(&mut self, attrs: I) -> Result<bool>
    where
        I: IntoIterator<Item = (N, V)>,
        N: AsRef<str>,
        V: Into<Value>,
    {
        self.assign(attrs)?;
        self.save()
    }

    pub fn update_strict<I, N, V>(&mut self, attrs: I) -> Result<()>
    where
        I: IntoIterator<Item = (N, V)>,
        N: AsRef<str>,
        V: Into<Value>,
    {
        if self.update(attrs)? {
            Ok(())
        } else {
            Err(self.invalid_model())
        }
    }

    fn invalid_model(&self) -> VeneerError {
        VeneerError::validation_failed(&self.errors.full_messages())
    }

    fn run_before(&mut self, phase: Phase) -> Result<Flow> {
        let definition = Arc::clone(&self.definition);
        for callback in definition.chain(phase).before() {
            if callback(&mut self.view_mut())? == Flow::Halt {
                event!(Level::DEBUG, %phase, "halted by before callback");
                return Ok(Flow::Halt);
            }
        }
        Ok(Flow::Continue)
    }

    fn run_after(&mut self, phase: Phase) -> Result<()> {
        let definition = Arc::clone(&self.definition);
        for callback in definition.chain(phase).after() {
            callback(&mut self.view_mut())?;
        }
        Ok(())
    }

    /// Runs the decorator's own rules. They pass when none of them reported
    /// a message during this run. Each rule's findings are merged before the
    /// next rule runs, so later rules see them through `errors()`.
    fn run_validators(&mut self) -> Result<bool> {
        let definition = Arc::clone(&self.definition);
        let mut passed = true;
        for validator in definition.validators() {
            let mut found = Errors::new();
            validator.validate(&self.view(), &mut found)?;
            if !found.is_empty() {
                passed = false;
                self.errors.merge_from(&found);
            }
        }
        Ok(passed)
    }

    fn validate(&mut self) -> Result<bool> {
        let span = info_span!(
            "decorator.validation",
            decorator = Self::class_id().name(),
            model = %self.record.model_name()
        );
        let _enter = span.enter();

        if self.run_before(Phase::Validation)? == Flow::Halt {
            return Ok(false);
        }

        let rules_passed = self.run_validators()?;
        let record_valid = self.record.is_valid()?;
        if !record_valid {
            self.errors.merge_from(self.record.errors());
        }

        self.run_after(Phase::Validation)?;

        let valid = rules_passed && record_valid;
        event!(
            Level::DEBUG,
            rules_passed,
            record_valid,
            errors = self.errors.len(),
            "validation finished"
        );
        Ok(valid)
    }

    /// Runs `body` inside one transaction of the record's collaborator.
    ///
    /// Commits only when `body` reports success; rolls back on `false` and on
    /// error (the error is returned unchanged). The result is true only when
    /// the body succeeded and the commit went through.
    fn transactional<F>(&mut self, body: F) -> Result<bool>
    where
        F: FnOnce(&mut Self) -> Result<bool>,
    {
        let scope = TransactionScope::begin(self.record.connection())?;
        match body(self) {
            Ok(success) => {
                let committed = scope.finish(success)?;
                Ok(success && committed)
            }
            Err(err) => {
                let txn = scope.id();
                if let Err(rollback_err) = scope.rollback() {
                    event!(Level::ERROR, %txn, error = %rollback_err, "rollback failed");
                }
                event!(Level::DEBUG, %txn, error = %err, "rolled back after failure");
                Err(err)
            }
        }
    }

    fn run_save(&mut self) -> Result<bool> {
        let span = info_span!(
            "decorator.save",
            decorator = Self::class_id().name(),
            model = %self.record.model_name()
        );
        let _enter = span.enter();

        if !self.validate()? {
            event!(Level::DEBUG, "save skipped: invalid");
            return Ok(false);
        }

        self.transactional(|this| {
            if this.run_before(Phase::Save)? == Flow::Halt {
                return Ok(false);
            }
            let saved = this.record.save()?;
            this.run_after(Phase::Save)?;
            Ok(saved)
        })
    }

    fn run_destroy(&mut self) -> Result<bool> {
        let span = info_span!(
            "decorator.destroy",
            decorator = Self::class_id().name(),
            model = %self.record.model_name()
        );
        let _enter = span.enter();

        self.transactional(|this| {
            if this.run_before(Phase::Destroy)? == Flow::Halt {
                return Ok(false);
            }
            let destroyed = this.record.destroy()?;
            this.run_after(Phase::Destroy)?;
            Ok(destroyed)
        })
    }
}

impl<K, R> Attributes for Decorator<K, R>
where
    K: Decoration<R>,
    R: Record + 'static,
{
    fn attribute_names(&self) -> Vec<String> {
        <K as Decoration<R>>::attribute_names(&self.decoration, &self.record)
    }

    fn read_attribute(&self, name: &str) -> Result<Value> {
        self.read(name)
    }

    fn write_attribute(&mut self, name: &str, value: Value) -> Result<()> {
        self.write(name, value)
    }
}

impl<K, R> Record for Decorator<K, R>
where
    K: Decoration<R>,
    R: Record + 'static,
{
    type Base = R::Base;

    fn base(&self) -> &Self::Base {
        self.record.base()
    }

    fn base_mut(&mut self) -> &mut Self::Base {
        self.record.base_mut()
    }

    /// Validates, then runs `before_save`, the wrapped save and `after_save`
    /// in one transaction.
    fn save(&mut self) -> Result<bool> {
        self.run_save()
    }

    /// Runs `before_destroy`, the wrapped destroy and `after_destroy` in one
    /// transaction.
    fn destroy(&mut self) -> Result<bool> {
        self.run_destroy()
    }

    /// Errors are added to, never cleared; see [`Decorator::clear_errors`].
    fn is_valid(&mut self) -> Result<bool> {
        self.validate()
    }

    fn errors(&self) -> &Errors {
        &self.errors
    }

    fn is_persisted(&self) -> bool {
        self.persisted()
    }

    fn model_name(&self) -> ModelName {
        self.record.model_name()
    }

    fn connection(&self) -> Arc<dyn Transactional> {
        self.record.connection()
    }
}

impl<K, R> Deref for Decorator<K, R> {
    type Target = K;

    fn deref(&self) -> &K {
        &self.decoration
    }
}

impl<K, R> DerefMut for Decorator<K, R> {
    fn deref_mut(&mut self) -> &mut K {
        &mut self.decoration
    }
}

impl<K: fmt::Debug, R: fmt::Debug> fmt::Debug for Decorator<K, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Decorator")
            .field("decoration", &self.decoration)
            .field("record", &self.record)
            .field("errors", &self.errors)
            .finish()
    }
}
