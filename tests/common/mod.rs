#![allow(dead_code)]

use std::sync::Arc;
use veneer::memory::Row;
use veneer::prelude::*;
use veneer::MemoryStore;

pub const TABLE: &str = "balloons";

/// Canned answers that replace the real behavior of a `Balloon` method.
#[derive(Debug, Clone, Copy, Default)]
pub struct Stubs {
    pub save: Option<bool>,
    pub valid: Option<bool>,
    pub persisted: Option<bool>,
}

/// How often each persistence method ran.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Calls {
    pub save: usize,
    pub destroy: usize,
    pub valid: usize,
}

pub type Rule = fn(&Balloon, &mut Errors);

#[derive(Debug, Clone, Attributes, Model)]
pub struct Balloon {
    #[veneer(readonly)]
    pub id: Option<u64>,
    pub color: String,
    pub size: String,
    #[veneer(skip)]
    pub stubs: Stubs,
    #[veneer(skip)]
    pub calls: Calls,
    #[veneer(skip)]
    pub rules: Vec<Rule>,
    #[veneer(skip)]
    destroyed: bool,
    #[veneer(skip)]
    errors: Errors,
    #[veneer(skip)]
    store: Arc<MemoryStore>,
}

impl Balloon {
    pub fn new(store: &Arc<MemoryStore>, color: &str, size: &str) -> Self {
        Self {
            id: None,
            color: color.to_string(),
            size: size.to_string(),
            stubs: Stubs::default(),
            calls: Calls::default(),
            rules: Vec::new(),
            destroyed: false,
            errors: Errors::new(),
            store: Arc::clone(store),
        }
    }

    /// Inserts a balloon straight into the store.
    pub fn create(store: &Arc<MemoryStore>, color: &str, size: &str) -> Result<Self> {
        let mut balloon = Self::new(store, color, size);
        if !balloon.save()? {
            return Err(VeneerError::Persistence("balloon was not saved".into()));
        }
        Ok(balloon)
    }

    pub fn count(store: &MemoryStore) -> usize {
        store.count(TABLE).unwrap()
    }

    pub fn store(&self) -> &Arc<MemoryStore> {
        &self.store
    }

    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    fn to_row(&self) -> Row {
        Row::from([
            ("color".to_string(), Value::from(self.color.as_str())),
            ("size".to_string(), Value::from(self.size.as_str())),
        ])
    }
}

pub fn too_dark(_: &Balloon, errors: &mut Errors) {
    errors.add("color", "is too dark");
}

impl Record for Balloon {
    type Base = Self;

    fn base(&self) -> &Self {
        self
    }

    fn base_mut(&mut self) -> &mut Self {
        self
    }

    fn save(&mut self) -> Result<bool> {
        self.calls.save += 1;
        if let Some(result) = self.stubs.save {
            return Ok(result);
        }
        if !self.is_valid()? {
            return Ok(false);
        }
        match self.id {
            Some(id) => self.store.update(TABLE, id, self.to_row())?,
            None => self.id = Some(self.store.insert(TABLE, self.to_row())?),
        }
        Ok(true)
    }

    fn destroy(&mut self) -> Result<bool> {
        self.calls.destroy += 1;
        if let Some(id) = self.id {
            self.store.delete(TABLE, id)?;
        }
        self.destroyed = true;
        Ok(true)
    }

    fn is_valid(&mut self) -> Result<bool> {
        self.calls.valid += 1;
        self.errors.clear();
        if let Some(valid) = self.stubs.valid {
            return Ok(valid);
        }
        let mut errors = Errors::new();
        for rule in &self.rules {
            rule(self, &mut errors);
        }
        self.errors = errors;
        Ok(self.errors.is_empty())
    }

    fn errors(&self) -> &Errors {
        &self.errors
    }

    fn is_persisted(&self) -> bool {
        self.stubs
            .persisted
            .unwrap_or(self.id.is_some() && !self.destroyed)
    }

    fn model_name(&self) -> ModelName {
        <Self as Model>::model_name()
    }

    fn connection(&self) -> Arc<dyn Transactional> {
        self.store.clone()
    }
}

/// Pass-through decoration usable over any record, including other decorators.
#[derive(Debug, Default)]
pub struct BalloonDecorator;

decorator_class!(BalloonDecorator);

impl<R: Record + 'static> Decoration<R> for BalloonDecorator {}

pub fn store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::new())
}

pub fn balloon(store: &Arc<MemoryStore>) -> Balloon {
    Balloon::new(store, "blue", "large")
}
