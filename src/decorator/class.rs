// ============================================================================
// Decorator Classes & Configuration
// ============================================================================
//
// Class-level state lives in process-wide registries keyed by TypeId:
// - CONFIGS: one Arc<Config> per configured decorator class
// - DEFINITIONS: the callback/validation definition of each
//   (decoration, record) pair, built once on first use
//
// Configs are copy-on-write: configuring a class clones the nearest
// configured ancestor's value and stores a fresh Arc, so ancestors and
// siblings keep the Arc they already had.
//
// ============================================================================

use crate::core::naming::short_type_name;
use crate::core::{Model, ModelName};
use lazy_static::lazy_static;
use serde::{Serialize, Serializer};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{Level, event};

/// Superclass chains longer than this are treated as cyclic and cut off.
const MAX_CLASS_DEPTH: usize = 64;

lazy_static! {
    static ref CONFIGS: RwLock<HashMap<TypeId, Arc<Config>>> = RwLock::new(HashMap::new());
    static ref DEFINITIONS: RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>> =
        RwLock::new(HashMap::new());
}

/// A decorator "class": a type with class-level configuration and an
/// optional superclass it inherits configuration from.
///
/// Usually implemented with [`decorator_class!`](crate::decorator_class).
pub trait DecoratorClass: 'static {
    fn superclass() -> Option<ClassId> {
        None
    }

    /// Same as [`configure::<Self>`](configure).
    fn configure(decorated: ModelClass) -> Arc<Config>
    where
        Self: Sized,
    {
        configure_class(ClassId::of::<Self>(), decorated)
    }
}

/// Runtime identity of a decorator class.
#[derive(Clone, Copy)]
pub struct ClassId {
    type_id: TypeId,
    type_name: &'static str,
    superclass: fn() -> Option<ClassId>,
}

impl ClassId {
    pub fn of<T: DecoratorClass>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            superclass: T::superclass,
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Short class name without module path or generics.
    pub fn name(&self) -> &'static str {
        short_type_name(self.type_name)
    }

    pub fn superclass(&self) -> Option<ClassId> {
        (self.superclass)()
    }

    /// This class followed by its superclasses, nearest first.
    pub fn ancestors(&self) -> impl Iterator<Item = ClassId> {
        std::iter::successors(Some(*self), ClassId::superclass).take(MAX_CLASS_DEPTH)
    }

    pub fn is_subclass_of(&self, other: &ClassId) -> bool {
        self.ancestors().any(|class| class == *other)
    }
}

impl PartialEq for ClassId {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for ClassId {}

impl fmt::Debug for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClassId").field(&self.name()).finish()
    }
}

/// Identity of a decorated record type, kept for naming purposes only.
#[derive(Debug, Clone)]
pub struct ModelClass {
    type_id: TypeId,
    model_name: ModelName,
}

impl ModelClass {
    pub fn of<M: Model + 'static>() -> Self {
        Self {
            type_id: TypeId::of::<M>(),
            model_name: M::model_name(),
        }
    }

    pub fn is<M: 'static>(&self) -> bool {
        self.type_id == TypeId::of::<M>()
    }

    pub fn model_name(&self) -> &ModelName {
        &self.model_name
    }
}

impl PartialEq for ModelClass {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for ModelClass {}

impl Serialize for ModelClass {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.model_name.serialize(serializer)
    }
}

/// Per-class decorator configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Config {
    /// Record class the decorator stands in for when naming things
    pub decorated_class: Option<ModelClass>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the decorated class
    pub fn decorated_class(mut self, class: ModelClass) -> Self {
        self.decorated_class = Some(class);
        self
    }
}

/// Effective configuration of `class`: its own, else the nearest configured
/// ancestor's (shared, not copied).
pub fn config_of(class: ClassId) -> Option<Arc<Config>> {
    let configs = CONFIGS.read().unwrap_or_else(PoisonError::into_inner);
    class
        .ancestors()
        .find_map(|ancestor| configs.get(&ancestor.type_id).cloned())
}

/// Configures `class` to decorate `decorated`.
///
/// The inherited configuration (if any) is cloned before it is changed, so
/// the superclass keeps its own value.
pub fn configure_class(class: ClassId, decorated: ModelClass) -> Arc<Config> {
    let inherited = config_of(class);
    let mut config = inherited
        .as_deref()
        .cloned()
        .unwrap_or_default();
    config.decorated_class = Some(decorated);
    let config = Arc::new(config);

    event!(
        Level::DEBUG,
        decorator = class.name(),
        decorated = %config
            .decorated_class
            .as_ref()
            .map(|c| c.model_name().to_string())
            .unwrap_or_default(),
        inherited = inherited.is_some(),
        "decorator class configured"
    );

    CONFIGS
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(class.type_id, config.clone());
    config
}

/// Class-level naming identity. Falls back to the decorator's own type name
/// when no decorated class is configured.
pub fn model_name_of(class: ClassId) -> ModelName {
    config_of(class)
        .and_then(|config| config.decorated_class.clone())
        .map(|decorated| decorated.model_name)
        .unwrap_or_else(|| ModelName::new(class.name()))
}

pub fn configure<K: DecoratorClass>(decorated: ModelClass) -> Arc<Config> {
    configure_class(ClassId::of::<K>(), decorated)
}

pub fn config<K: DecoratorClass>() -> Option<Arc<Config>> {
    config_of(ClassId::of::<K>())
}

pub fn model_name<K: DecoratorClass>() -> ModelName {
    model_name_of(ClassId::of::<K>())
}

/// Returns the cached value for `T`, building it on first use.
pub(crate) fn shared_definition<T, F>(build: F) -> Arc<T>
where
    T: Any + Send + Sync,
    F: FnOnce() -> T,
{
    let key = TypeId::of::<T>();
    let cached = DEFINITIONS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&key)
        .cloned();
    if let Some(Ok(definition)) = cached.map(|any| any.downcast::<T>()) {
        return definition;
    }

    // Built outside the lock: definitions may configure classes.
    let built = Arc::new(build());
    let stored = DEFINITIONS
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .entry(key)
        .or_insert_with(|| built.clone() as Arc<dyn Any + Send + Sync>)
        .clone();
    stored.downcast::<T>().unwrap_or(built)
}
