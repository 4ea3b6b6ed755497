/// Forwarding tests
///
/// Delegation, attribute overrides and unwrapping of nested decorators.
/// Run with: cargo test --test decorator_tests
mod common;

use common::{Balloon, BalloonDecorator, balloon, store};
use std::cell::Cell;
use veneer::prelude::*;

#[derive(Default)]
struct OrangeDecorator;
decorator_class!(OrangeDecorator);

impl Decoration<Balloon> for OrangeDecorator {
    fn read_attribute(&self, record: &Balloon, name: &str) -> Result<Value> {
        match name {
            "color" => Ok(Value::from("orange")),
            _ => record.read_attribute(name),
        }
    }
}

#[derive(Default)]
struct PastelDecorator;
decorator_class!(PastelDecorator);

impl Decoration<Balloon> for PastelDecorator {
    fn read_attribute(&self, record: &Balloon, name: &str) -> Result<Value> {
        match name {
            "color" => Ok(Value::from(format!(
                "pastel-{}",
                record.read_attribute("color")?
            ))),
            _ => record.read_attribute(name),
        }
    }
}

#[derive(Default)]
struct ReaderSpy {
    called: Cell<bool>,
}
decorator_class!(ReaderSpy);

impl Decoration<Balloon> for ReaderSpy {
    fn read_attribute(&self, record: &Balloon, name: &str) -> Result<Value> {
        if name == "color" {
            self.called.set(true);
        }
        record.read_attribute(name)
    }
}

#[derive(Default)]
struct WriterSpy {
    called: bool,
}
decorator_class!(WriterSpy);

impl Decoration<Balloon> for WriterSpy {
    fn write_attribute(&mut self, record: &mut Balloon, name: &str, value: Value) -> Result<()> {
        if name == "color" {
            self.called = true;
        }
        record.write_attribute(name, value)
    }
}

/// Keeps colors lowercase on the way in.
#[derive(Default)]
struct LowercaseDecorator;
decorator_class!(LowercaseDecorator);

impl<R: Record + 'static> Decoration<R> for LowercaseDecorator {
    fn write_attribute(&mut self, record: &mut R, name: &str, value: Value) -> Result<()> {
        let value = match (name, value) {
            ("color", Value::Text(text)) => Value::Text(text.to_lowercase()),
            (_, other) => other,
        };
        record.write_attribute(name, value)
    }
}

#[test]
fn test_delegates_attributes_to_decorated_record() {
    let store = store();
    let decorator = Decorator::<BalloonDecorator, _>::new(balloon(&store));

    assert_eq!(decorator.read("color").unwrap(), Value::from("blue"));
    assert_eq!(decorator.read("size").unwrap(), Value::from("large"));
    assert_eq!(
        decorator.attribute_names(),
        vec!["id".to_string(), "color".to_string(), "size".to_string()]
    );
    assert!(decorator.has_attribute("color"));
    assert!(!decorator.has_attribute("stubs"));
    assert!(!decorator.has_attribute("weight"));
}

#[test]
fn test_id_reads_back_after_save() {
    let store = store();
    let mut decorator = Decorator::<BalloonDecorator, _>::new(balloon(&store));
    assert_eq!(decorator.read("id").unwrap(), Value::Null);

    decorator.save_strict().unwrap();
    let id = decorator.decorated_record().id.unwrap();
    assert_eq!(decorator.read("id").unwrap(), Value::Integer(id as i64));
}

#[test]
fn test_override_replaces_delegated_value() {
    let store = store();
    let decorator = Decorator::<OrangeDecorator, _>::new(balloon(&store));

    assert_eq!(decorator.read("color").unwrap(), Value::from("orange"));
    assert_eq!(decorator.read("size").unwrap(), Value::from("large"));
}

#[test]
fn test_override_can_call_original_behavior() {
    let store = store();
    let decorator = Decorator::<PastelDecorator, _>::new(balloon(&store));

    assert_eq!(decorator.read("color").unwrap(), Value::from("pastel-blue"));
    assert_eq!(decorator.decorated_record().color, "blue");
}

#[test]
fn test_indexed_read_goes_through_override() {
    let store = store();
    let decorator = Decorator::<ReaderSpy, _>::new(balloon(&store));

    assert_eq!(decorator.read_attribute("color").unwrap(), Value::from("blue"));
    assert!(decorator.called.get());
}

#[test]
fn test_indexed_write_goes_through_override() {
    let store = store();
    let mut decorator = Decorator::<WriterSpy, _>::new(balloon(&store));

    decorator.write("color", "green").unwrap();

    assert!(decorator.called);
    assert_eq!(decorator.read("color").unwrap(), Value::from("green"));
    assert_eq!(decorator.decorated_record().color, "green");
}

#[test]
fn test_bulk_assignment_uses_overridden_setters() {
    let store = store();
    let mut decorator = Decorator::<WriterSpy, _>::new(balloon(&store));

    decorator.assign([("color", "green")]).unwrap();

    assert!(decorator.called);
    assert_eq!(decorator.read("color").unwrap(), Value::from("green"));
}

#[test]
fn test_bulk_assignment_from_json() {
    let store = store();
    let mut decorator = Decorator::<LowercaseDecorator, _>::new(balloon(&store));
    let attrs = serde_json::json!({"color": "RED", "size": "small"});

    decorator
        .assign_json(attrs.as_object().unwrap())
        .unwrap();

    assert_eq!(decorator.decorated_record().color, "red");
    assert_eq!(decorator.decorated_record().size, "small");
}

#[test]
fn test_unknown_and_readonly_attributes_are_rejected() {
    let store = store();
    let mut decorator = Decorator::<BalloonDecorator, _>::new(balloon(&store));

    let err = decorator.read("weight").unwrap_err();
    assert!(matches!(err, VeneerError::UnknownAttribute { ref attribute, .. } if attribute == "weight"));

    let err = decorator.write("id", 5_i64).unwrap_err();
    assert!(matches!(err, VeneerError::ReadOnlyAttribute { .. }));

    let err = decorator.write("color", 5_i64).unwrap_err();
    assert!(matches!(err, VeneerError::TypeMismatch(_)));
    assert_eq!(decorator.decorated_record().color, "blue");
}

#[test]
fn test_bulk_assignment_keeps_pairs_before_failure() {
    let store = store();
    let mut decorator = Decorator::<BalloonDecorator, _>::new(balloon(&store));

    let result = decorator.assign([
        ("color", Value::from("green")),
        ("weight", Value::from(3_i64)),
    ]);

    assert!(result.is_err());
    assert_eq!(decorator.decorated_record().color, "green");
}

#[test]
fn test_decorated_record_is_the_wrapped_record() {
    let store = store();
    let original = balloon(&store);
    let decorator = Decorator::<BalloonDecorator, _>::new(original);

    let wrapped: &Balloon = decorator.decorated_record();
    assert_eq!(wrapped.color, "blue");
    assert!(std::ptr::eq(wrapped, decorator.decorated_record_deep()));

    let recovered = decorator.into_inner();
    assert_eq!(recovered.size, "large");
}

#[test]
fn test_decorated_record_deep_without_nesting() {
    let store = store();
    let plain = balloon(&store);
    assert!(std::ptr::eq(plain.base(), &plain));
}

#[test]
fn test_decorated_record_deep_through_nested_decorators() {
    let store = store();
    let layer1 = Decorator::<BalloonDecorator, _>::new(balloon(&store));
    let layer2 = Decorator::<BalloonDecorator, _>::new(layer1);
    let subject = Decorator::<BalloonDecorator, _>::new(layer2);

    let base = subject
        .decorated_record()
        .decorated_record()
        .decorated_record();
    let deep: &Balloon = subject.decorated_record_deep();
    assert!(std::ptr::eq(deep, base));
}

#[test]
fn test_decorated_record_deep_through_mixed_chain() {
    let store = store();
    let chain = Decorator::<BalloonDecorator, _>::new(Decorator::<LowercaseDecorator, _>::new(
        Decorator::<BalloonDecorator, _>::new(Decorator::<LowercaseDecorator, _>::new(
            Decorator::<BalloonDecorator, _>::new(balloon(&store)),
        )),
    ));

    assert_eq!(chain.decorated_record_deep().color, "blue");
}

#[test]
fn test_nested_overrides_compose_outside_in() {
    let store = store();
    let mut chain = Decorator::<BalloonDecorator, _>::new(Decorator::<LowercaseDecorator, _>::new(
        balloon(&store),
    ));

    chain.write("color", "PURPLE").unwrap();

    assert_eq!(chain.read("color").unwrap(), Value::from("purple"));
    assert_eq!(chain.decorated_record_deep().color, "purple");
}

#[test]
fn test_instance_model_name_delegates_to_record() {
    let store = store();
    let decorator = Decorator::<OrangeDecorator, _>::new(balloon(&store));
    assert_eq!(decorator.model_name().to_string(), "Balloon");
    assert_eq!(decorator.model_name().route_key, "balloons");
}

#[test]
fn test_persisted_delegates_to_record() {
    let store = store();
    let mut record = balloon(&store);
    record.stubs.persisted = Some(true);
    let decorator = Decorator::<BalloonDecorator, _>::new(record);
    assert!(decorator.persisted());
    assert!(!decorator.new_record());

    let mut record = balloon(&store);
    record.stubs.persisted = Some(false);
    let decorator = Decorator::<BalloonDecorator, _>::new(record);
    assert!(!decorator.persisted());
    assert!(decorator.new_record());
    assert!(decorator.is_new_record());
}
