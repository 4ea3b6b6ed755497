//! Declarative helpers for decorator classes.

/// Implements [`DecoratorClass`](crate::DecoratorClass) for a type.
///
/// ```
/// # use veneer::decorator_class;
/// struct BalloonDecorator;
/// struct PartyBalloonDecorator;
///
/// decorator_class!(BalloonDecorator);
/// decorator_class!(PartyBalloonDecorator: BalloonDecorator);
/// ```
///
/// The second form names a superclass: configuration is inherited from it
/// until the subclass configures itself.
///
/// The third form also points at the field holding the parent's state, which
/// is what [`Definition::inherit`](crate::Definition::inherit) needs to run
/// the parent's callbacks and rules:
///
/// ```
/// # use veneer::decorator_class;
/// # #[derive(Default)]
/// # struct BalloonDecorator;
/// # decorator_class!(BalloonDecorator);
/// #[derive(Default)]
/// struct WaterBalloonDecorator {
///     balloon: BalloonDecorator,
///     litres: u32,
/// }
///
/// decorator_class!(WaterBalloonDecorator: BalloonDecorator { balloon });
/// ```
#[macro_export]
macro_rules! decorator_class {
    ($name:ty : $parent:ty { $field:ident }) => {
        $crate::decorator_class!($name: $parent);

        impl ::core::convert::AsRef<$parent> for $name {
            fn as_ref(&self) -> &$parent {
                &self.$field
            }
        }

        impl ::core::convert::AsMut<$parent> for $name {
            fn as_mut(&mut self) -> &mut $parent {
                &mut self.$field
            }
        }
    };
    ($name:ty : $parent:ty) => {
        impl $crate::DecoratorClass for $name {
            fn superclass() -> ::core::option::Option<$crate::ClassId> {
                ::core::option::Option::Some($crate::ClassId::of::<$parent>())
            }
        }
    };
    ($name:ty) => {
        impl $crate::DecoratorClass for $name {}
    };
}
