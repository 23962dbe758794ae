//! Convenience macros for metadata recording and trait bindings.

/// Builds a `Vec<TypeKey>` from a list of types, for recording parameter
/// lists with a [`MetadataTable`](crate::MetadataTable).
///
/// ```
/// use weft_ioc::{params, TypeKey};
///
/// trait Tool: Send + Sync {}
///
/// let keys = params![dyn Tool, String];
/// assert_eq!(keys[1], TypeKey::of::<String>());
/// ```
#[macro_export]
macro_rules! params {
  ($($ty:ty),* $(,)?) => {
    vec![$($crate::TypeKey::of::<$ty>()),*]
  };
}

/// Implements [`Binding`](crate::Binding) from a concrete type to a
/// trait-object requested type.
///
/// Sized self-registrations never need this; the reflexive binding is built
/// in.
///
/// ```
/// use weft_ioc::{bind, Arguments, Construct};
///
/// trait Greeter: Send + Sync {}
///
/// struct EnglishGreeter;
///
/// impl Greeter for EnglishGreeter {}
///
/// impl Construct for EnglishGreeter {
///   fn construct(_args: &mut Arguments) -> Self {
///     EnglishGreeter
///   }
/// }
///
/// bind!(EnglishGreeter => dyn Greeter);
/// ```
#[macro_export]
macro_rules! bind {
  ($concrete:ty => $requested:ty) => {
    impl $crate::Binding<$requested> for $concrete {
      fn into_requested(this: ::std::sync::Arc<Self>) -> ::std::sync::Arc<$requested> {
        this
      }
    }
  };
}
