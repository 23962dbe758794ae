//! Shared currency types: type keys, erased service values, argument lists.

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Identifies a requested type: the key under which registrations are
/// installed and the unit the resolver asks for.
///
/// Keys can be built for concrete types and for trait objects alike
/// (`TypeKey::of::<dyn Logger>()`). Two keys are equal exactly when their
/// `TypeId`s are; the type name is carried along for diagnostics only.
#[derive(Clone, Copy)]
pub struct TypeKey {
  id: TypeId,
  name: &'static str,
}

impl TypeKey {
  pub fn of<T: ?Sized + Any>() -> Self {
    Self {
      id: TypeId::of::<T>(),
      name: std::any::type_name::<T>(),
    }
  }

  /// The `std::any::type_name` of the keyed type.
  pub fn name(&self) -> &'static str {
    self.name
  }
}

impl PartialEq for TypeKey {
  fn eq(&self, other: &Self) -> bool {
    self.id == other.id
  }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.id.hash(state);
  }
}

impl fmt::Debug for TypeKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "TypeKey({})", self.name)
  }
}

/// A type-erased, shareable service value.
///
/// The inner `Any` is always an `Arc<T>` for the requested type `T`, which
/// may be unsized (a trait object). Cloning a `Value` shares that underlying
/// `Arc<T>`, so instance identity survives erasure.
#[derive(Clone)]
pub struct Value(Arc<dyn Any + Send + Sync>);

impl Value {
  /// Erases a service, keeping its `Arc` identity.
  pub fn erase<T: ?Sized + Any + Send + Sync>(service: Arc<T>) -> Self {
    Self(Arc::new(service))
  }

  /// Wraps a plain value in a fresh `Arc` and erases it.
  pub fn new<T: Any + Send + Sync>(value: T) -> Self {
    Self::erase(Arc::new(value))
  }

  /// Recovers the service as `Arc<T>`, or `None` if the erased type differs.
  pub fn downcast<T: ?Sized + Any + Send + Sync>(&self) -> Option<Arc<T>> {
    self.0.downcast_ref::<Arc<T>>().cloned()
  }
}

impl fmt::Debug for Value {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("Value(..)")
  }
}

/// The ordered, fully-resolved arguments handed to a constructor or a
/// dispatched method.
///
/// Arguments are consumed front to back with [`next`](Arguments::next); the
/// order matches the parameter-type record the container resolved them from.
pub struct Arguments {
  values: Vec<Value>,
  cursor: usize,
}

impl Arguments {
  pub(crate) fn new(values: Vec<Value>) -> Self {
    Self { values, cursor: 0 }
  }

  /// Takes the next argument, downcast to `Arc<T>`.
  ///
  /// # Panics
  ///
  /// Panics when the argument list is exhausted or the next argument is not
  /// a `T`. Either means the recorded parameter types disagree with the
  /// constructor or method body consuming them; the container treats the
  /// metadata provider as ground truth and does not recover from this.
  pub fn next<T: ?Sized + Any + Send + Sync>(&mut self) -> Arc<T> {
    let position = self.cursor;
    let value = self.values.get(position).unwrap_or_else(|| {
      panic!(
        "argument {} requested, but only {} parameter types were recorded",
        position,
        self.values.len()
      )
    });
    self.cursor += 1;
    value.downcast::<T>().unwrap_or_else(|| {
      panic!(
        "argument {} is not a '{}'; the recorded parameter types disagree with the consumer",
        position,
        std::any::type_name::<T>()
      )
    })
  }

  pub fn len(&self) -> usize {
    self.values.len()
  }

  pub fn is_empty(&self) -> bool {
    self.values.is_empty()
  }
}

/// A concrete type the container can construct from resolved arguments.
///
/// The body must consume arguments in the same order as the parameter-type
/// record for `Self` in the container's metadata provider; the resolver
/// resolves those keys and hands them over in declared order. A type with no
/// recorded metadata is constructed from an empty argument list.
pub trait Construct: Any + Send + Sync + Sized {
  fn construct(args: &mut Arguments) -> Self;
}

/// Links a concrete type to a requested type it can stand in for.
///
/// Every sized type stands in for itself, so self-registration needs no
/// extra code. For trait-object requested types the coercion has to be
/// written out (or generated with [`bind!`](crate::bind)), since generic code
/// cannot upcast `Arc<Concrete>` to `Arc<dyn Trait>` implicitly.
pub trait Binding<Requested: ?Sized + Any + Send + Sync>: Any + Send + Sync + Sized {
  fn into_requested(this: Arc<Self>) -> Arc<Requested>;
}

impl<T: Any + Send + Sync> Binding<T> for T {
  fn into_requested(this: Arc<Self>) -> Arc<T> {
    this
  }
}
