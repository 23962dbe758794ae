//! The metadata seam: where the container learns which parameter types a
//! constructor or method declares.

use crate::core::TypeKey;
use dashmap::DashMap;
use std::any::Any;
use std::sync::Arc;

/// Supplies the ordered parameter-type lists the resolver injects.
///
/// The container never inspects types itself; it asks this collaborator once
/// per registration (for constructors) or per invocation (for methods) and
/// treats the answer as ground truth. `None` from
/// [`constructor_parameter_types`](MetadataProvider::constructor_parameter_types)
/// means "no metadata recorded", which the resolver reads as a no-argument
/// constructor.
pub trait MetadataProvider: Send + Sync {
  fn constructor_parameter_types(&self, concrete: TypeKey) -> Option<Vec<TypeKey>>;

  /// Parameter types of a named method, consulted by
  /// [`Container::invoke`](crate::Container::invoke). Must be present for any
  /// method that is actually invoked.
  fn method_parameter_types(&self, target: TypeKey, method: &str) -> Option<Vec<TypeKey>>;
}

/// A recording [`MetadataProvider`].
///
/// Callers declare parameter lists up front and hand the table to
/// [`Container::with_metadata`](crate::Container::with_metadata). Recording
/// the same constructor or method twice replaces the earlier list.
#[derive(Default)]
pub struct MetadataTable {
  constructors: DashMap<TypeKey, Arc<[TypeKey]>>,
  methods: DashMap<(TypeKey, String), Arc<[TypeKey]>>,
}

impl MetadataTable {
  pub fn new() -> Self {
    Self::default()
  }

  /// Records the constructor parameter types of `T`, in declared order.
  pub fn record_constructor<T: ?Sized + Any>(&self, params: Vec<TypeKey>) {
    self.constructors.insert(TypeKey::of::<T>(), Arc::from(params));
  }

  /// Records the parameter types of `T`'s method `method`, in declared order.
  pub fn record_method<T: ?Sized + Any>(&self, method: &str, params: Vec<TypeKey>) {
    self
      .methods
      .insert((TypeKey::of::<T>(), method.to_owned()), Arc::from(params));
  }
}

impl MetadataProvider for MetadataTable {
  fn constructor_parameter_types(&self, concrete: TypeKey) -> Option<Vec<TypeKey>> {
    self.constructors.get(&concrete).map(|entry| entry.value().to_vec())
  }

  fn method_parameter_types(&self, target: TypeKey, method: &str) -> Option<Vec<TypeKey>> {
    self
      .methods
      .get(&(target, method.to_owned()))
      .map(|entry| entry.value().to_vec())
  }
}
