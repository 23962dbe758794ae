//! The `Container`: registry bookkeeping, the recursive resolver, and the
//! method invoker.

use crate::core::{Arguments, Binding, Construct, TypeKey, Value};
use crate::dispatch::{Dispatch, Member};
use crate::error::IocError;
use crate::metadata::{MetadataProvider, MetadataTable};
use crate::registration::{ConstructFn, ConstructionCell, ProduceFn, Registration};
use dashmap::DashMap;
use futures_util::future::{try_join_all, BoxFuture};
use futures_util::FutureExt;
use std::any::Any;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, trace};

struct ContainerInner {
  metadata: Arc<dyn MetadataProvider>,
  registrations: DashMap<TypeKey, Arc<Registration>>,
  parameter_types: DashMap<TypeKey, Arc<[TypeKey]>>,
}

/// An async dependency-injection container.
///
/// Maps requested types to construction strategies and resolves a requested
/// type into a fully-constructed instance by recursively resolving the
/// parameter types its metadata declares. There is no implicit global
/// container: every `Container` is an explicit value whose registry lives as
/// long as its last handle.
///
/// `Container` is a cheap-clone handle; clones share one registry. All
/// registration methods take `&self` and may be called at any point in the
/// container's life. Re-registering a key silently replaces the prior
/// registration.
///
/// Resolution is cooperative: a resolve suspends at every nested resolve and
/// factory producer, and a registration cycle is not detected — it exhausts
/// the call stack.
#[derive(Clone)]
pub struct Container {
  inner: Arc<ContainerInner>,
}

impl Container {
  /// Creates a container with an empty [`MetadataTable`]: every constructor
  /// is treated as taking no arguments.
  pub fn new() -> Self {
    Self::with_metadata(Arc::new(MetadataTable::new()))
  }

  /// Creates a container that consults `metadata` for constructor and method
  /// parameter types.
  pub fn with_metadata(metadata: Arc<dyn MetadataProvider>) -> Self {
    Self {
      inner: Arc::new(ContainerInner {
        metadata,
        registrations: DashMap::new(),
        parameter_types: DashMap::new(),
      }),
    }
  }

  // --- PRIVATE HELPERS ---

  fn install(&self, requested: TypeKey, registration: Registration) {
    debug!(requested = requested.name(), "installing registration");
    self.inner.registrations.insert(requested, Arc::new(registration));
  }

  // The parameter-type record is keyed by the concrete type and captured
  // once per registration; it outlives the registration that captured it.
  fn capture_parameter_types(&self, concrete: TypeKey) {
    let params = self
      .inner
      .metadata
      .constructor_parameter_types(concrete)
      .unwrap_or_default();
    self.inner.parameter_types.insert(concrete, Arc::from(params));
  }

  fn construct_fn<Requested, Concrete>() -> ConstructFn
  where
    Requested: ?Sized + Any + Send + Sync,
    Concrete: Construct + Binding<Requested>,
  {
    Arc::new(|mut args: Arguments| {
      let service = Arc::new(Concrete::construct(&mut args));
      Value::erase::<Requested>(<Concrete as Binding<Requested>>::into_requested(service))
    })
  }

  fn produce_fn<T, F, Fut>(factory: F) -> ProduceFn
  where
    T: ?Sized + Any + Send + Sync,
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Arc<T>> + Send + 'static,
  {
    Arc::new(move || factory().map(|service| Value::erase(service)).boxed())
  }

  // --- REGISTRATION ---

  /// Registers `T` to construct a fresh `T` on every resolve
  /// (self-registration; identical to `register_transient_as::<T, T>()`).
  pub fn register_transient<T: Construct>(&self) {
    self.register_transient_as::<T, T>();
  }

  /// Registers `Requested` to construct a fresh `Concrete` on every resolve.
  ///
  /// `Concrete`'s parameter-type record is captured from the metadata
  /// provider now, once; later changes to a [`MetadataTable`] do not affect
  /// registrations already made.
  pub fn register_transient_as<Requested, Concrete>(&self)
  where
    Requested: ?Sized + Any + Send + Sync,
    Concrete: Construct + Binding<Requested>,
  {
    let concrete = TypeKey::of::<Concrete>();
    self.capture_parameter_types(concrete);
    self.install(
      TypeKey::of::<Requested>(),
      Registration::Transient {
        concrete,
        construct: Self::construct_fn::<Requested, Concrete>(),
      },
    );
  }

  /// Registers `T` to construct a single, shared `T`, built lazily on first
  /// resolve (self-registration).
  pub fn register_singleton<T: Construct>(&self) {
    self.register_singleton_as::<T, T>();
  }

  /// Registers `Requested` to construct a single, shared `Concrete`.
  ///
  /// The memoization cell starts empty even when this replaces an earlier
  /// singleton registration for the same key.
  pub fn register_singleton_as<Requested, Concrete>(&self)
  where
    Requested: ?Sized + Any + Send + Sync,
    Concrete: Construct + Binding<Requested>,
  {
    let concrete = TypeKey::of::<Concrete>();
    self.capture_parameter_types(concrete);
    self.install(
      TypeKey::of::<Requested>(),
      Registration::Singleton {
        concrete,
        construct: Self::construct_fn::<Requested, Concrete>(),
        cell: ConstructionCell::empty(),
      },
    );
  }

  /// Registers a pre-built instance; every resolve returns this exact `Arc`,
  /// with no construction performed.
  pub fn register_instance<T: ?Sized + Any + Send + Sync>(&self, instance: Arc<T>) {
    self.install(
      TypeKey::of::<T>(),
      Registration::Instance {
        value: Value::erase(instance),
      },
    );
  }

  /// Registers a producer invoked once per resolve of `T`.
  ///
  /// The producer receives no injected arguments; it may capture a clone of
  /// the container and resolve its own dependencies.
  pub fn register_factory<T, F, Fut>(&self, factory: F)
  where
    T: ?Sized + Any + Send + Sync,
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Arc<T>> + Send + 'static,
  {
    self.install(
      TypeKey::of::<T>(),
      Registration::Factory {
        produce: Self::produce_fn(factory),
      },
    );
  }

  /// Registers a producer invoked at most once; its result is memoized and
  /// shared by every resolve of `T`.
  pub fn register_singleton_factory<T, F, Fut>(&self, factory: F)
  where
    T: ?Sized + Any + Send + Sync,
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Arc<T>> + Send + 'static,
  {
    self.install(
      TypeKey::of::<T>(),
      Registration::SingletonFactory {
        produce: Self::produce_fn(factory),
        cell: ConstructionCell::empty(),
      },
    );
  }

  /// Removes any current registration for `T`. Removing a type that was
  /// never registered is a no-op.
  ///
  /// The parameter-type record of a concrete type is kept: it belongs to the
  /// type, not to the registration that captured it.
  pub fn unregister<T: ?Sized + Any>(&self) {
    let requested = TypeKey::of::<T>();
    debug!(requested = requested.name(), "removing registration");
    self.inner.registrations.remove(&requested);
  }

  // --- RESOLUTION ---

  /// Resolves `T` into a shared instance, recursively resolving the
  /// constructor dependencies its parameter-type record declares.
  ///
  /// # Errors
  ///
  /// [`IocError::NotRegistered`] when `T` — or any type in its transitive
  /// dependency chain — has no current registration.
  pub async fn resolve<T: ?Sized + Any + Send + Sync>(&self) -> Result<Arc<T>, IocError> {
    let value = self.resolve_key(TypeKey::of::<T>()).await?;
    // Registrations under this key always erase as `Arc<T>`: the register
    // methods demand a `Binding` to the requested type.
    Ok(
      value
        .downcast::<T>()
        .expect("registered value does not match its requested type"),
    )
  }

  pub(crate) fn resolve_key(&self, requested: TypeKey) -> BoxFuture<'static, Result<Value, IocError>> {
    let container = self.clone();
    async move {
      trace!(requested = requested.name(), "resolving");
      let registration = container
        .inner
        .registrations
        .get(&requested)
        .map(|entry| Arc::clone(entry.value()))
        .ok_or(IocError::NotRegistered(requested.name()))?;
      registration.resolve(&container).await
    }
    .boxed()
  }

  /// The argument builder handed to constructor-based registrations:
  /// resolves every type in `concrete`'s parameter-type record. The entries
  /// may resolve interleaved, but the list is only returned once all of them
  /// have completed, in declared order.
  pub(crate) async fn build_arguments(&self, concrete: TypeKey) -> Result<Arguments, IocError> {
    let params: Vec<TypeKey> = self
      .inner
      .parameter_types
      .get(&concrete)
      .map(|entry| entry.value().to_vec())
      .unwrap_or_default();
    let values = try_join_all(params.into_iter().map(|requested| self.resolve_key(requested))).await?;
    Ok(Arguments::new(values))
  }

  // --- METHOD INVOCATION ---

  /// Invokes `method` on `instance`, with the method's declared parameter
  /// types resolved from this container and passed in declared order. The
  /// method's own suspension, if any, is awaited and its erased result
  /// returned.
  ///
  /// The method's parameter types must be recorded with the metadata
  /// provider; invoking a method without recorded metadata is a contract
  /// violation and panics.
  ///
  /// # Errors
  ///
  /// [`IocError::MissingMember`] and [`IocError::NotCallable`] for unknown
  /// or non-invocable member names, plus any resolution failure of a
  /// parameter type.
  pub async fn invoke<T: Dispatch>(&self, instance: &T, method: &str) -> Result<Value, IocError> {
    let target = TypeKey::of::<T>();
    match instance.member(method) {
      None => Err(IocError::MissingMember {
        target: target.name(),
        member: method.to_owned(),
      }),
      Some(Member::Field) => Err(IocError::NotCallable {
        target: target.name(),
        member: method.to_owned(),
      }),
      Some(Member::Method) => {
        trace!(service = target.name(), method, "invoking");
        let params = self
          .inner
          .metadata
          .method_parameter_types(target, method)
          .unwrap_or_else(|| {
            panic!(
              "no parameter metadata recorded for method '{}' of '{}'",
              method,
              target.name()
            )
          });
        let values =
          try_join_all(params.into_iter().map(|requested| self.resolve_key(requested))).await?;
        Ok(instance.call(method, Arguments::new(values)).await)
      }
    }
  }
}

impl Default for Container {
  fn default() -> Self {
    Self::new()
  }
}
