//! The five construction strategies and the memoization cell shared by the
//! singleton-like ones.

use crate::container::Container;
use crate::core::{Arguments, TypeKey, Value};
use crate::error::IocError;
use futures_util::future::{BoxFuture, Shared};
use futures_util::FutureExt;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::trace;

pub(crate) type ConstructFn = Arc<dyn Fn(Arguments) -> Value + Send + Sync>;
pub(crate) type ProduceFn = Arc<dyn Fn() -> BoxFuture<'static, Value> + Send + Sync>;

type SharedConstruction = Shared<BoxFuture<'static, Result<Value, IocError>>>;

/// Memoization slot for singleton-like strategies.
///
/// The `NotStarted -> InFlight` transition happens under the cell lock,
/// before the construction future is first polled, so a resolver arriving
/// mid-construction awaits the same shared future instead of starting a
/// second construction.
pub(crate) enum ConstructionCell {
  NotStarted,
  InFlight(SharedConstruction),
  Completed(Result<Value, IocError>),
}

impl ConstructionCell {
  pub(crate) fn empty() -> Mutex<Self> {
    Mutex::new(ConstructionCell::NotStarted)
  }
}

/// One construction strategy for a requested type.
pub(crate) enum Registration {
  /// A new instance per resolve.
  Transient {
    concrete: TypeKey,
    construct: ConstructFn,
  },
  /// One lazily-constructed instance shared by every resolve.
  Singleton {
    concrete: TypeKey,
    construct: ConstructFn,
    cell: Mutex<ConstructionCell>,
  },
  /// A pre-built instance, returned as-is.
  Instance { value: Value },
  /// The producer runs once per resolve.
  Factory { produce: ProduceFn },
  /// The producer runs at most once; its result is memoized.
  SingletonFactory {
    produce: ProduceFn,
    cell: Mutex<ConstructionCell>,
  },
}

impl Registration {
  /// Resolves this registration into a value, using `builder` to construct
  /// the argument list of constructor-based strategies.
  pub(crate) async fn resolve(&self, builder: &Container) -> Result<Value, IocError> {
    match self {
      Registration::Transient {
        concrete,
        construct,
      } => {
        let args = builder.build_arguments(*concrete).await?;
        Ok(construct(args))
      }
      Registration::Singleton {
        concrete,
        construct,
        cell,
      } => {
        memoize(cell, || {
          let builder = builder.clone();
          let concrete = *concrete;
          let construct = Arc::clone(construct);
          async move {
            let args = builder.build_arguments(concrete).await?;
            Ok(construct(args))
          }
          .boxed()
        })
        .await
      }
      Registration::Instance { value } => Ok(value.clone()),
      Registration::Factory { produce } => Ok(produce().await),
      Registration::SingletonFactory { produce, cell } => {
        memoize(cell, || produce().map(Ok).boxed()).await
      }
    }
  }
}

/// Runs `start`'s construction at most once per cell.
///
/// The first caller creates the shared future and publishes it as `InFlight`
/// while still holding the lock; `start` itself only boxes the construction,
/// nothing is polled until after the lock is released. The outcome is kept
/// forever, errors included: a failed construction is observed by every
/// later resolve.
async fn memoize(
  cell: &Mutex<ConstructionCell>,
  start: impl FnOnce() -> BoxFuture<'static, Result<Value, IocError>>,
) -> Result<Value, IocError> {
  let shared = {
    let mut slot = cell.lock();
    match &*slot {
      ConstructionCell::Completed(result) => return result.clone(),
      ConstructionCell::InFlight(shared) => {
        trace!("joining in-flight construction");
        shared.clone()
      }
      ConstructionCell::NotStarted => {
        let shared = start().shared();
        *slot = ConstructionCell::InFlight(shared.clone());
        shared
      }
    }
  };

  let result = shared.await;

  // Promote to `Completed` so the boxed future (and whatever it captured)
  // can be dropped.
  let mut slot = cell.lock();
  if matches!(&*slot, ConstructionCell::InFlight(_)) {
    *slot = ConstructionCell::Completed(result.clone());
  }
  result
}
