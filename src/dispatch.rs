//! The method-invocation seam.

use crate::core::{Arguments, Value};
use futures_util::future::BoxFuture;
use std::any::Any;

/// What a named member of a dispatch target is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Member {
  /// Present and invocable.
  Method,
  /// Present, but plain data; invoking it is an error.
  Field,
}

/// Exposes a value's members to [`Container::invoke`](crate::Container::invoke).
///
/// This is the runtime-reflection seam: implementors report which members
/// they have and run a named method with the arguments the container
/// resolved. `call` is only reached for names that [`member`](Dispatch::member)
/// reported as [`Member::Method`]; it may suspend, and its result is
/// returned erased.
pub trait Dispatch: Any + Send + Sync {
  /// Reports whether `name` exists on this value, and what kind of member
  /// it is.
  fn member(&self, name: &str) -> Option<Member>;

  /// Runs `method` with the resolved `args`, in declared parameter order.
  fn call<'a>(&'a self, method: &str, args: Arguments) -> BoxFuture<'a, Value>;
}
