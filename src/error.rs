use thiserror::Error;

/// Errors surfaced by [`Container`](crate::Container) operations.
///
/// `Clone` so that resolution results can flow through the shared futures
/// that memoize singleton construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IocError {
  /// `resolve` was called for a type with no current registration.
  #[error("no registration found for type '{0}'")]
  NotRegistered(&'static str),

  /// `invoke` was called with a member name the target does not expose.
  #[error("member '{member}' does not exist on '{target}'")]
  MissingMember {
    target: &'static str,
    member: String,
  },

  /// `invoke` was called for a member that exists but is not invocable.
  #[error("member '{member}' of '{target}' is not callable")]
  NotCallable {
    target: &'static str,
    member: String,
  },
}

/// A specialized `Result` type for container operations.
pub type Result<T, E = IocError> = std::result::Result<T, E>;
