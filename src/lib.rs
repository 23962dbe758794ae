//! # Weft IoC
//!
//! A dynamic, async-aware dependency injection container for Rust.
//!
//! A [`Container`] maps *requested types* (concrete types or trait objects)
//! to one of five construction strategies — transient, singleton, instance,
//! factory, singleton-factory — and resolves a requested type into a
//! fully-constructed `Arc` by recursively resolving the constructor
//! dependencies declared for it. Because factories and nested resolutions
//! may suspend, resolution is `async`; singleton construction is memoized
//! in-flight, so concurrent resolvers share one construction instead of
//! racing to start their own.
//!
//! ## Core concepts
//!
//! - **Container**: an explicit, caller-owned registry. Cloning it clones a
//!   handle; there is no global container.
//! - **Metadata**: the container does not inspect types. A
//!   [`MetadataProvider`] (usually a [`MetadataTable`]) tells it which
//!   parameter types a constructor or method declares, and the container
//!   treats that as ground truth.
//! - **Construct / Binding**: a concrete type implements [`Construct`] to be
//!   buildable from resolved arguments, and [`Binding`] links it to the
//!   trait objects it can be requested as (see [`bind!`]).
//! - **Dispatch**: [`Container::invoke`] calls a named method on an existing
//!   value with its declared parameters resolved and injected.
//!
//! ## Quick start
//!
//! ```
//! use weft_ioc::{bind, Arguments, Construct, Container};
//!
//! trait Greeter: Send + Sync {
//!   fn greet(&self) -> String;
//! }
//!
//! struct EnglishGreeter;
//!
//! impl Greeter for EnglishGreeter {
//!   fn greet(&self) -> String {
//!     "Hello, World!".to_string()
//!   }
//! }
//!
//! impl Construct for EnglishGreeter {
//!   fn construct(_args: &mut Arguments) -> Self {
//!     EnglishGreeter
//!   }
//! }
//!
//! bind!(EnglishGreeter => dyn Greeter);
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!   let container = Container::new();
//!   container.register_transient_as::<dyn Greeter, EnglishGreeter>();
//!
//!   let greeter = container.resolve::<dyn Greeter>().await.unwrap();
//!   assert_eq!(greeter.greet(), "Hello, World!");
//! }
//! ```
//!
//! Constructor injection goes through metadata:
//!
//! ```
//! use std::sync::Arc;
//! use weft_ioc::{params, Arguments, Construct, Container, MetadataTable};
//!
//! struct Config {
//!   url: String,
//! }
//!
//! impl Construct for Config {
//!   fn construct(_args: &mut Arguments) -> Self {
//!     Config { url: "db://local".to_string() }
//!   }
//! }
//!
//! struct Repository {
//!   config: Arc<Config>,
//! }
//!
//! impl Construct for Repository {
//!   fn construct(args: &mut Arguments) -> Self {
//!     Repository { config: args.next() }
//!   }
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!   let metadata = MetadataTable::new();
//!   metadata.record_constructor::<Repository>(params![Config]);
//!
//!   let container = Container::with_metadata(Arc::new(metadata));
//!   container.register_singleton::<Config>();
//!   container.register_transient::<Repository>();
//!
//!   let repo = container.resolve::<Repository>().await.unwrap();
//!   assert_eq!(repo.config.url, "db://local");
//! }
//! ```
//!
//! ## Limitations
//!
//! A cycle among registrations (A depends on B depends on A) is not
//! detected; resolving either side recurses until the stack is exhausted.

mod container;
mod core;
mod dispatch;
mod error;
mod macros;
mod metadata;
mod registration;

pub use crate::container::Container;
pub use crate::core::{Arguments, Binding, Construct, TypeKey, Value};
pub use crate::dispatch::{Dispatch, Member};
pub use crate::error::{IocError, Result};
pub use crate::metadata::{MetadataProvider, MetadataTable};

/// The boxed future type [`Dispatch::call`] returns, re-exported so
/// implementors need no direct `futures` dependency.
pub use futures_util::future::BoxFuture;
