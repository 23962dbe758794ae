use std::sync::Arc;
use weft_ioc::{params, Arguments, Construct, Container, IocError, MetadataTable};

#[derive(Debug)]
struct Child;

impl Construct for Child {
  fn construct(_args: &mut Arguments) -> Self {
    Child
  }
}

async fn assert_not_registered(container: &Container) {
  let err = container.resolve::<Child>().await.unwrap_err();
  assert!(matches!(err, IocError::NotRegistered(_)));
}

#[tokio::test]
async fn unregistered_transient_fails_to_resolve() {
  let container = Container::new();
  container.register_transient::<Child>();
  container.unregister::<Child>();

  assert_not_registered(&container).await;
}

#[tokio::test]
async fn unregistered_singleton_fails_to_resolve() {
  let container = Container::new();
  container.register_singleton::<Child>();
  container.unregister::<Child>();

  assert_not_registered(&container).await;
}

#[tokio::test]
async fn unregistered_instance_fails_to_resolve() {
  let container = Container::new();
  container.register_instance::<Child>(Arc::new(Child));
  container.unregister::<Child>();

  assert_not_registered(&container).await;
}

#[tokio::test]
async fn unregistered_factory_fails_to_resolve() {
  let container = Container::new();
  container.register_factory::<Child, _, _>(|| async { Arc::new(Child) });
  container.unregister::<Child>();

  assert_not_registered(&container).await;
}

#[tokio::test]
async fn unregistered_singleton_factory_fails_to_resolve() {
  let container = Container::new();
  container.register_singleton_factory::<Child, _, _>(|| async { Arc::new(Child) });
  container.unregister::<Child>();

  assert_not_registered(&container).await;
}

#[tokio::test]
async fn unregistering_an_unknown_type_is_a_no_op() {
  let container = Container::new();

  // Neither call is an error, registered or not.
  container.unregister::<Child>();
  container.unregister::<Child>();
}

#[tokio::test]
async fn parameter_records_survive_unregistration() {
  struct Wrapper {
    child: Arc<Child>,
  }

  impl Construct for Wrapper {
    fn construct(args: &mut Arguments) -> Self {
      Wrapper { child: args.next() }
    }
  }

  let metadata = MetadataTable::new();
  metadata.record_constructor::<Wrapper>(params![Child]);

  let container = Container::with_metadata(Arc::new(metadata));
  container.register_transient::<Child>();
  container.register_transient::<Wrapper>();

  container.unregister::<Wrapper>();
  container.register_transient::<Wrapper>();

  // The re-registered wrapper still resolves with its dependency injected.
  let wrapper = container.resolve::<Wrapper>().await.unwrap();
  let _ = wrapper.child;
}
