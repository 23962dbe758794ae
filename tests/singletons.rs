use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use weft_ioc::{params, Arguments, Construct, Container, IocError, MetadataTable};

// --- Fixtures ---

// Produced by an async factory so singleton construction has a real
// suspension point between starting and completing.
struct SlowDep;

#[derive(Debug)]
struct Probe {
  id: usize,
}

impl Construct for Probe {
  fn construct(_args: &mut Arguments) -> Self {
    static NEXT_ID: AtomicUsize = AtomicUsize::new(0);
    Probe {
      id: NEXT_ID.fetch_add(1, Ordering::SeqCst),
    }
  }
}

// --- Tests ---

#[tokio::test]
async fn singleton_resolves_to_the_same_instance() {
  let container = Container::new();
  container.register_singleton::<Probe>();

  let first = container.resolve::<Probe>().await.unwrap();
  let second = container.resolve::<Probe>().await.unwrap();

  assert!(Arc::ptr_eq(&first, &second));
  assert_eq!(first.id, second.id);
}

#[tokio::test]
async fn concurrent_resolves_share_one_construction() {
  static CONSTRUCTIONS: AtomicUsize = AtomicUsize::new(0);

  struct Counted {
    _dep: Arc<SlowDep>,
  }

  impl Construct for Counted {
    fn construct(args: &mut Arguments) -> Self {
      CONSTRUCTIONS.fetch_add(1, Ordering::SeqCst);
      Counted { _dep: args.next() }
    }
  }

  let metadata = MetadataTable::new();
  metadata.record_constructor::<Counted>(params![SlowDep]);

  let container = Container::with_metadata(Arc::new(metadata));
  container.register_factory::<SlowDep, _, _>(|| async {
    // Suspend so the second resolver arrives while construction is in
    // flight.
    tokio::task::yield_now().await;
    Arc::new(SlowDep)
  });
  container.register_singleton::<Counted>();

  let (first, second, third) = tokio::join!(
    container.resolve::<Counted>(),
    container.resolve::<Counted>(),
    container.resolve::<Counted>(),
  );

  let first = first.unwrap();
  assert!(Arc::ptr_eq(&first, &second.unwrap()));
  assert!(Arc::ptr_eq(&first, &third.unwrap()));
  assert_eq!(CONSTRUCTIONS.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn factory_runs_once_per_resolve() {
  static CALLS: AtomicUsize = AtomicUsize::new(0);

  let container = Container::new();
  container.register_factory::<u32, _, _>(|| async {
    CALLS.fetch_add(1, Ordering::SeqCst);
    Arc::new(7_u32)
  });

  let first = container.resolve::<u32>().await.unwrap();
  let second = container.resolve::<u32>().await.unwrap();

  assert_eq!(CALLS.load(Ordering::SeqCst), 2);
  assert!(!Arc::ptr_eq(&first, &second));
}

#[tokio::test]
async fn singleton_factory_runs_at_most_once() {
  static CALLS: AtomicUsize = AtomicUsize::new(0);

  let container = Container::new();
  container.register_singleton_factory::<u32, _, _>(|| async {
    CALLS.fetch_add(1, Ordering::SeqCst);
    tokio::task::yield_now().await;
    Arc::new(7_u32)
  });

  let (first, second) = tokio::join!(container.resolve::<u32>(), container.resolve::<u32>());
  let later = container.resolve::<u32>().await.unwrap();

  let first = first.unwrap();
  assert!(Arc::ptr_eq(&first, &second.unwrap()));
  assert!(Arc::ptr_eq(&first, &later));
  assert_eq!(CALLS.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn re_registration_resets_the_memoization() {
  static CALLS: AtomicUsize = AtomicUsize::new(0);

  let container = Container::new();
  let factory = || async {
    CALLS.fetch_add(1, Ordering::SeqCst);
    Arc::new(String::from("value"))
  };

  container.register_singleton_factory::<String, _, _>(factory);
  let first = container.resolve::<String>().await.unwrap();
  assert_eq!(CALLS.load(Ordering::SeqCst), 1);

  // A fresh registration comes with a fresh, empty cell.
  container.register_singleton_factory::<String, _, _>(factory);
  let second = container.resolve::<String>().await.unwrap();

  assert_eq!(CALLS.load(Ordering::SeqCst), 2);
  assert!(!Arc::ptr_eq(&first, &second));
}

#[tokio::test]
async fn singleton_captures_its_transient_dependency_once() {
  struct Holder {
    probe: Arc<Probe>,
  }

  impl Construct for Holder {
    fn construct(args: &mut Arguments) -> Self {
      Holder { probe: args.next() }
    }
  }

  let metadata = MetadataTable::new();
  metadata.record_constructor::<Holder>(params![Probe]);

  let container = Container::with_metadata(Arc::new(metadata));
  container.register_transient::<Probe>();
  container.register_singleton::<Holder>();

  let first = container.resolve::<Holder>().await.unwrap();
  let second = container.resolve::<Holder>().await.unwrap();
  let standalone = container.resolve::<Probe>().await.unwrap();

  // The singleton resolved its transient dependency at construction time
  // and holds on to it.
  assert!(Arc::ptr_eq(&first.probe, &second.probe));
  assert_ne!(standalone.id, first.probe.id);
}

#[tokio::test]
async fn failed_singleton_construction_stays_failed() {
  #[derive(Debug)]
  struct NeedsMissing {
    _probe: Arc<Probe>,
  }

  impl Construct for NeedsMissing {
    fn construct(args: &mut Arguments) -> Self {
      NeedsMissing { _probe: args.next() }
    }
  }

  let metadata = MetadataTable::new();
  metadata.record_constructor::<NeedsMissing>(params![Probe]);

  let container = Container::with_metadata(Arc::new(metadata));
  container.register_singleton::<NeedsMissing>();

  let err = container.resolve::<NeedsMissing>().await.unwrap_err();
  assert!(matches!(err, IocError::NotRegistered(_)));

  // The failure is memoized with the cell; registering the missing
  // dependency afterwards does not revive this registration.
  container.register_transient::<Probe>();
  let again = container.resolve::<NeedsMissing>().await.unwrap_err();
  assert_eq!(err, again);
}
