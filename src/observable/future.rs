use std::{
  future::Future,
  pin::Pin,
  task::{ready, Context, Poll},
};

use futures::task::{LocalSpawn, LocalSpawnExt};
use pin_project_lite::pin_project;

use crate::{
  error::{Completion, RxError},
  logging::{rx_trace, rx_warn},
  observable::{Observable, ObservableType},
  observer::Observer,
  rc::{MutRc, RcDeref, RcDerefMut},
  subject::{Subject, SubjectSubscription},
};

/// A one-shot publisher: emits exactly one value then completes, or fails
/// once.
///
/// The result is produced through a [`Promise`]. It is cached, so
/// subscribers that attach after resolution receive it immediately.
///
/// ```rust
/// use rxlite::prelude::*;
///
/// let companies = FuturePublisher::<Vec<&str>, RxError>::new(|promise| {
///   promise.succeed(vec!["Apple", "Google"]);
/// });
///
/// companies.sink(|v| println!("{v:?}"), |c| println!("{c:?}"));
/// ```
pub struct FuturePublisher<Item, Err> {
  subject: Subject<Item, Err>,
  result: MutRc<Option<Result<Item, Err>>>,
}

impl<Item, Err> Clone for FuturePublisher<Item, Err> {
  fn clone(&self) -> Self { Self { subject: self.subject.clone(), result: self.result.clone() } }
}

/// The write end of a [`FuturePublisher`]. Resolving consumes it, so a
/// publisher is resolved at most once.
pub struct Promise<Item, Err> {
  target: Option<FuturePublisher<Item, Err>>,
}

impl<Item: Clone, Err: Clone> FuturePublisher<Item, Err> {
  /// Run `producer` right away with the promise for this publisher.
  /// `producer` may resolve it synchronously or hand it to whatever will
  /// resolve it later.
  pub fn new(producer: impl FnOnce(Promise<Item, Err>)) -> Self {
    let (publisher, promise) = Self::pending();
    producer(promise);
    publisher
  }

  /// An unresolved publisher and its promise.
  pub fn pending() -> (Self, Promise<Item, Err>) {
    let publisher = Self::unresolved();
    let promise = Promise { target: Some(publisher.clone()) };
    (publisher, promise)
  }

  fn unresolved() -> Self { Self { subject: Subject::new(), result: MutRc::own(None) } }

  pub fn is_resolved(&self) -> bool { self.result.rc_deref().is_some() }

  fn settle(&self, result: Result<Item, Err>) {
    if self.is_resolved() {
      return;
    }
    *self.result.rc_deref_mut() = Some(result.clone());
    match result {
      Ok(value) => {
        self.subject.next(value);
        self.subject.send_completion(Completion::Finished);
      }
      Err(err) => self.subject.send_completion(Completion::Failure(err)),
    }
  }
}

impl<Item: Clone, Err: Clone> Promise<Item, Err> {
  pub fn resolve(mut self, result: Result<Item, Err>) {
    if let Some(target) = self.target.take() {
      target.settle(result);
    }
  }

  pub fn succeed(self, value: Item) { self.resolve(Ok(value)) }

  pub fn fail(self, err: Err) { self.resolve(Err(err)) }
}

impl<Item, Err> Drop for Promise<Item, Err> {
  fn drop(&mut self) {
    if self.target.is_some() {
      rx_warn!("promise dropped unresolved, its publisher will never terminate");
    }
  }
}

impl<Item, Err> ObservableType for FuturePublisher<Item, Err> {
  type Item = Item;
  type Err = Err;
}

impl<Item, Err> Observable for FuturePublisher<Item, Err>
where
  Item: Clone + 'static,
  Err: Clone + 'static,
{
  type Unsub = SubjectSubscription<Item, Err>;

  fn actual_subscribe<O>(self, mut observer: O) -> Self::Unsub
  where
    O: Observer<Item, Err> + 'static,
  {
    let settled = self.result.rc_deref().clone();
    match settled {
      Some(Ok(value)) => {
        observer.next(value);
        observer.complete();
        SubjectSubscription::closed()
      }
      Some(Err(err)) => {
        observer.error(err);
        SubjectSubscription::closed()
      }
      None => self.subject.actual_subscribe(observer),
    }
  }
}

// ============================================================================
// from_future
// ============================================================================

/// Wraps a `Future` whose output is a `Result` as a [`FuturePublisher`].
///
/// The future is spawned on `spawner` right away; `Ok` becomes the single
/// value, `Err` the failure. If the spawner refuses the future, the
/// publisher fails with [`RxError::Spawn`].
///
/// ```rust
/// use futures::executor::LocalPool;
/// use rxlite::prelude::*;
///
/// let mut pool = LocalPool::new();
/// observable::from_future(async { Ok::<_, RxError>(42) }, pool.spawner())
///   .sink(|v| assert_eq!(v, 42), |c| assert_eq!(c, Completion::Finished));
/// pool.run();
/// ```
pub fn from_future<F, Item, Err, S>(future: F, spawner: S) -> FuturePublisher<Item, Err>
where
  F: Future<Output = Result<Item, Err>> + 'static,
  Item: Clone + 'static,
  Err: Clone + From<RxError> + 'static,
  S: LocalSpawn,
{
  let publisher = FuturePublisher::unresolved();
  let task = ResolveFuture { future, publisher: Some(publisher.clone()) };
  if let Err(e) = spawner.spawn_local(task) {
    rx_warn!("failed to spawn future: {}", e);
    publisher.settle(Err(RxError::Spawn(e.to_string()).into()));
  }
  publisher
}

pin_project! {
  struct ResolveFuture<F, Item, Err> {
    #[pin]
    future: F,
    publisher: Option<FuturePublisher<Item, Err>>,
  }
}

impl<F, Item, Err> Future for ResolveFuture<F, Item, Err>
where
  F: Future<Output = Result<Item, Err>>,
  Item: Clone,
  Err: Clone,
{
  type Output = ();

  fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
    let this = self.project();
    let result = ready!(this.future.poll(cx));
    if let Some(publisher) = this.publisher.take() {
      rx_trace!("future resolved (ok: {})", result.is_ok());
      publisher.settle(result);
    }
    Poll::Ready(())
  }
}
