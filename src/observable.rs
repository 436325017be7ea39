//! Publishers and the operator surface.
//!
//! [`Observable`] is the publisher contract. Every source and every operator
//! stage implements it, and the provided methods on the trait are how
//! pipelines are composed:
//!
//! ```rust
//! use std::{cell::RefCell, rc::Rc};
//!
//! use rxlite::prelude::*;
//!
//! let out = Rc::new(RefCell::new(vec![]));
//! let c_out = out.clone();
//! observable::from_iter([15, 10])
//!   .map(|v| v + 100)
//!   .filter(|v| v % 2 == 0)
//!   .subscribe(move |v| c_out.borrow_mut().push(v));
//!
//! assert_eq!(*out.borrow(), vec![110]);
//! ```

mod boxed;
mod from_iter;
mod future;
mod interval;
mod of;
mod trivial;

use std::{convert::Infallible, fmt::Debug};

pub use boxed::{BoxedObservable, DynObservable};
pub use from_iter::{from_iter, FromIter};
pub use future::{from_future, FuturePublisher, Promise};
pub use interval::{interval, timer, Interval, IntervalSubscription, Timer};
pub use of::{of, Of};
pub use trivial::{empty, fail, Empty, Fail};

use crate::{
  error::Completion,
  observer::{FnMutObserver, Observer, SinkObserver},
  ops::{
    filter::{FilterOp, TryFilterOp},
    handle_events::{EventHooks, HandleEventsOp},
    map::{MapOp, TryMapOp},
    map_err::MapErrOp,
    replace_error::ReplaceErrorOp,
    scan::ScanOp,
    trace::TraceOp,
    zip::ZipOp,
  },
  subscription::Subscription,
};

/// The value and failure types of a publisher.
pub trait ObservableType {
  type Item;
  type Err;
}

/// A publisher of `Item`s that ends with completion or an `Err`.
///
/// Only [`actual_subscribe`](Observable::actual_subscribe) has to be
/// implemented. Subscribing consumes the publisher value; publishers that can
/// be subscribed many times (subjects, `of`, `from_iter` over a `Clone`
/// iterator) are `Clone`.
pub trait Observable: ObservableType + Sized {
  /// The cancellation token returned to the subscriber.
  type Unsub: Subscription + 'static;

  /// Attach `observer` and start delivering to it.
  fn actual_subscribe<O>(self, observer: O) -> Self::Unsub
  where
    O: Observer<Self::Item, Self::Err> + 'static;

  // ==================== Subscribe ====================

  /// Subscribe a value callback to a publisher that cannot fail.
  fn subscribe<F>(self, on_value: F) -> Self::Unsub
  where
    Self: ObservableType<Err = Infallible>,
    F: FnMut(Self::Item) + 'static,
  {
    self.actual_subscribe(FnMutObserver(on_value))
  }

  /// Subscribe a value callback plus a completion callback that receives
  /// either [`Completion::Finished`] or [`Completion::Failure`].
  fn sink<N, C>(self, on_value: N, on_completion: C) -> Self::Unsub
  where
    N: FnMut(Self::Item) + 'static,
    C: FnOnce(Completion<Self::Err>) + 'static,
  {
    self.actual_subscribe(SinkObserver::new(on_value, on_completion))
  }

  /// Subscribe a hand-written [`Observer`].
  fn subscribe_with<O>(self, observer: O) -> Self::Unsub
  where
    O: Observer<Self::Item, Self::Err> + 'static,
  {
    self.actual_subscribe(observer)
  }

  // ==================== Operators ====================

  /// Transform every value with `f`.
  fn map<B, F>(self, f: F) -> MapOp<Self, F>
  where
    F: FnMut(Self::Item) -> B,
  {
    MapOp { source: self, func: f }
  }

  /// Transform every value with a fallible `f`. The first `Err` fails the
  /// pipeline and `f` is released.
  ///
  /// ```rust
  /// use std::{cell::RefCell, rc::Rc};
  ///
  /// use rxlite::prelude::*;
  ///
  /// let input = Subject::<&'static str, RxError>::new();
  /// let done = Rc::new(RefCell::new(None));
  /// let c_done = done.clone();
  /// input
  ///   .clone()
  ///   .try_map(|s| s.parse::<i32>().map_err(|_| RxError::InvalidInput(s.to_string())))
  ///   .sink(|_| {}, move |c| *c_done.borrow_mut() = Some(c));
  ///
  /// input.next("1");
  /// input.next("x");
  /// assert_eq!(*done.borrow(), Some(Completion::Failure(RxError::InvalidInput("x".into()))));
  /// ```
  fn try_map<B, F>(self, f: F) -> TryMapOp<Self, F>
  where
    F: FnMut(Self::Item) -> Result<B, Self::Err>,
  {
    TryMapOp { source: self, func: f }
  }

  /// Forward only the values for which `pred` holds.
  fn filter<F>(self, pred: F) -> FilterOp<Self, F>
  where
    F: FnMut(&Self::Item) -> bool,
  {
    FilterOp { source: self, pred }
  }

  /// Like [`filter`](Observable::filter), but an `Err` from `pred` fails the
  /// pipeline.
  fn try_filter<F>(self, pred: F) -> TryFilterOp<Self, F>
  where
    F: FnMut(&Self::Item) -> Result<bool, Self::Err>,
  {
    TryFilterOp { source: self, pred }
  }

  /// Fold every value into a running accumulator and emit the accumulator
  /// after each step.
  ///
  /// ```rust
  /// use std::{cell::RefCell, rc::Rc};
  ///
  /// use rxlite::prelude::*;
  ///
  /// let out = Rc::new(RefCell::new(vec![]));
  /// let c_out = out.clone();
  /// observable::from_iter(['a', 'b', 'c'])
  ///   .scan(0, |acc, _| acc + 1)
  ///   .subscribe(move |v| c_out.borrow_mut().push(v));
  ///
  /// assert_eq!(*out.borrow(), vec![1, 2, 3]);
  /// ```
  fn scan<Acc, F>(self, seed: Acc, combine: F) -> ScanOp<Self, F, Acc>
  where
    F: FnMut(Acc, Self::Item) -> Acc,
    Acc: Clone,
  {
    ScanOp { source: self, combine, seed }
  }

  /// Pair the nth value of `self` with the nth value of `other`.
  ///
  /// The faster side is buffered until the slower one catches up. The zip
  /// completes as soon as one side has completed and its buffer is drained,
  /// and fails as soon as either side fails. The other side is cancelled in
  /// both cases.
  fn zip<Other>(self, other: Other) -> ZipOp<Self, Other>
  where
    Other: Observable<Err = Self::Err>,
  {
    ZipOp { left: self, right: other }
  }

  /// Run side effects at lifecycle points without touching the stream.
  fn handle_events(self, hooks: EventHooks<Self::Item, Self::Err>) -> HandleEventsOp<Self> {
    HandleEventsOp { source: self, hooks }
  }

  /// On failure emit `fallback` once and complete instead.
  fn replace_error(self, fallback: Self::Item) -> ReplaceErrorOp<Self> {
    ReplaceErrorOp { source: self, fallback }
  }

  /// Transform the failure value.
  fn map_err<E, F>(self, f: F) -> MapErrOp<Self, F>
  where
    F: FnOnce(Self::Err) -> E,
  {
    MapErrOp { source: self, func: f }
  }

  /// Log every lifecycle event under `label`.
  fn trace(self, label: impl Into<String>) -> TraceOp<Self>
  where
    Self::Item: Debug,
    Self::Err: Debug,
  {
    TraceOp { source: self, label: label.into() }
  }

  /// Erase the concrete stage type.
  fn box_it(self) -> BoxedObservable<Self::Item, Self::Err>
  where
    Self: 'static,
  {
    BoxedObservable::new(self)
  }
}
