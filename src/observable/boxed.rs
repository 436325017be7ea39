//! Boxed publisher types for type erasure
//!
//! Composition produces deeply nested stage types. `box_it()` hides them
//! behind `BoxedObservable<Item, Err>` so a pipeline can be returned from a
//! function or stored in a struct field.

use crate::{
  observable::{Observable, ObservableType},
  observer::{BoxedObserver, Observer},
  subscription::{BoxedSubscription, IntoBoxedSubscription},
};

// ============================================================================
// DynObservable Trait
// ============================================================================

/// Object-safe publisher trait for type erasure.
///
/// `Observable::actual_subscribe` is generic over the observer type, so it
/// cannot go in a vtable. This trait takes a boxed observer and returns a
/// boxed subscription instead.
pub trait DynObservable<Item, Err> {
  fn dyn_subscribe(self: Box<Self>, observer: BoxedObserver<Item, Err>) -> BoxedSubscription;
}

impl<S, Item, Err> DynObservable<Item, Err> for S
where
  S: Observable<Item = Item, Err = Err>,
  Item: 'static,
  Err: 'static,
{
  fn dyn_subscribe(self: Box<Self>, observer: BoxedObserver<Item, Err>) -> BoxedSubscription {
    (*self).actual_subscribe(observer).into_boxed()
  }
}

/// A publisher whose concrete type is erased.
///
/// ```rust
/// use rxlite::prelude::*;
///
/// fn evens(limit: i32) -> BoxedObservable<i32, std::convert::Infallible> {
///   observable::from_iter(0..limit).filter(|v| v % 2 == 0).box_it()
/// }
///
/// evens(10).subscribe(|v| println!("{v}"));
/// ```
pub struct BoxedObservable<Item, Err>(Box<dyn DynObservable<Item, Err>>);

impl<Item: 'static, Err: 'static> BoxedObservable<Item, Err> {
  pub fn new<S>(source: S) -> Self
  where
    S: Observable<Item = Item, Err = Err> + 'static,
  {
    Self(Box::new(source))
  }
}

impl<Item, Err> ObservableType for BoxedObservable<Item, Err> {
  type Item = Item;
  type Err = Err;
}

impl<Item: 'static, Err: 'static> Observable for BoxedObservable<Item, Err> {
  type Unsub = BoxedSubscription;

  fn actual_subscribe<O>(self, observer: O) -> Self::Unsub
  where
    O: Observer<Item, Err> + 'static,
  {
    self.0.dyn_subscribe(Box::new(observer))
  }
}
