use std::{convert::Infallible, marker::PhantomData};

use crate::{
  observable::{Observable, ObservableType},
  observer::Observer,
};

/// Creates a publisher that produces no values and completes immediately.
///
/// ```rust
/// use rxlite::prelude::*;
///
/// observable::empty::<i32>().subscribe(|v| println!("{v},"));
///
/// // Result: nothing printed
/// ```
pub fn empty<Item>() -> Empty<Item> { Empty(PhantomData) }

/// Creates a publisher that emits no values and fails with `err`.
pub fn fail<Item, Err>(err: Err) -> Fail<Item, Err> { Fail(err, PhantomData) }

pub struct Empty<Item>(PhantomData<fn() -> Item>);

impl<Item> Clone for Empty<Item> {
  fn clone(&self) -> Self { Empty(PhantomData) }
}

impl<Item> ObservableType for Empty<Item> {
  type Item = Item;
  type Err = Infallible;
}

impl<Item> Observable for Empty<Item> {
  type Unsub = ();

  fn actual_subscribe<O>(self, observer: O) -> Self::Unsub
  where
    O: Observer<Item, Infallible> + 'static,
  {
    observer.complete();
  }
}

#[derive(Clone)]
pub struct Fail<Item, Err>(Err, PhantomData<fn() -> Item>);

impl<Item, Err> ObservableType for Fail<Item, Err> {
  type Item = Item;
  type Err = Err;
}

impl<Item, Err> Observable for Fail<Item, Err> {
  type Unsub = ();

  fn actual_subscribe<O>(self, observer: O) -> Self::Unsub
  where
    O: Observer<Item, Err> + 'static,
  {
    observer.error(self.0);
  }
}
