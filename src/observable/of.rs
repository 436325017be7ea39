use std::convert::Infallible;

use crate::{
  observable::{Observable, ObservableType},
  observer::Observer,
};

/// Creates a publisher emitting a single value.
///
/// Completes immediately after emitting the value given. Never fails.
///
/// ```rust
/// use rxlite::prelude::*;
///
/// observable::of(123).subscribe(|v| println!("{v}"));
/// ```
pub fn of<Item>(v: Item) -> Of<Item> { Of(v) }

#[derive(Clone)]
pub struct Of<Item>(pub(crate) Item);

impl<Item> ObservableType for Of<Item> {
  type Item = Item;
  type Err = Infallible;
}

impl<Item> Observable for Of<Item> {
  type Unsub = ();

  fn actual_subscribe<O>(self, mut observer: O) -> Self::Unsub
  where
    O: Observer<Item, Infallible> + 'static,
  {
    observer.next(self.0);
    observer.complete();
  }
}
