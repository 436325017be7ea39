use crate::{
  observable::{Observable, ObservableType},
  observer::Observer,
};

/// Stage created by [`Observable::map_err`]. Values and completion pass
/// through untouched.
#[derive(Clone)]
pub struct MapErrOp<S, F> {
  pub(crate) source: S,
  pub(crate) func: F,
}

impl<S, F, E> ObservableType for MapErrOp<S, F>
where
  S: ObservableType,
  F: FnOnce(S::Err) -> E,
{
  type Item = S::Item;
  type Err = E;
}

impl<S, F, E> Observable for MapErrOp<S, F>
where
  S: Observable,
  F: FnOnce(S::Err) -> E + 'static,
{
  type Unsub = S::Unsub;

  fn actual_subscribe<O>(self, observer: O) -> Self::Unsub
  where
    O: Observer<S::Item, E> + 'static,
  {
    self
      .source
      .actual_subscribe(MapErrObserver { observer, func: self.func })
  }
}

pub struct MapErrObserver<O, F> {
  observer: O,
  func: F,
}

impl<O, F, Item, Err, E> Observer<Item, Err> for MapErrObserver<O, F>
where
  O: Observer<Item, E>,
  F: FnOnce(Err) -> E,
{
  fn next(&mut self, value: Item) { self.observer.next(value) }

  fn error(self, err: Err) { self.observer.error((self.func)(err)) }

  fn complete(self) { self.observer.complete() }

  fn is_closed(&self) -> bool { self.observer.is_closed() }
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, rc::Rc};

  use crate::prelude::*;

  #[test]
  fn transforms_the_failure() {
    let done = Rc::new(RefCell::new(None));
    let c_done = done.clone();
    observable::fail::<(), _>("offline")
      .map_err(|e| RxError::Transport(e.to_string()))
      .sink(|_| {}, move |c| *c_done.borrow_mut() = Some(c));
    assert_eq!(*done.borrow(), Some(Completion::Failure(RxError::Transport("offline".into()))));
  }

  #[test]
  fn aligns_failure_types_for_zip() {
    let out = Rc::new(RefCell::new(vec![]));
    let c_out = out.clone();
    let names = observable::from_iter(["ada", "bob"]).map_err(|e| -> RxError { match e {} });
    let lookups = Subject::<u32, RxError>::new();
    names.zip(lookups.clone()).sink(
      move |pair| c_out.borrow_mut().push(pair),
      |_: Completion<RxError>| {},
    );

    lookups.next(7);
    lookups.next(9);
    assert_eq!(*out.borrow(), vec![("ada", 7), ("bob", 9)]);
  }
}
