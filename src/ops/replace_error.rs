use std::{convert::Infallible, marker::PhantomData};

use crate::{
  observable::{Observable, ObservableType},
  observer::Observer,
};

/// Stage created by [`Observable::replace_error`]: a failure upstream becomes
/// one `fallback` value followed by completion, so the stage itself never
/// fails.
#[derive(Clone)]
pub struct ReplaceErrorOp<S: ObservableType> {
  pub(crate) source: S,
  pub(crate) fallback: S::Item,
}

impl<S: ObservableType> ObservableType for ReplaceErrorOp<S> {
  type Item = S::Item;
  type Err = Infallible;
}

impl<S> Observable for ReplaceErrorOp<S>
where
  S: Observable,
  S::Item: 'static,
  S::Err: 'static,
{
  type Unsub = S::Unsub;

  fn actual_subscribe<O>(self, observer: O) -> Self::Unsub
  where
    O: Observer<S::Item, Infallible> + 'static,
  {
    self.source.actual_subscribe(ReplaceErrorObserver {
      observer,
      fallback: self.fallback,
      _err: PhantomData,
    })
  }
}

pub struct ReplaceErrorObserver<O, Item, Err> {
  observer: O,
  fallback: Item,
  _err: PhantomData<fn(Err)>,
}

impl<O, Item, Err> Observer<Item, Err> for ReplaceErrorObserver<O, Item, Err>
where
  O: Observer<Item, Infallible>,
{
  fn next(&mut self, value: Item) { self.observer.next(value) }

  fn error(mut self, _err: Err) {
    self.observer.next(self.fallback);
    self.observer.complete();
  }

  fn complete(self) { self.observer.complete() }

  fn is_closed(&self) -> bool { self.observer.is_closed() }
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, rc::Rc};

  use crate::prelude::*;

  #[test]
  fn failure_becomes_fallback_then_completion() {
    let subject = Subject::<&'static str, RxError>::new();
    let log = Rc::new(RefCell::new(vec![]));
    let (c1, c2) = (log.clone(), log.clone());
    subject.clone().replace_error("fallback").sink(
      move |v| c1.borrow_mut().push(v.to_string()),
      move |c| c2.borrow_mut().push(format!("{c:?}")),
    );

    subject.next("v1");
    subject.next("v2");
    subject.error(RxError::Transport("reset".into()));
    assert_eq!(*log.borrow(), vec!["v1", "v2", "fallback", "Finished"]);
  }

  #[test]
  fn completion_does_not_emit_fallback() {
    let out = Rc::new(RefCell::new(vec![]));
    let c_out = out.clone();
    observable::from_iter([1, 2])
      .map_err(|e| -> RxError { match e {} })
      .replace_error(-1)
      .subscribe(move |v| c_out.borrow_mut().push(v));
    assert_eq!(*out.borrow(), vec![1, 2]);
  }

  #[test]
  fn output_can_be_subscribed_without_failure_handler() {
    let out = Rc::new(RefCell::new(vec![]));
    let c_out = out.clone();
    observable::fail::<Vec<&str>, _>(RxError::NotFound("/companies".into()))
      .replace_error(vec![])
      .subscribe(move |v| c_out.borrow_mut().push(v.len()));
    assert_eq!(*out.borrow(), vec![0]);
  }
}
