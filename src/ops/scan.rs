use crate::{
  observable::{Observable, ObservableType},
  observer::Observer,
};

/// Stage created by [`Observable::scan`].
///
/// Feeds the accumulator and each value into `combine` and emits the new
/// accumulator. The seed itself is never emitted. Completes when the source
/// completes and forwards the source's failure.
#[derive(Clone)]
pub struct ScanOp<S, F, Acc> {
  pub(crate) source: S,
  pub(crate) combine: F,
  pub(crate) seed: Acc,
}

impl<S: ObservableType, F, Acc> ObservableType for ScanOp<S, F, Acc> {
  type Item = Acc;
  type Err = S::Err;
}

impl<S, F, Acc> Observable for ScanOp<S, F, Acc>
where
  S: Observable,
  F: FnMut(Acc, S::Item) -> Acc + 'static,
  Acc: Clone + 'static,
{
  type Unsub = S::Unsub;

  fn actual_subscribe<O>(self, observer: O) -> Self::Unsub
  where
    O: Observer<Acc, S::Err> + 'static,
  {
    self.source.actual_subscribe(ScanObserver {
      observer,
      combine: self.combine,
      acc: Some(self.seed),
    })
  }
}

pub struct ScanObserver<O, F, Acc> {
  observer: O,
  combine: F,
  // only `None` while `combine` runs
  acc: Option<Acc>,
}

impl<O, F, Item, Err, Acc> Observer<Item, Err> for ScanObserver<O, F, Acc>
where
  O: Observer<Acc, Err>,
  F: FnMut(Acc, Item) -> Acc,
  Acc: Clone,
{
  fn next(&mut self, value: Item) {
    let Some(acc) = self.acc.take() else {
      return;
    };
    let acc = (self.combine)(acc, value);
    self.acc = Some(acc.clone());
    self.observer.next(acc);
  }

  fn error(self, err: Err) { self.observer.error(err) }

  fn complete(self) { self.observer.complete() }

  fn is_closed(&self) -> bool { self.observer.is_closed() }
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, convert::Infallible, rc::Rc};

  use crate::prelude::*;

  #[test]
  fn counts_every_send() {
    let subject = Subject::<&'static str, Infallible>::new();
    let out = Rc::new(RefCell::new(vec![]));
    let c_out = out.clone();
    subject
      .clone()
      .scan(0, |acc, _| acc + 1)
      .subscribe(move |v| c_out.borrow_mut().push(v));

    for _ in 0..5 {
      subject.next("tap");
    }
    assert_eq!(*out.borrow(), vec![1, 2, 3, 4, 5]);
  }

  #[test]
  fn accumulator_type_differs_from_item() {
    let out = Rc::new(RefCell::new(vec![]));
    let c_out = out.clone();
    observable::from_iter(["a", "b", "c"])
      .scan(String::new(), |mut acc, v| {
        acc.push_str(v);
        acc
      })
      .subscribe(move |v| c_out.borrow_mut().push(v));
    assert_eq!(*out.borrow(), vec!["a", "ab", "abc"]);
  }

  #[test]
  fn each_subscription_starts_from_the_seed() {
    let source = observable::from_iter([1, 2, 3]).scan(10, |acc, v| acc + v);
    let first = Rc::new(RefCell::new(vec![]));
    let second = Rc::new(RefCell::new(vec![]));

    let c_first = first.clone();
    source.clone().subscribe(move |v| c_first.borrow_mut().push(v));
    let c_second = second.clone();
    source.subscribe(move |v| c_second.borrow_mut().push(v));

    assert_eq!(*first.borrow(), vec![11, 13, 16]);
    assert_eq!(*first.borrow(), *second.borrow());
  }

  #[test]
  fn forwards_failure() {
    let done = Rc::new(RefCell::new(None));
    let c_done = done.clone();
    observable::fail::<i32, _>("boom")
      .scan(0, |acc, v| acc + v)
      .sink(|_| {}, move |c| *c_done.borrow_mut() = Some(c));
    assert_eq!(*done.borrow(), Some(Completion::Failure("boom")));
  }
}
