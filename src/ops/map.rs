use crate::{
  observable::{Observable, ObservableType},
  observer::Observer,
};

/// Stage created by [`Observable::map`].
#[derive(Clone)]
pub struct MapOp<S, F> {
  pub(crate) source: S,
  pub(crate) func: F,
}

impl<S, F, B> ObservableType for MapOp<S, F>
where
  S: ObservableType,
  F: FnMut(S::Item) -> B,
{
  type Item = B;
  type Err = S::Err;
}

impl<S, F, B> Observable for MapOp<S, F>
where
  S: Observable,
  F: FnMut(S::Item) -> B + 'static,
{
  type Unsub = S::Unsub;

  fn actual_subscribe<O>(self, observer: O) -> Self::Unsub
  where
    O: Observer<B, S::Err> + 'static,
  {
    self.source.actual_subscribe(MapObserver { observer, map: self.func })
  }
}

pub struct MapObserver<O, F> {
  observer: O,
  map: F,
}

impl<O, F, Item, B, Err> Observer<Item, Err> for MapObserver<O, F>
where
  O: Observer<B, Err>,
  F: FnMut(Item) -> B,
{
  fn next(&mut self, value: Item) { self.observer.next((self.map)(value)) }

  fn error(self, err: Err) { self.observer.error(err) }

  fn complete(self) { self.observer.complete() }

  fn is_closed(&self) -> bool { self.observer.is_closed() }
}

/// Stage created by [`Observable::try_map`].
#[derive(Clone)]
pub struct TryMapOp<S, F> {
  pub(crate) source: S,
  pub(crate) func: F,
}

impl<S, F, B> ObservableType for TryMapOp<S, F>
where
  S: ObservableType,
  F: FnMut(S::Item) -> Result<B, S::Err>,
{
  type Item = B;
  type Err = S::Err;
}

impl<S, F, B> Observable for TryMapOp<S, F>
where
  S: Observable,
  F: FnMut(S::Item) -> Result<B, S::Err> + 'static,
{
  type Unsub = S::Unsub;

  fn actual_subscribe<O>(self, observer: O) -> Self::Unsub
  where
    O: Observer<B, S::Err> + 'static,
  {
    self
      .source
      .actual_subscribe(TryMapObserver { inner: Some((observer, self.func)) })
  }
}

/// Holds the downstream and the closure until the first failure, then drops
/// both.
pub struct TryMapObserver<O, F> {
  inner: Option<(O, F)>,
}

impl<O, F, Item, B, Err> Observer<Item, Err> for TryMapObserver<O, F>
where
  O: Observer<B, Err>,
  F: FnMut(Item) -> Result<B, Err>,
{
  fn next(&mut self, value: Item) {
    let Some((observer, map)) = self.inner.as_mut() else {
      return;
    };
    match map(value) {
      Ok(v) => observer.next(v),
      Err(err) => {
        if let Some((observer, _)) = self.inner.take() {
          observer.error(err);
        }
      }
    }
  }

  fn error(self, err: Err) {
    if let Some((observer, _)) = self.inner {
      observer.error(err);
    }
  }

  fn complete(self) {
    if let Some((observer, _)) = self.inner {
      observer.complete();
    }
  }

  fn is_closed(&self) -> bool {
    self
      .inner
      .as_ref()
      .map_or(true, |(observer, _)| observer.is_closed())
  }
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, rc::Rc};

  use crate::prelude::*;

  #[test]
  fn primitive_type() {
    let i = Rc::new(RefCell::new(0));
    let c_i = i.clone();
    observable::from_iter(100..101)
      .map(|v| v * 2)
      .subscribe(move |v| *c_i.borrow_mut() += v);
    assert_eq!(*i.borrow(), 200);
  }

  #[test]
  fn map_types_mixed() {
    let out = Rc::new(RefCell::new(vec![]));
    let c_out = out.clone();
    observable::from_iter(vec!['a', 'b', 'c'])
      .map(|c| c.to_string())
      .map(|s| s.len())
      .subscribe(move |v| c_out.borrow_mut().push(v));
    assert_eq!(*out.borrow(), vec![1, 1, 1]);
  }

  #[test]
  fn map_then_filter_keeps_only_matches() {
    let out = Rc::new(RefCell::new(vec![]));
    let c_out = out.clone();
    let subject = Subject::<i32, std::convert::Infallible>::new();
    subject
      .clone()
      .map(|v| v + 100)
      .filter(|v| v % 2 == 0)
      .subscribe(move |v| c_out.borrow_mut().push(v));

    subject.next(15);
    subject.next(10);
    assert_eq!(*out.borrow(), vec![110]);
  }

  #[test]
  fn try_map_failure_ends_stream_and_releases_closure() {
    let subject = Subject::<i32, RxError>::new();
    let token = Rc::new(());
    let c_token = token.clone();

    let log = Rc::new(RefCell::new(vec![]));
    let (c1, c2) = (log.clone(), log.clone());
    subject
      .clone()
      .try_map(move |v| {
        let _held = &c_token;
        if v < 0 { Err(RxError::InvalidInput(v.to_string())) } else { Ok(v * 10) }
      })
      .sink(
        move |v| c1.borrow_mut().push(format!("{v}")),
        move |c| c2.borrow_mut().push(format!("{c:?}")),
      );

    assert_eq!(Rc::strong_count(&token), 2);
    subject.next(1);
    subject.next(-1);
    assert_eq!(Rc::strong_count(&token), 1);
    subject.next(2);

    assert_eq!(
      *log.borrow(),
      vec!["10".to_string(), format!("{:?}", Completion::Failure(RxError::InvalidInput("-1".into())))]
    );
  }

  #[test]
  fn try_map_forwards_upstream_failure() {
    let done = Rc::new(RefCell::new(None));
    let c_done = done.clone();
    observable::fail::<i32, _>(RxError::NotFound("x".into()))
      .try_map(|v| Ok(v + 1))
      .sink(|_| {}, move |c| *c_done.borrow_mut() = Some(c));
    assert_eq!(*done.borrow(), Some(Completion::Failure(RxError::NotFound("x".into()))));
  }
}
