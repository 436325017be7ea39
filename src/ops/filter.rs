use crate::{
  observable::{Observable, ObservableType},
  observer::Observer,
};

/// Stage created by [`Observable::filter`].
#[derive(Clone)]
pub struct FilterOp<S, F> {
  pub(crate) source: S,
  pub(crate) pred: F,
}

impl<S: ObservableType, F> ObservableType for FilterOp<S, F> {
  type Item = S::Item;
  type Err = S::Err;
}

impl<S, F> Observable for FilterOp<S, F>
where
  S: Observable,
  F: FnMut(&S::Item) -> bool + 'static,
{
  type Unsub = S::Unsub;

  fn actual_subscribe<O>(self, observer: O) -> Self::Unsub
  where
    O: Observer<S::Item, S::Err> + 'static,
  {
    self
      .source
      .actual_subscribe(FilterObserver { observer, pred: self.pred })
  }
}

pub struct FilterObserver<O, F> {
  observer: O,
  pred: F,
}

impl<O, F, Item, Err> Observer<Item, Err> for FilterObserver<O, F>
where
  O: Observer<Item, Err>,
  F: FnMut(&Item) -> bool,
{
  fn next(&mut self, value: Item) {
    if (self.pred)(&value) {
      self.observer.next(value)
    }
  }

  fn error(self, err: Err) { self.observer.error(err) }

  fn complete(self) { self.observer.complete() }

  fn is_closed(&self) -> bool { self.observer.is_closed() }
}

/// Stage created by [`Observable::try_filter`].
#[derive(Clone)]
pub struct TryFilterOp<S, F> {
  pub(crate) source: S,
  pub(crate) pred: F,
}

impl<S: ObservableType, F> ObservableType for TryFilterOp<S, F> {
  type Item = S::Item;
  type Err = S::Err;
}

impl<S, F> Observable for TryFilterOp<S, F>
where
  S: Observable,
  F: FnMut(&S::Item) -> Result<bool, S::Err> + 'static,
{
  type Unsub = S::Unsub;

  fn actual_subscribe<O>(self, observer: O) -> Self::Unsub
  where
    O: Observer<S::Item, S::Err> + 'static,
  {
    self
      .source
      .actual_subscribe(TryFilterObserver { inner: Some((observer, self.pred)) })
  }
}

pub struct TryFilterObserver<O, F> {
  inner: Option<(O, F)>,
}

impl<O, F, Item, Err> Observer<Item, Err> for TryFilterObserver<O, F>
where
  O: Observer<Item, Err>,
  F: FnMut(&Item) -> Result<bool, Err>,
{
  fn next(&mut self, value: Item) {
    let Some((observer, pred)) = self.inner.as_mut() else {
      return;
    };
    match pred(&value) {
      Ok(true) => observer.next(value),
      Ok(false) => {}
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
