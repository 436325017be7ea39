use std::fmt::Debug;

use crate::{
  logging::rx_debug,
  observable::{Observable, ObservableType},
  observer::Observer,
  subscription::Subscription,
};

/// Stage created by [`Observable::trace`]: logs every event at `debug`
/// level, prefixed with `label`.
#[derive(Clone)]
pub struct TraceOp<S> {
  pub(crate) source: S,
  pub(crate) label: String,
}

impl<S: ObservableType> ObservableType for TraceOp<S> {
  type Item = S::Item;
  type Err = S::Err;
}

impl<S> Observable for TraceOp<S>
where
  S: Observable,
  S::Item: Debug,
  S::Err: Debug,
{
  type Unsub = TraceSubscription<S::Unsub>;

  fn actual_subscribe<O>(self, observer: O) -> Self::Unsub
  where
    O: Observer<S::Item, S::Err> + 'static,
  {
    rx_debug!("{}: subscribe", self.label);
    let subscription = self
      .source
      .actual_subscribe(TraceObserver { observer, label: self.label.clone() });
    TraceSubscription { subscription, label: self.label }
  }
}

pub struct TraceObserver<O> {
  observer: O,
  label: String,
}

impl<O, Item, Err> Observer<Item, Err> for TraceObserver<O>
where
  O: Observer<Item, Err>,
  Item: Debug,
  Err: Debug,
{
  fn next(&mut self, value: Item) {
    rx_debug!("{}: value {:?}", self.label, value);
    self.observer.next(value);
  }

  fn error(self, err: Err) {
    rx_debug!("{}: failure {:?}", self.label, err);
    self.observer.error(err);
  }

  fn complete(self) {
    rx_debug!("{}: finished", self.label);
    self.observer.complete();
  }

  fn is_closed(&self) -> bool { self.observer.is_closed() }
}

pub struct TraceSubscription<U> {
  subscription: U,
  label: String,
}

impl<U: Subscription> Subscription for TraceSubscription<U> {
  fn unsubscribe(self) {
    if !self.subscription.is_closed() {
      rx_debug!("{}: cancel", self.label);
    }
    self.subscription.unsubscribe();
  }

  fn is_closed(&self) -> bool { self.subscription.is_closed() }
}
