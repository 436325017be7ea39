//! Lifecycle taps.
//!
//! [`EventHooks`] collects optional callbacks for the four lifecycle points
//! of a subscription. `handle_events` runs each one right before the event
//! travels on, and never changes what the downstream sees.

use crate::{
  error::Completion,
  observable::{Observable, ObservableType},
  observer::Observer,
  rc::{MutRc, RcDerefMut},
  subscription::Subscription,
};

type CancelHook = MutRc<Option<Box<dyn FnOnce()>>>;

/// Optional callbacks for [`Observable::handle_events`].
///
/// ```rust
/// use std::{cell::RefCell, convert::Infallible, rc::Rc};
///
/// use rxlite::prelude::*;
///
/// let log = Rc::new(RefCell::new(vec![]));
/// let (c1, c2) = (log.clone(), log.clone());
/// let subject = Subject::<i32, Infallible>::new();
/// let subscription = subject
///   .clone()
///   .handle_events(
///     EventHooks::new()
///       .on_value(move |v| c1.borrow_mut().push(format!("value {v}")))
///       .on_cancel(move || c2.borrow_mut().push("cancel".to_string())),
///   )
///   .subscribe(|_| {});
///
/// subject.next(1);
/// subscription.unsubscribe();
/// assert_eq!(*log.borrow(), vec!["value 1", "cancel"]);
/// ```
pub struct EventHooks<Item, Err> {
  on_subscribe: Option<Box<dyn FnOnce()>>,
  on_value: Option<Box<dyn FnMut(&Item)>>,
  on_completion: Option<Box<dyn FnOnce(&Completion<Err>)>>,
  on_cancel: Option<Box<dyn FnOnce()>>,
}

impl<Item, Err> Default for EventHooks<Item, Err> {
  fn default() -> Self {
    Self { on_subscribe: None, on_value: None, on_completion: None, on_cancel: None }
  }
}

impl<Item, Err> EventHooks<Item, Err> {
  pub fn new() -> Self { Self::default() }

  /// Runs when the subscription is set up, before the source starts.
  pub fn on_subscribe(mut self, f: impl FnOnce() + 'static) -> Self {
    self.on_subscribe = Some(Box::new(f));
    self
  }

  /// Runs for every value, before the downstream receives it.
  pub fn on_value(mut self, f: impl FnMut(&Item) + 'static) -> Self {
    self.on_value = Some(Box::new(f));
    self
  }

  /// Runs for the terminal signal, before the downstream receives it.
  pub fn on_completion(mut self, f: impl FnOnce(&Completion<Err>) + 'static) -> Self {
    self.on_completion = Some(Box::new(f));
    self
  }

  /// Runs when the downstream cancels before the stream terminated. Never
  /// runs more than once.
  pub fn on_cancel(mut self, f: impl FnOnce() + 'static) -> Self {
    self.on_cancel = Some(Box::new(f));
    self
  }
}

/// Stage created by [`Observable::handle_events`].
pub struct HandleEventsOp<S: ObservableType> {
  pub(crate) source: S,
  pub(crate) hooks: EventHooks<S::Item, S::Err>,
}

impl<S: ObservableType> ObservableType for HandleEventsOp<S> {
  type Item = S::Item;
  type Err = S::Err;
}

impl<S> Observable for HandleEventsOp<S>
where
  S: Observable,
  S::Item: 'static,
  S::Err: 'static,
{
  type Unsub = HandleEventsSubscription<S::Unsub>;

  fn actual_subscribe<O>(self, observer: O) -> Self::Unsub
  where
    O: Observer<S::Item, S::Err> + 'static,
  {
    let EventHooks { on_subscribe, on_value, on_completion, on_cancel } = self.hooks;
    if let Some(on_subscribe) = on_subscribe {
      on_subscribe();
    }
    let on_cancel: CancelHook = MutRc::own(on_cancel);
    let subscription = self.source.actual_subscribe(HandleEventsObserver {
      observer,
      on_value,
      on_completion,
      on_cancel: on_cancel.clone(),
    });
    HandleEventsSubscription { subscription, on_cancel }
  }
}

pub struct HandleEventsObserver<O, Item, Err> {
  observer: O,
  on_value: Option<Box<dyn FnMut(&Item)>>,
  on_completion: Option<Box<dyn FnOnce(&Completion<Err>)>>,
  on_cancel: CancelHook,
}

impl<O, Item, Err> HandleEventsObserver<O, Item, Err> {
  // Once terminated, cancelling is no longer observable.
  fn terminate(self, completion: &Completion<Err>) -> O {
    self.on_cancel.rc_deref_mut().take();
    if let Some(on_completion) = self.on_completion {
      on_completion(completion);
    }
    self.observer
  }
}

impl<O, Item, Err> Observer<Item, Err> for HandleEventsObserver<O, Item, Err>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) {
    if let Some(on_value) = self.on_value.as_mut() {
      on_value(&value);
    }
    self.observer.next(value);
  }

  fn error(self, err: Err) {
    let completion = Completion::Failure(err);
    let observer = self.terminate(&completion);
    if let Completion::Failure(err) = completion {
      observer.error(err);
    }
  }

  fn complete(self) { self.terminate(&Completion::Finished).complete() }

  fn is_closed(&self) -> bool { self.observer.is_closed() }
}

/// Subscription of a [`HandleEventsOp`]: fires the cancel hook, if still
/// armed, before cancelling the source.
pub struct HandleEventsSubscription<U> {
  subscription: U,
  on_cancel: CancelHook,
}

impl<U: Subscription> Subscription for HandleEventsSubscription<U> {
  fn unsubscribe(self) {
    let on_cancel = self.on_cancel.rc_deref_mut().take();
    if let Some(on_cancel) = on_cancel {
      on_cancel();
    }
    self.subscription.unsubscribe();
  }

  fn is_closed(&self) -> bool { self.subscription.is_closed() }
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, convert::Infallible, rc::Rc};

  use crate::prelude::*;

  fn recorder() -> (Rc<RefCell<Vec<String>>>, impl Fn(&str) -> Box<dyn Fn()>) {
    let log = Rc::new(RefCell::new(vec![]));
    let c_log = log.clone();
    let make = move |tag: &str| -> Box<dyn Fn()> {
      let (log, tag) = (c_log.clone(), tag.to_string());
      Box::new(move || log.borrow_mut().push(tag.clone()))
    };
    (log, make)
  }

  #[test]
  fn hooks_run_before_downstream() {
    let log = Rc::new(RefCell::new(vec![]));
    let (c1, c2, c3, c4) = (log.clone(), log.clone(), log.clone(), log.clone());
    observable::from_iter([1, 2])
      .handle_events(
        EventHooks::new()
          .on_subscribe(move || c1.borrow_mut().push("subscribe".to_string()))
          .on_value(move |v| c2.borrow_mut().push(format!("tap {v}")))
          .on_completion(move |c| c3.borrow_mut().push(format!("tap {c:?}"))),
      )
      .sink(
        {
          let c4 = c4.clone();
          move |v| c4.borrow_mut().push(format!("got {v}"))
        },
        move |c| c4.borrow_mut().push(format!("got {c:?}")),
      );

    assert_eq!(
      *log.borrow(),
      vec!["subscribe", "tap 1", "got 1", "tap 2", "got 2", "tap Finished", "got Finished"]
    );
  }

  #[test]
  fn completion_hook_sees_failure() {
    let seen = Rc::new(RefCell::new(None));
    let c_seen = seen.clone();
    let done = Rc::new(RefCell::new(None));
    let c_done = done.clone();
    observable::fail::<i32, _>(RxError::NotFound("/users/7".into()))
      .handle_events(
        EventHooks::new().on_completion(move |c: &Completion<RxError>| {
          *c_seen.borrow_mut() = Some(c.clone())
        }),
      )
      .sink(|_| {}, move |c| *c_done.borrow_mut() = Some(c));

    let expected = Completion::Failure(RxError::NotFound("/users/7".into()));
    assert_eq!(*seen.borrow(), Some(expected.clone()));
    assert_eq!(*done.borrow(), Some(expected));
  }

  #[test]
  fn cancel_hook_fires_once() {
    let (log, make) = recorder();
    let on_cancel = make("cancel");
    let subject = Subject::<i32, Infallible>::new();
    let subscription = subject
      .clone()
      .handle_events(EventHooks::new().on_cancel(move || on_cancel()))
      .subscribe(|_| {});

    subject.next(1);
    subscription.unsubscribe();
    assert_eq!(*log.borrow(), vec!["cancel"]);
    assert_eq!(subject.subscriber_count(), 0);
  }

  #[test]
  fn cancel_after_termination_is_silent() {
    let (log, make) = recorder();
    let on_cancel = make("cancel");
    let on_done = make("done");
    let subject = Subject::<i32, Infallible>::new();
    let subscription = subject
      .clone()
      .handle_events(
        EventHooks::new()
          .on_cancel(move || on_cancel())
          .on_completion(move |_| on_done()),
      )
      .subscribe(|_| {});

    subject.clone().complete();
    subscription.unsubscribe();
    assert_eq!(*log.borrow(), vec!["done"]);
  }
}
