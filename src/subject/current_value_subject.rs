use super::subject_core::{Subject, SubjectSubscription};
use crate::{
  error::Completion,
  observable::{Observable, ObservableType},
  observer::Observer,
  rc::{MutRc, RcDeref, RcDerefMut},
};

/// A subject that remembers the last value sent through it.
///
/// Constructed with an initial value. Every new subscriber immediately
/// receives the current value, then everything sent afterwards. The cache is
/// updated before subscribers are notified, so `value()` read from a callback
/// already returns the value being delivered. Once terminated, new
/// subscribers receive only the terminal signal.
///
/// ```rust
/// use std::convert::Infallible;
///
/// use rxlite::prelude::*;
///
/// let subject = CurrentValueSubject::<i32, Infallible>::new(1);
/// subject.next(2);
/// subject.clone().subscribe(|v| assert_eq!(v, 2));
/// assert_eq!(subject.value(), 2);
/// ```
pub struct CurrentValueSubject<Item, Err> {
  subject: Subject<Item, Err>,
  value: MutRc<Item>,
}

impl<Item, Err> Clone for CurrentValueSubject<Item, Err> {
  fn clone(&self) -> Self { Self { subject: self.subject.clone(), value: self.value.clone() } }
}

impl<Item, Err> CurrentValueSubject<Item, Err> {
  pub fn new(initial: Item) -> Self { Self { subject: Subject::new(), value: MutRc::own(initial) } }

  pub fn subscriber_count(&self) -> usize { self.subject.subscriber_count() }

  pub fn is_terminated(&self) -> bool { self.subject.is_terminated() }
}

impl<Item: Clone, Err: Clone> CurrentValueSubject<Item, Err> {
  /// The cached value.
  pub fn value(&self) -> Item { self.value.rc_deref().clone() }

  /// Replace the cached value and deliver it to every subscriber. Ignored
  /// after termination.
  pub fn next(&self, value: Item) {
    if self.subject.is_terminated() {
      return;
    }
    self.subject.assert_not_emitting();
    *self.value.rc_deref_mut() = value.clone();
    self.subject.next(value);
  }

  pub fn complete(self) { self.subject.send_completion(Completion::Finished) }

  pub fn error(self, err: Err) { self.subject.send_completion(Completion::Failure(err)) }

  pub fn send_completion(&self, completion: Completion<Err>) {
    self.subject.send_completion(completion)
  }
}

impl<Item, Err> ObservableType for CurrentValueSubject<Item, Err> {
  type Item = Item;
  type Err = Err;
}

impl<Item, Err> Observable for CurrentValueSubject<Item, Err>
where
  Item: Clone + 'static,
  Err: Clone + 'static,
{
  type Unsub = SubjectSubscription<Item, Err>;

  fn actual_subscribe<O>(self, mut observer: O) -> Self::Unsub
  where
    O: Observer<Item, Err> + 'static,
  {
    if !self.subject.is_terminated() {
      observer.next(self.value());
      if observer.is_closed() {
        return SubjectSubscription::closed();
      }
    }
    self.subject.actual_subscribe(observer)
  }
}

impl<Item: Clone, Err: Clone> Observer<Item, Err> for CurrentValueSubject<Item, Err> {
  fn next(&mut self, value: Item) { CurrentValueSubject::next(self, value) }

  fn error(self, err: Err) { self.send_completion(Completion::Failure(err)) }

  fn complete(self) { self.send_completion(Completion::Finished) }

  fn is_closed(&self) -> bool { self.is_terminated() }
}
