use std::rc::{Rc, Weak};

use super::subscribers::{Slot, Subscribers};
use crate::{
  error::Completion,
  logging::{rx_debug, rx_trace},
  observable::{Observable, ObservableType},
  observer::Observer,
  rc::{MutRc, RcDeref, RcDerefMut, WeakRc},
  subscription::Subscription,
};

const REENTRANT_EMISSION: &str = "re-entrant Subject emissions are not supported \
                                  (next/error/complete called from one of the subject's own \
                                  callbacks)";

pub(crate) struct SubjectCore<Item, Err> {
  subscribers: Subscribers<Item, Err>,
  terminal: Option<Completion<Err>>,
  emitting: bool,
}

impl<Item, Err> Default for SubjectCore<Item, Err> {
  fn default() -> Self {
    Self { subscribers: Subscribers::default(), terminal: None, emitting: false }
  }
}

/// Subject: a publisher that is also the imperative entry point of a stream.
///
/// Clones share one subscriber list, so a clone handed to a callback feeds
/// the same subscribers as the original.
///
/// # Delivery
///
/// - `next` delivers synchronously, in attachment order, and returns after the
///   last subscriber ran.
/// - `complete`/`error` terminate the subject. Current subscribers receive the
///   terminal signal, later subscribers receive it on subscribe, and further
///   sends are ignored.
///
/// # Re-Entrancy Policy
///
/// - **Emissions are not re-entrant**. Calling `next`/`error`/`complete` on
///   the same subject from within one of its callbacks **panics**.
/// - **Subscription changes are allowed** inside callbacks:
///   - a subscriber added during an emission does not receive the value in
///     flight, only later ones;
///   - a subscriber cancelled during an emission (by itself or by an earlier
///     subscriber) receives nothing further, including the value in flight.
///
/// ```rust
/// use std::{cell::RefCell, convert::Infallible, rc::Rc};
///
/// use rxlite::prelude::*;
///
/// let subject = Subject::<i32, Infallible>::new();
/// let results = Rc::new(RefCell::new(vec![]));
/// let c_results = results.clone();
///
/// subject.clone().subscribe(move |v| c_results.borrow_mut().push(v));
///
/// subject.next(1);
/// subject.next(2);
/// assert_eq!(*results.borrow(), vec![1, 2]);
/// ```
pub struct Subject<Item, Err> {
  core: MutRc<SubjectCore<Item, Err>>,
}

impl<Item, Err> Clone for Subject<Item, Err> {
  fn clone(&self) -> Self { Self { core: self.core.clone() } }
}

impl<Item, Err> Default for Subject<Item, Err> {
  fn default() -> Self { Self { core: MutRc::own(SubjectCore::default()) } }
}

impl<Item, Err> Subject<Item, Err> {
  pub fn new() -> Self { Self::default() }

  /// Get the number of current subscribers.
  pub fn subscriber_count(&self) -> usize { self.core.rc_deref().subscribers.open_count() }

  /// Whether `complete` or `error` has been called.
  pub fn is_terminated(&self) -> bool { self.core.rc_deref().terminal.is_some() }

  /// Panics when called from inside one of this subject's deliveries.
  pub(crate) fn assert_not_emitting(&self) {
    if self.core.rc_deref().emitting {
      panic!("{}", REENTRANT_EMISSION);
    }
  }
}

impl<Item: Clone, Err: Clone> Subject<Item, Err> {
  /// Deliver `value` to every attached subscriber.
  pub fn next(&self, value: Item) {
    let targets = {
      let mut core = self.core.rc_deref_mut();
      if core.terminal.is_some() {
        rx_trace!("value sent to a terminated subject is ignored");
        return;
      }
      if core.emitting {
        drop(core);
        panic!("{}", REENTRANT_EMISSION);
      }
      core.emitting = true;
      core.subscribers.snapshot()
    };

    let _emitting = EmittingGuard(&self.core);
    Subscribers::broadcast(&targets, value);
  }

  /// Terminate successfully.
  pub fn complete(self) { self.send_completion(Completion::Finished) }

  /// Terminate with `err`.
  pub fn error(self, err: Err) { self.send_completion(Completion::Failure(err)) }

  /// Terminate with `completion`. Only the first terminal signal counts.
  pub fn send_completion(&self, completion: Completion<Err>) {
    let targets = {
      let mut core = self.core.rc_deref_mut();
      if core.terminal.is_some() {
        return;
      }
      if core.emitting {
        drop(core);
        panic!("{}", REENTRANT_EMISSION);
      }
      core.terminal = Some(completion.clone());
      core.subscribers.drain()
    };

    rx_debug!(
      "subject terminated (failure: {}), notifying {} subscriber(s)",
      completion.is_failure(),
      targets.len()
    );
    for slot in targets {
      if let Some(observer) = slot.take() {
        deliver_terminal(observer, completion.clone());
      }
    }
  }
}

/// Clears the emitting flag and drops slots whose observer closed itself,
/// also when a subscriber panics.
struct EmittingGuard<'a, Item, Err>(&'a MutRc<SubjectCore<Item, Err>>);

impl<Item, Err> Drop for EmittingGuard<'_, Item, Err> {
  fn drop(&mut self) {
    if let Some(mut core) = self.0.try_rc_deref_mut() {
      core.emitting = false;
      core.subscribers.purge_closed();
    }
  }
}

pub(crate) fn deliver_terminal<O, Item, Err>(observer: O, completion: Completion<Err>)
where
  O: Observer<Item, Err>,
{
  match completion {
    Completion::Finished => observer.complete(),
    Completion::Failure(err) => observer.error(err),
  }
}

// ============================================================================
// Publisher / Observer implementations
// ============================================================================

impl<Item, Err> ObservableType for Subject<Item, Err> {
  type Item = Item;
  type Err = Err;
}

impl<Item, Err> Observable for Subject<Item, Err>
where
  Item: Clone + 'static,
  Err: Clone + 'static,
{
  type Unsub = SubjectSubscription<Item, Err>;

  fn actual_subscribe<O>(self, observer: O) -> Self::Unsub
  where
    O: Observer<Item, Err> + 'static,
  {
    let terminal = self.core.rc_deref().terminal.clone();
    if let Some(completion) = terminal {
      deliver_terminal(observer, completion);
      return SubjectSubscription::closed();
    }

    let slot = Rc::new(Slot::new(Box::new(observer)));
    let id = self.core.rc_deref_mut().subscribers.add(slot.clone());
    rx_trace!("subject subscriber {} attached", id);
    SubjectSubscription { core: self.core.downgrade(), slot: Rc::downgrade(&slot), id }
  }
}

/// A subject can be subscribed to another publisher to relay its events.
impl<Item: Clone, Err: Clone> Observer<Item, Err> for Subject<Item, Err> {
  fn next(&mut self, value: Item) { Subject::next(self, value) }

  fn error(self, err: Err) { self.send_completion(Completion::Failure(err)) }

  fn complete(self) { self.send_completion(Completion::Finished) }

  fn is_closed(&self) -> bool { self.is_terminated() }
}

// ============================================================================
// SubjectSubscription
// ============================================================================

/// Subscription handle for a Subject.
///
/// Holds only weak back-references: it never keeps the subject or the
/// observer alive. Clones refer to the same attachment, and cancelling any of
/// them detaches it once; later cancels are no-ops.
pub struct SubjectSubscription<Item, Err> {
  core: WeakRc<SubjectCore<Item, Err>>,
  slot: Weak<Slot<Item, Err>>,
  id: usize,
}

impl<Item, Err> SubjectSubscription<Item, Err> {
  /// A subscription that is already closed, for subscribers that were
  /// served entirely while subscribing.
  pub(crate) fn closed() -> Self { Self { core: WeakRc::new(), slot: Weak::new(), id: 0 } }
}

impl<Item, Err> Clone for SubjectSubscription<Item, Err> {
  fn clone(&self) -> Self { Self { core: self.core.clone(), slot: self.slot.clone(), id: self.id } }
}

impl<Item, Err> Subscription for SubjectSubscription<Item, Err> {
  fn unsubscribe(self) {
    let Some(slot) = self.slot.upgrade() else { return };
    if slot.is_closed() {
      return;
    }
    slot.close();
    if let Some(core) = self.core.upgrade() {
      if let Some(mut core) = core.try_rc_deref_mut() {
        core.subscribers.remove(self.id);
      }
    }
    rx_trace!("subject subscriber {} cancelled", self.id);
  }

  fn is_closed(&self) -> bool { self.slot.upgrade().map_or(true, |slot| slot.is_closed()) }
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, convert::Infallible, rc::Rc};

  use crate::prelude::*;

  fn collector<T: 'static>() -> (Rc<RefCell<Vec<T>>>, impl FnMut(T) + 'static) {
    let store = Rc::new(RefCell::new(vec![]));
    let c_store = store.clone();
    (store, move |v| c_store.borrow_mut().push(v))
  }

  #[test]
  fn delivers_only_values_sent_after_attaching() {
    let subject = Subject::<i32, Infallible>::new();
    subject.next(1);

    let (early, push_early) = collector();
    subject.clone().subscribe(push_early);
    subject.next(2);

    let (late, push_late) = collector();
    subject.clone().subscribe(push_late);
    subject.next(3);

    assert_eq!(*early.borrow(), vec![2, 3]);
    assert_eq!(*late.borrow(), vec![3]);
  }

  #[test]
  fn attachment_order() {
    let subject = Subject::<i32, Infallible>::new();
    let log = Rc::new(RefCell::new(vec![]));
    for name in ["a", "b", "c"] {
      let c_log = log.clone();
      subject.clone().subscribe(move |v| c_log.borrow_mut().push((name, v)));
    }

    subject.next(1);
    assert_eq!(*log.borrow(), vec![("a", 1), ("b", 1), ("c", 1)]);
  }

  #[test]
  fn cancel_stops_delivery_and_is_idempotent() {
    let subject = Subject::<i32, Infallible>::new();
    let (seen, push) = collector();
    let subscription = subject.clone().subscribe(push);

    subject.next(1);
    subscription.clone().unsubscribe();
    assert!(subscription.is_closed());
    subject.next(2);
    subscription.unsubscribe();
    subject.next(3);

    assert_eq!(*seen.borrow(), vec![1]);
    assert_eq!(subject.subscriber_count(), 0);
  }

  #[test]
  fn dropping_the_handle_keeps_the_subscriber() {
    let subject = Subject::<i32, Infallible>::new();
    let (seen, push) = collector();
    drop(subject.clone().subscribe(push));

    subject.next(1);
    assert_eq!(*seen.borrow(), vec![1]);
    assert_eq!(subject.subscriber_count(), 1);
  }

  #[test]
  fn cancel_from_own_callback() {
    let subject = Subject::<i32, Infallible>::new();
    let handle: Rc<RefCell<Option<SubjectSubscription<i32, Infallible>>>> = Rc::default();
    let seen = Rc::new(RefCell::new(vec![]));

    let (c_handle, c_seen) = (handle.clone(), seen.clone());
    let subscription = subject.clone().subscribe(move |v| {
      c_seen.borrow_mut().push(v);
      if let Some(s) = c_handle.borrow_mut().take() {
        s.unsubscribe();
      }
    });
    *handle.borrow_mut() = Some(subscription);

    subject.next(1);
    subject.next(2);
    assert_eq!(*seen.borrow(), vec![1]);
    assert_eq!(subject.subscriber_count(), 0);
  }

  #[test]
  fn cancel_of_a_later_subscriber_suppresses_the_value_in_flight() {
    let subject = Subject::<i32, Infallible>::new();
    let victim: Rc<RefCell<Option<SubjectSubscription<i32, Infallible>>>> = Rc::default();
    let log = Rc::new(RefCell::new(vec![]));

    let (c_victim, c_log) = (victim.clone(), log.clone());
    subject.clone().subscribe(move |v| {
      c_log.borrow_mut().push(("first", v));
      if let Some(s) = c_victim.borrow_mut().take() {
        s.unsubscribe();
      }
    });
    let c_log = log.clone();
    let second = subject.clone().subscribe(move |v| c_log.borrow_mut().push(("second", v)));
    *victim.borrow_mut() = Some(second);
    let c_log = log.clone();
    subject.clone().subscribe(move |v| c_log.borrow_mut().push(("third", v)));

    subject.next(1);
    subject.next(2);
    assert_eq!(
      *log.borrow(),
      vec![("first", 1), ("third", 1), ("first", 2), ("third", 2)]
    );
  }

  #[test]
  fn subscribe_during_delivery_misses_the_value_in_flight() {
    let subject = Subject::<i32, Infallible>::new();
    let (late, push_late) = collector();
    let mut push_late = Some(push_late);

    let c_subject = subject.clone();
    subject.clone().subscribe(move |_| {
      if let Some(push) = push_late.take() {
        c_subject.clone().subscribe(push);
      }
    });

    subject.next(1);
    subject.next(2);
    assert_eq!(*late.borrow(), vec![2]);
  }

  #[test]
  fn completion_reaches_current_and_future_subscribers() {
    let subject = Subject::<i32, &'static str>::new();
    let log = Rc::new(RefCell::new(vec![]));

    let (c1, c2) = (log.clone(), log.clone());
    subject.clone().sink(
      move |v| c1.borrow_mut().push(format!("early {v}")),
      move |c| c2.borrow_mut().push(format!("early {c:?}")),
    );
    subject.next(1);
    subject.clone().error("boom");
    subject.next(2);
    assert!(subject.is_terminated());

    let (c1, c2) = (log.clone(), log.clone());
    let late = subject.clone().sink(
      move |v| c1.borrow_mut().push(format!("late {v}")),
      move |c| c2.borrow_mut().push(format!("late {c:?}")),
    );

    assert!(late.is_closed());
    assert_eq!(
      *log.borrow(),
      vec!["early 1", "early Failure(\"boom\")", "late Failure(\"boom\")"]
    );
  }

  #[test]
  fn only_the_first_terminal_signal_counts() {
    let subject = Subject::<i32, &'static str>::new();
    let (done, push) = collector();
    subject.clone().sink(|_| {}, push);

    subject.send_completion(Completion::Finished);
    subject.send_completion(Completion::Failure("late"));
    assert_eq!(*done.borrow(), vec![Completion::Finished]);
  }

  #[test]
  fn relays_another_publisher() {
    let subject = Subject::<i32, Infallible>::new();
    let (seen, push) = collector();
    subject.clone().subscribe(push);

    observable::from_iter(1..=3).subscribe_with(subject.clone());
    assert_eq!(*seen.borrow(), vec![1, 2, 3]);
    assert!(subject.is_terminated());
  }

  #[test]
  #[should_panic(expected = "re-entrant Subject emissions")]
  fn reentrant_next_panics() {
    let subject = Subject::<i32, Infallible>::new();
    let c_subject = subject.clone();
    subject.clone().subscribe(move |v| c_subject.next(v + 1));
    subject.next(1);
  }

  #[test]
  fn emitting_flag_is_reset_after_a_panicking_subscriber() {
    let subject = Subject::<i32, Infallible>::new();
    subject.clone().subscribe(|v| {
      if v == 1 {
        panic!("subscriber failure");
      }
    });
    let c_subject = subject.clone();
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| c_subject.next(1)));
    assert!(result.is_err());

    let (seen, push) = collector();
    subject.clone().subscribe(push);
    subject.next(2);
    assert_eq!(*seen.borrow(), vec![2]);
  }
}
