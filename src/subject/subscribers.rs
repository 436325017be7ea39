use std::{
  cell::{Cell, RefCell},
  rc::Rc,
};

use crate::{
  observer::{BoxedObserver, Observer},
  subscription::DynamicSubscriptions,
};

/// One attached observer.
///
/// The `closed` flag is the source of truth for "may this observer still
/// receive events". It is set by cancellation and by termination, and is
/// checked right before every delivery, so a subscriber cancelled part way
/// through an emission is skipped for the rest of it.
pub(crate) struct Slot<Item, Err> {
  observer: RefCell<Option<BoxedObserver<Item, Err>>>,
  closed: Cell<bool>,
}

impl<Item, Err> Slot<Item, Err> {
  pub(crate) fn new(observer: BoxedObserver<Item, Err>) -> Self {
    Self { observer: RefCell::new(Some(observer)), closed: Cell::new(false) }
  }

  #[inline]
  pub(crate) fn is_closed(&self) -> bool { self.closed.get() }

  /// Mark the slot closed and release the observer.
  ///
  /// When called from inside this observer's own callback the observer is
  /// still borrowed; it is released by [`deliver`](Self::deliver) once the
  /// callback returns.
  pub(crate) fn close(&self) {
    self.closed.set(true);
    if let Ok(mut observer) = self.observer.try_borrow_mut() {
      observer.take();
    }
  }

  /// Close the slot and hand back the observer for a terminal event.
  pub(crate) fn take(&self) -> Option<BoxedObserver<Item, Err>> {
    if self.closed.replace(true) {
      return None;
    }
    self.observer.try_borrow_mut().ok().and_then(|mut observer| observer.take())
  }

  pub(crate) fn deliver(&self, value: Item) {
    if self.closed.get() {
      return;
    }
    {
      let Ok(mut guard) = self.observer.try_borrow_mut() else { return };
      let Some(observer) = guard.as_mut() else { return };
      observer.next(value);
      if observer.is_closed() {
        self.closed.set(true);
      }
    }
    if self.closed.get() {
      self.observer.borrow_mut().take();
    }
  }
}

/// The subscriber list of a subject, in attachment order.
pub(crate) struct Subscribers<Item, Err> {
  inner: DynamicSubscriptions<Rc<Slot<Item, Err>>>,
}

impl<Item, Err> Default for Subscribers<Item, Err> {
  fn default() -> Self { Self { inner: DynamicSubscriptions::default() } }
}

impl<Item, Err> Subscribers<Item, Err> {
  /// Add a slot and return its unique ID.
  #[inline]
  pub(crate) fn add(&mut self, slot: Rc<Slot<Item, Err>>) -> usize { self.inner.add(slot) }

  /// Remove a slot by ID.
  #[inline]
  pub(crate) fn remove(&mut self, id: usize) -> Option<Rc<Slot<Item, Err>>> { self.inner.remove(id) }

  /// The slots attached right now. Delivery walks this copy so that
  /// subscribing or cancelling from a callback never disturbs the walk.
  pub(crate) fn snapshot(&self) -> Vec<Rc<Slot<Item, Err>>> { self.inner.iter().cloned().collect() }

  /// Drop slots whose observer closed itself.
  pub(crate) fn purge_closed(&mut self) { self.inner.retain(|slot| !slot.is_closed()) }

  /// Detach every slot, as termination does.
  pub(crate) fn drain(&mut self) -> Vec<Rc<Slot<Item, Err>>> { self.inner.drain().collect() }

  /// Number of slots still open.
  pub(crate) fn open_count(&self) -> usize { self.inner.iter().filter(|s| !s.is_closed()).count() }
}

impl<Item: Clone, Err> Subscribers<Item, Err> {
  /// Deliver `value` to `targets` in order. Every slot but the last receives a
  /// clone, the last one receives the value itself.
  pub(crate) fn broadcast(targets: &[Rc<Slot<Item, Err>>], value: Item) {
    let mut iter = targets.iter().filter(|slot| !slot.is_closed()).peekable();
    while let Some(slot) = iter.next() {
      if iter.peek().is_some() {
        slot.deliver(value.clone());
      } else {
        slot.deliver(value);
        break;
      }
    }
  }
}
