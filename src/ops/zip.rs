//! Zip operator implementation
//!
//! Zip combines items from two publishers pairwise, emitting a tuple once both
//! sides have produced their nth value.

use std::collections::VecDeque;

use crate::{
  observable::{Observable, ObservableType},
  observer::Observer,
  rc::{MutRc, RcDeref, RcDerefMut},
  subscription::{
    BoxedSubscription, IntoBoxedSubscription, ProxySubscription, Subscription, TupleSubscription,
  },
};

// ==================== Zip Operator ====================

/// Stage created by [`Observable::zip`].
///
/// Values of the faster side wait in an unbounded buffer until the other side
/// catches up. The zip completes once a side has completed and its buffer is
/// empty, because no further pair can form. A failure on either side fails
/// the zip right away. Both sources are cancelled in either case.
#[derive(Clone)]
pub struct ZipOp<L, R> {
  pub(crate) left: L,
  pub(crate) right: R,
}

/// Subscription of a [`ZipOp`]: one cancellable slot per side.
pub type ZipSubscription =
  TupleSubscription<ProxySubscription<BoxedSubscription>, ProxySubscription<BoxedSubscription>>;

impl<L, R> ObservableType for ZipOp<L, R>
where
  L: ObservableType,
  R: ObservableType<Err = L::Err>,
{
  type Item = (L::Item, R::Item);
  type Err = L::Err;
}

impl<L, R> Observable for ZipOp<L, R>
where
  L: Observable,
  R: Observable<Err = L::Err>,
  L::Item: 'static,
  R::Item: 'static,
  L::Err: 'static,
{
  type Unsub = ZipSubscription;

  fn actual_subscribe<O>(self, observer: O) -> Self::Unsub
  where
    O: Observer<(L::Item, R::Item), L::Err> + 'static,
  {
    let left_proxy = ProxySubscription::new();
    let right_proxy = ProxySubscription::new();
    let core: ZipCore<O, L::Item, R::Item, L::Err> = ZipCore {
      downstream: MutRc::own(Some(observer)),
      state: MutRc::own(ZipState::new()),
      upstream: TupleSubscription::new(left_proxy.clone(), right_proxy.clone()),
    };

    let left_unsub = self.left.actual_subscribe(ZipLeftObserver(core.clone()));
    left_proxy.set(left_unsub.into_boxed());

    // the left side may already have ended the zip, e.g. a synchronous
    // source that failed
    if !core.is_finished() {
      let right_unsub = self.right.actual_subscribe(ZipRightObserver(core.clone()));
      right_proxy.set(right_unsub.into_boxed());
    }

    core.upstream
  }
}

// ==================== Shared State ====================

struct ZipState<A, B, Err> {
  left: VecDeque<A>,
  right: VecDeque<B>,
  /// Pairs formed while the downstream callback was running.
  ready: VecDeque<(A, B)>,
  left_done: bool,
  right_done: bool,
  emitting: bool,
  /// Failure received while the downstream callback was running.
  failure: Option<Err>,
}

impl<A, B, Err> ZipState<A, B, Err> {
  fn new() -> Self {
    Self {
      left: VecDeque::new(),
      right: VecDeque::new(),
      ready: VecDeque::new(),
      left_done: false,
      right_done: false,
      emitting: false,
      failure: None,
    }
  }

  /// Whether one side can no longer contribute to a pair.
  fn exhausted(&self) -> bool {
    (self.left_done && self.left.is_empty()) || (self.right_done && self.right.is_empty())
  }
}

/// The downstream observer is moved out of its cell while a pair is
/// delivered, so sources may be fed, completed or failed from inside the
/// callback. Those signals are queued in [`ZipState`] and applied once the
/// callback returns.
struct ZipCore<O, A, B, Err> {
  downstream: MutRc<Option<O>>,
  state: MutRc<ZipState<A, B, Err>>,
  upstream: ZipSubscription,
}

impl<O, A, B, Err> Clone for ZipCore<O, A, B, Err> {
  fn clone(&self) -> Self {
    Self {
      downstream: self.downstream.clone(),
      state: self.state.clone(),
      upstream: self.upstream.clone(),
    }
  }
}

impl<O, A, B, Err> ZipCore<O, A, B, Err>
where
  O: Observer<(A, B), Err>,
{
  fn is_finished(&self) -> bool {
    self.downstream.rc_deref().is_none() && !self.state.rc_deref().emitting
  }

  fn emit(&self, pair: Option<(A, B)>) {
    {
      let mut state = self.state.rc_deref_mut();
      if let Some(pair) = pair {
        state.ready.push_back(pair);
      }
      if state.emitting {
        return;
      }
    }
    let observer = self.downstream.rc_deref_mut().take();
    let Some(mut observer) = observer else {
      return;
    };

    self.state.rc_deref_mut().emitting = true;
    loop {
      let pair = {
        let mut state = self.state.rc_deref_mut();
        if state.failure.is_some() {
          None
        } else {
          state.ready.pop_front()
        }
      };
      match pair {
        Some(pair) => observer.next(pair),
        None => break,
      }
    }
    let failure = {
      let mut state = self.state.rc_deref_mut();
      state.emitting = false;
      state.failure.take()
    };

    match failure {
      Some(err) => {
        self.upstream.clone().unsubscribe();
        observer.error(err);
      }
      None => {
        *self.downstream.rc_deref_mut() = Some(observer);
        self.finish_if_exhausted();
      }
    }
  }

  fn finish_if_exhausted(&self) {
    {
      let state = self.state.rc_deref();
      if state.emitting || !state.exhausted() {
        return;
      }
    }
    let observer = self.downstream.rc_deref_mut().take();
    if let Some(observer) = observer {
      self.upstream.clone().unsubscribe();
      observer.complete();
    }
  }

  fn fail(&self, err: Err) {
    {
      let mut state = self.state.rc_deref_mut();
      if state.emitting {
        state.failure.get_or_insert(err);
        return;
      }
    }
    let observer = self.downstream.rc_deref_mut().take();
    if let Some(observer) = observer {
      self.upstream.clone().unsubscribe();
      observer.error(err);
    }
  }

  fn is_closed(&self) -> bool {
    if self.state.rc_deref().emitting {
      return false;
    }
    self
      .downstream
      .rc_deref()
      .as_ref()
      .map_or(true, |observer| Observer::<(A, B), Err>::is_closed(observer))
  }
}

// ==================== Observers ====================

/// Observer of the left source.
pub struct ZipLeftObserver<O, A, B, Err>(ZipCore<O, A, B, Err>);

/// Observer of the right source.
pub struct ZipRightObserver<O, A, B, Err>(ZipCore<O, A, B, Err>);

impl<O, A, B, Err> Observer<A, Err> for ZipLeftObserver<O, A, B, Err>
where
  O: Observer<(A, B), Err>,
{
  fn next(&mut self, value: A) {
    let pair = {
      let mut state = self.0.state.rc_deref_mut();
      match state.right.pop_front() {
        Some(right) => Some((value, right)),
        None => {
          state.left.push_back(value);
          None
        }
      }
    };
    self.0.emit(pair);
  }

  fn error(self, err: Err) { self.0.fail(err) }

  fn complete(self) {
    self.0.state.rc_deref_mut().left_done = true;
    self.0.finish_if_exhausted();
  }

  fn is_closed(&self) -> bool { self.0.is_closed() }
}

impl<O, A, B, Err> Observer<B, Err> for ZipRightObserver<O, A, B, Err>
where
  O: Observer<(A, B), Err>,
{
  fn next(&mut self, value: B) {
    let pair = {
      let mut state = self.0.state.rc_deref_mut();
      match state.left.pop_front() {
        Some(left) => Some((left, value)),
        None => {
          state.right.push_back(value);
          None
        }
      }
    };
    self.0.emit(pair);
  }

  fn error(self, err: Err) { self.0.fail(err) }

  fn complete(self) {
    self.0.state.rc_deref_mut().right_done = true;
    self.0.finish_if_exhausted();
  }

  fn is_closed(&self) -> bool { self.0.is_closed() }
}

// ==================== Tests ====================
