//! Subscription: the cancellation token handed back by every `subscribe`.
//!
//! Cancelling is always explicit. Dropping a subscription leaves the
//! subscriber attached; opt into drop-based cancellation with
//! [`Subscription::unsubscribe_when_dropped`].

mod bag;
mod boxed;
mod dynamic;
mod tuple;

pub use bag::SubscriptionBag;
pub use boxed::{BoxedSubscription, BoxedSubscriptionInner, IntoBoxedSubscription};
pub use dynamic::DynamicSubscriptions;
pub use tuple::TupleSubscription;

use crate::rc::{MutRc, RcDeref, RcDerefMut};

// ==================== Subscription Trait ====================

/// Handle representing one subscriber's attachment to one publisher.
pub trait Subscription {
  /// Detach the subscriber. No further values or terminal signals reach it.
  ///
  /// Cancelling an already cancelled (or already terminated) subscription is
  /// a no-op.
  fn unsubscribe(self);

  /// Whether the subscription is cancelled or its stream already ended.
  fn is_closed(&self) -> bool;

  /// Activates RAII behavior: `unsubscribe()` runs when the returned guard
  /// goes out of scope.
  ///
  /// **Attention:** if the return value is not bound to a variable, the
  /// subscription is cancelled immediately.
  fn unsubscribe_when_dropped(self) -> SubscriptionGuard<Self>
  where
    Self: Sized,
  {
    SubscriptionGuard::new(self)
  }

  /// Keep the subscription in `bag`, to be cancelled together with the rest.
  fn store_in(self, bag: &mut SubscriptionBag)
  where
    Self: Sized + 'static,
  {
    bag.add(self);
  }
}

/// Subscription of a source that finished synchronously while subscribing.
impl Subscription for () {
  #[inline]
  fn unsubscribe(self) {}

  #[inline]
  fn is_closed(&self) -> bool { true }
}

impl<U: Subscription> Subscription for Option<U> {
  fn unsubscribe(self) {
    if let Some(inner) = self {
      inner.unsubscribe();
    }
  }

  fn is_closed(&self) -> bool { self.as_ref().map_or(true, Subscription::is_closed) }
}

// ==================== ClosureSubscription ====================

/// Runs a closure on unsubscribe.
pub struct ClosureSubscription<F>(pub F);

impl<F: FnOnce()> Subscription for ClosureSubscription<F> {
  fn unsubscribe(self) { (self.0)() }

  fn is_closed(&self) -> bool { false }
}

// ==================== ProxySubscription ====================

enum ProxyState<U> {
  Empty,
  Ready(U),
  Cancelled,
}

/// A slot for a subscription that only exists after `subscribe` returns.
///
/// Operators that subscribe to a source while holding a handle to cancel it
/// (zip cancels the other side when one side ends) need the handle before
/// the source has produced it. Cancelling an empty proxy is remembered and
/// applied as soon as the real subscription is [`set`](Self::set).
pub struct ProxySubscription<U>(MutRc<ProxyState<U>>);

impl<U> Clone for ProxySubscription<U> {
  fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<U> Default for ProxySubscription<U> {
  fn default() -> Self { Self(MutRc::own(ProxyState::Empty)) }
}

impl<U: Subscription> ProxySubscription<U> {
  pub fn new() -> Self { Self::default() }

  /// Fill the slot. If the proxy was cancelled in the meantime, `subscription`
  /// is cancelled right away.
  pub fn set(&self, subscription: U) {
    let cancelled = matches!(*self.0.rc_deref(), ProxyState::Cancelled);
    if cancelled {
      subscription.unsubscribe();
    } else {
      *self.0.rc_deref_mut() = ProxyState::Ready(subscription);
    }
  }
}

impl<U: Subscription> Subscription for ProxySubscription<U> {
  fn unsubscribe(self) {
    let prev = std::mem::replace(&mut *self.0.rc_deref_mut(), ProxyState::Cancelled);
    if let ProxyState::Ready(inner) = prev {
      inner.unsubscribe();
    }
  }

  fn is_closed(&self) -> bool {
    match &*self.0.rc_deref() {
      ProxyState::Empty => false,
      ProxyState::Ready(inner) => inner.is_closed(),
      ProxyState::Cancelled => true,
    }
  }
}

// ==================== SubscriptionGuard ====================

/// An RAII implementation of a "scoped subscribed" of a subscription.
/// When this structure is dropped (falls out of scope), the subscription will
/// be unsubscribed.
///
/// If you want to drop it immediately, wrap it in its own scope
#[must_use]
pub struct SubscriptionGuard<T: Subscription>(Option<T>);

impl<T: Subscription> SubscriptionGuard<T> {
  /// Wraps an existing subscription with a guard to enable RAII behavior for
  /// it.
  pub fn new(subscription: T) -> SubscriptionGuard<T> { SubscriptionGuard(Some(subscription)) }

  /// Disarm the guard and hand back the subscription.
  pub fn into_inner(mut self) -> T {
    match self.0.take() {
      Some(inner) => inner,
      None => unreachable!("guard is only emptied by into_inner or drop"),
    }
  }
}

impl<T: Subscription> Drop for SubscriptionGuard<T> {
  #[inline]
  fn drop(&mut self) {
    if let Some(inner) = self.0.take() {
      inner.unsubscribe();
    }
  }
}
