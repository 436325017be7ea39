use super::{BoxedSubscription, DynamicSubscriptions, IntoBoxedSubscription, Subscription};

/// A collection of subscriptions cancelled together.
///
/// The usual home for the subscriptions of a long-lived component: each
/// `subscribe` result is stored with [`Subscription::store_in`] and the whole
/// set is torn down with one [`unsubscribe_all`](Self::unsubscribe_all).
/// Dropping the bag does not cancel anything.
///
/// ```rust
/// use std::convert::Infallible;
///
/// use rxlite::prelude::*;
///
/// let subject = Subject::<i32, Infallible>::new();
/// let mut bag = SubscriptionBag::default();
/// subject.clone().subscribe(|v| println!("{v}")).store_in(&mut bag);
/// subject.clone().subscribe(|v| println!("again {v}")).store_in(&mut bag);
/// assert_eq!(subject.subscriber_count(), 2);
///
/// bag.unsubscribe_all();
/// assert_eq!(subject.subscriber_count(), 0);
/// ```
#[derive(Default)]
pub struct SubscriptionBag {
  subs: DynamicSubscriptions<BoxedSubscription>,
}

impl SubscriptionBag {
  pub fn new() -> Self { Self::default() }

  /// Store `subscription`. Entries that already closed are pruned first.
  pub fn add(&mut self, subscription: impl IntoBoxedSubscription) {
    self.subs.retain(|s| !s.is_closed());
    self.subs.add(subscription.into_boxed());
  }

  #[inline]
  pub fn len(&self) -> usize { self.subs.len() }

  #[inline]
  pub fn is_empty(&self) -> bool { self.subs.is_empty() }

  /// Cancel every stored subscription and empty the bag.
  pub fn unsubscribe_all(&mut self) { self.subs.unsubscribe_all(); }
}

impl Subscription for SubscriptionBag {
  fn unsubscribe(mut self) { self.unsubscribe_all(); }

  fn is_closed(&self) -> bool { self.subs.all_closed() }
}
