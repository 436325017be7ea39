use std::{
  cell::{Cell, RefCell},
  convert::Infallible,
  rc::Rc,
};

use crate::{
  logging::rx_trace,
  observable::{Observable, ObservableType},
  observer::Observer,
  scheduler::{Duration, Scheduler, TaskHandle},
  subscription::Subscription,
};

/// Creates a publisher that emits 0, 1, 2, ... every `period`.
///
/// Each tick is a one-shot task on `scheduler`; the next one is scheduled
/// after the current value was delivered. Never completes. Cancelling the
/// subscription cancels the pending tick.
///
/// ```rust
/// use std::time::Duration;
///
/// use rxlite::prelude::*;
///
/// TestScheduler::init();
/// let subscription = observable::interval(Duration::from_secs(1), TestScheduler)
///   .subscribe(|tick| println!("tick {tick}"));
/// TestScheduler::advance_by(Duration::from_secs(3));
/// subscription.unsubscribe();
/// ```
pub fn interval<S>(period: Duration, scheduler: S) -> Interval<S>
where
  S: Scheduler + Clone + 'static,
{
  Interval { period, scheduler }
}

/// Creates a publisher that emits `()` once after `delay`, then completes.
pub fn timer<S>(delay: Duration, scheduler: S) -> Timer<S>
where
  S: Scheduler,
{
  Timer { delay, scheduler }
}

#[derive(Clone)]
pub struct Interval<S> {
  period: Duration,
  scheduler: S,
}

#[derive(Clone)]
pub struct Timer<S> {
  delay: Duration,
  scheduler: S,
}

#[derive(Default)]
struct IntervalState {
  cancelled: Cell<bool>,
  pending: RefCell<TaskHandle>,
}

/// Subscription of an [`Interval`]: cancels whichever tick is pending.
#[derive(Clone)]
pub struct IntervalSubscription(Rc<IntervalState>);

impl Subscription for IntervalSubscription {
  fn unsubscribe(self) {
    if self.0.cancelled.replace(true) {
      return;
    }
    let pending = self.0.pending.borrow().clone();
    pending.unsubscribe();
    rx_trace!("interval cancelled");
  }

  fn is_closed(&self) -> bool { self.0.cancelled.get() }
}

fn schedule_tick<O, S>(
  mut observer: O, tick: usize, period: Duration, scheduler: S, state: Rc<IntervalState>,
) where
  O: Observer<usize, Infallible> + 'static,
  S: Scheduler + Clone + 'static,
{
  let c_state = state.clone();
  let c_scheduler = scheduler.clone();
  let handle = scheduler.schedule(
    period,
    Box::new(move || {
      if c_state.cancelled.get() {
        return;
      }
      observer.next(tick);
      if !observer.is_closed() && !c_state.cancelled.get() {
        schedule_tick(observer, tick + 1, period, c_scheduler, c_state);
      }
    }),
  );
  *state.pending.borrow_mut() = handle;
}

impl<S> ObservableType for Interval<S> {
  type Item = usize;
  type Err = Infallible;
}

impl<S> Observable for Interval<S>
where
  S: Scheduler + Clone + 'static,
{
  type Unsub = IntervalSubscription;

  fn actual_subscribe<O>(self, observer: O) -> Self::Unsub
  where
    O: Observer<usize, Infallible> + 'static,
  {
    let state = Rc::new(IntervalState::default());
    schedule_tick(observer, 0, self.period, self.scheduler, state.clone());
    IntervalSubscription(state)
  }
}

impl<S> ObservableType for Timer<S> {
  type Item = ();
  type Err = Infallible;
}

impl<S: Scheduler> Observable for Timer<S> {
  type Unsub = TaskHandle;

  fn actual_subscribe<O>(self, mut observer: O) -> Self::Unsub
  where
    O: Observer<(), Infallible> + 'static,
  {
    self.scheduler.schedule(
      self.delay,
      Box::new(move || {
        observer.next(());
        observer.complete();
      }),
    )
  }
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, rc::Rc};

  use super::IntervalSubscription;
  use crate::prelude::*;

  #[test]
  fn ticks_every_period() {
    TestScheduler::init();
    let ticks = Rc::new(RefCell::new(vec![]));
    let c_ticks = ticks.clone();
    observable::interval(Duration::from_millis(100), TestScheduler)
      .subscribe(move |v| c_ticks.borrow_mut().push((v, TestScheduler::now())));

    TestScheduler::advance_by(Duration::from_millis(250));
    assert_eq!(
      *ticks.borrow(),
      vec![(0, Duration::from_millis(100)), (1, Duration::from_millis(200))]
    );
    assert_eq!(TestScheduler::pending_count(), 1);
  }

  #[test]
  fn cancel_stops_ticking() {
    TestScheduler::init();
    let ticks = Rc::new(RefCell::new(vec![]));
    let c_ticks = ticks.clone();
    let subscription = observable::interval(Duration::from_millis(10), TestScheduler)
      .subscribe(move |v| c_ticks.borrow_mut().push(v));

    TestScheduler::advance_by(Duration::from_millis(30));
    subscription.clone().unsubscribe();
    assert!(subscription.is_closed());
    assert!(TestScheduler::is_empty());

    TestScheduler::advance_by(Duration::from_millis(100));
    assert_eq!(*ticks.borrow(), vec![0, 1, 2]);
  }

  #[test]
  fn cancel_from_inside_a_tick() {
    TestScheduler::init();
    let handle: Rc<RefCell<Option<IntervalSubscription>>> = Rc::default();
    let ticks = Rc::new(RefCell::new(vec![]));

    let (c_handle, c_ticks) = (handle.clone(), ticks.clone());
    let subscription =
      observable::interval(Duration::from_millis(10), TestScheduler).subscribe(move |v| {
        c_ticks.borrow_mut().push(v);
        if v == 1 {
          if let Some(s) = c_handle.borrow_mut().take() {
            s.unsubscribe();
          }
        }
      });
    *handle.borrow_mut() = Some(subscription);

    TestScheduler::advance_by(Duration::from_millis(100));
    assert_eq!(*ticks.borrow(), vec![0, 1]);
    assert!(TestScheduler::is_empty());
  }

  #[test]
  fn timer_emits_once_then_completes() {
    TestScheduler::init();
    let log = Rc::new(RefCell::new(vec![]));
    let (c1, c2) = (log.clone(), log.clone());
    observable::timer(Duration::from_millis(50), TestScheduler).sink(
      move |_| c1.borrow_mut().push(format!("tick at {:?}", TestScheduler::now())),
      move |c| c2.borrow_mut().push(format!("{c:?}")),
    );

    TestScheduler::advance_by(Duration::from_millis(49));
    assert!(log.borrow().is_empty());
    TestScheduler::flush();
    assert_eq!(*log.borrow(), vec!["tick at 50ms", "Finished"]);
  }

  #[test]
  fn cancelled_timer_never_fires() {
    TestScheduler::init();
    let fired = Rc::new(RefCell::new(false));
    let c_fired = fired.clone();
    observable::timer(Duration::from_millis(50), TestScheduler)
      .subscribe(move |_| *c_fired.borrow_mut() = true)
      .unsubscribe();

    TestScheduler::flush();
    assert!(!*fired.borrow());
  }
}
