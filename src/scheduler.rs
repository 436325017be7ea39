//! Scheduler collaborator: "run this closure after a delay" plus the handle
//! that cancels it.
//!
//! The core never reads a clock itself. Time-based publishers (`interval`,
//! `timer`) ask a [`Scheduler`] for one-shot invocations and cancel them
//! through the returned [`TaskHandle`]. Two implementations ship with the
//! crate:
//!
//! - [`TestScheduler`]: virtual time, advanced explicitly by the test.
//! - `TokioScheduler` (feature `tokio-scheduler`): tokio `spawn_local` plus
//!   `tokio::time::sleep`.

use std::{cell::Cell, rc::Rc};

pub use std::time::Duration;

use crate::subscription::Subscription;

mod test_scheduler;
pub use test_scheduler::TestScheduler;

#[cfg(feature = "tokio-scheduler")]
mod tokio_scheduler;
#[cfg(feature = "tokio-scheduler")]
pub use tokio_scheduler::TokioScheduler;

/// A deferred unit of work.
pub type Task = Box<dyn FnOnce()>;

/// Runs tasks after a delay.
///
/// Implementations must run the task at most once, never before `delay`
/// elapsed, and not at all once the handle was cancelled. The usual way to
/// honour the last rule is to run the task through [`TaskHandle::fire`].
pub trait Scheduler {
  fn schedule(&self, delay: Duration, task: Task) -> TaskHandle;
}

impl<S: Scheduler + ?Sized> Scheduler for Rc<S> {
  fn schedule(&self, delay: Duration, task: Task) -> TaskHandle { (**self).schedule(delay, task) }
}

#[derive(Default)]
struct TaskFlags {
  cancelled: Cell<bool>,
  finished: Cell<bool>,
}

/// Handle to a scheduled task. Unsubscribing cancels it if it has not run
/// yet; it is closed once the task ran or was cancelled.
#[derive(Clone, Default)]
pub struct TaskHandle(Rc<TaskFlags>);

impl TaskHandle {
  pub fn new() -> Self { Self::default() }

  pub fn is_cancelled(&self) -> bool { self.0.cancelled.get() }

  pub fn is_finished(&self) -> bool { self.0.finished.get() }

  /// Run `task` unless the handle was cancelled, and mark the handle finished
  /// either way.
  pub fn fire(&self, task: Task) {
    if !self.is_cancelled() {
      task();
    }
    self.0.finished.set(true);
  }
}

impl Subscription for TaskHandle {
  fn unsubscribe(self) { self.0.cancelled.set(true); }

  fn is_closed(&self) -> bool { self.is_cancelled() || self.is_finished() }
}
