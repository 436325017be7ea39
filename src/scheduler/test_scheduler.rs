//! Test Scheduler for deterministic testing of time-based publishers.
//!
//! Provides virtual time that only advances when explicitly instructed.
//!
//! ```rust
//! use std::time::Duration;
//!
//! use rxlite::prelude::*;
//!
//! // Initialize the test scheduler (required before use)
//! TestScheduler::init();
//!
//! observable::timer(Duration::from_millis(100), TestScheduler).subscribe(|_| println!("fired"));
//!
//! // Advance virtual time to trigger the emission
//! TestScheduler::advance_by(Duration::from_millis(100));
//!
//! // Or execute all pending tasks
//! TestScheduler::flush();
//! ```
//!
//! # Thread Safety
//!
//! TestScheduler uses thread-local storage, so each thread has its own
//! independent virtual time and task queue. This keeps tests isolated when
//! the test harness runs them on different threads.

use std::{cell::RefCell, cmp::Ordering, collections::BinaryHeap};

use super::{Duration, Scheduler, Task, TaskHandle};
use crate::{logging::rx_trace, subscription::Subscription};

// ==================== Internal State ====================

struct TestSchedulerState {
  virtual_time: Duration,
  task_queue: BinaryHeap<ScheduledTask>,
  next_task_id: usize,
  initialized: bool,
}

impl Default for TestSchedulerState {
  fn default() -> Self {
    Self {
      virtual_time: Duration::ZERO,
      task_queue: BinaryHeap::new(),
      next_task_id: 0,
      initialized: false,
    }
  }
}

struct ScheduledTask {
  scheduled_time: Duration,
  task_id: usize,
  task: Task,
  handle: TaskHandle,
}

impl PartialEq for ScheduledTask {
  fn eq(&self, other: &Self) -> bool {
    self.scheduled_time == other.scheduled_time && self.task_id == other.task_id
  }
}

impl Eq for ScheduledTask {}

impl PartialOrd for ScheduledTask {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
}

impl Ord for ScheduledTask {
  fn cmp(&self, other: &Self) -> Ordering {
    // Min-heap: earlier times first, then FIFO by task_id
    other
      .scheduled_time
      .cmp(&self.scheduled_time)
      .then_with(|| other.task_id.cmp(&self.task_id))
  }
}

thread_local! {
  static TEST_SCHEDULER_STATE: RefCell<TestSchedulerState>
    = RefCell::new(TestSchedulerState::default());
}

// ==================== TestScheduler ====================

/// A virtual time scheduler for deterministic testing.
///
/// This is a zero-sized type that accesses thread-local state.
/// All instances in the same thread share the same virtual time and task queue.
#[derive(Clone, Copy, Default)]
pub struct TestScheduler;

impl TestScheduler {
  /// Initialize or reset the test scheduler state.
  ///
  /// Call at the start of each test. Resets virtual time to zero and drops
  /// every queued task.
  ///
  /// # Panics
  ///
  /// Other methods will panic if `init()` has not been called first.
  pub fn init() {
    TEST_SCHEDULER_STATE.with(|state| {
      let mut state = state.borrow_mut();
      state.virtual_time = Duration::ZERO;
      state.task_queue.clear();
      state.next_task_id = 0;
      state.initialized = true;
    });
  }

  fn ensure_initialized() {
    TEST_SCHEDULER_STATE.with(|state| {
      assert!(
        state.borrow().initialized,
        "TestScheduler::init() must be called before using the scheduler"
      );
    });
  }

  /// Get the current virtual time.
  ///
  /// # Panics
  ///
  /// Panics if `init()` has not been called first.
  pub fn now() -> Duration {
    Self::ensure_initialized();
    TEST_SCHEDULER_STATE.with(|state| state.borrow().virtual_time)
  }

  /// Number of queued tasks that were not cancelled.
  ///
  /// # Panics
  ///
  /// Panics if `init()` has not been called first.
  pub fn pending_count() -> usize {
    Self::ensure_initialized();
    TEST_SCHEDULER_STATE.with(|state| {
      state
        .borrow()
        .task_queue
        .iter()
        .filter(|task| !task.handle.is_closed())
        .count()
    })
  }

  /// Check if there are no pending tasks.
  ///
  /// # Panics
  ///
  /// Panics if `init()` has not been called first.
  pub fn is_empty() -> bool { Self::pending_count() == 0 }

  /// Drops queued tasks whose handle was cancelled, releasing whatever
  /// their closures captured. The closures are dropped after the state
  /// borrow ends.
  fn prune_cancelled() {
    let cancelled: Vec<ScheduledTask> = TEST_SCHEDULER_STATE.with(|state| {
      let mut state = state.borrow_mut();
      let (live, cancelled): (Vec<_>, Vec<_>) =
        state.task_queue.drain().partition(|task| !task.handle.is_closed());
      state.task_queue = BinaryHeap::from(live);
      cancelled
    });
    if !cancelled.is_empty() {
      rx_trace!("test scheduler released {} cancelled task(s)", cancelled.len());
    }
  }

  fn execute_tasks_until(target_time: Option<Duration>) {
    loop {
      let task = TEST_SCHEDULER_STATE.with(|state| {
        let mut state = state.borrow_mut();

        // Check if we should stop (no tasks or past target time)
        let due = state
          .task_queue
          .peek()
          .is_some_and(|peek| target_time.map_or(true, |limit| peek.scheduled_time <= limit));
        if !due {
          return None;
        }

        let scheduled_task = state.task_queue.pop()?;
        state.virtual_time = scheduled_task.scheduled_time;
        Some(scheduled_task)
      });

      let Some(ScheduledTask { task, handle, task_id, .. }) = task else {
        break;
      };
      rx_trace!("test scheduler runs task {}", task_id);
      handle.fire(task);
    }
  }

  /// Advance virtual time by the specified duration and execute due tasks.
  ///
  /// Tasks are executed in order of their scheduled time, with FIFO ordering
  /// for tasks scheduled at the same time. Tasks scheduled by a running task
  /// run in the same call if they fall due before the target time.
  ///
  /// # Panics
  ///
  /// Panics if `init()` has not been called first.
  pub fn advance_by(duration: Duration) {
    Self::ensure_initialized();
    Self::prune_cancelled();
    let target_time = TEST_SCHEDULER_STATE.with(|state| state.borrow().virtual_time + duration);

    Self::execute_tasks_until(Some(target_time));

    TEST_SCHEDULER_STATE.with(|state| {
      state.borrow_mut().virtual_time = target_time;
    });
  }

  /// Execute all pending tasks by advancing time to each task's scheduled time.
  ///
  /// A task that keeps rescheduling itself (an uncancelled `interval`) makes
  /// this loop forever.
  ///
  /// # Panics
  ///
  /// Panics if `init()` has not been called first.
  pub fn flush() {
    Self::ensure_initialized();
    Self::prune_cancelled();
    Self::execute_tasks_until(None);
  }
}

impl Scheduler for TestScheduler {
  fn schedule(&self, delay: Duration, task: Task) -> TaskHandle {
    TestScheduler::ensure_initialized();
    TestScheduler::prune_cancelled();
    TEST_SCHEDULER_STATE.with(|state| {
      let mut state = state.borrow_mut();

      let scheduled_time = state.virtual_time + delay;
      let handle = TaskHandle::new();
      let task_id = state.next_task_id;
      state.next_task_id += 1;

      state.task_queue.push(ScheduledTask { scheduled_time, task_id, task, handle: handle.clone() });
      handle
    })
  }
}
