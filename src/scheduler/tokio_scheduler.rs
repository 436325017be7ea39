use super::{Duration, Scheduler, Task, TaskHandle};
use crate::logging::rx_trace;

/// Runs tasks on the current tokio `LocalSet`.
///
/// Tasks are `!Send`, so they are spawned with `tokio::task::spawn_local`;
/// scheduling outside of a `LocalSet` panics, as `spawn_local` does.
#[derive(Clone, Copy, Default)]
pub struct TokioScheduler;

impl Scheduler for TokioScheduler {
  fn schedule(&self, delay: Duration, task: Task) -> TaskHandle {
    let handle = TaskHandle::new();
    let c_handle = handle.clone();
    tokio::task::spawn_local(async move {
      if !delay.is_zero() {
        tokio::time::sleep(delay).await;
      }
      rx_trace!("tokio scheduler runs task after {:?}", delay);
      c_handle.fire(task);
    });
    handle
  }
}
