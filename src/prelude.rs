//! Prelude module for convenient imports
//!
//! This module re-exports commonly used types and traits for easy access.

// Core traits and publishers
pub use crate::observable::{
  self, BoxedObservable, DynObservable, FuturePublisher, Observable, ObservableType, Promise,
};
// Observer trait and adapters
pub use crate::observer::{BoxedObserver, FnMutObserver, Observer, SinkObserver};
// Operators
pub use crate::ops::handle_events::EventHooks;
// Scheduler
#[cfg(feature = "tokio-scheduler")]
pub use crate::scheduler::TokioScheduler;
pub use crate::scheduler::{Duration, Scheduler, Task, TaskHandle, TestScheduler};
// Subject
pub use crate::subject::*;
// Subscription
pub use crate::subscription::*;
pub use crate::{
  error::{Completion, RxError},
  transport::Transport,
};
