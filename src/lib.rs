//! # rxlite: a small reactive stream core
//!
//! Publishers, subjects, operators and cancellation tokens for a single
//! thread.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::{cell::RefCell, convert::Infallible, rc::Rc};
//!
//! use rxlite::prelude::*;
//!
//! let clicks = Subject::<(), Infallible>::new();
//! let label = Rc::new(RefCell::new(String::new()));
//!
//! let c_label = label.clone();
//! let subscription = clicks
//!   .clone()
//!   .scan(0, |count, _| count + 1)
//!   .map(|count| format!("You clicked {count} times"))
//!   .subscribe(move |text| *c_label.borrow_mut() = text);
//!
//! clicks.next(());
//! clicks.next(());
//! assert_eq!(*label.borrow(), "You clicked 2 times");
//!
//! subscription.unsubscribe();
//! clicks.next(());
//! assert_eq!(*label.borrow(), "You clicked 2 times");
//! ```
//!
//! ## Key Concepts
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Observable`] | The publisher trait; operators are its provided methods |
//! | [`Observer`] | Consumes `next`, `error`, and `complete` events |
//! | [`Subject`] / [`CurrentValueSubject`] | Imperative entry points into a stream |
//! | [`Subscription`] | Handle to cancel an active subscription |
//! | [`Scheduler`] / [`Transport`] | Collaborators for time and data fetching |
//!
//! ## Feature Flags
//!
//! - **`tracing`** (default): route internal logging to `tracing`
//! - **`tokio-scheduler`**: `TokioScheduler`, a [`Scheduler`] on tokio's
//!   `LocalSet`
//!
//! [`Observable`]: observable::Observable
//! [`Observer`]: observer::Observer
//! [`Subject`]: subject::Subject
//! [`CurrentValueSubject`]: subject::CurrentValueSubject
//! [`Subscription`]: subscription::Subscription
//! [`Scheduler`]: scheduler::Scheduler
//! [`Transport`]: transport::Transport

mod logging;

pub mod error;
pub mod observable;
pub mod observer;
pub mod ops;
pub mod prelude;
pub mod rc;
pub mod scheduler;
pub mod subject;
pub mod subscription;
pub mod transport;

pub use prelude::*;

#[cfg(doctest)]
mod __markdown_doctests {
  mod readme {
    #![doc = include_str!("../README.md")]
  }
}
