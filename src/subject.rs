//! Subjects: publishers that are also imperative entry points.
//!
//! [`Subject`] relays whatever is sent to it. [`CurrentValueSubject`]
//! additionally caches the last value and replays it to new subscribers.

mod current_value_subject;
mod subject_core;
mod subscribers;

pub use current_value_subject::CurrentValueSubject;
pub use subject_core::{Subject, SubjectSubscription};
