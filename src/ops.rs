//! Operator stages.
//!
//! Each module holds one stage type (constructed through the provided methods
//! of [`Observable`](crate::observable::Observable)) and the observer it
//! wraps the downstream in.

pub mod filter;
pub mod handle_events;
pub mod map;
pub mod map_err;
pub mod replace_error;
pub mod scan;
pub mod trace;
pub mod zip;
