//! Transport collaborator: whatever actually fetches data (an HTTP client, a
//! database, a fixture in tests).
//!
//! rxlite does not ship a transport. Implementations receive the request and
//! a [`Promise`] and resolve it whenever the data arrives, synchronously or
//! from a scheduled task; [`request`] turns that into a [`FuturePublisher`]
//! that pipelines can consume. Transports are passed in explicitly.

use std::rc::Rc;

use crate::{
  error::RxError,
  logging::rx_debug,
  observable::{FuturePublisher, Promise},
};

pub trait Transport {
  type Request;
  type Response;

  /// Start fetching `request` and resolve `promise` exactly once with the
  /// response or the failure.
  fn fetch(&self, request: Self::Request, promise: Promise<Self::Response, RxError>);
}

impl<T: Transport + ?Sized> Transport for &T {
  type Request = T::Request;
  type Response = T::Response;

  fn fetch(&self, request: Self::Request, promise: Promise<Self::Response, RxError>) {
    (**self).fetch(request, promise)
  }
}

impl<T: Transport + ?Sized> Transport for Rc<T> {
  type Request = T::Request;
  type Response = T::Response;

  fn fetch(&self, request: Self::Request, promise: Promise<Self::Response, RxError>) {
    (**self).fetch(request, promise)
  }
}

/// Issue `request` on `transport` and expose the eventual response as a
/// one-shot publisher.
///
/// ```rust
/// use rxlite::{prelude::*, transport};
///
/// struct Companies;
///
/// impl Transport for Companies {
///   type Request = ();
///   type Response = Vec<&'static str>;
///
///   fn fetch(&self, _: (), promise: Promise<Self::Response, RxError>) {
///     promise.succeed(vec!["Apple", "Facebook", "Google", "Spotify"]);
///   }
/// }
///
/// transport::request(&Companies, ())
///   .replace_error(vec![])
///   .subscribe(|companies| assert_eq!(companies.len(), 4));
/// ```
pub fn request<T>(transport: &T, request: T::Request) -> FuturePublisher<T::Response, RxError>
where
  T: Transport + ?Sized,
  T::Response: Clone,
{
  rx_debug!("transport request issued");
  FuturePublisher::new(|promise| transport.fetch(request, promise))
}
