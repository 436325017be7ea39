//! Error types and terminal signals.

/// Failures raised by the collaborators rxlite talks to (transports,
/// spawners). Stream failures themselves are the publisher's own `Err` type;
/// this enum is what collaborator-backed publishers use for it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RxError {
  /// The request could not even be issued, e.g. a malformed URL.
  #[error("invalid input: {0}")]
  InvalidInput(String),

  /// The collaborator answered but the resource does not exist.
  #[error("resource not found: {0}")]
  NotFound(String),

  /// The collaborator failed while producing its result.
  #[error("transport failure: {0}")]
  Transport(String),

  /// A future could not be handed to its executor.
  #[error("failed to spawn future: {0}")]
  Spawn(String),
}

/// Terminal signal of a stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion<E> {
  /// The stream ended normally.
  Finished,
  /// The stream ended with an error.
  Failure(E),
}

impl<E> Completion<E> {
  pub fn is_failure(&self) -> bool { matches!(self, Completion::Failure(_)) }

  pub fn map_err<F, E2>(self, f: F) -> Completion<E2>
  where
    F: FnOnce(E) -> E2,
  {
    match self {
      Completion::Finished => Completion::Finished,
      Completion::Failure(e) => Completion::Failure(f(e)),
    }
  }
}

impl<E> From<Result<(), E>> for Completion<E> {
  fn from(r: Result<(), E>) -> Self {
    match r {
      Ok(()) => Completion::Finished,
      Err(e) => Completion::Failure(e),
    }
  }
}
