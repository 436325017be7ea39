// Logging shim: forwards to `tracing` when the `tracing` feature is enabled and
// compiles to nothing otherwise. Arguments are still type-checked so call
// sites build the same way under both configurations. Only format-string
// arguments are supported.

#[cfg(feature = "tracing")]
macro_rules! rx_trace {
  ($($arg:tt)*) => {{
    tracing::trace!($($arg)*);
  }};
}

#[cfg(feature = "tracing")]
macro_rules! rx_debug {
  ($($arg:tt)*) => {{
    tracing::debug!($($arg)*);
  }};
}

#[cfg(feature = "tracing")]
macro_rules! rx_warn {
  ($($arg:tt)*) => {{
    tracing::warn!($($arg)*);
  }};
}

#[cfg(not(feature = "tracing"))]
macro_rules! rx_trace {
  ($($arg:tt)*) => {{
    if false {
      let _ = ::std::format_args!($($arg)*);
    }
  }};
}

#[cfg(not(feature = "tracing"))]
macro_rules! rx_debug {
  ($($arg:tt)*) => {{
    if false {
      let _ = ::std::format_args!($($arg)*);
    }
  }};
}

#[cfg(not(feature = "tracing"))]
macro_rules! rx_warn {
  ($($arg:tt)*) => {{
    if false {
      let _ = ::std::format_args!($($arg)*);
    }
  }};
}

pub(crate) use rx_debug;
pub(crate) use rx_trace;
pub(crate) use rx_warn;
