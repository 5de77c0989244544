//! Logging utilities.
//!
//! Two layers:
//! - [`init_logging`] installs `env_logger` behind the `log` facade, once per process.
//! - [`Log`] is the tagged diagnostics handle handed to each component. It filters
//!   informational lines by [`LogTag`] and writes through a [`LogSink`], so tests can
//!   capture output instead of reading a global.

mod init;
mod tagged;

pub use init::{init_logging, LoggingConfig, DEFAULT_FILTER};
pub use tagged::{CaptureSink, FacadeSink, Log, LogLevel, LogLine, LogSink, LogTag};
