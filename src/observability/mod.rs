//! Tracing setup.
//!
//! Every layer of the crate emits `tracing` spans and events. This module
//! installs the subscriber that consumes them:
//!
//! ```text
//! tracing → EnvFilter → fmt (stderr)
//!                     → tracing-opentelemetry → FileSpanExporter → JSON lines
//! ```
//!
//! The OpenTelemetry branch is only installed when `trace_file` is configured.
//! The level comes from `RUST_LOG` if set, else `trace_level`, else `info`.

mod exporter;
mod init;

pub use exporter::FileSpanExporter;
pub use init::init_tracing;
