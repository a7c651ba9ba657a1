//! Observability: structured compile events and sink abstractions.
//!
//! The compiler never logs on its own. Every event flows through the
//! `CompileSink` handed to it; there is no process-wide logger.

pub(crate) mod sink;
#[cfg(feature = "tracing")]
pub(crate) mod trace;

// re-exports
pub use sink::{
    CompileEvent, CompileReport, CompileReportSnapshot, CompileSink, NoopSink, QueryKind,
    SkipReason,
};
#[cfg(feature = "tracing")]
pub use trace::TracingSink;
