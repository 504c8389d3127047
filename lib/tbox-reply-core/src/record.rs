//! Normalized records and the sink receiving them.

use std::sync::Arc;

use derive_more::Display;
use serde::Serialize;

use crate::{Address, Error, ErrorKind, StatusCode, TransportFailure};

// ============================================================================
// Handler Kind
// ============================================================================

/// Request kind a handler answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HandlerKind {
    /// Status query.
    #[display("status")]
    Status,
    /// Report query.
    #[display("report")]
    Report,
    /// Task submission.
    #[display("task")]
    Task,
    /// File listing.
    #[display("file")]
    File,
}

impl HandlerKind {
    /// Lowercase name, as displayed.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Status => "status",
            Self::Report => "report",
            Self::Task => "task",
            Self::File => "file",
        }
    }
}

// ============================================================================
// Record
// ============================================================================

/// One normalized emission of a response handler.
///
/// Within one handler invocation, records are emitted in input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "record", rename_all = "snake_case")]
pub enum Record {
    /// The transport failed; nothing else is emitted for this invocation.
    Failure {
        /// Handler that received the failure.
        handler: HandlerKind,
        /// Transport status code.
        code: i32,
        /// Transport message.
        message: String,
    },
    /// Status of one object.
    Status {
        /// Zero-based position in the response.
        position: usize,
        /// Status code.
        code: StatusCode,
        /// Canonical object address.
        address: Address,
    },
    /// Start of a report, followed by its children.
    Report {
        /// Zero-based position in the response.
        position: usize,
        /// Number of children the report carries.
        children: usize,
    },
    /// Text of one child of a report.
    ReportChild {
        /// Position of the parent report.
        report: usize,
        /// Zero-based position among the report's children.
        position: usize,
        /// Decoded text.
        text: String,
        /// Whether invalid UTF-8 was replaced.
        lossy: bool,
    },
    /// One task or file of a listing.
    Item {
        /// Listing kind.
        handler: HandlerKind,
        /// Zero-based position in the response.
        position: usize,
    },
    /// An item, or the whole response, failed to decode.
    ItemError {
        /// Handler that hit the error.
        handler: HandlerKind,
        /// Position of the item, `None` when the response itself is unreadable.
        position: Option<usize>,
        /// Position of the report child, for report handlers.
        child: Option<usize>,
        /// Error classification.
        kind: ErrorKind,
        /// Error message.
        message: String,
    },
}

impl Record {
    /// Failure record for a transport failure.
    #[must_use]
    pub fn failure(handler: HandlerKind, failure: TransportFailure) -> Self {
        Self::Failure {
            handler,
            code: failure.code,
            message: failure.message,
        }
    }

    /// Error record for an item, or for the response when `position` is `None`.
    #[must_use]
    pub fn item_error(
        handler: HandlerKind,
        position: Option<usize>,
        child: Option<usize>,
        error: &Error,
    ) -> Self {
        Self::ItemError {
            handler,
            position,
            child,
            kind: error.kind(),
            message: error.to_string(),
        }
    }

    /// Short name of the record variant.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Failure { .. } => "failure",
            Self::Status { .. } => "status",
            Self::Report { .. } => "report",
            Self::ReportChild { .. } => "report_child",
            Self::Item { .. } => "item",
            Self::ItemError { .. } => "item_error",
        }
    }

    /// Returns `true` for failure and error records.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Failure { .. } | Self::ItemError { .. })
    }
}

// ============================================================================
// Sink
// ============================================================================

/// Consumer of normalized records.
///
/// Handlers for independent calls may complete concurrently and share one
/// sink, so implementations must accept interleaved emissions.
///
/// # Example
///
/// ```
/// use std::sync::Mutex;
/// use tbox_reply_core::{Record, Sink};
///
/// struct Counter(Mutex<usize>);
///
/// impl Sink for Counter {
///     fn emit(&self, _record: Record) {
///         *self.0.lock().unwrap_or_else(std::sync::PoisonError::into_inner) += 1;
///     }
/// }
/// ```
pub trait Sink: Send + Sync {
    /// Receive one record.
    fn emit(&self, record: Record);
}

impl<S: Sink + ?Sized> Sink for &S {
    fn emit(&self, record: Record) {
        (**self).emit(record);
    }
}

impl<S: Sink + ?Sized> Sink for Arc<S> {
    fn emit(&self, record: Record) {
        (**self).emit(record);
    }
}

impl<S: Sink + ?Sized> Sink for Box<S> {
    fn emit(&self, record: Record) {
        (**self).emit(record);
    }
}

/// Sink from a closure.
///
/// # Example
///
/// ```
/// use tbox_reply_core::{Record, sink_fn};
///
/// let _sink = sink_fn(|record: Record| assert!(!record.is_error()));
/// ```
pub fn sink_fn<F>(f: F) -> SinkFn<F>
where
    F: Fn(Record) + Send + Sync,
{
    SinkFn(f)
}

/// Sink wrapping a closure, see [`sink_fn`].
#[derive(Clone, Copy)]
pub struct SinkFn<F>(F);

impl<F> std::fmt::Debug for SinkFn<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SinkFn").finish_non_exhaustive()
    }
}

impl<F> Sink for SinkFn<F>
where
    F: Fn(Record) + Send + Sync,
{
    fn emit(&self, record: Record) {
        (self.0)(record);
    }
}
