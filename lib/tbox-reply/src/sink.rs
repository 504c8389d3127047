//! Ready-made sinks.
//!
//! - [`TracingSink`] - Logs records with the `tracing` crate
//! - [`CollectingSink`] - Keeps records in memory, in emission order
//! - [`ChannelSink`] - Forwards records to a tokio channel
//! - [`JsonLinesSink`] - Writes one JSON object per record
//! - [`MetricsSink`] - Counts records, then forwards (feature `metrics`)

use std::io::Write;
use std::sync::{Arc, Mutex, PoisonError};

use tbox_reply_core::{Record, Sink};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

// ============================================================================
// Tracing
// ============================================================================

/// Log level for [`TracingSink`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    /// Log every record with all its fields.
    Debug,
    /// Log one line per record.
    #[default]
    Info,
}

/// Sink that logs records using the `tracing` crate.
///
/// Failures and item errors are always logged at warn level.
///
/// # Example
///
/// ```
/// use tbox_reply::{StatusHandler, TracingSink};
///
/// let handler = StatusHandler::new(TracingSink::debug());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink {
    level: LogLevel,
}

impl TracingSink {
    /// Create a tracing sink logging at info level.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a tracing sink logging at debug level.
    #[must_use]
    pub fn debug() -> Self {
        Self {
            level: LogLevel::Debug,
        }
    }

    /// Log level of this sink.
    #[must_use]
    pub const fn level(&self) -> LogLevel {
        self.level
    }
}

impl Sink for TracingSink {
    fn emit(&self, record: Record) {
        match (&record, self.level) {
            (
                Record::Failure {
                    handler,
                    code,
                    message,
                },
                _,
            ) => {
                warn!(%handler, code, reason = %message, "request failed");
            }
            (
                Record::ItemError {
                    handler,
                    position,
                    child,
                    kind,
                    message,
                },
                _,
            ) => {
                warn!(%handler, ?position, ?child, %kind, error = %message, "item not decoded");
            }
            (_, LogLevel::Debug) => {
                debug!(record = ?record, "{}", record.name());
            }
            (
                Record::Status {
                    position,
                    code,
                    address,
                },
                LogLevel::Info,
            ) => {
                info!("{position} : object status: {code} : {address}");
            }
            (Record::Report { position, children }, LogLevel::Info) => {
                info!("report {position}: {children} children");
            }
            (
                Record::ReportChild {
                    report,
                    position,
                    text,
                    lossy,
                },
                LogLevel::Info,
            ) => {
                info!(lossy, "report {report} child {position}: {text}");
            }
            (Record::Item { handler, position }, LogLevel::Info) => {
                info!("{handler} {position}");
            }
        }
    }
}

// ============================================================================
// Collecting
// ============================================================================

/// Sink that keeps every record in memory.
///
/// Clones share the same storage, so a clone can be handed to a handler
/// while the original is kept for inspection.
#[derive(Debug, Clone, Default)]
pub struct CollectingSink {
    records: Arc<Mutex<Vec<Record>>>,
}

impl CollectingSink {
    /// Create an empty collecting sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the records received so far.
    #[must_use]
    pub fn records(&self) -> Vec<Record> {
        self.lock().clone()
    }

    /// Remove and return the records received so far.
    #[must_use]
    pub fn take(&self) -> Vec<Record> {
        std::mem::take(&mut *self.lock())
    }

    /// Number of records received so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether no record was received.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Record>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Sink for CollectingSink {
    fn emit(&self, record: Record) {
        self.lock().push(record);
    }
}

// ============================================================================
// Channel
// ============================================================================

/// Sink that forwards records to an unbounded tokio channel.
///
/// Records emitted after the receiver is dropped are discarded.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: mpsc::UnboundedSender<Record>,
}

impl ChannelSink {
    /// Create a sink sending into `sender`.
    #[must_use]
    pub const fn new(sender: mpsc::UnboundedSender<Record>) -> Self {
        Self { sender }
    }

    /// Create a sink and the receiving end of its channel.
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Record>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self::new(sender), receiver)
    }
}

impl Sink for ChannelSink {
    fn emit(&self, record: Record) {
        if let Err(err) = self.sender.send(record) {
            debug!(record = err.0.name(), "receiver closed, record dropped");
        }
    }
}

// ============================================================================
// JSON lines
// ============================================================================

/// Sink that writes each record as one line of JSON.
///
/// # Example
///
/// ```
/// use tbox_reply::{JsonLinesSink, Record, Sink};
///
/// let sink = JsonLinesSink::new(Vec::new());
/// sink.emit(Record::Report { position: 0, children: 2 });
///
/// let out = String::from_utf8(sink.into_inner()).expect("utf-8");
/// assert_eq!(out, "{\"record\":\"report\",\"position\":0,\"children\":2}\n");
/// ```
#[derive(Debug, Default)]
pub struct JsonLinesSink<W> {
    writer: Mutex<W>,
}

impl<W: Write + Send> JsonLinesSink<W> {
    /// Create a sink writing into `writer`.
    #[must_use]
    pub const fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Consume the sink and return the writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl<W: Write + Send> Sink for JsonLinesSink<W> {
    fn emit(&self, record: Record) {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let result = serde_json::to_writer(&mut *writer, &record)
            .map_err(std::io::Error::from)
            .and_then(|()| writer.write_all(b"\n"));
        if let Err(err) = result {
            warn!(record = record.name(), error = %err, "cannot write record");
        }
    }
}

// ============================================================================
// Metrics (feature-gated)
// ============================================================================

#[cfg(feature = "metrics")]
pub use self::counting::MetricsSink;

#[cfg(feature = "metrics")]
mod counting {
    use tbox_reply_core::{Record, Sink};

    /// Label for the record variant.
    const LABEL_RECORD: &str = "record";
    /// Label for the handler kind, when the record carries one.
    const LABEL_HANDLER: &str = "handler";

    /// Metric name.
    const METRIC_RECORDS_TOTAL: &str = "tbox_reply_records_total";

    /// Sink that counts records with the `metrics` facade and forwards them.
    ///
    /// Records `tbox_reply_records_total` (counter), labeled by record and
    /// handler kind.
    #[derive(Debug, Clone, Default)]
    pub struct MetricsSink<S> {
        inner: S,
    }

    impl<S: Sink> MetricsSink<S> {
        /// Wrap `inner`.
        #[must_use]
        pub const fn new(inner: S) -> Self {
            Self { inner }
        }

        /// Consume the wrapper and return the inner sink.
        #[must_use]
        pub fn into_inner(self) -> S {
            self.inner
        }
    }

    fn handler_label(record: &Record) -> &'static str {
        match record {
            Record::Failure { handler, .. }
            | Record::Item { handler, .. }
            | Record::ItemError { handler, .. } => handler.as_str(),
            Record::Status { .. } => "status",
            Record::Report { .. } | Record::ReportChild { .. } => "report",
        }
    }

    impl<S: Sink> Sink for MetricsSink<S> {
        fn emit(&self, record: Record) {
            metrics::counter!(
                METRIC_RECORDS_TOTAL,
                LABEL_RECORD => record.name(),
                LABEL_HANDLER => handler_label(&record)
            )
            .increment(1);
            self.inner.emit(record);
        }
    }

}
