//! Response handlers for task-service replies.
//!
//! Each remote call of the reports plane completes with a transport error or
//! an encoded [`wire::ObjectsList`]. A [`ResponseHandler`] turns that outcome
//! into normalized [`Record`]s for a [`Sink`].
//!
//! # Example
//!
//! ```ignore
//! use tbox_reply::prelude::*;
//!
//! let handler = ReportHandler::with_config(
//!     TracingSink::new(),
//!     HandlerConfig::builder().strict_text().build(),
//! );
//!
//! // Called by the transport when the report query completes
//! handler.handle_parts(error, response_bytes);
//! ```

mod config;
mod handler;
pub mod prelude;
mod service;
pub mod sink;
#[cfg(test)]
mod test_support;

pub use config::{HandlerConfig, HandlerConfigBuilder};
pub use handler::{
    FileHandler, ReportHandler, ResponseHandler, StatusHandler, TaskHandler, item_count,
};
pub use service::{HandlerLayer, HandlerService};
pub use sink::{ChannelSink, CollectingSink, JsonLinesSink, LogLevel, TracingSink};

#[cfg(feature = "metrics")]
pub use sink::MetricsSink;

// Re-export core types
pub use tbox_reply_core::{
    Address, Error, ErrorKind, FileItem, HandlerKind, ListingItem, ObjectStatus, Record,
    ReportChild, ReportNode, Result, Sink, SinkFn, StatusCode, TaskItem, TextMode,
    TransportFailure, TransportOutcome, report_to_string, sink_fn,
};

// Re-export core modules
pub use tbox_reply_core::{address, listing, report, status, wire};

// Re-export tower for service composition
pub use tower;
