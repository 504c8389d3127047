//! Core types for tbox-reply response handling.
//!
//! This crate holds everything that is pure decoding:
//! - [`wire`] - Protobuf messages of the reports plane
//! - [`Address`] and the [`address`] codec - Object identifiers and their text form
//! - [`ObjectStatus`] and [`StatusCode`] - Decoded object statuses
//! - [`ReportNode`] and [`report_to_string`] - Decoded report trees
//! - [`ListingItem`] - Opaque task and file items
//! - [`TransportOutcome`] - What the transport hands to a handler
//! - [`Record`] and [`Sink`] - What a handler hands to its consumer
//! - [`Error`] and [`Result`] - Error handling

pub mod address;
mod error;
pub mod listing;
mod outcome;
pub mod prelude;
mod record;
pub mod report;
pub mod status;
pub mod wire;

pub use address::Address;
pub use error::{Error, ErrorKind, Result};
pub use listing::{FileItem, ListingItem, TaskItem};
pub use outcome::{TransportFailure, TransportOutcome};
pub use record::{HandlerKind, Record, Sink, SinkFn, sink_fn};
pub use report::{ReportChild, ReportNode, TextMode, report_to_string};
pub use status::{ObjectStatus, StatusCode};
