//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and functions
//! for easy glob importing:
//!
//! ```ignore
//! use tbox_reply_core::prelude::*;
//! ```

pub use crate::{
    Address, Error, ErrorKind, HandlerKind, ObjectStatus, Record, ReportNode, Result, Sink,
    StatusCode, TextMode, TransportFailure, TransportOutcome, report_to_string, sink_fn,
};
