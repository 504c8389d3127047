//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and traits
//! for easy glob importing:
//!
//! ```ignore
//! use tbox_reply::prelude::*;
//! ```

pub use crate::{
    CollectingSink, Error, FileHandler, HandlerConfig, HandlerKind, Record, ReportHandler,
    ResponseHandler, Result, Sink, StatusHandler, TaskHandler, TextMode, TracingSink,
    TransportFailure, TransportOutcome,
};
