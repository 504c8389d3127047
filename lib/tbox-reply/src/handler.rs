//! Response handlers.
//!
//! One handler per request kind. Each receives the outcome of one remote
//! call, reads the repeated field of its kind from the [`ObjectsList`] and
//! emits a [`Record`] per decoded element to its [`Sink`]:
//!
//! - [`StatusHandler`] - `object_statuses`
//! - [`ReportHandler`] - `reports` and their children
//! - [`TaskHandler`] - `tasks`
//! - [`FileHandler`] - `files`
//!
//! Handlers never fail: transport failures and decode errors are emitted as
//! records too. An item that fails to decode does not stop its siblings.
//!
//! # Example
//!
//! ```
//! use tbox_reply::{CollectingSink, ResponseHandler, StatusHandler};
//! use tbox_reply::wire::{Address, ObjectStatus, ObjectsList};
//! use tbox_reply::{Record, TransportOutcome};
//!
//! let sink = CollectingSink::new();
//! let handler = StatusHandler::new(sink.clone());
//!
//! let list = ObjectsList {
//!     object_statuses: vec![ObjectStatus::new(200, Address::from_uuid(vec![0; 16]))],
//!     ..ObjectsList::default()
//! };
//! handler.handle(TransportOutcome::Response(list));
//!
//! assert_eq!(sink.len(), 1);
//! assert!(matches!(sink.records()[0], Record::Status { position: 0, .. }));
//! ```

use bytes::Bytes;
use tbox_reply_core::wire::ObjectsList;
use tbox_reply_core::{
    Error, HandlerKind, ListingItem, ObjectStatus, Record, ReportChild, Sink, TransportFailure,
    TransportOutcome, listing, report, status,
};
use tracing::{debug, info_span, warn};

use crate::HandlerConfig;

// ============================================================================
// Response Handler Trait
// ============================================================================

/// Handler for the replies of one request kind.
///
/// Implementors provide the kind-specific walk in
/// [`handle_list`](Self::handle_list); the entry points taking transport
/// outcomes are provided.
pub trait ResponseHandler: Send + Sync {
    /// Request kind this handler answers.
    fn kind(&self) -> HandlerKind;

    /// Handler configuration.
    fn config(&self) -> &HandlerConfig;

    /// Forward one record to the sink.
    fn emit(&self, record: Record);

    /// Walk the kind-specific field of a response, in order.
    fn handle_list(&self, list: &ObjectsList);

    /// Handle a decoded outcome.
    ///
    /// A failure is emitted as a single [`Record::Failure`] and the
    /// response is not looked at.
    fn handle(&self, outcome: TransportOutcome<ObjectsList>) {
        let kind = self.kind();
        let _span = info_span!("response", handler = %kind).entered();

        match outcome {
            TransportOutcome::Failure(failure) => {
                warn!(code = failure.code, reason = %failure.message, "remote call failed");
                self.emit(Record::failure(kind, failure));
            }
            TransportOutcome::Response(list) => {
                if self.config().log_item_counts {
                    debug!(items = item_count(kind, &list), "response received");
                }
                self.handle_list(&list);
            }
        }
    }

    /// Handle an outcome whose response is still encoded.
    ///
    /// Unparseable bytes are emitted as a [`Record::ItemError`] without a
    /// position.
    fn handle_bytes(&self, outcome: TransportOutcome<Bytes>) {
        match outcome.decode() {
            Ok(outcome) => self.handle(outcome),
            Err(err) => self.report_unreadable(&err),
        }
    }

    /// Handle the transport's raw `(error, response)` pair.
    fn handle_parts(&self, failure: Option<TransportFailure>, response: Option<Bytes>) {
        match TransportOutcome::from_parts(failure, response) {
            Ok(outcome) => self.handle_bytes(outcome),
            Err(err) => self.report_unreadable(&err),
        }
    }

    /// Emit an invocation-level error record.
    fn report_unreadable(&self, err: &Error) {
        let kind = self.kind();
        warn!(handler = %kind, error = %err, "response unreadable");
        self.emit(Record::item_error(kind, None, None, err));
    }
}

/// Number of elements a handler of `kind` walks in `list`.
#[must_use]
pub fn item_count(kind: HandlerKind, list: &ObjectsList) -> usize {
    match kind {
        HandlerKind::Status => list.len_object_statuses(),
        HandlerKind::Report => list.len_reports(),
        HandlerKind::Task => list.len_tasks(),
        HandlerKind::File => list.len_files(),
    }
}

impl<H: ResponseHandler + ?Sized> ResponseHandler for &H {
    fn kind(&self) -> HandlerKind {
        (**self).kind()
    }

    fn config(&self) -> &HandlerConfig {
        (**self).config()
    }

    fn emit(&self, record: Record) {
        (**self).emit(record);
    }

    fn handle_list(&self, list: &ObjectsList) {
        (**self).handle_list(list);
    }
}

impl<H: ResponseHandler + ?Sized> ResponseHandler for std::sync::Arc<H> {
    fn kind(&self) -> HandlerKind {
        (**self).kind()
    }

    fn config(&self) -> &HandlerConfig {
        (**self).config()
    }

    fn emit(&self, record: Record) {
        (**self).emit(record);
    }

    fn handle_list(&self, list: &ObjectsList) {
        (**self).handle_list(list);
    }
}

// ============================================================================
// Handlers
// ============================================================================

macro_rules! handler_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name<S> {
            sink: S,
            config: HandlerConfig,
        }

        impl<S: Sink> $name<S> {
            /// Create a handler with the default configuration.
            #[must_use]
            pub fn new(sink: S) -> Self {
                Self::with_config(sink, HandlerConfig::default())
            }

            /// Create a handler with the given configuration.
            #[must_use]
            pub const fn with_config(sink: S, config: HandlerConfig) -> Self {
                Self { sink, config }
            }

            /// Get a reference to the sink.
            #[must_use]
            pub const fn sink(&self) -> &S {
                &self.sink
            }

            /// Consume the handler and return the sink.
            #[must_use]
            pub fn into_sink(self) -> S {
                self.sink
            }
        }
    };
}

handler_type!(
    /// Handler for status queries.
    ///
    /// Emits one [`Record::Status`] per object status.
    StatusHandler
);

handler_type!(
    /// Handler for report queries.
    ///
    /// Emits a [`Record::Report`] per report followed by a
    /// [`Record::ReportChild`] per child. In strict text mode, the first
    /// child that is not UTF-8 ends its report; sibling reports go on.
    ///
    /// The walk is one level deep: the payload of a top-level report and
    /// the sub-reports of its children are not emitted. Their count is
    /// logged at debug level as `nested`.
    ReportHandler
);

handler_type!(
    /// Handler for task submissions.
    ///
    /// Emits one [`Record::Item`] per task.
    TaskHandler
);

handler_type!(
    /// Handler for file listings.
    ///
    /// Emits one [`Record::Item`] per file.
    FileHandler
);

impl<S: Sink> ResponseHandler for StatusHandler<S> {
    fn kind(&self) -> HandlerKind {
        HandlerKind::Status
    }

    fn config(&self) -> &HandlerConfig {
        &self.config
    }

    fn emit(&self, record: Record) {
        self.sink.emit(record);
    }

    fn handle_list(&self, list: &ObjectsList) {
        for (position, object_status) in list.object_statuses.iter().enumerate() {
            match status::decode(object_status) {
                Ok(ObjectStatus { code, address }) => {
                    debug!(position, %code, %address, "object status");
                    self.emit(Record::Status {
                        position,
                        code,
                        address,
                    });
                }
                Err(err) => {
                    warn!(position, error = %err, "object status skipped");
                    self.emit(Record::item_error(self.kind(), Some(position), None, &err));
                }
            }
        }
    }
}

impl<S: Sink> ResponseHandler for ReportHandler<S> {
    fn kind(&self) -> HandlerKind {
        HandlerKind::Report
    }

    fn config(&self) -> &HandlerConfig {
        &self.config
    }

    fn emit(&self, record: Record) {
        self.sink.emit(record);
    }

    fn handle_list(&self, list: &ObjectsList) {
        for (position, parent) in list.reports.iter().enumerate() {
            let nested: usize = parent.children.iter().map(|child| child.children.len()).sum();
            debug!(position, children = parent.children.len(), nested, "report");
            self.emit(Record::Report {
                position,
                children: parent.children.len(),
            });

            for (child, sub_report) in parent.children.iter().enumerate() {
                match report::decode_child(sub_report, self.config.text_mode) {
                    Ok(ReportChild { text, lossy }) => {
                        if lossy {
                            warn!(report = position, child, "report text is not valid UTF-8");
                        }
                        self.emit(Record::ReportChild {
                            report: position,
                            position: child,
                            text,
                            lossy,
                        });
                    }
                    Err(err) => {
                        warn!(report = position, child, error = %err, "remaining children skipped");
                        self.emit(Record::item_error(
                            self.kind(),
                            Some(position),
                            Some(child),
                            &err,
                        ));
                        break;
                    }
                }
            }
        }
    }
}

impl<S: Sink> ResponseHandler for TaskHandler<S> {
    fn kind(&self) -> HandlerKind {
        HandlerKind::Task
    }

    fn config(&self) -> &HandlerConfig {
        &self.config
    }

    fn emit(&self, record: Record) {
        self.sink.emit(record);
    }

    fn handle_list(&self, list: &ObjectsList) {
        emit_items(self, list.tasks.iter().map(listing::decode_task));
    }
}

impl<S: Sink> ResponseHandler for FileHandler<S> {
    fn kind(&self) -> HandlerKind {
        HandlerKind::File
    }

    fn config(&self) -> &HandlerConfig {
        &self.config
    }

    fn emit(&self, record: Record) {
        self.sink.emit(record);
    }

    fn handle_list(&self, list: &ObjectsList) {
        emit_items(self, list.files.iter().map(listing::decode_file));
    }
}

// Listing items are opaque: only their positions reach the sink.
fn emit_items<H, T>(handler: &H, items: impl Iterator<Item = ListingItem<T>>)
where
    H: ResponseHandler + ?Sized,
{
    let kind = handler.kind();
    for (position, _item) in items.enumerate() {
        handler.emit(Record::Item {
            handler: kind,
            position,
        });
    }
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};
    use tbox_reply_core::wire::{Address, File, ObjectStatus as WireObjectStatus, Report, Task};
    use tbox_reply_core::{ErrorKind, StatusCode, TextMode};

    use tracing::Level;

    use super::*;
    use crate::CollectingSink;
    use crate::test_support::capture;

    fn statuses(items: Vec<WireObjectStatus>) -> TransportOutcome<ObjectsList> {
        TransportOutcome::Response(ObjectsList {
            object_statuses: items,
            ..ObjectsList::default()
        })
    }

    #[test]
    fn status_all_zero_address() {
        let sink = CollectingSink::new();
        let handler = StatusHandler::new(sink.clone());

        handler.handle(statuses(vec![WireObjectStatus::new(
            0,
            Address::from_uuid(vec![0; 16]),
        )]));

        let records = sink.records();
        check!(records.len() == 1);
        let_assert!(
            Record::Status {
                position,
                code,
                address
            } = &records[0]
        );
        check!(*position == 0);
        check!(*code == StatusCode(0));
        check!(address.to_string() == "00000000-0000-0000-0000-000000000000");
    }

    #[test]
    fn status_errors_do_not_abort_siblings() {
        let sink = CollectingSink::new();
        let handler = StatusHandler::new(sink.clone());

        handler.handle(statuses(vec![
            WireObjectStatus::new(200, Address::from_uuid(vec![1; 16])),
            WireObjectStatus::new(200, Address::from_uuid(vec![1; 3])),
            WireObjectStatus {
                status: None,
                address: Some(Address::from_uuid(vec![2; 16])),
            },
            WireObjectStatus::new(404, Address::from_uuid(vec![3; 16])),
        ]));

        let records = sink.records();
        check!(records.len() == 4);
        check!(matches!(records[0], Record::Status { position: 0, .. }));
        check!(matches!(
            records[1],
            Record::ItemError {
                handler: HandlerKind::Status,
                position: Some(1),
                kind: ErrorKind::MalformedIdentity,
                ..
            }
        ));
        check!(matches!(
            records[2],
            Record::ItemError {
                position: Some(2),
                kind: ErrorKind::MalformedPayload,
                ..
            }
        ));
        check!(matches!(
            records[3],
            Record::Status {
                position: 3,
                code: StatusCode::NOT_FOUND,
                ..
            }
        ));
    }

    #[test]
    fn report_children_in_order() {
        let sink = CollectingSink::new();
        let handler = ReportHandler::new(sink.clone());

        let report = Report::default()
            .add_sub_report(Report::with_bytes("ok"))
            .add_sub_report(Report::with_bytes("done"));
        handler.handle(TransportOutcome::Response(ObjectsList {
            reports: vec![report],
            ..ObjectsList::default()
        }));

        let texts: Vec<_> = sink
            .records()
            .into_iter()
            .filter_map(|record| match record {
                Record::ReportChild { text, .. } => Some(text),
                _ => None,
            })
            .collect();
        check!(texts == vec!["ok".to_string(), "done".to_string()]);
    }

    #[test]
    fn report_walk_is_one_level_deep() {
        let sink = CollectingSink::new();
        let handler = ReportHandler::new(sink.clone());

        let child = Report::with_bytes("child")
            .add_sub_report(Report::with_bytes("grandchild"))
            .add_sub_report(Report::with_bytes("grandchild"));
        let report = Report::with_bytes("parent").add_sub_report(child);
        let list = ObjectsList {
            reports: vec![report],
            ..ObjectsList::default()
        };

        let events = capture(|| handler.handle(TransportOutcome::Response(list)));

        check!(
            sink.records()
                == vec![
                    Record::Report {
                        position: 0,
                        children: 1
                    },
                    Record::ReportChild {
                        report: 0,
                        position: 0,
                        text: "child".to_string(),
                        lossy: false,
                    },
                ]
        );
        let_assert!(Some(event) = events.iter().find(|event| event.message == "report"));
        check!(event.field("nested") == Some("2"));
    }

    #[test]
    fn item_counts_logged_when_enabled() {
        let list = ObjectsList {
            tasks: vec![Task::default(); 3],
            ..ObjectsList::default()
        };

        for (enabled, expected) in [(true, vec!["3"]), (false, vec![])] {
            let config = HandlerConfig::builder().log_item_counts(enabled).build();
            let handler = TaskHandler::with_config(CollectingSink::new(), config);

            let events = capture(|| handler.handle(TransportOutcome::Response(list.clone())));
            let counts: Vec<_> = events
                .iter()
                .filter(|event| event.message == "response received")
                .map(|event| {
                    check!(event.level == Level::DEBUG);
                    event.field("items").unwrap_or_default()
                })
                .collect();
            check!(counts == expected);
            check!(handler.sink().len() == 3);
        }
    }

    #[test]
    fn strict_report_stops_at_bad_child() {
        let sink = CollectingSink::new();
        let config = HandlerConfig::builder().text_mode(TextMode::Strict).build();
        let handler = ReportHandler::with_config(sink.clone(), config);

        let report = Report::default()
            .add_sub_report(Report::with_bytes(&b"\xff"[..]))
            .add_sub_report(Report::with_bytes("never"));
        handler.handle_list(&ObjectsList {
            reports: vec![report],
            ..ObjectsList::default()
        });

        let records = sink.records();
        check!(records.len() == 2);
        check!(matches!(
            records[1],
            Record::ItemError {
                position: Some(0),
                child: Some(0),
                kind: ErrorKind::TextDecodeAnomaly,
                ..
            }
        ));
    }

    #[test]
    fn listings_emit_positions() {
        let sink = CollectingSink::new();
        let list = ObjectsList {
            tasks: vec![Task::default(); 2],
            files: vec![File::default(); 3],
            ..ObjectsList::default()
        };

        TaskHandler::new(&sink).handle_list(&list);
        FileHandler::new(&sink).handle_list(&list);

        let records = sink.records();
        check!(records.len() == 5);
        check!(
            records[1]
                == Record::Item {
                    handler: HandlerKind::Task,
                    position: 1
                }
        );
        check!(
            records[4]
                == Record::Item {
                    handler: HandlerKind::File,
                    position: 2
                }
        );
    }

    #[test]
    fn failure_short_circuits() {
        let sink = CollectingSink::new();
        let handler = FileHandler::new(sink.clone());

        handler.handle_parts(Some(TransportFailure::new(14, "unavailable")), None);

        check!(
            sink.records()
                == vec![Record::Failure {
                    handler: HandlerKind::File,
                    code: 14,
                    message: "unavailable".to_string(),
                }]
        );
    }

    #[test]
    fn item_count_per_kind() {
        let list = ObjectsList {
            reports: vec![Report::default()],
            files: vec![File::default(); 2],
            ..ObjectsList::default()
        };
        check!(item_count(HandlerKind::Report, &list) == 1);
        check!(item_count(HandlerKind::File, &list) == 2);
        check!(item_count(HandlerKind::Task, &list) == 0);
        check!(item_count(HandlerKind::Status, &list) == 0);
    }

    #[test]
    fn handler_gives_back_its_sink() {
        let handler = TaskHandler::new(CollectingSink::new());
        handler.handle_list(&ObjectsList {
            tasks: vec![Task::default()],
            ..ObjectsList::default()
        });
        check!(handler.into_sink().len() == 1);
    }
}
