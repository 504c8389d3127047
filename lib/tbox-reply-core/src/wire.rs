//! Protobuf messages of the reports plane.
//!
//! These mirror the remote service schema field for field; the tags are part
//! of the external contract and must not change. Every reply to a status,
//! report, task or file query is an [`ObjectsList`], of which each handler
//! reads one repeated field.
//!
//! # Example
//!
//! ```
//! use prost::Message;
//! use tbox_reply_core::wire::{ObjectsList, Report};
//!
//! let list = ObjectsList {
//!     reports: vec![Report::default().add_sub_report(Report::with_bytes("ok"))],
//!     ..ObjectsList::default()
//! };
//! let bytes = list.encode_to_vec();
//! let decoded = ObjectsList::decode(bytes.as_slice()).expect("decode");
//! assert_eq!(decoded.len_reports(), 1);
//! ```

use bytes::Bytes;

/// Raw identifier bytes.
#[derive(Clone, PartialEq, prost::Message)]
pub struct Uuid {
    /// Identifier bytes, 16 for a well-formed address.
    #[prost(bytes = "bytes", tag = "100")]
    pub data: Bytes,
}

/// Address of a remote object.
#[derive(Clone, PartialEq, prost::Message)]
pub struct Address {
    /// UUID-based address.
    #[prost(message, optional, tag = "400")]
    pub uuid: Option<Uuid>,
}

impl Address {
    /// Address from raw identifier bytes.
    #[must_use]
    pub fn from_uuid(data: impl Into<Bytes>) -> Self {
        Self {
            uuid: Some(Uuid { data: data.into() }),
        }
    }
}

/// Status of an object, as an opaque numeric code.
#[derive(Clone, Copy, PartialEq, Eq, prost::Message)]
pub struct Status {
    /// Status code, owned by the remote service.
    #[prost(int32, tag = "100")]
    pub code: i32,
}

/// Status of one addressed object.
#[derive(Clone, PartialEq, prost::Message)]
pub struct ObjectStatus {
    /// Status of the object.
    #[prost(message, optional, tag = "100")]
    pub status: Option<Status>,
    /// Address of the object.
    #[prost(message, optional, tag = "200")]
    pub address: Option<Address>,
}

impl ObjectStatus {
    /// Object status with both fields present.
    #[must_use]
    pub fn new(code: i32, address: Address) -> Self {
        Self {
            status: Some(Status { code }),
            address: Some(address),
        }
    }
}

/// Report, possibly with sub-reports.
#[derive(Clone, PartialEq, prost::Message)]
pub struct Report {
    /// Report type.
    #[prost(int32, tag = "100")]
    pub r#type: i32,
    /// Text-bearing payload, expected to be UTF-8.
    #[prost(bytes = "bytes", tag = "200")]
    pub bytes: Bytes,
    /// Sub-reports, in generation order.
    #[prost(message, repeated, tag = "300")]
    pub children: Vec<Report>,
}

impl Report {
    /// Report carrying the given payload and no sub-reports.
    #[must_use]
    pub fn with_bytes(bytes: impl Into<Bytes>) -> Self {
        Self {
            bytes: bytes.into(),
            ..Self::default()
        }
    }

    /// Append a sub-report.
    #[must_use]
    pub fn add_sub_report(mut self, report: Self) -> Self {
        self.children.push(report);
        self
    }

    /// Whether this report has any sub-report.
    #[must_use]
    pub fn has_sub_reports(&self) -> bool {
        !self.children.is_empty()
    }

    /// Visit every direct sub-report with its index.
    pub fn walk_sub_reports(&self, mut f: impl FnMut(usize, &Self)) {
        for (index, report) in self.children.iter().enumerate() {
            f(index, report);
        }
    }
}

/// Task item of a listing.
#[derive(Clone, PartialEq, prost::Message)]
pub struct Task {
    /// Task type.
    #[prost(int32, tag = "100")]
    pub r#type: i32,
    /// Task payload, uninterpreted.
    #[prost(bytes = "bytes", tag = "200")]
    pub bytes: Bytes,
}

/// File item of a listing.
#[derive(Clone, PartialEq, prost::Message)]
pub struct File {
    /// File name, if known.
    #[prost(string, optional, tag = "100")]
    pub filename: Option<String>,
    /// File content.
    #[prost(bytes = "bytes", tag = "200")]
    pub data: Bytes,
}

/// Reply to every reports-plane query.
#[derive(Clone, PartialEq, prost::Message)]
pub struct ObjectsList {
    /// Overall status of the query.
    #[prost(message, optional, tag = "100")]
    pub status: Option<Status>,
    /// Reports, for report queries.
    #[prost(message, repeated, tag = "200")]
    pub reports: Vec<Report>,
    /// Tasks, for task queries.
    #[prost(message, repeated, tag = "300")]
    pub tasks: Vec<Task>,
    /// Object statuses, for status queries.
    #[prost(message, repeated, tag = "400")]
    pub object_statuses: Vec<ObjectStatus>,
    /// Files, for file queries.
    #[prost(message, repeated, tag = "500")]
    pub files: Vec<File>,
}

impl ObjectsList {
    /// Number of reports.
    #[must_use]
    pub fn len_reports(&self) -> usize {
        self.reports.len()
    }

    /// Number of tasks.
    #[must_use]
    pub fn len_tasks(&self) -> usize {
        self.tasks.len()
    }

    /// Number of object statuses.
    #[must_use]
    pub fn len_object_statuses(&self) -> usize {
        self.object_statuses.len()
    }

    /// Number of files.
    #[must_use]
    pub fn len_files(&self) -> usize {
        self.files.len()
    }
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};
    use prost::Message;

    use super::*;

    #[test]
    fn objects_list_from_wire() {
        let list = ObjectsList {
            object_statuses: vec![ObjectStatus::new(200, Address::from_uuid(vec![7; 16]))],
            files: vec![File::default(), File::default()],
            ..ObjectsList::default()
        };

        let decoded = ObjectsList::decode(list.encode_to_vec().as_slice());
        let_assert!(Ok(decoded) = decoded);
        check!(decoded.len_object_statuses() == 1);
        check!(decoded.len_files() == 2);
        check!(decoded.len_reports() == 0);
        check!(decoded.object_statuses[0].status == Some(Status { code: 200 }));
    }

    #[test]
    fn truncated_bytes_fail_to_decode() {
        let list = ObjectsList {
            reports: vec![Report::with_bytes("some report text")],
            ..ObjectsList::default()
        };
        let bytes = list.encode_to_vec();
        let truncated = &bytes[..bytes.len() - 3];

        check!(ObjectsList::decode(truncated).is_err());
    }

    #[test]
    fn nested_reports_survive_the_wire() {
        let report = Report::with_bytes("root")
            .add_sub_report(Report::with_bytes("a").add_sub_report(Report::with_bytes("a.1")))
            .add_sub_report(Report::with_bytes("b"));

        let decoded = Report::decode(report.encode_to_vec().as_slice()).expect("decode");
        check!(decoded == report);
        check!(decoded.has_sub_reports());
        check!(decoded.children[0].has_sub_reports());
        check!(!decoded.children[1].has_sub_reports());
    }

    #[test]
    fn walk_sub_reports_in_order() {
        let report = Report::default()
            .add_sub_report(Report::with_bytes("first"))
            .add_sub_report(Report::with_bytes("second"));

        let mut seen = Vec::new();
        report.walk_sub_reports(|index, sub| seen.push((index, sub.bytes.clone())));

        check!(seen == vec![(0, Bytes::from("first")), (1, Bytes::from("second"))]);
    }
}
