//! Report tree decoding.
//!
//! A report carries an ordered list of child reports, each holding a byte
//! payload meant to be UTF-8 text. How invalid UTF-8 is treated is chosen
//! with [`TextMode`].

use serde::Serialize;

use crate::{Result, wire};

/// How to treat invalid UTF-8 in report payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextMode {
    /// Replace invalid sequences with U+FFFD and flag the child as lossy.
    #[default]
    Lenient,
    /// Reject the child with [`crate::Error::TextDecodeAnomaly`].
    Strict,
}

/// Decoded text of one child report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportChild {
    /// Report text.
    pub text: String,
    /// Whether invalid UTF-8 was replaced while decoding.
    pub lossy: bool,
}

/// Decoded report: its children, in generation order.
///
/// Built by [`decode`] for callers that want a whole report at once rather
/// than the record stream of the report handler.
///
/// ```
/// use tbox_reply_core::report::{TextMode, decode};
/// use tbox_reply_core::wire::Report;
///
/// let report = Report::default()
///     .add_sub_report(Report::with_bytes("ok"))
///     .add_sub_report(Report::with_bytes(&b"d\xffne"[..]));
///
/// let node = decode(&report, TextMode::Lenient)?;
/// assert_eq!(node.texts(), ["ok", "d\u{fffd}ne"]);
/// assert!(node.has_anomalies());
/// # Ok::<(), tbox_reply_core::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportNode {
    children: Vec<ReportChild>,
}

impl ReportNode {
    /// Number of children.
    #[must_use]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Whether this is a leaf report.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Children in order.
    pub fn iter(&self) -> impl Iterator<Item = &ReportChild> {
        self.children.iter()
    }

    /// Texts of the children in order.
    #[must_use]
    pub fn texts(&self) -> Vec<&str> {
        self.children.iter().map(|child| child.text.as_str()).collect()
    }

    /// Whether any child needed replacement characters.
    #[must_use]
    pub fn has_anomalies(&self) -> bool {
        self.children.iter().any(|child| child.lossy)
    }
}

impl IntoIterator for ReportNode {
    type Item = ReportChild;
    type IntoIter = std::vec::IntoIter<ReportChild>;

    fn into_iter(self) -> Self::IntoIter {
        self.children.into_iter()
    }
}

/// Text of a single report, with replacement characters for invalid UTF-8.
///
/// # Example
///
/// ```
/// use tbox_reply_core::{report_to_string, wire::Report};
///
/// assert_eq!(report_to_string(&Report::with_bytes("done")), "done");
/// ```
#[must_use]
pub fn report_to_string(report: &wire::Report) -> String {
    String::from_utf8_lossy(&report.bytes).into_owned()
}

/// Decode a byte payload as report text.
///
/// # Errors
///
/// Returns [`crate::Error::TextDecodeAnomaly`] in [`TextMode::Strict`] when
/// `bytes` is not valid UTF-8. Lenient decoding never fails.
pub fn decode_text(bytes: &[u8], mode: TextMode) -> Result<ReportChild> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Ok(ReportChild {
            text: text.to_owned(),
            lossy: false,
        }),
        Err(err) => match mode {
            TextMode::Strict => Err(err.into()),
            TextMode::Lenient => Ok(ReportChild {
                text: String::from_utf8_lossy(bytes).into_owned(),
                lossy: true,
            }),
        },
    }
}

/// Decode one child report.
///
/// # Errors
///
/// See [`decode_text`].
pub fn decode_child(child: &wire::Report, mode: TextMode) -> Result<ReportChild> {
    decode_text(&child.bytes, mode)
}

/// Decode all children of a report, stopping at the first failure.
///
/// Only direct children are decoded. The report's own payload and deeper
/// sub-reports are left untouched.
///
/// # Errors
///
/// See [`decode_text`]; only [`TextMode::Strict`] can fail.
pub fn decode(report: &wire::Report, mode: TextMode) -> Result<ReportNode> {
    let children = report
        .children
        .iter()
        .map(|child| decode_child(child, mode))
        .collect::<Result<Vec<_>>>()?;
    Ok(ReportNode { children })
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};

    use super::*;
    use crate::ErrorKind;

    fn report(children: &[&[u8]]) -> wire::Report {
        children
            .iter()
            .fold(wire::Report::default(), |report, bytes| {
                report.add_sub_report(wire::Report::with_bytes(bytes.to_vec()))
            })
    }

    #[test]
    fn decode_children_in_order() {
        let_assert!(Ok(node) = decode(&report(&[b"ok", b"done"]), TextMode::Lenient));
        check!(node.texts() == vec!["ok", "done"]);
        check!(!node.has_anomalies());
    }

    #[test]
    fn decode_leaf_report() {
        let_assert!(Ok(node) = decode(&wire::Report::with_bytes("leaf"), TextMode::Strict));
        check!(node.is_empty());
        check!(node.len() == 0);
    }

    #[test]
    fn lenient_replaces_invalid_utf8() {
        let_assert!(Ok(node) = decode(&report(&[b"ok", b"bad \xff"]), TextMode::Lenient));
        check!(node.texts() == vec!["ok", "bad \u{fffd}"]);
        check!(node.has_anomalies());

        let children: Vec<_> = node.into_iter().collect();
        check!(!children[0].lossy);
        check!(children[1].lossy);
    }

    #[test]
    fn strict_rejects_invalid_utf8() {
        let_assert!(Err(err) = decode(&report(&[b"ok", b"\xc3\x28"]), TextMode::Strict));
        check!(err.kind() == ErrorKind::TextDecodeAnomaly);
    }

    #[test]
    fn decode_text_keeps_multibyte() {
        let_assert!(Ok(child) = decode_text("héllo ✓".as_bytes(), TextMode::Strict));
        check!(child.text == "héllo ✓");
        check!(!child.lossy);
    }

    #[test]
    fn report_to_string_is_lenient() {
        check!(report_to_string(&wire::Report::with_bytes(&b"a\xffb"[..])) == "a\u{fffd}b");
        check!(report_to_string(&wire::Report::default()).is_empty());
    }
}
