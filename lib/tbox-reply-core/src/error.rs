//! Error types for tbox-reply.

use derive_more::{Display, Error, From};
use serde::Serialize;

// ============================================================================
// Error Kind
// ============================================================================

/// Classification of every [`Error`] into the kinds reported to a sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The remote call itself failed.
    #[display("transport_failure")]
    TransportFailure,
    /// An address does not match the identifier grammar or length.
    #[display("malformed_identity")]
    MalformedIdentity,
    /// A response field is absent or cannot be parsed.
    #[display("malformed_payload")]
    MalformedPayload,
    /// A byte payload is not valid UTF-8.
    #[display("text_decode_anomaly")]
    TextDecodeAnomaly,
}

// ============================================================================
// Error Type
// ============================================================================

/// Main error type for response decoding.
#[derive(Debug, Display, Error, From)]
pub enum Error {
    /// The transport reported a failure instead of a response.
    #[display("transport failure {code}: {message}")]
    #[from(skip)]
    Transport {
        /// Transport status code.
        code: i32,
        /// Error message.
        message: String,
    },

    /// Identifier has the wrong length or character class.
    #[display("malformed identity: {reason}")]
    #[from(skip)]
    MalformedIdentity {
        /// What is wrong with the identifier.
        reason: String,
    },

    /// A field is missing or ill-typed.
    #[display("malformed payload at '{field}': {reason}")]
    #[from(skip)]
    MalformedPayload {
        /// Path of the offending field (e.g. `object_status.address.uuid`).
        field: String,
        /// Error message.
        reason: String,
    },

    /// Invalid UTF-8 in a text-bearing byte payload.
    #[display("invalid UTF-8 after {valid_up_to} bytes")]
    #[from(skip)]
    TextDecodeAnomaly {
        /// Length of the valid UTF-8 prefix.
        valid_up_to: usize,
    },

    /// The response bytes are not a valid protobuf message.
    #[display("wire decode error: {_0}")]
    #[from]
    Wire(prost::DecodeError),
}

/// Result type alias using [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a transport error from code and message.
    #[must_use]
    pub fn transport(code: i32, message: impl Into<String>) -> Self {
        Self::Transport {
            code,
            message: message.into(),
        }
    }

    /// Create a malformed identity error.
    #[must_use]
    pub fn malformed_identity(reason: impl Into<String>) -> Self {
        Self::MalformedIdentity {
            reason: reason.into(),
        }
    }

    /// Create a malformed payload error for a field path.
    #[must_use]
    pub fn malformed_payload(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedPayload {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a missing-field error, the common case of [`Error::MalformedPayload`].
    #[must_use]
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::malformed_payload(field, "field is absent")
    }

    /// Classify this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport { .. } => ErrorKind::TransportFailure,
            Self::MalformedIdentity { .. } => ErrorKind::MalformedIdentity,
            Self::MalformedPayload { .. } | Self::Wire(_) => ErrorKind::MalformedPayload,
            Self::TextDecodeAnomaly { .. } => ErrorKind::TextDecodeAnomaly,
        }
    }

    /// Returns `true` if this is a transport failure.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Returns `true` if this error only concerns one item of a response.
    ///
    /// Item errors never abort the sibling items.
    #[must_use]
    pub const fn is_item_error(&self) -> bool {
        !self.is_transport()
    }
}

impl From<std::str::Utf8Error> for Error {
    fn from(err: std::str::Utf8Error) -> Self {
        Self::TextDecodeAnomaly {
            valid_up_to: err.valid_up_to(),
        }
    }
}
