//! Transport outcomes delivered to response handlers.
//!
//! The transport completes each call with an `(error, response)` pair of
//! which only one side matters. [`TransportOutcome`] makes that explicit.

use bytes::Bytes;
use prost::Message;

use crate::{Error, Result, wire};

/// Failure of the remote call itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportFailure {
    /// Transport status code.
    pub code: i32,
    /// Error message.
    pub message: String,
}

impl TransportFailure {
    /// Creates a new transport failure.
    #[must_use]
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl From<TransportFailure> for Error {
    fn from(failure: TransportFailure) -> Self {
        Self::Transport {
            code: failure.code,
            message: failure.message,
        }
    }
}

/// Completion of one remote call: a failure or a response.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportOutcome<R> {
    /// The call failed; there is no payload to read.
    Failure(TransportFailure),
    /// The call succeeded with this response.
    Response(R),
}

impl<R> TransportOutcome<R> {
    /// Assemble an outcome from the transport's raw pair.
    ///
    /// A failure wins over a response delivered alongside it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedPayload`] when neither side is present.
    pub fn from_parts(failure: Option<TransportFailure>, response: Option<R>) -> Result<Self> {
        match (failure, response) {
            (Some(failure), _) => Ok(Self::Failure(failure)),
            (None, Some(response)) => Ok(Self::Response(response)),
            (None, None) => Err(Error::malformed_payload(
                "response",
                "neither failure nor response present",
            )),
        }
    }

    /// Returns `true` if the call failed.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    /// Transform the response with a function.
    pub fn map<F, R2>(self, f: F) -> TransportOutcome<R2>
    where
        F: FnOnce(R) -> R2,
    {
        match self {
            Self::Failure(failure) => TransportOutcome::Failure(failure),
            Self::Response(response) => TransportOutcome::Response(f(response)),
        }
    }

    /// Convert into a `Result`, the failure becoming [`Error::Transport`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] for a failure outcome.
    pub fn into_result(self) -> Result<R> {
        match self {
            Self::Failure(failure) => Err(failure.into()),
            Self::Response(response) => Ok(response),
        }
    }
}

impl TransportOutcome<Bytes> {
    /// Parse the response bytes into an [`wire::ObjectsList`].
    ///
    /// A failure outcome is passed through untouched and its payload is
    /// never read.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Wire`] if the bytes are not a valid message.
    pub fn decode(self) -> Result<TransportOutcome<wire::ObjectsList>> {
        match self {
            Self::Failure(failure) => Ok(TransportOutcome::Failure(failure)),
            Self::Response(bytes) => Ok(TransportOutcome::Response(
                wire::ObjectsList::decode(bytes)?,
            )),
        }
    }
}
