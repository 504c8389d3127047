//! Object status decoding.
//!
//! Status codes belong to the remote service and the set may grow, so
//! [`StatusCode`] carries any value; [`StatusCode::name`] only labels the
//! codes known today.

use std::fmt;

use serde::Serialize;

use crate::{Address, Error, Result, wire};

/// Status code of an object, passed through unvalidated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct StatusCode(pub i32);

impl StatusCode {
    /// Reserved zero value.
    pub const RESERVED: Self = Self(0);
    /// Type not known.
    pub const UNSPECIFIED: Self = Self(100);
    /// Object found.
    pub const OK: Self = Self(200);
    /// Object created.
    pub const CREATED: Self = Self(201);
    /// Object accepted.
    pub const ACCEPTED: Self = Self(202);
    /// Not all requested parts were found.
    pub const PARTIAL: Self = Self(206);
    /// All objects found.
    pub const FOUND_ALL: Self = Self(220);
    /// Object is being processed.
    pub const IN_PROGRESS: Self = Self(230);
    /// Object moved to another location.
    pub const MOVED_PERMANENTLY: Self = Self(301);
    /// Object not found.
    pub const NOT_FOUND: Self = Self(404);
    /// Object not ready.
    pub const NOT_READY: Self = Self(405);
    /// Object failed on an internal error.
    pub const INTERNAL_ERROR: Self = Self(500);
    /// Object failed.
    pub const FAILED: Self = Self(550);

    /// Numeric value.
    #[must_use]
    pub const fn code(self) -> i32 {
        self.0
    }

    /// Label of a code known to the remote service.
    #[must_use]
    pub const fn name(self) -> Option<&'static str> {
        let name = match self.0 {
            0 => "reserved",
            100 => "unspecified",
            200 => "ok",
            201 => "created",
            202 => "accepted",
            206 => "partial",
            220 => "found-all",
            230 => "in-progress",
            301 => "moved-permanently",
            404 => "not-found",
            405 => "not-ready",
            500 => "internal-error",
            550 => "failed",
            _ => return None,
        };
        Some(name)
    }
}

impl From<i32> for StatusCode {
    fn from(code: i32) -> Self {
        Self(code)
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{} ({name})", self.0),
            None => write!(f, "{}", self.0),
        }
    }
}

/// Outcome of an operation on one addressed object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectStatus {
    /// Status code.
    pub code: StatusCode,
    /// Object address.
    pub address: Address,
}

/// Decode a wire object status.
///
/// # Errors
///
/// Returns [`Error::MalformedPayload`] if the status or address is absent,
/// and [`Error::MalformedIdentity`] if the address has the wrong length.
pub fn decode(status: &wire::ObjectStatus) -> Result<ObjectStatus> {
    let code = status
        .status
        .as_ref()
        .ok_or_else(|| Error::missing_field("object_status.status"))?
        .code;
    let address = status
        .address
        .as_ref()
        .ok_or_else(|| Error::missing_field("object_status.address"))
        .and_then(Address::from_wire)?;

    Ok(ObjectStatus {
        code: StatusCode(code),
        address,
    })
}
