//! Object addresses and their canonical text form.
//!
//! An [`Address`] is a 16-byte identifier. Its canonical text is the
//! lowercase hyphenated hex form (`xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx`),
//! and [`decode`] accepts exactly that grammar, so that
//! `decode(encode(a)) == a` and `encode(decode(s)) == s` both hold.
//!
//! # Example
//!
//! ```
//! use tbox_reply_core::address;
//!
//! let text = address::encode(&[0; 16]).expect("16 bytes");
//! assert_eq!(text, "00000000-0000-0000-0000-000000000000");
//! assert_eq!(address::decode(&text).expect("canonical"), [0; 16]);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::{Error, Result, wire};

/// Length of an address in bytes.
pub const ADDRESS_LEN: usize = 16;

/// Length of the canonical text form.
pub const ADDRESS_TEXT_LEN: usize = 36;

const HYPHENS: [usize; 4] = [8, 13, 18, 23];

/// Encode raw address bytes into the canonical text form.
///
/// # Errors
///
/// Returns [`Error::MalformedIdentity`] if `bytes` is not exactly
/// [`ADDRESS_LEN`] long.
pub fn encode(bytes: &[u8]) -> Result<String> {
    Address::from_bytes(bytes).map(|address| address.to_string())
}

/// Decode the canonical text form into raw address bytes.
///
/// # Errors
///
/// Returns [`Error::MalformedIdentity`] if `text` is not lowercase
/// hyphenated hex of the expected length.
pub fn decode(text: &str) -> Result<[u8; ADDRESS_LEN]> {
    text.parse::<Address>().map(|address| *address.as_bytes())
}

/// Fixed-size identifier of a remote object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address(uuid::Uuid);

impl Address {
    /// All-zero address.
    pub const NIL: Self = Self(uuid::Uuid::nil());

    /// Address from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedIdentity`] on a length mismatch.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != ADDRESS_LEN {
            return Err(Error::malformed_identity(format!(
                "expected {ADDRESS_LEN} bytes, got {}",
                bytes.len()
            )));
        }
        uuid::Uuid::from_slice(bytes)
            .map(Self)
            .map_err(|err| Error::malformed_identity(err.to_string()))
    }

    /// Address carried by a wire message.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedPayload`] when the message has no UUID, and
    /// [`Error::MalformedIdentity`] when the UUID has the wrong length.
    pub fn from_wire(address: &wire::Address) -> Result<Self> {
        let uuid = address
            .uuid
            .as_ref()
            .ok_or_else(|| Error::missing_field("address.uuid"))?;
        Self::from_bytes(&uuid.data)
    }

    /// Raw bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        self.0.as_bytes()
    }

    /// Wire message for this address.
    #[must_use]
    pub fn to_wire(&self) -> wire::Address {
        wire::Address::from_uuid(self.as_bytes().to_vec())
    }
}

impl From<[u8; ADDRESS_LEN]> for Address {
    fn from(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(uuid::Uuid::from_bytes(bytes))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.hyphenated(), f)
    }
}

impl FromStr for Address {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        if text.len() != ADDRESS_TEXT_LEN {
            return Err(Error::malformed_identity(format!(
                "expected {ADDRESS_TEXT_LEN} characters, got {}",
                text.len()
            )));
        }
        for (index, ch) in text.char_indices() {
            let valid = if HYPHENS.contains(&index) {
                ch == '-'
            } else {
                matches!(ch, '0'..='9' | 'a'..='f')
            };
            if !valid {
                return Err(Error::malformed_identity(format!(
                    "unexpected character {ch:?} at {index}"
                )));
            }
        }
        uuid::Uuid::try_parse(text)
            .map(Self)
            .map_err(|err| Error::malformed_identity(err.to_string()))
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
