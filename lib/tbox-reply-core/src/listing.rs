//! Task and file listings.
//!
//! Listing items are opaque for now: callers may count them, nothing more.

use crate::wire;

/// One task or file of a listing.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingItem<T> {
    // Kept private until items get a decoded structure of their own.
    _raw: T,
}

/// Task of a task listing.
pub type TaskItem = ListingItem<wire::Task>;

/// File of a file listing.
pub type FileItem = ListingItem<wire::File>;

/// Decode a task item.
#[must_use]
pub fn decode_task(task: &wire::Task) -> TaskItem {
    ListingItem { _raw: task.clone() }
}

/// Decode a file item.
#[must_use]
pub fn decode_file(file: &wire::File) -> FileItem {
    ListingItem { _raw: file.clone() }
}
