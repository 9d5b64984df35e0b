//! Cursor-based listing.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidArgumentError};
use crate::record::Record;
use crate::types::{CollectionName, RecordId};

/// Page size used when [`ListOptions::limit`] is unset.
pub const DEFAULT_LIMIT: u32 = 100;

/// Continuation token for a listing.
///
/// Refers to the last record of a full page. Replaying it yields the records
/// strictly after that one. A cursor only works for the collection that
/// issued it.
///
/// The token form (`Display`/`FromStr`) exists so front ends can hand a
/// cursor back across process boundaries; callers should treat it as
/// opaque.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cursor {
    collection: CollectionName,
    after: RecordId,
}

impl Cursor {
    pub(crate) fn new(collection: CollectionName, after: RecordId) -> Self {
        Self { collection, after }
    }

    /// The collection this cursor was issued for.
    pub fn collection(&self) -> &CollectionName {
        &self.collection
    }

    pub(crate) fn after(&self) -> &RecordId {
        &self.after
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collection, self.after)
    }
}

impl FromStr for Cursor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (collection, after) = s.split_once('/').ok_or_else(|| InvalidArgumentError::Cursor {
            value: s.to_string(),
            reason: "expected '<collection>/<record-id>'".to_string(),
        })?;

        Ok(Self {
            collection: CollectionName::new(collection)?,
            after: RecordId::new(after)?,
        })
    }
}

/// Options for [`Repository::get_all`](super::Repository::get_all).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    /// Maximum records per page; [`DEFAULT_LIMIT`] when unset. Zero is
    /// rejected.
    pub limit: Option<u32>,
    /// Continue after this cursor; start from the beginning when unset.
    pub after: Option<Cursor>,
}

impl ListOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn after(mut self, cursor: impl Into<Option<Cursor>>) -> Self {
        self.after = cursor.into();
        self
    }
}

/// One page of a listing.
///
/// The cursor sits beside the records, not among them: iterating a page
/// yields records only.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingPage<T> {
    /// Records in store order.
    pub items: Vec<Record<T>>,
    /// Set when the page is full; pass it back to continue. `None` means the
    /// collection is exhausted.
    pub cursor: Option<Cursor>,
}

impl<T> ListingPage<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record<T>> {
        self.items.iter()
    }

    /// Split into records and cursor.
    pub fn into_parts(self) -> (Vec<Record<T>>, Option<Cursor>) {
        (self.items, self.cursor)
    }
}

impl<T> IntoIterator for ListingPage<T> {
    type Item = Record<T>;
    type IntoIter = std::vec::IntoIter<Record<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a ListingPage<T> {
    type Item = &'a Record<T>;
    type IntoIter = std::slice::Iter<'a, Record<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
