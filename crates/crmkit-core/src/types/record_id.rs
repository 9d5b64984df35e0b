//! Record identifier type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidArgumentError};

/// Maximum length of a record identifier.
const MAX_LEN: usize = 128;

/// A validated, store-assigned record identifier.
///
/// Identifiers are immutable once assigned and are never accepted as input
/// fields of a record. Store order is ascending identifier order.
///
/// # Example
///
/// ```
/// use crmkit_core::RecordId;
///
/// let id = RecordId::new("4f1c2a9e0b7d4c3f8e6a5b4c3d2e1f00").unwrap();
/// assert_eq!(id.as_str().len(), 32);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecordId(String);

impl RecordId {
    /// Create a new record id from a string, validating the format.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is empty, longer than 128 characters,
    /// `.`/`..`, or contains characters outside `[A-Za-z0-9._~:-]`.
    pub fn new(s: impl Into<String>) -> Result<Self, Error> {
        let s = s.into();
        Self::validate(&s)?;
        Ok(Self(s))
    }

    /// Generate a fresh random identifier (UUIDv4, simple form).
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    /// Returns the identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(s: &str) -> Result<(), Error> {
        let invalid = |reason: String| -> Error {
            InvalidArgumentError::RecordId {
                value: s.to_string(),
                reason,
            }
            .into()
        };

        if s.is_empty() {
            return Err(invalid("cannot be empty".to_string()));
        }

        if s.len() > MAX_LEN {
            return Err(invalid(format!(
                "exceeds maximum length of {} characters",
                MAX_LEN
            )));
        }

        if s == "." || s == ".." {
            return Err(invalid("cannot be '.' or '..'".to_string()));
        }

        for c in s.chars() {
            if !c.is_ascii_alphanumeric() && !matches!(c, '.' | '-' | '_' | '~' | ':') {
                return Err(invalid(format!("contains invalid character '{}'", c)));
            }
        }

        Ok(())
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for RecordId {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<RecordId> for String {
    fn from(id: RecordId) -> Self {
        id.0
    }
}

impl AsRef<str> for RecordId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
