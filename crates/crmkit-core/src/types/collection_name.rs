//! Collection name type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidArgumentError};

/// Maximum length of a collection name.
const MAX_LEN: usize = 64;

/// A validated collection name.
///
/// Collections are independent namespaces of records. They exist implicitly
/// once a record is written; there is no explicit creation step.
///
/// # Example
///
/// ```
/// use crmkit_core::CollectionName;
///
/// let customers = CollectionName::new("customers").unwrap();
/// assert_eq!(customers.as_str(), "customers");
/// assert!(CollectionName::new("Customers").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CollectionName(String);

impl CollectionName {
    /// Create a new collection name, validating the format.
    ///
    /// # Errors
    ///
    /// Returns an error unless the name is 1-64 characters of lowercase
    /// letters, digits, `-` or `_`, starting with a letter.
    pub fn new(s: impl Into<String>) -> Result<Self, Error> {
        let s = s.into();
        Self::validate(&s)?;
        Ok(Self(s))
    }

    /// Returns the collection name string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(s: &str) -> Result<(), Error> {
        let invalid = |reason: String| -> Error {
            InvalidArgumentError::CollectionName {
                value: s.to_string(),
                reason,
            }
            .into()
        };

        let Some(first) = s.chars().next() else {
            return Err(invalid("cannot be empty".to_string()));
        };

        if s.len() > MAX_LEN {
            return Err(invalid(format!(
                "exceeds maximum length of {} characters",
                MAX_LEN
            )));
        }

        if !first.is_ascii_lowercase() {
            return Err(invalid("must start with a lowercase letter".to_string()));
        }

        if let Some(c) = s
            .chars()
            .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-' || *c == '_'))
        {
            return Err(invalid(format!("contains invalid character '{}'", c)));
        }

        Ok(())
    }
}

impl fmt::Display for CollectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CollectionName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for CollectionName {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<CollectionName> for String {
    fn from(name: CollectionName) -> Self {
        name.0
    }
}

impl AsRef<str> for CollectionName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
