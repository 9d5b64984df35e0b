//! Error types for crmkit.
//!
//! One unified error type with explicit variants for validation, store,
//! caller-contract and authentication failures. "Absent" is never an error:
//! lookups return `Option` instead.

use std::fmt;
use thiserror::Error;

/// The unified error type for crmkit operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A record or patch failed its collection's schema. Raised before any
    /// store call.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Failure reported by the remote store (transport, permission, quota).
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// The caller violated an operation's contract.
    #[error("invalid argument: {0}")]
    InvalidArgument(#[from] InvalidArgumentError),

    /// Session provider failures.
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),
}

impl Error {
    /// Returns the validation failure, if this is one.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Error::Validation(err) => Some(err),
            _ => None,
        }
    }
}

/// A single field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Name of the offending field.
    pub field: String,
    /// Human-readable reason, suitable for showing next to the input.
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

impl std::error::Error for ValidationError {}

/// Failures surfaced by a remote store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Transport { message: String },

    /// Request timed out.
    #[error("request timed out")]
    Timeout,

    /// Local I/O failed (filesystem backends).
    #[error("I/O error: {message}")]
    Io { message: String },

    /// The store answered with an error status.
    #[error("{0}")]
    Rejected(RejectedError),

    /// A patch targeted a record that does not exist.
    #[error("record {id} not found in {collection}")]
    NotFound { collection: String, id: String },

    /// A stored document could not be decoded.
    #[error("malformed document: {message}")]
    Malformed { message: String },
}

impl StoreError {
    /// Check if the store refused the request for lack of permission.
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, StoreError::Rejected(rejected) if rejected.is_permission_denied())
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io {
            message: err.to_string(),
        }
    }
}

/// An error status answered by a remote store.
#[derive(Debug, Clone)]
pub struct RejectedError {
    /// HTTP status code.
    pub status: u16,
    /// Machine-readable error code (if present).
    pub code: Option<String>,
    /// Error message from the server.
    pub message: Option<String>,
}

impl RejectedError {
    pub fn new(status: u16, code: Option<String>, message: Option<String>) -> Self {
        Self {
            status,
            code,
            message,
        }
    }

    /// Check if this is a permission failure.
    pub fn is_permission_denied(&self) -> bool {
        self.status == 401
            || self.status == 403
            || self.code.as_deref() == Some("PermissionDenied")
    }
}

impl fmt::Display for RejectedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if let Some(ref code) = self.code {
            write!(f, " [{}]", code)?;
        }
        if let Some(ref message) = self.message {
            write!(f, ": {}", message)?;
        }
        Ok(())
    }
}

impl std::error::Error for RejectedError {}

/// Caller contract violations.
#[derive(Debug, Error)]
pub enum InvalidArgumentError {
    /// Listing limit must be positive.
    #[error("limit must be greater than zero")]
    ZeroLimit,

    /// A cursor was replayed against a collection it was not issued for.
    #[error("cursor was issued for '{cursor}', not '{collection}'")]
    ForeignCursor { cursor: String, collection: String },

    /// Invalid collection name.
    #[error("invalid collection name '{value}': {reason}")]
    CollectionName { value: String, reason: String },

    /// Invalid record identifier.
    #[error("invalid record id '{value}': {reason}")]
    RecordId { value: String, reason: String },

    /// Invalid cursor token.
    #[error("invalid cursor '{value}': {reason}")]
    Cursor { value: String, reason: String },

    /// Invalid store URL.
    #[error("invalid store URL '{value}': {reason}")]
    StoreUrl { value: String, reason: String },

    /// A record or patch did not serialize to a JSON object.
    #[error("record must be a JSON object: {reason}")]
    NotAnObject { reason: String },
}

/// Session provider failures.
///
/// Each variant carries a stable [`code`](AuthError::code) that front ends
/// can map to their own messages.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Email does not have valid syntax.
    #[error("invalid email address")]
    InvalidEmail,

    /// Password is too short.
    #[error("password must be at least {min_len} characters")]
    WeakPassword { min_len: usize },

    /// An account already exists for this email.
    #[error("an account already exists for this email")]
    EmailInUse,

    /// Unknown account or wrong password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Account or session storage could not be read or written.
    #[error("session storage failed: {message}")]
    Storage { message: String },
}

impl AuthError {
    /// Stable error code for this failure.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::InvalidEmail => "auth/invalid-email",
            AuthError::WeakPassword { .. } => "auth/weak-password",
            AuthError::EmailInUse => "auth/email-already-in-use",
            AuthError::InvalidCredentials => "auth/invalid-credential",
            AuthError::Storage { .. } => "auth/internal-error",
        }
    }
}
