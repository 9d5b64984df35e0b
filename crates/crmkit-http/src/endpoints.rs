//! REST endpoint paths and request/response types.

use serde::{Deserialize, Serialize};

use crmkit_core::record::Fields;
use crmkit_core::types::{CollectionName, RecordId};

// ============================================================================
// Paths
// ============================================================================

/// collections/{c}/documents
pub fn documents_path(collection: &CollectionName) -> String {
    format!("collections/{}/documents", collection.as_str())
}

/// collections/{c}/documents/{id}
pub fn document_path(collection: &CollectionName, id: &RecordId) -> String {
    format!("{}/{}", documents_path(collection), id.as_str())
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for listing documents.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListDocumentsQuery<'a> {
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_after: Option<&'a str>,
}

/// Response from listing documents.
#[derive(Debug, Deserialize)]
pub struct ListDocumentsResponse {
    pub documents: Vec<DocumentBody>,
}

/// A document as sent over the wire.
#[derive(Debug, Deserialize)]
pub struct DocumentBody {
    pub id: String,
    #[serde(default)]
    pub fields: Fields,
}

/// Request body for insert and patch.
#[derive(Debug, Serialize)]
pub struct FieldsBody<'a> {
    pub fields: &'a Fields,
}

/// Response from insert.
#[derive(Debug, Deserialize)]
pub struct InsertResponse {
    pub id: String,
}

/// Error body returned with non-2xx statuses.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: Option<String>,
    pub message: Option<String>,
}
