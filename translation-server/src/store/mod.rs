use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub mod memory;

pub use memory::InMemoryDocumentStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    Pending,
    Approved,
}

/// An uploaded document and its review state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UploadRequest {
    pub id: String,
    pub filename: String,
    pub uploaded_by: Option<String>,
    pub status: DocumentStatus,
}

/// Approved documents share the shape of upload requests
pub type ApprovedDocument = UploadRequest;

/// Storage for the upload and approval workflow
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    /// Record a user upload awaiting approval, ids are `req-N`
    async fn create_request(&self, filename: &str, uploaded_by: Option<&str>) -> UploadRequest;

    /// Record an admin upload, approved immediately, ids are `doc-N`
    async fn create_approved(&self, filename: &str, uploaded_by: Option<&str>)
        -> ApprovedDocument;

    /// Move a pending request into the approved documents.
    /// Returns `None` when no pending request has this id.
    async fn approve(&self, request_id: &str) -> Option<ApprovedDocument>;

    async fn pending_count(&self) -> usize;

    async fn approved_count(&self) -> usize;
}
