use crate::store::{ApprovedDocument, DocumentStatus, DocumentStore, UploadRequest};
use log::info;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

/// Process-local document store, contents are lost on restart
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    pending: RwLock<HashMap<String, UploadRequest>>,
    approved: RwLock<HashMap<String, ApprovedDocument>>,
    next_request: AtomicU64,
    next_document: AtomicU64,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn create_request(&self, filename: &str, uploaded_by: Option<&str>) -> UploadRequest {
        let id = format!("req-{}", self.next_request.fetch_add(1, Ordering::Relaxed) + 1);
        let request = UploadRequest {
            id: id.clone(),
            filename: filename.to_string(),
            uploaded_by: uploaded_by.map(str::to_string),
            status: DocumentStatus::Pending,
        };
        self.pending.write().await.insert(id, request.clone());
        info!("Upload request {} created for {}", request.id, filename);
        request
    }

    async fn create_approved(
        &self,
        filename: &str,
        uploaded_by: Option<&str>,
    ) -> ApprovedDocument {
        let id = format!("doc-{}", self.next_document.fetch_add(1, Ordering::Relaxed) + 1);
        let document = ApprovedDocument {
            id: id.clone(),
            filename: filename.to_string(),
            uploaded_by: uploaded_by.map(str::to_string),
            status: DocumentStatus::Approved,
        };
        self.approved.write().await.insert(id, document.clone());
        info!("Document {} stored for {}", document.id, filename);
        document
    }

    async fn approve(&self, request_id: &str) -> Option<ApprovedDocument> {
        let mut request = self.pending.write().await.remove(request_id)?;
        request.status = DocumentStatus::Approved;
        self.approved
            .write()
            .await
            .insert(request.id.clone(), request.clone());
        info!("Upload request {} approved", request_id);
        Some(request)
    }

    async fn pending_count(&self) -> usize {
        self.pending.read().await.len()
    }

    async fn approved_count(&self) -> usize {
        self.approved.read().await.len()
    }
}
