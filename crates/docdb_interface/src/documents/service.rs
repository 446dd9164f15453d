use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::documents::model::{
    CollectionRef, CollectionSpec, CreateCollectionOptions, DatabaseRef, DocumentRef,
};
use crate::errors::Result;

#[async_trait]
pub trait DocumentService {
    // Exact name match among the databases visible to the credential.
    async fn find_database(&self, name: &str) -> Result<Option<DatabaseRef>>;

    async fn find_collection(
        &self,
        database: &DatabaseRef,
        name: &str,
    ) -> Result<Option<CollectionRef>>;

    async fn create_collection(
        &self,
        database: &DatabaseRef,
        spec: &CollectionSpec,
        options: &CreateCollectionOptions,
    ) -> Result<CollectionRef>;

    async fn create_document(
        &self,
        collection: &CollectionRef,
        document: Value,
    ) -> Result<DocumentRef>;

    // Release the underlying connection. The handle must not be used afterwards.
    async fn close(&self) -> Result<()>;
}

pub type DocumentServiceHandle = Arc<dyn DocumentService + Send + Sync>;

/// Opens one connection handle to a document service.
#[async_trait]
pub trait DocumentServiceProvider {
    async fn connect(
        &self,
        endpoint_url: &str,
        authorization_key: &str,
    ) -> Result<DocumentServiceHandle>;
}
