use std::error::Error;
use std::sync::Arc;

use async_trait::async_trait;
use mongodb::bson::{doc, to_document, Bson, Document};
use mongodb::error::{ErrorKind, WriteFailure};
use serde_json::Value;
use tracing::debug;

use docdb_interface::documents::model::{
    CollectionRef, CollectionSpec, CreateCollectionOptions, DatabaseRef, DocumentRef,
};
use docdb_interface::documents::service::{
    DocumentService, DocumentServiceHandle, DocumentServiceProvider,
};
use docdb_interface::errors::{AppError, Result};

use crate::database_connection::{DatabaseConnection, DatabaseManager};

/// Convert a driver error into a `ServiceError` carrying the server status,
/// the top-level message and the innermost cause.
pub fn service_error(e: mongodb::error::Error) -> AppError {
    let (status, msg) = match e.kind.as_ref() {
        ErrorKind::Command(command) => (
            format!("{} ({})", command.code_name, command.code),
            command.message.clone(),
        ),
        ErrorKind::Write(WriteFailure::WriteError(write)) => (
            format!(
                "{} ({})",
                write.code_name.as_deref().unwrap_or("WriteError"),
                write.code
            ),
            write.message.clone(),
        ),
        ErrorKind::Write(WriteFailure::WriteConcernError(concern)) => (
            format!("{} ({})", concern.code_name, concern.code),
            concern.message.clone(),
        ),
        ErrorKind::Authentication { message, .. } => {
            ("Unauthorized".to_string(), message.clone())
        }
        ErrorKind::ServerSelection { message, .. } => {
            ("ServiceUnavailable".to_string(), message.clone())
        }
        other => ("Unknown".to_string(), other.to_string()),
    };

    let root_cause = innermost_cause(&e).unwrap_or_else(|| msg.clone());

    AppError::ServiceError {
        status,
        msg,
        root_cause,
    }
}

fn innermost_cause(e: &dyn Error) -> Option<String> {
    let mut cause = e.source()?;
    while let Some(next) = cause.source() {
        cause = next;
    }
    Some(cause.to_string())
}

pub struct MongoDocumentService {
    client: DatabaseConnection,
}

impl MongoDocumentService {
    pub fn new(client: DatabaseConnection) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DocumentService for MongoDocumentService {
    async fn find_database(&self, name: &str) -> Result<Option<DatabaseRef>> {
        let names = self
            .client
            .list_database_names(doc! {"name": name}, None)
            .await
            .map_err(service_error)?;

        Ok(names
            .into_iter()
            .find(|n| n == name)
            .map(|name| DatabaseRef { name }))
    }

    async fn find_collection(
        &self,
        database: &DatabaseRef,
        name: &str,
    ) -> Result<Option<CollectionRef>> {
        let names = self
            .client
            .database(&database.name)
            .list_collection_names(doc! {"name": name})
            .await
            .map_err(service_error)?;

        Ok(names.into_iter().find(|n| n == name).map(|name| CollectionRef {
            database: database.name.clone(),
            name,
        }))
    }

    async fn create_collection(
        &self,
        database: &DatabaseRef,
        spec: &CollectionSpec,
        options: &CreateCollectionOptions,
    ) -> Result<CollectionRef> {
        // Hosted accounts provision throughput through an extension command
        // instead of the plain `create` command.
        let command = doc! {
            "customAction": "CreateCollection",
            "collection": &spec.name,
            "offerThroughput": options.offer_tier.throughput() as i32,
        };

        self.client
            .database(&database.name)
            .run_command(command, None)
            .await
            .map_err(service_error)?;

        Ok(CollectionRef {
            database: database.name.clone(),
            name: spec.name.clone(),
        })
    }

    async fn create_document(
        &self,
        collection: &CollectionRef,
        document: Value,
    ) -> Result<DocumentRef> {
        let document =
            to_document(&document).map_err(|e| AppError::GenericError { msg: e.to_string() })?;

        let result = self
            .client
            .database(&collection.database)
            .collection::<Document>(&collection.name)
            .insert_one(document, None)
            .await
            .map_err(service_error)?;

        let id = match result.inserted_id {
            Bson::ObjectId(oid) => oid.to_hex(),
            Bson::String(id) => id,
            other => other.to_string(),
        };

        Ok(DocumentRef { id })
    }

    async fn close(&self) -> Result<()> {
        debug!("shutting down the document service client");
        self.client.clone().shutdown().await;
        Ok(())
    }
}

/// Opens a `MongoDocumentService` for each run.
pub struct MongoServiceProvider {
    account_name: Option<String>,
}

impl MongoServiceProvider {
    pub fn new(account_name: Option<String>) -> Self {
        Self { account_name }
    }
}

#[async_trait]
impl DocumentServiceProvider for MongoServiceProvider {
    async fn connect(
        &self,
        endpoint_url: &str,
        authorization_key: &str,
    ) -> Result<DocumentServiceHandle> {
        let client = DatabaseManager::new_client(
            endpoint_url,
            authorization_key,
            self.account_name.as_deref(),
        )
        .await?;

        Ok(Arc::new(MongoDocumentService::new(client)))
    }
}
