use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use docdb_infrastructure::settings::{AppSettings, Sample};
use docdb_interface::documents::model::{
    CollectionRef, CollectionSpec, CreateCollectionOptions, DatabaseRef, DocumentRef, OfferTier,
};
use docdb_interface::documents::service::{
    DocumentService, DocumentServiceHandle, DocumentServiceProvider,
};
use docdb_interface::errors::{AppError, Result};
use docdb_runner::runner::{resolve_or_create_collection, DemoRunner};

#[derive(Default)]
struct State {
    databases: Vec<String>,
    // (database, collection) -> documents
    collections: BTreeMap<(String, String), Vec<Value>>,
    created_with: Vec<(String, OfferTier)>,
    connects: usize,
    closes: usize,
    collection_lookups: usize,
    writes: usize,
    fail_on_write: Option<usize>,
}

#[derive(Clone, Default)]
struct InMemoryService {
    state: Arc<Mutex<State>>,
}

impl InMemoryService {
    fn with_database(name: &str) -> Self {
        let service = Self::default();
        service.state().databases.push(name.to_string());
        service
    }

    fn state(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    fn documents(&self, database: &str, collection: &str) -> Vec<Value> {
        self.state()
            .collections
            .get(&(database.to_string(), collection.to_string()))
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl DocumentService for InMemoryService {
    async fn find_database(&self, name: &str) -> Result<Option<DatabaseRef>> {
        Ok(self
            .state()
            .databases
            .iter()
            .find(|n| *n == name)
            .map(|name| DatabaseRef { name: name.clone() }))
    }

    async fn find_collection(
        &self,
        database: &DatabaseRef,
        name: &str,
    ) -> Result<Option<CollectionRef>> {
        let mut state = self.state();
        state.collection_lookups += 1;
        let key = (database.name.clone(), name.to_string());

        Ok(state.collections.contains_key(&key).then(|| CollectionRef {
            database: database.name.clone(),
            name: name.to_string(),
        }))
    }

    async fn create_collection(
        &self,
        database: &DatabaseRef,
        spec: &CollectionSpec,
        options: &CreateCollectionOptions,
    ) -> Result<CollectionRef> {
        let mut state = self.state();
        let key = (database.name.clone(), spec.name.clone());
        if state.collections.contains_key(&key) {
            return Err(AppError::ServiceError {
                status: "Conflict (48)".to_string(),
                msg: format!("collection {} already exists", spec.name),
                root_cause: "NamespaceExists".to_string(),
            });
        }

        state.collections.insert(key, Vec::new());
        state
            .created_with
            .push((spec.name.clone(), options.offer_tier));

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
        let mut state = self.state();
        state.writes += 1;
        if state.fail_on_write == Some(state.writes) {
            return Err(AppError::ServiceError {
                status: "RequestRateTooLarge (16500)".to_string(),
                msg: "request rate is large".to_string(),
                root_cause: "throttled".to_string(),
            });
        }

        let key = (collection.database.clone(), collection.name.clone());
        let documents = state.collections.entry(key).or_default();
        documents.push(document);

        Ok(DocumentRef {
            id: format!("doc-{}", documents.len()),
        })
    }

    async fn close(&self) -> Result<()> {
        self.state().closes += 1;
        Ok(())
    }
}

#[async_trait]
impl DocumentServiceProvider for InMemoryService {
    async fn connect(
        &self,
        _endpoint_url: &str,
        _authorization_key: &str,
    ) -> Result<DocumentServiceHandle> {
        self.state().connects += 1;
        Ok(Arc::new(self.clone()))
    }
}

fn credentials() -> AppSettings {
    AppSettings {
        end_point_url: "mongodb://famous.mongo.cosmos.azure.com:10255/?ssl=true".to_string(),
        authorization_key: "secret".to_string(),
        account_name: None,
    }
}

fn expected_cars() -> Value {
    json!([
        {"Make": "Make1", "Model": "Model1", "Color": "Color1"},
        {"Make": "Make2", "Model": "Model2", "Color": "Color2"},
        {"Make": "Make3", "Model": "Model3", "Color": "Color3"},
    ])
}

#[tokio::test]
async fn creates_collection_and_writes_six_people() {
    let service = InMemoryService::with_database("TestDB");
    let runner = DemoRunner::new(service.clone(), Sample::default());

    let report = runner.run(&credentials()).await.unwrap();

    assert_eq!(
        report.collection,
        Some(CollectionRef {
            database: "TestDB".to_string(),
            name: "TestCollection1".to_string(),
        })
    );
    assert_eq!(report.documents.len(), 6);

    let documents = service.documents("TestDB", "TestCollection1");
    assert_eq!(documents.len(), 6);
    for (i, document) in documents.iter().enumerate() {
        assert_eq!(document["Name"], format!("FamousPerson{i}"));
        assert_eq!(document["Address"], format!("FamousPerson{i}'s Address"));
        assert_eq!(document["Cars"], expected_cars());
    }

    let state = service.state();
    assert_eq!(
        state.created_with,
        vec![("TestCollection1".to_string(), OfferTier::S1)]
    );
    assert_eq!(state.connects, 1);
    assert_eq!(state.closes, 1);
}

#[tokio::test]
async fn resolving_twice_returns_the_same_collection() {
    let service = InMemoryService::with_database("TestDB");

    let first = resolve_or_create_collection(&service, "TestDB", "TestCollection1", OfferTier::S1)
        .await
        .unwrap();
    let second =
        resolve_or_create_collection(&service, "TestDB", "TestCollection1", OfferTier::S1)
            .await
            .unwrap();

    assert_eq!(first, second);
    assert_eq!(service.state().created_with.len(), 1);
}

#[tokio::test]
async fn existing_collection_is_reused() {
    let service = InMemoryService::with_database("TestDB");
    service.state().collections.insert(
        ("TestDB".to_string(), "TestCollection1".to_string()),
        vec![json!({"Name": "Someone"})],
    );
    let runner = DemoRunner::new(service.clone(), Sample::default());

    runner.run(&credentials()).await.unwrap();

    assert!(service.state().created_with.is_empty());
    assert_eq!(service.documents("TestDB", "TestCollection1").len(), 7);
}

#[tokio::test]
async fn missing_database_fails_fast_and_writes_nothing() {
    let service = InMemoryService::with_database("OtherDB");
    let runner = DemoRunner::new(service.clone(), Sample::default());

    let error = runner.run(&credentials()).await.unwrap_err();

    assert_eq!(
        error,
        AppError::DatabaseNotFoundError {
            name: "TestDB".to_string()
        }
    );
    let state = service.state();
    assert_eq!(state.collection_lookups, 0);
    assert_eq!(state.writes, 0);
    assert!(state.collections.is_empty());
    assert_eq!(state.closes, 1);
}

#[tokio::test]
async fn third_write_failure_leaves_two_documents() {
    let service = InMemoryService::with_database("TestDB");
    service.state().fail_on_write = Some(3);
    let runner = DemoRunner::new(service.clone(), Sample::default());

    let error = runner.run(&credentials()).await.unwrap_err();

    assert!(matches!(error, AppError::ServiceError { .. }));
    assert_eq!(
        error.report_line(),
        "RequestRateTooLarge (16500) error occurred: request rate is large, Message: throttled"
    );

    let documents = service.documents("TestDB", "TestCollection1");
    assert_eq!(documents.len(), 2);
    assert_eq!(documents[1]["Name"], "FamousPerson1");

    let state = service.state();
    assert_eq!(state.writes, 3);
    assert_eq!(state.closes, 1);
}

#[tokio::test]
async fn missing_end_point_url_fails_before_connecting() {
    let service = InMemoryService::with_database("TestDB");
    let runner = DemoRunner::new(service.clone(), Sample::default());
    let app_settings = AppSettings {
        end_point_url: String::new(),
        ..credentials()
    };

    let error = runner.run(&app_settings).await.unwrap_err();

    assert!(matches!(error, AppError::ConfigurationError { .. }));
    let state = service.state();
    assert_eq!(state.connects, 0);
    assert_eq!(state.closes, 0);
}

#[tokio::test]
async fn disabled_collection_creation_writes_nothing() {
    let service = InMemoryService::with_database("TestDB");
    let sample = Sample {
        create_collection: false,
        ..Sample::default()
    };
    let runner = DemoRunner::new(service.clone(), sample);

    let report = runner.run(&credentials()).await.unwrap();

    assert_eq!(report.collection, None);
    assert!(report.documents.is_empty());
    let state = service.state();
    assert_eq!(state.writes, 0);
    assert_eq!(state.closes, 1);
}

#[tokio::test]
async fn configured_offer_tier_is_used() {
    let service = InMemoryService::with_database("TestDB");
    let sample = Sample {
        collection_name: "People".to_string(),
        offer_tier: OfferTier::S3,
        ..Sample::default()
    };
    let runner = DemoRunner::new(service.clone(), sample);

    runner.run(&credentials()).await.unwrap();

    assert_eq!(
        service.state().created_with,
        vec![("People".to_string(), OfferTier::S3)]
    );
}
