use tracing::{info, warn};

use docdb_infrastructure::settings::{AppSettings, Sample};
use docdb_interface::documents::model::{
    CollectionRef, CollectionSpec, CreateCollectionOptions, DocumentRef, OfferTier,
};
use docdb_interface::documents::service::{DocumentService, DocumentServiceProvider};
use docdb_interface::errors::{AppError, Result};
use docdb_interface::people::model::{famous_people, Person};

type Service = dyn DocumentService + Send + Sync;

/// What a run left behind in the document service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub collection: Option<CollectionRef>,
    pub documents: Vec<DocumentRef>,
}

pub struct DemoRunner<P> {
    provider: P,
    sample: Sample,
}

impl<P: DocumentServiceProvider> DemoRunner<P> {
    pub fn new(provider: P, sample: Sample) -> Self {
        Self { provider, sample }
    }

    /// Open one connection, make sure the sample collection exists and write the
    /// famous people into it. The connection is closed on every path.
    pub async fn run(&self, app_settings: &AppSettings) -> Result<RunReport> {
        app_settings.validate()?;

        let service = self
            .provider
            .connect(&app_settings.end_point_url, &app_settings.authorization_key)
            .await?;
        info!("connected to the document service, target {}", self.sample);

        let outcome = self.work(service.as_ref()).await;
        let closed = service.close().await;

        match (outcome, closed) {
            (Ok(report), Ok(())) => {
                info!("connection closed");
                Ok(report)
            }
            (Ok(_), Err(e)) => Err(e),
            (Err(e), Ok(())) => Err(e),
            (Err(e), Err(close_error)) => {
                warn!("could not close the connection: {}", close_error);
                Err(e)
            }
        }
    }

    async fn work(&self, service: &Service) -> Result<RunReport> {
        let mut report = RunReport::default();

        if self.sample.create_collection {
            report.collection = Some(
                resolve_or_create_collection(
                    service,
                    &self.sample.database_name,
                    &self.sample.collection_name,
                    self.sample.offer_tier,
                )
                .await?,
            );
        }

        let people = famous_people();

        match &report.collection {
            Some(collection) => {
                report.documents = insert_all(service, collection, &people).await?;
            }
            None => info!("no collection resolved, skipping {} documents", people.len()),
        }

        Ok(report)
    }
}

/// Look up the database (which must already exist), then return the named
/// collection, creating it with the given tier when it is absent.
pub async fn resolve_or_create_collection(
    service: &Service,
    database_name: &str,
    collection_name: &str,
    offer_tier: OfferTier,
) -> Result<CollectionRef> {
    let database = service
        .find_database(database_name)
        .await?
        .ok_or_else(|| AppError::DatabaseNotFoundError {
            name: database_name.to_string(),
        })?;

    if let Some(collection) = service.find_collection(&database, collection_name).await? {
        info!("collection {} already exists", collection.namespace());
        return Ok(collection);
    }

    info!(
        "creating collection {}.{} with offer tier {}",
        database.name,
        collection_name,
        offer_tier.as_str()
    );

    service
        .create_collection(
            &database,
            &CollectionSpec {
                name: collection_name.to_string(),
            },
            &CreateCollectionOptions { offer_tier },
        )
        .await
}

/// Write each person as its own document, in order. Stops at the first failure;
/// documents already written stay in place.
pub async fn insert_all(
    service: &Service,
    collection: &CollectionRef,
    people: &[Person],
) -> Result<Vec<DocumentRef>> {
    let mut documents = Vec::with_capacity(people.len());

    for person in people {
        let document = serde_json::to_value(person)?;
        let created = service.create_document(collection, document).await?;
        info!("inserted {} as document {}", person.name, created.id);
        documents.push(created);
    }

    Ok(documents)
}
