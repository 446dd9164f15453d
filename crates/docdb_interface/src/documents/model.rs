use serde::{Deserialize, Serialize};

/// Provisioning class selected when a collection is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub enum OfferTier {
    #[default]
    S1,
    S2,
    S3,
}

impl OfferTier {
    // Request units per second reserved for the tier. S1 is raised to the
    // current provisioning floor.
    pub fn throughput(&self) -> u32 {
        match self {
            OfferTier::S1 => 400,
            OfferTier::S2 => 1000,
            OfferTier::S3 => 2500,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OfferTier::S1 => "S1",
            OfferTier::S2 => "S2",
            OfferTier::S3 => "S3",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseRef {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionRef {
    pub database: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRef {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionSpec {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateCollectionOptions {
    pub offer_tier: OfferTier,
}

impl CollectionRef {
    pub fn namespace(&self) -> String {
        format!("{}.{}", self.database, self.name)
    }
}
