//! Database layer
//!
//! MongoDB storage with a lazily-initialized shared handle. The connection
//! is established by the first caller that needs it and reused for the
//! process lifetime; concurrent first callers race on a single
//! initialization, never on duplicate connections.

pub mod mongo;
pub mod schemas;

pub use mongo::{IntoIndexes, MongoClient, MongoCollection, MutMetadata};

use tokio::sync::OnceCell;

use crate::config::Args;
use crate::db::schemas::{StoreDoc, STORE_COLLECTION};
use crate::types::Result;

/// Lazily-initialized shared database handle
pub struct Database {
    uri: String,
    db_name: String,
    stores: OnceCell<MongoCollection<StoreDoc>>,
}

impl Database {
    pub fn new(args: &Args) -> Self {
        Self {
            uri: args.mongodb_uri.clone(),
            db_name: args.mongodb_db.clone(),
            stores: OnceCell::new(),
        }
    }

    /// Get the stores collection, connecting and applying indexes on first use
    pub async fn stores(&self) -> Result<&MongoCollection<StoreDoc>> {
        self.stores
            .get_or_try_init(|| async {
                let client = MongoClient::new(&self.uri, &self.db_name).await?;
                client.collection::<StoreDoc>(STORE_COLLECTION).await
            })
            .await
    }
}
