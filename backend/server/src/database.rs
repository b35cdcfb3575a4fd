//! # MongoDB
//!
//! Document database holding the `nootropics` and `stacks` collections.
//!
//! ## Connection
//!
//! - One client per process, pooled internally by the driver
//! - Short connect and server selection timeouts so a missing database fails startup quickly
//!   instead of hanging the first request
//! - The unique `substanceName` index is ensured when the store opens
use std::{sync::Arc, time::Duration};

use catalog::{mongo::MongoStore, Store, StoreError};
use mongodb::{options::ClientOptions, Client};

use crate::config::Config;

const APP_NAME: &str = "nootropic-nexus";

pub async fn init_mongo(config: &Config) -> Result<Arc<dyn Store>, StoreError> {
    let mut options = ClientOptions::parse(&config.mongodb_uri).await?;
    options.app_name = Some(APP_NAME.to_string());
    options.connect_timeout = Some(Duration::from_secs(5));
    options.server_selection_timeout = Some(Duration::from_secs(5));

    let client = Client::with_options(options)?;
    let store = MongoStore::open(&client.database(&config.mongodb_db)).await?;

    Ok(Arc::new(store))
}
