use std::sync::Arc;

use catalog::{NootropicRepository, StackRepository, Store};

use super::{config::Config, database::init_mongo, error::StartupError};

pub struct AppState {
    pub config: Config,
    pub nootropics: NootropicRepository,
    pub stacks: StackRepository,
}

impl AppState {
    pub async fn new() -> Result<Arc<Self>, StartupError> {
        let config = Config::load()?;
        let store = init_mongo(&config).await?;

        Ok(Self::with_store(config, store))
    }

    pub fn with_store(config: Config, store: Arc<dyn Store>) -> Arc<Self> {
        Arc::new(Self {
            config,
            nootropics: NootropicRepository::new(store.clone()),
            stacks: StackRepository::new(store),
        })
    }
}
