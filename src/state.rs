use std::sync::Arc;

use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AssetService, AuthService, SeaOrmAssetService, SeaOrmAuthService, TransferService,
};

/// The services a front end works with, wired over one [`Store`].
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,

    pub store: Store,

    pub auth: Arc<dyn AuthService>,

    pub assets: Arc<dyn AssetService>,

    pub transfer: Arc<TransferService>,
}

impl AppState {
    /// Opens the database named in `config` (migrating and seeding it as
    /// needed) and builds the services.
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::open(&config).await?;
        Ok(Self::with_store(config, store))
    }

    #[must_use]
    pub fn with_store(config: Config, store: Store) -> Self {
        let auth = Arc::new(SeaOrmAuthService::new(
            store.clone(),
            config.security.clone(),
        )) as Arc<dyn AuthService>;

        let assets = Arc::new(SeaOrmAssetService::new(store.clone())) as Arc<dyn AssetService>;

        let transfer = Arc::new(TransferService::new(
            assets.clone(),
            config.transfer.clone(),
        ));

        Self {
            config: Arc::new(config),
            store,
            auth,
            assets,
            transfer,
        }
    }
}
