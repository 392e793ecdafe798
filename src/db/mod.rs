use crate::config::{BootstrapConfig, Config, SecurityConfig};
use crate::domain::{AssetId, MaintenanceStatus, Role, UserId};
use crate::entities::{asset_users, assets, repair_records};
use crate::models::{AssetFilter, AssetPatch, NewAsset, NewAssignment, NewRepair, User};
use anyhow::Result;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, QueryResult, Statement,
    TransactionTrait, Value,
};
use std::path::Path;
use std::time::Duration;
use tracing::{error, info, warn};

pub mod migrator;
pub mod repositories;

/// Owns the connection pool and schema lifecycle.
///
/// Typed access goes through the repositories; the raw `execute` /
/// `query_all` / `query_one` primitives never return errors and signal
/// failure only through `false`, an empty vector or `None`.
#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 1, 1).await
    }

    /// Connects, applies migrations and seeds the bootstrap admin.
    pub async fn open(config: &Config) -> Result<Self> {
        let store = Self::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        store
            .seed_admin_if_empty(&config.bootstrap, &config.security)
            .await?;

        Ok(store)
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite://").trim_start_matches("sqlite:");
            let path_str = path_str.split('?').next().unwrap_or(path_str);
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        let store = Self { conn };

        if !store.foreign_keys_enabled().await {
            // PRAGMA foreign_keys is ignored inside a transaction, so it cannot
            // go through `execute`.
            warn!("SQLite foreign key enforcement is off; enabling it");
            store.conn.execute_unprepared("PRAGMA foreign_keys = ON").await?;
        }

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(store)
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    /// Runs a mutating statement inside its own transaction.
    ///
    /// Commits on success. On any failure the transaction is rolled back,
    /// the error is logged and `false` is returned.
    pub async fn execute<I>(&self, sql: &str, params: I) -> bool
    where
        I: IntoIterator<Item = Value>,
    {
        let backend = self.conn.get_database_backend();
        let stmt = Statement::from_sql_and_values(backend, sql, params);

        let txn = match self.conn.begin().await {
            Ok(txn) => txn,
            Err(e) => {
                error!(error = %e, "Failed to open transaction");
                return false;
            }
        };

        match txn.execute(stmt).await {
            Ok(_) => match txn.commit().await {
                Ok(()) => true,
                Err(e) => {
                    error!(error = %e, sql, "Commit failed");
                    false
                }
            },
            Err(e) => {
                error!(error = %e, sql, "Statement failed, rolling back");
                if let Err(e) = txn.rollback().await {
                    error!(error = %e, "Rollback failed");
                }
                false
            }
        }
    }

    /// Returns every row of a query, or an empty vector if it fails.
    pub async fn query_all<I>(&self, sql: &str, params: I) -> Vec<QueryResult>
    where
        I: IntoIterator<Item = Value>,
    {
        let backend = self.conn.get_database_backend();
        let stmt = Statement::from_sql_and_values(backend, sql, params);

        self.conn.query_all(stmt).await.unwrap_or_else(|e| {
            error!(error = %e, sql, "Query failed");
            Vec::new()
        })
    }

    /// Returns the first row of a query, or `None` if it is empty or fails.
    pub async fn query_one<I>(&self, sql: &str, params: I) -> Option<QueryResult>
    where
        I: IntoIterator<Item = Value>,
    {
        let backend = self.conn.get_database_backend();
        let stmt = Statement::from_sql_and_values(backend, sql, params);

        self.conn.query_one(stmt).await.unwrap_or_else(|e| {
            error!(error = %e, sql, "Query failed");
            None
        })
    }

    pub async fn foreign_keys_enabled(&self) -> bool {
        self.query_one("PRAGMA foreign_keys", [])
            .await
            .and_then(|row| row.try_get_by_index::<i32>(0).ok())
            .is_some_and(|v| v == 1)
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn asset_repo(&self) -> repositories::asset::AssetRepository {
        repositories::asset::AssetRepository::new(self.conn.clone())
    }

    fn assignment_repo(&self) -> repositories::assignment::AssignmentRepository {
        repositories::assignment::AssignmentRepository::new(self.conn.clone())
    }

    fn repair_repo(&self) -> repositories::repair::RepairRepository {
        repositories::repair::RepairRepository::new(self.conn.clone())
    }

    // ========== User Repository Methods ==========

    pub async fn seed_admin_if_empty(
        &self,
        bootstrap: &BootstrapConfig,
        security: &SecurityConfig,
    ) -> Result<bool> {
        self.user_repo().seed_admin_if_empty(bootstrap, security).await
    }

    pub async fn count_users(&self) -> Result<u64> {
        self.user_repo().count().await
    }

    pub async fn get_user(&self, id: UserId) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.user_repo().get_by_username(username).await
    }

    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.user_repo().list_all().await
    }

    pub async fn create_user(
        &self,
        username: &str,
        password: &str,
        role: Role,
        security: &SecurityConfig,
    ) -> Result<User> {
        self.user_repo()
            .create(username, password, role, security)
            .await
    }

    pub async fn verify_user_password(&self, username: &str, password: &str) -> Result<bool> {
        self.user_repo().verify_password(username, password).await
    }

    pub async fn update_user_password(
        &self,
        id: UserId,
        new_password: &str,
        security: &SecurityConfig,
    ) -> Result<()> {
        self.user_repo()
            .update_password(id, new_password, security)
            .await
    }

    pub async fn update_user_role(&self, id: UserId, role: Role) -> Result<bool> {
        self.user_repo().update_role(id, role).await
    }

    pub async fn delete_user(&self, id: UserId) -> Result<bool> {
        self.user_repo().delete(id).await
    }

    // ========== Asset Repository Methods ==========

    pub async fn get_asset(&self, id: AssetId) -> Result<Option<assets::Model>> {
        self.asset_repo().get(id).await
    }

    pub async fn get_asset_by_number(&self, asset_number: &str) -> Result<Option<assets::Model>> {
        self.asset_repo().get_by_number(asset_number).await
    }

    pub async fn asset_number_exists(&self, asset_number: &str) -> Result<bool> {
        self.asset_repo().exists_by_number(asset_number).await
    }

    pub async fn insert_asset(&self, asset: &NewAsset, created_by: UserId) -> Result<AssetId> {
        self.asset_repo().insert(asset, created_by).await
    }

    pub async fn update_asset(
        &self,
        id: AssetId,
        patch: &AssetPatch,
    ) -> Result<Option<assets::Model>> {
        self.asset_repo().update(id, patch).await
    }

    pub async fn delete_asset(&self, id: AssetId) -> Result<bool> {
        self.asset_repo().delete(id).await
    }

    pub async fn list_assets(&self, filter: &AssetFilter) -> Result<Vec<assets::Model>> {
        self.asset_repo().list(filter).await
    }

    // ========== Assignment Repository Methods ==========

    pub async fn add_assignment(
        &self,
        asset_id: AssetId,
        assignment: &NewAssignment,
    ) -> Result<asset_users::Model> {
        self.assignment_repo().add(asset_id, assignment).await
    }

    pub async fn close_assignment(&self, assignment_id: i32, end_date: &str) -> Result<bool> {
        self.assignment_repo().close(assignment_id, end_date).await
    }

    pub async fn get_assignments(&self, asset_id: AssetId) -> Result<Vec<asset_users::Model>> {
        self.assignment_repo().list_for_asset(asset_id).await
    }

    // ========== Repair Repository Methods ==========

    pub async fn record_repair(
        &self,
        asset_id: AssetId,
        repair: &NewRepair,
        created_by: UserId,
    ) -> Result<(repair_records::Model, MaintenanceStatus)> {
        self.repair_repo()
            .record_and_derive_status(asset_id, repair, created_by)
            .await
    }

    pub async fn get_repairs(&self, asset_id: AssetId) -> Result<Vec<repair_records::Model>> {
        self.repair_repo().list_for_asset(asset_id).await
    }
}
