//! Domain service for the asset register.
//!
//! Creation and update are separate operations: `create` never touches an
//! existing row and `update` never inserts one.

use crate::domain::{AssetId, MaintenanceStatus, UserId};
use crate::models::{
    Asset, AssetDetails, AssetFilter, AssetPatch, Assignment, NewAsset, NewAssignment, NewRepair,
    RepairRecord,
};
use thiserror::Error;

/// Domain errors for asset operations.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("Asset number already exists: {0}")]
    DuplicateKey(String),

    #[error("Asset not found: {0}")]
    NotFound(AssetId),

    #[error("Assignment not found: {0}")]
    AssignmentNotFound(i32),

    #[error("Invalid asset data: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for AssetError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AssetError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(format!("{err:#}"))
    }
}

/// Domain service trait for asset operations.
///
/// # Examples
///
/// ```rust,ignore
/// use assetdesk::models::NewAsset;
/// use assetdesk::services::{AssetError, AssetService};
/// use std::sync::Arc;
///
/// async fn example(service: Arc<dyn AssetService>, user: UserId) -> Result<(), AssetError> {
///     let id = service.create(NewAsset::new("A100", "Laptop", "笔记本电脑"), user).await?;
///     let details = service.find_by_id(id).await?;
///     assert!(details.is_some());
///     Ok(())
/// }
/// ```
#[async_trait::async_trait]
pub trait AssetService: Send + Sync {
    /// Loads an asset with its assignments (recording order) and repairs
    /// (newest repair date first).
    async fn find_by_id(&self, id: AssetId) -> Result<Option<AssetDetails>, AssetError>;

    /// Same as [`AssetService::find_by_id`], keyed by asset number.
    async fn find_by_number(&self, asset_number: &str)
    -> Result<Option<AssetDetails>, AssetError>;

    /// Registers a new asset.
    ///
    /// # Errors
    ///
    /// - Returns [`AssetError::DuplicateKey`] if the asset number is taken
    /// - Returns [`AssetError::Validation`] for a blank asset number, a
    ///   quantity below one or an unknown category
    async fn create(&self, asset: NewAsset, created_by: UserId) -> Result<AssetId, AssetError>;

    /// Overwrites the patched fields and refreshes `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`AssetError::NotFound`] if the asset does not exist.
    async fn update(&self, id: AssetId, patch: AssetPatch) -> Result<Asset, AssetError>;

    /// Deletes an asset together with its assignment and repair history.
    async fn delete(&self, id: AssetId) -> Result<(), AssetError>;

    async fn add_assignment(
        &self,
        asset_id: AssetId,
        assignment: NewAssignment,
    ) -> Result<Assignment, AssetError>;

    /// Sets the end date of an assignment. Closing a closed assignment
    /// succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`AssetError::AssignmentNotFound`] for an unknown id.
    async fn close_assignment(&self, assignment_id: i32, end_date: &str)
    -> Result<(), AssetError>;

    /// Appends a repair and re-derives the asset's maintenance status from
    /// its result, atomically.
    async fn record_repair(
        &self,
        asset_id: AssetId,
        repair: NewRepair,
        created_by: UserId,
    ) -> Result<(RepairRecord, MaintenanceStatus), AssetError>;

    /// Assets matching every term of `filter`, ordered by asset number.
    async fn list(&self, filter: &AssetFilter) -> Result<Vec<Asset>, AssetError>;

    fn categories(&self) -> &'static [&'static str];
}
