//! `SeaORM` implementation of the `AssetService` trait.

use crate::constants::assets::CATEGORIES;
use crate::db::Store;
use crate::domain::{AssetId, MaintenanceStatus, UserId, is_known_category};
use crate::entities::assets;
use crate::models::{
    Asset, AssetDetails, AssetFilter, AssetPatch, Assignment, NewAsset, NewAssignment, NewRepair,
    RepairRecord,
};
use crate::services::asset_service::{AssetError, AssetService};
use async_trait::async_trait;
use tracing::{debug, info};

pub struct SeaOrmAssetService {
    store: Store,
}

impl SeaOrmAssetService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    /// Fetches both histories concurrently.
    async fn load_details(&self, model: assets::Model) -> Result<AssetDetails, AssetError> {
        let id = AssetId::new(model.id);
        let (assignments, repairs) =
            tokio::try_join!(self.store.get_assignments(id), self.store.get_repairs(id))?;

        Ok(AssetDetails {
            asset: Asset::from(model),
            assignments: assignments.into_iter().map(Assignment::from).collect(),
            repairs: repairs.into_iter().map(RepairRecord::from).collect(),
        })
    }

    async fn ensure_exists(&self, id: AssetId) -> Result<(), AssetError> {
        if self.store.get_asset(id).await?.is_none() {
            return Err(AssetError::NotFound(id));
        }
        Ok(())
    }
}

fn validate_quantity(quantity: i32) -> Result<(), AssetError> {
    if quantity < 1 {
        return Err(AssetError::Validation(format!(
            "Quantity must be at least 1, got {quantity}"
        )));
    }
    Ok(())
}

fn validate_category(category: &str) -> Result<(), AssetError> {
    if !is_known_category(category) {
        return Err(AssetError::Validation(format!(
            "Unknown category: {category}"
        )));
    }
    Ok(())
}

#[async_trait]
impl AssetService for SeaOrmAssetService {
    async fn find_by_id(&self, id: AssetId) -> Result<Option<AssetDetails>, AssetError> {
        match self.store.get_asset(id).await? {
            Some(model) => Ok(Some(self.load_details(model).await?)),
            None => Ok(None),
        }
    }

    async fn find_by_number(
        &self,
        asset_number: &str,
    ) -> Result<Option<AssetDetails>, AssetError> {
        match self.store.get_asset_by_number(asset_number.trim()).await? {
            Some(model) => Ok(Some(self.load_details(model).await?)),
            None => Ok(None),
        }
    }

    async fn create(
        &self,
        mut asset: NewAsset,
        created_by: UserId,
    ) -> Result<AssetId, AssetError> {
        asset.asset_number = asset.asset_number.trim().to_string();
        if asset.asset_number.is_empty() {
            return Err(AssetError::Validation(
                "Asset number must not be empty".to_string(),
            ));
        }
        validate_quantity(asset.quantity)?;
        validate_category(&asset.category)?;

        if self.store.asset_number_exists(&asset.asset_number).await? {
            return Err(AssetError::DuplicateKey(asset.asset_number));
        }

        let id = self.store.insert_asset(&asset, created_by).await?;

        metrics::counter!("assets_created_total").increment(1);
        info!(asset_id = %id, asset_number = %asset.asset_number, "Asset created");
        Ok(id)
    }

    async fn update(&self, id: AssetId, patch: AssetPatch) -> Result<Asset, AssetError> {
        if let Some(quantity) = patch.quantity {
            validate_quantity(quantity)?;
        }
        if let Some(category) = &patch.category {
            validate_category(category)?;
        }

        let model = self
            .store
            .update_asset(id, &patch)
            .await?
            .ok_or(AssetError::NotFound(id))?;

        debug!(asset_id = %id, "Asset updated");
        Ok(Asset::from(model))
    }

    async fn delete(&self, id: AssetId) -> Result<(), AssetError> {
        if !self.store.delete_asset(id).await? {
            return Err(AssetError::NotFound(id));
        }

        info!(asset_id = %id, "Asset deleted");
        Ok(())
    }

    async fn add_assignment(
        &self,
        asset_id: AssetId,
        assignment: NewAssignment,
    ) -> Result<Assignment, AssetError> {
        self.ensure_exists(asset_id).await?;

        let model = self.store.add_assignment(asset_id, &assignment).await?;
        Ok(Assignment::from(model))
    }

    async fn close_assignment(
        &self,
        assignment_id: i32,
        end_date: &str,
    ) -> Result<(), AssetError> {
        if !self.store.close_assignment(assignment_id, end_date).await? {
            return Err(AssetError::AssignmentNotFound(assignment_id));
        }
        Ok(())
    }

    async fn record_repair(
        &self,
        asset_id: AssetId,
        repair: NewRepair,
        created_by: UserId,
    ) -> Result<(RepairRecord, MaintenanceStatus), AssetError> {
        self.ensure_exists(asset_id).await?;

        let (record, status) = self
            .store
            .record_repair(asset_id, &repair, created_by)
            .await?;

        metrics::counter!("repairs_recorded_total").increment(1);
        info!(asset_id = %asset_id, status = %status, "Repair recorded");
        Ok((RepairRecord::from(record), status))
    }

    async fn list(&self, filter: &AssetFilter) -> Result<Vec<Asset>, AssetError> {
        let rows = self.store.list_assets(filter).await?;
        Ok(rows.into_iter().map(Asset::from).collect())
    }

    fn categories(&self) -> &'static [&'static str] {
        CATEGORIES
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantity_must_be_positive() {
        assert!(validate_quantity(1).is_ok());
        assert!(matches!(
            validate_quantity(0),
            Err(AssetError::Validation(_))
        ));
        assert!(validate_quantity(-3).is_err());
    }

    #[test]
    fn category_must_be_listed() {
        assert!(validate_category("电脑显示屏").is_ok());
        assert!(validate_category("Monitor").is_err());
    }
}
