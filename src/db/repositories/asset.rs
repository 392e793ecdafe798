use anyhow::{Context, Result};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Select, Set,
};

use crate::domain::{AssetId, UserId};
use crate::entities::{assets, prelude::*};
use crate::models::{AssetFilter, AssetPatch, FilterField, NewAsset};

pub struct AssetRepository {
    conn: DatabaseConnection,
}

impl AssetRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get(&self, id: AssetId) -> Result<Option<assets::Model>> {
        Assets::find_by_id(id.value())
            .one(&self.conn)
            .await
            .context("Failed to query asset by ID")
    }

    pub async fn get_by_number(&self, asset_number: &str) -> Result<Option<assets::Model>> {
        Assets::find()
            .filter(assets::Column::AssetNumber.eq(asset_number))
            .one(&self.conn)
            .await
            .context("Failed to query asset by number")
    }

    pub async fn exists_by_number(&self, asset_number: &str) -> Result<bool> {
        let count = Assets::find()
            .filter(assets::Column::AssetNumber.eq(asset_number))
            .count(&self.conn)
            .await
            .context("Failed to check asset number")?;

        Ok(count > 0)
    }

    pub async fn insert(&self, asset: &NewAsset, created_by: UserId) -> Result<AssetId> {
        let now = chrono::Utc::now().to_rfc3339();

        let model = assets::ActiveModel {
            asset_number: Set(asset.asset_number.clone()),
            name: Set(asset.name.clone()),
            quantity: Set(asset.quantity),
            category: Set(asset.category.clone()),
            brand_spec: Set(asset.brand_spec.clone()),
            purchase_date: Set(asset.purchase_date.clone()),
            image_path: Set(asset.image_path.clone()),
            location: Set(asset.location.clone()),
            notes: Set(asset.notes.clone()),
            maintenance_status: Set(asset.maintenance_status.as_str().to_string()),
            created_by: Set(Some(created_by.value())),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .with_context(|| format!("Failed to insert asset {}", asset.asset_number))?;

        Ok(AssetId::new(model.id))
    }

    /// Applies `patch` and refreshes `updated_at`. Returns `None` if the
    /// asset does not exist.
    pub async fn update(&self, id: AssetId, patch: &AssetPatch) -> Result<Option<assets::Model>> {
        let Some(existing) = self.get(id).await? else {
            return Ok(None);
        };

        let mut active: assets::ActiveModel = existing.into();

        if let Some(name) = &patch.name {
            active.name = Set(name.clone());
        }
        if let Some(quantity) = patch.quantity {
            active.quantity = Set(quantity);
        }
        if let Some(category) = &patch.category {
            active.category = Set(category.clone());
        }
        if let Some(brand_spec) = &patch.brand_spec {
            active.brand_spec = Set(brand_spec.clone());
        }
        if let Some(purchase_date) = &patch.purchase_date {
            active.purchase_date = Set(purchase_date.clone());
        }
        if let Some(image_path) = &patch.image_path {
            active.image_path = Set(image_path.clone());
        }
        if let Some(location) = &patch.location {
            active.location = Set(location.clone());
        }
        if let Some(notes) = &patch.notes {
            active.notes = Set(notes.clone());
        }
        if let Some(status) = patch.maintenance_status {
            active.maintenance_status = Set(status.as_str().to_string());
        }
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let model = active
            .update(&self.conn)
            .await
            .with_context(|| format!("Failed to update asset {id}"))?;

        Ok(Some(model))
    }

    /// Assignments and repairs go with the asset through `ON DELETE CASCADE`.
    pub async fn delete(&self, id: AssetId) -> Result<bool> {
        let result = Assets::delete_by_id(id.value())
            .exec(&self.conn)
            .await
            .context("Failed to delete asset")?;

        Ok(result.rows_affected > 0)
    }

    /// Every term is a substring match; all terms must hold. Ordered by
    /// business key.
    pub async fn list(&self, filter: &AssetFilter) -> Result<Vec<assets::Model>> {
        Self::filtered(filter)
            .order_by_asc(assets::Column::AssetNumber)
            .all(&self.conn)
            .await
            .context("Failed to list assets")
    }

    fn filtered(filter: &AssetFilter) -> Select<Assets> {
        filter
            .iter()
            .fold(Assets::find(), |query, (field, value)| match field {
                FilterField::Keyword => query.filter(Expr::cust_with_values(
                    "(asset_id || name || brand_spec || location) LIKE ?",
                    [format!("%{value}%")],
                )),
                FilterField::AssetNumber => {
                    query.filter(assets::Column::AssetNumber.contains(value))
                }
                FilterField::Name => query.filter(assets::Column::Name.contains(value)),
                FilterField::Category => query.filter(assets::Column::Category.contains(value)),
                FilterField::BrandSpec => query.filter(assets::Column::BrandSpec.contains(value)),
                FilterField::Location => query.filter(assets::Column::Location.contains(value)),
                FilterField::Notes => query.filter(assets::Column::Notes.contains(value)),
                FilterField::MaintenanceStatus => {
                    query.filter(assets::Column::MaintenanceStatus.contains(value))
                }
            })
    }
}
