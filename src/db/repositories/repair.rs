use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use tracing::debug;

use crate::domain::{AssetId, MaintenanceStatus, UserId};
use crate::entities::{assets, prelude::*, repair_records};
use crate::models::NewRepair;

pub struct RepairRepository {
    conn: DatabaseConnection,
}

impl RepairRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Inserts the repair and sets the asset's status from its result in a
    /// single transaction.
    ///
    /// `updated_at` on the asset is left untouched.
    pub async fn record_and_derive_status(
        &self,
        asset_id: AssetId,
        repair: &NewRepair,
        created_by: UserId,
    ) -> Result<(repair_records::Model, MaintenanceStatus)> {
        let status = MaintenanceStatus::from_repair_result(&repair.repair_result);
        let txn = self.conn.begin().await?;

        let record = repair_records::ActiveModel {
            asset_id: Set(asset_id.value()),
            repair_date: Set(repair.repair_date.clone()),
            fault_cause: Set(repair.fault_cause.clone()),
            repair_result: Set(repair.repair_result.clone()),
            created_by: Set(Some(created_by.value())),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .with_context(|| format!("Failed to insert repair for asset {asset_id}"))?;

        Assets::update_many()
            .col_expr(
                assets::Column::MaintenanceStatus,
                sea_orm::sea_query::Expr::value(status.as_str()),
            )
            .filter(assets::Column::Id.eq(asset_id.value()))
            .exec(&txn)
            .await
            .context("Failed to update maintenance status")?;

        txn.commit().await?;

        debug!(asset_id = %asset_id, status = %status, "Repair recorded");
        Ok((record, status))
    }

    /// Newest repair date first; ties broken by newest record.
    pub async fn list_for_asset(&self, asset_id: AssetId) -> Result<Vec<repair_records::Model>> {
        RepairRecords::find()
            .filter(repair_records::Column::AssetId.eq(asset_id.value()))
            .order_by_desc(repair_records::Column::RepairDate)
            .order_by_desc(repair_records::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list repairs")
    }
}
