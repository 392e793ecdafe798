use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::domain::AssetId;
use crate::entities::{asset_users, prelude::*};
use crate::models::NewAssignment;

pub struct AssignmentRepository {
    conn: DatabaseConnection,
}

impl AssignmentRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Fails with a foreign key violation if the asset does not exist.
    pub async fn add(
        &self,
        asset_id: AssetId,
        assignment: &NewAssignment,
    ) -> Result<asset_users::Model> {
        asset_users::ActiveModel {
            asset_id: Set(asset_id.value()),
            user_name: Set(assignment.user_name.clone()),
            start_date: Set(assignment.start_date.clone()),
            end_date: Set(assignment.end_date.clone()),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .with_context(|| format!("Failed to add assignment to asset {asset_id}"))
    }

    /// Sets the end date. Returns `false` only when the assignment does not
    /// exist; closing an already closed assignment overwrites its end date.
    pub async fn close(&self, assignment_id: i32, end_date: &str) -> Result<bool> {
        let Some(existing) = AssetUsers::find_by_id(assignment_id)
            .one(&self.conn)
            .await
            .context("Failed to query assignment")?
        else {
            return Ok(false);
        };

        let mut active: asset_users::ActiveModel = existing.into();
        active.end_date = Set(Some(end_date.to_string()));
        active
            .update(&self.conn)
            .await
            .with_context(|| format!("Failed to close assignment {assignment_id}"))?;

        Ok(true)
    }

    /// In recording order.
    pub async fn list_for_asset(&self, asset_id: AssetId) -> Result<Vec<asset_users::Model>> {
        AssetUsers::find()
            .filter(asset_users::Column::AssetId.eq(asset_id.value()))
            .order_by_asc(asset_users::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list assignments")
    }
}
