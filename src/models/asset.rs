use crate::constants::assets::DEFAULT_QUANTITY;
use crate::domain::{AssetId, MaintenanceStatus, UserId};
use crate::entities::{asset_users, assets, repair_records};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Asset {
    pub id: AssetId,
    /// Business key (`asset_id` column).
    pub asset_number: String,
    pub name: String,
    pub quantity: i32,
    pub category: String,
    pub brand_spec: String,
    pub purchase_date: Option<String>,
    pub image_path: String,
    pub location: String,
    pub notes: String,
    pub maintenance_status: MaintenanceStatus,
    pub created_by: Option<UserId>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<assets::Model> for Asset {
    fn from(model: assets::Model) -> Self {
        Self {
            id: AssetId::new(model.id),
            asset_number: model.asset_number,
            name: model.name,
            quantity: model.quantity,
            category: model.category,
            brand_spec: model.brand_spec,
            purchase_date: model.purchase_date,
            image_path: model.image_path,
            location: model.location,
            notes: model.notes,
            maintenance_status: model.maintenance_status.parse().unwrap_or_default(),
            created_by: model.created_by.map(UserId::new),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Input for registering a new asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAsset {
    pub asset_number: String,
    pub name: String,
    pub quantity: i32,
    pub category: String,
    pub brand_spec: String,
    pub purchase_date: Option<String>,
    pub image_path: String,
    pub location: String,
    pub notes: String,
    pub maintenance_status: MaintenanceStatus,
}

impl NewAsset {
    /// Builds an asset with the required fields; everything else defaults
    /// to blank, quantity 1 and status normal.
    pub fn new(
        asset_number: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            asset_number: asset_number.into(),
            name: name.into(),
            quantity: DEFAULT_QUANTITY,
            category: category.into(),
            brand_spec: String::new(),
            purchase_date: None,
            image_path: String::new(),
            location: String::new(),
            notes: String::new(),
            maintenance_status: MaintenanceStatus::Normal,
        }
    }
}

/// Field changes for an existing asset. `None` keeps the stored value.
///
/// There is no business key field; it is fixed once the asset exists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetPatch {
    pub name: Option<String>,
    pub quantity: Option<i32>,
    pub category: Option<String>,
    pub brand_spec: Option<String>,
    pub purchase_date: Option<Option<String>>,
    pub image_path: Option<String>,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub maintenance_status: Option<MaintenanceStatus>,
}

impl AssetPatch {
    /// A patch that overwrites every mutable field with the values of `asset`.
    #[must_use]
    pub fn overwrite_from(asset: &Asset) -> Self {
        Self {
            name: Some(asset.name.clone()),
            quantity: Some(asset.quantity),
            category: Some(asset.category.clone()),
            brand_spec: Some(asset.brand_spec.clone()),
            purchase_date: Some(asset.purchase_date.clone()),
            image_path: Some(asset.image_path.clone()),
            location: Some(asset.location.clone()),
            notes: Some(asset.notes.clone()),
            maintenance_status: Some(asset.maintenance_status),
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.quantity.is_none()
            && self.category.is_none()
            && self.brand_spec.is_none()
            && self.purchase_date.is_none()
            && self.image_path.is_none()
            && self.location.is_none()
            && self.notes.is_none()
            && self.maintenance_status.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assignment {
    pub id: i32,
    pub asset_id: AssetId,
    pub user_name: String,
    pub start_date: String,
    pub end_date: Option<String>,
}

impl Assignment {
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.end_date.is_none()
    }
}

impl From<asset_users::Model> for Assignment {
    fn from(model: asset_users::Model) -> Self {
        Self {
            id: model.id,
            asset_id: AssetId::new(model.asset_id),
            user_name: model.user_name,
            start_date: model.start_date,
            end_date: model.end_date,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAssignment {
    pub user_name: String,
    pub start_date: String,
    pub end_date: Option<String>,
}

impl NewAssignment {
    pub fn open(user_name: impl Into<String>, start_date: impl Into<String>) -> Self {
        Self {
            user_name: user_name.into(),
            start_date: start_date.into(),
            end_date: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepairRecord {
    pub id: i32,
    pub asset_id: AssetId,
    pub repair_date: String,
    pub fault_cause: String,
    pub repair_result: String,
    pub created_by: Option<UserId>,
    pub created_at: String,
}

impl From<repair_records::Model> for RepairRecord {
    fn from(model: repair_records::Model) -> Self {
        Self {
            id: model.id,
            asset_id: AssetId::new(model.asset_id),
            repair_date: model.repair_date,
            fault_cause: model.fault_cause,
            repair_result: model.repair_result,
            created_by: model.created_by.map(UserId::new),
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRepair {
    pub repair_date: String,
    pub fault_cause: String,
    pub repair_result: String,
}

impl NewRepair {
    pub fn new(
        repair_date: impl Into<String>,
        fault_cause: impl Into<String>,
        repair_result: impl Into<String>,
    ) -> Self {
        Self {
            repair_date: repair_date.into(),
            fault_cause: fault_cause.into(),
            repair_result: repair_result.into(),
        }
    }
}

/// An asset loaded together with its history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetDetails {
    pub asset: Asset,
    /// In recording order.
    pub assignments: Vec<Assignment>,
    /// Newest repair date first.
    pub repairs: Vec<RepairRecord>,
}

impl AssetDetails {
    pub fn active_assignments(&self) -> impl Iterator<Item = &Assignment> {
        self.assignments.iter().filter(|a| a.is_active())
    }
}
