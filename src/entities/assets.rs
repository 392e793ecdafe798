use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "assets")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Business key, assigned by people and immutable once created.
    #[sea_orm(column_name = "asset_id", unique)]
    pub asset_number: String,
    pub name: String,
    pub quantity: i32,
    pub category: String,
    pub brand_spec: String,
    pub purchase_date: Option<String>,
    pub image_path: String,
    pub location: String,
    pub notes: String,
    pub maintenance_status: String,
    pub created_by: Option<i32>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::CreatedBy",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Users,
    #[sea_orm(has_many = "super::asset_users::Entity")]
    AssetUsers,
    #[sea_orm(has_many = "super::repair_records::Entity")]
    RepairRecords,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::asset_users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AssetUsers.def()
    }
}

impl Related<super::repair_records::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RepairRecords.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
