pub use super::asset_users::Entity as AssetUsers;
pub use super::assets::Entity as Assets;
pub use super::repair_records::Entity as RepairRecords;
pub use super::users::Entity as Users;
