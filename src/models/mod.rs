pub mod asset;
pub mod filter;
pub mod user;

pub use asset::{
    Asset, AssetDetails, AssetPatch, Assignment, NewAsset, NewAssignment, NewRepair, RepairRecord,
};
pub use filter::{AssetFilter, FilterField};
pub use user::User;
