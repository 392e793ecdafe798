pub mod prelude;

pub mod asset_users;
pub mod assets;
pub mod repair_records;
pub mod users;
