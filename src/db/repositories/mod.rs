pub mod asset;
pub mod assignment;
pub mod repair;
pub mod user;
