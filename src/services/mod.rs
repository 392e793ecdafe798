pub mod asset_service;
pub use asset_service::{AssetError, AssetService};

pub mod asset_service_impl;
pub use asset_service_impl::SeaOrmAssetService;

pub mod auth_service;
pub use auth_service::{AuthError, AuthService};

pub mod auth_service_impl;
pub use auth_service_impl::SeaOrmAuthService;

pub mod outcome;
pub use outcome::Outcome;

pub mod policy;
pub use policy::{AccessDenied, Actor, Permission};

pub mod sheet;

pub mod transfer;
pub use transfer::{
    ExportSummary, ImportSummary, RowOutcome, RowReport, TransferError, TransferService,
};
