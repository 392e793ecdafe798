mod asset;
mod setup;
mod transfer;
mod user;

pub use asset::{
    cmd_asset_add, cmd_asset_assign, cmd_asset_edit, cmd_asset_list, cmd_asset_remove,
    cmd_asset_repair, cmd_asset_return, cmd_asset_show,
};
pub use setup::{cmd_categories, cmd_init};
pub use transfer::{cmd_export, cmd_import};
pub use user::{cmd_user_list, cmd_user_passwd, cmd_user_register, cmd_user_remove, cmd_user_role};

use crate::services::Outcome;

/// Prints an outcome the way every command reports its result.
fn report(outcome: &Outcome) {
    if outcome.success {
        println!("✓ {}", outcome.message);
    } else {
        println!("✗ {}", outcome.message);
    }
}

fn today() -> String {
    chrono::Local::now().date_naive().to_string()
}
