//! CLI module - Command-line interface for AssetDesk
//!
//! A thin front end: every command calls one service operation and prints
//! the resulting message.

mod commands;

use crate::domain::{MaintenanceStatus, Role};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// AssetDesk - equipment register
/// Tracks assets, who holds them and their repair history
#[derive(Parser)]
#[command(name = "assetdesk")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Account to act as
    #[arg(short, long, global = true, env = "ASSETDESK_USER")]
    pub user: Option<String>,

    /// Password of the acting account
    #[arg(short, long, global = true, env = "ASSETDESK_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Read configuration from this file instead of the default locations
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the default config file and initialize the database
    #[command(alias = "--init")]
    Init,

    /// List the asset categories
    Categories,

    /// Manage assets
    #[command(alias = "a")]
    Asset {
        #[command(subcommand)]
        command: AssetCommands,
    },

    /// Manage user accounts
    #[command(alias = "u")]
    User {
        #[command(subcommand)]
        command: UserCommands,
    },

    /// Export assets to a CSV file
    Export {
        /// Destination file
        path: PathBuf,
        /// Filter as field=value (repeatable)
        #[arg(short, long = "filter")]
        filters: Vec<String>,
    },

    /// Import assets from a CSV file
    Import {
        /// Source file
        path: PathBuf,
    },
}

#[derive(Subcommand)]
pub enum AssetCommands {
    /// List assets, optionally filtered
    #[command(alias = "ls")]
    List {
        /// Filter as field=value (repeatable), e.g. -f q=thinkpad -f category=鼠标
        #[arg(short, long = "filter")]
        filters: Vec<String>,
    },

    /// Show an asset with its assignment and repair history
    Show {
        /// Asset number
        asset_number: String,
    },

    /// Register a new asset
    Add {
        /// Asset number (unique)
        asset_number: String,
        /// Equipment name
        name: String,
        /// Category (see `assetdesk categories`)
        category: String,
        #[arg(long, default_value_t = 1)]
        quantity: i32,
        #[arg(long)]
        brand_spec: Option<String>,
        #[arg(long)]
        purchase_date: Option<String>,
        #[arg(long)]
        image_path: Option<String>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        notes: Option<String>,
        #[arg(long)]
        status: Option<MaintenanceStatus>,
    },

    /// Change fields of an existing asset
    Edit {
        /// Asset ID
        id: i32,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        quantity: Option<i32>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        brand_spec: Option<String>,
        #[arg(long, conflicts_with = "clear_purchase_date")]
        purchase_date: Option<String>,
        /// Remove the purchase date
        #[arg(long)]
        clear_purchase_date: bool,
        #[arg(long)]
        image_path: Option<String>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        notes: Option<String>,
        #[arg(long)]
        status: Option<MaintenanceStatus>,
    },

    /// Delete an asset and its history
    #[command(alias = "rm")]
    Remove {
        /// Asset ID
        id: i32,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Hand an asset to someone
    Assign {
        /// Asset ID
        id: i32,
        /// Name of the holder
        user_name: String,
        /// Start date (defaults to today)
        #[arg(long)]
        start: Option<String>,
        /// End date, for recording a past assignment
        #[arg(long)]
        end: Option<String>,
    },

    /// Close an assignment
    Return {
        /// Assignment ID
        assignment_id: i32,
        /// End date (defaults to today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Record a repair; the asset status follows the result
    Repair {
        /// Asset ID
        id: i32,
        /// Repair date (defaults to today)
        #[arg(long)]
        date: Option<String>,
        #[arg(long, default_value = "")]
        fault: String,
        /// Result text; containing 已修复 marks the asset as repaired
        #[arg(long, default_value = "")]
        result: String,
    },
}

#[derive(Subcommand)]
pub enum UserCommands {
    /// Create an account
    Register {
        username: String,
        password: String,
        /// Role of the new account; anything but `user` requires an admin
        #[arg(long, default_value = "user")]
        role: Role,
    },

    /// List all accounts (admin)
    #[command(alias = "ls")]
    List,

    /// Change the role of an account (admin)
    Role {
        /// User ID
        user_id: i32,
        role: Role,
    },

    /// Delete an account (admin)
    #[command(alias = "rm")]
    Remove {
        /// User ID
        user_id: i32,
    },

    /// Change your own password
    Passwd {
        old_password: String,
        new_password: String,
    },
}

pub use commands::*;
