pub mod cli;
pub mod config;
pub mod constants;
pub mod db;
pub mod domain;
pub mod entities;
pub mod models;
pub mod services;
pub mod state;

use anyhow::Context;
use clap::Parser;
use cli::{AssetCommands, Cli, Commands, UserCommands};
pub use config::Config;
use models::{AssetPatch, NewAsset};
use services::Actor;
use state::AppState;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

pub async fn run() -> anyhow::Result<()> {
    let args = Cli::parse();

    let config = match &args.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };
    config.validate()?;

    init_tracing(&config);

    dispatch(args, config).await
}

fn init_tracing(config: &Config) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    // Command output goes to stdout, so logs stay on stderr.
    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let registry = tracing_subscriber::registry().with(env_filter);

    if config.general.log_format.eq_ignore_ascii_case("json") {
        registry.with(fmt_layer.json()).init();
    } else {
        registry.with(fmt_layer).init();
    }
}

/// Authenticates with the global `--user`/`--password` arguments.
async fn login(state: &AppState, args: &Cli) -> anyhow::Result<Actor> {
    let (Some(username), Some(password)) = (args.user.as_deref(), args.password.as_deref()) else {
        anyhow::bail!(
            "This command requires credentials: pass --user and --password \
             or set ASSETDESK_USER and ASSETDESK_PASSWORD"
        );
    };

    let user = state
        .auth
        .authenticate(username, password)
        .await
        .context("Login failed")?;

    if user.must_change_password {
        warn!(username = %user.username, "Initial password still in use");
        println!("! Please change your password with `assetdesk user passwd`.");
    }

    debug!(username = %user.username, role = %user.role, "Authenticated");
    Ok(Actor::from(user))
}

#[allow(clippy::too_many_lines)]
async fn dispatch(args: Cli, config: Config) -> anyhow::Result<()> {
    match &args.command {
        Commands::Init => return cli::cmd_init(config).await,
        Commands::Categories => {
            cli::cmd_categories();
            return Ok(());
        }
        _ => {}
    }

    let state = AppState::new(config).await?;

    match &args.command {
        Commands::Init | Commands::Categories => Ok(()),

        Commands::User {
            command:
                UserCommands::Register {
                    username,
                    password,
                    role,
                },
        } => {
            let actor = if args.user.is_some() {
                Some(login(&state, &args).await?)
            } else {
                None
            };
            cli::cmd_user_register(&state, actor.as_ref(), username, password, *role).await
        }

        Commands::User { command } => {
            let actor = login(&state, &args).await?;
            match command {
                UserCommands::Register { .. } => Ok(()),
                UserCommands::List => cli::cmd_user_list(&state, &actor).await,
                UserCommands::Role { user_id, role } => {
                    cli::cmd_user_role(&state, &actor, *user_id, *role).await
                }
                UserCommands::Remove { user_id } => {
                    cli::cmd_user_remove(&state, &actor, *user_id).await
                }
                UserCommands::Passwd {
                    old_password,
                    new_password,
                } => cli::cmd_user_passwd(&state, &actor, old_password, new_password).await,
            }
        }

        Commands::Asset { command } => {
            let actor = login(&state, &args).await?;
            match command {
                AssetCommands::List { filters } => cli::cmd_asset_list(&state, filters).await,
                AssetCommands::Show { asset_number } => {
                    cli::cmd_asset_show(&state, asset_number).await
                }
                AssetCommands::Add {
                    asset_number,
                    name,
                    category,
                    quantity,
                    brand_spec,
                    purchase_date,
                    image_path,
                    location,
                    notes,
                    status,
                } => {
                    let mut asset = NewAsset::new(asset_number, name, category);
                    asset.quantity = *quantity;
                    asset.brand_spec = brand_spec.clone().unwrap_or_default();
                    asset.purchase_date.clone_from(purchase_date);
                    asset.image_path = image_path.clone().unwrap_or_default();
                    asset.location = location.clone().unwrap_or_default();
                    asset.notes = notes.clone().unwrap_or_default();
                    asset.maintenance_status = (*status).unwrap_or_default();
                    cli::cmd_asset_add(&state, &actor, asset).await
                }
                AssetCommands::Edit {
                    id,
                    name,
                    quantity,
                    category,
                    brand_spec,
                    purchase_date,
                    clear_purchase_date,
                    image_path,
                    location,
                    notes,
                    status,
                } => {
                    let patch = AssetPatch {
                        name: name.clone(),
                        quantity: *quantity,
                        category: category.clone(),
                        brand_spec: brand_spec.clone(),
                        purchase_date: if *clear_purchase_date {
                            Some(None)
                        } else {
                            purchase_date.clone().map(Some)
                        },
                        image_path: image_path.clone(),
                        location: location.clone(),
                        notes: notes.clone(),
                        maintenance_status: *status,
                    };
                    cli::cmd_asset_edit(&state, *id, patch).await
                }
                AssetCommands::Remove { id, yes } => {
                    cli::cmd_asset_remove(&state, *id, *yes).await
                }
                AssetCommands::Assign {
                    id,
                    user_name,
                    start,
                    end,
                } => {
                    cli::cmd_asset_assign(&state, *id, user_name, start.clone(), end.clone())
                        .await
                }
                AssetCommands::Return {
                    assignment_id,
                    date,
                } => cli::cmd_asset_return(&state, *assignment_id, date.clone()).await,
                AssetCommands::Repair {
                    id,
                    date,
                    fault,
                    result,
                } => {
                    cli::cmd_asset_repair(&state, &actor, *id, date.clone(), fault, result).await
                }
            }
        }

        Commands::Export { path, filters } => {
            login(&state, &args).await?;
            cli::cmd_export(&state, path, filters).await
        }

        Commands::Import { path } => {
            let actor = login(&state, &args).await?;
            cli::cmd_import(&state, &actor, path).await
        }
    }
}
