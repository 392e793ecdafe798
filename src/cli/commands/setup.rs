use crate::config::Config;
use crate::constants::assets::CATEGORIES;
use crate::state::AppState;

pub async fn cmd_init(config: Config) -> anyhow::Result<()> {
    if Config::create_default_if_missing()? {
        println!("Created config.toml with default settings.");
    } else {
        println!("config.toml already exists, leaving it untouched.");
    }

    let admin = config.bootstrap.admin_username.clone();
    let state = AppState::new(config).await?;

    println!(
        "Database ready at {}",
        state.config.general.database_path
    );
    if let Some(user) = state.store.get_user_by_username(&admin).await? {
        if user.must_change_password {
            println!("Log in as '{admin}' and change the initial password with `assetdesk user passwd`.");
        }
    }
    Ok(())
}

pub fn cmd_categories() {
    for category in CATEGORIES {
        println!("{category}");
    }
}
