use super::report;
use crate::models::AssetFilter;
use crate::services::Actor;
use crate::state::AppState;
use std::path::Path;

pub async fn cmd_export(state: &AppState, path: &Path, filters: &[String]) -> anyhow::Result<()> {
    let filter = AssetFilter::from_pairs(filters.iter().map(String::as_str))
        .map_err(|e| anyhow::anyhow!(e))?;

    report(&state.transfer.export_file(path, &filter).await);
    Ok(())
}

pub async fn cmd_import(state: &AppState, actor: &Actor, path: &Path) -> anyhow::Result<()> {
    report(&state.transfer.import_file(path, actor.id).await);
    Ok(())
}
