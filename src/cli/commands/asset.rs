//! Asset command handlers

use super::{report, today};
use crate::domain::AssetId;
use crate::models::{AssetFilter, AssetPatch, NewAsset, NewAssignment, NewRepair};
use crate::services::{Actor, Outcome};
use crate::state::AppState;

pub async fn cmd_asset_list(state: &AppState, filters: &[String]) -> anyhow::Result<()> {
    let filter = AssetFilter::from_pairs(filters.iter().map(String::as_str))
        .map_err(|e| anyhow::anyhow!(e))?;
    let assets = state.assets.list(&filter).await?;

    if assets.is_empty() {
        println!("No assets found.");
        return Ok(());
    }

    println!("Assets ({} total)", assets.len());
    println!("{:-<70}", "");

    for asset in assets {
        println!(
            "{} {} [{}] x{}",
            asset.asset_number, asset.name, asset.category, asset.quantity
        );
        println!(
            "  ID: {} | Location: {} | Status: {}",
            asset.id,
            if asset.location.is_empty() { "-" } else { asset.location.as_str() },
            asset.maintenance_status.label()
        );
    }

    Ok(())
}

pub async fn cmd_asset_show(state: &AppState, asset_number: &str) -> anyhow::Result<()> {
    let Some(details) = state.assets.find_by_number(asset_number).await? else {
        println!("Asset {asset_number} not found.");
        return Ok(());
    };

    let asset = &details.asset;
    println!("{} - {}", asset.asset_number, asset.name);
    println!("{:-<50}", "");
    println!("ID:             {}", asset.id);
    println!("Category:       {}", asset.category);
    println!("Quantity:       {}", asset.quantity);
    println!("Brand/spec:     {}", asset.brand_spec);
    println!(
        "Purchased:      {}",
        asset.purchase_date.as_deref().unwrap_or("-")
    );
    println!("Location:       {}", asset.location);
    println!("Status:         {}", asset.maintenance_status.label());
    if !asset.notes.is_empty() {
        println!("Notes:          {}", asset.notes);
    }
    println!("Updated:        {}", asset.updated_at);

    if !details.assignments.is_empty() {
        println!();
        println!("Assignments:");
        for a in &details.assignments {
            println!(
                "  [{}] {} {} → {}",
                a.id,
                a.user_name,
                a.start_date,
                a.end_date.as_deref().unwrap_or("(active)")
            );
        }
    }

    if !details.repairs.is_empty() {
        println!();
        println!("Repairs:");
        for r in &details.repairs {
            println!("  {} | {} | {}", r.repair_date, r.fault_cause, r.repair_result);
        }
    }

    Ok(())
}

pub async fn cmd_asset_add(state: &AppState, actor: &Actor, asset: NewAsset) -> anyhow::Result<()> {
    let number = asset.asset_number.clone();
    let result = state.assets.create(asset, actor.id).await;
    report(&Outcome::from_result(result, |id| {
        format!("Created asset {number} (ID: {id})")
    }));
    Ok(())
}

pub async fn cmd_asset_edit(state: &AppState, id: i32, patch: AssetPatch) -> anyhow::Result<()> {
    if patch.is_empty() {
        println!("Nothing to change.");
        return Ok(());
    }

    let result = state.assets.update(AssetId::new(id), patch).await;
    report(&Outcome::from_result(result, |asset| {
        format!("Updated asset {}", asset.asset_number)
    }));
    Ok(())
}

pub async fn cmd_asset_remove(state: &AppState, id: i32, yes: bool) -> anyhow::Result<()> {
    let id = AssetId::new(id);

    let Some(details) = state.assets.find_by_id(id).await? else {
        report(&Outcome::fail(format!("Asset not found: {id}")));
        return Ok(());
    };

    if !yes {
        println!(
            "Delete '{}' ({}) with {} assignments and {} repairs?",
            details.asset.name,
            details.asset.asset_number,
            details.assignments.len(),
            details.repairs.len()
        );
        println!("Enter 'y' to confirm, anything else to cancel:");

        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;

        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let result = state.assets.delete(id).await;
    report(&Outcome::from_result(result, |()| {
        format!("Deleted asset {}", details.asset.asset_number)
    }));
    Ok(())
}

pub async fn cmd_asset_assign(
    state: &AppState,
    id: i32,
    user_name: &str,
    start: Option<String>,
    end: Option<String>,
) -> anyhow::Result<()> {
    let assignment = NewAssignment {
        user_name: user_name.to_string(),
        start_date: start.unwrap_or_else(today),
        end_date: end,
    };

    let result = state
        .assets
        .add_assignment(AssetId::new(id), assignment)
        .await;
    report(&Outcome::from_result(result, |a| {
        format!("Assigned to {} (assignment ID: {})", a.user_name, a.id)
    }));
    Ok(())
}

pub async fn cmd_asset_return(
    state: &AppState,
    assignment_id: i32,
    date: Option<String>,
) -> anyhow::Result<()> {
    let date = date.unwrap_or_else(today);
    let result = state.assets.close_assignment(assignment_id, &date).await;
    report(&Outcome::from_result(result, |()| {
        format!("Assignment {assignment_id} closed on {date}")
    }));
    Ok(())
}

pub async fn cmd_asset_repair(
    state: &AppState,
    actor: &Actor,
    id: i32,
    date: Option<String>,
    fault: &str,
    result_text: &str,
) -> anyhow::Result<()> {
    let repair = NewRepair::new(date.unwrap_or_else(today), fault, result_text);

    let result = state
        .assets
        .record_repair(AssetId::new(id), repair, actor.id)
        .await;
    report(&Outcome::from_result(result, |(_, status)| {
        format!("Repair recorded, status is now {}", status.label())
    }));
    Ok(())
}
