//! Account command handlers

use super::report;
use crate::domain::{Role, UserId};
use crate::services::{Actor, Outcome};
use crate::state::AppState;

/// Registers an account. Without an acting user only the default role
/// can be requested.
pub async fn cmd_user_register(
    state: &AppState,
    actor: Option<&Actor>,
    username: &str,
    password: &str,
    role: Role,
) -> anyhow::Result<()> {
    let result = match actor {
        Some(actor) => {
            state
                .auth
                .register_as(actor, username, password, role)
                .await
        }
        None if role == Role::default() => state.auth.register(username, password, role).await,
        None => {
            report(&Outcome::fail(format!(
                "Registering a {role} account requires admin credentials"
            )));
            return Ok(());
        }
    };

    report(&Outcome::from_result(result, |user| {
        format!("Registered {} (ID: {}, role: {})", user.username, user.id, user.role)
    }));
    Ok(())
}

pub async fn cmd_user_list(state: &AppState, actor: &Actor) -> anyhow::Result<()> {
    let users = match state.auth.list_users(actor).await {
        Ok(users) => users,
        Err(e) => {
            report(&Outcome::fail(e.to_string()));
            return Ok(());
        }
    };

    println!("Users ({} total)", users.len());
    println!("{:-<50}", "");
    for user in users {
        let marker = if user.id == actor.id { " (you)" } else { "" };
        println!(
            "{:>4}  {:<20} {:<6} {}{}",
            user.id, user.username, user.role, user.created_at, marker
        );
    }
    Ok(())
}

pub async fn cmd_user_role(
    state: &AppState,
    actor: &Actor,
    user_id: i32,
    role: Role,
) -> anyhow::Result<()> {
    let result = state
        .auth
        .change_role(actor, UserId::new(user_id), role)
        .await;
    report(&Outcome::from_result(result, |()| {
        format!("User {user_id} is now {role}")
    }));
    Ok(())
}

pub async fn cmd_user_remove(state: &AppState, actor: &Actor, user_id: i32) -> anyhow::Result<()> {
    let result = state.auth.delete_user(actor, UserId::new(user_id)).await;
    report(&Outcome::from_result(result, |()| {
        format!("Deleted user {user_id}")
    }));
    Ok(())
}

pub async fn cmd_user_passwd(
    state: &AppState,
    actor: &Actor,
    old_password: &str,
    new_password: &str,
) -> anyhow::Result<()> {
    let result = state
        .auth
        .change_password(actor, old_password, new_password)
        .await;
    report(&Outcome::from_result(result, |()| {
        "Password changed".to_string()
    }));
    Ok(())
}
