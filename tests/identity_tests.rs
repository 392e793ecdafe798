//! Identity service tests: registration, login and admin-only operations.

use assetdesk::config::Config;
use assetdesk::domain::{Role, UserId};
use assetdesk::models::NewAsset;
use assetdesk::services::{Actor, AuthError};
use assetdesk::state::AppState;

async fn test_state() -> AppState {
    let db_path = std::env::temp_dir().join(format!(
        "assetdesk-identity-test-{}.db",
        uuid::Uuid::new_v4()
    ));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", db_path.display());
    config.security.argon2_memory_cost_kib = 1024;
    config.security.argon2_time_cost = 1;

    AppState::new(config)
        .await
        .expect("failed to create app state")
}

async fn login(state: &AppState, username: &str, password: &str) -> Actor {
    Actor::from(
        state
            .auth
            .authenticate(username, password)
            .await
            .expect("login failed"),
    )
}

#[tokio::test]
async fn register_then_authenticate() {
    let state = test_state().await;

    let alice = state
        .auth
        .register("alice", "pw1", Role::User)
        .await
        .expect("first registration failed");
    assert_eq!(alice.role, Role::User);
    assert!(!alice.must_change_password);

    let err = state
        .auth
        .register("alice", "pw2", Role::User)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::UsernameTaken(ref name) if name == "alice"));
    assert_eq!(err.to_string(), "Username already exists: alice");

    let user = state.auth.authenticate("alice", "pw1").await.unwrap();
    assert_eq!(user.id, alice.id);

    assert!(matches!(
        state.auth.authenticate("alice", "pw2").await,
        Err(AuthError::InvalidCredentials)
    ));
    assert!(matches!(
        state.auth.authenticate("nobody", "pw1").await,
        Err(AuthError::InvalidCredentials)
    ));
}

#[tokio::test]
async fn passwords_are_stored_hashed() {
    let state = test_state().await;
    state.auth.register("erin", "secret", Role::User).await.unwrap();

    let row = state
        .store
        .query_one(
            "SELECT password_hash FROM users WHERE username = ?",
            vec!["erin".into()],
        )
        .await
        .unwrap();
    let hash: String = row.try_get("", "password_hash").unwrap();

    assert!(hash.starts_with("$argon2id$"));
    assert!(!hash.contains("secret"));
}

#[tokio::test]
async fn registration_validates_input() {
    let state = test_state().await;

    assert!(matches!(
        state.auth.register("   ", "pw", Role::User).await,
        Err(AuthError::Validation(_))
    ));
    assert!(matches!(
        state.auth.register("frank", "", Role::User).await,
        Err(AuthError::Validation(_))
    ));
}

#[tokio::test]
async fn only_admins_list_users() {
    let state = test_state().await;
    state.auth.register("bob", "pw", Role::User).await.unwrap();

    let admin = login(&state, "admin", "admin123").await;
    let users = state.auth.list_users(&admin).await.unwrap();
    let names: Vec<_> = users.iter().map(|u| u.username.as_str()).collect();
    assert_eq!(names, vec!["admin", "bob"]);

    let bob = login(&state, "bob", "pw").await;
    assert!(matches!(
        state.auth.list_users(&bob).await,
        Err(AuthError::Forbidden(_))
    ));
}

#[tokio::test]
async fn role_changes_require_admin() {
    let state = test_state().await;
    let bob_user = state.auth.register("bob", "pw", Role::User).await.unwrap();
    let bob = login(&state, "bob", "pw").await;
    let admin = login(&state, "admin", "admin123").await;

    assert!(matches!(
        state.auth.change_role(&bob, bob.id, Role::Admin).await,
        Err(AuthError::Forbidden(_))
    ));

    state
        .auth
        .change_role(&admin, bob_user.id, Role::Admin)
        .await
        .unwrap();
    let promoted = state.store.get_user(bob_user.id).await.unwrap().unwrap();
    assert_eq!(promoted.role, Role::Admin);

    // Admins may change their own role.
    state
        .auth
        .change_role(&admin, admin.id, Role::Admin)
        .await
        .unwrap();

    assert!(matches!(
        state
            .auth
            .change_role(&admin, UserId::new(9999), Role::User)
            .await,
        Err(AuthError::UserNotFound)
    ));
}

#[tokio::test]
async fn admins_cannot_delete_themselves() {
    let state = test_state().await;
    let bob_user = state.auth.register("bob", "pw", Role::User).await.unwrap();
    let admin = login(&state, "admin", "admin123").await;
    let bob = login(&state, "bob", "pw").await;

    assert!(matches!(
        state.auth.delete_user(&admin, admin.id).await,
        Err(AuthError::SelfDeletion)
    ));
    assert!(matches!(
        state.auth.delete_user(&bob, admin.id).await,
        Err(AuthError::Forbidden(_))
    ));

    state.auth.delete_user(&admin, bob_user.id).await.unwrap();
    assert!(state.store.get_user(bob_user.id).await.unwrap().is_none());

    assert!(matches!(
        state.auth.delete_user(&admin, bob_user.id).await,
        Err(AuthError::UserNotFound)
    ));
}

#[tokio::test]
async fn deleting_a_creator_keeps_their_assets() {
    let state = test_state().await;
    let bob_user = state.auth.register("bob", "pw", Role::User).await.unwrap();
    let admin = login(&state, "admin", "admin123").await;

    let id = state
        .assets
        .create(NewAsset::new("A1", "Mouse", "鼠标"), bob_user.id)
        .await
        .unwrap();

    state.auth.delete_user(&admin, bob_user.id).await.unwrap();

    let details = state.assets.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(details.asset.created_by, None);
}

#[tokio::test]
async fn change_password_reverifies_old_password() {
    let state = test_state().await;
    let admin = login(&state, "admin", "admin123").await;

    assert!(matches!(
        state.auth.change_password(&admin, "wrong", "new-pass").await,
        Err(AuthError::IncorrectPassword)
    ));

    state
        .auth
        .change_password(&admin, "admin123", "new-pass")
        .await
        .unwrap();

    assert!(state.auth.authenticate("admin", "admin123").await.is_err());
    let user = state.auth.authenticate("admin", "new-pass").await.unwrap();
    assert!(!user.must_change_password);
}

#[tokio::test]
async fn elevated_registration_needs_admin() {
    let state = test_state().await;
    state.auth.register("bob", "pw", Role::User).await.unwrap();
    let bob = login(&state, "bob", "pw").await;
    let admin = login(&state, "admin", "admin123").await;

    assert!(matches!(
        state.auth.register_as(&bob, "mallory", "pw", Role::Admin).await,
        Err(AuthError::Forbidden(_))
    ));
    assert!(
        state
            .auth
            .register_as(&bob, "grace", "pw", Role::User)
            .await
            .is_ok()
    );

    let heidi = state
        .auth
        .register_as(&admin, "heidi", "pw", Role::Admin)
        .await
        .unwrap();
    assert!(heidi.is_admin());
}
