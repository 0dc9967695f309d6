mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use moviestream_api::database::users;
use sqlx::PgPool;

use common::{register_owner, send, test_app, unique_user};

/// (users, profiles) stored under `email`
async fn rows_for_email(pool: &PgPool, email: &str) -> (i64, i64) {
    let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = $1")
        .bind(email)
        .fetch_one(pool)
        .await
        .unwrap();
    let profiles: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM profiles WHERE email = $1")
        .bind(email)
        .fetch_one(pool)
        .await
        .unwrap();
    (users, profiles)
}

#[tokio::test]
async fn register_then_login() {
    let Some(app) = test_app().await else { return };
    let owner = register_owner(&app.router, "owner").await;

    let (status, body) = send(
        &app.router,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "email": owner.email.to_uppercase(), "password": "secret123" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "{}", body);
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
    assert_eq!(body["data"]["user"]["role"], "account_owner");
    assert!(body["data"]["user"]["lastLogin"].is_string());
    assert!(body["data"]["user"].get("passwordHash").is_none());
}

#[tokio::test]
async fn register_creates_the_main_profile() {
    let Some(app) = test_app().await else { return };
    let owner = register_owner(&app.router, "main").await;

    let (status, body) = send(&app.router, Method::GET, "/profiles/getmyprofiles", Some(&owner.token), None).await;

    assert_eq!(status, StatusCode::OK, "{}", body);
    let profiles = body["data"]["profiles"].as_array().unwrap();
    assert_eq!(profiles.len(), 1);
    assert_eq!(profiles[0]["type"], "account_owner");
    assert_eq!(profiles[0]["user"], owner.user_id.as_str());
    assert_eq!(profiles[0]["owner"], owner.user_id.as_str());
}

#[tokio::test]
async fn duplicate_email_is_a_conflict() {
    let Some(app) = test_app().await else { return };
    let owner = register_owner(&app.router, "dup").await;
    let (username, _) = unique_user("other");

    let (status, body) = send(
        &app.router,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({ "username": username, "email": owner.email, "password": "secret123" })),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");
    assert_eq!(rows_for_email(&app.pool, &owner.email).await, (1, 1));
}

#[tokio::test]
async fn concurrent_registrations_with_one_email() {
    let Some(app) = test_app().await else { return };
    let (first, email) = unique_user("race");
    let (second, _) = unique_user("race");

    let register = |username: String| {
        let router = app.router.clone();
        let email = email.clone();
        async move {
            send(
                &router,
                Method::POST,
                "/auth/register",
                None,
                Some(json!({ "username": username, "email": email, "password": "secret123" })),
            )
            .await
        }
    };
    let ((a, _), (b, _)) = tokio::join!(register(first), register(second));

    let mut statuses = [a, b];
    statuses.sort();
    assert_eq!(statuses, [StatusCode::CREATED, StatusCode::CONFLICT]);
    assert_eq!(rows_for_email(&app.pool, &email).await, (1, 1));
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let Some(app) = test_app().await else { return };
    let owner = register_owner(&app.router, "pw").await;

    let (status, body) = send(
        &app.router,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "email": owner.email, "password": "wrong-password" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Incorrect email or password");

    let user = users::find_by_email(&app.pool, &owner.email)
        .await
        .unwrap()
        .expect("user exists");
    assert!(user.last_login.is_none());
}

#[tokio::test]
async fn deactivated_users_are_locked_out() {
    let Some(app) = test_app().await else { return };
    let owner = register_owner(&app.router, "inactive").await;

    users::set_active(&app.pool, &owner.email, false)
        .await
        .unwrap()
        .expect("user exists");

    let (status, _) = send(
        &app.router,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "email": owner.email, "password": "secret123" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app.router, Method::GET, "/profiles/getmyprofiles", Some(&owner.token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn only_owners_create_profiles() {
    let Some(app) = test_app().await else { return };
    let owner = register_owner(&app.router, "parent").await;
    let (kid_token, profile) = common::create_profile(&app.router, &owner, "child_profile").await;

    assert_eq!(profile["type"], "child_profile");
    assert_eq!(profile["owner"], owner.user_id.as_str());
    assert_eq!(profile["watchlist"], json!([]));

    let (username, email) = unique_user("grandkid");
    let (status, _) = send(
        &app.router,
        Method::POST,
        "/auth/create-profile",
        Some(&kid_token),
        Some(json!({
            "username": username,
            "email": email,
            "password": "secret123",
            "type": "standard_profile"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn create_profile_rejects_owner_type() {
    let Some(app) = test_app().await else { return };
    let owner = register_owner(&app.router, "second").await;
    let (username, email) = unique_user("boss");

    let (status, body) = send(
        &app.router,
        Method::POST,
        "/auth/create-profile",
        Some(&owner.token),
        Some(json!({
            "username": username,
            "email": email,
            "password": "secret123",
            "type": "account_owner"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fieldErrors"]["type"].is_string());
}
