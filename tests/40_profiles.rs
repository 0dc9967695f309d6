mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{create_profile, register_owner, send, test_app};

#[tokio::test]
async fn owners_list_and_read_their_profiles() {
    let Some(app) = test_app().await else { return };
    let owner = register_owner(&app.router, "lister").await;
    let (_, kid) = create_profile(&app.router, &owner, "child_profile").await;

    let (status, body) = send(&app.router, Method::GET, "/profiles?type=child_profile", Some(&owner.token), None).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["total"], 1);
    assert_eq!(body["data"]["profiles"][0]["id"], kid["id"]);

    let uri = format!("/profiles/{}", kid["id"].as_str().unwrap());
    let (status, body) = send(&app.router, Method::GET, &uri, Some(&owner.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["profile"]["name"], "Little One");
    assert_eq!(body["data"]["profile"]["watchlist"], json!([]));
}

#[tokio::test]
async fn sub_profiles_only_reach_their_own_profile() {
    let Some(app) = test_app().await else { return };
    let owner = register_owner(&app.router, "home").await;
    let neighbour = register_owner(&app.router, "neighbour").await;
    let (kid_token, kid) = create_profile(&app.router, &owner, "standard_profile").await;
    let (stranger_token, _) = create_profile(&app.router, &neighbour, "standard_profile").await;
    let uri = format!("/profiles/{}", kid["id"].as_str().unwrap());

    let (status, _) = send(&app.router, Method::GET, &uri, Some(&stranger_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app.router, Method::GET, &uri, Some(&kid_token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app.router, Method::GET, "/profiles", Some(&kid_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // A mistyped body does not get past the permission check
    let mistyped = json!({ "name": 42 });
    let (status, _) = send(&app.router, Method::PATCH, &uri, Some(&stranger_token), Some(mistyped.clone())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let watchlist = format!("{}/watchlist", uri);
    let (status, _) = send(&app.router, Method::POST, &watchlist, Some(&stranger_token), Some(json!({ "movieId": 7 }))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(&app.router, Method::PATCH, &uri, Some(&kid_token), Some(mistyped)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_JSON");
}

#[tokio::test]
async fn role_changes_are_owner_only() {
    let Some(app) = test_app().await else { return };
    let owner = register_owner(&app.router, "roles").await;
    let (kid_token, kid) = create_profile(&app.router, &owner, "child_profile").await;
    let uri = format!("/profiles/{}", kid["id"].as_str().unwrap());

    let (status, _) = send(&app.router, Method::PATCH, &uri, Some(&kid_token), Some(json!({ "role": "standard_profile" }))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(&app.router, Method::PATCH, &uri, Some(&kid_token), Some(json!({ "name": "Renamed" }))).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["profile"]["name"], "Renamed");

    let (status, body) = send(&app.router, Method::PATCH, &uri, Some(&owner.token), Some(json!({ "role": "standard_profile" }))).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["profile"]["type"], "standard_profile");

    let (status, _) = send(&app.router, Method::PATCH, &uri, Some(&owner.token), Some(json!({ "role": "account_owner" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn deleting_a_profile_removes_its_user() {
    let Some(app) = test_app().await else { return };
    let owner = register_owner(&app.router, "cleanup").await;
    let (kid_token, kid) = create_profile(&app.router, &owner, "child_profile").await;
    let uri = format!("/profiles/{}", kid["id"].as_str().unwrap());

    let (status, _) = send(&app.router, Method::DELETE, &uri, Some(&owner.token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app.router, Method::GET, &uri, Some(&owner.token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // The paired user is gone, so its token no longer resolves
    let (status, _) = send(&app.router, Method::GET, "/profiles/getmyprofiles", Some(&kid_token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn the_main_profile_cannot_be_deleted() {
    let Some(app) = test_app().await else { return };
    let owner = register_owner(&app.router, "keeper").await;

    let (_, body) = send(&app.router, Method::GET, "/profiles/getmyprofiles", Some(&owner.token), None).await;
    let uri = format!("/profiles/{}", body["data"]["profiles"][0]["id"].as_str().unwrap());

    let (status, body) = send(&app.router, Method::DELETE, &uri, Some(&owner.token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "The main profile cannot be deleted");
}

#[tokio::test]
async fn watchlist_add_list_remove() {
    let Some(app) = test_app().await else { return };
    let owner = register_owner(&app.router, "watcher").await;
    let (kid_token, kid) = create_profile(&app.router, &owner, "standard_profile").await;

    let (status, body) = send(
        &app.router,
        Method::POST,
        "/movies",
        Some(&owner.token),
        Some(json!({ "title": "Watch me", "description": "Queued", "genre": "Comedy" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let movie_id = body["data"]["movie"]["id"].as_str().unwrap().to_string();
    let base = format!("/profiles/{}/watchlist", kid["id"].as_str().unwrap());

    let (status, body) = send(&app.router, Method::POST, &base, Some(&kid_token), Some(json!({ "movieId": movie_id }))).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["profile"]["watchlist"][0]["movie"], movie_id.as_str());

    let (status, _) = send(&app.router, Method::POST, &base, Some(&kid_token), Some(json!({ "movieId": movie_id }))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(&app.router, Method::POST, &base, Some(&kid_token), Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app.router, Method::GET, &base, Some(&owner.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["watchlist"].as_array().unwrap().len(), 1);

    let entry = format!("{}/{}", base, movie_id);
    let (status, _) = send(&app.router, Method::DELETE, &entry, Some(&kid_token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app.router, Method::DELETE, &entry, Some(&kid_token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
