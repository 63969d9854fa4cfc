//! Team endpoints.

use pr_reviewers_lib::repository::InMemoryStore;
use serde_json::json;
use uuid::Uuid;

use super::test_helpers::*;

#[actix_rt::test]
async fn test_add_team_then_get_it() {
    let store = InMemoryStore::new();
    let app = create_test_app(&store).await;
    let members = create_team(&app, "backend", 2).await;

    let (status, body) = get(&app, "/api/v1/team/get?team_name=backend").await;

    assert_eq!(status, 200, "{:?}", body);
    assert_eq!(body["team_name"], "backend");
    let ids: Vec<&str> = body["members"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["user_id"].as_str().unwrap())
        .collect();
    assert_eq!(ids.len(), 2);
    for id in &members {
        assert!(ids.contains(&id.to_string().as_str()));
    }
}

#[actix_rt::test]
async fn test_add_team_response_lists_processed_members() {
    let store = InMemoryStore::new();
    let app = create_test_app(&store).await;
    let user_id = Uuid::new_v4();

    let (status, body) = post_json(
        &app,
        "/api/v1/team/add",
        json!({
            "team_name": "payments",
            "members": [{ "user_id": user_id, "username": "alice", "is_active": true }]
        }),
    )
    .await;

    assert_eq!(status, 201);
    assert_eq!(body["team_name"], "payments");
    assert_eq!(body["members"][0]["user_id"], user_id.to_string());
    assert_eq!(body["members"][0]["username"], "alice");
}

#[actix_rt::test]
async fn test_resubmitting_same_team_is_not_modified() {
    let store = InMemoryStore::new();
    let app = create_test_app(&store).await;
    let user_id = Uuid::new_v4();
    let payload = json!({
        "team_name": "payments",
        "members": [{ "user_id": user_id, "username": "alice", "is_active": true }]
    });

    let (first, _) = post_json(&app, "/api/v1/team/add", payload.clone()).await;
    let (second, _) = post_json(&app, "/api/v1/team/add", payload).await;

    assert_eq!(first, 201);
    assert_eq!(second, 304);
}

#[actix_rt::test]
async fn test_add_team_moves_existing_user() {
    let store = InMemoryStore::new();
    let app = create_test_app(&store).await;
    let members = create_team(&app, "backend", 2).await;

    let (status, _) = post_json(
        &app,
        "/api/v1/team/add",
        json!({
            "team_name": "frontend",
            "members": [{ "user_id": members[1], "username": "backend-1", "is_active": true }]
        }),
    )
    .await;
    assert_eq!(status, 201);

    let (_, backend) = get(&app, "/api/v1/team/get?team_name=backend").await;
    assert_eq!(backend["members"].as_array().unwrap().len(), 1);
    let (_, frontend) = get(&app, "/api/v1/team/get?team_name=frontend").await;
    assert_eq!(frontend["members"][0]["user_id"], members[1].to_string());
}

#[actix_rt::test]
async fn test_add_team_rejects_duplicate_user_ids() {
    let store = InMemoryStore::new();
    let app = create_test_app(&store).await;
    let user_id = Uuid::new_v4();

    let (status, body) = post_json(
        &app,
        "/api/v1/team/add",
        json!({
            "team_name": "payments",
            "members": [
                { "user_id": user_id, "username": "alice", "is_active": true },
                { "user_id": user_id, "username": "alice2", "is_active": true }
            ]
        }),
    )
    .await;

    assert_eq!(status, 400);
    assert_eq!(body["error"], "BAD_REQUEST");
    assert!(store.snapshot().await.teams.is_empty());
}

#[actix_rt::test]
async fn test_add_team_rejects_blank_name_and_empty_members() {
    let store = InMemoryStore::new();
    let app = create_test_app(&store).await;

    let (blank, _) = post_json(
        &app,
        "/api/v1/team/add",
        json!({
            "team_name": "  ",
            "members": [{ "user_id": Uuid::new_v4(), "username": "alice", "is_active": true }]
        }),
    )
    .await;
    let (empty, _) = post_json(
        &app,
        "/api/v1/team/add",
        json!({ "team_name": "payments", "members": [] }),
    )
    .await;
    let (malformed, body) = post_json(&app, "/api/v1/team/add", json!({ "team_name": 5 })).await;

    assert_eq!(blank, 400);
    assert_eq!(empty, 400);
    assert_eq!(malformed, 400);
    assert_eq!(body["error"], "BAD_REQUEST");
}

#[actix_rt::test]
async fn test_get_unknown_team_is_not_found() {
    let store = InMemoryStore::new();
    let app = create_test_app(&store).await;

    let (status, body) = get(&app, "/api/v1/team/get?team_name=ghosts").await;
    let (missing_param, _) = get(&app, "/api/v1/team/get").await;

    assert_eq!(status, 404);
    assert_eq!(body["error"], "NOT_FOUND");
    assert_eq!(missing_param, 400);
}

#[actix_rt::test]
async fn test_deactivate_users_backfills_open_reviews() {
    let store = InMemoryStore::new();
    let app = create_test_app(&store).await;
    let members = create_team(&app, "backend", 4).await;
    let (author, leaving, staying, spare) = (members[0], members[1], members[2], members[3]);
    let pr = create_pull_request(&app, author).await;
    assert_eq!(reviewers(&pr), vec![leaving, staying]);

    let (status, body) = patch_json(
        &app,
        "/api/v1/team/deactivateUsers",
        json!({ "team_name": "backend", "user_ids": [leaving] }),
    )
    .await;

    assert_eq!(status, 200, "{:?}", body);
    assert_eq!(
        body["affected_pull_requests"][0]["pull_request_id"],
        pr["pull_request_id"]
    );
    let leaving_member = body["team"]["members"]
        .as_array()
        .unwrap()
        .iter()
        .find(|m| m["user_id"] == leaving.to_string())
        .unwrap()
        .clone();
    assert_eq!(leaving_member["is_active"], false);

    let pr_id = Uuid::parse_str(pr["pull_request_id"].as_str().unwrap()).unwrap();
    let snapshot = store.snapshot().await;
    let mut current = snapshot.reviewer_ids(pr_id);
    current.sort();
    let mut expected = vec![staying, spare];
    expected.sort();
    assert_eq!(current, expected);
}

#[actix_rt::test]
async fn test_deactivate_users_from_other_team_conflicts() {
    let store = InMemoryStore::new();
    let app = create_test_app(&store).await;
    create_team(&app, "backend", 2).await;
    let outsiders = create_team(&app, "frontend", 1).await;

    let (status, body) = patch_json(
        &app,
        "/api/v1/team/deactivateUsers",
        json!({ "team_name": "backend", "user_ids": [outsiders[0]] }),
    )
    .await;

    assert_eq!(status, 409);
    assert_eq!(body["error"], "BAD_REQUEST");
}

#[actix_rt::test]
async fn test_deactivate_users_requires_ids() {
    let store = InMemoryStore::new();
    let app = create_test_app(&store).await;
    create_team(&app, "backend", 2).await;

    let (status, _) = patch_json(
        &app,
        "/api/v1/team/deactivateUsers",
        json!({ "team_name": "backend", "user_ids": [] }),
    )
    .await;

    assert_eq!(status, 400);
}
