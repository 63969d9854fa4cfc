//! User endpoints.

use pr_reviewers_lib::repository::InMemoryStore;
use serde_json::json;
use uuid::Uuid;

use super::test_helpers::*;

#[actix_rt::test]
async fn test_set_is_active_toggles_flag() {
    let store = InMemoryStore::new();
    let app = create_test_app(&store).await;
    let members = create_team(&app, "backend", 2).await;

    let (status, body) = post_json(
        &app,
        "/api/v1/users/setIsActive",
        json!({ "user_id": members[1], "is_active": false }),
    )
    .await;

    assert_eq!(status, 200, "{:?}", body);
    assert_eq!(body["user"]["user_id"], members[1].to_string());
    assert_eq!(body["user"]["team_name"], "backend");
    assert_eq!(body["user"]["is_active"], false);
}

#[actix_rt::test]
async fn test_set_is_active_to_current_value_is_not_modified() {
    let store = InMemoryStore::new();
    let app = create_test_app(&store).await;
    let members = create_team(&app, "backend", 1).await;

    let (status, _) = post_json(
        &app,
        "/api/v1/users/setIsActive",
        json!({ "user_id": members[0], "is_active": true }),
    )
    .await;

    assert_eq!(status, 304);
}

#[actix_rt::test]
async fn test_set_is_active_for_unknown_user_is_not_found() {
    let store = InMemoryStore::new();
    let app = create_test_app(&store).await;

    let (status, _) = post_json(
        &app,
        "/api/v1/users/setIsActive",
        json!({ "user_id": Uuid::new_v4(), "is_active": false }),
    )
    .await;

    assert_eq!(status, 404);
}

#[actix_rt::test]
async fn test_inactive_user_is_skipped_for_new_reviews() {
    let store = InMemoryStore::new();
    let app = create_test_app(&store).await;
    let members = create_team(&app, "backend", 3).await;
    post_json(
        &app,
        "/api/v1/users/setIsActive",
        json!({ "user_id": members[1], "is_active": false }),
    )
    .await;

    let pr = create_pull_request(&app, members[0]).await;

    assert_eq!(reviewers(&pr), vec![members[2]]);
}

#[actix_rt::test]
async fn test_get_review_lists_assigned_pull_requests() {
    let store = InMemoryStore::new();
    let app = create_test_app(&store).await;
    let members = create_team(&app, "backend", 2).await;
    let pr = create_pull_request(&app, members[0]).await;

    let (status, body) = get(
        &app,
        &format!("/api/v1/users/getReview?user_id={}", members[1]),
    )
    .await;

    assert_eq!(status, 200, "{:?}", body);
    assert_eq!(body["user_id"], members[1].to_string());
    assert_eq!(
        body["pull_requests"][0]["pull_request_id"],
        pr["pull_request_id"]
    );
    assert_eq!(body["pull_requests"][0]["status"], "OPEN");
}

#[actix_rt::test]
async fn test_get_review_without_assignments_is_not_found() {
    let store = InMemoryStore::new();
    let app = create_test_app(&store).await;
    let members = create_team(&app, "backend", 2).await;

    let (status, _) = get(
        &app,
        &format!("/api/v1/users/getReview?user_id={}", members[0]),
    )
    .await;
    let (invalid, _) = get(&app, "/api/v1/users/getReview?user_id=not-a-uuid").await;

    assert_eq!(status, 404);
    assert_eq!(invalid, 400);
}
