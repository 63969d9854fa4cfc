//! Pull request endpoints.

use pr_reviewers_lib::repository::InMemoryStore;
use serde_json::json;
use uuid::Uuid;

use super::test_helpers::*;

#[actix_rt::test]
async fn test_create_assigns_active_teammates_except_author() {
    let store = InMemoryStore::new();
    let app = create_test_app(&store).await;
    let members = create_team(&app, "backend", 3).await;

    let pr = create_pull_request(&app, members[0]).await;

    assert_eq!(pr["status"], "OPEN");
    assert_eq!(pr["author_id"], members[0].to_string());
    assert_eq!(reviewers(&pr), vec![members[1], members[2]]);
    assert!(pr["merged_at"].is_null());
}

#[actix_rt::test]
async fn test_create_caps_reviewer_count() {
    let store = InMemoryStore::new();
    let app = create_test_app(&store).await;
    let members = create_team(&app, "backend", 5).await;

    let pr = create_pull_request(&app, members[0]).await;

    let assigned = reviewers(&pr);
    assert_eq!(assigned.len(), MAX_REVIEWERS);
    assert!(!assigned.contains(&members[0]));
}

#[actix_rt::test]
async fn test_create_for_lone_author_has_no_reviewers() {
    let store = InMemoryStore::new();
    let app = create_test_app(&store).await;
    let members = create_team(&app, "solo", 1).await;

    let pr = create_pull_request(&app, members[0]).await;

    assert!(reviewers(&pr).is_empty());
}

#[actix_rt::test]
async fn test_create_rejects_duplicate_id_and_unknown_author() {
    let store = InMemoryStore::new();
    let app = create_test_app(&store).await;
    let members = create_team(&app, "backend", 2).await;
    let pr_id = Uuid::new_v4();
    let payload = json!({
        "pull_request_id": pr_id,
        "pull_request_name": "Add feature",
        "author_id": members[0],
    });

    let (first, _) = post_json(&app, "/api/v1/pullRequest/create", payload.clone()).await;
    let (duplicate, body) = post_json(&app, "/api/v1/pullRequest/create", payload).await;
    let (unknown, _) = post_json(
        &app,
        "/api/v1/pullRequest/create",
        json!({
            "pull_request_id": Uuid::new_v4(),
            "pull_request_name": "Add feature",
            "author_id": Uuid::new_v4(),
        }),
    )
    .await;

    assert_eq!(first, 201);
    assert_eq!(duplicate, 400);
    assert_eq!(body["error"], "PR_EXISTS");
    assert_eq!(unknown, 404);
}

#[actix_rt::test]
async fn test_merge_is_idempotent() {
    let store = InMemoryStore::new();
    let app = create_test_app(&store).await;
    let members = create_team(&app, "backend", 3).await;
    let pr = create_pull_request(&app, members[0]).await;
    let payload = json!({ "pull_request_id": pr["pull_request_id"] });

    let (first, merged) = post_json(&app, "/api/v1/pullRequest/merge", payload.clone()).await;
    let writes = store.write_count();
    let (second, again) = post_json(&app, "/api/v1/pullRequest/merge", payload).await;

    assert_eq!(first, 200);
    assert_eq!(merged["pr"]["status"], "MERGED");
    assert!(merged["pr"]["merged_at"].is_string());
    assert_eq!(second, 200);
    assert_eq!(again["pr"]["merged_at"], merged["pr"]["merged_at"]);
    assert_eq!(store.write_count(), writes);
}

#[actix_rt::test]
async fn test_merge_unknown_pull_request_is_not_found() {
    let store = InMemoryStore::new();
    let app = create_test_app(&store).await;

    let (status, body) = post_json(
        &app,
        "/api/v1/pullRequest/merge",
        json!({ "pull_request_id": Uuid::new_v4() }),
    )
    .await;

    assert_eq!(status, 404);
    assert_eq!(body["error"], "NOT_FOUND");
}

#[actix_rt::test]
async fn test_reassign_replaces_reviewer_in_place() {
    let store = InMemoryStore::new();
    let app = create_test_app(&store).await;
    let members = create_team(&app, "backend", 4).await;
    let pr = create_pull_request(&app, members[0]).await;
    assert_eq!(reviewers(&pr), vec![members[1], members[2]]);

    let (status, body) = post_json(
        &app,
        "/api/v1/pullRequest/reassign",
        json!({ "pull_request_id": pr["pull_request_id"], "old_reviewer_id": members[1] }),
    )
    .await;

    assert_eq!(status, 200, "{:?}", body);
    assert_eq!(body["replaced_by"], members[3].to_string());
    let assigned = reviewers(&body["pr"]);
    assert!(assigned.contains(&members[3]));
    assert!(assigned.contains(&members[2]));
    assert!(!assigned.contains(&members[1]));
}

#[actix_rt::test]
async fn test_reassign_without_candidates_changes_nothing() {
    let store = InMemoryStore::new();
    let app = create_test_app(&store).await;
    let members = create_team(&app, "backend", 3).await;
    let pr = create_pull_request(&app, members[0]).await;

    let (status, body) = post_json(
        &app,
        "/api/v1/pullRequest/reassign",
        json!({ "pull_request_id": pr["pull_request_id"], "old_reviewer_id": members[1] }),
    )
    .await;

    assert_eq!(status, 404);
    assert_eq!(body["error"], "NO_CANDIDATE");
    let pr_id = Uuid::parse_str(pr["pull_request_id"].as_str().unwrap()).unwrap();
    assert_eq!(
        store.snapshot().await.reviewer_ids(pr_id),
        vec![members[1], members[2]]
    );
}

#[actix_rt::test]
async fn test_reassign_on_merged_pull_request_conflicts() {
    let store = InMemoryStore::new();
    let app = create_test_app(&store).await;
    let members = create_team(&app, "backend", 4).await;
    let pr = create_pull_request(&app, members[0]).await;
    post_json(
        &app,
        "/api/v1/pullRequest/merge",
        json!({ "pull_request_id": pr["pull_request_id"] }),
    )
    .await;

    let (status, body) = post_json(
        &app,
        "/api/v1/pullRequest/reassign",
        json!({ "pull_request_id": pr["pull_request_id"], "old_reviewer_id": members[1] }),
    )
    .await;

    assert_eq!(status, 409);
    assert_eq!(body["error"], "PR_MERGED");
}

#[actix_rt::test]
async fn test_reassign_unassigned_reviewer_is_not_found() {
    let store = InMemoryStore::new();
    let app = create_test_app(&store).await;
    let members = create_team(&app, "backend", 4).await;
    let pr = create_pull_request(&app, members[0]).await;

    let (status, _) = post_json(
        &app,
        "/api/v1/pullRequest/reassign",
        json!({ "pull_request_id": pr["pull_request_id"], "old_reviewer_id": members[3] }),
    )
    .await;

    assert_eq!(status, 404);
}

#[actix_rt::test]
async fn test_storage_failure_rolls_back_creation() {
    let store = InMemoryStore::new();
    let app = create_test_app(&store).await;
    let members = create_team(&app, "backend", 3).await;
    store.fail_after("save_pr_reviewer", 1);

    let (status, body) = post_json(
        &app,
        "/api/v1/pullRequest/create",
        json!({
            "pull_request_id": Uuid::new_v4(),
            "pull_request_name": "Add feature",
            "author_id": members[0],
        }),
    )
    .await;

    assert_eq!(status, 500);
    assert_eq!(body["error"], "INTERNAL_ERROR");
    let snapshot = store.snapshot().await;
    assert!(snapshot.pull_requests.is_empty());
    assert!(snapshot.reviewers.is_empty());
}
