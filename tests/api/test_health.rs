//! Health, readiness and info endpoints.

use pr_reviewers_lib::repository::InMemoryStore;

use super::test_helpers::*;

#[actix_rt::test]
async fn test_health_reports_healthy() {
    let store = InMemoryStore::new();
    let app = create_test_app(&store).await;

    let (status, body) = get(&app, "/api/v1/health").await;

    assert_eq!(status, 200);
    assert_eq!(body["status"], "healthy");
}

#[actix_rt::test]
async fn test_ready_when_store_accepts_transactions() {
    let store = InMemoryStore::new();
    let app = create_test_app(&store).await;

    let (status, body) = get(&app, "/api/v1/ready").await;

    assert_eq!(status, 200);
    assert_eq!(body["database"], "connected");
}

#[actix_rt::test]
async fn test_not_ready_when_store_rejects_transactions() {
    let store = InMemoryStore::new();
    let app = create_test_app(&store).await;
    store.fail_on("begin");

    let (status, body) = get(&app, "/api/v1/ready").await;

    assert_eq!(status, 503);
    assert_eq!(body["error"], "NOT_READY");
}

#[actix_rt::test]
async fn test_info_counts_business_events() {
    let store = InMemoryStore::new();
    let app = create_test_app(&store).await;
    let members = create_team(&app, "backend", 3).await;
    create_pull_request(&app, members[0]).await;

    let (status, body) = get(&app, "/api/v1/info").await;

    assert_eq!(status, 200);
    assert_eq!(body["counters"]["teams_created"], 1);
    assert_eq!(body["counters"]["users_upserted"], 3);
    assert_eq!(body["counters"]["pull_requests_created"], 1);
    assert_eq!(body["counters"]["reviewers_assigned"], 2);
}
