//! Statistics endpoint.

use pr_reviewers_lib::repository::InMemoryStore;

use super::test_helpers::*;

#[actix_rt::test]
async fn test_reviewer_counts_busiest_first() {
    let store = InMemoryStore::new();
    let app = create_test_app(&store).await;
    let members = create_team(&app, "backend", 3).await;
    // members[0] authors twice, members[1] once
    create_pull_request(&app, members[0]).await;
    create_pull_request(&app, members[0]).await;
    create_pull_request(&app, members[1]).await;

    let (status, body) = get(&app, "/api/v1/statistics/reviewers").await;

    assert_eq!(status, 200, "{:?}", body);
    let stats = body["reviewers"].as_array().unwrap();
    assert_eq!(stats.len(), 3);
    assert_eq!(stats[0]["reviewer_id"], members[2].to_string());
    assert_eq!(stats[0]["assignment_count"], 3);
    assert_eq!(stats[1]["assignment_count"], 2);
    assert_eq!(stats[2]["reviewer_id"], members[0].to_string());
    assert_eq!(stats[2]["assignment_count"], 1);
}

#[actix_rt::test]
async fn test_no_assignments_is_not_found() {
    let store = InMemoryStore::new();
    let app = create_test_app(&store).await;

    let (status, body) = get(&app, "/api/v1/statistics/reviewers").await;

    assert_eq!(status, 404);
    assert_eq!(body["error"], "NOT_FOUND");
}
