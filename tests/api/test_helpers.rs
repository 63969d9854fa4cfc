//! Shared helpers for API tests.

use std::sync::Arc;

use actix_web::{App, dev::ServiceResponse, test, web};
use pr_reviewers_lib::api::{self, AppState};
use pr_reviewers_lib::repository::InMemoryStore;
use pr_reviewers_lib::services::testing::{FixedClock, ScriptedRandomizer};
use serde_json::{Value, json};
use uuid::Uuid;

/// Reviewers assigned to a new pull request in tests.
pub const MAX_REVIEWERS: usize = 2;

/// Create a test app over `store` with deterministic collaborators.
pub async fn create_test_app(
    store: &InMemoryStore,
) -> impl actix_web::dev::Service<
    actix_http::Request,
    Response = ServiceResponse,
    Error = actix_web::Error,
> {
    let state = AppState::new(
        Arc::new(store.clone()),
        Arc::new(ScriptedRandomizer::identity()),
        Arc::new(FixedClock::default()),
        MAX_REVIEWERS,
    );

    test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(api::configure),
    )
    .await
}

/// Send a request and decode the JSON body, if any.
pub async fn send<S>(app: &S, req: test::TestRequest) -> (u16, Value)
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let resp = test::call_service(app, req.to_request()).await;
    let status = resp.status().as_u16();
    let bytes = test::read_body(resp).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

pub async fn post_json<S>(app: &S, uri: &str, body: Value) -> (u16, Value)
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    send(app, test::TestRequest::post().uri(uri).set_json(body)).await
}

pub async fn patch_json<S>(app: &S, uri: &str, body: Value) -> (u16, Value)
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    send(app, test::TestRequest::patch().uri(uri).set_json(body)).await
}

pub async fn get<S>(app: &S, uri: &str) -> (u16, Value)
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    send(app, test::TestRequest::get().uri(uri)).await
}

/// Create a team of `size` active members through the API.
///
/// Returns member ids in request order.
pub async fn create_team<S>(app: &S, team_name: &str, size: usize) -> Vec<Uuid>
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let ids: Vec<Uuid> = (0..size).map(|_| Uuid::now_v7()).collect();
    let members: Vec<Value> = ids
        .iter()
        .enumerate()
        .map(|(i, id)| json!({ "user_id": id, "username": format!("{team_name}-{i}"), "is_active": true }))
        .collect();

    let (status, body) = post_json(
        app,
        "/api/v1/team/add",
        json!({ "team_name": team_name, "members": members }),
    )
    .await;
    assert_eq!(status, 201, "Team creation should succeed: {:?}", body);
    ids
}

/// Create a pull request through the API and return the response `pr` object.
pub async fn create_pull_request<S>(app: &S, author_id: Uuid) -> Value
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let (status, body) = post_json(
        app,
        "/api/v1/pullRequest/create",
        json!({
            "pull_request_id": Uuid::new_v4(),
            "pull_request_name": "Add feature",
            "author_id": author_id,
        }),
    )
    .await;
    assert_eq!(status, 201, "Pull request creation should succeed: {:?}", body);
    body["pr"].clone()
}

/// Reviewer ids of a `pr` response object.
pub fn reviewers(pr: &Value) -> Vec<Uuid> {
    pr["assigned_reviewers"]
        .as_array()
        .map(|ids| {
            ids.iter()
                .filter_map(|id| id.as_str().and_then(|s| Uuid::parse_str(s).ok()))
                .collect()
        })
        .unwrap_or_default()
}
