//! Fixtures shared by workflow tests.

use chrono::Utc;
use uuid::Uuid;

use crate::models::{PrReviewer, PrStatus, PrStatusValue, PullRequest, Team, User};
use crate::repository::InMemoryStore;

pub struct SeededTeam {
    pub team: Team,
    pub members: Vec<User>,
}

pub fn user(team_id: Uuid, is_active: bool) -> User {
    let id = Uuid::new_v4();
    User {
        id,
        name: format!("user-{}", &id.simple().to_string()[..8]),
        is_active,
        team_id,
        created_at: Utc::now(),
    }
}

/// Team with `size` active members, committed to the store.
pub async fn seed_team(store: &InMemoryStore, name: &str, size: usize) -> SeededTeam {
    let team = Team {
        id: Uuid::new_v4(),
        name: name.to_string(),
        created_at: Utc::now(),
    };
    let members: Vec<User> = (0..size).map(|_| user(team.id, true)).collect();

    store
        .seed(|t| {
            t.teams.push(team.clone());
            t.users.extend(members.iter().cloned());
        })
        .await;

    SeededTeam { team, members }
}

/// Pull request with the given reviewers, committed to the store.
pub async fn seed_pull_request(
    store: &InMemoryStore,
    author: &User,
    reviewers: &[&User],
    status: PrStatusValue,
) -> PullRequest {
    let status = PrStatus {
        id: Uuid::new_v4(),
        status,
    };
    let pr = PullRequest {
        id: Uuid::new_v4(),
        name: "Seeded change".to_string(),
        author_id: author.id,
        status_id: status.id,
        created_at: Utc::now(),
        merged_at: None,
    };

    store
        .seed(|t| {
            t.statuses.push(status);
            t.pull_requests.push(pr.clone());
            t.reviewers.extend(reviewers.iter().map(|r| PrReviewer {
                id: Uuid::now_v7(),
                pr_id: pr.id,
                reviewer_id: r.id,
            }));
        })
        .await;

    pr
}
