//! Reviewer assignment service
//!
//! `ReviewService` is the entry point for every operation: team and user
//! management, the pull request lifecycle, and the team deactivation
//! cascade. It holds a shared [`Store`] and the [`ReviewerPicker`] used for
//! every random pick, and is safe to share across tasks.

mod cascade;
mod pull_request;

use std::sync::Arc;

use tracing::info;

use crate::error::ConflictKind;
use crate::model::{Stats, Team, TeamMember, User};
use crate::selection::ReviewerPicker;
use crate::store::Store;
use crate::{Error, Result};

/// Coordinates the store and the reviewer picker
pub struct ReviewService {
    store: Arc<dyn Store>,
    picker: ReviewerPicker,
}

impl ReviewService {
    pub fn new(store: Arc<dyn Store>, picker: ReviewerPicker) -> Self {
        Self { store, picker }
    }

    /// Get the underlying store
    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    /// Create a team together with its initial members
    pub async fn create_team(&self, team_name: &str, members: Vec<TeamMember>) -> Result<Team> {
        let team_name = team_name.trim();
        if team_name.is_empty() {
            return Err(Error::validation("team_name is required"));
        }

        let mut users = Vec::with_capacity(members.len());
        for member in members {
            let user_id = member.user_id.trim();
            let username = member.username.trim();
            if user_id.is_empty() || username.is_empty() {
                return Err(Error::validation("user_id and username are required"));
            }
            users.push(User::new(user_id, username, team_name, member.is_active));
        }

        let member_count = users.len();
        if !self.store.create_team(team_name, users).await? {
            return Err(Error::conflict(
                ConflictKind::TeamExists,
                format!("team {} already exists", team_name),
            ));
        }

        info!(team = %team_name, members = member_count, "Team created");
        self.get_team(team_name).await
    }

    /// Look up a team and its members
    pub async fn get_team(&self, team_name: &str) -> Result<Team> {
        let team_name = team_name.trim();
        if team_name.is_empty() {
            return Err(Error::validation("team_name is required"));
        }

        let members = self
            .store
            .list_users_by_team(team_name)
            .await?
            .ok_or_else(|| Error::not_found(format!("team {} not found", team_name)))?;

        Ok(Team {
            name: team_name.to_string(),
            members,
        })
    }

    /// Toggle a single user's active flag.
    ///
    /// This does not touch any pull request the user reviews; use
    /// [`ReviewService::deactivate_team_and_reassign`] for that.
    pub async fn set_user_active(&self, user_id: &str, active: bool) -> Result<User> {
        let user_id = user_id.trim();
        if user_id.is_empty() {
            return Err(Error::validation("user_id is required"));
        }

        let user = self
            .store
            .set_user_active(user_id, active)
            .await?
            .ok_or_else(|| Error::not_found(format!("user {} not found", user_id)))?;

        info!(user = %user.id, active, "User activity updated");
        Ok(user)
    }

    pub async fn stats(&self) -> Result<Stats> {
        self.store.stats().await
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::store::InMemoryStore;

    /// Service over a fresh in-memory store with a fixed seed
    pub fn seeded_service(seed: u64) -> (ReviewService, Arc<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::new());
        let service = ReviewService::new(store.clone(), ReviewerPicker::from_seed(seed));
        (service, store)
    }

    /// Create a team from `(id, active)` pairs
    pub async fn add_team(service: &ReviewService, name: &str, members: &[(&str, bool)]) {
        let members = members
            .iter()
            .map(|(id, active)| TeamMember::new(*id, format!("user-{}", id), *active))
            .collect();
        service.create_team(name, members).await.unwrap();
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use crate::error::ErrorCode;

    #[tokio::test]
    async fn test_create_and_get_team() {
        let (service, _store) = seeded_service(1);
        let team = service
            .create_team(
                " core ",
                vec![
                    TeamMember::new("u1", "alice", true),
                    TeamMember::new("u2", "bob", false),
                ],
            )
            .await
            .unwrap();

        assert_eq!(team.name, "core");
        assert_eq!(team.members.len(), 2);
        assert!(team.members.iter().all(|u| u.team_name == "core"));

        let fetched = service.get_team("core").await.unwrap();
        assert_eq!(fetched, team);
    }

    #[tokio::test]
    async fn test_duplicate_team() {
        let (service, _store) = seeded_service(1);
        add_team(&service, "core", &[("u1", true)]).await;

        let err = service.create_team("core", vec![]).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::TeamExists);
    }

    #[tokio::test]
    async fn test_team_validation() {
        let (service, _store) = seeded_service(1);

        let err = service.create_team("  ", vec![]).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::BadRequest);

        let err = service
            .create_team("core", vec![TeamMember::new("u1", "", true)])
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::BadRequest);

        // nothing was created by the rejected call
        assert_eq!(
            service.get_team("core").await.unwrap_err().code(),
            ErrorCode::NotFound
        );
    }

    #[tokio::test]
    async fn test_set_user_active() {
        let (service, _store) = seeded_service(1);
        add_team(&service, "core", &[("u1", true)]).await;

        let user = service.set_user_active("u1", false).await.unwrap();
        assert!(!user.is_active);

        let err = service.set_user_active("nobody", true).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotFound);

        let err = service.set_user_active("", true).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::BadRequest);
    }
}
