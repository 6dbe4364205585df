//! In-memory implementation of [`Store`].
//!
//! All state is held in process memory and lost on exit.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::Store;
use crate::model::{PullRequest, Stats, User};
use crate::Result;

#[derive(Debug, Default)]
struct Inner {
    teams: BTreeSet<String>,
    users: BTreeMap<String, User>,
    pull_requests: BTreeMap<String, PullRequest>,
}

/// In-memory store.
///
/// Teams, users and pull requests live in ordered maps behind a single
/// `RwLock`; reads clone out of the lock.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    inner: RwLock<Inner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn create_team(&self, name: &str, members: Vec<User>) -> Result<bool> {
        let mut inner = self.inner.write().await;
        if inner.teams.contains(name) {
            return Ok(false);
        }

        inner.teams.insert(name.to_string());
        for mut user in members {
            user.team_name = name.to_string();
            inner.users.insert(user.id.clone(), user);
        }
        Ok(true)
    }

    async fn team_exists(&self, name: &str) -> Result<bool> {
        Ok(self.inner.read().await.teams.contains(name))
    }

    async fn list_users_by_team(&self, name: &str) -> Result<Option<Vec<User>>> {
        let inner = self.inner.read().await;
        if !inner.teams.contains(name) {
            return Ok(None);
        }

        Ok(Some(
            inner
                .users
                .values()
                .filter(|u| u.team_name == name)
                .cloned()
                .collect(),
        ))
    }

    async fn get_user(&self, id: &str) -> Result<Option<User>> {
        Ok(self.inner.read().await.users.get(id).cloned())
    }

    async fn set_user_active(&self, id: &str, active: bool) -> Result<Option<User>> {
        let mut inner = self.inner.write().await;
        Ok(inner.users.get_mut(id).map(|user| {
            user.is_active = active;
            user.clone()
        }))
    }

    async fn create_pull_request(&self, pr: &PullRequest) -> Result<bool> {
        let mut inner = self.inner.write().await;
        if inner.pull_requests.contains_key(&pr.id) {
            return Ok(false);
        }
        inner.pull_requests.insert(pr.id.clone(), pr.clone());
        Ok(true)
    }

    async fn get_pull_request(&self, id: &str) -> Result<Option<PullRequest>> {
        Ok(self.inner.read().await.pull_requests.get(id).cloned())
    }

    async fn update_pull_request(&self, pr: &PullRequest) -> Result<bool> {
        let mut inner = self.inner.write().await;
        match inner.pull_requests.get_mut(&pr.id) {
            Some(existing) => {
                *existing = pr.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_pull_requests(&self) -> Result<Vec<PullRequest>> {
        Ok(self
            .inner
            .read()
            .await
            .pull_requests
            .values()
            .cloned()
            .collect())
    }

    async fn stats(&self) -> Result<Stats> {
        let inner = self.inner.read().await;
        Ok(Stats::from_pull_requests(inner.pull_requests.values()))
    }
}
