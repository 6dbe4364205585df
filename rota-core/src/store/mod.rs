//! Storage abstraction for teams, users and pull requests.
//!
//! The service depends only on the [`Store`] trait. Implementations can
//! provide different backends (in-memory here, SQLite in `rota-db`).
//!
//! Every read returns values the caller owns. Mutating a returned value has
//! no effect until it is written back through an update operation.

mod memory;

pub use memory::InMemoryStore;

use async_trait::async_trait;

use crate::model::{PullRequest, Stats, User};
use crate::Result;

/// Durable state consumed by the reviewer engine.
///
/// `Err` is reserved for backend failures. Domain outcomes such as a name
/// collision or a missing record are reported through the `bool` / `Option`
/// return values.
#[async_trait]
pub trait Store: Send + Sync {
    /// Create a team and register its members.
    ///
    /// Returns `false` without writing anything if the name is taken.
    async fn create_team(&self, name: &str, members: Vec<User>) -> Result<bool>;

    async fn team_exists(&self, name: &str) -> Result<bool>;

    /// Members of a team ordered by user id, or `None` if the team is unknown.
    async fn list_users_by_team(&self, name: &str) -> Result<Option<Vec<User>>>;

    async fn get_user(&self, id: &str) -> Result<Option<User>>;

    /// Set a user's active flag, returning the updated user.
    async fn set_user_active(&self, id: &str, active: bool) -> Result<Option<User>>;

    /// Insert a pull request. Returns `false` if the id already exists.
    async fn create_pull_request(&self, pr: &PullRequest) -> Result<bool>;

    async fn get_pull_request(&self, id: &str) -> Result<Option<PullRequest>>;

    /// Overwrite a pull request. Returns `false` if the id is unknown.
    async fn update_pull_request(&self, pr: &PullRequest) -> Result<bool>;

    /// Every pull request regardless of status, ordered by id.
    async fn list_pull_requests(&self) -> Result<Vec<PullRequest>>;

    async fn stats(&self) -> Result<Stats>;
}
