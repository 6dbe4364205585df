//! SQLite implementation of the [`Store`] trait

use async_trait::async_trait;
use rota_core::{PrStatus, PullRequest, Stats, Store, User};
use sqlx::SqlitePool;

use crate::connection::Database;
use crate::error::{DbError, Result};
use crate::models::{PullRequestRow, UserRow};

const PULL_REQUEST_COLUMNS: &str = "id, name, author_id, status, reviewers_json, merged_at";

/// SQLite-backed store.
///
/// Each call runs its own statements; only team creation is wrapped in a
/// transaction. Pull request updates overwrite the whole row.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(db: &Database) -> Self {
        Self {
            pool: db.pool().clone(),
        }
    }

    async fn insert_team(&self, name: &str, members: Vec<User>) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query("INSERT INTO teams (name) VALUES (?) ON CONFLICT(name) DO NOTHING")
            .bind(name)
            .execute(&mut *tx)
            .await?;
        if inserted.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        for user in &members {
            sqlx::query(
                r#"
                INSERT INTO users (id, username, team_name, is_active)
                VALUES (?, ?, ?, ?)
                ON CONFLICT(id) DO UPDATE SET
                    username = excluded.username,
                    team_name = excluded.team_name,
                    is_active = excluded.is_active
                "#,
            )
            .bind(&user.id)
            .bind(&user.username)
            .bind(name)
            .bind(user.is_active)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(true)
    }

    async fn has_team(&self, name: &str) -> Result<bool> {
        let row: Option<(String,)> = sqlx::query_as("SELECT name FROM teams WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    async fn team_members(&self, name: &str) -> Result<Option<Vec<User>>> {
        if !self.has_team(name).await? {
            return Ok(None);
        }

        let rows = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, team_name, is_active FROM users WHERE team_name = ? ORDER BY id",
        )
        .bind(name)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(rows.into_iter().map(User::from).collect()))
    }

    async fn find_user(&self, id: &str) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, team_name, is_active FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    async fn update_user_active(&self, id: &str, active: bool) -> Result<Option<User>> {
        let result = sqlx::query("UPDATE users SET is_active = ? WHERE id = ?")
            .bind(active)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.find_user(id).await
    }

    async fn insert_pull_request(&self, pr: &PullRequest) -> Result<bool> {
        let reviewers_json = serde_json::to_string(&pr.assigned_reviewers)?;

        let result = sqlx::query(
            r#"
            INSERT INTO pull_requests (id, name, author_id, status, reviewers_json, merged_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO NOTHING
            "#,
        )
        .bind(&pr.id)
        .bind(&pr.name)
        .bind(&pr.author_id)
        .bind(pr.status.as_str())
        .bind(&reviewers_json)
        .bind(pr.merged_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn find_pull_request(&self, id: &str) -> Result<Option<PullRequest>> {
        let row = sqlx::query_as::<_, PullRequestRow>(&format!(
            "SELECT {} FROM pull_requests WHERE id = ?",
            PULL_REQUEST_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(PullRequest::try_from).transpose()
    }

    async fn overwrite_pull_request(&self, pr: &PullRequest) -> Result<bool> {
        let reviewers_json = serde_json::to_string(&pr.assigned_reviewers)?;

        let result = sqlx::query(
            r#"
            UPDATE pull_requests
               SET name = ?, author_id = ?, status = ?, reviewers_json = ?, merged_at = ?
             WHERE id = ?
            "#,
        )
        .bind(&pr.name)
        .bind(&pr.author_id)
        .bind(pr.status.as_str())
        .bind(&reviewers_json)
        .bind(pr.merged_at)
        .bind(&pr.id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn all_pull_requests(&self) -> Result<Vec<PullRequest>> {
        let rows = sqlx::query_as::<_, PullRequestRow>(&format!(
            "SELECT {} FROM pull_requests ORDER BY id",
            PULL_REQUEST_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(PullRequest::try_from).collect()
    }

    async fn count_stats(&self) -> Result<Stats> {
        let mut stats = Stats::default();

        let statuses = sqlx::query_as::<_, (String, i64)>(
            "SELECT status, COUNT(*) FROM pull_requests GROUP BY status",
        )
        .fetch_all(&self.pool)
        .await?;
        for (status, count) in statuses {
            let status: PrStatus = status
                .parse()
                .map_err(|_| DbError::InvalidData(format!("unknown status {}", status)))?;
            stats.pr_statuses.insert(status, count as u64);
        }

        let assignments = sqlx::query_as::<_, (String, i64)>(
            r#"
            SELECT reviewer.value, COUNT(*)
              FROM pull_requests, json_each(pull_requests.reviewers_json) AS reviewer
             GROUP BY reviewer.value
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        for (user_id, count) in assignments {
            stats.review_assignments.insert(user_id, count as u64);
        }

        Ok(stats)
    }
}

#[async_trait]
impl Store for SqliteStore {
    async fn create_team(&self, name: &str, members: Vec<User>) -> rota_core::Result<bool> {
        Ok(self.insert_team(name, members).await?)
    }

    async fn team_exists(&self, name: &str) -> rota_core::Result<bool> {
        Ok(self.has_team(name).await?)
    }

    async fn list_users_by_team(&self, name: &str) -> rota_core::Result<Option<Vec<User>>> {
        Ok(self.team_members(name).await?)
    }

    async fn get_user(&self, id: &str) -> rota_core::Result<Option<User>> {
        Ok(self.find_user(id).await?)
    }

    async fn set_user_active(&self, id: &str, active: bool) -> rota_core::Result<Option<User>> {
        Ok(self.update_user_active(id, active).await?)
    }

    async fn create_pull_request(&self, pr: &PullRequest) -> rota_core::Result<bool> {
        Ok(self.insert_pull_request(pr).await?)
    }

    async fn get_pull_request(&self, id: &str) -> rota_core::Result<Option<PullRequest>> {
        Ok(self.find_pull_request(id).await?)
    }

    async fn update_pull_request(&self, pr: &PullRequest) -> rota_core::Result<bool> {
        Ok(self.overwrite_pull_request(pr).await?)
    }

    async fn list_pull_requests(&self) -> rota_core::Result<Vec<PullRequest>> {
        Ok(self.all_pull_requests().await?)
    }

    async fn stats(&self) -> rota_core::Result<Stats> {
        Ok(self.count_stats().await?)
    }
}
