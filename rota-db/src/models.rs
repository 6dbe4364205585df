//! Row types and their mapping to domain values

use chrono::{DateTime, Utc};
use rota_core::{PrStatus, PullRequest, User};

use crate::error::{DbError, Result};

/// Row from the `users` table
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub id: String,
    pub username: String,
    pub team_name: String,
    pub is_active: bool,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            username: row.username,
            team_name: row.team_name,
            is_active: row.is_active,
        }
    }
}

/// Row from the `pull_requests` table
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PullRequestRow {
    pub id: String,
    pub name: String,
    pub author_id: String,
    pub status: String,
    pub reviewers_json: String, // JSON array
    pub merged_at: Option<DateTime<Utc>>,
}

impl TryFrom<PullRequestRow> for PullRequest {
    type Error = DbError;

    fn try_from(row: PullRequestRow) -> Result<Self> {
        let status: PrStatus = row
            .status
            .parse()
            .map_err(|_| DbError::InvalidData(format!("pull request {} has status {}", row.id, row.status)))?;
        let assigned_reviewers: Vec<String> = serde_json::from_str(&row.reviewers_json)?;

        Ok(PullRequest {
            id: row.id,
            name: row.name,
            author_id: row.author_id,
            status,
            assigned_reviewers,
            merged_at: row.merged_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(status: &str, reviewers_json: &str) -> PullRequestRow {
        PullRequestRow {
            id: "pr1".to_string(),
            name: "feat".to_string(),
            author_id: "a".to_string(),
            status: status.to_string(),
            reviewers_json: reviewers_json.to_string(),
            merged_at: None,
        }
    }

    #[test]
    fn test_row_to_pull_request() {
        let pr = PullRequest::try_from(row("OPEN", r#"["c","b"]"#)).unwrap();
        assert_eq!(pr.status, PrStatus::Open);
        assert_eq!(pr.assigned_reviewers, vec!["c".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_bad_rows_are_rejected() {
        assert!(matches!(
            PullRequest::try_from(row("DRAFT", "[]")),
            Err(DbError::InvalidData(_))
        ));
        assert!(matches!(
            PullRequest::try_from(row("OPEN", "not json")),
            Err(DbError::Serialization(_))
        ));
    }
}
