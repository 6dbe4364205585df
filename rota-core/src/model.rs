//! Domain model for teams, users and pull requests

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Error;

/// Number of reviewers the engine tries to keep on every open pull request
pub const TARGET_REVIEWERS: usize = 2;

/// A team member. Belongs to exactly one team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub team_name: String,
    pub is_active: bool,
}

impl User {
    pub fn new(
        id: impl Into<String>,
        username: impl Into<String>,
        team_name: impl Into<String>,
        is_active: bool,
    ) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            team_name: team_name.into(),
            is_active,
        }
    }
}

/// Member record supplied when creating a team
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
    pub user_id: String,
    pub username: String,
    pub is_active: bool,
}

impl TeamMember {
    pub fn new(user_id: impl Into<String>, username: impl Into<String>, is_active: bool) -> Self {
        Self {
            user_id: user_id.into(),
            username: username.into(),
            is_active,
        }
    }
}

/// A team and its current members.
///
/// Membership is derived from each user's `team_name`; it is never stored
/// as a list of its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    pub members: Vec<User>,
}

/// Pull request status
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PrStatus {
    Open,
    Merged,
}

impl PrStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrStatus::Open => "OPEN",
            PrStatus::Merged => "MERGED",
        }
    }
}

impl std::fmt::Display for PrStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PrStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OPEN" => Ok(PrStatus::Open),
            "MERGED" => Ok(PrStatus::Merged),
            other => Err(Error::Store(format!("unknown pull request status: {}", other))),
        }
    }
}

/// A pull request and its assigned reviewers.
///
/// Reviewer order is significant: reassignment replaces a reviewer in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    pub id: String,
    pub name: String,
    pub author_id: String,
    pub status: PrStatus,
    pub assigned_reviewers: Vec<String>,
    pub merged_at: Option<DateTime<Utc>>,
}

impl PullRequest {
    /// Create an open pull request with the given reviewers
    pub fn open(
        id: impl Into<String>,
        name: impl Into<String>,
        author_id: impl Into<String>,
        assigned_reviewers: Vec<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            author_id: author_id.into(),
            status: PrStatus::Open,
            assigned_reviewers,
            merged_at: None,
        }
    }

    pub fn is_merged(&self) -> bool {
        self.status == PrStatus::Merged
    }

    pub fn has_reviewer(&self, user_id: &str) -> bool {
        self.assigned_reviewers.iter().any(|id| id == user_id)
    }

    /// Slot index of a reviewer, if assigned
    pub fn reviewer_position(&self, user_id: &str) -> Option<usize> {
        self.assigned_reviewers.iter().position(|id| id == user_id)
    }
}

/// Outcome of a single-reviewer reassignment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reassignment {
    pub pull_request: PullRequest,
    pub replaced_by: String,
}

/// Outcome of a team deactivation cascade
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeactivationReport {
    pub team_name: String,
    /// Users that went from active to inactive
    pub deactivated_user_ids: Vec<String>,
    /// Open pull requests whose reviewer set changed
    pub updated_pull_request_ids: Vec<String>,
}

/// Aggregate counters over the store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    /// Number of pull requests each user is assigned to review
    pub review_assignments: BTreeMap<String, u64>,
    /// Number of pull requests per status
    pub pr_statuses: BTreeMap<PrStatus, u64>,
}

impl Stats {
    /// Tally stats over a set of pull requests
    pub fn from_pull_requests<'a>(prs: impl IntoIterator<Item = &'a PullRequest>) -> Self {
        let mut stats = Stats::default();
        for pr in prs {
            *stats.pr_statuses.entry(pr.status).or_insert(0) += 1;
            for reviewer in &pr.assigned_reviewers {
                *stats.review_assignments.entry(reviewer.clone()).or_insert(0) += 1;
            }
        }
        stats
    }
}
