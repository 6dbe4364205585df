//! Rendering of command results as text or JSON

use chrono::SecondsFormat;
use rota_core::{DeactivationReport, PullRequest, Reassignment, Stats, Team, User};
use serde::Serialize;
use serde_json::json;

#[derive(Debug, Serialize)]
pub struct PullRequestView {
    pub pull_request_id: String,
    pub pull_request_name: String,
    pub author_id: String,
    pub status: String,
    pub assigned_reviewers: Vec<String>,
    #[serde(rename = "mergedAt", skip_serializing_if = "Option::is_none")]
    pub merged_at: Option<String>,
}

impl From<&PullRequest> for PullRequestView {
    fn from(pr: &PullRequest) -> Self {
        Self {
            pull_request_id: pr.id.clone(),
            pull_request_name: pr.name.clone(),
            author_id: pr.author_id.clone(),
            status: pr.status.to_string(),
            assigned_reviewers: pr.assigned_reviewers.clone(),
            merged_at: pr
                .merged_at
                .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true)),
        }
    }
}

/// Short form used in review listings
#[derive(Debug, Serialize)]
pub struct PullRequestShort {
    pub pull_request_id: String,
    pub pull_request_name: String,
    pub author_id: String,
    pub status: String,
}

impl From<&PullRequest> for PullRequestShort {
    fn from(pr: &PullRequest) -> Self {
        Self {
            pull_request_id: pr.id.clone(),
            pull_request_name: pr.name.clone(),
            author_id: pr.author_id.clone(),
            status: pr.status.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MemberView {
    pub user_id: String,
    pub username: String,
    pub is_active: bool,
}

#[derive(Debug, Serialize)]
pub struct TeamView {
    pub team_name: String,
    pub members: Vec<MemberView>,
}

impl From<&Team> for TeamView {
    fn from(team: &Team) -> Self {
        Self {
            team_name: team.name.clone(),
            members: team
                .members
                .iter()
                .map(|m| MemberView {
                    user_id: m.id.clone(),
                    username: m.username.clone(),
                    is_active: m.is_active,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserView {
    pub user_id: String,
    pub username: String,
    pub team_name: String,
    pub is_active: bool,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id.clone(),
            username: user.username.clone(),
            team_name: user.team_name.clone(),
            is_active: user.is_active,
        }
    }
}

/// Writes results to stdout in the selected format
#[derive(Debug, Clone, Copy)]
pub struct Printer {
    json: bool,
}

impl Printer {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    pub fn is_json(&self) -> bool {
        self.json
    }

    fn emit(&self, value: serde_json::Value) -> anyhow::Result<()> {
        println!("{}", serde_json::to_string_pretty(&value)?);
        Ok(())
    }

    pub fn pull_request(&self, pr: &PullRequest) -> anyhow::Result<()> {
        if self.json {
            return self.emit(json!({ "pr": PullRequestView::from(pr) }));
        }
        print_pull_request(pr);
        Ok(())
    }

    pub fn reassignment(&self, result: &Reassignment) -> anyhow::Result<()> {
        if self.json {
            return self.emit(json!({
                "pr": PullRequestView::from(&result.pull_request),
                "replaced_by": result.replaced_by,
            }));
        }
        println!("Replaced by: {}", result.replaced_by);
        print_pull_request(&result.pull_request);
        Ok(())
    }

    pub fn team(&self, team: &Team) -> anyhow::Result<()> {
        if self.json {
            return self.emit(json!({ "team": TeamView::from(team) }));
        }
        println!("Team: {}", team.name);
        if team.members.is_empty() {
            println!("  (no members)");
        }
        for member in &team.members {
            println!(
                "  {:<16} {:<20} {}",
                member.id,
                member.username,
                if member.is_active { "active" } else { "inactive" }
            );
        }
        Ok(())
    }

    pub fn user(&self, user: &User) -> anyhow::Result<()> {
        if self.json {
            return self.emit(json!({ "user": UserView::from(user) }));
        }
        println!(
            "{} ({}) team={} {}",
            user.id,
            user.username,
            user.team_name,
            if user.is_active { "active" } else { "inactive" }
        );
        Ok(())
    }

    pub fn reviews(&self, user_id: &str, prs: &[PullRequest]) -> anyhow::Result<()> {
        if self.json {
            let prs: Vec<_> = prs.iter().map(PullRequestShort::from).collect();
            return self.emit(json!({ "user_id": user_id, "pull_requests": prs }));
        }
        if prs.is_empty() {
            println!("No reviews assigned to {}.", user_id);
            return Ok(());
        }
        println!("Reviews assigned to {}:", user_id);
        for pr in prs {
            println!("  {:<16} {:<8} {} (by {})", pr.id, pr.status, pr.name, pr.author_id);
        }
        Ok(())
    }

    pub fn deactivation(&self, report: &DeactivationReport) -> anyhow::Result<()> {
        if self.json {
            return self.emit(serde_json::to_value(report)?);
        }
        println!("Team: {}", report.team_name);
        println!("Deactivated users: {}", join_or_none(&report.deactivated_user_ids));
        println!(
            "Updated pull requests: {}",
            join_or_none(&report.updated_pull_request_ids)
        );
        Ok(())
    }

    pub fn stats(&self, stats: &Stats) -> anyhow::Result<()> {
        if self.json {
            return self.emit(serde_json::to_value(stats)?);
        }
        println!("Pull requests by status:");
        if stats.pr_statuses.is_empty() {
            println!("  (none)");
        }
        for (status, count) in &stats.pr_statuses {
            println!("  {:<8} {}", status, count);
        }
        println!();
        println!("Review assignments:");
        if stats.review_assignments.is_empty() {
            println!("  (none)");
        }
        for (user_id, count) in &stats.review_assignments {
            println!("  {:<16} {}", user_id, count);
        }
        Ok(())
    }
}

fn print_pull_request(pr: &PullRequest) {
    println!("Pull request: {} ({})", pr.id, pr.name);
    println!("  author:    {}", pr.author_id);
    println!("  status:    {}", pr.status);
    println!("  reviewers: {}", join_or_none(&pr.assigned_reviewers));
    if let Some(merged_at) = pr.merged_at {
        println!("  merged at: {}", merged_at.to_rfc3339_opts(SecondsFormat::Secs, true));
    }
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "(none)".to_string()
    } else {
        items.join(", ")
    }
}

/// JSON body for a failed command
pub fn error_json(err: &anyhow::Error) -> serde_json::Value {
    match err.downcast_ref::<rota_core::Error>() {
        Some(err) => json!({ "error": err.body() }),
        None => {
            tracing::error!(error = %format!("{:#}", err), "Command failed");
            json!({
                "error": {
                    "code": rota_core::ErrorCode::InternalError,
                    "message": "internal error",
                }
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rota_core::{ConflictKind, Error, PrStatus};

    #[test]
    fn test_pull_request_view_fields() {
        let mut pr = PullRequest::open("pr1", "feat", "a", vec!["b".into()]);
        let value = serde_json::to_value(PullRequestView::from(&pr)).unwrap();
        assert_eq!(value["pull_request_id"], "pr1");
        assert_eq!(value["status"], "OPEN");
        assert!(value.get("mergedAt").is_none());

        pr.status = PrStatus::Merged;
        pr.merged_at = Some(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap());
        let value = serde_json::to_value(PullRequestView::from(&pr)).unwrap();
        assert_eq!(value["mergedAt"], "2024-05-01T12:00:00Z");
        assert_eq!(value["assigned_reviewers"], json!(["b"]));
    }

    #[test]
    fn test_team_view_fields() {
        let team = Team {
            name: "core".to_string(),
            members: vec![User::new("u1", "alice", "core", false)],
        };
        let value = serde_json::to_value(TeamView::from(&team)).unwrap();
        assert_eq!(value["team_name"], "core");
        assert_eq!(value["members"][0]["user_id"], "u1");
        assert_eq!(value["members"][0]["is_active"], false);
    }

    #[test]
    fn test_error_json_uses_domain_code() {
        let err = anyhow::Error::new(Error::conflict(ConflictKind::PrMerged, "cannot reassign on merged PR"));
        let value = error_json(&err);
        assert_eq!(value["error"]["code"], "PR_MERGED");
        assert_eq!(value["error"]["message"], "cannot reassign on merged PR");

        let err = anyhow::Error::new(Error::Store("disk I/O error".to_string()));
        assert_eq!(error_json(&err)["error"]["message"], "internal error");

        let value = error_json(&anyhow::anyhow!("failed to open /var/lib/rota/rota.db"));
        assert_eq!(value["error"]["code"], "INTERNAL_ERROR");
        assert_eq!(value["error"]["message"], "internal error");
    }
}
