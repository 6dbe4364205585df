//! Team deactivation cascade
//!
//! Deactivating a team marks every active member inactive, then walks all
//! open pull requests and tops up any whose reviewers were lost. Progress is
//! not rolled back: if the store fails halfway, the deactivations and
//! repairs already written stay in place.

use std::collections::HashSet;

use tracing::{debug, info, warn};

use super::ReviewService;
use crate::model::{DeactivationReport, PullRequest, User, TARGET_REVIEWERS};
use crate::{Error, Result};

impl ReviewService {
    /// Deactivate every member of a team and repair affected open pull requests.
    ///
    /// Only users that were active are reported as deactivated, and only pull
    /// requests whose reviewer set changed are reported as updated. When no
    /// member changes state, pull requests are not scanned at all.
    pub async fn deactivate_team_and_reassign(&self, team_name: &str) -> Result<DeactivationReport> {
        let team_name = team_name.trim();
        if team_name.is_empty() {
            return Err(Error::validation("team_name is required"));
        }

        let members = self
            .store
            .list_users_by_team(team_name)
            .await?
            .ok_or_else(|| Error::not_found(format!("team {} not found", team_name)))?;

        let mut deactivated_user_ids = Vec::new();
        for member in members.iter().filter(|u| u.is_active) {
            if let Some(user) = self.store.set_user_active(&member.id, false).await? {
                deactivated_user_ids.push(user.id);
            }
        }

        if deactivated_user_ids.is_empty() {
            debug!(team = %team_name, "No active members; skipping pull request scan");
            return Ok(DeactivationReport {
                team_name: team_name.to_string(),
                ..Default::default()
            });
        }

        let deactivated: HashSet<String> = deactivated_user_ids.iter().cloned().collect();
        let mut updated_pull_request_ids = Vec::new();
        for pr in self.store.list_pull_requests().await? {
            if pr.is_merged() {
                continue;
            }
            if let Some(repaired) = self.repair_pull_request(pr, &deactivated).await? {
                updated_pull_request_ids.push(repaired.id);
            }
        }

        info!(
            team = %team_name,
            deactivated = deactivated_user_ids.len(),
            updated = updated_pull_request_ids.len(),
            "Team deactivated"
        );
        Ok(DeactivationReport {
            team_name: team_name.to_string(),
            deactivated_user_ids,
            updated_pull_request_ids,
        })
    }

    /// Drop unavailable reviewers from one open pull request and top it up.
    ///
    /// Returns the persisted pull request, or `None` if nothing changed or the
    /// pull request had to be skipped.
    async fn repair_pull_request(
        &self,
        mut pr: PullRequest,
        deactivated: &HashSet<String>,
    ) -> Result<Option<PullRequest>> {
        let mut still_valid: Vec<String> = Vec::with_capacity(pr.assigned_reviewers.len());
        let mut dropped = 0usize;
        for reviewer_id in &pr.assigned_reviewers {
            if deactivated.contains(reviewer_id) || still_valid.contains(reviewer_id) {
                dropped += 1;
                continue;
            }
            match self.store.get_user(reviewer_id).await? {
                Some(user) if user.is_active => still_valid.push(reviewer_id.clone()),
                _ => dropped += 1,
            }
        }

        if dropped == 0 {
            return Ok(None);
        }

        let Some(author) = self.store.get_user(&pr.author_id).await? else {
            warn!(pr_id = %pr.id, author = %pr.author_id, "Author not found; leaving pull request unrepaired");
            return Ok(None);
        };
        let Some(teammates) = self.store.list_users_by_team(&author.team_name).await? else {
            warn!(pr_id = %pr.id, team = %author.team_name, "Author's team not found; leaving pull request unrepaired");
            return Ok(None);
        };

        let needed = TARGET_REVIEWERS.saturating_sub(still_valid.len());
        let mut reviewers = still_valid;
        if needed > 0 {
            let candidates: Vec<User> = teammates
                .into_iter()
                .filter(|u| {
                    u.is_active
                        && u.id != author.id
                        && !deactivated.contains(&u.id)
                        && !reviewers.contains(&u.id)
                })
                .collect();
            let picked = self.picker.pick(&candidates, needed);
            debug!(pr_id = %pr.id, pool = candidates.len(), picked = ?picked, "Topping up reviewers");
            reviewers.extend(picked);
        }

        pr.assigned_reviewers = reviewers;
        if !self.store.update_pull_request(&pr).await? {
            warn!(pr_id = %pr.id, "Pull request disappeared during repair");
            return Ok(None);
        }

        info!(pr_id = %pr.id, reviewers = ?pr.assigned_reviewers, "Reviewers repaired");
        Ok(Some(pr))
    }
}
