//! Pull request lifecycle: creation, merge and single-reviewer reassignment

use chrono::Utc;
use tracing::{debug, info};

use super::ReviewService;
use crate::error::ConflictKind;
use crate::model::{PrStatus, PullRequest, Reassignment, User, TARGET_REVIEWERS};
use crate::{Error, Result};

impl ReviewService {
    /// Open a pull request and assign up to two active teammates of the author
    pub async fn create_pull_request(
        &self,
        id: &str,
        name: &str,
        author_id: &str,
    ) -> Result<PullRequest> {
        let (id, name, author_id) = (id.trim(), name.trim(), author_id.trim());
        if id.is_empty() || name.is_empty() || author_id.is_empty() {
            return Err(Error::validation(
                "pull_request_id, pull_request_name and author_id are required",
            ));
        }

        let author = self
            .store
            .get_user(author_id)
            .await?
            .ok_or_else(|| Error::not_found(format!("author {} not found", author_id)))?;

        let candidates: Vec<User> = self
            .store
            .list_users_by_team(&author.team_name)
            .await?
            .unwrap_or_default()
            .into_iter()
            .filter(|u| u.is_active && u.id != author.id)
            .collect();

        let reviewers = self.picker.pick(&candidates, TARGET_REVIEWERS);
        debug!(
            pr_id = %id,
            pool = candidates.len(),
            picked = reviewers.len(),
            "Selected initial reviewers"
        );

        let pr = PullRequest::open(id, name, author_id, reviewers);
        if !self.store.create_pull_request(&pr).await? {
            return Err(Error::conflict(
                ConflictKind::PrExists,
                format!("pull request {} already exists", id),
            ));
        }

        info!(
            pr_id = %pr.id,
            author = %pr.author_id,
            reviewers = ?pr.assigned_reviewers,
            "Pull request created"
        );
        Ok(pr)
    }

    /// Mark a pull request as merged.
    ///
    /// Merging an already-merged pull request returns it unchanged.
    pub async fn merge_pull_request(&self, id: &str) -> Result<PullRequest> {
        let id = id.trim();
        if id.is_empty() {
            return Err(Error::validation("pull_request_id is required"));
        }

        let mut pr = self
            .store
            .get_pull_request(id)
            .await?
            .ok_or_else(|| Error::not_found(format!("pull request {} not found", id)))?;

        if pr.is_merged() {
            debug!(pr_id = %id, "Pull request already merged");
            return Ok(pr);
        }

        pr.status = PrStatus::Merged;
        pr.merged_at = Some(Utc::now());
        if !self.store.update_pull_request(&pr).await? {
            return Err(Error::not_found(format!("pull request {} not found", id)));
        }

        info!(pr_id = %id, "Pull request merged");
        Ok(pr)
    }

    /// Replace one reviewer with an active teammate of that reviewer.
    ///
    /// The replacement takes the old reviewer's slot, so the position of
    /// every other reviewer is unchanged.
    pub async fn reassign_reviewer(&self, pr_id: &str, old_reviewer_id: &str) -> Result<Reassignment> {
        let (pr_id, old_reviewer_id) = (pr_id.trim(), old_reviewer_id.trim());
        if pr_id.is_empty() || old_reviewer_id.is_empty() {
            return Err(Error::validation(
                "pull_request_id and old_user_id are required",
            ));
        }

        let mut pr = self
            .store
            .get_pull_request(pr_id)
            .await?
            .ok_or_else(|| Error::not_found(format!("pull request {} not found", pr_id)))?;

        if pr.is_merged() {
            return Err(Error::conflict(
                ConflictKind::PrMerged,
                "cannot reassign on merged PR",
            ));
        }

        let slot = pr.reviewer_position(old_reviewer_id).ok_or_else(|| {
            Error::conflict(
                ConflictKind::NotAssigned,
                "reviewer is not assigned to this PR",
            )
        })?;

        let old_reviewer = self
            .store
            .get_user(old_reviewer_id)
            .await?
            .ok_or_else(|| Error::not_found(format!("reviewer {} not found", old_reviewer_id)))?;

        let candidates: Vec<User> = self
            .store
            .list_users_by_team(&old_reviewer.team_name)
            .await?
            .unwrap_or_default()
            .into_iter()
            .filter(|u| {
                u.is_active
                    && u.id != old_reviewer.id
                    && u.id != pr.author_id
                    && !pr.has_reviewer(&u.id)
            })
            .collect();

        let no_candidate = || {
            Error::conflict(
                ConflictKind::NoCandidate,
                "no active replacement candidate in team",
            )
        };
        let replaced_by = self
            .picker
            .pick(&candidates, 1)
            .into_iter()
            .next()
            .ok_or_else(no_candidate)?;

        pr.assigned_reviewers[slot] = replaced_by.clone();
        if !self.store.update_pull_request(&pr).await? {
            return Err(Error::not_found(format!("pull request {} not found", pr_id)));
        }

        info!(
            pr_id = %pr_id,
            old_reviewer = %old_reviewer_id,
            replaced_by = %replaced_by,
            slot,
            "Reviewer reassigned"
        );
        Ok(Reassignment {
            pull_request: pr,
            replaced_by,
        })
    }

    /// Every pull request, open or merged, that lists the user as a reviewer
    pub async fn reviews_for_user(&self, user_id: &str) -> Result<Vec<PullRequest>> {
        let user_id = user_id.trim();
        if user_id.is_empty() {
            return Err(Error::validation("user_id is required"));
        }

        Ok(self
            .store
            .list_pull_requests()
            .await?
            .into_iter()
            .filter(|pr| pr.has_reviewer(user_id))
            .collect())
    }
}
