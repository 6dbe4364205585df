//! Pull request commands

use clap::{Args, Subcommand};
use rota_core::ReviewService;

use crate::output::Printer;

/// Pull request commands
#[derive(Args, Debug)]
pub struct PrArgs {
    #[command(subcommand)]
    pub command: PrCommand,
}

#[derive(Subcommand, Debug)]
pub enum PrCommand {
    /// Open a pull request and assign reviewers from the author's team
    Create {
        /// Pull request ID
        id: String,

        /// Pull request title
        #[arg(short, long)]
        name: String,

        /// Author user ID
        #[arg(short, long)]
        author: String,
    },

    /// Mark a pull request merged
    Merge {
        /// Pull request ID
        id: String,
    },

    /// Replace one reviewer with an active member of their team
    Reassign {
        /// Pull request ID
        id: String,

        /// Reviewer to replace
        #[arg(long, visible_alias = "old-user")]
        old_reviewer: String,
    },
}

impl PrArgs {
    /// Execute the pull request command
    pub async fn execute(&self, service: &ReviewService, out: &Printer) -> anyhow::Result<()> {
        match &self.command {
            PrCommand::Create { id, name, author } => {
                let pr = service.create_pull_request(id, name, author).await?;
                out.pull_request(&pr)
            }
            PrCommand::Merge { id } => {
                let pr = service.merge_pull_request(id).await?;
                out.pull_request(&pr)
            }
            PrCommand::Reassign { id, old_reviewer } => {
                let result = service.reassign_reviewer(id, old_reviewer).await?;
                out.reassignment(&result)
            }
        }
    }
}
