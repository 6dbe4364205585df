//! User commands

use clap::{Args, Subcommand};
use rota_core::ReviewService;

use crate::output::Printer;

/// User commands
#[derive(Args, Debug)]
pub struct UserArgs {
    #[command(subcommand)]
    pub command: UserCommand,
}

#[derive(Subcommand, Debug)]
pub enum UserCommand {
    /// Mark a user active
    Activate {
        /// User ID
        id: String,
    },

    /// Mark a user inactive
    ///
    /// Existing assignments are left alone; only new picks skip the user.
    Deactivate {
        /// User ID
        id: String,
    },

    /// List pull requests the user is assigned to review
    Reviews {
        /// User ID
        id: String,
    },
}

impl UserArgs {
    /// Execute the user command
    pub async fn execute(&self, service: &ReviewService, out: &Printer) -> anyhow::Result<()> {
        match &self.command {
            UserCommand::Activate { id } => {
                let user = service.set_user_active(id, true).await?;
                out.user(&user)
            }
            UserCommand::Deactivate { id } => {
                let user = service.set_user_active(id, false).await?;
                out.user(&user)
            }
            UserCommand::Reviews { id } => {
                let prs = service.reviews_for_user(id).await?;
                out.reviews(id.trim(), &prs)
            }
        }
    }
}
