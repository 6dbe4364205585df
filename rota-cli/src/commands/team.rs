//! Team management commands

use clap::{Args, Subcommand};
use rota_core::{ReviewService, TeamMember};

use crate::output::Printer;

/// Team management commands
#[derive(Args, Debug)]
pub struct TeamArgs {
    #[command(subcommand)]
    pub command: TeamCommand,
}

#[derive(Subcommand, Debug)]
pub enum TeamCommand {
    /// Create a team with its members
    Add {
        /// Team name
        name: String,

        /// Active member as ID:USERNAME (repeatable)
        #[arg(short, long = "member", value_parser = parse_member)]
        members: Vec<(String, String)>,

        /// Inactive member as ID:USERNAME (repeatable)
        #[arg(long = "inactive", value_parser = parse_member)]
        inactive: Vec<(String, String)>,
    },

    /// Show a team and its members
    Get {
        /// Team name
        name: String,
    },

    /// Deactivate every member and repair open pull requests
    Deactivate {
        /// Team name
        name: String,
    },
}

impl TeamArgs {
    /// Execute the team command
    pub async fn execute(&self, service: &ReviewService, out: &Printer) -> anyhow::Result<()> {
        match &self.command {
            TeamCommand::Add {
                name,
                members,
                inactive,
            } => {
                let members = members
                    .iter()
                    .map(|(id, username)| TeamMember::new(id, username, true))
                    .chain(
                        inactive
                            .iter()
                            .map(|(id, username)| TeamMember::new(id, username, false)),
                    )
                    .collect();
                let team = service.create_team(name, members).await?;
                out.team(&team)
            }
            TeamCommand::Get { name } => {
                let team = service.get_team(name).await?;
                out.team(&team)
            }
            TeamCommand::Deactivate { name } => {
                let report = service.deactivate_team_and_reassign(name).await?;
                out.deactivation(&report)
            }
        }
    }
}

/// Parse an `ID:USERNAME` pair
fn parse_member(s: &str) -> Result<(String, String), String> {
    match s.split_once(':') {
        Some((id, username)) if !id.trim().is_empty() && !username.trim().is_empty() => {
            Ok((id.trim().to_string(), username.trim().to_string()))
        }
        _ => Err(format!("expected ID:USERNAME, got '{}'", s)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_member() {
        assert_eq!(
            parse_member("u1:alice").unwrap(),
            ("u1".to_string(), "alice".to_string())
        );
        assert_eq!(
            parse_member(" u2 : bob:smith").unwrap(),
            ("u2".to_string(), "bob:smith".to_string())
        );
        assert!(parse_member("u1").is_err());
        assert!(parse_member(":alice").is_err());
        assert!(parse_member("u1:").is_err());
    }
}
