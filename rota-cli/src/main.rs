//! Rota CLI - command line interface for reviewer assignment
//!
//! Creates teams, opens and merges pull requests, reassigns reviewers and
//! deactivates whole teams against the configured store.

mod commands;
mod output;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use rota_core::{
    CliOverrides, Config, InMemoryStore, ReviewService, ReviewerPicker, Store, StoreBackend,
};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{PrArgs, TeamArgs, UserArgs};
use output::Printer;

/// Rota: pull request reviewer assignment
#[derive(Parser, Debug)]
#[command(name = "rota")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Storage backend: sqlite or memory (overrides config and env)
    #[arg(long, global = true, env = "ROTA_STORE")]
    store: Option<StoreBackend>,

    /// SQLite database path (overrides config and env)
    #[arg(long, global = true, env = "ROTA_DB_PATH")]
    db_path: Option<PathBuf>,

    /// Fixed seed for reviewer selection (overrides config and env)
    #[arg(long, global = true, env = "ROTA_SEED")]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show version information
    Version,

    /// Manage teams
    #[command(visible_alias = "t")]
    Team(TeamArgs),

    /// Manage users
    #[command(visible_alias = "u")]
    User(UserArgs),

    /// Manage pull requests
    Pr(PrArgs),

    /// Show review assignment and status counters
    Stats,

    /// Show current configuration
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "info" } else { "warn" };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    let out = Printer::new(cli.json);
    if let Err(err) = run(cli, out).await {
        report_error(&err, &out);
        std::process::exit(1);
    }
}

async fn run(cli: Cli, out: Printer) -> anyhow::Result<()> {
    let config = Config::load_with_overrides(CliOverrides {
        backend: cli.store,
        db_path: cli.db_path.clone(),
        seed: cli.seed,
    })?;

    tracing::info!(
        backend = %config.store.backend.as_str(),
        seeded = config.selection.seed.is_some(),
        "Configuration loaded"
    );

    match cli.command {
        Some(Commands::Version) => {
            println!("rota {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Config) => print_config(&config)?,
        Some(Commands::Team(args)) => {
            let service = build_service(&config).await?;
            args.execute(&service, &out).await?;
        }
        Some(Commands::User(args)) => {
            let service = build_service(&config).await?;
            args.execute(&service, &out).await?;
        }
        Some(Commands::Pr(args)) => {
            let service = build_service(&config).await?;
            args.execute(&service, &out).await?;
        }
        Some(Commands::Stats) => {
            let service = build_service(&config).await?;
            out.stats(&service.stats().await?)?;
        }
        None => {
            println!("Rota - pull request reviewer assignment");
            println!();
            println!("Use --help for usage information");
        }
    }

    Ok(())
}

/// Open the configured store and wrap it in a service
async fn build_service(config: &Config) -> anyhow::Result<ReviewService> {
    let store: Arc<dyn Store> = match config.store.backend {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; nothing is persisted after exit");
            Arc::new(InMemoryStore::default())
        }
        StoreBackend::Sqlite => Arc::new(rota_db::open_store(&config.store).await?),
    };

    Ok(ReviewService::new(
        store,
        ReviewerPicker::from_config(&config.selection),
    ))
}

fn print_config(config: &Config) -> anyhow::Result<()> {
    println!("Rota Configuration");
    println!("==================");
    println!();
    println!("Store Settings:");
    println!("  backend: {}", config.store.backend.as_str());
    if config.store.backend == StoreBackend::Sqlite {
        println!("  path: {}", config.store.database_path()?.display());
        println!("  max_connections: {}", config.store.max_connections);
        println!("  busy_timeout: {:?}", config.store.busy_timeout);
    }
    println!();
    println!("Selection Settings:");
    match config.selection.seed {
        Some(seed) => println!("  seed: {}", seed),
        None => println!("  seed: (random)"),
    }
    println!();
    if let Some(path) = Config::default_config_path() {
        println!("Config file: {}", path.display());
        if path.exists() {
            println!("  (exists)");
        } else {
            println!("  (not found - using defaults)");
        }
    }
    Ok(())
}

fn report_error(err: &anyhow::Error, out: &Printer) {
    if out.is_json() {
        println!("{}", output::error_json(err));
        return;
    }

    match err.downcast_ref::<rota_core::Error>() {
        Some(domain) => eprintln!("Error [{}]: {}", domain.code(), domain.public_message()),
        None => {
            tracing::error!(error = %format!("{:#}", err), "Command failed");
            eprintln!("Error [{}]: internal error", rota_core::ErrorCode::InternalError);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use commands::{pr::PrCommand, team::TeamCommand};

    #[test]
    fn test_parse_team_add() {
        let cli = Cli::try_parse_from([
            "rota", "team", "add", "core", "--member", "u1:alice", "-m", "u2:bob", "--inactive",
            "u3:carol",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Team(args)) => match args.command {
                TeamCommand::Add {
                    name,
                    members,
                    inactive,
                } => {
                    assert_eq!(name, "core");
                    assert_eq!(members.len(), 2);
                    assert_eq!(inactive, vec![("u3".to_string(), "carol".to_string())]);
                }
                other => panic!("unexpected command {:?}", other),
            },
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_reassign_alias_and_globals() {
        let cli = Cli::try_parse_from([
            "rota", "pr", "reassign", "pr1", "--old-user", "u2", "--json", "--store", "memory",
            "--seed", "7",
        ])
        .unwrap();

        assert!(cli.json);
        assert_eq!(cli.store, Some(StoreBackend::Memory));
        assert_eq!(cli.seed, Some(7));
        match cli.command {
            Some(Commands::Pr(args)) => match args.command {
                PrCommand::Reassign { id, old_reviewer } => {
                    assert_eq!(id, "pr1");
                    assert_eq!(old_reviewer, "u2");
                }
                other => panic!("unexpected command {:?}", other),
            },
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_rejects_bad_member() {
        assert!(Cli::try_parse_from(["rota", "team", "add", "core", "--member", "alice"]).is_err());
    }

    #[tokio::test]
    async fn test_memory_backend_service() {
        let config = Config::default().with_cli_overrides(CliOverrides {
            backend: Some(StoreBackend::Memory),
            db_path: None,
            seed: Some(1),
        });
        let service = build_service(&config).await.unwrap();
        service
            .create_team(
                "core",
                vec![
                    rota_core::TeamMember::new("u1", "alice", true),
                    rota_core::TeamMember::new("u2", "bob", true),
                ],
            )
            .await
            .unwrap();
        let pr = service.create_pull_request("pr1", "feat", "u1").await.unwrap();
        assert_eq!(pr.assigned_reviewers, vec!["u2".to_string()]);
    }
}
