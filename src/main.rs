use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;

use valuerank::cli::handlers::{self, CommandContext};
use valuerank::cli::{Cli, Commands};
use valuerank::config::RankConfig;
use valuerank::error::RankError;
use valuerank::logging::{self, LogOptions};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let project = load_project(cli.config.as_deref());
    let log_options = LogOptions::resolve(
        cli.verbose,
        cli.log_file.clone(),
        project.as_ref().ok().map(|(config, root)| (config, root.as_path())),
    );
    logging::init(&log_options);

    if let Err(e) = run(cli, project).await {
        tracing::debug!(error = ?e, "Command failed");
        let message = match e.downcast_ref::<RankError>() {
            Some(err) => err.user_message(),
            None => format!("{:#}", e),
        };
        eprintln!("{} {}", "Error:".red().bold(), message);
        std::process::exit(1);
    }
}

fn load_project(config: Option<&str>) -> Result<(RankConfig, PathBuf)> {
    match config {
        Some(path) => RankConfig::load_from(Path::new(path))
            .with_context(|| format!("Failed to load config from {}", path)),
        None => Ok(RankConfig::load(&std::env::current_dir()?)?),
    }
}

async fn run(cli: Cli, project: Result<(RankConfig, PathBuf)>) -> Result<()> {
    if let Commands::Init { remote } = cli.command {
        return handlers::handle_init(remote);
    }

    let (config, root) = project?;
    let ctx = CommandContext::new(config, root, cli.offline)?;

    match cli.command {
        Commands::Init { .. } => Ok(()),
        Commands::Catalog { json } => handlers::handle_catalog(&ctx, json),
        Commands::Board { json } => handlers::handle_board(&ctx, json),
        Commands::Pick { value } => handlers::handle_pick(&ctx, value),
        Commands::Move {
            from_group,
            from_position,
            to_group,
            to_position,
        } => handlers::handle_move(&ctx, from_group, from_position, to_group, to_position),
        Commands::Clear => handlers::handle_clear(&ctx),
        Commands::Save {
            name,
            user,
            list,
            json,
        } => handlers::handle_save(&ctx, name, user, list, json).await,
        Commands::Lists { user, json } => handlers::handle_lists(&ctx, user, json).await,
        Commands::Load {
            list_id,
            user,
            force,
        } => handlers::handle_load(&ctx, list_id, user, force).await,
        Commands::Delete {
            list_id,
            user,
            force,
        } => handlers::handle_delete(&ctx, list_id, user, force).await,
        Commands::Pending { user, json } => handlers::handle_pending(&ctx, user, json),
        Commands::Discard { entry_id } => handlers::handle_discard(&ctx, entry_id),
        Commands::Sync { user } => handlers::handle_sync(&ctx, user).await,
        Commands::Serve { port } => handlers::handle_serve(&ctx, port).await,
    }
}
