pub mod migrate;
pub mod recompute;
pub mod seed;

use crate::Config;
use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum Commands {
    /// Run database migrations
    Migrate {
        #[command(subcommand)]
        action: migrate::MigrateAction,
    },
    /// Recompute days-to-hire statistics and replace the summary table
    Recompute {
        #[arg(
            short,
            long,
            help = "Minimum postings per group (defaults to aggregation.min_postings)"
        )]
        min_postings: Option<u32>,
    },
    /// Load job postings from a CSV file
    Seed {
        #[arg(short, long, help = "Path to the job postings CSV")]
        file: PathBuf,
        #[arg(long, help = "Delete existing postings before loading")]
        replace: bool,
    },
}

pub async fn handle_command(
    command: Commands,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Migrate { action } => migrate::handle_migrate_command(action, config).await,
        Commands::Recompute { min_postings } => {
            recompute::handle_recompute_command(min_postings, config).await
        }
        Commands::Seed { file, replace } => {
            seed::handle_seed_command(&file, replace, config).await
        }
    }
}
