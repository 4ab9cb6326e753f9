//! Galleria CLI binary.
//!
//! This binary provides command-line access to Galleria's functionality:
//! - Show the gallery in the configured mode
//! - Discover and watch remote image folders
//! - Manage the local store, its backups and its health

use clap::Parser;
use galleria::{GalleriaConfig, init_telemetry};

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, discover, handle_local_command, show, watch};

    // Parse command-line arguments
    let cli = Cli::parse();

    // Initialize tracing
    init_telemetry(cli.verbose, cli.json_logs)?;

    let config = GalleriaConfig::load_with(cli.config.as_deref())?;

    // Execute the requested command
    match cli.command {
        Commands::Show { format } => {
            show(&config, format).await?;
        }

        Commands::Discover {
            source,
            fresh,
            format,
        } => {
            discover(config, source, fresh, format).await?;
        }

        Commands::Watch { source, interval } => {
            watch(config, source, interval).await?;
        }

        Commands::Local(local_cmd) => {
            handle_local_command(&config, local_cmd).await?;
        }
    }

    Ok(())
}
