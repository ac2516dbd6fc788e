use anyhow::Context;
use clap::{Parser, Subcommand};

use libris_kernel::settings::Settings;

#[derive(Parser)]
#[command(name = "libris", about = "Library management service", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP server (the default when no command is given)
    Serve,
    /// Print the resolved configuration and exit
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load().context("failed to load LIBRIS settings")?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            libris_telemetry::init(&settings.telemetry)?;
            tracing::info!(env = ?settings.environment, "libris starting");
            libris_app::run(settings).await
        }
        Command::Config => {
            println!("{settings:#?}");
            Ok(())
        }
    }
}
