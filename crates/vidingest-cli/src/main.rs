mod args;
mod commands;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use args::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let filter = match cli.verbose {
        0 => "vidingest=info",
        1 => "vidingest=debug",
        2 => "vidingest=trace",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    // Handle commands
    match cli.command {
        Some(Commands::Ingest { url, options }) => {
            commands::ingest::run(&url, &options, cli.config.as_deref()).await
        }
        Some(Commands::Local { file, options }) => {
            commands::local::run(&file, &options, cli.config.as_deref()).await
        }
        Some(Commands::Doctor) => commands::doctor::run(cli.config.as_deref()).await,
        Some(Commands::Config) => commands::config::run(cli.config.as_deref()).await,
        None => {
            // If URL provided directly, treat as ingest command
            if let Some(url) = cli.url {
                let options = args::JobOptions {
                    output: cli.output,
                    keep_temp: cli.keep_temp,
                };
                commands::ingest::run(&url, &options, cli.config.as_deref()).await
            } else {
                // No URL, print help
                use clap::CommandFactory;
                Cli::command().print_help()?;
                println!();
                Ok(())
            }
        }
    }
}
