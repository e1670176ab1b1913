//! flowreg entry point
//! Parses arguments, installs logging and dispatches to the handlers.

use clap::Parser;
use flowreg_core::{ApiError, ConsoleConfig, ConsoleError};
use flowreg_terminal::output::render_error;
use flowreg_terminal::cli::Commands;
use flowreg_terminal::{config, execute, Cli, HandlerContext};
use tracing_subscriber::EnvFilter;

async fn run(command: Commands, config: ConsoleConfig) -> anyhow::Result<String> {
    let ctx = HandlerContext::connect(config).await?;
    execute(&ctx, command).await
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match config::resolve(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e:#}");
            std::process::exit(2);
        }
    };

    // RUST_LOG wins over the configured level.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(cli.command, config).await {
        Ok(output) => println!("{output}"),
        Err(e) => {
            if let Some(error) = e.downcast_ref::<ConsoleError>() {
                eprintln!("{}", render_error(error));
            } else if let Some(error) = e.downcast_ref::<ApiError>() {
                eprintln!("{}", render_error(&ConsoleError::from(error.clone())));
            } else {
                eprintln!("error: {e:#}");
            }
            std::process::exit(1);
        }
    }
}
