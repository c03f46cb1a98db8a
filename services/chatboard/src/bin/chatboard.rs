//! services/chatboard/src/bin/chatboard.rs

use chatboard_lib::{
    commands::{self, Command},
    config::Config,
    error::AppError,
    state::AppState,
};
use chrono::Local;
use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "chatboard")]
#[command(author, version, about = "A small shared message board", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    match run(args).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{}", e);
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<bool, AppError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Config::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    info!("Configuration loaded.");

    // --- 2. Open Storage & Build the Stores ---
    let state = AppState::open(&config).await?;

    // --- 3. Run the Command ---
    let outcome = commands::run(&state, args.command, &Local::now()).await?;
    if outcome.ok {
        println!("{}", outcome.output);
    } else {
        eprintln!("{}", outcome.output);
    }
    Ok(outcome.ok)
}
