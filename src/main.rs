use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use askpad::cli::{self, Command};
use askpad::core::config::{self, CliOverrides};
use askpad::tui;
use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

#[derive(Parser)]
#[command(name = "askpad", version, about = "Ask an LLM from the terminal and keep the answers")]
struct Args {
    /// Base URL of the chat-completions endpoint
    #[arg(long)]
    base_url: Option<String>,

    /// Model identifier sent with every request
    #[arg(short, long)]
    model: Option<String>,

    /// Directory holding the persisted history
    #[arg(long)]
    storage_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[tokio::main]
async fn main() -> io::Result<ExitCode> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to askpad.log in current directory
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("askpad.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = config::load_config().map_err(io::Error::other)?;
    let overrides = CliOverrides {
        base_url: args.base_url,
        model: args.model,
        storage_dir: args.storage_dir,
    };
    let resolved = config::resolve(&file_config, &overrides);

    log::info!(
        "askpad starting up (model: {}, endpoint: {})",
        resolved.model_name,
        resolved.base_url
    );

    match args.command {
        Some(command) => cli::run(command, &resolved).await,
        None => tui::run(resolved).map(|()| ExitCode::SUCCESS),
    }
}
