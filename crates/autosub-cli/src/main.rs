use anyhow::Result;
use autosub_core::BinnerConfig;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod logging;
mod subtitles;

#[derive(Parser, Debug)]
#[command(author, version, about = "Turn word-timed speech recognition output into subtitles")]
struct Cli {
    #[arg(short = 'l', long = "log", default_value = "info", global = true)]
    log_level: String,

    /// Console log style: compact, pretty, or verbose
    #[arg(long, default_value = "pretty", global = true)]
    log_style: String,

    /// Use JSON structured logging
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Group recognized words into subtitle cues
    Bin(subtitles::BinArgs),
    /// Check binner config files
    Validate { configs: Vec<PathBuf> },
}

fn main() {
    if let Err(err) = main_() {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn main_() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let log_style = cli.log_style.parse().unwrap_or_else(|e: String| {
        eprintln!("Warning: {e}, using 'pretty'");
        logging::LogStyle::Pretty
    });
    logging::init(&cli.log_level, log_style, cli.json_logs)?;

    match cli.command {
        Command::Bin(args) => subtitles::run_bin(args)?,
        Command::Validate { configs } => {
            for path in configs.iter() {
                let config = BinnerConfig::load(path)?;
                tracing::info!(
                    path = %path.display(),
                    bin_size_s = config.bin_size_s,
                    precision = ?config.precision,
                    "loaded successfully"
                );
            }
        }
    }

    Ok(())
}
