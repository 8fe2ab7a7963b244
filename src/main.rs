use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mimicbot::{BotConfig, ResponseModel};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mimicbot", version, about = "Chat bot that replies the way your friend did")]
struct Cli {
    /// Path to the bot's TOML config
    #[arg(short, long, default_value = "mimicbot.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train on the transcript and write the model file
    Train,
    /// Answer messages read from stdin, one per line
    Chat {
        /// Train first instead of loading the saved model
        #[arg(long)]
        retrain: bool,
    },
    /// Print the extracted (prompt, reply) pairs as JSON
    Pairs,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = BotConfig::from_file(&cli.config)?;
    let base = cli.config.parent().unwrap_or(Path::new("."));
    let mut bot = config
        .build(base)
        .with_context(|| format!("loading transcript {}", config.transcript.display()))?;

    match cli.command {
        Commands::Train => {
            bot.train_with(&config.training).context("training failed")?;
        }
        Commands::Chat { retrain } => {
            if retrain {
                bot.train_with(&config.training).context("training failed")?;
            } else {
                let path = bot.model_path();
                bot.load_trained().with_context(|| {
                    format!("no usable model at {}, run `train` first", path.display())
                })?;
            }
            chat(&bot)?;
        }
        Commands::Pairs => {
            let json = serde_json::to_string_pretty(bot.pairs()).context("serializing pairs")?;
            println!("{}", json);
        }
    }

    Ok(())
}

fn chat(bot: &ResponseModel) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = line.context("reading stdin")?;
        if line.trim().is_empty() {
            continue;
        }
        match bot.message(&line) {
            Ok(reply) => writeln!(stdout, "{}", reply)?,
            Err(e) => warn!("{}", e),
        }
        stdout.flush()?;
    }
    Ok(())
}
