use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use herald_bot::voice::{SpeechService, Synthesizer};
use herald_bot::{ClipStore, Config, Daemon, TtsConfig, config};

/// Herald - Discord voice-announcement bot
#[derive(Parser)]
#[command(name = "herald", version, about)]
struct Cli {
    /// Clip directory (overrides HERALD_CLIP_DIR)
    #[arg(long)]
    clip_dir: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Synthesize a clip for a name and store it, without connecting
    TestTts {
        /// Display name to synthesize
        name: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "info,herald_bot=info",
        1 => "info,herald_bot=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    if let Some(cmd) = cli.command {
        return match cmd {
            Command::TestTts { name } => test_tts(cli.clip_dir, &name).await,
        };
    }

    let config = Config::load_with_options(cli.clip_dir)?;
    tracing::info!(
        clip_dir = %config.clip_dir.display(),
        submission_channel = %config.submission_channel,
        "starting herald"
    );

    Daemon::new(config).run().await?;

    Ok(())
}

/// Synthesize a test clip into the store and report where it landed
async fn test_tts(clip_dir: Option<PathBuf>, name: &str) -> anyhow::Result<()> {
    let store = ClipStore::open(config::resolve_clip_dir(clip_dir)?)?;
    let synth: Arc<dyn Synthesizer> = Arc::new(SpeechService::from_config(&TtsConfig::from_env()?)?);

    println!("Synthesizing clip for \"{name}\"...");
    let dest = store.clip_path(name);
    synth.synthesize(name, &dest).await?;
    println!("Wrote {}", dest.display());

    Ok(())
}
