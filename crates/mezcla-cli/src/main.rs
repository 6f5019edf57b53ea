//! Mezcla CLI - command-line interface for the two-deck mixing engine.

mod commands;
mod preset;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mezcla")]
#[command(author, version, about = "Mezcla two-deck DJ mixing engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a track: tempo, beat positions, duration
    Analyze(commands::analyze::AnalyzeArgs),

    /// Render a crossfaded mix of two tracks
    Mix(commands::mix::MixArgs),

    /// Compute the tempo ratio between two BPM values
    Sync(commands::sync::SyncArgs),

    /// Time-stretch a track without changing its pitch
    Stretch(commands::stretch::StretchArgs),

    /// Apply a zero-phase lowpass/highpass/bandpass filter
    Filter(commands::filter::FilterArgs),

    /// Generate synthetic test signals
    Generate(commands::generate::GenerateArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze(args) => commands::analyze::run(args),
        Commands::Mix(args) => commands::mix::run(args),
        Commands::Sync(args) => commands::sync::run(args),
        Commands::Stretch(args) => commands::stretch::run(args),
        Commands::Filter(args) => commands::filter::run(args),
        Commands::Generate(args) => commands::generate::run(args),
    }
}
