//! Track analysis command.

use clap::Args;
use mezcla_analysis::BeatGrid;
use mezcla_mix::analyze;
use std::path::PathBuf;

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Input audio file (wav/mp3/flac/ogg/aac)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Emit the full analysis as JSON instead of a summary
    #[arg(long)]
    json: bool,

    /// Also list downbeats, assuming this many beats per bar
    #[arg(long, value_name = "BEATS_PER_BAR")]
    downbeats: Option<usize>,
}

pub fn run(args: AnalyzeArgs) -> anyhow::Result<()> {
    let bytes = std::fs::read(&args.input)?;
    let analysis = analyze(&bytes)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
        return Ok(());
    }

    println!("{}", args.input.display());
    println!("  duration: {:.2}s", analysis.duration);
    println!("  tempo:    {:.1} BPM", analysis.bpm);
    println!("  beats:    {}", analysis.beat_times.len());

    if let Some(first) = analysis.beat_times.first() {
        println!("  first beat at {first:.3}s");
    }

    if let Some(beats_per_bar) = args.downbeats {
        let grid = BeatGrid {
            times: analysis.beat_times.clone(),
            bpm: analysis.bpm,
        };
        let downbeats = grid.find_downbeats(beats_per_bar);
        println!("  downbeats ({beats_per_bar}/bar): {}", downbeats.len());
        for t in downbeats.iter().take(8) {
            println!("    {t:.3}s");
        }
    }

    Ok(())
}
