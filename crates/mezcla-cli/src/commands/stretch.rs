//! Time-stretch command.

use clap::Args;
use mezcla_codec::{SampleDepth, decode, encode};
use mezcla_mix::{ANALYSIS_SAMPLE_RATE, analyze, time_stretch};
use std::path::PathBuf;

#[derive(Args)]
pub struct StretchArgs {
    /// Input audio file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output WAV file
    #[arg(short, long)]
    output: PathBuf,

    /// Playback-rate factor: 2.0 = twice as fast, 0.5 = half speed
    #[arg(long, conflicts_with = "to_bpm")]
    factor: Option<f32>,

    /// Target tempo; the factor is derived from the track's detected BPM
    #[arg(long, conflicts_with = "factor")]
    to_bpm: Option<f32>,
}

pub fn run(args: StretchArgs) -> anyhow::Result<()> {
    let bytes = std::fs::read(&args.input)?;

    let factor = match (args.factor, args.to_bpm) {
        (Some(f), None) => f,
        (None, Some(target)) => {
            let analysis = analyze(&bytes)?;
            println!(
                "Detected {:.1} BPM, stretching to {:.1} BPM",
                analysis.bpm, target
            );
            target / analysis.bpm
        }
        _ => anyhow::bail!("specify exactly one of --factor or --to-bpm"),
    };

    let signal = decode(&bytes, ANALYSIS_SAMPLE_RATE)?;
    let stretched = time_stretch(&signal, factor)?;

    println!(
        "{:.2}s -> {:.2}s (factor {:.4})",
        signal.duration(),
        stretched.duration(),
        factor
    );

    std::fs::write(&args.output, encode(&stretched, SampleDepth::Pcm16)?)?;
    println!("Wrote {}", args.output.display());
    Ok(())
}
