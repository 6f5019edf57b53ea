//! Mix rendering command.

use crate::preset::MixPreset;
use clap::{Args, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use mezcla_core::FadeCurve;
use mezcla_mix::{ANALYSIS_SAMPLE_RATE, DeckContext, MixParameters, mix_decks};
use std::path::PathBuf;

/// Fade curve names for the CLI.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum CliCurve {
    #[default]
    Linear,
    EqualPower,
    SCurve,
}

impl From<CliCurve> for FadeCurve {
    fn from(c: CliCurve) -> Self {
        match c {
            CliCurve::Linear => FadeCurve::Linear,
            CliCurve::EqualPower => FadeCurve::EqualPower,
            CliCurve::SCurve => FadeCurve::SCurve,
        }
    }
}

#[derive(Args)]
pub struct MixArgs {
    /// Deck A audio file
    #[arg(value_name = "TRACK_A")]
    track_a: PathBuf,

    /// Deck B audio file
    #[arg(value_name = "TRACK_B")]
    track_b: PathBuf,

    /// Output WAV file
    #[arg(short, long)]
    output: PathBuf,

    /// Crossfade duration in seconds
    #[arg(long, default_value = "2.0")]
    crossfade: f32,

    /// Fade curve shape
    #[arg(long, value_enum, default_value_t = CliCurve::Linear)]
    curve: CliCurve,

    /// Time-stretch deck B onto deck A's tempo before mixing
    #[arg(long)]
    beat_sync: bool,

    /// Mix preset file (TOML); overrides --crossfade and --curve
    #[arg(short, long)]
    preset: Option<PathBuf>,
}

pub fn run(args: MixArgs) -> anyhow::Result<()> {
    let params = if let Some(preset_path) = &args.preset {
        let preset_content = std::fs::read_to_string(preset_path)?;
        let preset: MixPreset = toml::from_str(&preset_content)?;
        println!("Using preset: {}", preset.name);
        preset.to_params()?
    } else {
        MixParameters {
            crossfade_duration: args.crossfade,
            curve: args.curve.into(),
            sample_rate: ANALYSIS_SAMPLE_RATE,
        }
    };

    let pb = ProgressBar::new(4);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("##-"),
    );

    pb.set_message(format!("loading {}", args.track_a.display()));
    let deck_a = DeckContext::load(&std::fs::read(&args.track_a)?)?;
    pb.inc(1);

    pb.set_message(format!("loading {}", args.track_b.display()));
    let deck_b = DeckContext::load(&std::fs::read(&args.track_b)?)?;
    pb.inc(1);

    println!(
        "\n  deck A: {:.1} BPM, {:.1}s   deck B: {:.1} BPM, {:.1}s",
        deck_a.analysis().bpm,
        deck_a.analysis().duration,
        deck_b.analysis().bpm,
        deck_b.analysis().duration,
    );

    pb.set_message("rendering mix");
    let bytes = mix_decks(&deck_a, &deck_b, &params, args.beat_sync)?;
    pb.inc(1);

    pb.set_message(format!("writing {}", args.output.display()));
    std::fs::write(&args.output, &bytes)?;
    pb.inc(1);
    pb.finish_with_message("done");

    println!("Wrote {} ({} bytes)", args.output.display(), bytes.len());
    Ok(())
}
