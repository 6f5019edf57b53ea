//! Offline filtering command.

use clap::{Args, ValueEnum};
use mezcla_codec::{SampleDepth, decode, encode};
use mezcla_core::{FilterSpec, FilterType, Signal, filtfilt};
use mezcla_mix::ANALYSIS_SAMPLE_RATE;
use std::path::PathBuf;

/// Filter kinds for the CLI.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum CliFilterType {
    Lowpass,
    Highpass,
    Bandpass,
}

impl From<CliFilterType> for FilterType {
    fn from(t: CliFilterType) -> Self {
        match t {
            CliFilterType::Lowpass => FilterType::Lowpass,
            CliFilterType::Highpass => FilterType::Highpass,
            CliFilterType::Bandpass => FilterType::Bandpass,
        }
    }
}

#[derive(Args)]
pub struct FilterArgs {
    /// Input audio file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output WAV file
    #[arg(short, long)]
    output: PathBuf,

    /// Filter response
    #[arg(long, value_enum, default_value_t = CliFilterType::Lowpass)]
    kind: CliFilterType,

    /// Cutoff (lowpass/highpass) or center (bandpass) frequency in Hz
    #[arg(long, default_value = "1000.0")]
    cutoff: f32,

    /// Q factor; 0.707 is a Butterworth corner
    #[arg(long)]
    q: Option<f32>,
}

pub fn run(args: FilterArgs) -> anyhow::Result<()> {
    anyhow::ensure!(args.cutoff > 0.0, "cutoff must be positive");

    let bytes = std::fs::read(&args.input)?;
    let signal = decode(&bytes, ANALYSIS_SAMPLE_RATE)?;

    let mut spec = FilterSpec::new(args.kind.into(), args.cutoff);
    if let Some(q) = args.q {
        anyhow::ensure!(q > 0.0, "Q must be positive");
        spec.q = q;
    }

    // Zero-phase so transients stay put
    let filtered = filtfilt(&signal.samples, &spec, signal.sample_rate as f32);
    let out_signal = Signal::new(filtered, signal.sample_rate);

    std::fs::write(&args.output, encode(&out_signal, SampleDepth::Pcm16)?)?;
    println!(
        "Wrote {} ({:?} at {} Hz)",
        args.output.display(),
        args.kind,
        args.cutoff
    );
    Ok(())
}
