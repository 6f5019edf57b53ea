//! Test signal generation command.

use clap::{Args, Subcommand};
use mezcla_codec::{SampleDepth, encode};
use mezcla_core::Signal;
use std::f32::consts::PI;
use std::path::PathBuf;

#[derive(Args)]
pub struct GenerateArgs {
    #[command(subcommand)]
    command: GenerateCommand,
}

#[derive(Subcommand)]
enum GenerateCommand {
    /// Generate a click track: short 1 kHz bursts on every beat
    Click {
        /// Output WAV file
        #[arg(short, long)]
        output: PathBuf,

        /// Tempo in BPM
        #[arg(long, default_value = "120.0")]
        bpm: f32,

        /// Duration in seconds
        #[arg(long, default_value = "10.0")]
        duration: f32,

        /// Sample rate in Hz
        #[arg(long, default_value = "44100")]
        sample_rate: u32,
    },

    /// Generate a pure sine tone
    Tone {
        /// Output WAV file
        #[arg(short, long)]
        output: PathBuf,

        /// Frequency in Hz
        #[arg(long, default_value = "440.0")]
        frequency: f32,

        /// Duration in seconds
        #[arg(long, default_value = "5.0")]
        duration: f32,

        /// Amplitude in [0, 1]
        #[arg(long, default_value = "0.7")]
        amplitude: f32,

        /// Sample rate in Hz
        #[arg(long, default_value = "44100")]
        sample_rate: u32,
    },
}

pub fn run(args: GenerateArgs) -> anyhow::Result<()> {
    match args.command {
        GenerateCommand::Click {
            output,
            bpm,
            duration,
            sample_rate,
        } => {
            anyhow::ensure!(bpm > 0.0, "BPM must be positive");
            let signal = click_track(bpm, duration, sample_rate);
            std::fs::write(&output, encode(&signal, SampleDepth::Pcm16)?)?;
            println!(
                "Wrote {} ({:.1}s of {bpm} BPM clicks at {sample_rate} Hz)",
                output.display(),
                duration
            );
        }
        GenerateCommand::Tone {
            output,
            frequency,
            duration,
            amplitude,
            sample_rate,
        } => {
            let total = (sample_rate as f32 * duration) as usize;
            let samples = (0..total)
                .map(|i| {
                    amplitude * (2.0 * PI * frequency * i as f32 / sample_rate as f32).sin()
                })
                .collect();
            let signal = Signal::new(samples, sample_rate);
            std::fs::write(&output, encode(&signal, SampleDepth::Pcm16)?)?;
            println!(
                "Wrote {} ({frequency} Hz, {:.1}s at {sample_rate} Hz)",
                output.display(),
                duration
            );
        }
    }
    Ok(())
}

/// Click track: a 10 ms decaying 1 kHz burst on every beat.
fn click_track(bpm: f32, duration: f32, sample_rate: u32) -> Signal {
    let total = (sample_rate as f32 * duration) as usize;
    let mut samples = vec![0.0f32; total];
    let interval = 60.0 / bpm;
    let burst = (sample_rate as f32 * 0.01) as usize;

    let mut beat = 0usize;
    loop {
        let pos = (beat as f32 * interval * sample_rate as f32) as usize;
        if pos >= total {
            break;
        }
        for j in 0..burst.min(total - pos) {
            let t = j as f32 / sample_rate as f32;
            samples[pos + j] = 0.9 * (-t * 400.0).exp() * (2.0 * PI * 1000.0 * t).sin();
        }
        beat += 1;
    }

    Signal::new(samples, sample_rate)
}
