//! Beat-sync ratio command.

use clap::Args;
use mezcla_mix::sync;
use serde::Serialize;

#[derive(Args)]
pub struct SyncArgs {
    /// Tempo of deck A in BPM
    #[arg(value_name = "BPM_A")]
    bpm_a: f32,

    /// Tempo of deck B in BPM
    #[arg(value_name = "BPM_B")]
    bpm_b: f32,

    /// Emit JSON instead of a summary
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct SyncOutput {
    ratio: f32,
    pitch_adjustment_pct: f32,
}

pub fn run(args: SyncArgs) -> anyhow::Result<()> {
    let result = sync(args.bpm_a, args.bpm_b)?;

    if args.json {
        let out = SyncOutput {
            ratio: result.ratio,
            pitch_adjustment_pct: result.pitch_adjustment_pct,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("ratio: {:.6}", result.ratio);
        println!("pitch adjustment: {:+.2}%", result.pitch_adjustment_pct);
    }

    Ok(())
}
