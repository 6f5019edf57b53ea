//! Mix preset file format.
//!
//! Presets are TOML files carrying the crossfade configuration, so a
//! favorite transition can be reused across mixes:
//!
//! ```toml
//! name = "club blend"
//! crossfade_duration = 8.0
//! curve = "equal-power"
//! ```

use mezcla_core::FadeCurve;
use mezcla_mix::{ANALYSIS_SAMPLE_RATE, MixParameters};
use serde::Deserialize;

/// Preset file format.
#[derive(Debug, Deserialize)]
pub struct MixPreset {
    /// Name of the preset
    pub name: String,
    /// Optional description
    #[serde(default)]
    #[allow(dead_code)]
    pub description: Option<String>,
    /// Crossfade duration in seconds
    #[serde(default = "default_crossfade")]
    pub crossfade_duration: f32,
    /// Fade curve: "linear", "equal-power", or "s-curve"
    #[serde(default = "default_curve")]
    pub curve: String,
    /// Output sample rate in Hz
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
}

fn default_crossfade() -> f32 {
    2.0
}

fn default_curve() -> String {
    "linear".to_string()
}

fn default_sample_rate() -> u32 {
    ANALYSIS_SAMPLE_RATE
}

impl MixPreset {
    /// Convert to [`MixParameters`], rejecting unknown curve names.
    pub fn to_params(&self) -> anyhow::Result<MixParameters> {
        let curve = match self.curve.as_str() {
            "linear" => FadeCurve::Linear,
            "equal-power" => FadeCurve::EqualPower,
            "s-curve" => FadeCurve::SCurve,
            other => anyhow::bail!(
                "unknown curve '{other}' (expected linear, equal-power, or s-curve)"
            ),
        };

        Ok(MixParameters {
            crossfade_duration: self.crossfade_duration,
            curve,
            sample_rate: self.sample_rate,
        })
    }
}
