//! Crossfade ramp shapes.

use std::f32::consts::FRAC_PI_2;

/// Fade curve shapes for crossfading.
///
/// Each variant maps a normalized position t in [0, 1] to a fade-in gain in
/// [0, 1]; the matching fade-out gain is the curve evaluated at `1 - t`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FadeCurve {
    /// Straight line. The sum of fade-in and fade-out gains is exactly 1,
    /// so two identical signals crossfade back into themselves.
    #[default]
    Linear,
    /// Quarter-sine ramp: `sin(t * pi/2)`. Keeps perceived loudness roughly
    /// constant for uncorrelated program material (the gains sum to 1 in
    /// power rather than amplitude).
    EqualPower,
    /// Smoothstep `3t^2 - 2t^3`: slower at the ends, faster in the middle.
    SCurve,
}

impl FadeCurve {
    /// Fade-in gain at normalized position `t` in [0, 1].
    pub fn gain(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            FadeCurve::Linear => t,
            FadeCurve::EqualPower => (t * FRAC_PI_2).sin(),
            FadeCurve::SCurve => t * t * (3.0 - 2.0 * t),
        }
    }

    /// Fade-in ramp of `len` gains running 0 → 1.
    ///
    /// The ramp hits exactly 0.0 at the first sample and exactly 1.0 at the
    /// last, matching a `linspace(0, 1, len)` discretization.
    pub fn fade_in(&self, len: usize) -> Vec<f32> {
        ramp(len).map(|t| self.gain(t)).collect()
    }

    /// Fade-out ramp of `len` gains running 1 → 0.
    pub fn fade_out(&self, len: usize) -> Vec<f32> {
        ramp(len).map(|t| self.gain(1.0 - t)).collect()
    }
}

/// Normalized positions 0, 1/(len-1), ..., 1 (a single 1.0 when len == 1).
fn ramp(len: usize) -> impl Iterator<Item = f32> {
    (0..len).map(move |i| {
        if len <= 1 {
            1.0
        } else {
            i as f32 / (len - 1) as f32
        }
    })
}
