//! Deck synchronization: tempo ratios and beat-grid alignment.

use crate::beat::BeatGrid;
use crate::xcorr::{peak_lag, xcorr_direct};
use crate::{Error, Result};
use tracing::debug;

/// Inter-beat intervals averaged when converting a beat-index shift into a
/// time shift.
const ALIGN_REFERENCE_INTERVALS: usize = 10;

/// Tempo relationship between two decks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyncResult {
    /// `bpm_a / bpm_b`: the playback-rate factor that brings deck B onto
    /// deck A's tempo.
    pub ratio: f32,
    /// The same factor expressed as a pitch-fader percentage:
    /// `(ratio - 1) · 100`.
    pub pitch_adjustment_pct: f32,
}

/// Phase relationship between two beat grids.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridAlignment {
    /// Time shift in seconds to apply to deck B.
    pub time_shift: f32,
    /// The shift expressed in whole beats.
    pub shift_beats: i64,
}

/// Compute the tempo ratio and pitch adjustment between two decks.
///
/// # Errors
///
/// [`Error::InvalidTempo`] when either BPM is zero, negative, or
/// non-finite — a tempo ratio against such a value is meaningless.
pub fn compute_sync(bpm_a: f32, bpm_b: f32) -> Result<SyncResult> {
    for bpm in [bpm_a, bpm_b] {
        if !(bpm.is_finite() && bpm > 0.0) {
            return Err(Error::InvalidTempo(bpm));
        }
    }

    let ratio = bpm_a / bpm_b;
    Ok(SyncResult {
        ratio,
        pitch_adjustment_pct: (ratio - 1.0) * 100.0,
    })
}

/// Find the beat-index shift that best aligns two beat grids.
///
/// Each grid becomes a binary impulse train with one slot per beat index
/// (common length `max(len_a, len_b)`); the trains are cross-correlated and
/// the peak lag is the shift in beats. The time shift is that lag scaled by
/// the average of grid A's first [`ALIGN_REFERENCE_INTERVALS`] inter-beat
/// intervals (0.5 s per beat is assumed for a single-beat grid).
///
/// Returns `None` when either grid is empty — there is nothing to align,
/// and callers must check before applying the shift.
pub fn align_grids(grid_a: &BeatGrid, grid_b: &BeatGrid) -> Option<GridAlignment> {
    if grid_a.is_empty() || grid_b.is_empty() {
        return None;
    }

    let n = grid_a.len().max(grid_b.len());
    let mut train_a = vec![0.0f32; n];
    let mut train_b = vec![0.0f32; n];
    for slot in train_a.iter_mut().take(grid_a.len()) {
        *slot = 1.0;
    }
    for slot in train_b.iter_mut().take(grid_b.len()) {
        *slot = 1.0;
    }

    let max_lag = n - 1;
    let correlation = xcorr_direct(&train_a, &train_b, max_lag.max(1));
    let (shift_beats, _) = peak_lag(&correlation, max_lag.max(1));

    let reference_interval = grid_a.mean_interval(ALIGN_REFERENCE_INTERVALS).unwrap_or(0.5);
    let time_shift = shift_beats as f32 * reference_interval;

    debug!(shift_beats, time_shift, "aligned beat grids");
    Some(GridAlignment {
        time_shift,
        shift_beats,
    })
}
