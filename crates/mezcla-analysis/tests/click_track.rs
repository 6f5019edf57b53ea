//! End-to-end rhythm analysis on a synthetic click track.
//!
//! A 10-second, 44 100 Hz click track at exactly 120 BPM (clicks at t = 0.0,
//! 0.5, 1.0, …) must come back as ≈120 BPM with every tracked beat within
//! 50 ms of the true click position.

use mezcla_analysis::{BeatGrid, OnsetEnvelope, TempoEstimate, align_grids, beat_energies};
use mezcla_core::Signal;

const SAMPLE_RATE: u32 = 44100;

/// Click track: a short decaying burst at every beat of `bpm`.
fn click_track(bpm: f32, duration_secs: f32) -> Signal {
    let total = (SAMPLE_RATE as f32 * duration_secs) as usize;
    let mut samples = vec![0.0f32; total];
    let beat_interval = 60.0 / bpm;

    let mut beat = 0usize;
    loop {
        let t = beat as f32 * beat_interval;
        let pos = (t * SAMPLE_RATE as f32) as usize;
        if pos >= total {
            break;
        }
        // 10 ms burst of decaying 1 kHz tone
        for j in 0..441.min(total - pos) {
            let tt = j as f32 / SAMPLE_RATE as f32;
            let envelope = (-tt * 400.0).exp();
            samples[pos + j] =
                0.9 * envelope * (2.0 * std::f32::consts::PI * 1000.0 * tt).sin();
        }
        beat += 1;
    }

    Signal::new(samples, SAMPLE_RATE)
}

#[test]
fn tempo_of_120_bpm_clicks() {
    let signal = click_track(120.0, 10.0);
    let envelope = OnsetEnvelope::compute(&signal);
    let tempo = TempoEstimate::estimate(&envelope);

    assert!(
        (tempo.bpm - 120.0).abs() <= 2.0,
        "expected ≈120 BPM, got {}",
        tempo.bpm
    );
}

#[test]
fn beats_land_on_clicks() {
    let signal = click_track(120.0, 10.0);
    let envelope = OnsetEnvelope::compute(&signal);
    let tempo = TempoEstimate::estimate(&envelope);
    let grid = BeatGrid::track(&envelope, Some(tempo.bpm));

    assert!(grid.len() >= 15, "only {} beats tracked", grid.len());

    for &t in &grid.times {
        let nearest_click = (t / 0.5).round() * 0.5;
        assert!(
            (t - nearest_click).abs() <= 0.05,
            "beat at {t:.3}s is {:.0} ms from the nearest click",
            (t - nearest_click).abs() * 1000.0
        );
    }
}

#[test]
fn tracked_grid_is_strictly_increasing_and_bounded() {
    let signal = click_track(120.0, 10.0);
    let envelope = OnsetEnvelope::compute(&signal);
    let grid = BeatGrid::track(&envelope, None);

    for w in grid.times.windows(2) {
        assert!(w[1] > w[0]);
    }
    if let (Some(&first), Some(&last)) = (grid.times.first(), grid.times.last()) {
        assert!(first >= 0.0);
        assert!(last <= signal.duration());
    }
}

#[test]
fn fast_clicks_fold_into_danceable_range() {
    // 240 BPM clicks sit at the very edge of the search range; the octave
    // correction must fold the estimate into 60–180 BPM.
    let signal = click_track(240.0, 10.0);
    let envelope = OnsetEnvelope::compute(&signal);
    let tempo = TempoEstimate::estimate(&envelope);

    assert!(
        (60.0..=180.0).contains(&tempo.bpm),
        "expected a folded tempo, got {} BPM",
        tempo.bpm
    );
}

#[test]
fn beat_energies_are_uniform_on_clicks() {
    let signal = click_track(120.0, 10.0);
    let envelope = OnsetEnvelope::compute(&signal);
    let grid = BeatGrid::track(&envelope, None);
    let energies = beat_energies(&signal, &grid);

    assert_eq!(energies.len(), grid.len());
    // Every tracked beat sits on a click, so none may read as silence
    for (&e, &t) in energies.iter().zip(grid.times.iter()) {
        assert!(e > 1e-4, "beat at {t:.3}s has energy {e}");
    }
}

#[test]
fn identical_tracks_align_at_zero() {
    let signal = click_track(120.0, 10.0);
    let envelope = OnsetEnvelope::compute(&signal);
    let grid_a = BeatGrid::track(&envelope, None);
    let grid_b = BeatGrid::track(&envelope, None);

    let alignment = align_grids(&grid_a, &grid_b).expect("grids are non-empty");
    assert_eq!(alignment.shift_beats, 0);
    assert_eq!(alignment.time_shift, 0.0);
}
