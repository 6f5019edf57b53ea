//! Owned mono sample buffer with its sample rate.

/// A mono audio signal: an ordered sequence of f32 samples plus the rate
/// they were captured at.
///
/// Samples are nominally in [-1, 1]. Multi-channel material is downmixed
/// before a `Signal` ever exists; every component in the pipeline consumes
/// and produces mono. The struct is plain owned data — components that need
/// to keep a copy clone it rather than aliasing the buffer, so in-place
/// fade operations can never observe a signal mid-mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    /// Sample values, nominally in [-1, 1].
    pub samples: Vec<f32>,
    /// Sample rate in Hz. Always > 0.
    pub sample_rate: u32,
}

impl Signal {
    /// Create a signal from samples and a sample rate.
    ///
    /// # Panics
    ///
    /// Panics if `sample_rate` is 0; a zero rate makes every time
    /// conversion meaningless.
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        assert!(sample_rate > 0, "sample rate must be positive");
        Self {
            samples,
            sample_rate,
        }
    }

    /// Create a silent signal of `num_samples` samples.
    pub fn silence(num_samples: usize, sample_rate: u32) -> Self {
        Self::new(vec![0.0; num_samples], sample_rate)
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True when the signal holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds.
    pub fn duration(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate as f32
    }

    /// Peak absolute amplitude, 0.0 for an empty signal.
    pub fn peak(&self) -> f32 {
        crate::math::peak(&self.samples)
    }

    /// A copy truncated to at most `num_samples` samples.
    pub fn truncated(&self, num_samples: usize) -> Self {
        let n = num_samples.min(self.samples.len());
        Self {
            samples: self.samples[..n].to_vec(),
            sample_rate: self.sample_rate,
        }
    }
}
