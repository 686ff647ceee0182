//! Amplitude envelope data for the waveform display.
//!
//! The renderer polls this once per frame tick: take a snapshot of the
//! newest scope contents, fold it into a small number of bars, draw.
//! Nothing here runs on the audio thread.
//!
//! # Example
//!
//! ```rust
//! use wavescope::{ring::ScopeBuffer, waveform::WaveformData};
//!
//! let scope = ScopeBuffer::new();
//! for i in 0..4_096 {
//!     scope.write((i as f32 * 0.01).sin() * 0.5);
//! }
//!
//! let wave = WaveformData::from_scope(&scope, 4_096, 32);
//! assert_eq!(wave.bars.len(), 32);
//! assert!(wave.bars.iter().all(|&b| (0.0..=1.0).contains(&b)));
//! ```

use crate::ring::ScopeBuffer;

// ---------------------------------------------------------------------------
// WaveformData
// ---------------------------------------------------------------------------

/// Per-bar RMS amplitude snapshot in `[0.0, 1.0]`, oldest bar first.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveformData {
    pub bars: Vec<f32>,
}

impl WaveformData {
    /// Fold `samples` into `num_bars` RMS amplitude values.
    ///
    /// The input is split into `num_bars` near-equal chunks; each chunk's
    /// root-mean-square becomes one bar, clamped to `[0.0, 1.0]`.  Shorter
    /// inputs than `num_bars` pad the trailing bars with `0.0`.
    pub fn compute(samples: &[f32], num_bars: usize) -> Self {
        if num_bars == 0 {
            return Self { bars: Vec::new() };
        }
        if samples.is_empty() {
            return Self {
                bars: vec![0.0; num_bars],
            };
        }

        let chunk_size = samples.len().div_ceil(num_bars).max(1);
        let mut bars: Vec<f32> = samples
            .chunks(chunk_size)
            .map(|chunk| {
                let mean_sq =
                    chunk.iter().map(|s| s * s).sum::<f32>() / chunk.len() as f32;
                mean_sq.sqrt().min(1.0)
            })
            .collect();
        bars.resize(num_bars, 0.0);

        Self { bars }
    }

    /// Snapshot the newest `window` samples out of `scope` and fold them
    /// into `num_bars` bars.
    ///
    /// `window` is clamped to the scope capacity.  The snapshot races the
    /// writer by design; a bar computed over a torn sample is indistinguishable
    /// from ordinary signal movement at display rates.
    pub fn from_scope(scope: &ScopeBuffer, window: usize, num_bars: usize) -> Self {
        let mut samples = vec![0.0f32; window.min(scope.capacity())];
        let n = scope.snapshot_into(&mut samples);
        Self::compute(&samples[..n], num_bars)
    }

    /// Number of bars.
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Returns `true` when there are no bars.
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // ---- compute -----------------------------------------------------------

    #[test]
    fn zero_bars_yields_empty() {
        let wave = WaveformData::compute(&[0.5, 0.5], 0);
        assert!(wave.is_empty());
    }

    #[test]
    fn empty_input_pads_with_silence() {
        let wave = WaveformData::compute(&[], 8);
        assert_eq!(wave.bars, vec![0.0; 8]);
    }

    #[test]
    fn constant_signal_gives_constant_bars() {
        let samples = vec![0.5f32; 1_000];
        let wave = WaveformData::compute(&samples, 10);

        assert_eq!(wave.len(), 10);
        for &bar in &wave.bars {
            assert!((bar - 0.5).abs() < 1e-6, "bar drifted: {bar}");
        }
    }

    #[test]
    fn rms_of_full_scale_square_wave_is_one() {
        let samples: Vec<f32> = (0..100).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect();
        let wave = WaveformData::compute(&samples, 4);
        for &bar in &wave.bars {
            assert!((bar - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn short_input_pads_trailing_bars() {
        let wave = WaveformData::compute(&[1.0, 1.0], 5);
        assert_eq!(wave.len(), 5);
        assert_eq!(wave.bars[0], 1.0);
        assert_eq!(wave.bars[4], 0.0);
    }

    #[test]
    fn bars_are_clamped_to_unit_range() {
        // Out-of-range input (a misbehaving device) must not escape [0, 1].
        let samples = vec![4.0f32; 64];
        let wave = WaveformData::compute(&samples, 4);
        for &bar in &wave.bars {
            assert_eq!(bar, 1.0);
        }
    }

    // ---- from_scope --------------------------------------------------------

    #[test]
    fn from_scope_reads_the_newest_window() {
        let scope = ScopeBuffer::new();
        // Old silence, then a loud tail.
        for _ in 0..512 {
            scope.write(0.0);
        }
        for _ in 0..256 {
            scope.write(0.8);
        }

        let wave = WaveformData::from_scope(&scope, 256, 4);
        for &bar in &wave.bars {
            assert!((bar - 0.8).abs() < 1e-6, "expected loud tail, got {bar}");
        }
    }

    #[test]
    fn from_scope_window_clamps_to_capacity() {
        let scope = ScopeBuffer::new();
        let wave = WaveformData::from_scope(&scope, usize::MAX, 8);
        assert_eq!(wave.len(), 8);
        assert_eq!(wave.bars, vec![0.0; 8]);
    }
}
