//! Integer-ratio rate decimation by periodic sample selection.
//!
//! The device runs at its own native rate; the scope wants a fixed nominal
//! rate.  Rather than resample, we keep one in every `ratio` input frames
//! where `ratio = round(native / target)`, floored at 1.  The effective
//! output rate is `native / ratio`, which may drift slightly from the
//! nominal target (48 kHz in, 44.1 kHz nominal → ratio 1, 48 kHz out) —
//! accepted, since the consumer is a waveform display, not a listening path.
//!
//! No filtering is applied before selection.  That aliases, but it costs
//! zero latency and zero buffering on the real-time path.
//!
//! # Example
//!
//! ```rust
//! use wavescope::decimate::Decimator;
//!
//! let mut dec = Decimator::new(88_200, 44_100);
//! assert_eq!(dec.ratio(), 2);
//!
//! // Every other frame is kept, starting with the first.
//! let kept: Vec<bool> = (0..6).map(|_| dec.keep()).collect();
//! assert_eq!(kept, [true, false, true, false, true, false]);
//! ```

// ---------------------------------------------------------------------------
// Decimator
// ---------------------------------------------------------------------------

/// Running decimation state: a fixed keep ratio and a phase index that
/// carries across callback invocations.
///
/// The index lives in `[0, ratio)` and starts at 0, so the very first frame
/// after a (re)start is always kept.
#[derive(Debug, Clone)]
pub struct Decimator {
    ratio: u32,
    index: u32,
}

impl Decimator {
    /// Build a decimator for a device running at `native_rate` Hz feeding a
    /// consumer that nominally wants `target_rate` Hz.
    ///
    /// The ratio is `round(native / target)` and never below 1, so an input
    /// rate at or near the target passes every frame through rather than
    /// silently halving or doubling.
    pub fn new(native_rate: u32, target_rate: u32) -> Self {
        let ratio = if target_rate == 0 {
            1
        } else {
            ((f64::from(native_rate) / f64::from(target_rate)).round() as u32).max(1)
        };
        Self { ratio, index: 0 }
    }

    /// Decide whether the current input frame is kept, then advance the
    /// phase.
    ///
    /// A frame is kept exactly when the index is 0 *before* the advance; the
    /// index always steps by 1 modulo the ratio, kept or not.
    #[inline]
    pub fn keep(&mut self) -> bool {
        let kept = self.index == 0;
        self.index = (self.index + 1) % self.ratio;
        kept
    }

    /// The configured keep ratio (1 = every frame).
    pub fn ratio(&self) -> u32 {
        self.ratio
    }

    /// Effective output rate in Hz for a device running at `native_rate`.
    pub fn output_rate(&self, native_rate: u32) -> f32 {
        native_rate as f32 / self.ratio as f32
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
