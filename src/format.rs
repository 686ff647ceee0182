//! Device sample formats and normalization to `f32` in `[-1.0, 1.0]`.
//!
//! The capture stream records the device's native representation once at
//! start-up as a [`DeviceFormat`] and picks one monomorphized callback for
//! it, so the hot loop never branches on sample type.  Integer samples are
//! scaled by `1 / 2^(bits-1)` — the two's-complement full scale — which maps
//! the most negative value to exactly `-1.0` and the most positive to just
//! under `+1.0`.  Float samples pass through unchanged.

use cpal::SampleFormat;

// ---------------------------------------------------------------------------
// DeviceFormat
// ---------------------------------------------------------------------------

/// Native sample representation reported by the input device.
///
/// Captured once per [`start`](crate::capture::CaptureStream::start) and
/// immutable until the next start.  A format this module cannot normalize is
/// rejected before any callback is registered, so malformed metadata (e.g. a
/// zero bit width) can never reach the real-time path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceFormat {
    /// `true` when the device delivers floating-point samples.
    pub is_float: bool,
    /// Bits per sample of the native representation.
    pub bits_per_sample: u16,
    /// Sample rate the device runs at, in Hz.
    pub native_rate: u32,
}

impl DeviceFormat {
    /// Describe a cpal stream format, or `None` when the representation is
    /// one the normalizer does not handle.
    ///
    /// Supported: `f32`, `i16`, `i32` (24-bit devices surface as `i32` with
    /// the significant bits left-aligned, so the same full-scale divisor
    /// applies).
    pub fn from_stream(format: SampleFormat, native_rate: u32) -> Option<Self> {
        let (is_float, bits_per_sample) = match format {
            SampleFormat::F32 => (true, 32),
            SampleFormat::I16 => (false, 16),
            SampleFormat::I32 => (false, 32),
            _ => return None,
        };
        Some(Self {
            is_float,
            bits_per_sample,
            native_rate,
        })
    }
}

// ---------------------------------------------------------------------------
// RawSample
// ---------------------------------------------------------------------------

/// A raw hardware sample type the capture callback can be built for.
///
/// Implemented for exactly the representations [`DeviceFormat::from_stream`]
/// accepts; the dispatch happens once at stream start, never per sample.
pub trait RawSample: cpal::SizedSample + Copy + Send + 'static {
    /// Rescale this sample to `f32` in `[-1.0, 1.0]`.
    fn normalize(self) -> f32;
}

impl RawSample for f32 {
    #[inline]
    fn normalize(self) -> f32 {
        self
    }
}

impl RawSample for i16 {
    #[inline]
    fn normalize(self) -> f32 {
        // Full scale is 2^15; i16::MIN lands on -1.0 exactly.
        f32::from(self) * (1.0 / 32_768.0)
    }
}

impl RawSample for i32 {
    #[inline]
    fn normalize(self) -> f32 {
        // Divide in f64: f32 cannot represent every i32, and going through
        // f64 keeps the rounding to a single final step.
        ((f64::from(self)) * (1.0 / 2_147_483_648.0)) as f32
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // ---- DeviceFormat ------------------------------------------------------

    #[test]
    fn float32_format_recognised() {
        let fmt = DeviceFormat::from_stream(SampleFormat::F32, 48_000).unwrap();
        assert!(fmt.is_float);
        assert_eq!(fmt.bits_per_sample, 32);
        assert_eq!(fmt.native_rate, 48_000);
    }

    #[test]
    fn integer_formats_recognised() {
        let i16_fmt = DeviceFormat::from_stream(SampleFormat::I16, 44_100).unwrap();
        assert!(!i16_fmt.is_float);
        assert_eq!(i16_fmt.bits_per_sample, 16);

        let i32_fmt = DeviceFormat::from_stream(SampleFormat::I32, 96_000).unwrap();
        assert!(!i32_fmt.is_float);
        assert_eq!(i32_fmt.bits_per_sample, 32);
    }

    #[test]
    fn unhandled_formats_are_rejected() {
        assert!(DeviceFormat::from_stream(SampleFormat::U8, 44_100).is_none());
        assert!(DeviceFormat::from_stream(SampleFormat::U16, 44_100).is_none());
        assert!(DeviceFormat::from_stream(SampleFormat::F64, 44_100).is_none());
    }

    // ---- Normalization: f32 ------------------------------------------------

    #[test]
    fn float_samples_pass_through() {
        assert_eq!(0.5_f32.normalize(), 0.5);
        assert_eq!((-1.0_f32).normalize(), -1.0);
        assert_eq!(0.0_f32.normalize(), 0.0);
    }

    // ---- Normalization: i16 ------------------------------------------------

    #[test]
    fn i16_full_scale_negative_maps_to_minus_one() {
        assert_eq!(i16::MIN.normalize(), -1.0);
    }

    #[test]
    fn i16_full_scale_positive_keeps_twos_complement_asymmetry() {
        // 32767 / 32768 — strictly below +1.0, not clipped up to it.
        let max = i16::MAX.normalize();
        assert_eq!(max, 1.0 - 1.0 / 32_768.0);
        assert!(max < 1.0);
    }

    #[test]
    fn i16_zero_maps_to_zero() {
        assert_eq!(0_i16.normalize(), 0.0);
    }

    #[test]
    fn i16_midpoint_scales_linearly() {
        assert_eq!(16_384_i16.normalize(), 0.5);
        assert_eq!((-16_384_i16).normalize(), -0.5);
    }

    // ---- Normalization: i32 ------------------------------------------------

    #[test]
    fn i32_full_scale_negative_maps_to_minus_one() {
        assert_eq!(i32::MIN.normalize(), -1.0);
    }

    #[test]
    fn i32_full_scale_positive_stays_within_unit_range() {
        // 1 - 2^-31 is below f32 resolution near 1.0; the nearest
        // representable value is acceptable, but never above +1.0.
        let max = i32::MAX.normalize();
        assert!(max <= 1.0);
        assert!(max > 0.999_999);
    }

    #[test]
    fn i32_half_scale_maps_to_half() {
        assert_eq!((i32::MIN / 2).normalize(), -0.5);
        assert_eq!((1_073_741_824_i32).normalize(), 0.5);
    }
}
