//! Live audio capture for waveform visualisation.
//!
//! # Pipeline
//!
//! ```text
//! Microphone → cpal callback → normalize (f32 / i16 / i32 → [-1, 1])
//!           → decimate (keep 1 in round(native/44100))
//!           → ScopeBuffer (lock-free ring, most recent 16 Ki samples)
//!           → polled by the render loop (WaveformData / raw slots)
//! ```
//!
//! The callback side runs on the platform's real-time audio thread and
//! never allocates, locks or blocks; the consumer side polls at its own
//! cadence and never blocks the writer.  The two meet only at the atomic
//! ring in [`ring::ScopeBuffer`].
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use wavescope::{CaptureStream, WaveformData};
//!
//! let mut stream = CaptureStream::new();
//! if let Err(err) = stream.start() {
//!     // No device / odd format: stay idle, retry whenever.
//!     log::warn!("capture unavailable: {err}");
//! }
//!
//! let scope = stream.scope();
//! loop {
//!     // Once per render frame:
//!     let wave = WaveformData::from_scope(&scope, 4_096, 64);
//!     # let _ = wave; break;
//! }
//! ```

pub mod capture;
pub mod decimate;
pub mod format;
pub mod ring;
pub mod waveform;

pub use capture::{CaptureError, CaptureStream, TARGET_SAMPLE_RATE};
pub use decimate::Decimator;
pub use format::DeviceFormat;
pub use ring::{ScopeBuffer, SCOPE_BUFFER_LEN};
pub use waveform::WaveformData;
