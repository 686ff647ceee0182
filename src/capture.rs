//! Live input capture via `cpal`.
//!
//! [`CaptureStream`] wraps the cpal host/device/stream lifecycle.  Call
//! [`CaptureStream::start`] to bind the platform default input device and
//! begin filling the shared [`ScopeBuffer`]; [`CaptureStream::stop`] tears
//! the binding down again.  Both are idempotent, and a started stream stops
//! itself on drop.
//!
//! The per-buffer processing path — normalize, decimate, write — runs on the
//! dedicated real-time audio thread cpal provides.  It never allocates,
//! locks or blocks: per frame it is one phase step, at most one float
//! conversion and one atomic store.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use log::{error, info};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;

use crate::decimate::Decimator;
use crate::format::{DeviceFormat, RawSample};
use crate::ring::ScopeBuffer;

/// Nominal sample rate the scope buffer is decimated towards, in Hz.
///
/// The effective rate is `native / round(native / TARGET_SAMPLE_RATE)` and
/// may drift from this nominal value; read it per stream via
/// [`CaptureStream::output_sample_rate`].
pub const TARGET_SAMPLE_RATE: u32 = 44_100;

// ---------------------------------------------------------------------------
// CaptureError
// ---------------------------------------------------------------------------

/// Errors that can occur while binding the input device.
///
/// All of these are recoverable at the [`start`](CaptureStream::start)
/// boundary: the stream stays Idle, holds no partial device state, and a
/// later `start()` may succeed (a device can be plugged in, a format can
/// change).  Nothing here ever crosses out of the real-time callback.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// No default input device exists right now.  Normal and reportable,
    /// not fatal — retry later.
    #[error("no input device found on the default audio host")]
    NoDevice,

    /// The device reports a sample representation the normalizer does not
    /// handle, so no callback is registered at all.
    #[error("unsupported device sample format: {0:?}")]
    UnsupportedFormat(cpal::SampleFormat),

    #[error("failed to query default input config: {0}")]
    DefaultConfig(#[from] cpal::DefaultStreamConfigError),

    #[error("failed to build input stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("failed to start audio stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),
}

// ---------------------------------------------------------------------------
// CaptureStream
// ---------------------------------------------------------------------------

/// The capture aggregate: one device binding, one scope buffer, one
/// decimation state.
///
/// Externally two states, Idle and Started.  `start()` on a Started stream
/// and `stop()` on an Idle stream are no-ops; there is no external
/// serialization for *concurrent* `start()` calls (take `&mut self`).
///
/// # Example
///
/// ```rust,no_run
/// use wavescope::capture::CaptureStream;
///
/// let mut stream = CaptureStream::new();
/// stream.start().expect("no usable input device");
///
/// // Poll from the render loop:
/// let scope = stream.scope();
/// let mut frame = vec![0.0f32; 1024];
/// scope.snapshot_into(&mut frame);
///
/// stream.stop();
/// ```
pub struct CaptureStream {
    scope: Arc<ScopeBuffer>,
    active: Option<ActiveCapture>,
}

/// Resources held only while Started.  Dropping this stops the hardware
/// stream; cpal blocks the drop until no further callback invocation can
/// occur, so the callback never outlives the binding.
struct ActiveCapture {
    _stream: cpal::Stream,
    live: Arc<AtomicBool>,
    format: DeviceFormat,
    output_rate: f32,
}

impl CaptureStream {
    /// Create an inert stream.  No device is touched until
    /// [`start`](Self::start).
    pub fn new() -> Self {
        Self {
            scope: Arc::new(ScopeBuffer::new()),
            active: None,
        }
    }

    /// Bind the default input device and start capturing.
    ///
    /// Idempotent: a Started stream returns `Ok` immediately without
    /// re-acquiring anything.  On any failure the stream remains Idle with
    /// no partial state — the device handle and half-built stream are
    /// released before the error is returned.
    ///
    /// Decimation phase is reset here; the scope buffer and its cursor are
    /// not, so a consumer keeps seeing the tail of the previous session
    /// until fresh samples overwrite it.
    pub fn start(&mut self) -> Result<(), CaptureError> {
        if self.active.is_some() {
            return Ok(());
        }

        let host = cpal::default_host();
        let device = host.default_input_device().ok_or(CaptureError::NoDevice)?;
        let supported = device.default_input_config()?;

        let sample_format = supported.sample_format();
        let native_rate = supported.sample_rate().0;
        let channels = supported.channels() as usize;
        let format = DeviceFormat::from_stream(sample_format, native_rate)
            .ok_or(CaptureError::UnsupportedFormat(sample_format))?;
        let config: cpal::StreamConfig = supported.into();

        let decimator = Decimator::new(native_rate, TARGET_SAMPLE_RATE);
        let output_rate = decimator.output_rate(native_rate);
        info!(
            "capture start: {} Hz native, {channels} ch, {sample_format:?}, \
             keep 1/{} → {output_rate} Hz effective",
            native_rate,
            decimator.ratio(),
        );

        let live = Arc::new(AtomicBool::new(true));
        let stream = match sample_format {
            cpal::SampleFormat::F32 => {
                self.build_stream::<f32>(&device, &config, channels, decimator, &live)?
            }
            cpal::SampleFormat::I16 => {
                self.build_stream::<i16>(&device, &config, channels, decimator, &live)?
            }
            cpal::SampleFormat::I32 => {
                self.build_stream::<i32>(&device, &config, channels, decimator, &live)?
            }
            other => return Err(CaptureError::UnsupportedFormat(other)),
        };
        stream.play()?;

        self.active = Some(ActiveCapture {
            _stream: stream,
            live,
            format,
            output_rate,
        });
        Ok(())
    }

    /// Build the input stream for one raw sample type, resolved once here —
    /// the callback is monomorphized and never branches on format.
    fn build_stream<T: RawSample>(
        &self,
        device: &cpal::Device,
        config: &cpal::StreamConfig,
        channels: usize,
        mut decimator: Decimator,
        live: &Arc<AtomicBool>,
    ) -> Result<cpal::Stream, CaptureError> {
        let scope = Arc::clone(&self.scope);
        let live = Arc::clone(live);

        let stream = device.build_input_stream(
            config,
            move |data: &[T], _: &cpal::InputCallbackInfo| {
                // Liveness gate: once stop() clears this, the callback no
                // longer touches buffer state even if a late invocation
                // races the teardown.
                if !live.load(Ordering::Relaxed) {
                    return;
                }
                decimate_into(data, channels, &mut decimator, &scope);
            },
            |err: cpal::StreamError| {
                // Errors on the audio thread only ever cost the affected
                // buffers; they must not propagate or panic here.
                error!("cpal stream error: {err}");
            },
            None, // no timeout
        )?;
        Ok(stream)
    }

    /// Stop capturing and release the device.
    ///
    /// Idempotent: a no-op on an Idle stream.  Safe to call while the
    /// hardware callback is mid-execution — the liveness flag is cleared
    /// first, then the stream drop blocks until cpal guarantees no further
    /// invocations.
    pub fn stop(&mut self) {
        if let Some(active) = self.active.take() {
            active.live.store(false, Ordering::Relaxed);
            drop(active);
            info!("capture stopped");
        }
    }

    /// Whether the stream currently holds a device binding.
    pub fn is_started(&self) -> bool {
        self.active.is_some()
    }

    /// Shared handle to the scope buffer for the polling consumer.
    ///
    /// The handle stays valid after `stop()` or even after the stream is
    /// dropped; it simply stops receiving new samples.
    pub fn scope(&self) -> Arc<ScopeBuffer> {
        Arc::clone(&self.scope)
    }

    /// Native format captured at the last successful `start()`, while
    /// Started.
    pub fn device_format(&self) -> Option<DeviceFormat> {
        self.active.as_ref().map(|a| a.format)
    }

    /// Effective sample rate of the scope buffer contents in Hz, while
    /// Started.
    pub fn output_sample_rate(&self) -> Option<f32> {
        self.active.as_ref().map(|a| a.output_rate)
    }
}

impl Default for CaptureStream {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for CaptureStream {
    fn drop(&mut self) {
        self.stop();
    }
}

// ---------------------------------------------------------------------------
// Per-buffer processing path
// ---------------------------------------------------------------------------

/// Normalize, decimate and write one hardware buffer into the scope.
///
/// Frames arrive interleaved; only channel 0 is taken, the rest discarded.
/// The decimation phase advances once per frame whether or not the frame is
/// kept, so the keep pattern is stable across arbitrary buffer sizes.
fn decimate_into<T: RawSample>(
    data: &[T],
    channels: usize,
    decimator: &mut Decimator,
    scope: &ScopeBuffer,
) {
    if channels == 0 {
        return;
    }
    for frame in data.chunks_exact(channels) {
        if decimator.keep() {
            scope.write(frame[0].normalize());
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
