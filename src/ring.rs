//! Fixed-capacity lock-free scope buffer for normalized `f32` samples.
//!
//! The hardware callback is the only writer; the visualisation loop (or any
//! other consumer) polls the buffer without taking a lock.  Samples are stored
//! as `AtomicU32` bit patterns and the write cursor is an `AtomicUsize`, so a
//! reader can race the writer freely — the worst it can observe is a stale or
//! freshly overwritten sample near the cursor, which shows up as a one-sample
//! glitch in a time-domain display.
//!
//! There is no backpressure and no overwrite notification: once the writer
//! laps a slow reader, old samples are silently replaced.  The buffer always
//! holds the most recent [`SCOPE_BUFFER_LEN`] samples.
//!
//! # Example
//!
//! ```rust
//! use wavescope::ring::ScopeBuffer;
//!
//! let scope = ScopeBuffer::new();
//! scope.write(0.25);
//! scope.write(-0.5);
//!
//! assert_eq!(scope.cursor(), 2);
//! assert_eq!(scope.get(0), 0.25);
//! assert_eq!(scope.get(1), -0.5);
//! ```

use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

/// Number of samples the scope buffer holds.
///
/// At the 44.1 kHz nominal output rate this is roughly 370 ms of signal —
/// several display frames' worth of headroom for a consumer polling at
/// 30–60 fps.  Power of two, fixed at compile time.
pub const SCOPE_BUFFER_LEN: usize = 16 * 1024;

// ---------------------------------------------------------------------------
// ScopeBuffer
// ---------------------------------------------------------------------------

/// Circular sample buffer with a single writer and lock-free readers.
///
/// The write cursor always names the *next* slot to be written; the most
/// recently written sample therefore sits at `(cursor - 1) % capacity`.
/// All index arithmetic is modulo the capacity, so no write or read can go
/// out of bounds by construction.
pub struct ScopeBuffer {
    /// Sample storage as `f32` bit patterns.
    slots: Box<[AtomicU32]>,
    /// Next slot to be written, in `[0, SCOPE_BUFFER_LEN)`.
    cursor: AtomicUsize,
}

impl ScopeBuffer {
    /// Create a zero-filled buffer of [`SCOPE_BUFFER_LEN`] samples.
    pub fn new() -> Self {
        let mut slots = Vec::with_capacity(SCOPE_BUFFER_LEN);
        slots.resize_with(SCOPE_BUFFER_LEN, || AtomicU32::new(0));
        Self {
            slots: slots.into_boxed_slice(),
            cursor: AtomicUsize::new(0),
        }
    }

    /// Store `sample` at the cursor and advance it by one, wrapping at
    /// capacity.
    ///
    /// Single-writer operation: only the audio callback thread may call this.
    /// It never allocates, locks or blocks.  The cursor store uses `Release`
    /// ordering so a reader that observes the new cursor value also observes
    /// the sample written behind it.
    pub fn write(&self, sample: f32) {
        let w = self.cursor.load(Ordering::Relaxed);
        self.slots[w].store(sample.to_bits(), Ordering::Relaxed);
        self.cursor
            .store((w + 1) % self.slots.len(), Ordering::Release);
    }

    /// Current write cursor — the index of the next slot to be written.
    pub fn cursor(&self) -> usize {
        self.cursor.load(Ordering::Acquire)
    }

    /// Fixed capacity of the buffer, in samples.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Read the sample at `index`.
    ///
    /// The index is taken modulo capacity.  Slots at or just behind the
    /// cursor may be rewritten concurrently; the caller decides which slots
    /// are fresh by comparing indices against [`cursor`](Self::cursor).
    pub fn get(&self, index: usize) -> f32 {
        f32::from_bits(self.slots[index % self.slots.len()].load(Ordering::Relaxed))
    }

    /// Raw view of the backing storage for zero-copy consumers.
    ///
    /// Pair this with [`cursor`](Self::cursor) and
    /// [`capacity`](Self::capacity) to hand the whole surface to a renderer
    /// that wants to upload the buffer wholesale.
    pub fn slots(&self) -> &[AtomicU32] {
        &self.slots
    }

    /// Copy the most recent samples into `out` in chronological order.
    ///
    /// Fills `out[..n]` with the `n = min(out.len(), capacity)` newest
    /// samples, oldest first, ending with the sample just behind the cursor.
    /// Returns `n`.  The copy races the writer; samples overwritten mid-copy
    /// come out as a mix of old and new signal, which is acceptable for
    /// display purposes.
    pub fn snapshot_into(&self, out: &mut [f32]) -> usize {
        let cap = self.slots.len();
        let n = out.len().min(cap);
        if n == 0 {
            return 0;
        }

        let cursor = self.cursor.load(Ordering::Acquire);
        let start = (cursor + cap - n) % cap;
        for (i, slot) in out[..n].iter_mut().enumerate() {
            *slot = self.get((start + i) % cap);
        }
        n
    }
}

impl Default for ScopeBuffer {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
