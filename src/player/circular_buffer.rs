use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

/// Interleaved sample queue shared by the decoder and the audio output.
/// Pushing never blocks: once full, the oldest samples are overwritten.
pub struct CircularBuffer<T> {
    inner: Mutex<VecDeque<T>>,
    capacity: usize,
}

impl<T: Copy> CircularBuffer<T> {
    pub fn new(capacity: usize) -> Arc<Self> {
        Arc::new(Self {
            inner: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        })
    }

    /// Append samples, dropping the oldest as needed.
    pub fn push_slice(&self, items: &[T]) {
        let mut buf = self.inner.lock();
        let overflow = (buf.len() + items.len()).saturating_sub(self.capacity);
        buf.drain(..overflow.min(buf.len()));

        // A slice longer than the buffer only keeps its tail
        let skip = items.len().saturating_sub(self.capacity);
        buf.extend(items[skip..].iter().copied());
    }

    /// Move up to `out.len()` samples into `out`, returning how many were written.
    pub fn pop_into(&self, out: &mut [T]) -> usize {
        let mut buf = self.inner.lock();
        let count = out.len().min(buf.len());
        for (slot, sample) in out.iter_mut().zip(buf.drain(..count)) {
            *slot = sample;
        }
        count
    }

    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// True once the buffer is three quarters full; producers should wait
    /// rather than overwrite samples that have not been played yet.
    pub fn is_backlogged(&self) -> bool {
        self.len() * 4 >= self.capacity * 3
    }
}
