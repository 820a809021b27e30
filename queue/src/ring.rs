use core::fmt;
use std::mem::MaybeUninit;
use std::ptr;

use tracing::{debug, warn};

use crate::config::QueueConfig;
use crate::error::{empty_dequeue, exhausted, QueueError};
use crate::policy::{grow_capacity, should_shrink};
use crate::queue::impl_queue;

/// A queue over a circular buffer.
///
/// Logical index `i` lives at physical slot `(first + i) % capacity`. Growth
/// and shrink both go through [`rebuild`](RingQueue::rebuild), which copies
/// the live window into a fresh buffer starting at slot zero.
pub struct RingQueue<T> {
  // `buf.len()` is the physical capacity. Exactly the `len` slots starting
  // at `first` (wrapping) are initialized.
  buf: Vec<MaybeUninit<T>>,
  first: usize,
  len: usize,
  config: QueueConfig,
}

impl<T> RingQueue<T> {
  /// Creates an empty queue with the default configuration.
  ///
  /// No memory is allocated until the first enqueue.
  pub fn new() -> Self {
    Self::with_config(QueueConfig::default())
  }

  pub fn with_config(config: QueueConfig) -> Self {
    Self {
      buf: Vec::new(),
      first: 0,
      len: 0,
      config,
    }
  }

  #[inline]
  pub fn len(&self) -> usize {
    self.len
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.len == 0
  }

  #[inline]
  pub fn capacity(&self) -> usize {
    self.buf.len()
  }

  /// Appends `value` at the tail.
  ///
  /// # Panics
  ///
  /// Panics if the buffer cannot be grown.
  pub fn enqueue(&mut self, value: T) {
    if let Err(err) = self.try_enqueue(value) {
      exhausted("ring", err);
    }
  }

  /// Appends `value` at the tail, reporting allocation failure instead of
  /// panicking.
  pub fn try_enqueue(&mut self, value: T) -> Result<(), QueueError> {
    if self.len == self.buf.len() {
      let from = self.buf.len();
      let to = grow_capacity(&self.config, from);
      if to <= from {
        return Err(QueueError::AllocFailed { requested: from.saturating_add(1) });
      }
      self.rebuild(to)?;
      debug!(len = self.len, from, to, "ring queue grew");
    }
    let slot = (self.first + self.len) % self.buf.len();
    self.buf[slot].write(value);
    self.len += 1;
    Ok(())
  }

  /// Removes and returns the element at the head.
  ///
  /// # Panics
  ///
  /// Panics if the queue is empty.
  pub fn dequeue(&mut self) -> T {
    if self.len == 0 {
      empty_dequeue("ring");
    }
    // SAFETY: `len > 0`, so the slot at `first` is initialized. Advancing
    // `first` below marks it uninitialized again.
    let value = unsafe { self.buf[self.first].assume_init_read() };
    self.first = (self.first + 1) % self.buf.len();
    self.len -= 1;

    let from = self.buf.len();
    if let Some(to) = should_shrink(&self.config, self.len, from) {
      match self.rebuild(to) {
        Ok(()) => debug!(len = self.len, from, to, "ring queue shrunk"),
        Err(err) => warn!(len = self.len, from, to, %err, "ring queue shrink skipped"),
      }
    }
    value
  }

  /// Moves the live window into a new buffer of `capacity` slots, linearized
  /// so that the head lands at slot zero.
  ///
  /// The new buffer is reserved before anything moves, so on error the queue
  /// is untouched.
  fn rebuild(&mut self, capacity: usize) -> Result<(), QueueError> {
    debug_assert!(capacity >= self.len, "ring rebuild would drop elements");

    let mut fresh: Vec<MaybeUninit<T>> = Vec::new();
    fresh
      .try_reserve_exact(capacity)
      .map_err(|_| QueueError::AllocFailed { requested: capacity })?;
    fresh.resize_with(capacity, MaybeUninit::uninit);

    // The window may wrap: first copy the run from `first` to the physical
    // end, then whatever continues from slot zero.
    let run = (self.buf.len() - self.first).min(self.len);
    // SAFETY: both runs are initialized in `buf` and `fresh` has room for
    // `len` slots. The old buffer holds `MaybeUninit`, so dropping it below
    // does not drop the moved elements a second time.
    unsafe {
      let src = self.buf.as_ptr();
      let dst = fresh.as_mut_ptr();
      ptr::copy_nonoverlapping(src.add(self.first), dst, run);
      ptr::copy_nonoverlapping(src, dst.add(run), self.len - run);
    }

    self.buf = fresh;
    self.first = 0;
    Ok(())
  }
}

impl<T> Drop for RingQueue<T> {
  fn drop(&mut self) {
    let capacity = self.buf.len();
    for i in 0..self.len {
      let slot = (self.first + i) % capacity;
      // SAFETY: every slot of the live window is initialized and dropped once.
      unsafe { self.buf[slot].assume_init_drop() };
    }
  }
}

impl<T> Default for RingQueue<T> {
  fn default() -> Self {
    Self::new()
  }
}

impl<T> fmt::Debug for RingQueue<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("RingQueue")
      .field("len", &self.len)
      .field("first", &self.first)
      .field("capacity", &self.capacity())
      .finish_non_exhaustive()
  }
}

impl_queue!(RingQueue);
