use core::fmt;

use tracing::{debug, warn};

use crate::config::QueueConfig;
use crate::error::{empty_dequeue, exhausted, QueueError};
use crate::policy::should_shrink;
use crate::queue::impl_queue;

/// A queue over a single contiguous buffer that is only ever appended to.
///
/// Dequeuing moves the element out of its slot and advances a front offset;
/// the vacated prefix is not reused until the buffer fills up, at which point
/// it is reclaimed by shifting the live elements to the front. Growth is
/// left to `Vec`. After every dequeue the shared shrink rule is applied to the
/// whole allocation, so a queue that drained from a large peak is copied into
/// a right-sized buffer and the dead prefix is released with it.
pub struct SliceQueue<T> {
  // Slots before `head` have been dequeued and hold `None`.
  buf: Vec<Option<T>>,
  head: usize,
  config: QueueConfig,
}

impl<T> SliceQueue<T> {
  /// Creates an empty queue with the default configuration.
  ///
  /// No memory is allocated until the first enqueue.
  pub fn new() -> Self {
    Self::with_config(QueueConfig::default())
  }

  pub fn with_config(config: QueueConfig) -> Self {
    Self {
      buf: Vec::new(),
      head: 0,
      config,
    }
  }

  #[inline]
  pub fn len(&self) -> usize {
    self.buf.len() - self.head
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Number of slots in the current allocation, including the dead prefix.
  #[inline]
  pub fn capacity(&self) -> usize {
    self.buf.capacity()
  }

  /// Appends `value` at the tail.
  ///
  /// # Panics
  ///
  /// Panics if the buffer cannot be grown.
  pub fn enqueue(&mut self, value: T) {
    if let Err(err) = self.try_enqueue(value) {
      exhausted("slice", err);
    }
  }

  /// Appends `value` at the tail, reporting allocation failure instead of
  /// panicking.
  pub fn try_enqueue(&mut self, value: T) -> Result<(), QueueError> {
    if self.buf.capacity() == 0 {
      let base = self.config.base_capacity;
      self
        .buf
        .try_reserve_exact(base)
        .map_err(|_| QueueError::AllocFailed { requested: base })?;
    } else if self.buf.len() == self.buf.capacity() {
      // Shifting is amortized O(1) only while the dead prefix is at least
      // as large as the live window.
      if self.head > 0 && self.head >= self.len() {
        self.buf.drain(..self.head);
        self.head = 0;
      } else {
        let requested = self.buf.len() + 1;
        self
          .buf
          .try_reserve(1)
          .map_err(|_| QueueError::AllocFailed { requested })?;
      }
    }
    self.buf.push(Some(value));
    Ok(())
  }

  /// Removes and returns the element at the head.
  ///
  /// # Panics
  ///
  /// Panics if the queue is empty.
  pub fn dequeue(&mut self) -> T {
    let value = match self.buf.get_mut(self.head).and_then(Option::take) {
      Some(value) => value,
      None => empty_dequeue("slice"),
    };
    self.head += 1;

    if self.head == self.buf.len() {
      // Drained: keep the allocation but start over at offset zero.
      self.buf.clear();
      self.head = 0;
    } else {
      self.shrink_if_sparse();
    }
    value
  }

  fn shrink_if_sparse(&mut self) {
    let len = self.len();
    let capacity = self.buf.capacity();
    let Some(new_capacity) = should_shrink(&self.config, len, capacity) else {
      return;
    };

    let mut fresh = Vec::new();
    if fresh.try_reserve_exact(new_capacity).is_err() {
      warn!(len, capacity, new_capacity, "slice queue shrink skipped, allocation failed");
      return;
    }
    fresh.extend(self.buf.drain(self.head..));
    self.buf = fresh;
    self.head = 0;
    debug!(len, from = capacity, to = self.buf.capacity(), "slice queue shrunk");
  }
}

impl<T> Default for SliceQueue<T> {
  fn default() -> Self {
    Self::new()
  }
}

impl<T> fmt::Debug for SliceQueue<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("SliceQueue")
      .field("len", &self.len())
      .field("head", &self.head)
      .field("capacity", &self.capacity())
      .finish_non_exhaustive()
  }
}

impl_queue!(SliceQueue);

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn first_enqueue_allocates_base_capacity() {
    let mut queue = SliceQueue::new();
    assert_eq!(queue.capacity(), 0);
    queue.enqueue(1u8);
    assert!(queue.capacity() >= 8);
  }

  #[test]
  fn dequeue_preserves_insertion_order() {
    let mut queue = SliceQueue::new();
    for i in 0..20 {
      queue.enqueue(i);
    }
    let drained: Vec<_> = (0..20).map(|_| queue.dequeue()).collect();
    assert_eq!(drained, (0..20).collect::<Vec<_>>());
    assert!(queue.is_empty());
  }

  #[test]
  fn full_buffer_reuses_dead_prefix_without_growing() {
    let config = QueueConfig::builder().base_capacity(4).build().unwrap();
    let mut queue = SliceQueue::with_config(config);
    for i in 0..4 {
      queue.enqueue(i);
    }
    let capacity = queue.capacity();
    assert_eq!(queue.dequeue(), 0);
    assert_eq!(queue.dequeue(), 1);
    queue.enqueue(4);
    queue.enqueue(5);
    assert_eq!(queue.capacity(), capacity);
    assert_eq!(queue.head, 0);
    let drained: Vec<_> = (0..4).map(|_| queue.dequeue()).collect();
    assert_eq!(drained, vec![2, 3, 4, 5]);
  }

  #[test]
  fn draining_resets_offset() {
    let mut queue = SliceQueue::new();
    for i in 0..5 {
      queue.enqueue(i);
    }
    for _ in 0..5 {
      queue.dequeue();
    }
    assert_eq!(queue.head, 0);
    assert_eq!(queue.len(), 0);
  }

  #[test]
  fn sparse_buffer_is_rebuilt_smaller() {
    let mut queue = SliceQueue::with_config(QueueConfig::compact());
    for i in 0..256 {
      queue.enqueue(i);
    }
    let peak = queue.capacity();
    for _ in 0..246 {
      queue.dequeue();
    }
    assert!(queue.capacity() < peak);
    let drained: Vec<_> = (0..10).map(|_| queue.dequeue()).collect();
    assert_eq!(drained, (246..256).collect::<Vec<_>>());
  }

  #[test]
  #[should_panic(expected = "dequeue from empty slice queue")]
  fn dequeue_on_empty_panics() {
    let mut queue = SliceQueue::<u32>::new();
    queue.dequeue();
  }
}
