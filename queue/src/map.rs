use core::fmt;

use ahash::AHashMap;

use crate::error::{empty_dequeue, exhausted, QueueError};
use crate::queue::impl_queue;

/// A queue stored in a hash map keyed by sequence number.
///
/// `first` is the key of the next element to dequeue and `last` the key the
/// next enqueue will use. Both only move forward, wrapping at `u64::MAX`.
/// Removed entries are deleted from the map, which manages its own capacity,
/// so there is no resize logic here.
pub struct MapQueue<T> {
  first: u64,
  last: u64,
  mem: AHashMap<u64, T>,
}

impl<T> MapQueue<T> {
  pub fn new() -> Self {
    Self {
      first: 0,
      last: 0,
      mem: AHashMap::new(),
    }
  }

  #[inline]
  pub fn len(&self) -> usize {
    self.mem.len()
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.mem.is_empty()
  }

  /// Appends `value` at the tail.
  ///
  /// # Panics
  ///
  /// Panics if the sequence space is exhausted.
  pub fn enqueue(&mut self, value: T) {
    if let Err(err) = self.try_enqueue(value) {
      exhausted("map", err);
    }
  }

  /// Appends `value` under the next sequence number.
  ///
  /// # Errors
  ///
  /// Returns [`QueueError::SequenceExhausted`] if advancing `last` would make
  /// it collide with `first`. Nothing is inserted in that case.
  pub fn try_enqueue(&mut self, value: T) -> Result<(), QueueError> {
    let next = self.last.wrapping_add(1);
    if next == self.first {
      return Err(QueueError::SequenceExhausted);
    }
    self.mem.insert(self.last, value);
    self.last = next;
    Ok(())
  }

  /// Removes and returns the element at the head.
  ///
  /// # Panics
  ///
  /// Panics if the queue is empty.
  pub fn dequeue(&mut self) -> T {
    if self.mem.is_empty() {
      empty_dequeue("map");
    }
    let value = match self.mem.remove(&self.first) {
      Some(value) => value,
      None => unreachable!("map queue missing sequence {}", self.first),
    };
    self.first = self.first.wrapping_add(1);
    value
  }
}

impl<T> Default for MapQueue<T> {
  fn default() -> Self {
    Self::new()
  }
}

impl<T> fmt::Debug for MapQueue<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("MapQueue")
      .field("len", &self.mem.len())
      .field("first", &self.first)
      .field("last", &self.last)
      .finish_non_exhaustive()
  }
}

impl_queue!(MapQueue);

#[cfg(test)]
mod tests {
  use super::*;

  fn starting_at<T>(seq: u64) -> MapQueue<T> {
    MapQueue {
      first: seq,
      last: seq,
      mem: AHashMap::new(),
    }
  }

  #[test]
  fn entries_are_deleted_on_dequeue() {
    let mut queue = MapQueue::new();
    queue.enqueue('a');
    queue.enqueue('b');
    assert_eq!(queue.dequeue(), 'a');
    assert!(!queue.mem.contains_key(&0));
    assert_eq!(queue.len(), 1);
    assert_eq!(queue.first, 1);
    assert_eq!(queue.last, 2);
  }

  #[test]
  fn counters_wrap_at_u64_max() {
    let mut queue = starting_at(u64::MAX - 1);
    for i in 0..4 {
      queue.enqueue(i);
    }
    assert_eq!(queue.last, 2);
    let drained: Vec<_> = (0..4).map(|_| queue.dequeue()).collect();
    assert_eq!(drained, vec![0, 1, 2, 3]);
  }

  #[test]
  fn exhausted_sequence_space_is_reported_without_mutation() {
    let mut queue = MapQueue {
      first: 0,
      last: u64::MAX,
      mem: AHashMap::new(),
    };
    assert_eq!(queue.try_enqueue(1), Err(QueueError::SequenceExhausted));
    assert_eq!(queue.last, u64::MAX);
    assert!(queue.is_empty());
  }

  #[test]
  #[should_panic(expected = "map queue sequence space exhausted")]
  fn enqueue_panics_when_exhausted() {
    let mut queue = MapQueue {
      first: 5,
      last: 4,
      mem: AHashMap::new(),
    };
    queue.enqueue(1);
  }

  #[test]
  #[should_panic(expected = "dequeue from empty map queue")]
  fn dequeue_on_empty_panics() {
    let mut queue = MapQueue::<u8>::new();
    queue.dequeue();
  }
}
