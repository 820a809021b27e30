use core::fmt;
use std::mem;

use fibre::spsc::{bounded_sync, BoundedSyncReceiver, BoundedSyncSender};
use fibre::TrySendError;
use tracing::debug;

use crate::config::QueueConfig;
use crate::error::{empty_dequeue, exhausted, QueueError};
use crate::policy::{grow_capacity, should_shrink};
use crate::queue::impl_queue;

/// A queue built on a bounded SPSC channel used purely as storage.
///
/// Both ends are held by the queue. Only the non-blocking `try_send` and
/// `try_recv` are ever called, so an empty dequeue panics instead of waiting
/// for a producer. When the pipe is full, a larger one is created, the old
/// sender is closed and everything buffered is moved across in order before
/// the new element goes in. Shrinking moves elements the same way.
pub struct ChanQueue<T> {
  tx: BoundedSyncSender<T>,
  rx: BoundedSyncReceiver<T>,
  config: QueueConfig,
}

impl<T: Send> ChanQueue<T> {
  /// Creates an empty queue with the default configuration.
  pub fn new() -> Self {
    Self::with_config(QueueConfig::default())
  }

  /// Creates an empty queue whose pipe starts at the configured base capacity.
  pub fn with_config(config: QueueConfig) -> Self {
    let (tx, rx) = bounded_sync(config.base_capacity);
    Self { tx, rx, config }
  }

  #[inline]
  pub fn len(&self) -> usize {
    self.rx.len()
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.rx.is_empty()
  }

  #[inline]
  pub fn capacity(&self) -> usize {
    self.rx.capacity()
  }

  /// Appends `value` at the tail.
  ///
  /// # Panics
  ///
  /// Panics if the element cannot be stored.
  pub fn enqueue(&mut self, value: T) {
    if let Err(err) = self.try_enqueue(value) {
      exhausted("chan", err);
    }
  }

  /// Appends `value` at the tail, swapping in a larger pipe if the current
  /// one is full.
  ///
  /// The larger pipe is allocated before anything is moved out of the old
  /// one.
  pub fn try_enqueue(&mut self, value: T) -> Result<(), QueueError> {
    let value = match self.tx.try_send(value) {
      Ok(()) => return Ok(()),
      Err(TrySendError::Full(value)) => value,
      Err(_) => unreachable!("chan queue holds both ends of its pipe"),
    };

    let from = self.capacity();
    let to = grow_capacity(&self.config, from);
    if to <= from {
      return Err(QueueError::AllocFailed { requested: from.saturating_add(1) });
    }
    self.swap_pipe(to);
    debug!(len = self.len(), from, to, "chan queue grew");

    match self.tx.try_send(value) {
      Ok(()) => Ok(()),
      Err(_) => unreachable!("grown pipe rejected an element"),
    }
  }

  /// Removes and returns the element at the head.
  ///
  /// # Panics
  ///
  /// Panics if the queue is empty. This never blocks.
  pub fn dequeue(&mut self) -> T {
    let value = match self.rx.try_recv() {
      Ok(value) => value,
      Err(_) => empty_dequeue("chan"),
    };

    let from = self.capacity();
    if let Some(to) = should_shrink(&self.config, self.len(), from) {
      self.swap_pipe(to);
      debug!(len = self.len(), from, to, "chan queue shrunk");
    }
    value
  }

  // Replaces the pipe with one of `capacity` slots and moves every buffered
  // element into it, oldest first.
  fn swap_pipe(&mut self, capacity: usize) {
    debug_assert!(capacity >= self.len(), "chan resize would drop elements");

    let (tx, rx) = bounded_sync(capacity);
    let old_tx = mem::replace(&mut self.tx, tx);
    let old_rx = mem::replace(&mut self.rx, rx);

    // Closing the producer side makes `try_recv` report disconnection once
    // the buffer is exhausted.
    drop(old_tx);
    while let Ok(value) = old_rx.try_recv() {
      if self.tx.try_send(value).is_err() {
        unreachable!("resized pipe is smaller than its contents");
      }
    }
  }
}

impl<T: Send> Default for ChanQueue<T> {
  fn default() -> Self {
    Self::new()
  }
}

impl<T: Send> fmt::Debug for ChanQueue<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ChanQueue")
      .field("len", &self.rx.len())
      .field("capacity", &self.rx.capacity())
      .finish_non_exhaustive()
  }
}

impl_queue!(ChanQueue, Send);
