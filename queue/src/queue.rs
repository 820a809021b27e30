use core::fmt;
use std::str::FromStr;

use crate::chan::ChanQueue;
use crate::config::QueueConfig;
use crate::error::{ParseKindError, QueueError};
use crate::linked::LinkedQueue;
use crate::map::MapQueue;
use crate::pooled::PooledQueue;
use crate::ring::RingQueue;
use crate::slice::SliceQueue;

/// A single-owner FIFO container.
///
/// All implementations share the same observable behavior: elements come out
/// in the order they went in, and `len` is the number of enqueues minus the
/// number of dequeues. None of them are safe to mutate from several threads
/// without external locking, and none of them ever block.
pub trait Queue<T> {
  /// Returns the number of elements currently stored.
  fn len(&self) -> usize;

  /// Returns `true` if the queue holds no elements.
  fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Appends an element at the tail.
  ///
  /// # Errors
  ///
  /// Returns a [`QueueError`] if storage could not be obtained. The queue is
  /// left unchanged in that case.
  fn try_enqueue(&mut self, value: T) -> Result<(), QueueError>;

  /// Appends an element at the tail.
  ///
  /// # Panics
  ///
  /// Panics if the queue cannot obtain storage for the element.
  fn enqueue(&mut self, value: T) {
    if let Err(err) = self.try_enqueue(value) {
      panic!("enqueue failed: {err}");
    }
  }

  /// Removes and returns the element at the head.
  ///
  /// # Panics
  ///
  /// Panics if the queue is empty. Callers must check [`len`](Queue::len)
  /// first; an empty dequeue is a bug, never a wait condition.
  fn dequeue(&mut self) -> T;
}

// Forwards the trait to the inherent methods of a backend.
macro_rules! impl_queue {
  ($ty:ident $(, $($bound:tt)+)?) => {
    impl<T> $crate::queue::Queue<T> for $ty<T>
    where
      T: $($($bound)+)?,
    {
      #[inline]
      fn len(&self) -> usize {
        $ty::len(self)
      }

      #[inline]
      fn try_enqueue(&mut self, value: T) -> Result<(), $crate::error::QueueError> {
        $ty::try_enqueue(self, value)
      }

      #[inline]
      fn enqueue(&mut self, value: T) {
        $ty::enqueue(self, value)
      }

      #[inline]
      fn dequeue(&mut self) -> T {
        $ty::dequeue(self)
      }
    }
  };
}

pub(crate) use impl_queue;

/// Names the six storage strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum QueueKind {
  /// Contiguous buffer with a front offset, see [`SliceQueue`].
  Slice,
  /// Circular buffer, see [`RingQueue`].
  Ring,
  /// Bounded pipe that is swapped for a larger one on overflow, see [`ChanQueue`].
  Chan,
  /// One heap node per element, see [`LinkedQueue`].
  Linked,
  /// Linked nodes recycled through a pool, see [`PooledQueue`].
  Pooled,
  /// Hash map keyed by sequence number, see [`MapQueue`].
  Map,
}

impl QueueKind {
  pub const ALL: [QueueKind; 6] = [
    QueueKind::Slice,
    QueueKind::Ring,
    QueueKind::Chan,
    QueueKind::Linked,
    QueueKind::Pooled,
    QueueKind::Map,
  ];

  pub fn name(self) -> &'static str {
    match self {
      QueueKind::Slice => "slice",
      QueueKind::Ring => "ring",
      QueueKind::Chan => "chan",
      QueueKind::Linked => "linked",
      QueueKind::Pooled => "pooled",
      QueueKind::Map => "map",
    }
  }

  /// Builds an empty queue of this kind behind a trait object.
  ///
  /// `config` only affects the slice, ring and chan kinds; the others have
  /// no resize policy.
  pub fn build<T: Send + 'static>(self, config: QueueConfig) -> Box<dyn Queue<T> + Send> {
    match self {
      QueueKind::Slice => Box::new(SliceQueue::with_config(config)),
      QueueKind::Ring => Box::new(RingQueue::with_config(config)),
      QueueKind::Chan => Box::new(ChanQueue::with_config(config)),
      QueueKind::Linked => Box::new(LinkedQueue::new()),
      QueueKind::Pooled => Box::new(PooledQueue::new()),
      QueueKind::Map => Box::new(MapQueue::new()),
    }
  }
}

impl fmt::Display for QueueKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

impl FromStr for QueueKind {
  type Err = ParseKindError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    QueueKind::ALL
      .into_iter()
      .find(|kind| kind.name().eq_ignore_ascii_case(s))
      .ok_or_else(|| ParseKindError(s.to_string()))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn kind_names_round_trip_through_from_str() {
    for kind in QueueKind::ALL {
      assert_eq!(kind.name().parse::<QueueKind>(), Ok(kind));
      assert_eq!(kind.to_string(), kind.name());
    }
    assert_eq!("RING".parse::<QueueKind>(), Ok(QueueKind::Ring));
  }

  struct Exhausted;

  impl Queue<u8> for Exhausted {
    fn len(&self) -> usize {
      0
    }

    fn try_enqueue(&mut self, _value: u8) -> Result<(), QueueError> {
      Err(QueueError::SequenceExhausted)
    }

    fn dequeue(&mut self) -> u8 {
      crate::error::empty_dequeue("exhausted")
    }
  }

  #[test]
  #[should_panic(expected = "enqueue failed")]
  fn provided_enqueue_panics_with_the_try_enqueue_error() {
    let mut queue = Exhausted;
    assert!(queue.is_empty());
    queue.enqueue(1);
  }

  #[test]
  fn unknown_kind_is_rejected() {
    let err = "deque".parse::<QueueKind>().unwrap_err();
    assert_eq!(err.to_string(), "unknown queue kind `deque`");
  }

  #[test]
  fn every_kind_builds_an_empty_queue() {
    for kind in QueueKind::ALL {
      let mut queue = kind.build::<u32>(QueueConfig::default());
      assert!(queue.is_empty(), "{kind}");
      queue.enqueue(7);
      assert_eq!(queue.len(), 1, "{kind}");
      assert_eq!(queue.dequeue(), 7, "{kind}");
    }
  }
}
