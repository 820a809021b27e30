use core::fmt;
use std::ptr::NonNull;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use tracing::trace;

/// A node of a [`PooledQueue`](crate::PooledQueue).
///
/// While a node sits in a [`NodePool`] its payload is unspecified; the pool
/// hands it to whichever caller acquires next, which overwrites both fields.
pub(crate) struct PoolNode<T> {
  pub(crate) value: Option<T>,
  pub(crate) next: Option<NonNull<PoolNode<T>>>,
}

// SAFETY: `next` is only dereferenced by the single queue that linked the
// node. Nodes are unlinked before they reach the pool.
unsafe impl<T: Send> Send for PoolNode<T> {}

/// A free list of queue nodes.
///
/// The pool is a pure allocator cache: it does not know which queue a node
/// came from and may give it to any queue sharing the pool. Acquire and
/// release take a lock, so one pool can back queues owned by different
/// threads. Nodes are only freed when the pool itself is dropped, when
/// [`trim`](NodePool::trim) is called, or when a release would exceed the
/// optional idle limit.
pub struct NodePool<T> {
  free: Mutex<Vec<Box<PoolNode<T>>>>,
  allocated: AtomicUsize,
  max_idle: Option<usize>,
}

impl<T> NodePool<T> {
  /// Creates an empty pool that keeps every released node.
  pub fn new() -> Self {
    Self {
      free: Mutex::new(Vec::new()),
      allocated: AtomicUsize::new(0),
      max_idle: None,
    }
  }

  /// Creates an empty pool that caches at most `max_idle` released nodes.
  pub fn with_max_idle(max_idle: usize) -> Self {
    Self {
      max_idle: Some(max_idle),
      ..Self::new()
    }
  }

  /// Takes a node from the free list, or allocates one if the list is empty,
  /// and stores `value` in it with no successor.
  pub(crate) fn acquire(&self, value: T) -> Box<PoolNode<T>> {
    let recycled = self.free.lock().pop();
    match recycled {
      Some(mut node) => {
        node.value = Some(value);
        node.next = None;
        trace!("pool node reused");
        node
      }
      None => {
        let total = self.allocated.fetch_add(1, Ordering::Relaxed) + 1;
        trace!(total, "pool node allocated");
        Box::new(PoolNode {
          value: Some(value),
          next: None,
        })
      }
    }
  }

  /// Returns an unlinked node to the free list.
  pub(crate) fn release(&self, mut node: Box<PoolNode<T>>) {
    node.value = None;
    node.next = None;

    let mut free = self.free.lock();
    if self.max_idle.is_some_and(|max| free.len() >= max) {
      drop(free);
      drop(node);
      return;
    }
    free.push(node);
  }

  /// Total number of nodes this pool has ever allocated.
  ///
  /// Under steady enqueue/dequeue cycling this stays at the high-water mark
  /// of live elements across all queues sharing the pool.
  pub fn allocated(&self) -> usize {
    self.allocated.load(Ordering::Relaxed)
  }

  /// Number of nodes currently cached and ready for reuse.
  pub fn idle(&self) -> usize {
    self.free.lock().len()
  }

  /// Frees every cached node.
  pub fn trim(&self) {
    let drained = std::mem::take(&mut *self.free.lock());
    drop(drained);
  }
}

impl<T> Default for NodePool<T> {
  fn default() -> Self {
    Self::new()
  }
}

impl<T> fmt::Debug for NodePool<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("NodePool")
      .field("allocated", &self.allocated())
      .field("idle", &self.idle())
      .field("max_idle", &self.max_idle)
      .finish()
  }
}
