use core::fmt;
use std::marker::PhantomData;
use std::ptr::NonNull;
use std::sync::Arc;

use crate::error::{empty_dequeue, QueueError};
use crate::pool::{NodePool, PoolNode};
use crate::queue::impl_queue;

/// A singly linked queue whose nodes come from, and go back to, a
/// [`NodePool`].
///
/// The topology matches [`LinkedQueue`](crate::LinkedQueue). The difference
/// is that a dequeued node is handed back to the pool instead of freed, so a
/// queue cycling around a steady size stops allocating once the pool has
/// warmed up. The pool keeps its peak footprint after the queue drains.
pub struct PooledQueue<T> {
  head: Option<NonNull<PoolNode<T>>>,
  tail: Option<NonNull<PoolNode<T>>>,
  len: usize,
  pool: Arc<NodePool<T>>,
  _marker: PhantomData<Box<PoolNode<T>>>,
}

impl<T> PooledQueue<T> {
  /// Creates an empty queue with a private pool.
  pub fn new() -> Self {
    Self::with_pool(Arc::new(NodePool::new()))
  }

  /// Creates an empty queue drawing nodes from `pool`, which may be shared
  /// with other queues.
  pub fn with_pool(pool: Arc<NodePool<T>>) -> Self {
    Self {
      head: None,
      tail: None,
      len: 0,
      pool,
      _marker: PhantomData,
    }
  }

  /// The pool this queue recycles nodes through.
  pub fn pool(&self) -> &Arc<NodePool<T>> {
    &self.pool
  }

  #[inline]
  pub fn len(&self) -> usize {
    self.len
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.len == 0
  }

  /// Appends `value` at the tail in a node taken from the pool.
  pub fn enqueue(&mut self, value: T) {
    let node = NonNull::from(Box::leak(self.pool.acquire(value)));

    match self.tail {
      // SAFETY: `tail` is the live last node of this queue's chain.
      Some(mut tail) => unsafe { tail.as_mut().next = Some(node) },
      None => self.head = Some(node),
    }
    self.tail = Some(node);
    self.len += 1;
  }

  /// Same as [`enqueue`](PooledQueue::enqueue); node acquisition has no
  /// recoverable failure mode.
  #[inline]
  pub fn try_enqueue(&mut self, value: T) -> Result<(), QueueError> {
    self.enqueue(value);
    Ok(())
  }

  /// Removes and returns the element at the head and returns its node to
  /// the pool.
  ///
  /// # Panics
  ///
  /// Panics if the queue is empty.
  pub fn dequeue(&mut self) -> T {
    let Some(head) = self.head else {
      empty_dequeue("pooled");
    };
    // SAFETY: `head` was leaked from a pool `Box` in `enqueue` and is
    // unlinked here, so exactly one `Box` owns it again.
    let mut node = unsafe { Box::from_raw(head.as_ptr()) };
    self.head = node.next.take();
    if self.head.is_none() {
      self.tail = None;
    }
    self.len -= 1;

    let value = match node.value.take() {
      Some(value) => value,
      None => unreachable!("linked pool node without a value"),
    };
    self.pool.release(node);
    value
  }
}

impl<T> Drop for PooledQueue<T> {
  fn drop(&mut self) {
    while self.head.is_some() {
      drop(self.dequeue());
    }
  }
}

impl<T> Default for PooledQueue<T> {
  fn default() -> Self {
    Self::new()
  }
}

impl<T> fmt::Debug for PooledQueue<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("PooledQueue")
      .field("len", &self.len)
      .field("pool", &self.pool)
      .finish()
  }
}

// SAFETY: the queue uniquely owns its chain; the pool is internally locked.
unsafe impl<T: Send> Send for PooledQueue<T> {}

impl_queue!(PooledQueue);
