use core::fmt;
use std::marker::PhantomData;
use std::ptr::NonNull;

use crate::error::{empty_dequeue, QueueError};
use crate::queue::impl_queue;

struct Node<T> {
  value: T,
  next: Option<NonNull<Node<T>>>,
}

/// A singly linked queue with one heap allocation per element.
///
/// Each node is owned by exactly one link: the head pointer or its
/// predecessor's `next`. `tail` is a non-owning alias of the last node.
/// Enqueue and dequeue are O(1) and never resize anything.
pub struct LinkedQueue<T> {
  head: Option<NonNull<Node<T>>>,
  tail: Option<NonNull<Node<T>>>,
  len: usize,
  _marker: PhantomData<Box<Node<T>>>,
}

impl<T> LinkedQueue<T> {
  pub fn new() -> Self {
    Self {
      head: None,
      tail: None,
      len: 0,
      _marker: PhantomData,
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

  /// Appends `value` at the tail.
  ///
  /// Node allocation goes through the global allocator, which aborts the
  /// process if it fails.
  pub fn enqueue(&mut self, value: T) {
    let node = Box::new(Node { value, next: None });
    let node = NonNull::from(Box::leak(node));

    match self.tail {
      // SAFETY: `tail` points at the live last node, which we own through the chain.
      Some(mut tail) => unsafe { tail.as_mut().next = Some(node) },
      None => self.head = Some(node),
    }
    self.tail = Some(node);
    self.len += 1;
  }

  /// Same as [`enqueue`](LinkedQueue::enqueue); a linked queue has no
  /// recoverable failure mode.
  #[inline]
  pub fn try_enqueue(&mut self, value: T) -> Result<(), QueueError> {
    self.enqueue(value);
    Ok(())
  }

  /// Removes and returns the element at the head, releasing its node.
  ///
  /// # Panics
  ///
  /// Panics if the queue is empty.
  pub fn dequeue(&mut self) -> T {
    let Some(head) = self.head else {
      empty_dequeue("linked");
    };
    // SAFETY: `head` came from `Box::leak` in `enqueue` and is unlinked here,
    // so ownership returns to exactly one `Box`.
    let node = unsafe { Box::from_raw(head.as_ptr()) };
    self.head = node.next;
    if self.head.is_none() {
      self.tail = None;
    }
    self.len -= 1;
    node.value
  }
}

impl<T> Drop for LinkedQueue<T> {
  fn drop(&mut self) {
    // Iterative, so long chains cannot overflow the stack.
    while self.head.is_some() {
      drop(self.dequeue());
    }
  }
}

impl<T> Default for LinkedQueue<T> {
  fn default() -> Self {
    Self::new()
  }
}

impl<T> fmt::Debug for LinkedQueue<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("LinkedQueue")
      .field("len", &self.len)
      .finish_non_exhaustive()
  }
}

// SAFETY: the queue uniquely owns every node, like a `Box` chain would.
unsafe impl<T: Send> Send for LinkedQueue<T> {}
unsafe impl<T: Sync> Sync for LinkedQueue<T> {}

impl_queue!(LinkedQueue);

#[cfg(test)]
mod tests {
  use super::*;
  use std::rc::Rc;

  #[test]
  fn single_element_sets_head_and_tail() {
    let mut queue = LinkedQueue::new();
    queue.enqueue("a");
    assert_eq!(queue.head, queue.tail);
    assert_eq!(queue.dequeue(), "a");
    assert!(queue.head.is_none());
    assert!(queue.tail.is_none());
  }

  #[test]
  fn refills_after_draining() {
    let mut queue = LinkedQueue::new();
    for i in 0..3 {
      queue.enqueue(i);
    }
    for _ in 0..3 {
      queue.dequeue();
    }
    queue.enqueue(10);
    queue.enqueue(11);
    assert_eq!(queue.len(), 2);
    assert_eq!(queue.dequeue(), 10);
    assert_eq!(queue.dequeue(), 11);
  }

  #[test]
  fn long_chain_drops_without_recursion() {
    let mut queue = LinkedQueue::new();
    for i in 0..200_000u32 {
      queue.enqueue(i);
    }
    drop(queue);
  }

  #[test]
  fn drop_releases_remaining_values() {
    let tracker = Rc::new(());
    let mut queue = LinkedQueue::new();
    for _ in 0..4 {
      queue.enqueue(Rc::clone(&tracker));
    }
    drop(queue.dequeue());
    assert_eq!(Rc::strong_count(&tracker), 4);
    drop(queue);
    assert_eq!(Rc::strong_count(&tracker), 1);
  }

  #[test]
  #[should_panic(expected = "dequeue from empty linked queue")]
  fn dequeue_on_empty_panics() {
    let mut queue = LinkedQueue::<u8>::new();
    queue.dequeue();
  }
}
