#![allow(dead_code)]

use fibre_queue::{Queue, QueueConfig, QueueKind};
use tracing_subscriber::EnvFilter;

pub const ITEMS_LOW: usize = 50;
pub const ITEMS_MEDIUM: usize = 500;
pub const ITEMS_HIGH: usize = 10_000;

/// Installs a test-friendly subscriber once; honors `RUST_LOG`.
pub fn init_tracing() {
  let _ = tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .with_test_writer()
    .try_init();
}

/// Both configurations every scenario runs under.
pub fn configs() -> [(&'static str, QueueConfig); 2] {
  [
    ("default", QueueConfig::default()),
    ("compact", QueueConfig::compact()),
  ]
}

/// Enqueues `0..count`.
pub fn enq(queue: &mut dyn Queue<usize>, count: usize) {
  for i in 0..count {
    queue.enqueue(i);
  }
}

/// Dequeues and discards `count` elements.
pub fn deq(queue: &mut dyn Queue<usize>, count: usize) {
  for _ in 0..count {
    queue.dequeue();
  }
}

/// Dequeues until empty and returns what came out.
pub fn drain(queue: &mut dyn Queue<usize>) -> Vec<usize> {
  let mut out = Vec::with_capacity(queue.len());
  while queue.len() > 0 {
    out.push(queue.dequeue());
  }
  out
}

pub fn every_kind() -> impl Iterator<Item = QueueKind> {
  QueueKind::ALL.into_iter()
}
