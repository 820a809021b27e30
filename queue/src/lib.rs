//! Interchangeable single-owner FIFO queues.
//!
//! Six backends implement the [`Queue`] trait with identical observable
//! behavior (strict FIFO order, exact `len`, panic on empty dequeue) over
//! very different storage:
//!
//! - [`SliceQueue`]: one contiguous buffer with a front offset.
//! - [`RingQueue`]: a circular buffer.
//! - [`ChanQueue`]: a bounded `fibre` SPSC channel swapped out when full.
//! - [`LinkedQueue`]: one heap node per element.
//! - [`PooledQueue`]: linked nodes recycled through a shared [`NodePool`].
//! - [`MapQueue`]: a hash map keyed by sequence number.
//!
//! The slice, ring and channel backends size themselves with the rule in
//! [`policy`], tuned per queue through a [`QueueConfig`].
//!
//! ```
//! use fibre_queue::{Queue, QueueConfig, QueueKind};
//!
//! let mut queue = QueueKind::Ring.build::<u32>(QueueConfig::default());
//! queue.enqueue(1);
//! queue.enqueue(2);
//! assert_eq!(queue.dequeue(), 1);
//! assert_eq!(queue.len(), 1);
//! ```

pub mod config;
pub mod error;
pub mod policy;

mod queue;

// Backends
mod chan;
mod linked;
mod map;
mod pool;
mod pooled;
mod ring;
mod slice;

pub use chan::ChanQueue;
pub use config::{QueueConfig, QueueConfigBuilder};
pub use error::{ConfigError, ParseKindError, QueueError};
pub use linked::LinkedQueue;
pub use map::MapQueue;
pub use pool::NodePool;
pub use pooled::PooledQueue;
pub use queue::{Queue, QueueKind};
pub use ring::RingQueue;
pub use slice::SliceQueue;
