// src/error.rs

use thiserror::Error;

/// Resource exhaustion reported by `try_enqueue`.
///
/// These reflect limits of the environment, not caller misuse. A queue that
/// returns one of these is left exactly as it was before the call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueueError {
  /// Storage for the requested number of elements could not be reserved.
  #[error("failed to allocate storage for {requested} elements")]
  AllocFailed { requested: usize },
  /// The 64-bit sequence space of a map-backed queue wrapped around.
  #[error("map queue sequence space exhausted")]
  SequenceExhausted,
}

/// Errors returned when validating a [`QueueConfig`](crate::QueueConfig).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
  #[error("growth factor must be at least 2, got {0}")]
  GrowthFactorTooSmall(usize),
  #[error("base capacity cannot be zero")]
  ZeroBaseCapacity,
}

/// Error returned when parsing an unknown [`QueueKind`](crate::QueueKind) name.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown queue kind `{0}`")]
pub struct ParseKindError(pub String);

/// Aborts the current operation because the caller dequeued from an empty queue.
#[cold]
#[track_caller]
pub(crate) fn empty_dequeue(backend: &'static str) -> ! {
  panic!("dequeue from empty {backend} queue")
}

/// Aborts the current operation because a queue could not obtain resources.
#[cold]
#[track_caller]
pub(crate) fn exhausted(backend: &'static str, err: QueueError) -> ! {
  panic!("{backend} queue enqueue failed: {err}")
}
