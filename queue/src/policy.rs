//! The amortized growth and shrink rule shared by the slice, ring and channel
//! backends.
//!
//! Both functions are pure so they can be checked in isolation against any
//! configuration.

use crate::config::QueueConfig;

/// Capacity to allocate when a buffer of `capacity` slots needs one more.
///
/// Also used for the very first allocation, where `capacity` is zero and the
/// base capacity wins.
#[inline]
pub fn grow_capacity(config: &QueueConfig, capacity: usize) -> usize {
  capacity
    .saturating_mul(config.growth_factor)
    .max(config.base_capacity)
}

/// Decides whether a buffer holding `len` live elements in `capacity` slots
/// should be rebuilt smaller, returning the new capacity if so.
///
/// Shrinking requires all of:
/// - the candidate capacity `len * growth_factor` is below a quarter of `capacity`,
/// - `len` exceeds the configured minimum shrink length,
/// - `len` exceeds the base capacity.
///
/// The gap between the grow trigger (full) and this trigger keeps a queue that
/// oscillates around one size from reallocating on every operation.
#[inline]
pub fn should_shrink(config: &QueueConfig, len: usize, capacity: usize) -> Option<usize> {
  let candidate = len.saturating_mul(config.growth_factor);
  let shrink = candidate < capacity / 4 && len > config.min_shrink && len > config.base_capacity;
  shrink.then_some(candidate)
}
