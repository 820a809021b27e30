use crate::error::ConfigError;

/// Default multiplier applied to a buffer's capacity when it overflows.
pub const DEFAULT_GROWTH_FACTOR: usize = 2;
/// Default capacity of the first allocation.
pub const DEFAULT_BASE_CAPACITY: usize = 8;
/// Default length a queue must exceed before it is allowed to shrink.
pub const DEFAULT_MIN_SHRINK: usize = 64;

/// Tunables of the shared resize policy.
///
/// Every queue stores its own copy, so two queues built from different
/// configurations never observe each other's thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawQueueConfig"))]
pub struct QueueConfig {
  pub(crate) growth_factor: usize,
  pub(crate) base_capacity: usize,
  pub(crate) min_shrink: usize,
}

impl QueueConfig {
  /// Returns a builder seeded with the default values.
  pub fn builder() -> QueueConfigBuilder {
    QueueConfigBuilder::new()
  }

  /// Tight thresholds (base capacity 2, minimum shrink 2) that force the
  /// resize paths to run on very small queues.
  pub fn compact() -> Self {
    Self {
      growth_factor: DEFAULT_GROWTH_FACTOR,
      base_capacity: 2,
      min_shrink: 2,
    }
  }

  #[inline]
  pub fn growth_factor(&self) -> usize {
    self.growth_factor
  }

  #[inline]
  pub fn base_capacity(&self) -> usize {
    self.base_capacity
  }

  #[inline]
  pub fn min_shrink(&self) -> usize {
    self.min_shrink
  }

  /// Checks the invariants the resize policy relies on.
  ///
  /// Configurations produced by the builder are always valid; this is
  /// mostly useful for values that came in through deserialization.
  pub fn validate(&self) -> Result<(), ConfigError> {
    if self.growth_factor < 2 {
      return Err(ConfigError::GrowthFactorTooSmall(self.growth_factor));
    }
    if self.base_capacity == 0 {
      return Err(ConfigError::ZeroBaseCapacity);
    }
    Ok(())
  }
}

impl Default for QueueConfig {
  fn default() -> Self {
    Self {
      growth_factor: DEFAULT_GROWTH_FACTOR,
      base_capacity: DEFAULT_BASE_CAPACITY,
      min_shrink: DEFAULT_MIN_SHRINK,
    }
  }
}

// Unchecked wire form; deserialized configs go through `validate` on the
// way to `QueueConfig`.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
#[serde(default)]
struct RawQueueConfig {
  growth_factor: usize,
  base_capacity: usize,
  min_shrink: usize,
}

#[cfg(feature = "serde")]
impl Default for RawQueueConfig {
  fn default() -> Self {
    Self {
      growth_factor: DEFAULT_GROWTH_FACTOR,
      base_capacity: DEFAULT_BASE_CAPACITY,
      min_shrink: DEFAULT_MIN_SHRINK,
    }
  }
}

#[cfg(feature = "serde")]
impl TryFrom<RawQueueConfig> for QueueConfig {
  type Error = ConfigError;

  fn try_from(raw: RawQueueConfig) -> Result<Self, Self::Error> {
    let config = QueueConfig {
      growth_factor: raw.growth_factor,
      base_capacity: raw.base_capacity,
      min_shrink: raw.min_shrink,
    };
    config.validate()?;
    Ok(config)
  }
}

/// A builder for [`QueueConfig`].
#[derive(Debug, Clone)]
pub struct QueueConfigBuilder {
  config: QueueConfig,
}

impl QueueConfigBuilder {
  pub fn new() -> Self {
    Self {
      config: QueueConfig::default(),
    }
  }

  /// Sets the multiplier used on overflow. Must be at least 2.
  pub fn growth_factor(mut self, factor: usize) -> Self {
    self.config.growth_factor = factor;
    self
  }

  /// Sets the capacity of the first allocation. Must be non-zero.
  pub fn base_capacity(mut self, capacity: usize) -> Self {
    self.config.base_capacity = capacity;
    self
  }

  /// Sets the length a queue must exceed before it may shrink.
  pub fn min_shrink(mut self, min_shrink: usize) -> Self {
    self.config.min_shrink = min_shrink;
    self
  }

  pub fn build(self) -> Result<QueueConfig, ConfigError> {
    self.config.validate()?;
    Ok(self.config)
  }
}

impl Default for QueueConfigBuilder {
  fn default() -> Self {
    Self::new()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults_match_constants() {
    let config = QueueConfig::default();
    assert_eq!(config.growth_factor(), DEFAULT_GROWTH_FACTOR);
    assert_eq!(config.base_capacity(), DEFAULT_BASE_CAPACITY);
    assert_eq!(config.min_shrink(), DEFAULT_MIN_SHRINK);
    assert!(config.validate().is_ok());
  }

  #[test]
  fn builder_overrides_each_field() {
    let config = QueueConfig::builder()
      .growth_factor(3)
      .base_capacity(4)
      .min_shrink(16)
      .build()
      .unwrap();
    assert_eq!(config.growth_factor(), 3);
    assert_eq!(config.base_capacity(), 4);
    assert_eq!(config.min_shrink(), 16);
  }

  #[test]
  fn builder_rejects_growth_factor_below_two() {
    let err = QueueConfig::builder().growth_factor(1).build().unwrap_err();
    assert_eq!(err, ConfigError::GrowthFactorTooSmall(1));
  }

  #[test]
  fn builder_rejects_zero_base_capacity() {
    let err = QueueConfig::builder().base_capacity(0).build().unwrap_err();
    assert_eq!(err, ConfigError::ZeroBaseCapacity);
  }

  #[test]
  fn compact_preset_is_valid() {
    let config = QueueConfig::compact();
    assert_eq!(config.base_capacity(), 2);
    assert_eq!(config.min_shrink(), 2);
    assert!(config.validate().is_ok());
  }
}
