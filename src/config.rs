//! Configuration for a staggered wipe sequence.
//!
//! [`SequenceConfig`] holds the activation flag, the stagger rule and the two
//! spring configurations. Everything is validated up front when a
//! [`SequenceController`](crate::SequenceController) resolves it, so a
//! running sequence never meets a bad delay or a broken spring.

use std::fmt;
use std::sync::Arc;

use crate::animation::{ChannelRole, SpringConfig};

/// Default stagger between consecutive items in milliseconds
pub const DEFAULT_STAGGER_MS: f32 = 50.0;

/// Configuration validation errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Delay for item {index} is negative ({delay_ms} ms)")]
    NegativeDelay { index: usize, delay_ms: f32 },
    #[error("Delay for item {index} is not a finite number ({delay_ms})")]
    NonFiniteDelay { index: usize, delay_ms: f32 },
    #[error("Invalid {role} spring: {field} = {value}")]
    InvalidSpring {
        role: ChannelRole,
        field: &'static str,
        value: f32,
    },
}

/// How long each item waits before its sequence begins
#[derive(Clone)]
pub enum Delay {
    /// `stagger * index` milliseconds
    Stagger(f32),
    /// Caller-supplied delay per index, in milliseconds
    PerIndex(Arc<dyn Fn(usize) -> f32 + Send + Sync>),
}

impl Delay {
    /// Create a per-index rule from a closure
    pub fn per_index<F>(f: F) -> Self
    where
        F: Fn(usize) -> f32 + Send + Sync + 'static,
    {
        Delay::PerIndex(Arc::new(f))
    }

    /// Delay for the item at `index`, unvalidated
    pub fn at(&self, index: usize) -> f32 {
        match self {
            Delay::Stagger(stagger_ms) => stagger_ms * index as f32,
            Delay::PerIndex(f) => f(index),
        }
    }

    /// Resolve and validate the delay of every index in `0..count`
    pub fn resolve(&self, count: usize) -> Result<Vec<f32>, ConfigError> {
        (0..count)
            .map(|index| {
                let delay_ms = self.at(index);
                if !delay_ms.is_finite() {
                    Err(ConfigError::NonFiniteDelay { index, delay_ms })
                } else if delay_ms < 0.0 {
                    Err(ConfigError::NegativeDelay { index, delay_ms })
                } else {
                    Ok(delay_ms)
                }
            })
            .collect()
    }
}

impl Default for Delay {
    fn default() -> Self {
        Delay::Stagger(DEFAULT_STAGGER_MS)
    }
}

impl fmt::Debug for Delay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Delay::Stagger(stagger_ms) => write!(f, "Stagger({})", stagger_ms),
            Delay::PerIndex(_) => write!(f, "PerIndex"),
        }
    }
}

impl From<f32> for Delay {
    fn from(stagger_ms: f32) -> Self {
        Delay::Stagger(stagger_ms)
    }
}

/// Partial spring configuration merged field by field onto a channel default.
///
/// Unset fields keep the default of the channel they are applied to, so
/// overriding only the belt's tension keeps its light mass and clamping.
#[derive(Clone, Debug, Default)]
pub struct SpringOverrides {
    pub mass: Option<f32>,
    pub tension: Option<f32>,
    pub friction: Option<f32>,
    pub clamp: Option<bool>,
    pub precision: Option<f32>,
    pub duration_ms: Option<f32>,
}

impl SpringOverrides {
    /// Merge onto `base`
    pub fn apply(&self, base: SpringConfig) -> SpringConfig {
        SpringConfig {
            mass: self.mass.unwrap_or(base.mass),
            tension: self.tension.unwrap_or(base.tension),
            friction: self.friction.unwrap_or(base.friction),
            clamp: self.clamp.unwrap_or(base.clamp),
            precision: self.precision.unwrap_or(base.precision),
            duration_ms: self.duration_ms.or(base.duration_ms),
            easing: base.easing,
        }
    }
}

impl SpringConfig {
    /// Validate physical parameters for the channel `role`.
    pub fn validate(&self, role: ChannelRole) -> Result<(), ConfigError> {
        let invalid = |field, value| ConfigError::InvalidSpring { role, field, value };

        if !(self.mass.is_finite() && self.mass > 0.0) {
            return Err(invalid("mass", self.mass));
        }
        if !(self.tension.is_finite() && self.tension > 0.0) {
            return Err(invalid("tension", self.tension));
        }
        if !(self.friction.is_finite() && self.friction >= 0.0) {
            return Err(invalid("friction", self.friction));
        }
        if !(self.precision.is_finite() && self.precision > 0.0) {
            return Err(invalid("precision", self.precision));
        }
        if let Some(duration_ms) = self.duration_ms {
            if !(duration_ms.is_finite() && duration_ms > 0.0) {
                return Err(invalid("duration_ms", duration_ms));
            }
        }
        Ok(())
    }
}

/// Everything a [`SequenceController`](crate::SequenceController) needs besides the item count
#[derive(Clone, Debug)]
pub struct SequenceConfig {
    /// Whether items are shown
    pub active: bool,
    /// Stagger rule
    pub delay: Delay,
    /// Spring for the content offset
    pub content_spring: SpringConfig,
    /// Spring for the belt
    pub belt_spring: SpringConfig,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            active: false,
            delay: Delay::default(),
            content_spring: SpringConfig::DEFAULT,
            belt_spring: SpringConfig::BELT,
        }
    }
}

impl SequenceConfig {
    /// Create the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the initial activation flag
    pub fn active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Set the delay rule
    pub fn delay(mut self, delay: Delay) -> Self {
        self.delay = delay;
        self
    }

    /// Delay each item by `stagger_ms * index`
    pub fn stagger(mut self, stagger_ms: f32) -> Self {
        self.delay = Delay::Stagger(stagger_ms);
        self
    }

    /// Compute each item's delay from its index
    pub fn delay_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(usize) -> f32 + Send + Sync + 'static,
    {
        self.delay = Delay::per_index(f);
        self
    }

    /// Replace the content spring
    pub fn content_spring(mut self, config: SpringConfig) -> Self {
        self.content_spring = config;
        self
    }

    /// Replace the belt spring
    pub fn belt_spring(mut self, config: SpringConfig) -> Self {
        self.belt_spring = config;
        self
    }

    /// Override parts of the default content spring
    pub fn content_overrides(mut self, overrides: &SpringOverrides) -> Self {
        self.content_spring = overrides.apply(SpringConfig::DEFAULT);
        self
    }

    /// Override parts of the default belt spring
    pub fn belt_overrides(mut self, overrides: &SpringOverrides) -> Self {
        self.belt_spring = overrides.apply(SpringConfig::BELT);
        self
    }

    /// Validate both springs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.content_spring.validate(ChannelRole::Content)?;
        self.belt_spring.validate(ChannelRole::Belt)?;
        Ok(())
    }

    /// Validate the springs and resolve the delay of every item in `0..count`.
    pub fn resolve_delays(&self, count: usize) -> Result<Vec<f32>, ConfigError> {
        self.validate()?;
        self.delay.resolve(count)
    }
}
