//! Animated channels: values that move toward targets over frame ticks.
//!
//! [`AnimatedChannel`] is the seam between the choreography in
//! [`crate::item`] and whatever produces trajectories. [`SpringChannel`] is
//! the built-in implementation; tests substitute scripted channels.

mod channel;
mod spring;
mod timing;

use std::fmt;

pub use channel::SpringChannel;
pub use spring::{SpringConfig, SpringState};
pub use timing::Easing;

/// Identifies one trajectory started on a channel.
///
/// Ids are unique per channel and strictly increasing, so a completion
/// carrying an older id always belongs to a superseded trajectory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrajectoryId(pub u64);

/// Which part of an item a channel drives
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChannelRole {
    /// The opaque overlay sweeping across the item (percent of item width)
    Belt,
    /// The item's own content offset (em)
    Content,
}

impl fmt::Display for ChannelRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelRole::Belt => write!(f, "belt"),
            ChannelRole::Content => write!(f, "content"),
        }
    }
}

/// Result of advancing a channel by one frame
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Advance {
    /// The channel's value moved this frame
    pub changed: bool,
    /// A trajectory reached its target this frame
    pub settled: Option<TrajectoryId>,
}

/// A scalar value animated toward targets by an external trajectory engine.
///
/// Starting a trajectory supersedes any previous one: a pending (delayed)
/// start is replaced outright, and the motion in flight continues from the
/// live value once the new trajectory begins. Nothing moves except inside
/// [`advance`](Self::advance).
pub trait AnimatedChannel {
    /// Create a resting channel at `initial`
    fn with_config(role: ChannelRole, config: SpringConfig, initial: f32) -> Self
    where
        Self: Sized;

    /// Current interpolated value
    fn value(&self) -> f32;

    /// Place the channel at rest on `value`, dropping pending and in-flight work
    fn snap(&mut self, value: f32);

    /// Start a trajectory toward `target` once `delay_ms` has elapsed
    fn start(&mut self, target: f32, delay_ms: f32) -> TrajectoryId;

    /// Drop a delayed start that has not begun yet. Returns true if one was dropped.
    fn cancel_pending(&mut self) -> bool;

    /// Advance time by `dt_ms`
    fn advance(&mut self, dt_ms: f32) -> Advance;

    /// A trajectory is in flight
    fn is_moving(&self) -> bool;

    /// A delayed start is waiting
    fn is_pending(&self) -> bool;

    /// Neither moving nor waiting
    fn is_idle(&self) -> bool {
        !self.is_moving() && !self.is_pending()
    }
}
