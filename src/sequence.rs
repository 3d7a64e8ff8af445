//! Fan-out of the activation flag to every item.

use crate::animation::{AnimatedChannel, SpringChannel};
use crate::config::{ConfigError, Delay, SequenceConfig};
use crate::item::{FrameChanges, ItemAnimator, ItemFrame, Phase};

/// Owns one [`ItemAnimator`] per item and forwards activation edges to them,
/// each with its own stagger delay.
///
/// Items run independently once triggered; the only coordination between
/// them is the delay each one receives.
#[derive(Debug)]
pub struct SequenceController<C: AnimatedChannel = SpringChannel> {
    config: SequenceConfig,
    active: bool,
    /// Resolved delay of each item, parallel to `items`
    delays: Vec<f32>,
    items: Vec<ItemAnimator<C>>,
}

impl<C: AnimatedChannel> SequenceController<C> {
    /// Build animators for `item_count` items and apply the initial flag.
    ///
    /// An initially active config reveals every item right away; an inactive
    /// one leaves everything at rest without starting any trajectory.
    pub fn new(config: SequenceConfig, item_count: usize) -> Result<Self, ConfigError> {
        let delays = config.resolve_delays(item_count)?;
        let items = (0..item_count)
            .map(|index| ItemAnimator::new(index, &config.content_spring, &config.belt_spring))
            .collect();

        let active = config.active;
        let mut controller = Self {
            config,
            active,
            delays,
            items,
        };
        controller.broadcast();
        Ok(controller)
    }

    /// Set the activation flag. Returns true if it changed and the items were
    /// told about it.
    pub fn set_active(&mut self, active: bool) -> bool {
        if self.active == active {
            return false;
        }
        self.active = active;
        self.broadcast();
        true
    }

    /// Flip the activation flag
    pub fn toggle(&mut self) {
        self.set_active(!self.active);
    }

    fn broadcast(&mut self) {
        log::debug!(
            "{} items -> {}",
            self.items.len(),
            if self.active { "reveal" } else { "hide" }
        );
        for (item, delay_ms) in self.items.iter_mut().zip(&self.delays) {
            item.set_active(self.active, *delay_ms);
        }
    }

    /// Advance every item by `dt_ms`, returning the union of their changes
    pub fn tick(&mut self, dt_ms: f32) -> FrameChanges {
        self.items
            .iter_mut()
            .fold(FrameChanges::empty(), |changes, item| changes | item.tick(dt_ms))
    }

    /// Replace the delay rule. Applies from the next activation edge.
    pub fn set_delay(&mut self, delay: Delay) -> Result<(), ConfigError> {
        self.delays = delay.resolve(self.items.len())?;
        self.config.delay = delay;
        Ok(())
    }

    /// Grow or shrink the collection.
    ///
    /// Removed items are dropped along with anything they had pending. New
    /// items start at hidden rest and, while active, begin revealing with
    /// their own delay.
    pub fn set_item_count(&mut self, item_count: usize) -> Result<(), ConfigError> {
        let delays = self.config.delay.resolve(item_count)?;
        let previous = self.items.len();

        self.items.truncate(item_count);
        for (index, delay_ms) in delays.iter().enumerate().skip(previous) {
            let mut item =
                ItemAnimator::new(index, &self.config.content_spring, &self.config.belt_spring);
            item.set_active(self.active, *delay_ms);
            self.items.push(item);
        }
        self.delays = delays;

        if previous != item_count {
            log::debug!("item count {} -> {}", previous, item_count);
        }
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn config(&self) -> &SequenceConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Resolved delay of the item at `index`
    pub fn delay_for(&self, index: usize) -> Option<f32> {
        self.delays.get(index).copied()
    }

    pub fn item(&self, index: usize) -> Option<&ItemAnimator<C>> {
        self.items.get(index)
    }

    pub fn items(&self) -> &[ItemAnimator<C>] {
        &self.items
    }

    pub fn phase(&self, index: usize) -> Option<Phase> {
        self.items.get(index).map(ItemAnimator::phase)
    }

    pub fn frame(&self, index: usize) -> Option<ItemFrame> {
        self.items.get(index).map(ItemAnimator::frame)
    }

    /// Current output values of every item, in index order
    pub fn frames(&self) -> impl Iterator<Item = ItemFrame> + '_ {
        self.items.iter().map(ItemAnimator::frame)
    }

    /// Any item still has work to do
    pub fn is_animating(&self) -> bool {
        self.items.iter().any(ItemAnimator::is_animating)
    }

    /// Every item rests in the phase matching the activation flag
    pub fn is_settled(&self) -> bool {
        let resting = if self.active {
            Phase::RestingVisible
        } else {
            Phase::RestingHidden
        };
        !self.is_animating() && self.items.iter().all(|item| item.phase() == resting)
    }
}
