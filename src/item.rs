//! Per-item wipe choreography.
//!
//! Each item owns two channels: a belt that sweeps across the item and the
//! content underneath it. Revealing drives the belt over the item first and
//! only lets the content appear once the belt fully covers it; hiding slides
//! the content out while the belt closes in, then drops visibility behind the
//! belt and withdraws it. Every phase ends on the belt's completion event,
//! never on elapsed time.
//!
//! ```text
//!                 reveal                belt at cover             belt at revealed
//! RestingHidden ---------> RevealPhase1 ---------------> RevealPhase2 ---------> RestingVisible
//!       ^                                                                            |
//!       |     belt at hidden                belt at cover                hide        |
//!       +----------------- HidePhase2 <--------------- HidePhase1 <------------------+
//! ```
//!
//! Either request preempts a sequence in progress: delayed starts are dropped
//! and moving channels are retargeted from wherever they are.

use bitflags::bitflags;

use crate::animation::{AnimatedChannel, ChannelRole, SpringChannel, SpringConfig, TrajectoryId};

/// Belt fully before the item. The extra half percent avoids a seam.
pub const HIDDEN_OFFSET: f32 = -100.5;
/// Belt exactly over the item
pub const COVERING_OFFSET: f32 = 0.0;
/// Belt fully past the item
pub const REVEALED_OFFSET: f32 = 100.5;
/// Content offset while hidden, in em
pub const CONTENT_HIDDEN_OFFSET: f32 = -0.5;
/// Content offset while visible, in em
pub const CONTENT_VISIBLE_OFFSET: f32 = 0.0;

bitflags! {
    /// What changed for an item (or any item) during a frame
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct FrameChanges: u8 {
        /// Belt offset moved
        const BELT       = 0b0001;
        /// Content offset moved
        const CONTENT    = 0b0010;
        /// Content visibility flipped
        const VISIBILITY = 0b0100;
        /// Choreography phase advanced
        const PHASE      = 0b1000;
    }
}

/// Content visibility
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Hidden,
    Visible,
}

impl Visibility {
    pub fn is_visible(self) -> bool {
        self == Visibility::Visible
    }
}

/// Where an item is in its reveal/hide choreography
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Phase {
    /// Belt before the item, content hidden
    #[default]
    RestingHidden,
    /// Belt moving to cover the item
    RevealPhase1,
    /// Belt moving past the item, content appearing
    RevealPhase2,
    /// Belt past the item, content visible
    RestingVisible,
    /// Content sliding out while the belt moves to cover the item
    HidePhase1,
    /// Content hidden, belt withdrawing
    HidePhase2,
}

impl Phase {
    /// True for the two terminal phases
    pub fn is_resting(self) -> bool {
        matches!(self, Phase::RestingHidden | Phase::RestingVisible)
    }
}

/// Values a renderer needs to draw one item
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ItemFrame {
    /// Belt offset in percent of the item's width
    pub belt_offset: f32,
    /// Content offset in em
    pub content_offset: f32,
    pub visibility: Visibility,
}

/// Content offset channel plus its discrete visibility
#[derive(Clone, Debug)]
pub struct ContentChannel<C> {
    offset: C,
    visibility: Visibility,
}

impl<C: AnimatedChannel> ContentChannel<C> {
    /// Offset channel
    pub fn offset(&self) -> &C {
        &self.offset
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    fn set_visibility(&mut self, visibility: Visibility) -> FrameChanges {
        if self.visibility == visibility {
            return FrameChanges::empty();
        }
        self.visibility = visibility;
        FrameChanges::VISIBILITY
    }
}

/// Drives the belt and content channels of one item.
#[derive(Clone, Debug)]
pub struct ItemAnimator<C: AnimatedChannel = SpringChannel> {
    index: usize,
    belt: C,
    content: ContentChannel<C>,
    phase: Phase,
    /// Belt trajectory whose completion advances the current phase. A
    /// completion with any other id belongs to a preempted sequence.
    awaiting: Option<TrajectoryId>,
    /// Changes made by `set_active`, reported by the next `tick`
    queued: FrameChanges,
}

impl<C: AnimatedChannel> ItemAnimator<C> {
    /// Create an animator at hidden rest, building its channels from configs
    pub fn new(index: usize, content_spring: &SpringConfig, belt_spring: &SpringConfig) -> Self {
        Self::with_channels(
            index,
            C::with_config(ChannelRole::Belt, belt_spring.clone(), HIDDEN_OFFSET),
            C::with_config(
                ChannelRole::Content,
                content_spring.clone(),
                CONTENT_HIDDEN_OFFSET,
            ),
        )
    }

    /// Create an animator around existing channels, snapping them to hidden rest
    pub fn with_channels(index: usize, mut belt: C, mut content: C) -> Self {
        belt.snap(HIDDEN_OFFSET);
        content.snap(CONTENT_HIDDEN_OFFSET);
        Self {
            index,
            belt,
            content: ContentChannel {
                offset: content,
                visibility: Visibility::Hidden,
            },
            phase: Phase::RestingHidden,
            awaiting: None,
            queued: FrameChanges::empty(),
        }
    }

    /// Start revealing (`true`) or hiding (`false`) after `delay_ms`.
    ///
    /// Revealing an item at visible rest and hiding an item at hidden rest do
    /// nothing. Anything else preempts the sequence in progress. Phase and
    /// visibility changes made here are reported by the next [`tick`].
    ///
    /// [`tick`]: ItemAnimator::tick
    pub fn set_active(&mut self, active: bool, delay_ms: f32) {
        if active {
            self.reveal(delay_ms);
        } else {
            self.hide(delay_ms);
        }
    }

    fn reveal(&mut self, delay_ms: f32) {
        if self.phase == Phase::RestingVisible {
            log::trace!("item {}: already visible", self.index);
            return;
        }

        // A delayed hide may still be waiting to slide the content out
        self.content.offset.cancel_pending();
        self.awaiting = Some(self.belt.start(COVERING_OFFSET, delay_ms));
        let entered = self.enter(Phase::RevealPhase1);
        self.queued |= entered;
        log::debug!("item {}: reveal in {} ms", self.index, delay_ms);
    }

    fn hide(&mut self, delay_ms: f32) {
        if self.phase == Phase::RestingHidden {
            log::trace!("item {}: already hidden", self.index);
            return;
        }

        if self.belt.value() == HIDDEN_OFFSET {
            // The belt never left hidden, so nothing has been shown yet
            self.belt.cancel_pending();
            if self.belt.is_moving() {
                self.belt.snap(HIDDEN_OFFSET);
            }
            self.content.offset.cancel_pending();
            self.awaiting = None;
            let hidden = self.content.set_visibility(Visibility::Hidden);

            // Content still sliding out finishes under HidePhase2
            let phase = if self.content.offset.is_idle() {
                Phase::RestingHidden
            } else {
                Phase::HidePhase2
            };
            let entered = self.enter(phase);
            self.queued |= hidden | entered;
            log::debug!("item {}: reveal dropped before the belt moved", self.index);
            return;
        }

        self.content.offset.start(CONTENT_HIDDEN_OFFSET, delay_ms);
        self.awaiting = Some(self.belt.start(COVERING_OFFSET, delay_ms));
        let entered = self.enter(Phase::HidePhase1);
        self.queued |= entered;
        log::debug!("item {}: hide in {} ms", self.index, delay_ms);
    }

    /// Advance both channels by `dt_ms` and run any phase hand-off that the
    /// belt's completion triggers.
    pub fn tick(&mut self, dt_ms: f32) -> FrameChanges {
        let mut changes = std::mem::replace(&mut self.queued, FrameChanges::empty());

        if self.content.offset.advance(dt_ms).changed {
            changes |= FrameChanges::CONTENT;
        }

        let belt = self.belt.advance(dt_ms);
        if belt.changed {
            changes |= FrameChanges::BELT;
        }

        if let Some(id) = belt.settled {
            if self.awaiting == Some(id) {
                self.awaiting = None;
                changes |= self.on_belt_settled();
            } else {
                log::trace!("item {}: ignoring stale completion {:?}", self.index, id);
            }
        }

        changes | self.settle_if_done()
    }

    fn on_belt_settled(&mut self) -> FrameChanges {
        match self.phase {
            Phase::RevealPhase1 => {
                // Belt covers the item: let the content in and move the belt on
                self.content.offset.start(CONTENT_VISIBLE_OFFSET, 0.0);
                let changes = self.content.set_visibility(Visibility::Visible);
                self.awaiting = Some(self.belt.start(REVEALED_OFFSET, 0.0));
                changes | self.enter(Phase::RevealPhase2)
            }
            Phase::HidePhase1 => {
                // Content is behind the belt, so it can vanish instantly
                let changes = self.content.set_visibility(Visibility::Hidden);
                self.awaiting = Some(self.belt.start(HIDDEN_OFFSET, 0.0));
                changes | self.enter(Phase::HidePhase2)
            }
            Phase::RevealPhase2 | Phase::HidePhase2 => FrameChanges::empty(),
            Phase::RestingHidden | Phase::RestingVisible => {
                log::warn!(
                    "item {}: belt completion while resting in {:?}",
                    self.index,
                    self.phase
                );
                FrameChanges::empty()
            }
        }
    }

    fn settle_if_done(&mut self) -> FrameChanges {
        if self.awaiting.is_some() || !self.belt.is_idle() || !self.content.offset.is_idle() {
            return FrameChanges::empty();
        }
        match self.phase {
            Phase::RevealPhase2 => self.enter(Phase::RestingVisible),
            Phase::HidePhase2 => self.enter(Phase::RestingHidden),
            _ => FrameChanges::empty(),
        }
    }

    fn enter(&mut self, phase: Phase) -> FrameChanges {
        if self.phase == phase {
            return FrameChanges::empty();
        }
        log::debug!("item {}: {:?} -> {:?}", self.index, self.phase, phase);
        self.phase = phase;
        FrameChanges::PHASE
    }

    /// Position of this item in its collection
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Belt channel
    pub fn belt(&self) -> &C {
        &self.belt
    }

    /// Content channel
    pub fn content(&self) -> &ContentChannel<C> {
        &self.content
    }

    /// Current output values
    pub fn frame(&self) -> ItemFrame {
        ItemFrame {
            belt_offset: self.belt.value(),
            content_offset: self.content.offset.value(),
            visibility: self.content.visibility,
        }
    }

    /// Any channel is moving or waiting on a delay
    pub fn is_animating(&self) -> bool {
        !self.belt.is_idle() || !self.content.offset.is_idle()
    }
}
