//! Staggered "wipe" reveal and hide for an ordered list of items.
//!
//! Each item is masked by an opaque belt. Revealing sweeps the belt over the
//! item, lets the content slide in behind it, then carries the belt on past
//! the item. Hiding runs the same sweep in reverse. Items start one after
//! another according to a stagger rule, and any sequence can be interrupted
//! mid-flight without jumps.
//!
//! The crate produces numbers, not pixels: every frame a renderer reads each
//! item's [`ItemFrame`] (belt offset, content offset, visibility) and draws
//! it however it likes.
//!
//! ```
//! use slide_wipe::prelude::*;
//!
//! let mut wipe: SequenceController =
//!     SequenceController::new(SequenceConfig::new().stagger(50.0), 4).unwrap();
//!
//! wipe.set_active(true);
//! while !wipe.is_settled() {
//!     wipe.tick(1000.0 / 60.0);
//! }
//!
//! for frame in wipe.frames() {
//!     assert_eq!(frame.visibility, Visibility::Visible);
//! }
//! ```

pub mod animation;
pub mod config;
pub mod item;
pub mod sequence;

pub use config::{ConfigError, Delay, SequenceConfig, SpringOverrides};
pub use item::{FrameChanges, ItemAnimator, ItemFrame, Phase, Visibility};
pub use sequence::SequenceController;

pub mod prelude {
    pub use crate::animation::{
        Advance, AnimatedChannel, ChannelRole, Easing, SpringChannel, SpringConfig, TrajectoryId,
    };
    pub use crate::config::{ConfigError, Delay, SequenceConfig, SpringOverrides};
    pub use crate::item::{
        FrameChanges, ItemAnimator, ItemFrame, Phase, Visibility, CONTENT_HIDDEN_OFFSET,
        CONTENT_VISIBLE_OFFSET, COVERING_OFFSET, HIDDEN_OFFSET, REVEALED_OFFSET,
    };
    pub use crate::sequence::SequenceController;
}
