use std::cell::{Cell, RefCell};

use slide_wipe::prelude::*;

// ============================================================================
// Scripted channel: moves linearly at a fixed speed and records every call
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
enum Event {
    Snap(f32),
    Start { target: f32, delay_ms: f32 },
    Begin { target: f32, at_ms: f32 },
    CancelPending,
    Settled { target: f32, at_ms: f32 },
}

#[derive(Clone, Debug)]
struct Record {
    channel: usize,
    role: ChannelRole,
    event: Event,
}

thread_local! {
    static LOG: RefCell<Vec<Record>> = const { RefCell::new(Vec::new()) };
    static NEXT_CHANNEL: Cell<usize> = const { Cell::new(0) };
}

fn reset() {
    let _ = env_logger::builder().is_test(true).try_init();
    LOG.with(|log| log.borrow_mut().clear());
    NEXT_CHANNEL.with(|next| next.set(0));
}

fn clear_log() {
    LOG.with(|log| log.borrow_mut().clear());
}

fn records() -> Vec<Record> {
    LOG.with(|log| log.borrow().clone())
}

/// Channels are created belt first, then content, item by item
fn item_of(channel: usize) -> usize {
    channel / 2
}

#[derive(Debug)]
struct ScriptedChannel {
    id: usize,
    role: ChannelRole,
    /// Units per millisecond
    speed: f32,
    value: f32,
    clock_ms: f32,
    motion: Option<(TrajectoryId, f32)>,
    pending: Option<(TrajectoryId, f32, f32)>,
    next_id: u64,
}

impl ScriptedChannel {
    fn record(&self, event: Event) {
        LOG.with(|log| {
            log.borrow_mut().push(Record {
                channel: self.id,
                role: self.role,
                event,
            })
        });
    }

    fn run(&mut self, dt_ms: f32, at_ms: f32) -> Option<TrajectoryId> {
        let (id, target) = self.motion?;
        let step = self.speed * dt_ms;
        if (target - self.value).abs() <= step {
            self.value = target;
            self.motion = None;
            self.record(Event::Settled { target, at_ms });
            Some(id)
        } else {
            self.value += step * (target - self.value).signum();
            None
        }
    }
}

impl AnimatedChannel for ScriptedChannel {
    fn with_config(role: ChannelRole, _config: SpringConfig, initial: f32) -> Self {
        let id = NEXT_CHANNEL.with(|next| {
            let id = next.get();
            next.set(id + 1);
            id
        });
        let speed = match role {
            ChannelRole::Belt => 1.0,
            ChannelRole::Content => 0.01,
        };
        Self {
            id,
            role,
            speed,
            value: initial,
            clock_ms: 0.0,
            motion: None,
            pending: None,
            next_id: 0,
        }
    }

    fn value(&self) -> f32 {
        self.value
    }

    fn snap(&mut self, value: f32) {
        self.record(Event::Snap(value));
        self.value = value;
        self.motion = None;
        self.pending = None;
    }

    fn start(&mut self, target: f32, delay_ms: f32) -> TrajectoryId {
        self.next_id += 1;
        let id = TrajectoryId(self.next_id);
        self.record(Event::Start { target, delay_ms });
        if delay_ms > 0.0 {
            self.pending = Some((id, target, delay_ms));
        } else {
            self.pending = None;
            self.motion = Some((id, target));
            self.record(Event::Begin {
                target,
                at_ms: self.clock_ms,
            });
        }
        id
    }

    fn cancel_pending(&mut self) -> bool {
        let cancelled = self.pending.take().is_some();
        if cancelled {
            self.record(Event::CancelPending);
        }
        cancelled
    }

    fn advance(&mut self, dt_ms: f32) -> Advance {
        let before = self.value;
        let start_ms = self.clock_ms;
        self.clock_ms += dt_ms;

        let mut budget = dt_ms;
        match self.pending.take() {
            Some((id, target, remaining)) if remaining > budget => {
                self.pending = Some((id, target, remaining - budget));
            }
            Some((id, target, remaining)) => {
                self.run(remaining, start_ms + remaining);
                budget -= remaining;
                self.motion = Some((id, target));
                self.record(Event::Begin {
                    target,
                    at_ms: start_ms + remaining,
                });
            }
            None => {}
        }

        let settled = self.run(budget, self.clock_ms);
        Advance {
            changed: self.value != before,
            settled,
        }
    }

    fn is_moving(&self) -> bool {
        self.motion.is_some()
    }

    fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

fn scripted_item() -> ItemAnimator<ScriptedChannel> {
    ItemAnimator::new(0, &SpringConfig::DEFAULT, &SpringConfig::BELT)
}

fn run_item(item: &mut ItemAnimator<ScriptedChannel>, dt_ms: f32, frames: usize) {
    for _ in 0..frames {
        item.tick(dt_ms);
    }
}

fn settle_controller<C: AnimatedChannel>(controller: &mut SequenceController<C>, dt_ms: f32) {
    for _ in 0..10_000 {
        if controller.is_settled() {
            return;
        }
        controller.tick(dt_ms);
    }
    panic!("sequence did not settle");
}

// ============================================================================
// Settle correctness
// ============================================================================

#[test]
fn test_every_item_settles_revealed_then_hidden() {
    reset();
    let mut controller: SequenceController<ScriptedChannel> =
        SequenceController::new(SequenceConfig::new(), 5).unwrap();

    controller.set_active(true);
    settle_controller(&mut controller, 10.0);
    for frame in controller.frames() {
        assert_eq!(frame.belt_offset, REVEALED_OFFSET);
        assert_eq!(frame.content_offset, CONTENT_VISIBLE_OFFSET);
        assert_eq!(frame.visibility, Visibility::Visible);
    }

    controller.set_active(false);
    settle_controller(&mut controller, 10.0);
    for frame in controller.frames() {
        assert_eq!(frame.belt_offset, HIDDEN_OFFSET);
        assert_eq!(frame.content_offset, CONTENT_HIDDEN_OFFSET);
        assert_eq!(frame.visibility, Visibility::Hidden);
    }
}

#[test]
fn test_spring_channels_settle_exactly_on_waypoints() {
    reset();
    let mut controller: SequenceController =
        SequenceController::new(SequenceConfig::new().active(true), 4).unwrap();
    settle_controller(&mut controller, 1000.0 / 60.0);
    assert!(controller
        .frames()
        .all(|frame| frame.belt_offset == REVEALED_OFFSET
            && frame.content_offset == CONTENT_VISIBLE_OFFSET));

    controller.set_active(false);
    settle_controller(&mut controller, 1000.0 / 60.0);
    assert!(controller
        .frames()
        .all(|frame| frame.belt_offset == HIDDEN_OFFSET
            && frame.content_offset == CONTENT_HIDDEN_OFFSET
            && frame.visibility == Visibility::Hidden));
}

// ============================================================================
// Skip rule
// ============================================================================

#[test]
fn test_hide_at_rest_touches_nothing() {
    reset();
    let mut item = scripted_item();
    clear_log();

    item.set_active(false, 0.0);
    item.set_active(false, 250.0);
    run_item(&mut item, 16.0, 30);

    assert!(records().is_empty(), "unexpected calls: {:?}", records());
    assert_eq!(item.phase(), Phase::RestingHidden);
}

#[test]
fn test_hide_before_first_frame_never_sweeps() {
    reset();
    let mut controller: SequenceController<ScriptedChannel> =
        SequenceController::new(SequenceConfig::new(), 4).unwrap();
    controller.set_active(true);
    clear_log();
    controller.set_active(false);

    assert!((0..4).all(|i| controller.phase(i) == Some(Phase::RestingHidden)));
    assert!(controller.tick(10.0).contains(FrameChanges::PHASE));
    for _ in 0..100 {
        assert!(controller
            .frames()
            .all(|frame| frame.belt_offset == HIDDEN_OFFSET));
        controller.tick(10.0);
    }

    assert!(controller.is_settled());
    assert!(!records().iter().any(|r| matches!(
        r.event,
        Event::Start { .. } | Event::Begin { .. } | Event::Settled { .. }
    )));
}

#[test]
fn test_spring_belts_stay_hidden_after_instant_toggle() {
    reset();
    let mut controller: SequenceController =
        SequenceController::new(SequenceConfig::new(), 4).unwrap();
    controller.set_active(true);
    controller.set_active(false);

    let mut furthest = vec![HIDDEN_OFFSET; 4];
    for _ in 0..600 {
        controller.tick(1000.0 / 60.0);
        for (max, frame) in furthest.iter_mut().zip(controller.frames()) {
            *max = max.max(frame.belt_offset);
        }
    }
    assert_eq!(furthest, vec![HIDDEN_OFFSET; 4]);
    assert!(controller.is_settled());
}

#[test]
fn test_skipped_hide_waits_for_content_before_resting() {
    reset();
    let belt = ScriptedChannel::with_config(ChannelRole::Belt, SpringConfig::BELT, 0.0);
    let mut content = ScriptedChannel::with_config(ChannelRole::Content, SpringConfig::DEFAULT, 0.0);
    content.speed = 0.001;
    let mut item = ItemAnimator::with_channels(0, belt, content);

    item.set_active(true, 0.0);
    run_item(&mut item, 10.0, 100);
    assert_eq!(item.phase(), Phase::RestingVisible);

    // Belt is back at hidden long before the slow content has slid out
    item.set_active(false, 0.0);
    run_item(&mut item, 10.0, 25);
    assert_eq!(item.phase(), Phase::HidePhase2);
    assert_eq!(item.frame().belt_offset, HIDDEN_OFFSET);
    assert!(item.is_animating());

    item.set_active(true, 0.0);
    item.set_active(false, 0.0);
    assert_eq!(item.phase(), Phase::HidePhase2);
    assert_eq!(item.frame().belt_offset, HIDDEN_OFFSET);

    for _ in 0..100 {
        assert!(!item.phase().is_resting() || !item.is_animating());
        item.tick(10.0);
    }
    assert_eq!(item.phase(), Phase::RestingHidden);
    assert_eq!(item.frame().content_offset, CONTENT_HIDDEN_OFFSET);
    assert_eq!(item.frame().visibility, Visibility::Hidden);
}

// ============================================================================
// Phase ordering
// ============================================================================

#[test]
fn test_content_targets_visible_only_after_belt_covers() {
    reset();
    let mut item = scripted_item();
    item.set_active(true, 30.0);
    run_item(&mut item, 7.0, 100);
    assert_eq!(item.phase(), Phase::RestingVisible);

    let log = records();
    let covered = log
        .iter()
        .position(|r| {
            r.role == ChannelRole::Belt
                && matches!(r.event, Event::Settled { target, .. } if target == COVERING_OFFSET)
        })
        .expect("belt never settled on cover");
    let content_shown = log
        .iter()
        .position(|r| {
            r.role == ChannelRole::Content
                && matches!(r.event, Event::Start { target, .. } if target == CONTENT_VISIBLE_OFFSET)
        })
        .expect("content never shown");

    assert!(covered < content_shown);
}

#[test]
fn test_hide_drops_visibility_behind_belt() {
    reset();
    let mut item = scripted_item();
    item.set_active(true, 0.0);
    run_item(&mut item, 10.0, 100);

    item.set_active(false, 0.0);
    while item.phase() == Phase::HidePhase1 {
        assert_eq!(item.frame().visibility, Visibility::Visible);
        item.tick(10.0);
    }
    assert_eq!(item.phase(), Phase::HidePhase2);
    assert_eq!(item.frame().belt_offset, COVERING_OFFSET);
    assert_eq!(item.frame().visibility, Visibility::Hidden);
}

// ============================================================================
// Preemption
// ============================================================================

#[test]
fn test_stale_completion_does_not_advance_new_sequence() {
    reset();
    let mut item = scripted_item();
    item.set_active(true, 0.0);
    run_item(&mut item, 10.0, 5);
    assert_eq!(item.phase(), Phase::RevealPhase1);

    // The old belt trajectory keeps moving and lands on cover during the delay
    item.set_active(false, 200.0);
    run_item(&mut item, 10.0, 10);

    assert_eq!(item.frame().belt_offset, COVERING_OFFSET);
    assert_eq!(item.phase(), Phase::HidePhase1);
    assert_eq!(item.frame().visibility, Visibility::Hidden);
    assert!(!records().iter().any(|r| r.role == ChannelRole::Content
        && matches!(r.event, Event::Start { target, .. } if target == CONTENT_VISIBLE_OFFSET)));
}

#[test]
fn test_reveal_cancels_pending_hide() {
    reset();
    let mut item = scripted_item();
    item.set_active(true, 0.0);
    run_item(&mut item, 10.0, 100);
    assert_eq!(item.phase(), Phase::RestingVisible);
    clear_log();

    item.set_active(false, 100.0);
    run_item(&mut item, 10.0, 2);
    item.set_active(true, 0.0);
    run_item(&mut item, 10.0, 100);

    let log = records();
    assert!(log
        .iter()
        .any(|r| r.role == ChannelRole::Content && r.event == Event::CancelPending));
    assert!(!log.iter().any(|r| r.role == ChannelRole::Content
        && matches!(r.event, Event::Begin { target, .. } if target == CONTENT_HIDDEN_OFFSET)));
    assert_eq!(item.phase(), Phase::RestingVisible);
    assert_eq!(item.frame().visibility, Visibility::Visible);
}

#[test]
fn test_interrupted_reveal_never_jumps() {
    reset();
    let config = SequenceConfig::new().stagger(0.0);
    let dt_ms = 1000.0 / 60.0;

    // Largest per-frame belt movement over an uninterrupted reveal and hide
    let mut reference: SequenceController = SequenceController::new(config.clone(), 1).unwrap();
    let mut max_delta: f32 = 0.0;
    for active in [true, false] {
        reference.set_active(active);
        for _ in 0..300 {
            let before = reference.frame(0).unwrap().belt_offset;
            reference.tick(dt_ms);
            max_delta = max_delta.max((reference.frame(0).unwrap().belt_offset - before).abs());
        }
    }

    for interrupt_after in [3, 8, 14, 20] {
        let mut controller: SequenceController =
            SequenceController::new(config.clone(), 1).unwrap();
        controller.set_active(true);
        for _ in 0..interrupt_after {
            controller.tick(dt_ms);
        }

        let before = controller.frame(0).unwrap().belt_offset;
        controller.set_active(false);
        assert_eq!(controller.frame(0).unwrap().belt_offset, before);

        for _ in 0..300 {
            let before = controller.frame(0).unwrap().belt_offset;
            controller.tick(dt_ms);
            let delta = (controller.frame(0).unwrap().belt_offset - before).abs();
            assert!(
                delta <= max_delta + 1e-3,
                "belt jumped {} (max {}) after interrupting at frame {}",
                delta,
                max_delta,
                interrupt_after
            );
        }
        assert_eq!(controller.phase(0), Some(Phase::RestingHidden));
    }
}

// ============================================================================
// Stagger and scenarios
// ============================================================================

#[test]
fn test_scenario_a_staggered_starts() {
    reset();
    let mut controller: SequenceController<ScriptedChannel> =
        SequenceController::new(SequenceConfig::new().stagger(50.0), 4).unwrap();
    controller.set_active(true);
    settle_controller(&mut controller, 7.0);

    let mut starts = vec![None; 4];
    for record in records() {
        if let Event::Begin { target, at_ms } = record.event {
            if record.role == ChannelRole::Belt && target == COVERING_OFFSET {
                starts[item_of(record.channel)].get_or_insert(at_ms);
            }
        }
    }
    assert_eq!(starts, vec![Some(0.0), Some(50.0), Some(100.0), Some(150.0)]);
    assert!((0..4).all(|i| controller.phase(i) == Some(Phase::RestingVisible)));
}

#[test]
fn test_custom_delay_function_drives_starts() {
    reset();
    let config = SequenceConfig::new().delay_fn(|i| (2 - i) as f32 * 40.0);
    let mut controller: SequenceController<ScriptedChannel> =
        SequenceController::new(config, 3).unwrap();
    controller.set_active(true);
    settle_controller(&mut controller, 5.0);

    let mut starts = vec![None; 3];
    for record in records() {
        if let Event::Begin { target, at_ms } = record.event {
            if record.role == ChannelRole::Belt && target == COVERING_OFFSET {
                starts[item_of(record.channel)].get_or_insert(at_ms);
            }
        }
    }
    assert_eq!(starts, vec![Some(80.0), Some(40.0), Some(0.0)]);
}

#[test]
fn test_scenario_b_construction_never_animates() {
    reset();
    let mut controller: SequenceController<ScriptedChannel> =
        SequenceController::new(SequenceConfig::new(), 4).unwrap();
    for _ in 0..200 {
        controller.tick(16.0);
    }

    assert!(records()
        .iter()
        .all(|r| matches!(r.event, Event::Snap(_))));
    assert!((0..4).all(|i| controller.phase(i) == Some(Phase::RestingHidden)));
    assert!(!controller.is_animating());
}

#[test]
fn test_scenario_c_quick_toggle_never_shows_content() {
    reset();
    let mut controller: SequenceController<ScriptedChannel> =
        SequenceController::new(SequenceConfig::new(), 4).unwrap();
    controller.set_active(true);
    for _ in 0..3 {
        controller.tick(10.0);
    }
    controller.set_active(false);

    for _ in 0..1000 {
        assert!(controller
            .frames()
            .all(|frame| frame.visibility == Visibility::Hidden));
        controller.tick(10.0);
    }

    assert!(controller.is_settled());
    assert!((0..4).all(|i| controller.phase(i) == Some(Phase::RestingHidden)));
    assert!(!records().iter().any(|r| r.role == ChannelRole::Content
        && matches!(r.event, Event::Start { target, .. } if target == CONTENT_VISIBLE_OFFSET)));
}

#[test]
fn test_dropping_items_discards_pending_work() {
    reset();
    let mut controller: SequenceController<ScriptedChannel> =
        SequenceController::new(SequenceConfig::new().stagger(100.0), 3).unwrap();
    controller.set_active(true);
    controller.set_item_count(1).unwrap();
    clear_log();

    settle_controller(&mut controller, 10.0);
    assert!(records().iter().all(|r| item_of(r.channel) == 0));
}
