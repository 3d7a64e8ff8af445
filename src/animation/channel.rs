use super::{Advance, AnimatedChannel, ChannelRole, SpringConfig, SpringState, TrajectoryId};

/// Trajectory currently in flight
#[derive(Clone, Debug)]
struct Motion {
    id: TrajectoryId,
    /// Value when the trajectory began (used by fixed-duration curves)
    from: f32,
    /// Time spent on this trajectory in milliseconds
    elapsed_ms: f32,
}

/// Start waiting for its delay to elapse
#[derive(Clone, Debug)]
struct Pending {
    id: TrajectoryId,
    target: f32,
    remaining_ms: f32,
}

/// Spring-driven [`AnimatedChannel`].
///
/// Runs a physical spring by default, or a fixed-duration easing curve when
/// the config carries a duration. While a delayed start is pending, the
/// previous trajectory keeps moving; when the delay elapses the new target
/// takes over from the live value and velocity.
#[derive(Clone, Debug)]
pub struct SpringChannel {
    role: ChannelRole,
    config: SpringConfig,
    spring: SpringState,
    target: f32,
    motion: Option<Motion>,
    pending: Option<Pending>,
    next_id: u64,
}

impl SpringChannel {
    /// Role this channel was created for
    pub fn role(&self) -> ChannelRole {
        self.role
    }

    /// Target of the trajectory in flight, or the resting value
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Current velocity in units per second
    pub fn velocity(&self) -> f32 {
        self.spring.velocity
    }

    /// Physical configuration
    pub fn config(&self) -> &SpringConfig {
        &self.config
    }

    fn next_id(&mut self) -> TrajectoryId {
        self.next_id += 1;
        TrajectoryId(self.next_id)
    }

    fn begin(&mut self, id: TrajectoryId, target: f32) {
        self.target = target;
        self.motion = Some(Motion {
            id,
            from: self.spring.position,
            elapsed_ms: 0.0,
        });
    }

    /// Move the in-flight trajectory forward, returning its id if it settled
    fn step(&mut self, dt_ms: f32) -> Option<TrajectoryId> {
        let motion = self.motion.as_mut()?;
        motion.elapsed_ms += dt_ms;

        let settled = match self.config.duration_ms {
            Some(duration_ms) => {
                let t = if duration_ms > 0.0 {
                    motion.elapsed_ms / duration_ms
                } else {
                    1.0
                };
                if t >= 1.0 {
                    self.spring.snap(self.target);
                    true
                } else {
                    let eased = self.config.easing.evaluate(t);
                    self.spring.position = motion.from + (self.target - motion.from) * eased;
                    false
                }
            }
            None => self
                .spring
                .step(dt_ms / 1000.0, self.target, &self.config),
        };

        if settled {
            self.motion.take().map(|motion| motion.id)
        } else {
            None
        }
    }
}

impl AnimatedChannel for SpringChannel {
    fn with_config(role: ChannelRole, config: SpringConfig, initial: f32) -> Self {
        Self {
            role,
            config,
            spring: SpringState::at(initial),
            target: initial,
            motion: None,
            pending: None,
            next_id: 0,
        }
    }

    fn value(&self) -> f32 {
        self.spring.position
    }

    fn snap(&mut self, value: f32) {
        self.spring.snap(value);
        self.target = value;
        self.motion = None;
        self.pending = None;
    }

    fn start(&mut self, target: f32, delay_ms: f32) -> TrajectoryId {
        let id = self.next_id();
        if delay_ms > 0.0 {
            self.pending = Some(Pending {
                id,
                target,
                remaining_ms: delay_ms,
            });
        } else {
            self.pending = None;
            self.begin(id, target);
        }
        id
    }

    fn cancel_pending(&mut self) -> bool {
        self.pending.take().is_some()
    }

    fn advance(&mut self, dt_ms: f32) -> Advance {
        let before = self.spring.position;
        let mut budget = dt_ms.max(0.0);

        match self.pending.take() {
            Some(mut pending) if pending.remaining_ms > budget => {
                pending.remaining_ms -= budget;
                self.pending = Some(pending);
            }
            Some(pending) => {
                budget -= pending.remaining_ms;
                // The superseded trajectory runs up to the switch point; its
                // completion is stale by now.
                self.step(pending.remaining_ms);
                self.begin(pending.id, pending.target);
            }
            None => {}
        }

        let settled = self.step(budget);

        Advance {
            changed: self.spring.position != before,
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
