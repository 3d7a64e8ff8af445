use super::timing::Easing;

/// Physical configuration for a spring-driven channel.
///
/// Parameters follow the usual tension/friction formulation: the spring
/// pulls the value toward its target with `tension * displacement` and is
/// slowed by `friction * velocity`, both divided by `mass`.
#[derive(Clone, Debug)]
pub struct SpringConfig {
    /// Mass of the animated value (default: 1.0)
    pub mass: f32,
    /// Spring stiffness (default: 170.0)
    pub tension: f32,
    /// Damping coefficient (default: 26.0)
    pub friction: f32,
    /// Stop at the target instead of overshooting it
    pub clamp: bool,
    /// Distance and speed below which the spring counts as settled
    pub precision: f32,
    /// When set, physics is replaced by a fixed-duration curve (milliseconds)
    pub duration_ms: Option<f32>,
    /// Curve used when `duration_ms` is set
    pub easing: Easing,
}

impl SpringConfig {
    /// Balanced spring without overshoot
    pub const DEFAULT: Self = Self::preset(170.0, 26.0);

    /// Soft spring with a little overshoot
    pub const GENTLE: Self = Self::preset(120.0, 14.0);

    /// Lively spring with visible oscillation
    pub const WOBBLY: Self = Self::preset(180.0, 12.0);

    /// Fast and firm
    pub const STIFF: Self = Self::preset(210.0, 20.0);

    /// Heavily damped, slow to arrive
    pub const SLOW: Self = Self::preset(280.0, 60.0);

    /// Very heavily damped
    pub const MOLASSES: Self = Self::preset(280.0, 120.0);

    /// Default configuration of the belt channel: a light, clamped spring so
    /// the belt stops dead on each waypoint.
    pub const BELT: Self = Self {
        mass: 0.5,
        tension: 170.0,
        friction: 15.0,
        clamp: true,
        precision: 0.01,
        duration_ms: None,
        easing: Easing::Linear,
    };

    const fn preset(tension: f32, friction: f32) -> Self {
        Self {
            mass: 1.0,
            tension,
            friction,
            clamp: false,
            precision: 0.01,
            duration_ms: None,
            easing: Easing::Linear,
        }
    }

    /// Set the mass
    pub fn mass(mut self, mass: f32) -> Self {
        self.mass = mass;
        self
    }

    /// Set the tension
    pub fn tension(mut self, tension: f32) -> Self {
        self.tension = tension;
        self
    }

    /// Set the friction
    pub fn friction(mut self, friction: f32) -> Self {
        self.friction = friction;
        self
    }

    /// Enable or disable clamping at the target
    pub fn clamp(mut self, clamp: bool) -> Self {
        self.clamp = clamp;
        self
    }

    /// Set the settle precision
    pub fn precision(mut self, precision: f32) -> Self {
        self.precision = precision;
        self
    }

    /// Replace the spring with a fixed-duration easing curve
    pub fn duration(mut self, duration_ms: f32, easing: Easing) -> Self {
        self.duration_ms = Some(duration_ms);
        self.easing = easing;
        self
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// State for spring physics simulation toward an absolute target.
///
/// Velocity survives target changes, so retargeting mid-flight bends the
/// trajectory instead of restarting it.
#[derive(Clone, Debug, Default)]
pub struct SpringState {
    /// Current position
    pub position: f32,
    /// Current velocity in units per second
    pub velocity: f32,
}

/// Largest integration step in seconds
const MAX_STEP_SECS: f32 = 0.001;

impl SpringState {
    /// Create a resting spring at `position`
    pub fn at(position: f32) -> Self {
        Self {
            position,
            velocity: 0.0,
        }
    }

    /// Step the simulation forward by `dt_secs` toward `target`.
    ///
    /// Integrates in fixed sub-steps so stiff springs stay stable at low frame
    /// rates. Returns true once the spring has settled; a settled spring is
    /// snapped exactly onto `target` with zero velocity.
    pub fn step(&mut self, dt_secs: f32, target: f32, config: &SpringConfig) -> bool {
        let mut remaining = dt_secs.max(0.0);

        while remaining > 1e-6 {
            let dt = remaining.min(MAX_STEP_SECS);
            remaining -= dt;

            let before = target - self.position;

            // F = -k * x - c * v
            let spring_force = config.tension * before;
            let damping_force = -config.friction * self.velocity;
            let acceleration = (spring_force + damping_force) / config.mass;

            // Semi-implicit Euler
            self.velocity += acceleration * dt;
            self.position += self.velocity * dt;

            let after = target - self.position;
            if config.clamp && before * after < 0.0 {
                self.snap(target);
                return true;
            }
        }

        if self.is_settled(target, config.precision) {
            self.snap(target);
            return true;
        }
        false
    }

    /// Check if the spring has settled (position near target, velocity near zero)
    pub fn is_settled(&self, target: f32, threshold: f32) -> bool {
        (self.position - target).abs() < threshold && self.velocity.abs() < threshold
    }

    /// Place the spring at rest on `position`
    pub fn snap(&mut self, position: f32) {
        self.position = position;
        self.velocity = 0.0;
    }
}
