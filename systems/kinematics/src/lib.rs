#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Agent kinematics: discrete rotation, collision-checked movement and sensing.
//!
//! The agent never stores the wall set. Every operation that needs obstacles
//! borrows the current wall slice for the duration of the call, so a world
//! reload between ticks is picked up simply by passing the new slice.

use glam::DVec2;
use lidar_arena_core::{Arena, Motion, MoveKeys, Pose, Wall};
use lidar_arena_system_lidar::{Lidar, LidarConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, trace};

/// Collision radius of the agent body.
pub const DEFAULT_BODY_RADIUS: f64 = 20.0;
/// Distance covered by a single unobstructed move.
pub const DEFAULT_LINEAR_SPEED: f64 = 10.0;
/// Degrees turned by a single rotation.
pub const DEFAULT_ANGULAR_SPEED: f64 = 5.0;
/// Amount removed from the trial speed after each blocked attempt.
pub const DEFAULT_SPEED_DECREMENT: f64 = 0.1;
/// Slowest trial speed attempted before the agent counts as blocked.
pub const DEFAULT_MIN_TRIAL_SPEED: f64 = 0.1;
/// Upper bound on the number of trial speeds a single move may attempt.
pub const MAX_TRIAL_SPEEDS: usize = 10_000;

const FULL_TURN: f64 = 360.0;

/// Strategy applied when a full-speed move would collide.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MovePolicy {
    /// Retries at decreasing speeds so the agent can close in on obstacles.
    #[default]
    BackOff,
    /// Moves at full speed or not at all.
    AllOrNothing,
}

/// Tunable kinematic parameters of the agent.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KinematicsConfig {
    /// Distance covered by one move.
    pub linear_speed: f64,
    /// Degrees turned by one rotation.
    pub angular_speed: f64,
    /// Collision radius of the body.
    pub body_radius: f64,
    /// Step between successive trial speeds.
    pub speed_decrement: f64,
    /// Lowest trial speed, inclusive.
    pub min_trial_speed: f64,
    /// Behaviour on a blocked full-speed move.
    pub move_policy: MovePolicy,
}

impl Default for KinematicsConfig {
    fn default() -> Self {
        Self {
            linear_speed: DEFAULT_LINEAR_SPEED,
            angular_speed: DEFAULT_ANGULAR_SPEED,
            body_radius: DEFAULT_BODY_RADIUS,
            speed_decrement: DEFAULT_SPEED_DECREMENT,
            min_trial_speed: DEFAULT_MIN_TRIAL_SPEED,
            move_policy: MovePolicy::BackOff,
        }
    }
}

impl KinematicsConfig {
    /// Number of speeds a blocked move tries before the bump sensor fires.
    #[must_use]
    pub fn trial_speed_count(&self) -> usize {
        match self.move_policy {
            MovePolicy::AllOrNothing => 1,
            MovePolicy::BackOff
                if self.speed_decrement > 0.0 && self.linear_speed > self.min_trial_speed =>
            {
                // Tolerates the rounding error of repeated decimal steps.
                let span =
                    (self.linear_speed - self.min_trial_speed) / self.speed_decrement + 1e-9;
                (span.floor() as usize).saturating_add(1)
            }
            MovePolicy::BackOff => 1,
        }
    }

    /// Checks that the parameters describe a movable body.
    pub fn validate(&self) -> Result<(), KinematicsConfigError> {
        let speeds = [
            ("linear_speed", self.linear_speed),
            ("angular_speed", self.angular_speed),
            ("speed_decrement", self.speed_decrement),
            ("min_trial_speed", self.min_trial_speed),
        ];
        if let Some(&(field, value)) = speeds
            .iter()
            .find(|(_, value)| !(value.is_finite() && *value > 0.0))
        {
            return Err(KinematicsConfigError::NotPositive { field, value });
        }
        if !(self.body_radius.is_finite() && self.body_radius >= 0.0) {
            return Err(KinematicsConfigError::InvalidBodyRadius {
                body_radius: self.body_radius,
            });
        }
        let attempts = self.trial_speed_count();
        if attempts > MAX_TRIAL_SPEEDS {
            return Err(KinematicsConfigError::TooManyTrialSpeeds {
                attempts,
                limit: MAX_TRIAL_SPEEDS,
            });
        }
        Ok(())
    }
}

/// Errors reported by [`KinematicsConfig::validate`].
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum KinematicsConfigError {
    /// A speed or step is not a finite positive number.
    #[error("agent {field} {value} must be finite and positive")]
    NotPositive {
        /// Name of the offending parameter.
        field: &'static str,
        /// Requested value.
        value: f64,
    },
    /// The body radius is negative or not finite.
    #[error("agent body_radius {body_radius} must be finite and non-negative")]
    InvalidBodyRadius {
        /// Requested radius.
        body_radius: f64,
    },
    /// The back-off search would try more speeds than allowed.
    #[error("agent back-off would try {attempts} speeds, more than the limit of {limit}")]
    TooManyTrialSpeeds {
        /// Trial speeds implied by the configuration.
        attempts: usize,
        /// Largest accepted count.
        limit: usize,
    },
}

/// Point-mass robot with a circular body, a range sensor and a bump sensor.
#[derive(Clone, Debug)]
pub struct Agent {
    pose: Pose,
    config: KinematicsConfig,
    arena: Arena,
    lidar: Lidar,
    lidar_ranges: Vec<f64>,
    bump_sensor: bool,
}

impl Agent {
    /// Creates an agent with default kinematics inside the default arena.
    ///
    /// `beam_count` beams are spread evenly over a full turn.
    #[must_use]
    pub fn new(x: f64, y: f64, direction: f64, beam_count: usize) -> Self {
        let lidar = Lidar::new(LidarConfig {
            beam_count,
            ..LidarConfig::default()
        });
        Self::with_config(
            Pose::new(x, y, direction),
            KinematicsConfig::default(),
            lidar,
            Arena::DEFAULT,
        )
    }

    /// Creates an agent from explicit parts.
    #[must_use]
    pub fn with_config(pose: Pose, config: KinematicsConfig, lidar: Lidar, arena: Arena) -> Self {
        Self {
            pose: Pose {
                direction: wrap_degrees(pose.direction),
                ..pose
            },
            config,
            arena,
            lidar,
            lidar_ranges: Vec::new(),
            bump_sensor: false,
        }
    }

    /// Horizontal position.
    #[must_use]
    pub const fn x(&self) -> f64 {
        self.pose.x
    }

    /// Vertical position.
    #[must_use]
    pub const fn y(&self) -> f64 {
        self.pose.y
    }

    /// Facing direction in degrees, within `[0, 360)`.
    #[must_use]
    pub const fn direction(&self) -> f64 {
        self.pose.direction
    }

    /// Current pose.
    #[must_use]
    pub const fn pose(&self) -> Pose {
        self.pose
    }

    /// Whether the latest movement attempt was fully blocked.
    #[must_use]
    pub const fn bump_sensor(&self) -> bool {
        self.bump_sensor
    }

    /// Readings of the latest scan, one per beam; empty before the first scan.
    #[must_use]
    pub fn lidar_ranges(&self) -> &[f64] {
        &self.lidar_ranges
    }

    /// Beam offsets in degrees, in reading order.
    #[must_use]
    pub fn lidar_angles(&self) -> &[f64] {
        self.lidar.angles()
    }

    /// Maximum range of the sensor.
    #[must_use]
    pub const fn lidar_max_range(&self) -> f64 {
        self.lidar.max_range()
    }

    /// Distance covered by one unobstructed move.
    #[must_use]
    pub const fn linear_speed(&self) -> f64 {
        self.config.linear_speed
    }

    /// Degrees turned by one rotation.
    #[must_use]
    pub const fn angular_speed(&self) -> f64 {
        self.config.angular_speed
    }

    /// Collision radius of the body.
    #[must_use]
    pub const fn body_radius(&self) -> f64 {
        self.config.body_radius
    }

    /// Arena the agent is confined to.
    #[must_use]
    pub const fn arena(&self) -> &Arena {
        &self.arena
    }

    /// Kinematic parameters.
    #[must_use]
    pub const fn config(&self) -> &KinematicsConfig {
        &self.config
    }

    /// Places the agent at `pose`, forgetting previous readings and bumps.
    pub fn reset(&mut self, pose: Pose) {
        self.pose = Pose {
            direction: wrap_degrees(pose.direction),
            ..pose
        };
        self.lidar_ranges.clear();
        self.bump_sensor = false;
    }

    /// Recomputes every beam reading against `walls` and the arena.
    pub fn scan(&mut self, walls: &[Wall]) {
        self.lidar
            .scan_into(self.pose, walls, &self.arena, &mut self.lidar_ranges);
    }

    /// Turns counter-clockwise.
    pub fn rotate_left(&mut self) {
        self.pose.direction = wrap_degrees(self.pose.direction + self.config.angular_speed);
        self.bump_sensor = false;
    }

    /// Turns clockwise.
    pub fn rotate_right(&mut self) {
        self.pose.direction = wrap_degrees(self.pose.direction - self.config.angular_speed);
        self.bump_sensor = false;
    }

    /// Reports whether a full-speed move would overlap a wall or leave the arena.
    #[must_use]
    pub fn detect_collision(&self, moving_forward: bool, walls: &[Wall]) -> bool {
        self.collides_at(moving_forward, self.config.linear_speed, walls)
    }

    /// Moves as far as the first clear trial speed allows.
    ///
    /// Trial speeds start at the linear speed and drop by the configured
    /// decrement down to the minimum trial speed (inclusive). When every trial
    /// collides the pose is left untouched and the bump sensor fires.
    pub fn try_move(&mut self, moving_forward: bool, walls: &[Wall]) {
        let cleared = self
            .trial_speeds()
            .find(|&speed| !self.collides_at(moving_forward, speed, walls));

        match cleared {
            Some(speed) => {
                let from = self.pose.position();
                self.pose = self.pose_after(moving_forward, speed);
                self.bump_sensor = false;
                trace!(
                    speed,
                    from_x = from.x,
                    from_y = from.y,
                    to_x = self.pose.x,
                    to_y = self.pose.y,
                    "agent moved"
                );
            }
            None => {
                self.bump_sensor = true;
                debug!(
                    x = self.pose.x,
                    y = self.pose.y,
                    direction = self.pose.direction,
                    forward = moving_forward,
                    "agent blocked"
                );
            }
        }
    }

    /// Runs the kinematic operation named by `motion`.
    pub fn apply(&mut self, motion: Motion, walls: &[Wall]) {
        match motion {
            Motion::RotateLeft => self.rotate_left(),
            Motion::RotateRight => self.rotate_right(),
            Motion::Forward => self.try_move(true, walls),
            Motion::Backward => self.try_move(false, walls),
        }
    }

    /// Runs one operation per held key: rotations first, then moves.
    pub fn handle_move_keys(&mut self, keys: MoveKeys, walls: &[Wall]) {
        for motion in keys.motions() {
            self.apply(motion, walls);
        }
    }

    fn trial_speeds(&self) -> impl Iterator<Item = f64> {
        let KinematicsConfig {
            linear_speed,
            speed_decrement,
            ..
        } = self.config;

        (0..self.config.trial_speed_count())
            .map(move |step| linear_speed - step as f64 * speed_decrement)
    }

    fn collides_at(&self, moving_forward: bool, speed: f64, walls: &[Wall]) -> bool {
        let next = self.pose_after(moving_forward, speed).position();
        let radius = self.config.body_radius;
        !self.arena.contains_circle(next, radius)
            || walls.iter().any(|wall| wall.is_colliding(next.x, next.y, radius))
    }

    fn pose_after(&self, moving_forward: bool, speed: f64) -> Pose {
        let sign = if moving_forward { 1.0 } else { -1.0 };
        let step: DVec2 = self.pose.heading(0.0) * (speed * sign);
        Pose {
            x: self.pose.x + step.x,
            y: self.pose.y + step.y,
            direction: self.pose.direction,
        }
    }
}

/// Wraps an angle in degrees into `[0, 360)`.
#[must_use]
pub fn wrap_degrees(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(FULL_TURN);
    // rem_euclid may round a tiny negative input up to exactly 360.
    if wrapped >= FULL_TURN {
        0.0
    } else {
        wrapped
    }
}
