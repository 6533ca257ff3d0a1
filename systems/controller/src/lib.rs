#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Autonomous controllers that read the agent's sensors and emit motions.
//!
//! Controllers never mutate the agent themselves. Each tick they inspect an
//! immutable agent reference and push [`Motion`] values that the driving loop
//! hands back to the agent.

use lidar_arena_core::Motion;
use lidar_arena_system_kinematics::{wrap_degrees, Agent};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Headings a wandering agent settles on.
const HEADING_CHOICES: [f64; 8] = [0.0, 45.0, 90.0, 135.0, 180.0, 225.0, 270.0, 315.0];
/// Probability that a wandering agent veers to an adjacent heading after a move.
pub const DEFAULT_COURSE_CHANGE_PROBABILITY: f64 = 0.05;

/// Common surface of every controller.
pub trait Controller {
    /// Inspects the agent and pushes the motions for this tick into `out`.
    fn handle(&mut self, agent: &Agent, out: &mut Vec<Motion>);

    /// Whether the controller currently drives the agent.
    fn is_running(&self) -> bool;

    /// Enables or disables the controller.
    fn set_running(&mut self, running: bool);

    /// Flips the running state.
    fn toggle_running(&mut self) {
        let running = self.is_running();
        self.set_running(!running);
    }
}

/// Turns left whenever the bump sensor fires and drives forward otherwise.
#[derive(Clone, Debug, Default)]
pub struct BumpTurn {
    running: bool,
}

impl BumpTurn {
    /// Creates a stopped controller.
    #[must_use]
    pub const fn new() -> Self {
        Self { running: false }
    }
}

impl Controller for BumpTurn {
    fn handle(&mut self, agent: &Agent, out: &mut Vec<Motion>) {
        if !self.running {
            return;
        }
        if agent.bump_sensor() {
            out.push(Motion::RotateLeft);
        } else {
            out.push(Motion::Forward);
        }
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn set_running(&mut self, running: bool) {
        self.running = running;
    }
}

/// Rotation needed to bring one heading onto another.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Turn {
    /// Counter-clockwise.
    Left,
    /// Clockwise.
    Right,
    /// Already aligned.
    Same,
}

impl Turn {
    fn motion(self) -> Option<Motion> {
        match self {
            Self::Left => Some(Motion::RotateLeft),
            Self::Right => Some(Motion::RotateRight),
            Self::Same => None,
        }
    }
}

/// Shortest signed angle from `current` to `goal`, in `(-180, 180]`.
#[must_use]
pub fn heading_difference(current: f64, goal: f64) -> f64 {
    let difference = wrap_degrees(goal - current);
    if difference > 180.0 {
        difference - 360.0
    } else {
        difference
    }
}

/// Direction of the shortest rotation from `current` to `goal`.
#[must_use]
pub fn turn_direction(current: f64, goal: f64) -> Turn {
    let difference = heading_difference(current, goal);
    if difference > 0.0 {
        Turn::Left
    } else if difference < 0.0 {
        Turn::Right
    } else {
        Turn::Same
    }
}

/// Configuration parameters required to construct the wandering controller.
#[derive(Clone, Copy, Debug)]
pub struct WandererConfig {
    rng_seed: u64,
    course_change_probability: f64,
}

impl WandererConfig {
    /// Creates a configuration with the default course-change probability.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self {
            rng_seed,
            course_change_probability: DEFAULT_COURSE_CHANGE_PROBABILITY,
        }
    }

    /// Overrides the per-move probability of veering to an adjacent heading.
    #[must_use]
    pub const fn with_course_change_probability(mut self, probability: f64) -> Self {
        self.course_change_probability = probability;
        self
    }
}

/// Drives straight, picks a random new heading after every bump and
/// occasionally veers to a neighbouring heading.
#[derive(Clone, Debug)]
pub struct Wanderer {
    rng: ChaCha8Rng,
    course_change_probability: f64,
    goal_direction: Option<f64>,
    running: bool,
}

impl Wanderer {
    /// Creates a stopped controller seeded for deterministic replays.
    #[must_use]
    pub fn new(config: WandererConfig) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            course_change_probability: config.course_change_probability,
            goal_direction: None,
            running: false,
        }
    }

    /// Heading the controller is currently turning toward, if any.
    #[must_use]
    pub const fn goal_direction(&self) -> Option<f64> {
        self.goal_direction
    }

    fn pick_random_goal(&mut self) -> f64 {
        HEADING_CHOICES[self.rng.gen_range(0..HEADING_CHOICES.len())]
    }

    fn maybe_change_course(&mut self, direction: f64) {
        if self.rng.gen::<f64>() >= self.course_change_probability {
            return;
        }
        let index = nearest_choice(direction);
        let len = HEADING_CHOICES.len();
        let neighbour = if self.rng.gen_bool(0.5) {
            (index + len - 1) % len
        } else {
            (index + 1) % len
        };
        self.goal_direction = Some(HEADING_CHOICES[neighbour]);
    }
}

impl Controller for Wanderer {
    fn handle(&mut self, agent: &Agent, out: &mut Vec<Motion>) {
        if !self.running {
            return;
        }

        let direction = agent.direction();
        if agent.bump_sensor() {
            self.goal_direction = Some(self.pick_random_goal());
        }

        if let Some(goal) = self.goal_direction {
            let tolerance = agent.angular_speed() / 2.0;
            if heading_difference(direction, goal).abs() < tolerance {
                self.goal_direction = None;
            } else if let Some(motion) = turn_direction(direction, goal).motion() {
                out.push(motion);
                return;
            }
        }

        if agent.bump_sensor() {
            return;
        }

        out.push(Motion::Forward);
        self.maybe_change_course(direction);
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn set_running(&mut self, running: bool) {
        self.running = running;
    }
}

fn nearest_choice(direction: f64) -> usize {
    let slot = (wrap_degrees(direction) / 45.0).round() as usize;
    slot % HEADING_CHOICES.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turn_direction_prefers_shortest_rotation() {
        assert_eq!(turn_direction(0.0, 90.0), Turn::Left);
        assert_eq!(turn_direction(0.0, 270.0), Turn::Right);
        assert_eq!(turn_direction(350.0, 10.0), Turn::Left);
        assert_eq!(turn_direction(45.0, 45.0), Turn::Same);
        assert_eq!(turn_direction(0.0, 180.0), Turn::Left);
    }

    #[test]
    fn nearest_choice_snaps_to_closest_heading() {
        assert_eq!(nearest_choice(0.0), 0);
        assert_eq!(nearest_choice(44.0), 1);
        assert_eq!(nearest_choice(359.0), 0);
        assert_eq!(nearest_choice(200.0), 4);
    }

    #[test]
    fn stopped_controllers_emit_nothing() {
        let agent = Agent::new(400.0, 300.0, 0.0, 0);
        let mut out = Vec::new();
        BumpTurn::new().handle(&agent, &mut out);
        Wanderer::new(WandererConfig::new(7)).handle(&agent, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn toggle_flips_running_state() {
        let mut controller = BumpTurn::new();
        controller.toggle_running();
        assert!(controller.is_running());
        controller.toggle_running();
        assert!(!controller.is_running());
    }
}
