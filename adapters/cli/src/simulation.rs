//! Headless tick loop: scan, decide, move.

use lidar_arena_core::{Command, Event, Motion, Rect, Wall};
use lidar_arena_system_controller::{BumpTurn, Controller, Wanderer, WandererConfig};
use lidar_arena_system_kinematics::Agent;
use lidar_arena_system_lidar::Lidar;
use lidar_arena_world::{self as world, query, World};
use tracing::{debug, warn};

use crate::config::{ControllerKind, SimulationConfig};

/// Counters accumulated over a run.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct RunSummary {
    /// Ticks executed.
    pub(crate) ticks: u64,
    /// Motions dispatched to the agent.
    pub(crate) motions: u64,
    /// Move attempts that were fully blocked.
    pub(crate) bumps: u64,
    /// Path length travelled by the agent.
    pub(crate) distance: f64,
    /// Shortest beam reading seen, if any beam was cast.
    pub(crate) closest_reading: Option<f64>,
}

/// One agent and its controller inside a world.
pub(crate) struct Simulation {
    world: World,
    agent: Agent,
    controller: Box<dyn Controller>,
    motions: Vec<Motion>,
    summary: RunSummary,
}

impl Simulation {
    /// Builds the world from `rects` and places a running controller in it.
    pub(crate) fn new(config: &SimulationConfig, rects: Vec<Rect>) -> Self {
        let mut world = World::new();
        let mut events = Vec::new();
        world::apply(&mut world, Command::ReplaceWalls { rects }, &mut events);
        if let Some(Event::WallsReplaced { count }) = events.first() {
            debug!(walls = count, "loaded world");
        }

        let agent = Agent::with_config(
            config.agent.pose(),
            config.agent.kinematics(),
            Lidar::new(config.lidar),
            config.arena,
        );
        if start_is_blocked(&agent, query::walls(&world)) {
            warn!(
                x = agent.x(),
                y = agent.y(),
                "agent starts overlapping a wall or the arena limits"
            );
        }

        let mut controller: Box<dyn Controller> = match config.controller {
            ControllerKind::BumpTurn => Box::new(BumpTurn::new()),
            ControllerKind::Wander => Box::new(Wanderer::new(WandererConfig::new(config.seed))),
        };
        controller.set_running(true);

        Self {
            world,
            agent,
            controller,
            motions: Vec::new(),
            summary: RunSummary::default(),
        }
    }

    /// Agent driven by the simulation.
    pub(crate) const fn agent(&self) -> &Agent {
        &self.agent
    }

    /// Advances the simulation by one tick.
    pub(crate) fn tick(&mut self) {
        let walls = query::walls(&self.world);
        self.agent.scan(walls);
        if let Some(closest) = self.agent.lidar_ranges().iter().copied().reduce(f64::min) {
            let best = self.summary.closest_reading.map_or(closest, |best| best.min(closest));
            self.summary.closest_reading = Some(best);
        }

        self.motions.clear();
        self.controller.handle(&self.agent, &mut self.motions);
        for motion in &self.motions {
            let before = self.agent.pose().position();
            self.agent.apply(*motion, walls);
            self.summary.distance += before.distance(self.agent.pose().position());
            if self.agent.bump_sensor() {
                self.summary.bumps += 1;
            }
        }
        self.summary.motions += self.motions.len() as u64;
        self.summary.ticks += 1;
    }

    /// Runs `ticks` ticks and returns the counters accumulated so far.
    pub(crate) fn run(&mut self, ticks: u64) -> RunSummary {
        for _ in 0..ticks {
            self.tick();
        }
        self.summary
    }
}

fn start_is_blocked(agent: &Agent, walls: &[Wall]) -> bool {
    let position = agent.pose().position();
    let radius = agent.body_radius();
    !agent.arena().contains_circle(position, radius)
        || walls
            .iter()
            .any(|wall| wall.is_colliding(position.x, position.y, radius))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RunOverrides;

    fn config(controller: ControllerKind, seed: u64) -> SimulationConfig {
        SimulationConfig::default().with_overrides(RunOverrides {
            controller: Some(controller),
            seed: Some(seed),
            ..RunOverrides::default()
        })
    }

    fn walls() -> Vec<Rect> {
        vec![
            Rect::new(100.0, 100.0, 60.0, 200.0),
            Rect::new(500.0, 250.0, 40.0, 100.0),
            Rect::new(380.0, 420.0, 90.0, 90.0),
        ]
    }

    #[test]
    fn bump_turn_run_reaches_the_wall_and_turns() {
        let mut simulation = Simulation::new(&config(ControllerKind::BumpTurn, 0), walls());
        let summary = simulation.run(300);

        assert_eq!(summary.ticks, 300);
        assert_eq!(summary.motions, 300);
        assert!(summary.bumps > 0, "agent heading east must hit the wall");
        assert!(summary.distance > 0.0);
        let closest = summary.closest_reading.expect("beams were cast");
        assert!((0.0..=200.0).contains(&closest));
    }

    #[test]
    fn seeded_wander_runs_replay_identically() {
        let mut first = Simulation::new(&config(ControllerKind::Wander, 17), walls());
        let mut second = Simulation::new(&config(ControllerKind::Wander, 17), walls());

        assert_eq!(first.run(800), second.run(800));
        assert_eq!(first.agent().pose(), second.agent().pose());
    }

    #[test]
    fn blind_agent_reports_no_reading() {
        let config = SimulationConfig::default().with_overrides(RunOverrides {
            beams: Some(0),
            ..RunOverrides::default()
        });
        let mut simulation = Simulation::new(&config, Vec::new());
        let summary = simulation.run(10);
        assert_eq!(summary.closest_reading, None);
        assert!(simulation.agent().lidar_ranges().is_empty());
    }

    #[test]
    fn zero_ticks_leave_the_agent_at_its_start() {
        let config = SimulationConfig::default();
        let mut simulation = Simulation::new(&config, walls());
        assert_eq!(simulation.run(0), RunSummary::default());
        assert_eq!(simulation.agent().pose(), config.agent.pose());
    }
}
