//! TOML run configuration with command-line overrides.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use clap::ValueEnum;
use lidar_arena_core::{Arena, Pose};
use lidar_arena_system_kinematics::{
    KinematicsConfig, KinematicsConfigError, MovePolicy, DEFAULT_ANGULAR_SPEED,
    DEFAULT_BODY_RADIUS, DEFAULT_LINEAR_SPEED, DEFAULT_MIN_TRIAL_SPEED, DEFAULT_SPEED_DECREMENT,
};
use lidar_arena_system_lidar::{LidarConfig, LidarConfigError};
use serde::Deserialize;
use thiserror::Error;

const DEFAULT_TICKS: u64 = 600;
const DEFAULT_SEED: u64 = 42;

/// Errors raised while loading a configuration file.
#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config file {}", path.display())]
    Read {
        /// Offending path.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The file is not valid TOML or does not match the schema.
    #[error("malformed config file {}", path.display())]
    Parse {
        /// Offending path.
        path: PathBuf,
        /// Underlying parse failure.
        #[source]
        source: toml::de::Error,
    },
    /// The file parses but describes an unusable agent or sensor.
    #[error("invalid config file {}", path.display())]
    Invalid {
        /// Offending path.
        path: PathBuf,
        /// Rule the values break.
        #[source]
        source: InvalidConfig,
    },
}

/// Semantic problems found in a parsed configuration.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub(crate) enum InvalidConfig {
    /// The `[lidar]` section is out of range.
    #[error(transparent)]
    Lidar(#[from] LidarConfigError),
    /// The `[agent]` section is out of range.
    #[error(transparent)]
    Kinematics(#[from] KinematicsConfigError),
}

/// Controller driving the agent during a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub(crate) enum ControllerKind {
    /// Turns left on every bump.
    BumpTurn,
    /// Picks random headings after bumps and veers occasionally.
    #[default]
    Wander,
}

/// Start pose and kinematic parameters of the agent.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct AgentConfig {
    x: f64,
    y: f64,
    direction: f64,
    linear_speed: f64,
    angular_speed: f64,
    body_radius: f64,
    speed_decrement: f64,
    min_trial_speed: f64,
    move_policy: MovePolicy,
}

impl AgentConfig {
    /// Pose the agent starts from.
    pub(crate) const fn pose(&self) -> Pose {
        Pose::new(self.x, self.y, self.direction)
    }

    /// Kinematic parameters handed to the agent.
    pub(crate) const fn kinematics(&self) -> KinematicsConfig {
        KinematicsConfig {
            linear_speed: self.linear_speed,
            angular_speed: self.angular_speed,
            body_radius: self.body_radius,
            speed_decrement: self.speed_decrement,
            min_trial_speed: self.min_trial_speed,
            move_policy: self.move_policy,
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            x: 400.0,
            y: 300.0,
            direction: 0.0,
            linear_speed: DEFAULT_LINEAR_SPEED,
            angular_speed: DEFAULT_ANGULAR_SPEED,
            body_radius: DEFAULT_BODY_RADIUS,
            speed_decrement: DEFAULT_SPEED_DECREMENT,
            min_trial_speed: DEFAULT_MIN_TRIAL_SPEED,
            move_policy: MovePolicy::BackOff,
        }
    }
}

/// Complete description of a headless run.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct SimulationConfig {
    pub(crate) ticks: u64,
    pub(crate) controller: ControllerKind,
    pub(crate) seed: u64,
    pub(crate) arena: Arena,
    pub(crate) agent: AgentConfig,
    pub(crate) lidar: LidarConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            ticks: DEFAULT_TICKS,
            controller: ControllerKind::default(),
            seed: DEFAULT_SEED,
            arena: Arena::DEFAULT,
            agent: AgentConfig::default(),
            lidar: LidarConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Reads, parses and validates the configuration stored at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        let config = Self::from_toml_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })?;
        config.validate().map_err(|source| ConfigError::Invalid {
            path: path.to_owned(),
            source,
        })?;
        Ok(config)
    }

    /// Checks the agent and sensor parameters.
    pub(crate) fn validate(&self) -> Result<(), InvalidConfig> {
        self.agent.kinematics().validate()?;
        self.lidar.validate()?;
        Ok(())
    }

    /// Parses a configuration document; omitted fields take their defaults.
    pub(crate) fn from_toml_str(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Applies flags given on the command line over the file values.
    #[must_use]
    pub(crate) fn with_overrides(mut self, overrides: RunOverrides) -> Self {
        if let Some(ticks) = overrides.ticks {
            self.ticks = ticks;
        }
        if let Some(controller) = overrides.controller {
            self.controller = controller;
        }
        if let Some(seed) = overrides.seed {
            self.seed = seed;
        }
        if let Some(beams) = overrides.beams {
            self.lidar.beam_count = beams;
        }
        self
    }
}

/// Command-line values that take precedence over the configuration file.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct RunOverrides {
    pub(crate) ticks: Option<u64>,
    pub(crate) controller: Option<ControllerKind>,
    pub(crate) seed: Option<u64>,
    pub(crate) beams: Option<usize>,
}
