#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Lidar Arena simulation.
//!
//! This crate owns the geometry every other crate relies on (segments,
//! rectangles, walls and the arena boundary) together with the message
//! surface that connects adapters and the authoritative world. Adapters and
//! editing systems submit [`Command`] values describing wall mutations, the
//! world executes them via its `apply` entry point, and then broadcasts
//! [`Event`] values. Controllers speak to the agent through [`Motion`].

pub mod arena;
pub mod geometry;
pub mod wall;

use glam::DVec2;
use serde::{Deserialize, Serialize};

pub use arena::{Arena, ArenaError, BoundaryHit};
pub use geometry::{distance, segment_intersection, Rect, Segment};
pub use wall::{ResizeHandle, UnknownHandle, Wall, WallRecord};

/// Position and heading of the agent.
///
/// `direction` is measured in degrees, counter-clockwise on screen, and kept
/// within `[0, 360)` by every kinematic operation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// Horizontal position.
    pub x: f64,
    /// Vertical position (grows downwards).
    pub y: f64,
    /// Facing direction in degrees.
    pub direction: f64,
}

impl Pose {
    /// Creates a pose from raw coordinates and heading.
    #[must_use]
    pub const fn new(x: f64, y: f64, direction: f64) -> Self {
        Self { x, y, direction }
    }

    /// Position as a vector.
    #[must_use]
    pub const fn position(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    /// Unit vector pointing along `direction + offset` degrees.
    ///
    /// The vertical component is negated so that positive angles turn
    /// counter-clockwise on a y-down screen.
    #[must_use]
    pub fn heading(&self, offset: f64) -> DVec2 {
        let radians = (self.direction + offset).to_radians();
        DVec2::new(radians.cos(), -radians.sin())
    }
}

/// Discrete kinematic command understood by the agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Motion {
    /// Turns counter-clockwise by the angular speed.
    RotateLeft,
    /// Turns clockwise by the angular speed.
    RotateRight,
    /// Moves along the facing direction.
    Forward,
    /// Moves against the facing direction.
    Backward,
}

/// Movement keys held during a tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MoveKeys {
    /// Forward key held.
    pub forward: bool,
    /// Backward key held.
    pub backward: bool,
    /// Rotate-left key held.
    pub left: bool,
    /// Rotate-right key held.
    pub right: bool,
}

impl MoveKeys {
    /// Motions implied by the held keys, in dispatch order.
    pub fn motions(self) -> impl Iterator<Item = Motion> {
        [
            (self.left, Motion::RotateLeft),
            (self.right, Motion::RotateRight),
            (self.forward, Motion::Forward),
            (self.backward, Motion::Backward),
        ]
        .into_iter()
        .filter_map(|(held, motion)| held.then_some(motion))
    }
}

/// Unique identifier the world assigns to every wall it stores.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WallId(u32);

impl WallId {
    /// Creates a wall identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Appends a wall covering the rectangle.
    AddWall {
        /// Rectangle occupied by the new wall.
        rect: Rect,
    },
    /// Removes a wall while preserving the order of the others.
    RemoveWall {
        /// Wall targeted for removal.
        wall: WallId,
    },
    /// Translates a wall.
    MoveWall {
        /// Wall to move.
        wall: WallId,
        /// Offset added to the wall anchor.
        delta: DVec2,
    },
    /// Drags one resize handle of a wall to the cursor.
    ResizeWall {
        /// Wall to resize.
        wall: WallId,
        /// Handle being dragged.
        handle: ResizeHandle,
        /// Cursor position the handle follows.
        cursor: DVec2,
    },
    /// Replaces the whole wall set, as when loading a world file.
    ReplaceWalls {
        /// Rectangles of the new wall set in order.
        rects: Vec<Rect>,
    },
    /// Removes every wall.
    ClearWalls,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Confirms a wall was appended.
    WallAdded {
        /// Identifier allocated to the wall.
        wall: WallId,
        /// Rectangle covered by the wall.
        rect: Rect,
    },
    /// Confirms a wall was removed.
    WallRemoved {
        /// Identifier of the removed wall.
        wall: WallId,
    },
    /// Confirms a wall was translated.
    WallMoved {
        /// Identifier of the moved wall.
        wall: WallId,
        /// Rectangle after the move.
        rect: Rect,
    },
    /// Confirms a wall was resized.
    WallResized {
        /// Identifier of the resized wall.
        wall: WallId,
        /// Rectangle after the resize.
        rect: Rect,
    },
    /// Announces that the whole wall set was swapped out.
    ///
    /// Agents must be handed the new wall slice from this point on.
    WallsReplaced {
        /// Number of walls in the new set.
        count: usize,
    },
    /// Reports that a wall command was rejected.
    WallRejected {
        /// Wall addressed by the command.
        wall: WallId,
        /// Specific reason the command failed.
        reason: WallError,
    },
    /// Reports that a new wall could not be added.
    AddRejected {
        /// Rectangle the command asked for.
        rect: Rect,
        /// Specific reason the command failed.
        reason: WallError,
    },
    /// Reports that a replacement wall set was refused; the old set is kept.
    ReplaceRejected {
        /// Number of walls in the refused set.
        requested: usize,
        /// Specific reason the command failed.
        reason: WallError,
    },
}

/// Reasons a wall command may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WallError {
    /// No wall with the provided identifier exists.
    MissingWall,
    /// Every wall identifier has been handed out once already.
    IdsExhausted,
}
