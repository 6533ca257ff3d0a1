//! Outer rectangle that bounds every agent and wall position.

use glam::DVec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::distance;

/// Rejection reasons raised while building an arena from raw limits.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum ArenaError {
    /// The left limit does not lie strictly left of the right limit.
    #[error("arena left limit {left} must be smaller than right limit {right}")]
    InvertedHorizontal {
        /// Requested left limit.
        left: f64,
        /// Requested right limit.
        right: f64,
    },
    /// The top limit does not lie strictly above the bottom limit.
    #[error("arena top limit {top} must be smaller than bottom limit {bottom}")]
    InvertedVertical {
        /// Requested top limit.
        top: f64,
        /// Requested bottom limit.
        bottom: f64,
    },
}

/// Four half-plane limits forming the simulation rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ArenaLimits", into = "ArenaLimits")]
pub struct Arena {
    left: f64,
    right: f64,
    top: f64,
    bottom: f64,
}

impl Arena {
    /// The 800×600 arena anchored at the origin.
    pub const DEFAULT: Arena = Arena {
        left: 0.0,
        right: 800.0,
        top: 0.0,
        bottom: 600.0,
    };

    /// Creates an arena, rejecting inverted or empty limits.
    pub fn new(left: f64, right: f64, top: f64, bottom: f64) -> Result<Self, ArenaError> {
        if !(left < right) {
            return Err(ArenaError::InvertedHorizontal { left, right });
        }
        if !(top < bottom) {
            return Err(ArenaError::InvertedVertical { top, bottom });
        }
        Ok(Self {
            left,
            right,
            top,
            bottom,
        })
    }

    /// Left limit.
    #[must_use]
    pub const fn left(&self) -> f64 {
        self.left
    }

    /// Right limit.
    #[must_use]
    pub const fn right(&self) -> f64 {
        self.right
    }

    /// Top limit.
    #[must_use]
    pub const fn top(&self) -> f64 {
        self.top
    }

    /// Bottom limit.
    #[must_use]
    pub const fn bottom(&self) -> f64 {
        self.bottom
    }

    /// Width of the arena.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    /// Height of the arena.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Reports whether a circle fits inside the arena.
    ///
    /// Touching a limit is allowed; only strictly crossing it fails.
    #[must_use]
    pub fn contains_circle(&self, center: DVec2, radius: f64) -> bool {
        center.x >= self.left + radius
            && center.x <= self.right - radius
            && center.y >= self.top + radius
            && center.y <= self.bottom - radius
    }

    /// Finds where the directed ray `start → end` first meets the arena limits.
    ///
    /// A limit is only considered when the ray heads toward it, so a ray
    /// running parallel to a limit, or starting on one and leaving it, never
    /// reports a hit behind itself. Without any hit within the segment the
    /// far endpoint is returned together with an infinite distance.
    #[must_use]
    pub fn nearest_boundary_hit(&self, start: DVec2, end: DVec2) -> BoundaryHit {
        let delta = end - start;
        let mut best: Option<(f64, DVec2)> = None;
        let mut consider = |t: f64, point: DVec2| {
            if !(0.0..=1.0).contains(&t) {
                return;
            }
            if best.map_or(true, |(best_t, _)| t < best_t) {
                best = Some((t, point));
            }
        };

        if delta.y < 0.0 {
            let t = (self.top - start.y) / delta.y;
            consider(t, DVec2::new(start.x + t * delta.x, self.top));
        }
        if delta.y > 0.0 {
            let t = (self.bottom - start.y) / delta.y;
            consider(t, DVec2::new(start.x + t * delta.x, self.bottom));
        }
        if delta.x < 0.0 {
            let t = (self.left - start.x) / delta.x;
            consider(t, DVec2::new(self.left, start.y + t * delta.y));
        }
        if delta.x > 0.0 {
            let t = (self.right - start.x) / delta.x;
            consider(t, DVec2::new(self.right, start.y + t * delta.y));
        }

        match best {
            Some((_, point)) => BoundaryHit {
                point,
                distance: distance(start, point),
            },
            None => BoundaryHit {
                point: end,
                distance: f64::INFINITY,
            },
        }
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Raw limits used when (de)serialising an [`Arena`].
///
/// Omitted limits fall back to the default arena.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ArenaLimits {
    left: f64,
    right: f64,
    top: f64,
    bottom: f64,
}

impl Default for ArenaLimits {
    fn default() -> Self {
        Arena::DEFAULT.into()
    }
}

impl TryFrom<ArenaLimits> for Arena {
    type Error = ArenaError;

    fn try_from(limits: ArenaLimits) -> Result<Self, Self::Error> {
        Arena::new(limits.left, limits.right, limits.top, limits.bottom)
    }
}

impl From<Arena> for ArenaLimits {
    fn from(arena: Arena) -> Self {
        Self {
            left: arena.left,
            right: arena.right,
            top: arena.top,
            bottom: arena.bottom,
        }
    }
}

/// Location and distance of the first arena limit met by a ray.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundaryHit {
    /// Point where the ray meets the limit, or the ray end without a hit.
    pub point: DVec2,
    /// Distance from the ray start, infinite without a hit.
    pub distance: f64,
}

impl BoundaryHit {
    /// Reports whether the ray actually met a limit.
    #[must_use]
    pub fn is_hit(&self) -> bool {
        self.distance.is_finite()
    }
}
