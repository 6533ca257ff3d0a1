#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Simulated range sensor that casts a fan of beams against walls and the arena.

use glam::DVec2;
use lidar_arena_core::{Arena, Pose, Wall};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default maximum beam length in world units.
pub const DEFAULT_MAX_RANGE: f64 = 200.0;
/// Default number of evenly spaced beams.
pub const DEFAULT_BEAM_COUNT: usize = 36;

/// Coordinate precision used for the beam origin.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Precision {
    /// Casts from the exact floating-point origin.
    #[default]
    Full,
    /// Truncates the origin to whole units before casting.
    Truncated,
}

/// Configuration parameters required to construct the scanner.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LidarConfig {
    /// Beam length; readings never exceed it.
    pub max_range: f64,
    /// Number of beams spread evenly over a full turn.
    pub beam_count: usize,
    /// Origin precision policy.
    pub precision: Precision,
}

impl Default for LidarConfig {
    fn default() -> Self {
        Self {
            max_range: DEFAULT_MAX_RANGE,
            beam_count: DEFAULT_BEAM_COUNT,
            precision: Precision::Full,
        }
    }
}

impl LidarConfig {
    /// Checks that the parameters describe a usable sensor.
    pub fn validate(&self) -> Result<(), LidarConfigError> {
        if !(self.max_range.is_finite() && self.max_range > 0.0) {
            return Err(LidarConfigError::InvalidMaxRange {
                max_range: self.max_range,
            });
        }
        Ok(())
    }
}

/// Errors reported by [`LidarConfig::validate`].
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum LidarConfigError {
    /// The beam length is not a finite positive distance.
    #[error("lidar max_range {max_range} must be finite and positive")]
    InvalidMaxRange {
        /// Requested beam length.
        max_range: f64,
    },
}

/// Fixed beam layout plus range limit.
#[derive(Clone, Debug, PartialEq)]
pub struct Lidar {
    angles: Vec<f64>,
    max_range: f64,
    precision: Precision,
}

impl Lidar {
    /// Creates a scanner whose beams are evenly spaced over 360 degrees.
    #[must_use]
    pub fn new(config: LidarConfig) -> Self {
        let angles = evenly_spaced_angles(config.beam_count);
        Self::with_angles(angles, config.max_range, config.precision)
    }

    /// Creates a scanner with an explicit beam layout.
    ///
    /// Offsets are in degrees relative to the facing direction and are
    /// scanned in the given order.
    #[must_use]
    pub fn with_angles(angles: Vec<f64>, max_range: f64, precision: Precision) -> Self {
        Self {
            angles,
            max_range,
            precision,
        }
    }

    /// Beam offsets in scan order.
    #[must_use]
    pub fn angles(&self) -> &[f64] {
        &self.angles
    }

    /// Maximum reading.
    #[must_use]
    pub const fn max_range(&self) -> f64 {
        self.max_range
    }

    /// Origin precision policy.
    #[must_use]
    pub const fn precision(&self) -> Precision {
        self.precision
    }

    /// Casts every beam from `pose`, overwriting `out` with one reading per beam.
    pub fn scan_into(&self, pose: Pose, walls: &[Wall], arena: &Arena, out: &mut Vec<f64>) {
        out.clear();
        out.reserve(self.angles.len());
        let origin = self.origin(pose);
        for &offset in &self.angles {
            let direction = pose.heading(offset);
            out.push(self.cast(origin, direction, walls, arena));
        }
    }

    /// Casts every beam from `pose` and returns the readings.
    #[must_use]
    pub fn scan(&self, pose: Pose, walls: &[Wall], arena: &Arena) -> Vec<f64> {
        let mut ranges = Vec::with_capacity(self.angles.len());
        self.scan_into(pose, walls, arena, &mut ranges);
        ranges
    }

    /// Casts a single beam along the unit vector `direction`.
    ///
    /// Returns the distance to the closest wall edge or arena limit, capped
    /// at the maximum range.
    #[must_use]
    pub fn cast(&self, origin: DVec2, direction: DVec2, walls: &[Wall], arena: &Arena) -> f64 {
        let end = origin + direction * self.max_range;
        let mut nearest = self.max_range;

        for wall in walls {
            if let Some(hit) = wall.line_intersection(origin.x, origin.y, end.x, end.y) {
                if hit < nearest {
                    nearest = hit;
                }
            }
        }

        let boundary = arena.nearest_boundary_hit(origin, end);
        if boundary.distance < nearest {
            nearest = boundary.distance;
        }

        nearest
    }

    fn origin(&self, pose: Pose) -> DVec2 {
        match self.precision {
            Precision::Full => pose.position(),
            Precision::Truncated => DVec2::new(pose.x.trunc(), pose.y.trunc()),
        }
    }
}

impl Default for Lidar {
    fn default() -> Self {
        Self::new(LidarConfig::default())
    }
}

/// Offsets `i * 360 / count` for `i` in `0..count`.
#[must_use]
pub fn evenly_spaced_angles(count: usize) -> Vec<f64> {
    let spacing = 360.0 / count as f64;
    (0..count).map(|index| index as f64 * spacing).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_spaces_thirty_six_beams_ten_degrees_apart() {
        let lidar = Lidar::default();
        assert_eq!(lidar.angles().len(), 36);
        assert_eq!(lidar.angles()[0], 0.0);
        assert_eq!(lidar.angles()[1], 10.0);
        assert_eq!(lidar.angles()[35], 350.0);
    }

    #[test]
    fn max_range_must_be_finite_and_positive() {
        assert_eq!(LidarConfig::default().validate(), Ok(()));
        for max_range in [-50.0, 0.0, f64::INFINITY, f64::NAN] {
            let config = LidarConfig {
                max_range,
                ..LidarConfig::default()
            };
            assert!(
                matches!(
                    config.validate(),
                    Err(LidarConfigError::InvalidMaxRange { .. })
                ),
                "max_range {max_range} accepted"
            );
        }
    }

    #[test]
    fn zero_beams_produce_no_angles() {
        assert!(evenly_spaced_angles(0).is_empty());
    }

    #[test]
    fn truncated_precision_drops_fractional_origin() {
        let lidar = Lidar::with_angles(vec![0.0], 2000.0, Precision::Truncated);
        let ranges = lidar.scan(Pose::new(400.75, 300.5, 0.0), &[], &Arena::DEFAULT);
        assert_eq!(ranges, vec![400.0]);

        let lidar = Lidar::with_angles(vec![0.0], 2000.0, Precision::Full);
        let ranges = lidar.scan(Pose::new(400.75, 300.5, 0.0), &[], &Arena::DEFAULT);
        assert_eq!(ranges, vec![399.25]);
    }

    #[test]
    fn scan_into_discards_previous_readings() {
        let lidar = Lidar::with_angles(vec![0.0, 180.0], 2000.0, Precision::Full);
        let mut ranges = vec![1.0, 2.0, 3.0, 4.0];
        lidar.scan_into(Pose::new(400.0, 300.0, 0.0), &[], &Arena::DEFAULT, &mut ranges);
        assert_eq!(ranges.len(), 2);
        assert_eq!(ranges[0], 400.0);
    }
}
