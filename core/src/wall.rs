//! Rectangular obstacles and their persisted record form.

use std::{fmt, str::FromStr};

use glam::DVec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::{distance, segment_intersection, Rect, Segment};

/// Axis-aligned rectangular obstacle placed inside the arena.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Wall {
    rect: Rect,
}

impl Wall {
    /// Creates a wall occupying the provided rectangle.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            rect: Rect::new(x, y, width, height),
        }
    }

    /// Creates a wall from an existing rectangle.
    #[must_use]
    pub const fn from_rect(rect: Rect) -> Self {
        Self { rect }
    }

    /// Rectangle currently covered by the wall.
    #[must_use]
    pub const fn rect(&self) -> Rect {
        self.rect
    }

    /// Boundary edges derived from the current rectangle (top, right, bottom, left).
    #[must_use]
    pub fn edges(&self) -> [Segment; 4] {
        self.rect.edges()
    }

    /// Reports whether a circle at `(x, y)` overlaps the wall.
    ///
    /// Tangent circles do not collide.
    #[must_use]
    pub fn is_colliding(&self, x: f64, y: f64, radius: f64) -> bool {
        self.rect.distance_squared_to(DVec2::new(x, y)) < radius * radius
    }

    /// Distance from `(x1, y1)` to the nearest edge crossed by the segment
    /// reaching `(x2, y2)`.
    #[must_use]
    pub fn line_intersection(&self, x1: f64, y1: f64, x2: f64, y2: f64) -> Option<f64> {
        let start = DVec2::new(x1, y1);
        let end = DVec2::new(x2, y2);
        self.edges()
            .iter()
            .filter_map(|edge| segment_intersection(start, end, edge.start, edge.end))
            .map(|hit| distance(start, hit))
            .min_by(f64::total_cmp)
    }

    /// Moves the wall by `delta` without changing its size.
    pub fn translate(&mut self, delta: DVec2) {
        self.rect = self.rect.translated(delta);
    }

    /// Drags the named resize handle to `cursor`.
    ///
    /// Only the rectangle edges implied by the handle move; the opposite
    /// edges stay anchored.
    pub fn resize(&mut self, handle: ResizeHandle, cursor: DVec2) {
        let rect = &mut self.rect;
        if handle.moves_left_edge() {
            rect.width += rect.x - cursor.x;
            rect.x = cursor.x;
        }
        if handle.moves_right_edge() {
            rect.width = cursor.x - rect.x;
        }
        if handle.moves_top_edge() {
            rect.height += rect.y - cursor.y;
            rect.y = cursor.y;
        }
        if handle.moves_bottom_edge() {
            rect.height = cursor.y - rect.y;
        }
    }

    /// Persisted record describing the wall.
    #[must_use]
    pub const fn to_record(&self) -> WallRecord {
        WallRecord {
            x: self.rect.x,
            y: self.rect.y,
            width: self.rect.width,
            height: self.rect.height,
        }
    }

    /// Rebuilds a wall from its persisted record.
    #[must_use]
    pub const fn from_record(record: WallRecord) -> Self {
        Self::new(record.x, record.y, record.width, record.height)
    }
}

impl From<Rect> for Wall {
    fn from(rect: Rect) -> Self {
        Self::from_rect(rect)
    }
}

/// Plain record form of a wall as stored in world files.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WallRecord {
    /// Horizontal coordinate of the anchor corner.
    pub x: f64,
    /// Vertical coordinate of the anchor corner.
    pub y: f64,
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

impl From<WallRecord> for Rect {
    fn from(record: WallRecord) -> Self {
        Rect::new(record.x, record.y, record.width, record.height)
    }
}

/// Grip on a selected wall that resizes it when dragged.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResizeHandle {
    /// Upper-left corner.
    TopLeft,
    /// Upper-right corner.
    TopRight,
    /// Lower-left corner.
    BottomLeft,
    /// Lower-right corner.
    BottomRight,
    /// Middle of the top edge.
    TopCenter,
    /// Middle of the bottom edge.
    BottomCenter,
    /// Middle of the left edge.
    LeftCenter,
    /// Middle of the right edge.
    RightCenter,
}

impl ResizeHandle {
    /// Every handle, in hit-testing order.
    pub const ALL: [ResizeHandle; 8] = [
        ResizeHandle::TopLeft,
        ResizeHandle::TopRight,
        ResizeHandle::BottomLeft,
        ResizeHandle::BottomRight,
        ResizeHandle::TopCenter,
        ResizeHandle::BottomCenter,
        ResizeHandle::LeftCenter,
        ResizeHandle::RightCenter,
    ];

    /// Kebab-case name of the handle.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::TopLeft => "top-left",
            Self::TopRight => "top-right",
            Self::BottomLeft => "bottom-left",
            Self::BottomRight => "bottom-right",
            Self::TopCenter => "top-center",
            Self::BottomCenter => "bottom-center",
            Self::LeftCenter => "left-center",
            Self::RightCenter => "right-center",
        }
    }

    const fn moves_left_edge(self) -> bool {
        matches!(self, Self::TopLeft | Self::BottomLeft | Self::LeftCenter)
    }

    const fn moves_right_edge(self) -> bool {
        matches!(self, Self::TopRight | Self::BottomRight | Self::RightCenter)
    }

    const fn moves_top_edge(self) -> bool {
        matches!(self, Self::TopLeft | Self::TopRight | Self::TopCenter)
    }

    const fn moves_bottom_edge(self) -> bool {
        matches!(
            self,
            Self::BottomLeft | Self::BottomRight | Self::BottomCenter
        )
    }
}

impl fmt::Display for ResizeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Raised when a string does not name a resize handle.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unknown resize handle '{0}'")]
pub struct UnknownHandle(pub String);

impl FromStr for ResizeHandle {
    type Err = UnknownHandle;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|handle| handle.name() == value)
            .ok_or_else(|| UnknownHandle(value.to_owned()))
    }
}
