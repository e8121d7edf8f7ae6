//! Polyline geometry with arc-length queries
//!
//! A [`Path`] is an immutable polyline. Charge carriers and component symbols
//! are positioned on it by arc length, so the only query the rest of the crate
//! needs is [`Path::position_at`]: the point and unit tangent at a distance `s`
//! from the first point.
//!
//! [`RectLoopTemplate`] produces the rectangular wire loop that the circuit is
//! drawn on.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tangent reported for zero-length segments and fully degenerate paths
pub const FALLBACK_TANGENT: Point2D = Point2D { x: 1.0, y: 0.0 };

/// Errors raised while building a path
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PathError {
    /// A polyline needs at least one segment
    #[error("a path needs at least 2 points, got {0}")]
    TooFewPoints(usize),

    #[error("path length is not finite")]
    NonFiniteLength,
}

/// A 2D point (or direction) in world coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance_to(self, other: Point2D) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Length when treated as a vector
    pub fn magnitude(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Left-hand normal of a direction (rotated +90 degrees)
    pub fn normal(self) -> Point2D {
        Point2D::new(-self.y, self.x)
    }

    /// `self + dir * distance`
    pub fn offset(self, dir: Point2D, distance: f64) -> Point2D {
        Point2D::new(self.x + dir.x * distance, self.y + dir.y * distance)
    }
}

/// Result of an arc-length query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathSample {
    pub position: Point2D,
    /// Unit direction of travel at `position`
    pub tangent: Point2D,
}

/// Immutable polyline with precomputed segment lengths
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    points: Vec<Point2D>,
    segment_lengths: Vec<f64>,
    total_length: f64,
}

impl Path {
    /// Build a path from an ordered point sequence
    pub fn new(points: Vec<Point2D>) -> Result<Self, PathError> {
        if points.len() < 2 {
            return Err(PathError::TooFewPoints(points.len()));
        }
        let path = Self::from_validated(points);
        if !path.total_length.is_finite() {
            return Err(PathError::NonFiniteLength);
        }
        Ok(path)
    }

    fn from_validated(points: Vec<Point2D>) -> Self {
        let segment_lengths: Vec<f64> = points
            .windows(2)
            .map(|pair| pair[0].distance_to(pair[1]))
            .collect();

        let sum: f64 = segment_lengths.iter().sum();
        // Everything downstream takes `s % total_length`, so a path whose
        // points all coincide still needs a non-zero length.
        let total_length = if sum == 0.0 { 1.0 } else { sum };

        tracing::debug!(points = points.len(), total_length, "built path");

        Self {
            points,
            segment_lengths,
            total_length,
        }
    }

    pub fn points(&self) -> &[Point2D] {
        &self.points
    }

    /// Length of each segment, in point order
    pub fn segment_lengths(&self) -> &[f64] {
        &self.segment_lengths
    }

    /// Sum of the segment lengths (1.0 for a path with no extent)
    pub fn total_length(&self) -> f64 {
        self.total_length
    }

    /// Point and unit tangent at arc length `s`
    ///
    /// `s` is expected in `[0, total_length)`; callers wrap it themselves.
    /// Negative values are treated as 0 and values past the end clamp to the
    /// final point.
    pub fn position_at(&self, s: f64) -> PathSample {
        let mut remaining = s.max(0.0);

        for (i, &len) in self.segment_lengths.iter().enumerate() {
            if remaining <= len {
                let start = self.points[i];
                let end = self.points[i + 1];
                if len == 0.0 {
                    return PathSample {
                        position: start,
                        tangent: FALLBACK_TANGENT,
                    };
                }
                let u = remaining / len;
                return PathSample {
                    position: Point2D::new(
                        start.x + u * (end.x - start.x),
                        start.y + u * (end.y - start.y),
                    ),
                    tangent: Point2D::new((end.x - start.x) / len, (end.y - start.y) / len),
                };
            }
            remaining -= len;
        }

        let position = self.points[self.points.len() - 1];
        PathSample {
            position,
            tangent: self.last_tangent(),
        }
    }

    /// Tangent of the last segment with non-zero length
    fn last_tangent(&self) -> Point2D {
        self.points
            .windows(2)
            .zip(&self.segment_lengths)
            .rev()
            .find(|(_, len)| **len > 0.0)
            .map(|(pair, len)| {
                Point2D::new((pair[1].x - pair[0].x) / len, (pair[1].y - pair[0].y) / len)
            })
            .unwrap_or(FALLBACK_TANGENT)
    }
}

/// Rectangular wire loop centered on the origin
///
/// The wire is drawn as two outlines (outer and inner); the mid line between
/// them is the path that electrons and symbols ride on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RectLoopTemplate {
    /// World width
    pub width: f64,
    /// World height
    pub height: f64,
    /// Gap between the world edge and the outer outline
    pub margin: f64,
    pub wire_thickness: f64,
}

impl Default for RectLoopTemplate {
    fn default() -> Self {
        Self {
            width: 240.0,
            height: 240.0,
            margin: 24.0,
            wire_thickness: 12.0,
        }
    }
}

impl RectLoopTemplate {
    pub fn new(width: f64, height: f64, margin: f64, wire_thickness: f64) -> Self {
        Self {
            width,
            height,
            margin,
            wire_thickness,
        }
    }

    pub fn outer_inset(&self) -> f64 {
        self.margin
    }

    pub fn inner_inset(&self) -> f64 {
        self.margin + self.wire_thickness
    }

    pub fn mid_inset(&self) -> f64 {
        self.margin + self.wire_thickness / 2.0
    }

    /// Closed rectangle, starting and ending at the bottom-left corner
    pub fn rect_points(&self, inset: f64) -> Vec<Point2D> {
        let x = self.width / 2.0 - inset;
        let y = self.height / 2.0 - inset;
        vec![
            Point2D::new(-x, -y),
            Point2D::new(-x, y),
            Point2D::new(x, y),
            Point2D::new(x, -y),
            Point2D::new(-x, -y),
        ]
    }

    pub fn outer_path(&self) -> Path {
        Path::from_validated(self.rect_points(self.outer_inset()))
    }

    pub fn inner_path(&self) -> Path {
        Path::from_validated(self.rect_points(self.inner_inset()))
    }

    /// Path followed by electrons and component anchors
    pub fn mid_path(&self) -> Path {
        Path::from_validated(self.rect_points(self.mid_inset()))
    }

    /// Perimeter of the rectangle at `inset`, from its dimensions alone
    pub fn perimeter(&self, inset: f64) -> f64 {
        2.0 * (self.width - 2.0 * inset).abs() + 2.0 * (self.height - 2.0 * inset).abs()
    }
}
