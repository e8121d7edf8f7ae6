//! World-to-canvas transform for raster and vector backends
//!
//! World coordinates are centered on the origin with y pointing up; canvas
//! coordinates start at the top-left corner with y pointing down.

use crate::geometry::{Path, Point2D};

/// View of the world on a fixed-size canvas
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    /// Canvas width in pixels
    pub width: f64,
    /// Canvas height in pixels
    pub height: f64,
    /// World point shown at the canvas center
    pub center: Point2D,
    /// Pixels per world unit
    pub scale: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 700.0,
            height: 700.0,
            center: Point2D::default(),
            scale: 1.0,
        }
    }
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    pub fn world_to_canvas(&self, p: Point2D) -> (f64, f64) {
        let cx = (p.x - self.center.x) * self.scale + self.width / 2.0;
        let cy = (self.center.y - p.y) * self.scale + self.height / 2.0;
        (cx, cy)
    }

    /// Center `bounds` and scale it to fill the canvas minus `padding` pixels
    pub fn fit_to_bounds(&mut self, bounds: &BoundingBox, padding: f64) {
        if bounds.is_empty() {
            return;
        }

        let available_width = (self.width - 2.0 * padding).max(1.0);
        let available_height = (self.height - 2.0 * padding).max(1.0);

        let scale_x = available_width / bounds.width();
        let scale_y = available_height / bounds.height();
        self.scale = scale_x.min(scale_y);
        self.center = bounds.center();
    }
}

/// Axis-aligned bounding box in world coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl BoundingBox {
    pub fn empty() -> Self {
        Self {
            min_x: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            min_y: f64::INFINITY,
            max_y: f64::NEG_INFINITY,
        }
    }

    /// Bounds of every point of every path
    pub fn of_paths<'a>(paths: impl IntoIterator<Item = &'a Path>) -> Self {
        let mut bounds = Self::empty();
        for path in paths {
            for p in path.points() {
                bounds.include_point(*p);
            }
        }
        bounds
    }

    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }

    pub fn include_point(&mut self, p: Point2D) {
        self.min_x = self.min_x.min(p.x);
        self.max_x = self.max_x.max(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_y = self.max_y.max(p.y);
    }

    /// Width, never below one unit
    pub fn width(&self) -> f64 {
        (self.max_x - self.min_x).max(1.0)
    }

    /// Height, never below one unit
    pub fn height(&self) -> f64 {
        (self.max_y - self.min_y).max(1.0)
    }

    pub fn center(&self) -> Point2D {
        Point2D::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }
}
