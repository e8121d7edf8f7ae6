//! SVG backend
//!
//! Static geometry becomes SVG elements in canvas coordinates. Marker moves
//! are collected per frame so the page can replay them without rerunning the
//! physics.

use std::fmt::Write as _;
use std::ops::ControlFlow;

use serde::Serialize;

use crate::animation::Frame;
use crate::geometry::Point2D;
use crate::render::{RenderResult, Renderer};
use crate::viewport::Viewport;

const WIRE_STROKE: &str = "#222";
const SYMBOL_STROKE: &str = "#111";
const MARKER_FILL: &str = "#1f6feb";

/// Marker positions and circuit state for one presented frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SvgFrame {
    pub tick: u64,
    pub t: f64,
    pub current: f64,
    /// Canvas coordinates of every marker, as `[x, y]` pairs
    pub particles: Vec<[f64; 2]>,
}

/// Renderer producing an SVG scene plus a list of replay frames
#[derive(Debug)]
pub struct SvgRenderer {
    viewport: Viewport,
    elements: Vec<String>,
    markers: Vec<[f64; 2]>,
    frames: Vec<SvgFrame>,
    max_frames: Option<usize>,
    pub marker_radius: f64,
    pub stroke_width: f64,
}

impl SvgRenderer {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            elements: Vec::new(),
            markers: Vec::new(),
            frames: Vec::new(),
            max_frames: None,
            marker_radius: 4.0,
            stroke_width: 2.0,
        }
    }

    /// Ask the animation to stop once `frames` frames are recorded
    pub fn with_max_frames(mut self, frames: usize) -> Self {
        self.max_frames = Some(frames);
        self
    }

    pub fn frames(&self) -> &[SvgFrame] {
        &self.frames
    }

    /// Number of static elements drawn so far
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Complete `<svg>` markup: static elements, then one circle per marker
    /// at its latest position
    pub fn scene_svg(&self) -> RenderResult<String> {
        let mut svg = String::new();
        writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" id="scene" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.viewport.width,
            h = self.viewport.height,
        )?;
        for element in &self.elements {
            writeln!(svg, "  {element}")?;
        }
        for (i, [x, y]) in self.markers.iter().enumerate() {
            writeln!(
                svg,
                r#"  <circle id="e{i}" class="electron" cx="{x}" cy="{y}" r="{r}" fill="{MARKER_FILL}"/>"#,
                r = self.marker_radius,
            )?;
        }
        svg.push_str("</svg>");
        Ok(svg)
    }

    fn canvas(&self, p: Point2D) -> [f64; 2] {
        let (x, y) = self.viewport.world_to_canvas(p);
        [round2(x), round2(y)]
    }

    fn points_attr(&self, points: &[Point2D]) -> RenderResult<String> {
        let mut attr = String::new();
        for (i, p) in points.iter().enumerate() {
            let [x, y] = self.canvas(*p);
            if i > 0 {
                attr.push(' ');
            }
            write!(attr, "{x},{y}")?;
        }
        Ok(attr)
    }
}

impl Renderer for SvgRenderer {
    fn draw_polyline(&mut self, points: &[Point2D]) -> RenderResult<()> {
        let attr = self.points_attr(points)?;
        self.elements.push(format!(
            r#"<polyline class="wire" points="{attr}" fill="none" stroke="{WIRE_STROKE}" stroke-width="{}"/>"#,
            self.stroke_width
        ));
        Ok(())
    }

    fn draw_plate(&mut self, from: Point2D, to: Point2D) -> RenderResult<()> {
        let [x1, y1] = self.canvas(from);
        let [x2, y2] = self.canvas(to);
        self.elements.push(format!(
            r#"<line class="plate" x1="{x1}" y1="{y1}" x2="{x2}" y2="{y2}" stroke="{SYMBOL_STROKE}" stroke-width="{}"/>"#,
            self.stroke_width * 1.5
        ));
        Ok(())
    }

    fn draw_zigzag(&mut self, points: &[Point2D]) -> RenderResult<()> {
        let attr = self.points_attr(points)?;
        self.elements.push(format!(
            r#"<polyline class="resistor" points="{attr}" fill="none" stroke="{SYMBOL_STROKE}" stroke-width="{}"/>"#,
            self.stroke_width
        ));
        Ok(())
    }

    fn move_marker(&mut self, index: usize, position: Point2D) -> RenderResult<()> {
        if index >= self.markers.len() {
            self.markers.resize(index + 1, [0.0, 0.0]);
        }
        self.markers[index] = self.canvas(position);
        Ok(())
    }

    fn present_frame(&mut self, frame: &Frame<'_>) -> RenderResult<ControlFlow<()>> {
        self.frames.push(SvgFrame {
            tick: frame.tick,
            t: frame.t_phys,
            current: frame.current,
            particles: self.markers.clone(),
        });
        match self.max_frames {
            Some(limit) if self.frames.len() >= limit => Ok(ControlFlow::Break(())),
            _ => Ok(ControlFlow::Continue(())),
        }
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn renderer() -> SvgRenderer {
        // 2 px per world unit, origin at (100, 100)
        let mut view = Viewport::new(200.0, 200.0);
        view.scale = 2.0;
        SvgRenderer::new(view)
    }

    #[test]
    fn polyline_is_flipped_into_canvas_space() {
        let mut svg = renderer();
        svg.draw_polyline(&[Point2D::new(0.0, 0.0), Point2D::new(10.0, 10.0)])
            .unwrap();

        let markup = svg.scene_svg().unwrap();
        assert!(markup.contains(r#"points="100,100 120,80""#), "{markup}");
        assert!(markup.contains(r#"class="wire""#));
    }

    #[test]
    fn plate_becomes_line_element() {
        let mut svg = renderer();
        svg.draw_plate(Point2D::new(-5.0, 0.0), Point2D::new(5.0, 0.0))
            .unwrap();

        let markup = svg.scene_svg().unwrap();
        assert!(markup.contains(r#"x1="90" y1="100" x2="110" y2="100""#), "{markup}");
        assert_eq!(svg.element_count(), 1);
    }

    #[test]
    fn markers_grow_on_demand_and_render_as_circles() {
        let mut svg = renderer();
        svg.move_marker(2, Point2D::new(1.0, -1.0)).unwrap();

        let markup = svg.scene_svg().unwrap();
        assert!(markup.contains(r#"id="e0""#));
        assert!(markup.contains(r#"id="e2" class="electron" cx="102" cy="102""#), "{markup}");
        assert!(markup.ends_with("</svg>"));
    }

    #[test]
    fn frames_capture_marker_positions_and_respect_limit() {
        let mut svg = renderer().with_max_frames(2);
        let frame = |tick: u64| Frame {
            tick,
            t_phys: tick as f64 * 0.1,
            current: 0.5,
            speed: 30.0,
            particles: vec![],
            placements: &[],
        };

        svg.move_marker(0, Point2D::new(0.0, 0.0)).unwrap();
        assert_eq!(
            svg.present_frame(&frame(1)).unwrap(),
            ControlFlow::Continue(())
        );
        svg.move_marker(0, Point2D::new(5.0, 0.0)).unwrap();
        assert_eq!(svg.present_frame(&frame(2)).unwrap(), ControlFlow::Break(()));

        let frames = svg.frames();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].particles, vec![[100.0, 100.0]]);
        assert_eq!(frames[1].particles, vec![[110.0, 100.0]]);
        assert_eq!(frames[1].tick, 2);
    }

    #[test]
    fn frames_serialize_as_json_arrays() {
        let frame = SvgFrame {
            tick: 3,
            t: 0.25,
            current: 0.0,
            particles: vec![[1.5, 2.0]],
        };
        let json = serde_json::to_string(&frame).unwrap();
        assert_eq!(
            json,
            r#"{"tick":3,"t":0.25,"current":0.0,"particles":[[1.5,2.0]]}"#
        );
    }

    #[test]
    fn snapshot_small_scene() {
        let mut svg = renderer();
        svg.draw_polyline(&[Point2D::new(0.0, 0.0), Point2D::new(10.0, 10.0)])
            .unwrap();
        svg.move_marker(0, Point2D::new(1.0, -1.0)).unwrap();

        insta::assert_snapshot!(svg.scene_svg().unwrap(), @r##"
        <svg xmlns="http://www.w3.org/2000/svg" id="scene" width="200" height="200" viewBox="0 0 200 200">
          <polyline class="wire" points="100,100 120,80" fill="none" stroke="#222" stroke-width="2"/>
          <circle id="e0" class="electron" cx="102" cy="102" r="4" fill="#1f6feb"/>
        </svg>
        "##);
    }
}
