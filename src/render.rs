//! Renderer capability and circuit symbol drawing
//!
//! The animation never talks to a graphics backend directly. It calls the
//! small set of primitives on [`Renderer`]; symbol shapes (battery plates,
//! resistor zigzag, capacitor plates) are computed here from a placement's
//! anchor and tangent and handed to the backend as plain geometry.
//!
//! Backends:
//! - [`crate::svg::SvgRenderer`] - records the scene and frames as SVG
//! - [`DiagnosticRenderer`] - prints a line of circuit state every few
//!   frames
//! - [`RecordingRenderer`] - keeps every call, for tests

use std::io::Write;
use std::ops::ControlFlow;

use thiserror::Error;

use crate::animation::Frame;
use crate::geometry::{Path, Point2D};
use crate::layout::{ComponentPlacement, SymbolKind};

/// Errors raised by a rendering backend
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("format error: {0}")]
    Format(#[from] std::fmt::Error),

    #[error("template error: {0}")]
    Template(#[from] askama::Error),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type RenderResult<T> = Result<T, RenderError>;

/// Drawing primitives a backend must provide
pub trait Renderer {
    /// Stroke an open polyline (wire outlines)
    fn draw_polyline(&mut self, points: &[Point2D]) -> RenderResult<()>;

    /// Stroke a single plate segment
    fn draw_plate(&mut self, from: Point2D, to: Point2D) -> RenderResult<()>;

    /// Stroke a resistor zigzag through `points`
    fn draw_zigzag(&mut self, points: &[Point2D]) -> RenderResult<()>;

    /// Move charge marker `index` to `position`
    fn move_marker(&mut self, index: usize, position: Point2D) -> RenderResult<()>;

    /// Called once per tick after all markers moved
    ///
    /// Returning `Break` asks the animation to stop after this frame.
    fn present_frame(&mut self, _frame: &Frame<'_>) -> RenderResult<ControlFlow<()>> {
        Ok(ControlFlow::Continue(()))
    }
}

/// Symbol dimensions in world units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SymbolStyle {
    /// Distance from the anchor to each battery plate
    pub battery_plate_gap: f64,
    pub battery_short_plate: f64,
    pub battery_long_plate: f64,
    pub resistor_length: f64,
    pub resistor_zigzags: usize,
    pub resistor_amplitude: f64,
    /// Distance from the anchor to each capacitor plate
    pub capacitor_gap: f64,
    pub capacitor_plate: f64,
}

impl Default for SymbolStyle {
    fn default() -> Self {
        Self {
            battery_plate_gap: 7.0,
            battery_short_plate: 10.0,
            battery_long_plate: 18.0,
            resistor_length: 28.0,
            resistor_zigzags: 5,
            resistor_amplitude: 4.0,
            capacitor_gap: 6.0,
            capacitor_plate: 16.0,
        }
    }
}

/// Endpoints of a plate of `length` centered on `center`, across `tangent`
pub fn plate_endpoints(center: Point2D, tangent: Point2D, length: f64) -> (Point2D, Point2D) {
    let normal = tangent.normal();
    (
        center.offset(normal, -length / 2.0),
        center.offset(normal, length / 2.0),
    )
}

/// Vertices of a resistor zigzag centered on `center` along `tangent`
///
/// The line starts and ends on the wire; the `2 * zigzags - 1` interior
/// vertices alternate `amplitude` to either side of it.
pub fn zigzag_points(
    center: Point2D,
    tangent: Point2D,
    length: f64,
    zigzags: usize,
    amplitude: f64,
) -> Vec<Point2D> {
    let normal = tangent.normal();
    let start = center.offset(tangent, -length / 2.0);
    let end = center.offset(tangent, length / 2.0);
    let steps = (zigzags * 2).max(1);
    let step_len = length / steps as f64;

    let mut points = Vec::with_capacity(steps + 1);
    points.push(start);
    for k in 1..steps {
        let sign = if k % 2 == 1 { 1.0 } else { -1.0 };
        let on_wire = start.offset(tangent, k as f64 * step_len);
        points.push(on_wire.offset(normal, amplitude * sign));
    }
    points.push(end);
    points
}

/// Draw the symbol for one placement
pub fn draw_symbol<R: Renderer + ?Sized>(
    renderer: &mut R,
    placement: &ComponentPlacement,
    style: &SymbolStyle,
) -> RenderResult<()> {
    let center = placement.position;
    let tangent = placement.tangent;

    match placement.kind {
        SymbolKind::Battery => {
            let short_center = center.offset(tangent, -style.battery_plate_gap);
            let long_center = center.offset(tangent, style.battery_plate_gap);
            let (a, b) = plate_endpoints(short_center, tangent, style.battery_short_plate);
            renderer.draw_plate(a, b)?;
            let (a, b) = plate_endpoints(long_center, tangent, style.battery_long_plate);
            renderer.draw_plate(a, b)
        }
        SymbolKind::Resistor => {
            let points = zigzag_points(
                center,
                tangent,
                style.resistor_length,
                style.resistor_zigzags,
                style.resistor_amplitude,
            );
            renderer.draw_zigzag(&points)
        }
        SymbolKind::Capacitor => {
            for offset in [-style.capacitor_gap, style.capacitor_gap] {
                let (a, b) =
                    plate_endpoints(center.offset(tangent, offset), tangent, style.capacitor_plate);
                renderer.draw_plate(a, b)?;
            }
            Ok(())
        }
    }
}

/// Draw the static part of the scene: wire outlines, then every symbol
pub fn draw_scene<R: Renderer + ?Sized>(
    renderer: &mut R,
    outlines: &[Path],
    placements: &[ComponentPlacement],
    style: &SymbolStyle,
) -> RenderResult<()> {
    for outline in outlines {
        renderer.draw_polyline(outline.points())?;
    }
    for placement in placements {
        draw_symbol(renderer, placement, style)?;
    }
    Ok(())
}

/// Prints circuit state once per `interval` frames; draws nothing
pub struct DiagnosticRenderer<W: Write> {
    out: W,
    interval: u64,
}

impl<W: Write> DiagnosticRenderer<W> {
    pub fn new(out: W, interval: u64) -> Self {
        Self {
            out,
            interval: interval.max(1),
        }
    }
}

impl<W: Write> Renderer for DiagnosticRenderer<W> {
    fn draw_polyline(&mut self, _points: &[Point2D]) -> RenderResult<()> {
        Ok(())
    }

    fn draw_plate(&mut self, _from: Point2D, _to: Point2D) -> RenderResult<()> {
        Ok(())
    }

    fn draw_zigzag(&mut self, _points: &[Point2D]) -> RenderResult<()> {
        Ok(())
    }

    fn move_marker(&mut self, _index: usize, _position: Point2D) -> RenderResult<()> {
        Ok(())
    }

    fn present_frame(&mut self, frame: &Frame<'_>) -> RenderResult<ControlFlow<()>> {
        if frame.tick % self.interval == 0 {
            writeln!(
                self.out,
                "tick {:>6}  t = {:>9.4} s  I = {:.6} A  speed = {:.3}",
                frame.tick, frame.t_phys, frame.current, frame.speed
            )?;
        }
        Ok(ControlFlow::Continue(()))
    }
}

/// One recorded renderer call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Polyline(Vec<Point2D>),
    Plate(Point2D, Point2D),
    Zigzag(Vec<Point2D>),
    Marker(usize, Point2D),
    Present { tick: u64, particles: usize },
}

/// Headless renderer that keeps every call in order
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub commands: Vec<DrawCommand>,
    /// Request a stop once this many frames were presented
    pub stop_after_frames: Option<u64>,
    frames: u64,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stopping_after(frames: u64) -> Self {
        Self {
            stop_after_frames: Some(frames),
            ..Self::default()
        }
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames
    }

    /// Ticks of every presented frame, in order
    pub fn presented_ticks(&self) -> Vec<u64> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Present { tick, .. } => Some(*tick),
                _ => None,
            })
            .collect()
    }
}

impl Renderer for RecordingRenderer {
    fn draw_polyline(&mut self, points: &[Point2D]) -> RenderResult<()> {
        self.commands.push(DrawCommand::Polyline(points.to_vec()));
        Ok(())
    }

    fn draw_plate(&mut self, from: Point2D, to: Point2D) -> RenderResult<()> {
        self.commands.push(DrawCommand::Plate(from, to));
        Ok(())
    }

    fn draw_zigzag(&mut self, points: &[Point2D]) -> RenderResult<()> {
        self.commands.push(DrawCommand::Zigzag(points.to_vec()));
        Ok(())
    }

    fn move_marker(&mut self, index: usize, position: Point2D) -> RenderResult<()> {
        self.commands.push(DrawCommand::Marker(index, position));
        Ok(())
    }

    fn present_frame(&mut self, frame: &Frame<'_>) -> RenderResult<ControlFlow<()>> {
        self.frames += 1;
        self.commands.push(DrawCommand::Present {
            tick: frame.tick,
            particles: frame.particles.len(),
        });
        match self.stop_after_frames {
            Some(limit) if self.frames >= limit => Ok(ControlFlow::Break(())),
            _ => Ok(ControlFlow::Continue(())),
        }
    }
}
