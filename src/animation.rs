//! Frame-stepped animation of the circuit
//!
//! Each tick advances simulated time, samples the loop current, turns its
//! magnitude into a drift speed along the wire, moves the electrons, and hands
//! the resulting [`Frame`] to a [`Renderer`]. The loop is single-threaded: a
//! frame is fully presented before the next tick starts.
//!
//! Runs always end on an explicit [`StopCondition`]: a tick bound, a
//! [`CancelToken`] tripped by the caller, or the renderer asking to stop.

use std::ops::ControlFlow;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::circuit::CircuitPhysics;
use crate::config::ScenarioConfig;
use crate::electrons::ElectronField;
use crate::geometry::{Path, Point2D};
use crate::layout::{ComponentPlacement, place_components};
use crate::order::PlacementOrder;
use crate::render::{RenderResult, Renderer, SymbolStyle, draw_scene};

/// Maps amps to world units per second
pub const DEFAULT_SPEED_CONSTANT: f64 = 60.0;

/// Wall-clock step of one frame at 60 fps
pub const DEFAULT_DT_WALL: f64 = 1.0 / 60.0;

/// Timing and speed knobs, fixed for a run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnimationSettings {
    /// Wall-clock seconds per frame
    pub dt_wall: f64,
    /// Simulated seconds per wall-clock second
    pub time_scale: f64,
    /// Visual multiplier on electron speed
    pub speed_scale: f64,
    /// Calibration from current (A) to speed (world units / s)
    pub speed_constant: f64,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            dt_wall: DEFAULT_DT_WALL,
            time_scale: 1.0,
            speed_scale: 1.0,
            speed_constant: DEFAULT_SPEED_CONSTANT,
        }
    }
}

impl AnimationSettings {
    /// Electron speed for a loop current of `current` amps
    pub fn speed_for(&self, current: f64) -> f64 {
        self.speed_constant * current.abs() * self.speed_scale
    }

    /// Frames per wall-clock second, rounded
    pub fn frames_per_second(&self) -> u64 {
        (1.0 / self.dt_wall).round().max(1.0) as u64
    }
}

/// Simulated time since the voltage step
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AnimationClock {
    t_phys: f64,
}

impl AnimationClock {
    pub fn t_phys(&self) -> f64 {
        self.t_phys
    }

    fn advance(&mut self, dt: f64) -> f64 {
        self.t_phys += dt;
        self.t_phys
    }
}

/// Shared flag an outside harness can trip to end a run
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// When a run should end; checked before every tick
#[derive(Debug, Clone, Default)]
pub struct StopCondition {
    pub max_ticks: Option<u64>,
    pub cancel: Option<CancelToken>,
}

impl StopCondition {
    pub fn after_ticks(ticks: u64) -> Self {
        Self {
            max_ticks: Some(ticks),
            cancel: None,
        }
    }

    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    fn check(&self, ticks_run: u64) -> Option<StopReason> {
        if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
            return Some(StopReason::Cancelled);
        }
        match self.max_ticks {
            Some(max) if ticks_run >= max => Some(StopReason::TickLimit),
            _ => None,
        }
    }
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    TickLimit,
    Cancelled,
    Renderer,
}

/// Renderable state of one tick
#[derive(Debug, Clone, Serialize)]
pub struct Frame<'a> {
    /// 1-based tick number
    pub tick: u64,
    pub t_phys: f64,
    /// Loop current in amps
    pub current: f64,
    /// Electron speed used for this tick
    pub speed: f64,
    pub particles: Vec<Point2D>,
    #[serde(skip)]
    pub placements: &'a [ComponentPlacement],
}

/// Outcome of [`AnimationLoop::run`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RunSummary {
    pub ticks: u64,
    pub t_phys: f64,
    pub final_current: f64,
    pub stop_reason: StopReason,
}

/// Owns the clock and drives electrons, physics, and renderer
pub struct AnimationLoop {
    path: Path,
    outlines: Vec<Path>,
    physics: CircuitPhysics,
    placements: Vec<ComponentPlacement>,
    field: ElectronField,
    settings: AnimationSettings,
    style: SymbolStyle,
    clock: AnimationClock,
    ticks: u64,
}

impl AnimationLoop {
    pub fn new(
        path: Path,
        physics: CircuitPhysics,
        placements: Vec<ComponentPlacement>,
        field: ElectronField,
        settings: AnimationSettings,
    ) -> Self {
        Self {
            path,
            outlines: Vec::new(),
            physics,
            placements,
            field,
            settings,
            style: SymbolStyle::default(),
            clock: AnimationClock::default(),
            ticks: 0,
        }
    }

    /// Wire outlines drawn once before the first frame
    pub fn with_outlines(mut self, outlines: Vec<Path>) -> Self {
        self.outlines = outlines;
        self
    }

    /// Assemble everything a scenario describes
    pub fn from_config<R: Rng>(
        config: &ScenarioConfig,
        order: &PlacementOrder,
        rng: &mut R,
    ) -> Self {
        let template = &config.template;
        let path = template.mid_path();
        let physics = config.circuit();
        let placements = place_components(&path, order, config.layout);
        let field = ElectronField::new(&path, config.electrons, rng);

        Self::new(path, physics, placements, field, config.animation)
            .with_outlines(vec![template.outer_path(), template.inner_path()])
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn physics(&self) -> &CircuitPhysics {
        &self.physics
    }

    /// Wire outlines drawn before the first frame
    pub fn outlines(&self) -> &[Path] {
        &self.outlines
    }

    pub fn placements(&self) -> &[ComponentPlacement] {
        &self.placements
    }

    pub fn field(&self) -> &ElectronField {
        &self.field
    }

    pub fn settings(&self) -> &AnimationSettings {
        &self.settings
    }

    pub fn t_phys(&self) -> f64 {
        self.clock.t_phys()
    }

    /// Ticks taken so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Advance one frame and return its state
    pub fn tick(&mut self) -> Frame<'_> {
        let t_phys = self
            .clock
            .advance(self.settings.dt_wall * self.settings.time_scale);
        let current = self.physics.current(t_phys);
        let speed = self.settings.speed_for(current);
        self.field.update(self.settings.dt_wall, speed);
        self.ticks += 1;

        trace!(tick = self.ticks, t_phys, current, speed, "tick");

        Frame {
            tick: self.ticks,
            t_phys,
            current,
            speed,
            particles: self.field.positions(&self.path),
            placements: &self.placements,
        }
    }

    /// Draw the static scene, then present frames until `stop` says otherwise
    pub fn run<R: Renderer + ?Sized>(
        &mut self,
        renderer: &mut R,
        stop: &StopCondition,
    ) -> RenderResult<RunSummary> {
        info!(
            electrons = self.field.len(),
            symbols = self.placements.len(),
            req = self.physics.req(),
            tau = ?self.physics.tau(),
            "starting animation"
        );

        draw_scene(renderer, &self.outlines, &self.placements, &self.style)?;

        let first_tick = self.ticks;
        let mut final_current = self.physics.current(self.clock.t_phys());

        let stop_reason = loop {
            if let Some(reason) = stop.check(self.ticks - first_tick) {
                break reason;
            }

            let frame = self.tick();
            final_current = frame.current;
            for (i, position) in frame.particles.iter().enumerate() {
                renderer.move_marker(i, *position)?;
            }
            if let ControlFlow::Break(()) = renderer.present_frame(&frame)? {
                break StopReason::Renderer;
            }
        };

        let summary = RunSummary {
            ticks: self.ticks - first_tick,
            t_phys: self.clock.t_phys(),
            final_current,
            stop_reason,
        };
        debug!(?summary, "animation stopped");
        Ok(summary)
    }
}
