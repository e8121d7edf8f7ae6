//! Charge carriers riding the loop
//!
//! Each electron is a single arc-length coordinate on a [`Path`]. The field
//! keeps only these scalars; screen positions are looked up on demand so the
//! particle state stays independent of any renderer.

use rand::Rng;

use crate::geometry::{Path, Point2D};

/// Default number of electrons on the loop
pub const DEFAULT_ELECTRON_COUNT: usize = 35;

/// A particle at arc length `s` along the loop
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Electron {
    pub s: f64,
}

/// Fixed-size set of electrons sharing one loop length
#[derive(Debug, Clone)]
pub struct ElectronField {
    electrons: Vec<Electron>,
    total_length: f64,
}

impl ElectronField {
    /// Scatter `n` electrons uniformly over `[0, path.total_length())`
    pub fn new<R: Rng>(path: &Path, n: usize, rng: &mut R) -> Self {
        let total_length = path.total_length();
        let electrons = (0..n)
            .map(|_| Electron {
                s: if total_length.is_finite() {
                    rng.gen_range(0.0..total_length)
                } else {
                    0.0
                },
            })
            .collect();

        tracing::debug!(count = n, total_length, "scattered electrons");

        Self {
            electrons,
            total_length,
        }
    }

    pub fn electrons(&self) -> &[Electron] {
        &self.electrons
    }

    pub fn len(&self) -> usize {
        self.electrons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.electrons.is_empty()
    }

    pub fn total_length(&self) -> f64 {
        self.total_length
    }

    /// Move every electron `speed * dt` along the loop, wrapping at the end
    ///
    /// A non-finite step (or loop length) leaves the field where it is.
    pub fn update(&mut self, dt: f64, speed: f64) {
        let ds = speed * dt;
        if !ds.is_finite() || !self.total_length.is_finite() {
            tracing::warn!(ds, total_length = self.total_length, "skipping non-finite step");
            return;
        }
        for electron in &mut self.electrons {
            electron.s = wrap(electron.s + ds, self.total_length);
        }
    }

    /// World coordinates of every electron
    pub fn positions(&self, path: &Path) -> Vec<Point2D> {
        self.electrons
            .iter()
            .map(|e| path.position_at(e.s).position)
            .collect()
    }
}

/// Non-negative remainder of `s` in `[0, total)`
fn wrap(s: f64, total: f64) -> f64 {
    let wrapped = s.rem_euclid(total);
    // rem_euclid can round up to exactly `total` for tiny negative inputs
    if wrapped >= total { 0.0 } else { wrapped }
}
