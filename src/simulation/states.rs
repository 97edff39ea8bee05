//! Core state types for the N-body simulation.
//!
//! Defines the planar body/system structs using `NVec2`.
//!
//! The system holds the ordered list of bodies, the current simulation
//! time `t`, and the mass scale the masses were normalized by.

use nalgebra::Vector2;
pub type NVec2 = Vector2<f64>;

#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub x: NVec2, // position
    pub v: NVec2, // velocity
    pub a: NVec2, // acceleration accumulator, zero between steps
    pub m: f64, // normalized mass
}

impl Body {
    pub fn new(m: f64, x: NVec2, v: NVec2) -> Self {
        Self {
            x,
            v,
            a: NVec2::zeros(),
            m,
        }
    }
}

#[derive(Debug, Clone)]
pub struct System {
    pub bodies: Vec<Body>, // fixed order for the whole run
    pub t: f64, // time
    pub mass_scale: f64, // physical mass = m * mass_scale
}

impl System {
    /// Number of unordered body pairs, i.e. entries in a distances line
    pub fn pair_count(&self) -> usize {
        pair_count(self.bodies.len())
    }

    /// Distances between all pairs (i, j), i < j, in list order
    pub fn pair_distances(&self) -> Vec<f64> {
        let n = self.bodies.len();
        let mut out = Vec::with_capacity(self.pair_count());
        for i in 0..n {
            for j in (i + 1)..n {
                out.push((self.bodies[i].x - self.bodies[j].x).norm());
            }
        }
        out
    }

    /// Shift positions and velocities into the center-of-mass frame
    pub fn recenter(&mut self) {
        let total: f64 = self.bodies.iter().map(|b| b.m).sum();
        if total <= 0.0 {
            return;
        }
        let mut com = NVec2::zeros();
        let mut momentum = NVec2::zeros();
        for b in &self.bodies {
            com += b.m * b.x;
            momentum += b.m * b.v;
        }
        let offset = com / total;
        let drift = momentum / total;
        for b in self.bodies.iter_mut() {
            b.x -= offset;
            b.v -= drift;
        }
    }
}

/// n * (n - 1) / 2
pub fn pair_count(n: usize) -> usize {
    n.saturating_mul(n.saturating_sub(1)) / 2
}

/// `pair_count`, or `None` when n * (n - 1) overflows
pub fn checked_pair_count(n: usize) -> Option<usize> {
    n.checked_mul(n.saturating_sub(1)).map(|p| p / 2)
}
