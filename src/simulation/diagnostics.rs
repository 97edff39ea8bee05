//! Conserved-quantity diagnostics: energy and momentum of the system
//!
//! Values are in normalized mass units (physical = value * mass scale).
//! Velocities sit half a step behind positions after the bootstrap kick, so
//! the kinetic term oscillates slightly; it does not drift.

use super::states::{System, NVec2};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Diagnostics {
    pub t: f64,
    pub kinetic: f64,
    pub potential: f64,
    pub momentum: NVec2,
}

impl Diagnostics {
    pub fn measure(sys: &System, g_eff: f64) -> Self {
        let kinetic = sys
            .bodies
            .iter()
            .map(|b| 0.5 * b.m * b.v.norm_squared())
            .sum();

        let mut potential = 0.0;
        let n = sys.bodies.len();
        for i in 0..n {
            for j in (i + 1)..n {
                let (bi, bj) = (&sys.bodies[i], &sys.bodies[j]);
                let r = (bi.x - bj.x).norm();
                if r > 0.0 {
                    potential -= g_eff * bi.m * bj.m / r;
                }
            }
        }

        let momentum = sys
            .bodies
            .iter()
            .fold(NVec2::zeros(), |acc, b| acc + b.m * b.v);

        Self {
            t: sys.t,
            kinetic,
            potential,
            momentum,
        }
    }

    pub fn total(&self) -> f64 {
        self.kinetic + self.potential
    }

    /// (E - E0) / E0, or the absolute error when E0 is zero
    pub fn relative_energy_error(&self, initial: &Diagnostics) -> f64 {
        let e0 = initial.total();
        let de = self.total() - e0;
        if e0 == 0.0 { de } else { de / e0 }
    }
}
